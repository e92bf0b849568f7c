use crate::link::{SerialLink, SerialPortLink};
use crate::TransportError;
use framebus_core::FrameBuffer;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, StopBits};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct RtuConfig {
    /// Maximum wait for the first byte of a response.
    pub response_timeout: Duration,
    /// Idle gap that delimits one frame on the wire.
    pub inter_frame_gap: Duration,
    pub parity: Parity,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
}

impl Default for RtuConfig {
    fn default() -> Self {
        Self {
            response_timeout: Duration::from_millis(500),
            inter_frame_gap: Duration::from_millis(10),
            parity: Parity::None,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
        }
    }
}

/// Half-duplex RTU transport over an exclusively-owned serial link.
///
/// A single lock guards the whole body of [`send`](Self::send) and
/// [`recv`](Self::recv), including their blocking I/O, so completed calls
/// on one instance are totally ordered. One exchange is one attempt;
/// retries belong to the caller.
#[derive(Debug)]
pub struct RtuTransport<L> {
    link: Mutex<L>,
    config: RtuConfig,
}

impl RtuTransport<SerialPortLink> {
    /// Opens the serial port and wraps it in a transport. Fails with a
    /// wrapped I/O error when the port cannot be opened.
    pub fn open(path: &str, baud_rate: u32, config: RtuConfig) -> Result<Self, TransportError> {
        let builder = tokio_serial::new(path, baud_rate)
            .parity(config.parity)
            .data_bits(config.data_bits)
            .stop_bits(config.stop_bits)
            .flow_control(config.flow_control);
        let stream = builder.open_native_async().map_err(|err| {
            TransportError::Io(std::io::Error::other(format!(
                "failed to open serial port '{path}': {err}"
            )))
        })?;
        let link = SerialPortLink::from_stream(stream, config.inter_frame_gap);
        Ok(Self::from_link(link, config))
    }
}

impl<L: SerialLink> RtuTransport<L> {
    pub fn from_link(link: L, config: RtuConfig) -> Self {
        Self {
            link: Mutex::new(link),
            config,
        }
    }

    pub fn config(&self) -> &RtuConfig {
        &self.config
    }

    /// Appends the CRC trailer to `frame` and transmits its full content.
    ///
    /// Stale inbound bytes left over from a previous exchange are purged
    /// first. Purge and write failures both wrap into
    /// [`TransportError::Io`].
    pub async fn send(&self, frame: &mut FrameBuffer) -> Result<(), TransportError> {
        let mut link = self.link.lock().await;
        link.purge_inbound().await?;
        frame.write_crc();
        trace!(frame_len = frame.len(), "sending rtu frame");
        link.write_all(frame.as_bytes()).await?;
        Ok(())
    }

    /// Drains one response from the link into `frame` and accepts it iff
    /// the running CRC over everything received reduces to zero.
    ///
    /// `frame` must be freshly cleared; otherwise the zero check is
    /// meaningless. No response within the timeout surfaces as
    /// [`TransportError::CrcCheckFailed`] with the frame left empty.
    pub async fn recv(&self, frame: &mut FrameBuffer) -> Result<(), TransportError> {
        let mut link = self.link.lock().await;
        let room = frame.capacity() - frame.len();
        let mut scratch = vec![0u8; room];
        let received = link
            .read_with_timeout(self.config.response_timeout, &mut scratch)
            .await?;
        frame.write_all(&scratch[..received]);
        if frame.crc() != 0 {
            return Err(TransportError::CrcCheckFailed);
        }
        trace!(frame_len = frame.len(), "received rtu frame");
        Ok(())
    }
}
