use async_trait::async_trait;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{ClearBuffer, SerialPort, SerialStream};

/// The serial-link collaborator the transport drives.
///
/// One exchange calls these strictly in sequence; implementations do not
/// need to be re-entrant.
#[async_trait]
pub trait SerialLink: Send {
    /// Best-effort discard of bytes already queued for reading.
    async fn purge_inbound(&mut self) -> io::Result<()>;

    /// Transmits `bytes`, flushing before returning.
    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Reads whatever bytes arrive within `max_wait` into `out` and returns
    /// the count, 0 when nothing arrived.
    async fn read_with_timeout(&mut self, max_wait: Duration, out: &mut [u8]) -> io::Result<usize>;
}

/// Waits up to `max_wait` for the first byte, then keeps reading until the
/// link stays idle for `idle_gap` or `out` is full.
///
/// The idle gap is what delimits an RTU frame on the wire, so a complete
/// response is returned as one batch. A timeout with no data is not an
/// error; a link that closes before the first byte is.
pub async fn read_with_idle_timeout<IO>(
    io: &mut IO,
    max_wait: Duration,
    idle_gap: Duration,
    out: &mut [u8],
) -> io::Result<usize>
where
    IO: AsyncRead + Unpin + Send,
{
    if out.is_empty() {
        return Ok(0);
    }

    let mut len = match timeout(max_wait, io.read(out)).await {
        Ok(Ok(0)) => {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "serial link closed",
            ));
        }
        Ok(Ok(n)) => n,
        Ok(Err(err)) => return Err(err),
        Err(_) => return Ok(0),
    };

    while len < out.len() {
        match timeout(idle_gap, io.read(&mut out[len..])).await {
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => len += n,
            Ok(Err(err)) => return Err(err),
            Err(_) => break,
        }
    }
    Ok(len)
}

/// Production [`SerialLink`] over a native serial port.
#[derive(Debug)]
pub struct SerialPortLink {
    stream: SerialStream,
    inter_frame_gap: Duration,
}

impl SerialPortLink {
    pub fn from_stream(stream: SerialStream, inter_frame_gap: Duration) -> Self {
        Self {
            stream,
            inter_frame_gap,
        }
    }
}

#[async_trait]
impl SerialLink for SerialPortLink {
    async fn purge_inbound(&mut self) -> io::Result<()> {
        self.stream
            .clear(ClearBuffer::Input)
            .map_err(io::Error::from)
    }

    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    async fn read_with_timeout(&mut self, max_wait: Duration, out: &mut [u8]) -> io::Result<usize> {
        read_with_idle_timeout(&mut self.stream, max_wait, self.inter_frame_gap, out).await
    }
}

#[cfg(test)]
mod tests {
    use super::read_with_idle_timeout;
    use std::time::Duration;
    use tokio::io::{duplex, AsyncWriteExt};

    #[tokio::test]
    async fn timed_read_returns_zero_when_nothing_arrives() {
        let (mut reader, _writer) = duplex(64);
        let mut out = [0u8; 16];
        let n = read_with_idle_timeout(
            &mut reader,
            Duration::from_millis(20),
            Duration::from_millis(5),
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn timed_read_collects_one_frame_batch() {
        let (mut reader, mut writer) = duplex(64);
        writer.write_all(&[0x01, 0x03, 0x02, 0x00, 0x2A]).await.unwrap();

        let mut out = [0u8; 16];
        let n = read_with_idle_timeout(
            &mut reader,
            Duration::from_millis(100),
            Duration::from_millis(10),
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(&out[..n], &[0x01, 0x03, 0x02, 0x00, 0x2A]);
    }

    #[tokio::test]
    async fn timed_read_reports_closed_link() {
        let (mut reader, writer) = duplex(64);
        drop(writer);

        let mut out = [0u8; 16];
        let err = read_with_idle_timeout(
            &mut reader,
            Duration::from_millis(20),
            Duration::from_millis(5),
            &mut out,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn timed_read_stops_at_full_output() {
        let (mut reader, mut writer) = duplex(64);
        writer.write_all(&[1, 2, 3, 4, 5]).await.unwrap();

        let mut out = [0u8; 3];
        let n = read_with_idle_timeout(
            &mut reader,
            Duration::from_millis(100),
            Duration::from_millis(10),
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(n, 3);
        assert_eq!(&out, &[1, 2, 3]);
    }
}
