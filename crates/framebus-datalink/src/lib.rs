//! Async RTU transport layer for half-duplex serial links.
//!
//! Builds outbound frames by appending a little-endian CRC16 trailer to a
//! [`framebus_core::FrameBuffer`] and validates inbound frames by folding
//! the received stream through the buffer's running accumulator and
//! requiring it to reduce to zero.

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod link;
pub mod rtu;

pub use link::{read_with_idle_timeout, SerialLink, SerialPortLink};
pub use rtu::{RtuConfig, RtuTransport};

/// Failures surfaced by one send or recv attempt.
///
/// A timed-out receive with no bytes and a garbled receive both surface as
/// [`CrcCheckFailed`](TransportError::CrcCheckFailed); a caller needing the
/// distinction inspects the frame buffer's length. Retry policy lives with
/// the caller, never here.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("link io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("crc check failed")]
    CrcCheckFailed,
}
