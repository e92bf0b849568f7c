//! Link-level framing primitives for half-duplex RTU serial protocols.
//!
//! `framebus-core` provides the Modbus-variant CRC16 arithmetic and a
//! fixed-capacity frame buffer that folds every stored byte into a running
//! checksum accumulator.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod crc;
#[cfg(feature = "alloc")]
pub mod frame;

#[cfg(feature = "alloc")]
pub use frame::FrameBuffer;
