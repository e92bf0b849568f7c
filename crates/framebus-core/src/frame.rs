use crate::crc;
use alloc::vec;
use alloc::vec::Vec;

/// A fixed-capacity byte container with independent write and read cursors
/// and a running CRC16 accumulator.
///
/// Every byte actually stored is folded into the accumulator in write order,
/// starting from [`crc::INITIAL`]; reads never touch it. Writes past the
/// capacity are silently dropped rather than failing — callers rely on this
/// to cap over-length frames, so it is contract, not a bug to fix.
#[derive(Debug)]
pub struct FrameBuffer {
    storage: Vec<u8>,
    write_pos: usize,
    read_pos: usize,
    crc: u16,
}

impl FrameBuffer {
    /// Allocates `capacity` bytes of storage. The buffer starts cleared and
    /// never reallocates.
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: vec![0u8; capacity],
            write_pos: 0,
            read_pos: 0,
            crc: crc::INITIAL,
        }
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Total bytes held, including already-consumed ones.
    pub fn len(&self) -> usize {
        self.write_pos
    }

    pub fn is_empty(&self) -> bool {
        self.write_pos == 0
    }

    /// Count of stored-but-unread bytes.
    pub fn available(&self) -> usize {
        self.write_pos - self.read_pos
    }

    /// Current accumulator value, the fold of exactly the bytes stored since
    /// the last [`clear`](Self::clear).
    pub const fn crc(&self) -> u16 {
        self.crc
    }

    /// Resets both cursors and the accumulator. Storage is kept.
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.read_pos = 0;
        self.crc = crc::INITIAL;
    }

    /// Stores one byte and folds it into the accumulator. A byte written
    /// with no room left is dropped silently.
    pub fn write_u8(&mut self, byte: u8) {
        if self.write_pos < self.storage.len() {
            self.storage[self.write_pos] = byte;
            self.write_pos += 1;
            self.crc = crc::step(self.crc, byte);
        }
    }

    /// Stores as many leading bytes of `bytes` as there is room for. The
    /// accumulator folds only over the bytes actually stored.
    pub fn write_all(&mut self, bytes: &[u8]) {
        let room = self.storage.len() - self.write_pos;
        let count = bytes.len().min(room);
        let end = self.write_pos + count;
        self.storage[self.write_pos..end].copy_from_slice(&bytes[..count]);
        self.crc = crc::update(self.crc, &bytes[..count]);
        self.write_pos = end;
    }

    /// Writes a 16-bit value high byte first.
    pub fn write_u16_be(&mut self, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.write_u8(high);
        self.write_u8(low);
    }

    /// Writes a 16-bit value low byte first.
    pub fn write_u16_le(&mut self, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.write_u8(low);
        self.write_u8(high);
    }

    /// Appends the current accumulator as a little-endian trailer.
    ///
    /// The trailer bytes fold into the accumulator like any other write, so
    /// re-verifying the complete stream afterwards reduces to zero.
    pub fn write_crc(&mut self) {
        let crc = self.crc;
        self.write_u16_le(crc);
    }

    /// Returns the next unread byte, or `None` when everything stored has
    /// been consumed.
    pub fn read_u8(&mut self) -> Option<u8> {
        if self.read_pos == self.write_pos {
            return None;
        }
        let byte = self.storage[self.read_pos];
        self.read_pos += 1;
        Some(byte)
    }

    /// All-or-nothing read: fills `out` completely and returns its length,
    /// or consumes nothing and returns 0 when fewer than `out.len()` unread
    /// bytes remain. Read a sub-range by slicing the destination.
    pub fn read_into(&mut self, out: &mut [u8]) -> usize {
        if self.available() < out.len() {
            return 0;
        }
        let end = self.read_pos + out.len();
        out.copy_from_slice(&self.storage[self.read_pos..end]);
        self.read_pos = end;
        out.len()
    }

    /// Reads two bytes as a big-endian 16-bit value.
    ///
    /// Returns `None` if either byte is missing. When only one byte was
    /// unread, that byte is still consumed.
    pub fn read_u16_be(&mut self) -> Option<u16> {
        let high = self.read_u8()?;
        let low = self.read_u8()?;
        Some(u16::from_be_bytes([high, low]))
    }

    /// Reads two bytes as a little-endian 16-bit value.
    ///
    /// Same partial-read behavior as [`read_u16_be`](Self::read_u16_be).
    pub fn read_u16_le(&mut self) -> Option<u16> {
        let low = self.read_u8()?;
        let high = self.read_u8()?;
        Some(u16::from_le_bytes([low, high]))
    }

    /// Read-only view of the stored bytes, for zero-copy handoff to a
    /// transport.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.write_pos]
    }
}
