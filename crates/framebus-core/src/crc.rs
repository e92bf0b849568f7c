//! CRC16/Modbus: reflected polynomial 0xA001, seed 0xFFFF, transmitted
//! little-endian.

/// Seed value of a fresh accumulator.
pub const INITIAL: u16 = 0xFFFF;

const fn build_crc16_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            if (crc & 0x0001) != 0 {
                crc = (crc >> 1) ^ 0xA001;
            } else {
                crc >>= 1;
            }
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

const CRC16_TABLE: [u16; 256] = build_crc16_table();

/// Folds one byte into the accumulator.
pub const fn step(crc: u16, byte: u8) -> u16 {
    let idx = ((crc ^ (byte as u16)) & 0x00FF) as usize;
    (crc >> 8) ^ CRC16_TABLE[idx]
}

/// Folds a slice of bytes into the accumulator, in order.
pub fn update(mut crc: u16, data: &[u8]) -> u16 {
    for byte in data {
        crc = step(crc, *byte);
    }
    crc
}

/// Checksum of a complete payload, folded from [`INITIAL`].
pub fn checksum(data: &[u8]) -> u16 {
    update(INITIAL, data)
}

#[cfg(test)]
mod tests {
    use super::{checksum, step, update, INITIAL};

    #[test]
    fn crc16_known_vectors() {
        assert_eq!(checksum(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x0A]), 0xCDC5);
        assert_eq!(checksum(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x01]), 0x0A84);
    }

    #[test]
    fn bulk_update_matches_stepwise() {
        let data = [0x11u8, 0x03, 0x00, 0x6B, 0x00, 0x03];
        let mut crc = INITIAL;
        for byte in data {
            crc = step(crc, byte);
        }
        assert_eq!(update(INITIAL, &data), crc);
    }

    #[test]
    fn appended_trailer_reduces_to_zero() {
        let payload = [0x01u8, 0x06, 0x00, 0x2A, 0x01, 0xF4];
        let crc = checksum(&payload);
        let folded = update(update(INITIAL, &payload), &crc.to_le_bytes());
        assert_eq!(folded, 0);
    }
}
