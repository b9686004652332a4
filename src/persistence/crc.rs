//! CRC-32 over the configuration record.
//!
//! Polynomial 0x04C11DB7, reflected, with init and final XOR of 0xFFFFFFFF
//! (CRC-32/ISO-HDLC). A non-zero init means an all-zero payload never carries
//! a zero checksum, so a blank medium cannot verify.

use ::crc::{CRC_32_ISO_HDLC, Crc};

pub const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// One-shot checksum of `bytes`.
pub fn checksum(bytes: &[u8]) -> u32 {
    CRC32.checksum(bytes)
}
