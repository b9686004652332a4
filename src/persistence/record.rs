//! Fixed-layout binary encoding of [`MachineConfig`].
//!
//! ```text
//!  off  field                     type
//!  ───  ────────────────────────  ────
//!    0  target_brew_temp_c        u32
//!    4  target_steam_temp_c       u32
//!    8  kp                        f64
//!   16  ki                        f64
//!   24  kd                        f64
//!   32  sample_time_ms            u32
//!   36  preinfusion duration_secs u32
//!   40  soak_secs                 u32
//!   44  preinfusion_bar           f32
//!   48  brewing_bar               f32
//!   52  checksum                  u32   CRC-32 of bytes 0..52
//! ```
//!
//! All fields little-endian, no padding.

use super::crc;
use crate::config::{MachineConfig, PidGains, PreinfusionConfig};
use crate::error::ConfigError;

/// Offset of the record on the persistence medium.
pub const RECORD_OFFSET: usize = 0;
/// Bytes covered by the checksum.
pub const PAYLOAD_LEN: usize = 52;
/// Total record size including the trailing checksum.
pub const RECORD_LEN: usize = PAYLOAD_LEN + 4;

/// Encode `config` into a full record with its checksum.
pub fn encode(config: &MachineConfig) -> [u8; RECORD_LEN] {
    let mut out = [0u8; RECORD_LEN];
    let mut w = Writer::new(&mut out);
    w.put(&config.target_brew_temp_c.to_le_bytes());
    w.put(&config.target_steam_temp_c.to_le_bytes());
    w.put(&config.pid_gains.kp.to_le_bytes());
    w.put(&config.pid_gains.ki.to_le_bytes());
    w.put(&config.pid_gains.kd.to_le_bytes());
    w.put(&config.pid_gains.sample_time_ms.to_le_bytes());
    w.put(&config.preinfusion.duration_secs.to_le_bytes());
    w.put(&config.preinfusion.soak_secs.to_le_bytes());
    w.put(&config.preinfusion.preinfusion_bar.to_le_bytes());
    w.put(&config.preinfusion.brewing_bar.to_le_bytes());

    let sum = crc::checksum(&out[..PAYLOAD_LEN]);
    out[PAYLOAD_LEN..].copy_from_slice(&sum.to_le_bytes());
    out
}

/// Decode a record, verifying its checksum.
///
/// Extra bytes past [`RECORD_LEN`] are ignored.
pub fn decode(bytes: &[u8]) -> Result<MachineConfig, ConfigError> {
    let Some(record) = bytes.get(..RECORD_LEN) else {
        return Err(ConfigError::Truncated { len: bytes.len() });
    };

    let (payload, stored) = record.split_at(PAYLOAD_LEN);
    let mut r = Reader::new(stored);
    let stored = u32::from_le_bytes(r.take());
    let computed = crc::checksum(payload);
    if stored != computed {
        return Err(ConfigError::Corrupted { stored, computed });
    }

    let mut r = Reader::new(payload);
    Ok(MachineConfig {
        target_brew_temp_c: u32::from_le_bytes(r.take()),
        target_steam_temp_c: u32::from_le_bytes(r.take()),
        pid_gains: PidGains {
            kp: f64::from_le_bytes(r.take()),
            ki: f64::from_le_bytes(r.take()),
            kd: f64::from_le_bytes(r.take()),
            sample_time_ms: u32::from_le_bytes(r.take()),
        },
        preinfusion: PreinfusionConfig {
            duration_secs: u32::from_le_bytes(r.take()),
            soak_secs: u32::from_le_bytes(r.take()),
            preinfusion_bar: f32::from_le_bytes(r.take()),
            brewing_bar: f32::from_le_bytes(r.take()),
        },
    })
}

// ---------------------------------------------------------------------------
// Cursors
// ---------------------------------------------------------------------------

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }
}

/// Reader over a slice whose length the caller has already checked.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }
}
