//! MIDI variable-length quantity codec.
//!
//! A VLQ packs a non-negative integer into 1-4 big-endian 7-bit groups; all
//! but the last byte carry the continuation bit `0x80`. This crate caps the
//! representable range at `0x0FFFFFFF` (four groups), the ceiling the wire
//! format itself imposes, rather than the five-group/`u32::MAX` range a
//! general-purpose VLQ could support.

use crate::constants::MAX_VLQ_VALUE;
use crate::error::{self, Result};
use snafu::ResultExt;

/// Encodes `v` as 1-4 big-endian 7-bit groups with continuation bits set on
/// every byte but the last.
///
/// # Errors
///
/// Returns [`crate::Error::Semantic`] if `v > 0x0FFFFFFF`.
pub(crate) fn encode(v: u32) -> Result<Vec<u8>> {
    if v > MAX_VLQ_VALUE {
        sem_bail!("VLQ value {} exceeds maximum {}", v, MAX_VLQ_VALUE);
    }
    let mut groups = [(v & 0x7F) as u8, 0, 0, 0];
    let mut n = 1usize;
    let mut rest = v >> 7;
    while rest > 0 {
        groups[n] = (rest & 0x7F) as u8;
        rest >>= 7;
        n += 1;
    }
    let mut out = Vec::with_capacity(n);
    for i in (0..n).rev() {
        let mut byte = groups[i];
        if i != 0 {
            byte |= 0x80;
        }
        out.push(byte);
    }
    Ok(out)
}

/// Returns the number of bytes [`encode`] would produce for `v`, without
/// allocating. Must agree with `encode(v).unwrap().len()` for every legal
/// `v`.
pub(crate) fn size(v: u32) -> Result<usize> {
    if v > MAX_VLQ_VALUE {
        sem_bail!("VLQ value {} exceeds maximum {}", v, MAX_VLQ_VALUE);
    }
    Ok(match v {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        _ => 4,
    })
}

/// Decodes a VLQ from the front of `bytes`, returning `(value, consumed)`.
///
/// Fails if more than four continuation bytes are seen, or if `bytes` is
/// exhausted before a terminator byte (high bit clear) appears.
pub(crate) fn decode(bytes: &[u8]) -> Result<(u32, usize)> {
    let mut value: u32 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if i == 4 {
            sem_bail!("VLQ exceeds 4 bytes");
        }
        value = (value << 7) | u32::from(b & 0x7F);
        if b & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    sem_bail!("VLQ truncated: input exhausted before terminator byte");
}

/// Writes `encode(v)` directly to `sink`, returning an [`crate::Error::Io`]
/// on failure.
pub(crate) fn write<W: std::io::Write>(sink: &mut W, v: u32) -> Result<()> {
    let bytes = encode(v)?;
    sink.write_all(&bytes).context(error::Io { site: site!() })
}
