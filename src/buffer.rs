//! Message buffer: the append-only byte arena holding the variable tail of
//! every MIDI message, addressed by the 24-bit offset packed into a
//! [`crate::selector::Selector`].

use crate::constants::MAX_BUFFER_LEN;
use crate::error::Result;
use log::warn;

/// Append-only byte arena. Every write returns the offset it started at,
/// which becomes the selector's tail pointer.
#[derive(Debug, Default)]
pub(crate) struct MessageBuffer {
    bytes: Vec<u8>,
}

impl MessageBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `data`, returning the offset it now starts at.
    pub(crate) fn append(&mut self, data: &[u8]) -> Result<u32> {
        let offset = self.bytes.len();
        if offset + data.len() > MAX_BUFFER_LEN {
            warn!("message buffer growth to {} bytes exceeds ceiling of {}", offset + data.len(), MAX_BUFFER_LEN);
            cap_bail!(
                "message buffer would exceed {} bytes",
                MAX_BUFFER_LEN
            );
        }
        self.bytes.extend_from_slice(data);
        Ok(offset as u32)
    }

    pub(crate) fn slice(&self, offset: u32, len: usize) -> &[u8] {
        let offset = offset as usize;
        &self.bytes[offset..offset + len]
    }

    pub(crate) fn at(&self, offset: u32) -> &[u8] {
        &self.bytes[offset as usize..]
    }
}
