//! Handle table: owns the text and blob payloads referenced indirectly from
//! the message buffer, keyed by dense integer index.

use crate::blob::Blob;
use crate::constants::MAX_HANDLES;
use crate::error::Result;
use crate::text::Text;
use log::warn;

/// One entry in the handle table: either a text or a blob payload.
#[derive(Clone, Debug)]
pub(crate) enum Handle {
    Blob(Blob),
    Text(Text),
}

impl Handle {
    pub(crate) fn len(&self) -> usize {
        match self {
            Handle::Blob(b) => b.len(),
            Handle::Text(t) => t.len(),
        }
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        match self {
            Handle::Blob(b) => b.bytes(),
            Handle::Text(t) => t.as_bytes(),
        }
    }
}

/// Append-only, dense handle table. Indices are stable for the lifetime of
/// the builder and are referenced from the message buffer via VLQ.
#[derive(Debug, Default)]
pub(crate) struct HandleTable {
    entries: Vec<Handle>,
}

impl HandleTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_blob(&mut self, blob: Blob) -> Result<u32> {
        self.push(Handle::Blob(blob))
    }

    pub(crate) fn add_text(&mut self, text: Text) -> Result<u32> {
        self.push(Handle::Text(text))
    }

    pub(crate) fn get(&self, index: u32) -> Result<&Handle> {
        self.entries.get(index as usize).ok_or_else(|| {
            let site = site!();
            crate::error::Error::Semantic {
                site,
                description: format!("handle index {} out of range", index),
            }
        })
    }

    fn push(&mut self, handle: Handle) -> Result<u32> {
        if self.entries.len() >= MAX_HANDLES {
            warn!("handle table growth rejected at {} entries (max {})", self.entries.len(), MAX_HANDLES);
            cap_bail!("handle table full (max {} entries)", MAX_HANDLES);
        }
        let index = self.entries.len() as u32;
        self.entries.push(handle);
        Ok(index)
    }
}
