//! Selector encoding: the branch-free `(status_byte, buffer_offset)` pair
//! that represents any MIDI message, plus the one constructor per tail
//! shape from the wire-format table.

use crate::blob::Blob;
use crate::buffer::MessageBuffer;
use crate::constants::{
    MAX_VLQ_VALUE, STATUS_SYSEX_F0, STATUS_SYSEX_F7,
};
use crate::error::Result;
use crate::handle::HandleTable;
use crate::text::Text;
use crate::vlq;

/// `(status_byte << 24) | buffer_offset`. `0` is the distinguished
/// "no previous selector" sentinel used by the compiler's running-status
/// state machine at the start of a pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Selector(u32);

impl Selector {
    fn new(status: u8, offset: u32) -> Self {
        debug_assert!(offset <= 0x00FF_FFFF);
        Selector((u32::from(status) << 24) | offset)
    }

    pub(crate) fn status(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub(crate) fn offset(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    pub(crate) fn raw(self) -> u32 {
        self.0
    }
}

/// `add_one`: one data byte, statuses `0xC0..=0xDF`.
pub(crate) fn add_one(buffer: &mut MessageBuffer, status: u8, b: u8) -> Result<Selector> {
    if !(0xC0..=0xDF).contains(&status) {
        arg_bail!("add_one requires status in 0xC0..=0xDF, got {:#04X}", status);
    }
    ensure_range!(b, 0, 127, "data byte");
    let offset = buffer.append(&[b])?;
    Ok(Selector::new(status, offset))
}

/// `add_two`: two data bytes, statuses `0x80..=0xBF` or `0xE0..=0xEF`.
pub(crate) fn add_two(buffer: &mut MessageBuffer, status: u8, b1: u8, b2: u8) -> Result<Selector> {
    let in_range = (0x80..=0xBF).contains(&status) || (0xE0..=0xEF).contains(&status);
    if !in_range {
        arg_bail!(
            "add_two requires status in 0x80..=0xBF or 0xE0..=0xEF, got {:#04X}",
            status
        );
    }
    ensure_range!(b1, 0, 127, "first data byte");
    ensure_range!(b2, 0, 127, "second data byte");
    let offset = buffer.append(&[b1, b2])?;
    Ok(Selector::new(status, offset))
}

/// `add_blob_msg`: `0xF0` (normal sysex) or `0xF7` (escape sysex). Adds the
/// blob to the handle table and writes `VLQ(handle_index)` into the
/// message buffer.
pub(crate) fn add_blob_msg(
    buffer: &mut MessageBuffer,
    handles: &mut HandleTable,
    status: u8,
    blob: Blob,
) -> Result<Selector> {
    if status != STATUS_SYSEX_F0 && status != STATUS_SYSEX_F7 {
        arg_bail!("add_blob_msg requires status 0xF0 or 0xF7, got {:#04X}", status);
    }
    if status == STATUS_SYSEX_F0 {
        if blob.is_empty() || blob.bytes()[0] != STATUS_SYSEX_F0 {
            arg_bail!("0xF0 system messages require a non-empty blob starting with 0xF0");
        }
    }
    let index = handles.add_blob(blob)?;
    let bytes = vlq::encode(index)?;
    let offset = buffer.append(&bytes)?;
    Ok(Selector::new(status, offset))
}

/// `add_meta_blob`: `FF (type|0x80) VLQ(handle_index)`, indirect blob
/// payload.
pub(crate) fn add_meta_blob(
    buffer: &mut MessageBuffer,
    handles: &mut HandleTable,
    meta_type: u8,
    blob: Blob,
) -> Result<Selector> {
    ensure_range!(meta_type, 0, 127, "meta event type");
    let index = handles.add_blob(blob)?;
    write_indirect_meta(buffer, meta_type, index)
}

/// `add_meta_text`: `FF (type|0x80) VLQ(handle_index)`, indirect text
/// payload.
pub(crate) fn add_meta_text(
    buffer: &mut MessageBuffer,
    handles: &mut HandleTable,
    meta_type: u8,
    text: Text,
) -> Result<Selector> {
    ensure_range!(meta_type, 0, 127, "meta event type");
    let index = handles.add_text(text)?;
    write_indirect_meta(buffer, meta_type, index)
}

fn write_indirect_meta(buffer: &mut MessageBuffer, meta_type: u8, index: u32) -> Result<Selector> {
    let mut tail = vec![meta_type | 0x80];
    tail.extend(vlq::encode(index)?);
    let offset = buffer.append(&tail)?;
    Ok(Selector::new(crate::constants::STATUS_META, offset))
}

/// `add_meta_data`: `FF type VLQ(len) bytes`, direct payload copied
/// straight into the message buffer.
pub(crate) fn add_meta_data(buffer: &mut MessageBuffer, meta_type: u8, data: &[u8]) -> Result<Selector> {
    ensure_range!(meta_type, 0, 127, "meta event type");
    if data.len() as u64 > u64::from(MAX_VLQ_VALUE) {
        sem_bail!("meta event payload of {} bytes exceeds VLQ range", data.len());
    }
    let mut tail = vec![meta_type];
    tail.extend(vlq::encode(data.len() as u32)?);
    tail.extend_from_slice(data);
    let offset = buffer.append(&tail)?;
    Ok(Selector::new(crate::constants::STATUS_META, offset))
}
