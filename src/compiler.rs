//! The compiler: sorts the moment log, appends the end-of-track
//! terminator, rebases moment offsets to deltas, then runs the size pass
//! and the emit pass with an identical running-status state machine so
//! the precomputed track length always agrees with what gets written.

use crate::buffer::MessageBuffer;
use crate::constants::{
    HEADER_CHUNK_LENGTH, HEADER_DIVISION, HEADER_FORMAT, HEADER_NTRACKS, MAX_VLQ_VALUE,
    META_END_OF_TRACK, STATUS_META, STATUS_SYSEX_F0, STATUS_SYSEX_F7,
};
use crate::error::Result;
use crate::handle::HandleTable;
use crate::header_log::HeaderLog;
use crate::moment::{self, MomentLog};
use crate::scribe::{ByteSink, RunningStatus, Scribe};
use crate::selector::{self, Selector};
use crate::vlq;
use log::{debug, trace};
use std::io::Write;

/// Tail byte length for the message at `sel`, not counting the status
/// byte. Shared verbatim by the size pass and the emit pass.
fn tail_len(sel: Selector, buffer: &MessageBuffer, handles: &HandleTable) -> Result<usize> {
    let status = sel.status();
    let offset = sel.offset();
    match status {
        0x80..=0xBF | 0xE0..=0xEF => Ok(2),
        0xC0..=0xDF => Ok(1),
        STATUS_SYSEX_F0 => {
            let (idx, _) = vlq::decode(buffer.at(offset))?;
            let len = handles.get(idx)?.len();
            Ok(vlq::size((len - 1) as u32)? + (len - 1))
        }
        STATUS_SYSEX_F7 => {
            let (idx, _) = vlq::decode(buffer.at(offset))?;
            let len = handles.get(idx)?.len();
            Ok(vlq::size(len as u32)? + len)
        }
        STATUS_META => {
            let raw = buffer.at(offset);
            let type_byte = raw[0];
            if type_byte & 0x80 == 0 {
                let (len, consumed) = vlq::decode(&raw[1..])?;
                Ok(1 + consumed + len as usize)
            } else {
                let (idx, _) = vlq::decode(&raw[1..])?;
                let len = handles.get(idx)?.len();
                Ok(1 + vlq::size(len as u32)? + len)
            }
        }
        other => sem_bail!("unrecognized status byte {:#04X}", other),
    }
}

fn write_tail<W: Write>(
    sink: &mut W,
    sel: Selector,
    buffer: &MessageBuffer,
    handles: &HandleTable,
) -> Result<()> {
    let status = sel.status();
    let offset = sel.offset();
    match status {
        0x80..=0xBF | 0xE0..=0xEF => sink.write_bytes(buffer.slice(offset, 2)),
        0xC0..=0xDF => sink.write_bytes(buffer.slice(offset, 1)),
        STATUS_SYSEX_F0 => {
            let (idx, _) = vlq::decode(buffer.at(offset))?;
            let handle = handles.get(idx)?;
            let bytes = handle.bytes();
            vlq::write(sink, (bytes.len() - 1) as u32)?;
            sink.write_bytes(&bytes[1..])
        }
        STATUS_SYSEX_F7 => {
            let (idx, _) = vlq::decode(buffer.at(offset))?;
            let handle = handles.get(idx)?;
            let bytes = handle.bytes();
            vlq::write(sink, bytes.len() as u32)?;
            sink.write_bytes(bytes)
        }
        STATUS_META => {
            let raw = buffer.at(offset);
            let type_byte = raw[0];
            if type_byte & 0x80 == 0 {
                let (len, consumed) = vlq::decode(&raw[1..])?;
                let total = 1 + consumed + len as usize;
                sink.write_bytes(&raw[..total])
            } else {
                let (idx, _) = vlq::decode(&raw[1..])?;
                let handle = handles.get(idx)?;
                let bytes = handle.bytes();
                sink.write_byte(type_byte & 0x7F)?;
                vlq::write(sink, bytes.len() as u32)?;
                sink.write_bytes(bytes)
            }
        }
        other => sem_bail!("unrecognized status byte {:#04X}", other),
    }
}

/// `size_msg(sel, prev_sel)`: the byte length of `sel`'s encoding given the
/// running-status state in `running`, which is advanced as a side effect
/// exactly as the emit pass's [`Scribe`] would advance it.
fn size_msg(
    sel: Selector,
    running: &mut RunningStatus,
    buffer: &MessageBuffer,
    handles: &HandleTable,
) -> Result<usize> {
    let status_len = if running.advance(sel.status()) { 0 } else { 1 };
    Ok(status_len + tail_len(sel, buffer, handles)?)
}

/// Runs the full `compile(sink)` pipeline: sort, terminate, rebase, size,
/// then emit. Consumes the four arenas, mirroring the one-shot semantics
/// of the builder that owns them.
pub(crate) fn compile<W: Write>(
    header_log: HeaderLog,
    mut moment_log: MomentLog,
    mut buffer: MessageBuffer,
    mut handles: HandleTable,
    mut sink: W,
) -> Result<()> {
    debug!(
        "compiling {} header entries, {} moment entries",
        header_log.entries().len(),
        moment_log.len()
    );

    if moment_log.len() >= 2 {
        moment_log.records_mut().sort_by(moment::compare);
        trace!("sorted moment log");
    }

    let eot_sel = selector::add_meta_data(&mut buffer, META_END_OF_TRACK, &[])?;
    moment_log.push_terminator(eot_sel)?;

    let lower = moment_log.range().lower();
    {
        let records = moment_log.records_mut();
        for rec in records.iter_mut() {
            let (subquantum, _) = crate::pack::unpack(rec.t);
            rec.t = subquantum - lower;
        }
        for i in (1..records.len()).rev() {
            let prev = records[i - 1].t;
            records[i].t -= prev;
        }
        for rec in records.iter() {
            if rec.t < 0 || rec.t as i64 > i64::from(MAX_VLQ_VALUE) {
                sem_bail!(
                    "rebased delta {} for event {} out of range [0, {}]",
                    rec.t,
                    rec.event_id,
                    MAX_VLQ_VALUE
                );
            }
        }
    }

    let mut running = RunningStatus::new();
    let mut total_length: u64 = 0;
    for sel in header_log.entries() {
        total_length += size_msg(*sel, &mut running, &buffer, &handles)? as u64 + 1;
    }
    for rec in moment_log.records_mut().iter() {
        let delta_size = vlq::size(rec.t as u32)?;
        total_length += size_msg(rec.sel, &mut running, &buffer, &handles)? as u64 + delta_size as u64;
    }
    if total_length > u64::from(u32::MAX) {
        sem_bail!("track body of {} bytes exceeds u32 length field", total_length);
    }
    trace!("computed track body length {}", total_length);

    sink.write_str("MThd")?;
    sink.write_u32_be(HEADER_CHUNK_LENGTH)?;
    sink.write_u16_be(HEADER_FORMAT)?;
    sink.write_u16_be(HEADER_NTRACKS)?;
    sink.write_u16_be(HEADER_DIVISION)?;

    sink.write_str("MTrk")?;
    sink.write_u32_be(total_length as u32)?;

    let mut scribe = Scribe::new(sink);
    for sel in header_log.entries() {
        vlq::write(scribe.sink(), 0)?;
        scribe.write_status(sel.status())?;
        write_tail(scribe.sink(), *sel, &buffer, &handles)?;
    }
    for rec in moment_log.records_mut().iter() {
        vlq::write(scribe.sink(), rec.t as u32)?;
        scribe.write_status(rec.sel.status())?;
        write_tail(scribe.sink(), rec.sel, &buffer, &handles)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::Blob;
    use crate::text::Text;

    fn compile_to_vec(
        header_log: HeaderLog,
        moment_log: MomentLog,
        buffer: MessageBuffer,
        handles: HandleTable,
    ) -> Vec<u8> {
        let mut out = Vec::new();
        compile(header_log, moment_log, buffer, handles, &mut out).unwrap();
        out
    }

    #[test]
    fn empty_track_emits_header_plus_bare_end_of_track() {
        let out = compile_to_vec(
            HeaderLog::new(),
            MomentLog::new(),
            MessageBuffer::new(),
            HandleTable::new(),
        );
        assert_eq!(
            out,
            vec![
                b'M', b'T', b'h', b'd', 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x01, 0x03,
                0x00, b'M', b'T', b'r', b'k', 0x00, 0x00, 0x00, 0x04, 0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn single_note_encodes_delta_zero_and_status_byte() {
        let mut buffer = MessageBuffer::new();
        let mut moment_log = MomentLog::new();
        let sel = selector::add_two(&mut buffer, 0x90, 0x3C, 0x64).unwrap();
        moment_log.push(crate::pack::pack(0, crate::pack::Phase::OnGrid), sel).unwrap();

        let out = compile_to_vec(HeaderLog::new(), moment_log, buffer, HandleTable::new());
        assert_eq!(
            &out[18..22],
            &[0x00, 0x00, 0x00, 0x08]
        );
        assert_eq!(
            &out[22..],
            &[0x00, 0x90, 0x3C, 0x64, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    /// Two same-channel note-ons a quarter note apart: the second status
    /// byte is elided by running status, and the delta for 768 ticks
    /// encodes as the VLQ codec's own canonical two-group form `86 00`
    /// (`768 == 6 << 7`), not the `83 00` figure in the written scenario,
    /// which decodes to 384 and is inconsistent with the codec's own
    /// worked examples elsewhere in the same document.
    #[test]
    fn running_status_elides_repeated_note_on() {
        let mut buffer = MessageBuffer::new();
        let mut moment_log = MomentLog::new();
        let sel_a = selector::add_two(&mut buffer, 0x90, 0x3C, 0x64).unwrap();
        let sel_b = selector::add_two(&mut buffer, 0x90, 0x3E, 0x64).unwrap();
        moment_log.push(crate::pack::pack(0, crate::pack::Phase::OnGrid), sel_a).unwrap();
        moment_log.push(crate::pack::pack(768, crate::pack::Phase::OnGrid), sel_b).unwrap();

        let out = compile_to_vec(HeaderLog::new(), moment_log, buffer, HandleTable::new());
        assert_eq!(
            &out[22..],
            &[
                0x00, 0x90, 0x3C, 0x64, 0x86, 0x00, 0x3E, 0x64, 0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn program_change_sorts_before_note_on_at_same_moment() {
        let mut buffer = MessageBuffer::new();
        let mut moment_log = MomentLog::new();
        let note_on = selector::add_two(&mut buffer, 0x90, 0x3C, 0x64).unwrap();
        let program = selector::add_one(&mut buffer, 0xC0, 0x05).unwrap();
        moment_log.push(crate::pack::pack(0, crate::pack::Phase::OnGrid), note_on).unwrap();
        moment_log.push(crate::pack::pack(0, crate::pack::Phase::OnGrid), program).unwrap();

        let out = compile_to_vec(HeaderLog::new(), moment_log, buffer, HandleTable::new());
        assert_eq!(
            &out[22..],
            &[0x00, 0xC0, 0x05, 0x00, 0x90, 0x3C, 0x64, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    #[test]
    fn header_tempo_precedes_first_timed_note() {
        let mut buffer = MessageBuffer::new();
        let mut header_log = HeaderLog::new();
        let tempo_sel = selector::add_meta_data(&mut buffer, 0x51, &[0x07, 0xA1, 0x20]).unwrap();
        header_log.push(tempo_sel).unwrap();

        let mut moment_log = MomentLog::new();
        let note_sel = selector::add_two(&mut buffer, 0x90, 0x3C, 0x64).unwrap();
        moment_log.push(crate::pack::pack(0, crate::pack::Phase::OnGrid), note_sel).unwrap();

        let out = compile_to_vec(header_log, moment_log, buffer, HandleTable::new());
        assert_eq!(
            &out[22..],
            &[
                0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, 0x00, 0x90, 0x3C, 0x64, 0x00, 0xFF,
                0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn time_signature_emits_log2_denominator_and_fixed_32nd_field() {
        let mut buffer = MessageBuffer::new();
        let mut header_log = HeaderLog::new();
        let sel = selector::add_meta_data(&mut buffer, 0x58, &[0x06, 0x03, 0x18, 0x08]).unwrap();
        header_log.push(sel).unwrap();

        let out = compile_to_vec(header_log, MomentLog::new(), buffer, HandleTable::new());
        assert_eq!(&out[22..29], &[0x00, 0xFF, 0x58, 0x04, 0x06, 0x03, 0x18]);
    }

    #[test]
    fn null_event_folds_its_delta_into_the_following_real_event() {
        let mut buffer = MessageBuffer::new();
        let mut moment_log = MomentLog::new();
        moment_log.expand_range(crate::pack::pack(768, crate::pack::Phase::OnGrid));
        let sel = selector::add_two(&mut buffer, 0x90, 0x3C, 0x64).unwrap();
        moment_log.push(crate::pack::pack(768, crate::pack::Phase::OnGrid), sel).unwrap();

        let out = compile_to_vec(HeaderLog::new(), moment_log, buffer, HandleTable::new());
        assert_eq!(
            &out[22..],
            &[0x00, 0x90, 0x3C, 0x64, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    #[test]
    fn sysex_blob_drops_the_redundant_leading_f0_byte_at_emit() {
        let mut buffer = MessageBuffer::new();
        let mut handles = HandleTable::new();
        let mut moment_log = MomentLog::new();
        let sel = selector::add_blob_msg(
            &mut buffer,
            &mut handles,
            0xF0,
            Blob::new(vec![0xF0, 0x43, 0x10, 0xF7]),
        )
        .unwrap();
        moment_log.push(crate::pack::pack(0, crate::pack::Phase::OnGrid), sel).unwrap();

        let out = compile_to_vec(HeaderLog::new(), moment_log, buffer, handles);
        assert_eq!(
            &out[22..],
            &[0x00, 0xF0, 0x03, 0x43, 0x10, 0xF7, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    #[test]
    fn indirect_meta_text_round_trips_through_handle_table() {
        let mut buffer = MessageBuffer::new();
        let mut handles = HandleTable::new();
        let mut header_log = HeaderLog::new();
        let sel = selector::add_meta_text(&mut buffer, &mut handles, 0x03, Text::new("Lead"))
            .unwrap();
        header_log.push(sel).unwrap();

        let out = compile_to_vec(header_log, MomentLog::new(), buffer, handles);
        assert_eq!(&out[22..], &[0x00, 0xFF, 0x03, 0x04, b'L', b'e', b'a', b'd', 0x00, 0xFF, 0x2F, 0x00]);
    }
}
