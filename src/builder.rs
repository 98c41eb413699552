//! Public event API: the typed façade over the selector/handle/buffer/log
//! machinery, and the one-shot `compile` that turns it into a Standard
//! MIDI File.

use crate::blob::Blob;
use crate::buffer::MessageBuffer;
use crate::compiler;
use crate::constants::text_class;
use crate::error::Result;
use crate::general_midi::GeneralMidi;
use crate::handle::HandleTable;
use crate::header_log::HeaderLog;
use crate::moment::MomentLog;
use crate::selector::{self, Selector};
use crate::text::Text;
use log::trace;
use std::io::Write;

/// An accumulating builder for a single-track Standard MIDI File. Callers
/// insert events in any order tagged with a packed moment offset (build
/// one with [`crate::pack::pack`]), then call [`MidiFileBuilder::compile`]
/// once to sort, delta-encode, and emit the finished file.
///
/// `compile` takes `self` by value, so there is no runtime "already
/// compiled" state to check: a builder that has been compiled no longer
/// exists to call anything else on.
#[derive(Debug, Default)]
pub struct MidiFileBuilder {
    buffer: MessageBuffer,
    handles: HandleTable,
    header_log: HeaderLog,
    moment_log: MomentLog,
}

impl MidiFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, t: i32, head: bool, sel: Selector) -> Result<()> {
        if head {
            self.header_log.push(sel)
        } else {
            self.moment_log.push(t, sel).map(|_| ())
        }
    }

    /// Declares moment `t` occupied without emitting any message. Only
    /// meaningful when `head` is `false`; a header-log `null` is a no-op.
    pub fn null(&mut self, t: i32, head: bool) -> Result<()> {
        if !head {
            self.moment_log.expand_range(t);
        }
        Ok(())
    }

    /// `FF (class|0x80) VLQ(handle)`: a meta-text event. `class` must be
    /// one of the subtypes in [`crate::constants::text_class`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Argument`] if `class` is outside `0..=127`.
    /// Returns [`crate::Error::Capacity`] if the handle table or message
    /// buffer is full.
    pub fn text(&mut self, t: i32, head: bool, class: u8, text: impl Into<Text>) -> Result<()> {
        ensure_range!(class, 0, 127, "meta-text class");
        let sel = selector::add_meta_text(&mut self.buffer, &mut self.handles, class, text.into())?;
        self.insert(t, head, sel)
    }

    /// `FF 51 03 tt tt tt`: Set Tempo, in microseconds per quarter note.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Argument`] if `microseconds_per_quarter` is
    /// `0` or exceeds `0x00FF_FFFF`. Returns [`crate::Error::Capacity`] if
    /// the message buffer is full.
    pub fn tempo(&mut self, t: i32, head: bool, microseconds_per_quarter: u32) -> Result<()> {
        ensure_range!(microseconds_per_quarter, 1, 0x00FF_FFFF, "microseconds per quarter note");
        let bytes = microseconds_per_quarter.to_be_bytes();
        let sel = selector::add_meta_data(&mut self.buffer, 0x51, &bytes[1..])?;
        self.insert(t, head, sel)
    }

    /// `FF 58 04 nn dd cc 08`: Time Signature. `denom` must be an exact
    /// power of two; `denom == 0` is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Argument`] if `num` or `metro` is `0`, or if
    /// `denom` is not an exact power of two. Returns
    /// [`crate::Error::Capacity`] if the message buffer is full.
    pub fn time_sig(&mut self, t: i32, head: bool, num: u8, denom: u8, metro: u8) -> Result<()> {
        if num == 0 {
            arg_bail!("time signature numerator must be >= 1");
        }
        if metro == 0 {
            arg_bail!("time signature metronome interval must be >= 1");
        }
        if denom == 0 || !denom.is_power_of_two() {
            arg_bail!("time signature denominator {} is not a power of two", denom);
        }
        let log2_denom = denom.trailing_zeros() as u8;
        let sel = selector::add_meta_data(&mut self.buffer, 0x58, &[num, log2_denom, metro, 8])?;
        self.insert(t, head, sel)
    }

    /// `FF 59 02 sf mi`: Key Signature. `count` is signed sharps/flats in
    /// `-7..=7`; negative counts are stored as `256 + count`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Argument`] if `count` is outside `-7..=7`.
    /// Returns [`crate::Error::Capacity`] if the message buffer is full.
    pub fn key_sig(&mut self, t: i32, head: bool, count: i8, minor: bool) -> Result<()> {
        ensure_range!(count, -7, 7, "key signature accidental count");
        let sf_byte = if count < 0 {
            (256 + i32::from(count)) as u8
        } else {
            count as u8
        };
        let sel = selector::add_meta_data(&mut self.buffer, 0x59, &[sf_byte, minor as u8])?;
        self.insert(t, head, sel)
    }

    /// `FF 7F len data`: Sequencer-Specific meta event.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Capacity`] if the handle table or message
    /// buffer is full.
    pub fn custom(&mut self, t: i32, head: bool, blob: impl Into<Blob>) -> Result<()> {
        let sel = selector::add_meta_blob(&mut self.buffer, &mut self.handles, 0x7F, blob.into())?;
        self.insert(t, head, sel)
    }

    /// A system-exclusive message. Status is `0xF0` if `blob` is non-empty
    /// and begins with `0xF0` (normal sysex), otherwise `0xF7` (escape
    /// sysex, arbitrary bytes).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Capacity`] if the handle table or message
    /// buffer is full.
    pub fn system(&mut self, t: i32, head: bool, blob: impl Into<Blob>) -> Result<()> {
        let blob = blob.into();
        let status = if !blob.is_empty() && blob.bytes()[0] == crate::constants::STATUS_SYSEX_F0 {
            crate::constants::STATUS_SYSEX_F0
        } else {
            crate::constants::STATUS_SYSEX_F7
        };
        let sel = selector::add_blob_msg(&mut self.buffer, &mut self.handles, status, blob)?;
        self.insert(t, head, sel)
    }

    /// A channel voice message. `ch` is 1-based (`1..=16`); `msg_nibble`
    /// selects the message kind (`0x8`..=`0xE`); `idx`/`val` are
    /// interpreted per kind as in the MIDI channel voice message table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Argument`] if `ch` is outside `1..=16`,
    /// `msg_nibble` is not one of `0x8..=0xE`, or `idx`/`val` fall outside
    /// the range `msg_nibble` allows (`0..=127` for two-byte and one-byte
    /// messages, `0..=16383` for pitch bend). Returns
    /// [`crate::Error::Capacity`] if the message buffer is full.
    pub fn message(&mut self, t: i32, head: bool, ch: u8, msg_nibble: u8, idx: u8, val: u16) -> Result<()> {
        ensure_range!(ch, 1, 16, "MIDI channel");
        let status = (msg_nibble << 4) | (ch - 1);
        let sel = match msg_nibble {
            0x8 | 0x9 | 0xA | 0xB => {
                ensure_range!(idx, 0, 127, "data byte 1");
                ensure_range!(val, 0, 127, "data byte 2");
                selector::add_two(&mut self.buffer, status, idx, val as u8)?
            }
            0xC | 0xD => {
                ensure_range!(val, 0, 127, "data byte");
                selector::add_one(&mut self.buffer, status, val as u8)?
            }
            0xE => {
                ensure_range!(val, 0, 16383, "pitch bend value");
                let lsb = (val & 0x7F) as u8;
                let msb = ((val >> 7) & 0x7F) as u8;
                selector::add_two(&mut self.buffer, status, lsb, msb)?
            }
            other => arg_bail!("unrecognized channel voice message nibble {:#03X}", other),
        };
        self.insert(t, head, sel)
    }

    /// Program change convenience over [`Self::message`]: routes `patch`
    /// into `val`, the argument `message` actually reads for `msg_nibble =
    /// 0xC`, so a caller never has to remember that the generic `idx`
    /// parameter is ignored for program change.
    pub fn set_general_midi(&mut self, t: i32, head: bool, ch: u8, patch: GeneralMidi) -> Result<()> {
        self.message(t, head, ch, 0xC, 0, u16::from(patch.as_u8()))
    }

    /// `FF 03`: sequence/track name convenience over [`Self::text`].
    pub fn track_name(&mut self, t: i32, head: bool, name: impl Into<Text>) -> Result<()> {
        self.text(t, head, text_class::TRACK_NAME, name)
    }

    /// `FF 04`: instrument name convenience over [`Self::text`].
    pub fn instrument_name(&mut self, t: i32, head: bool, name: impl Into<Text>) -> Result<()> {
        self.text(t, head, text_class::INSTRUMENT_NAME, name)
    }

    /// `FF 02`: copyright notice convenience over [`Self::text`].
    pub fn copyright(&mut self, t: i32, head: bool, notice: impl Into<Text>) -> Result<()> {
        self.text(t, head, text_class::COPYRIGHT, notice)
    }

    /// `FF 05`: lyric convenience over [`Self::text`].
    pub fn lyric(&mut self, t: i32, head: bool, syllable: impl Into<Text>) -> Result<()> {
        self.text(t, head, text_class::LYRIC, syllable)
    }

    /// `FF 06`: marker convenience over [`Self::text`].
    pub fn marker(&mut self, t: i32, head: bool, name: impl Into<Text>) -> Result<()> {
        self.text(t, head, text_class::MARKER, name)
    }

    /// `FF 07`: cue point convenience over [`Self::text`].
    pub fn cue(&mut self, t: i32, head: bool, name: impl Into<Text>) -> Result<()> {
        self.text(t, head, text_class::CUE_POINT, name)
    }

    /// The minimum unpacked subquantum offset seen so far, `0` before any
    /// insertion.
    pub fn range_lower(&self) -> i32 {
        self.moment_log.range().lower()
    }

    /// The maximum unpacked subquantum offset seen so far, `0` before any
    /// insertion.
    pub fn range_upper(&self) -> i32 {
        self.moment_log.range().upper()
    }

    /// Sorts, terminates, rebases, and emits the finished Standard MIDI
    /// File to `sink`. One-shot: this consumes the builder.
    pub fn compile<W: Write>(self, sink: W) -> Result<()> {
        trace!("compiling midi file builder");
        compiler::compile(self.header_log, self.moment_log, self.buffer, self.handles, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{pack, Phase};

    #[test]
    fn compiles_a_simple_track_to_bytes() {
        let mut builder = MidiFileBuilder::new();
        builder.track_name(0, true, "Lead").unwrap();
        builder.tempo(0, true, 500_000).unwrap();
        builder
            .message(pack(0, Phase::OnGrid), false, 1, 0x9, 60, 100)
            .unwrap();
        builder
            .message(pack(768, Phase::OnGrid), false, 1, 0x8, 60, 0)
            .unwrap();

        let mut out = Vec::new();
        builder.compile(&mut out).unwrap();
        assert_eq!(&out[0..4], b"MThd");
        assert_eq!(&out[14..18], b"MTrk");
    }

    #[test]
    fn set_general_midi_routes_patch_into_the_value_byte() {
        let mut builder = MidiFileBuilder::new();
        builder
            .set_general_midi(0, true, 1, GeneralMidi::SynthVoice)
            .unwrap();
        let mut out = Vec::new();
        builder.compile(&mut out).unwrap();
        let program_pos = out
            .iter()
            .position(|&b| b == 0xC0)
            .expect("program change status byte present");
        assert_eq!(out[program_pos + 1], GeneralMidi::SynthVoice.as_u8());
    }

    #[test]
    fn rejects_invalid_channel() {
        let mut builder = MidiFileBuilder::new();
        assert!(builder.message(0, false, 0, 0x9, 60, 100).is_err());
        assert!(builder.message(0, false, 17, 0x9, 60, 100).is_err());
    }

    #[test]
    fn rejects_non_power_of_two_denominator() {
        let mut builder = MidiFileBuilder::new();
        assert!(builder.time_sig(0, true, 4, 3, 24).is_err());
        assert!(builder.time_sig(0, true, 4, 0, 24).is_err());
        assert!(builder.time_sig(0, true, 6, 8, 24).is_ok());
    }

    #[test]
    fn range_tracks_null_and_real_events() {
        let mut builder = MidiFileBuilder::new();
        assert_eq!(builder.range_lower(), 0);
        assert_eq!(builder.range_upper(), 0);
        builder.null(pack(1000, Phase::OnGrid), false).unwrap();
        assert_eq!(builder.range_upper(), 1000);
    }
}
