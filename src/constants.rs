//! Wire-level constants for the Standard MIDI File format this crate
//! emits: the status byte ranges from Table I of the MIDI spec, and the
//! fixed header/meta values spec'd for SMF Format 0.

/// `0x80`-`0x8F`: Note Off.
pub(crate) const STATUS_NOTE_OFF: u8 = 0x80;
/// `0x90`-`0x9F`: Note On.
pub(crate) const STATUS_NOTE_ON: u8 = 0x90;
/// `0xA0`-`0xAF`: Polyphonic Key Pressure (Aftertouch).
pub(crate) const STATUS_POLY_AFTERTOUCH: u8 = 0xA0;
/// `0xB0`-`0xBF`: Control Change.
pub(crate) const STATUS_CONTROL: u8 = 0xB0;
/// `0xC0`-`0xCF`: Program Change.
pub(crate) const STATUS_PROGRAM: u8 = 0xC0;
/// `0xD0`-`0xDF`: Channel Pressure (Aftertouch).
pub(crate) const STATUS_CHANNEL_AFTERTOUCH: u8 = 0xD0;
/// `0xE0`-`0xEF`: Pitch Bend Change.
pub(crate) const STATUS_PITCH_BEND: u8 = 0xE0;

/// `0xF0`: Normal SysEx. The blob's first byte repeats this status byte.
pub(crate) const STATUS_SYSEX_F0: u8 = 0xF0;
/// `0xF7`: Escape SysEx / "everything after this is raw bytes".
pub(crate) const STATUS_SYSEX_F7: u8 = 0xF7;
/// `0xFF`: Meta event.
pub(crate) const STATUS_META: u8 = 0xFF;

/// `FF 2F 00`: End of Track, mandatory and always last.
pub(crate) const META_END_OF_TRACK: u8 = 0x2F;
/// `FF 51 03 tt tt tt`: Set Tempo (microseconds per quarter note).
pub(crate) const META_SET_TEMPO: u8 = 0x51;
/// `FF 58 04 nn dd cc bb`: Time Signature.
pub(crate) const META_TIME_SIGNATURE: u8 = 0x58;
/// `FF 59 02 sf mi`: Key Signature.
pub(crate) const META_KEY_SIGNATURE: u8 = 0x59;
/// `FF 7F len data`: Sequencer-Specific meta event, used for `custom`.
pub(crate) const META_SEQUENCER_SPECIFIC: u8 = 0x7F;

/// The legal meta-text subtypes, `FF 01`..`FF 09`, usable through
/// [`crate::MidiFileBuilder::text`].
pub mod text_class {
    /// `FF 01`: generic text.
    pub const TEXT: u8 = 0x01;
    /// `FF 02`: copyright notice.
    pub const COPYRIGHT: u8 = 0x02;
    /// `FF 03`: sequence/track name.
    pub const TRACK_NAME: u8 = 0x03;
    /// `FF 04`: instrument name.
    pub const INSTRUMENT_NAME: u8 = 0x04;
    /// `FF 05`: lyric.
    pub const LYRIC: u8 = 0x05;
    /// `FF 06`: marker.
    pub const MARKER: u8 = 0x06;
    /// `FF 07`: cue point.
    pub const CUE_POINT: u8 = 0x07;
    /// `FF 08`: program name.
    pub const PROGRAM_NAME: u8 = 0x08;
    /// `FF 09`: device name.
    pub const DEVICE_NAME: u8 = 0x09;
}

/// Format 0: a single multi-channel track.
pub(crate) const HEADER_FORMAT: u16 = 0;
/// Exactly one track chunk follows the header.
pub(crate) const HEADER_NTRACKS: u16 = 1;
/// Division: 768 ticks per quarter note, metrical (bit 15 clear).
pub(crate) const HEADER_DIVISION: u16 = 768;
/// The header chunk body is always exactly 6 bytes.
pub(crate) const HEADER_CHUNK_LENGTH: u32 = 6;

/// `0x0FFFFFFF`: the largest value a VLQ (and thus a handle index, buffer
/// length, or delta time) can represent in this format.
pub(crate) const MAX_VLQ_VALUE: u32 = 0x0FFF_FFFF;

/// Hard ceiling on the handle table (spec'd capacity, informative but
/// enforced).
pub(crate) const MAX_HANDLES: usize = 16_384;
/// Hard ceiling on the message buffer; the 24-bit offset field in a
/// [`crate::selector::Selector`] cannot address past this.
pub(crate) const MAX_BUFFER_LEN: usize = 0x00FF_FFFF;
/// Hard ceiling on the header log.
pub(crate) const MAX_HEADER_LEN: usize = 16_384;
/// Hard ceiling on the moment log.
pub(crate) const MAX_MOMENT_LEN: usize = 8_388_608;
