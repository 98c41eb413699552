mod utils;

use midi_assembler::pack::{pack, Phase};
use midi_assembler::{GeneralMidi, MidiFileBuilder};
use utils::enable_logging;

const QUARTER: i32 = 768;
const EIGHTH: i32 = QUARTER / 2;
const DOTTED_QUARTER: i32 = QUARTER + EIGHTH;

/// Builds a short "Row, Row, Row Your Boat" fragment exercising most of the
/// public event API at once, then checks the structural shape of the
/// emitted file rather than re-deriving every byte (the exact wire layout
/// is already pinned down in the compiler's own boundary-scenario tests).
#[test]
fn row_row_row_your_boat_compiles_to_a_well_formed_file() {
    enable_logging();

    let mut builder = MidiFileBuilder::new();
    builder.track_name(0, true, "Singer").unwrap();
    builder.instrument_name(0, true, "Alto").unwrap();
    builder
        .set_general_midi(0, true, 1, GeneralMidi::SynthVoice)
        .unwrap();
    builder.time_sig(0, true, 6, 8, 24).unwrap();
    builder.tempo(0, true, 517_241).unwrap();

    let mut t = 0;
    for (lyric, duration) in [
        ("Row", DOTTED_QUARTER),
        ("row", DOTTED_QUARTER),
        ("row", QUARTER),
        ("your", EIGHTH),
        ("boat", DOTTED_QUARTER),
    ] {
        builder.lyric(pack(t, Phase::OnGrid), false, lyric).unwrap();
        builder
            .message(pack(t, Phase::Grace), false, 1, 0x9, 60, 64)
            .unwrap();
        t += duration;
        builder
            .message(pack(t, Phase::OnGrid), false, 1, 0x8, 60, 64)
            .unwrap();
    }

    let mut bytes = Vec::new();
    builder.compile(&mut bytes).unwrap();

    assert_eq!(&bytes[0..4], b"MThd");
    let header_len = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
    assert_eq!(header_len, 6);
    assert_eq!(&bytes[14..18], b"MTrk");
    let track_len = u32::from_be_bytes(bytes[18..22].try_into().unwrap());
    assert_eq!(bytes.len(), 22 + track_len as usize);
    assert_eq!(&bytes[bytes.len() - 3..], &[0xFF, 0x2F, 0x00]);

    // the program change must actually carry SynthVoice's patch number in
    // its data byte, not leave it stranded in the ignored `idx` argument
    let track_body = &bytes[22..22 + track_len as usize];
    let program_pos = track_body
        .iter()
        .position(|&b| b == 0xC0)
        .expect("program change status byte present in header");
    assert_eq!(track_body[program_pos + 1], GeneralMidi::SynthVoice.as_u8());
}

#[test]
fn empty_builder_compiles_to_header_plus_end_of_track() {
    enable_logging();
    let builder = MidiFileBuilder::new();
    let mut bytes = Vec::new();
    builder.compile(&mut bytes).unwrap();
    assert_eq!(
        bytes,
        vec![
            b'M', b'T', b'h', b'd', 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x01, 0x03, 0x00,
            b'M', b'T', b'r', b'k', 0x00, 0x00, 0x00, 0x04, 0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn invalid_events_are_rejected_before_compile() {
    enable_logging();
    let mut builder = MidiFileBuilder::new();
    assert!(builder.time_sig(0, true, 4, 5, 24).is_err());
    assert!(builder.message(0, false, 0, 0x9, 60, 100).is_err());
    assert!(builder.message(0, false, 1, 0x9, 200, 100).is_err());
    assert!(builder.key_sig(0, true, -8, false).is_err());
}

#[test]
fn system_exclusive_round_trips_through_the_handle_table() {
    enable_logging();
    let mut builder = MidiFileBuilder::new();
    builder
        .system(pack(0, Phase::OnGrid), false, vec![0xF0u8, 0x43, 0x10, 0xF7])
        .unwrap();
    let mut bytes = Vec::new();
    builder.compile(&mut bytes).unwrap();
    // delta 0, F0, len 3 (leading 0xF0 dropped), payload, then EOT
    assert_eq!(
        &bytes[22..],
        &[0x00, 0xF0, 0x03, 0x43, 0x10, 0xF7, 0x00, 0xFF, 0x2F, 0x00]
    );
}
