use midi_assembler::pack::{pack, Phase};
use midi_assembler::{GeneralMidi, MidiFileBuilder};
use std::fs::File;

// durations, in subquantum units (768 per quarter note)
const QUARTER: i32 = 768;
const EIGHTH: i32 = QUARTER / 2;
const DOTTED_QUARTER: i32 = QUARTER + EIGHTH;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut builder = MidiFileBuilder::new();

    // header: track metadata, instrument, time signature and tempo
    builder.track_name(0, true, "Singer")?;
    builder.instrument_name(0, true, "Alto")?;
    builder.set_general_midi(0, true, 1, GeneralMidi::SynthVoice)?;
    builder.time_sig(0, true, 6, 8, 24)?;
    builder.tempo(0, true, 517_241)?;

    // measures: lyric and note-on land at the same subquantum as a grace
    // event, note-off lands at the moment the duration elapses
    let mut t = 0;
    for (lyric, duration) in [
        ("Row", DOTTED_QUARTER),
        ("row", DOTTED_QUARTER),
        ("row", QUARTER),
        ("your", EIGHTH),
        ("boat", DOTTED_QUARTER),
    ] {
        builder.lyric(pack(t, Phase::OnGrid), false, lyric)?;
        builder.message(pack(t, Phase::Grace), false, 1, 0x9, 60, 64)?;
        t += duration;
        builder.message(pack(t, Phase::OnGrid), false, 1, 0x8, 60, 64)?;
    }

    let file = File::create("row_row_row_your_boat.mid")?;
    builder.compile(file)?;
    Ok(())
}
