//! `midi_assembler` is an accumulating builder for Standard MIDI Files.
//!
//! Callers insert events in any order, tagged with a packed moment offset
//! from [`pack`], and call [`MidiFileBuilder::compile`] once to sort,
//! delta-encode, and emit a Format 0 single-track file to any
//! [`std::io::Write`] sink.
//!
//! ```
//! use midi_assembler::{MidiFileBuilder, pack::{pack, Phase}};
//!
//! let mut builder = MidiFileBuilder::new();
//! builder.track_name(0, true, "Lead").unwrap();
//! builder.message(pack(0, Phase::OnGrid), false, 1, 0x9, 60, 100).unwrap();
//! builder.message(pack(768, Phase::OnGrid), false, 1, 0x8, 60, 0).unwrap();
//!
//! let mut bytes = Vec::new();
//! builder.compile(&mut bytes).unwrap();
//! assert_eq!(&bytes[0..4], b"MThd");
//! ```

#[macro_use]
mod error;
#[macro_use]
mod macros;

mod blob;
mod builder;
mod buffer;
mod compiler;
pub mod constants;
pub mod general_midi;
mod handle;
mod header_log;
mod moment;
pub mod pack;
mod scribe;
mod selector;
pub mod text;
mod vlq;

pub use blob::Blob;
pub use builder::MidiFileBuilder;
pub use error::{Error, Result};
pub use general_midi::GeneralMidi;
pub use text::Text;

// https://www.midi.org/specifications-old/item/the-complete-midi-1-0-detailed-specification
// https://www.music.mcgill.ca/~gary/306/week9/smf.html
