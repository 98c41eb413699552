//! Error taxonomy for the assembler.
//!
//! Every fallible operation in this crate returns one of the kinds below,
//! matching the programmer/capacity/semantic/I-O taxonomy that the wire
//! format itself imposes: arguments either fit the format or they don't,
//! the arenas either have room or they don't, and the sink either accepts
//! the bytes or it doesn't.

use snafu::Snafu;

/// The public `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

macro_rules! site {
    () => {
        format!("{}:{}", file!(), line!())
    };
}

/// The public `Error` type for this crate.
#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum Error {
    /// An argument was outside the range the wire format allows: a channel
    /// outside `1..=16`, a non power-of-two time signature denominator, a
    /// sysex body claiming status `0xF0` without a leading `0xF0` byte, and
    /// so on. The caller asked for something the format can never
    /// represent.
    #[snafu(display("{}: invalid argument: {}", site, description))]
    Argument { site: String, description: String },

    /// One of the builder's internal arenas (handle table, message buffer,
    /// header log, moment log) or the event-ID counter would exceed its
    /// hard ceiling.
    #[snafu(display("{}: capacity exceeded: {}", site, description))]
    Capacity { site: String, description: String },

    /// A value is only out of range after some internal computation: a
    /// VLQ that would need a fifth byte, a rebased delta time that
    /// overflowed, a running track-length total that overflowed `u32`.
    #[snafu(display("{}: semantic error: {}", site, description))]
    Semantic { site: String, description: String },

    /// The sink returned an I/O error while `compile` was writing bytes.
    #[snafu(display("{}: I/O error while writing: {}", site, source))]
    Io {
        site: String,
        source: std::io::Error,
    },
}

macro_rules! arg_bail {
    ($($arg:tt)*) => {
        return crate::error::Argument { site: site!(), description: format!($($arg)*) }.fail()
    };
}

macro_rules! cap_bail {
    ($($arg:tt)*) => {
        return crate::error::Capacity { site: site!(), description: format!($($arg)*) }.fail()
    };
}

macro_rules! sem_bail {
    ($($arg:tt)*) => {
        return crate::error::Semantic { site: site!(), description: format!($($arg)*) }.fail()
    };
}

macro_rules! io {
    () => {
        crate::error::Io { site: site!() }
    };
}

#[test]
fn site_test() {
    let line = line!() + 1;
    let site = site!();
    assert!(site.contains("error.rs"));
    assert!(site.contains(format!("{}", line).as_str()));
}

#[test]
fn arg_bail_carries_site_and_message() {
    fn foo() -> Result<u64> {
        arg_bail!("channel {} out of range", 99);
    }
    let err = foo().unwrap_err();
    let message = format!("{}", err);
    assert!(message.contains("error.rs"));
    assert!(message.contains("channel 99 out of range"));
}

#[test]
fn cap_bail_carries_message() {
    fn foo() -> Result<u64> {
        cap_bail!("handle table full");
    }
    let message = format!("{}", foo().unwrap_err());
    assert!(message.contains("handle table full"));
}

#[test]
fn sem_bail_carries_message() {
    fn foo() -> Result<u64> {
        sem_bail!("delta {} overflows VLQ range", 1u64 << 40);
    }
    let message = format!("{}", foo().unwrap_err());
    assert!(message.contains("overflows VLQ range"));
}
