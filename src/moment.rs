//! Moment log and event range: the ordered sequence of timed events plus
//! the sort that imposes a deterministic total order at compile time.

use crate::constants::MAX_MOMENT_LEN;
use crate::error::Result;
use crate::pack::{unpack, Phase};
use crate::selector::Selector;
use log::warn;
use std::cmp::Ordering;

/// One timed event: a monotonically assigned ID, a packed moment offset,
/// and the selector for the message it carries.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MomentRecord {
    pub(crate) event_id: i32,
    pub(crate) t: i32,
    pub(crate) sel: Selector,
}

/// Tracks the minimum and maximum unpacked subquantum offset seen across
/// every call that targets the moment log, including `null` events (which
/// expand the range without creating a record).
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct EventRange {
    filled: bool,
    lower: i32,
    upper: i32,
}

impl EventRange {
    pub(crate) fn expand(&mut self, subquantum: i32) {
        if !self.filled {
            self.filled = true;
            self.lower = subquantum;
            self.upper = subquantum;
        } else {
            self.lower = self.lower.min(subquantum);
            self.upper = self.upper.max(subquantum);
        }
    }

    pub(crate) fn lower(&self) -> i32 {
        self.lower
    }

    pub(crate) fn upper(&self) -> i32 {
        self.upper
    }

    pub(crate) fn filled(&self) -> bool {
        self.filled
    }
}

/// Ordered sequence of [`MomentRecord`]s, plus the running [`EventRange`].
#[derive(Debug, Default)]
pub(crate) struct MomentLog {
    records: Vec<MomentRecord>,
    next_event_id: i32,
    range: EventRange,
}

impl MomentLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> Result<i32> {
        self.next_event_id = self
            .next_event_id
            .checked_add(1)
            .ok_or_else(|| crate::error::Error::Capacity {
                site: site!(),
                description: "event ID counter saturated".into(),
            })?;
        Ok(self.next_event_id)
    }

    /// Appends a record at packed moment `t`, expanding the event range by
    /// `t`'s unpacked subquantum component, and returns the newly assigned
    /// event ID.
    pub(crate) fn push(&mut self, t: i32, sel: Selector) -> Result<i32> {
        if self.records.len() >= MAX_MOMENT_LEN {
            warn!("moment log growth rejected at {} entries (max {})", self.records.len(), MAX_MOMENT_LEN);
            cap_bail!("moment log full (max {} entries)", MAX_MOMENT_LEN);
        }
        let event_id = self.next_id()?;
        let (subquantum, _) = unpack(t);
        self.range.expand(subquantum);
        self.records.push(MomentRecord { event_id, t, sel });
        Ok(event_id)
    }

    /// `null`: expands the event range at `t`'s unpacked subquantum
    /// component without creating a moment-log record or consuming an
    /// event ID, since there is no selector to sort or emit.
    pub(crate) fn expand_range(&mut self, t: i32) {
        let (subquantum, _) = unpack(t);
        self.range.expand(subquantum);
    }

    /// Appends the end-of-track terminator at `pack(upper, Phase::EndOfMoment)`,
    /// which sorts strictly after every real event regardless of where it
    /// falls, without perturbing the event range (terminators are not
    /// musical data).
    pub(crate) fn push_terminator(&mut self, sel: Selector) -> Result<()> {
        if self.records.len() >= MAX_MOMENT_LEN {
            warn!("moment log growth rejected at {} entries (max {})", self.records.len(), MAX_MOMENT_LEN);
            cap_bail!("moment log full (max {} entries)", MAX_MOMENT_LEN);
        }
        let event_id = self.next_id()?;
        let t = crate::pack::pack(self.range.upper(), Phase::EndOfMoment);
        self.records.push(MomentRecord { event_id, t, sel });
        Ok(())
    }

    pub(crate) fn range(&self) -> EventRange {
        self.range
    }

    pub(crate) fn records_mut(&mut self) -> &mut Vec<MomentRecord> {
        &mut self.records
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

/// Folds `0xF0..=0xFF` to `0xF0` so sysex and meta events stay adjacent in
/// sort order without interleaving by exact status code.
fn folded_status(status: u8) -> u8 {
    if status >= 0xF0 {
        0xF0
    } else {
        status
    }
}

/// `true` iff `status` is note-off or note-on (`0x80..=0xAF`); these sort
/// strictly after every other status class at the same moment.
fn is_note_class(status: u8) -> bool {
    (0x80..=0xAF).contains(&status)
}

/// The four-level comparator: moment offset, then status class, then
/// folded status byte, then event ID as the stable tie-break.
pub(crate) fn compare(a: &MomentRecord, b: &MomentRecord) -> Ordering {
    a.t.cmp(&b.t)
        .then_with(|| is_note_class(a.sel.status()).cmp(&is_note_class(b.sel.status())))
        .then_with(|| folded_status(a.sel.status()).cmp(&folded_status(b.sel.status())))
        .then_with(|| a.event_id.cmp(&b.event_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MessageBuffer;

    fn sel(status: u8) -> Selector {
        let mut buf = MessageBuffer::new();
        match status {
            0xC0..=0xDF => crate::selector::add_one(&mut buf, status, 0).unwrap(),
            _ => crate::selector::add_two(&mut buf, status, 0, 0).unwrap(),
        }
    }

    #[test]
    fn class_ordering_puts_program_change_before_note_on_at_same_moment() {
        let note_on = MomentRecord { event_id: 1, t: 0, sel: sel(0x90) };
        let program_change = MomentRecord { event_id: 2, t: 0, sel: sel(0xC0) };
        assert_eq!(compare(&program_change, &note_on), Ordering::Less);
    }

    #[test]
    fn ties_break_on_event_id() {
        let a = MomentRecord { event_id: 1, t: 0, sel: sel(0x90) };
        let b = MomentRecord { event_id: 2, t: 0, sel: sel(0x91) };
        assert_eq!(compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn moment_offset_dominates_other_keys() {
        let later = MomentRecord { event_id: 1, t: 100, sel: sel(0xC0) };
        let earlier = MomentRecord { event_id: 2, t: 0, sel: sel(0x90) };
        assert_eq!(compare(&earlier, &later), Ordering::Less);
    }

    #[test]
    fn event_range_tracks_min_and_max_subquantum() {
        let mut range = EventRange::default();
        assert!(!range.filled());
        range.expand(10);
        range.expand(-5);
        range.expand(3);
        assert!(range.filled());
        assert_eq!(range.lower(), -5);
        assert_eq!(range.upper(), 10);
    }

    #[test]
    fn null_events_expand_range_without_creating_a_record() {
        let mut log = MomentLog::new();
        log.expand_range(crate::pack::pack(42, Phase::OnGrid));
        assert_eq!(log.len(), 0);
        assert_eq!(log.range().upper(), 42);
    }
}
