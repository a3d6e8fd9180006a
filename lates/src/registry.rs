//! The daily registry.

use std::{fmt, mem};

use lates_core::{
    archive::{ArchiveSink, Entries, LogSink},
    time::{date_in_offset_of, is_new_day, Clock, SystemClock, Timestamp},
    Record,
};
use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use lates_core::time::DateLabel;

#[allow(unused_imports)]
use crate::util::ErrorExt;

/// An in-memory registry holding at most one [`Record`] per key, emptied
/// whenever a new day starts.
///
/// There is no timer. Every call to [`submit`] or [`list_all`] first checks
/// whether the calendar date has moved past the date of the previous call;
/// if it has, every stored record is handed to the [`ArchiveSink`] and the
/// registry starts over empty. The check, the operation itself and the
/// access timestamp update all happen under one lock.
///
/// Share a registry between request handlers with an [`Arc`].
///
/// [`submit`]: DailyRegistry::submit
/// [`list_all`]: DailyRegistry::list_all
/// [`Arc`]: std::sync::Arc
///
/// # Examples
///
/// ```
/// use lates::{DailyRegistry, Record};
///
/// let registry = DailyRegistry::new();
/// registry.submit(Record::new("Ada", true, false));
/// registry.submit(Record::new("Ada", false, true));
///
/// assert_eq!(registry.list_all(), [Record::new("Ada", false, true)]);
/// ```
pub struct DailyRegistry<S = LogSink, C = SystemClock> {
    state: Mutex<State>,
    sink: S,
    clock: C,
}

struct State {
    entries: Entries,
    last_access: Timestamp,
}

impl DailyRegistry {
    /// Creates an empty registry that logs retired records and reads the
    /// local wall-clock time.
    pub fn new() -> Self {
        Self::with_sink(LogSink)
    }
}

impl Default for DailyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ArchiveSink> DailyRegistry<S> {
    /// Creates an empty registry that hands retired records to `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self::with_sink_and_clock(sink, SystemClock)
    }
}

impl<S: ArchiveSink, C: Clock> DailyRegistry<S, C> {
    /// Creates an empty registry with a custom archive sink and clock.
    ///
    /// The registry counts its construction as its first access.
    pub fn with_sink_and_clock(sink: S, clock: C) -> Self {
        let last_access = clock.now();
        DailyRegistry {
            state: Mutex::new(State {
                entries: Entries::new(),
                last_access,
            }),
            sink,
            clock,
        }
    }

    /// Stores `record`, replacing any record with the same key.
    pub fn submit(&self, record: Record) {
        self.access(|entries| {
            entries.insert(record.key().to_owned(), record);
        });
    }

    /// Returns a copy of every stored record, in no particular order.
    ///
    /// If this call starts a new day, the result is empty.
    pub fn list_all(&self) -> Vec<Record> {
        self.access(|entries| entries.values().cloned().collect())
    }

    /// Returns the clock this registry reads the time from.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn access<R>(&self, f: impl FnOnce(&mut Entries) -> R) -> R {
        let mut state = self.state.lock();
        let now = self.clock.now();

        if is_new_day(state.last_access, now) {
            let date = date_in_offset_of(state.last_access, now);
            let retired = mem::take(&mut state.entries);
            debug!(date = %DateLabel(date), count = retired.len(), "new day, clearing lates");

            if let Err(_err) = self.sink.archive(date, retired) {
                error!(
                    err = %_err.display_chain(),
                    date = %DateLabel(date),
                    "failed to archive lates"
                );
            }
        }

        let output = f(&mut state.entries);
        state.last_access = now;
        output
    }
}

impl<S, C> fmt::Debug for DailyRegistry<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DailyRegistry { .. }")
    }
}
