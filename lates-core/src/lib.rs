//! Core types shared by the `lates` crates: the stored [`Record`], the
//! [`Clock`] a registry reads the time from, and the [`ArchiveSink`] that
//! receives retired records.
//!
//! [`Clock`]: crate::time::Clock
//! [`ArchiveSink`]: crate::archive::ArchiveSink

#[doc(inline)]
pub use crate::archive::{sink_fn, ArchiveSink, Entries, LogSink};
#[doc(inline)]
pub use crate::record::Record;
#[doc(inline)]
pub use crate::time::{Clock, OffsetClock, SystemClock, Timestamp};

#[macro_use]
mod macros;

pub mod archive;
pub mod record;
pub mod time;
