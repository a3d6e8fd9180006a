//! Destinations for records retired at the end of a day.

use std::{collections::HashMap, error::Error as StdError, fmt, sync::Arc};

use time::Date;

use crate::{time::DateLabel, Record};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Records retired by a rollover, keyed by [`Record::key`].
pub type Entries = HashMap<String, Record>;

/// Receives every record a registry discards when a new day starts.
///
/// A sink is called with the registry's lock held, so a slow sink delays
/// every other caller of that registry. Errors are reported by the registry
/// and otherwise ignored: the records are gone either way.
///
/// Closures can be turned into sinks with [`sink_fn`].
pub trait ArchiveSink: 'static + Send + Sync {
    /// Archives `entries`, which were stored on `date`.
    fn archive(&self, date: Date, entries: Entries) -> Result<()>;
}

impl<S: ArchiveSink + ?Sized> ArchiveSink for Arc<S> {
    fn archive(&self, date: Date, entries: Entries) -> Result<()> {
        (**self).archive(date, entries)
    }
}

impl<S: ArchiveSink + ?Sized> ArchiveSink for Box<S> {
    fn archive(&self, date: Date, entries: Entries) -> Result<()> {
        (**self).archive(date, entries)
    }
}

/// Returns a new [`SinkFn`] with the given closure.
///
/// # Examples
///
/// ```
/// use lates_core::archive::{sink_fn, ArchiveSink, Entries, Error};
/// use time::{macros::date, Date};
///
/// let sink = sink_fn(|_date: Date, entries: Entries| -> Result<(), Error> {
///     println!("dropping {} lates", entries.len());
///     Ok(())
/// });
/// sink.archive(date!(2024-03-14), Entries::new()).unwrap();
/// ```
pub fn sink_fn<F>(f: F) -> SinkFn<F>
where
    F: Fn(Date, Entries) -> Result<()> + Send + Sync + 'static,
{
    SinkFn { f }
}

/// An [`ArchiveSink`] implemented by a closure. See [`sink_fn`].
#[derive(Clone, Copy)]
pub struct SinkFn<F> {
    f: F,
}

impl<F> ArchiveSink for SinkFn<F>
where
    F: Fn(Date, Entries) -> Result<()> + Send + Sync + 'static,
{
    fn archive(&self, date: Date, entries: Entries) -> Result<()> {
        (self.f)(date, entries)
    }
}

impl<F> fmt::Debug for SinkFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkFn")
            .field("f", &format_args!("{}", std::any::type_name::<F>()))
            .finish()
    }
}

/// An [`ArchiveSink`] that writes retired records to the `tracing` log.
///
/// Emits one `INFO` event naming the retired date, followed by one `INFO`
/// event per record. Without the `tracing` feature this sink discards
/// everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl ArchiveSink for LogSink {
    fn archive(&self, date: Date, entries: Entries) -> Result<()> {
        let _label = DateLabel(date);
        info!(date = %_label, count = entries.len(), "dumping lates from retired day");
        for (_key, _record) in &entries {
            info!(
                date = %_label,
                key = %_key,
                vegetarian = _record.wants_vegetarian_option(),
                refrigerated = _record.wants_refrigeration(),
                "archived late"
            );
        }
        Ok(())
    }
}

/// An error returned by an [`ArchiveSink`].
pub struct Error {
    kind: ErrorKind,
}

enum ErrorKind {
    Message(Box<str>),
    Sink(Box<dyn StdError + Send + Sync + 'static>),
}

impl Error {
    /// Creates an error from a plain message.
    pub fn message(msg: impl Into<Box<str>>) -> Error {
        Error {
            kind: ErrorKind::Message(msg.into()),
        }
    }

    /// Wraps an error raised by the sink's underlying destination.
    pub fn sink(err: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Error {
        Error {
            kind: ErrorKind::Sink(err.into()),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Message(msg) => f.debug_tuple("Message").field(msg).finish(),
            ErrorKind::Sink(err) => f.debug_tuple("Sink").field(err).finish(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Message(msg) => f.write_str(msg),
            ErrorKind::Sink(_) => f.write_str("archive sink error"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::Message(_) => None,
            ErrorKind::Sink(err) => Some(&**err),
        }
    }
}
