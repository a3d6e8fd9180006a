//! A registry of late-meal requests that empties itself once a day.
//!
//! The heart of this crate is [`DailyRegistry`], a thread-safe map from a
//! requester's name to their [`Record`]. Records live until the first access
//! on a later calendar day, at which point they are handed to an
//! [`ArchiveSink`] and dropped.
//!
//! With the `axum` feature (enabled by default), [`web::router`] serves a
//! small HTML form on top of a registry.
//!
//! [`ArchiveSink`]: lates_core::ArchiveSink

#[doc(inline)]
pub use lates_core::{
    archive,
    time::{Clock, OffsetClock, SystemClock, Timestamp},
    Record,
};
#[doc(inline)]
pub use registry::DailyRegistry;

#[macro_use]
mod macros;

pub mod registry;
#[cfg(feature = "axum")]
pub mod web;

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
mod util;
