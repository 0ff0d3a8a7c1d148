//! Filter engine contract and scheduling for Pelagos.
//!
//! The [`FilterEngine`] trait is a `&self` pass over a split-borrow
//! [`FilterContext`] (read view, write view, constant bank). The
//! [`FilterSchedule`] decides which engines are due on an iteration and
//! performs the matched constants upload and download around each pass.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod engine;
pub mod report;
pub mod schedule;

pub use context::{FilterContext, PassParams};
pub use engine::{Cadence, FilterEngine};
pub use report::FilterReport;
pub use schedule::{ConfigError, FilterSchedule, PassRecord, ScheduleError};
