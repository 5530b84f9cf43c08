//! Core engine for emitting Test Anything Protocol (TAP) streams.
//!
//! A [`Reporter`] owns a [`Plan`] and turns each submitted [`Check`] into one protocol line,
//! keeping the counts needed to compute the suite's exit status when it is closed. The
//! [`directive`] module layers scoped TODO and SKIP state on top of it.

mod check;
pub mod directive;
mod error;
mod options;
mod plan;
mod reporter;
mod sink;
pub mod trace_categories;

pub use check::Check;
pub use error::Error;
pub use options::{MissingPlanPolicy, ReporterOptions};
pub use plan::{Plan, PlanSpec};
pub use reporter::{ExitStatus, Reporter};
pub use sink::{MemoryBuffer, TapSink};
