//! Assertion helpers for tapline, in the spirit of Perl's `Test::More`.
//!
//! A [`Tester`] wraps a [`Reporter`](tapline_core::Reporter): each helper computes an
//! outcome, routes it through the active TODO/SKIP scope, and writes its own diagnostics
//! when the check fails.
//!
//! ```
//! use tapline_core::{PlanSpec, ReporterOptions, TapSink};
//! use tapline_more::Tester;
//!
//! let (sink, buffer) = TapSink::memory();
//! let mut t = Tester::with_options(ReporterOptions::default().with_sink(sink));
//!
//! t.plan(PlanSpec::Tests(2))?;
//! t.eq(&(2 + 2), &4, "arithmetic still works")?;
//! t.like("tapline 0.1.0", r"^tapline \d+\.\d+", "version banner")?;
//! assert!(t.close()?.is_success());
//!
//! assert_eq!(buffer.lines()[1], "ok 1 - arithmetic still works");
//! # Ok::<(), tapline_more::Error>(())
//! ```

mod capabilities;
mod compare;
mod error;
pub mod global;
mod tester;

pub use capabilities::Capabilities;
pub use compare::{Comparison, Membership};
pub use error::Error;
pub use tapline_core::directive::{SkipGuard, TodoGuard, skip, todo};
pub use tester::Tester;
