//! Plan tracking: expected and actual check counts, and the header and summary lines.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::Error;
use crate::sink::TapSink;
use crate::trace_categories;

/// How a suite declares its plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanSpec {
    /// Exactly this many checks are expected.
    Tests(usize),
    /// The count is not known yet; the header is deferred until finalization.
    NoPlan,
    /// The whole suite is skipped; the process exits immediately.
    SkipAll,
}

impl FromStr for PlanSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "no_plan" | "no-plan" => Ok(Self::NoPlan),
            "skip_all" | "skip-all" => Ok(Self::SkipAll),
            other => other
                .parse::<usize>()
                .map(Self::Tests)
                .map_err(|_| Error::BadPlan(s.to_owned())),
        }
    }
}

impl Display for PlanSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tests(n) => write!(f, "{n}"),
            Self::NoPlan => write!(f, "no_plan"),
            Self::SkipAll => write!(f, "skip_all"),
        }
    }
}

/// Expected and actual check counts for one suite run.
#[derive(Debug)]
pub struct Plan {
    expected_count: Option<usize>,
    actual_count: usize,
    failure_count: usize,
    header_emitted: bool,
    finalized: bool,
    sink: TapSink,
}

impl Plan {
    /// Creates a plan from its specification, emitting the header if the count is known.
    ///
    /// A [`PlanSpec::SkipAll`] plan writes `1..0 # skip all` and calls `exit` with code 0;
    /// it never returns.
    pub(crate) fn create(spec: PlanSpec, sink: TapSink, exit: fn(i32) -> !) -> Result<Self, Error> {
        match spec {
            PlanSpec::Tests(n) => {
                let mut plan = Self::empty(sink);
                plan.set_expected(n)?;
                Ok(plan)
            }
            PlanSpec::NoPlan => Ok(Self::undeclared(sink)),
            PlanSpec::SkipAll => skip_all(&sink, exit),
        }
    }

    /// Creates a plan whose expected count is not yet known.
    pub(crate) fn undeclared(sink: TapSink) -> Self {
        tracing::debug!(target: trace_categories::PLAN, "starting undeclared plan");
        Self::empty(sink)
    }

    const fn empty(sink: TapSink) -> Self {
        Self {
            expected_count: None,
            actual_count: 0,
            failure_count: 0,
            header_emitted: false,
            finalized: false,
            sink,
        }
    }

    /// Sets the expected count on a plan that had none.
    ///
    /// The header is written right away when no check has run yet; otherwise it trails the
    /// checks and is written at finalization.
    pub(crate) fn set_expected(&mut self, expected: usize) -> Result<(), Error> {
        if let Some(existing) = self.expected_count {
            return Err(Error::PlanRedeclared {
                existing: existing.to_string(),
                requested: expected.to_string(),
            });
        }

        tracing::debug!(target: trace_categories::PLAN, expected, "plan declared");
        self.expected_count = Some(expected);

        if self.actual_count == 0 && !self.header_emitted {
            self.emit_header(expected)?;
        }

        Ok(())
    }

    /// Records one submitted outcome and returns its 1-based sequence number.
    pub(crate) const fn record_outcome(&mut self, is_failure: bool) -> usize {
        self.actual_count += 1;
        if is_failure {
            self.failure_count += 1;
        }
        self.actual_count
    }

    /// Emits the deferred header (if any), the count-mismatch diagnostic and the summary.
    /// Calling it again after it succeeded once is a no-op.
    pub(crate) fn finalize(&mut self) -> Result<(), Error> {
        if self.finalized {
            return Ok(());
        }
        self.finalized = true;

        tracing::debug!(
            target: trace_categories::PLAN,
            expected = ?self.expected_count,
            actual = self.actual_count,
            failures = self.failure_count,
            "finalizing plan"
        );

        if !self.header_emitted {
            self.emit_header(self.expected_count.unwrap_or(self.actual_count))?;
        }

        if let Some(expected) = self.expected_count.filter(|e| *e != self.actual_count) {
            self.sink.write_line(&format!(
                "# Looks like you planned {expected} tests but ran {}.",
                self.actual_count
            ))?;
        }

        if self.failure_count > 0 {
            self.sink.write_line(&format!(
                "# Failed {} out of {}",
                self.failure_count, self.actual_count
            ))?;
        } else {
            self.sink.write_line("# All passed")?;
        }

        Ok(())
    }

    /// Marks the plan finalized without writing anything.
    pub(crate) const fn force_finalize(&mut self) {
        self.finalized = true;
    }

    fn emit_header(&mut self, count: usize) -> Result<(), Error> {
        self.header_emitted = true;
        self.sink.write_line(&format!("1..{count}"))
    }

    /// Returns the declared count, if one is known.
    pub const fn expected_count(&self) -> Option<usize> {
        self.expected_count
    }

    /// Returns how many outcomes have been recorded.
    pub const fn actual_count(&self) -> usize {
        self.actual_count
    }

    /// Returns how many recorded outcomes counted as failures.
    pub const fn failure_count(&self) -> usize {
        self.failure_count
    }

    /// Returns whether the summary has been emitted.
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Returns whether a declared count disagrees with the number of outcomes recorded.
    pub fn has_count_mismatch(&self) -> bool {
        self.expected_count
            .is_some_and(|expected| expected != self.actual_count)
    }
}

/// Writes the skip-all header and terminates through `exit`.
pub(crate) fn skip_all(sink: &TapSink, exit: fn(i32) -> !) -> Result<Plan, Error> {
    tracing::debug!(target: trace_categories::PLAN, "skipping entire suite");
    sink.write_line("1..0 # skip all")?;
    exit(0)
}
