//! Configuration for a reporter.

use crate::sink::TapSink;

/// What to do when a check is submitted before any plan was declared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingPlanPolicy {
    /// Create an undeclared plan on demand; its header is emitted at finalization.
    #[default]
    Lazy,
    /// Reject the submission with [`Error::MissingPlan`](crate::Error::MissingPlan).
    Strict,
}

/// Options controlling how a [`Reporter`](crate::Reporter) behaves.
#[derive(Clone, Debug)]
pub struct ReporterOptions {
    /// Where protocol lines are written.
    pub sink: TapSink,
    /// Policy for checks submitted without a plan.
    pub missing_plan: MissingPlanPolicy,
    /// Hook used to terminate the process on skip-all plans and bail-outs.
    pub exit: fn(i32) -> !,
}

impl Default for ReporterOptions {
    fn default() -> Self {
        Self {
            sink: TapSink::stdout(),
            missing_plan: MissingPlanPolicy::default(),
            exit: std::process::exit,
        }
    }
}

impl ReporterOptions {
    /// Sets the protocol sink.
    #[must_use]
    pub fn with_sink(mut self, sink: TapSink) -> Self {
        self.sink = sink;
        self
    }

    /// Sets the missing-plan policy.
    #[must_use]
    pub const fn with_missing_plan(mut self, policy: MissingPlanPolicy) -> Self {
        self.missing_plan = policy;
        self
    }

    /// Sets the process termination hook.
    #[must_use]
    pub const fn with_exit(mut self, exit: fn(i32) -> !) -> Self {
        self.exit = exit;
        self
    }
}
