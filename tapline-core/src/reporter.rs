//! The reporter: turns submitted checks into protocol lines and computes the exit status.

use std::fmt::Display;

use crate::check::Check;
use crate::error::Error;
use crate::options::{MissingPlanPolicy, ReporterOptions};
use crate::plan::{self, Plan, PlanSpec};
use crate::trace_categories;

/// Exit status computed when a suite is closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitStatus(u8);

impl ExitStatus {
    /// Every check passed and the plan was met.
    pub const SUCCESS: Self = Self(0);
    /// The suite bailed out, or every check passed but the count differed from the plan.
    pub const ABNORMAL: Self = Self(255);
    /// The largest failure count that can be reported without colliding with [`Self::ABNORMAL`].
    pub const MAX_FAILURES: u8 = 254;

    fn from_plan(plan: &Plan) -> Self {
        if plan.failure_count() > 0 {
            Self(
                u8::try_from(plan.failure_count())
                    .unwrap_or(Self::MAX_FAILURES)
                    .min(Self::MAX_FAILURES),
            )
        } else if plan.has_count_mismatch() {
            Self::ABNORMAL
        } else {
            Self::SUCCESS
        }
    }

    /// Returns the numeric exit code.
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Returns whether this status indicates success.
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        Self::from(status.0)
    }
}

/// Builds a TAP stream for one suite at a time.
///
/// Each [`submit`](Self::submit) is a transaction against the current [`Plan`]. Closing the
/// reporter finalizes the plan and resets it, so the same instance can then run another
/// suite. A reporter dropped with an unfinalized plan finalizes it on the way out.
#[derive(Debug, Default)]
pub struct Reporter {
    plan: Option<Plan>,
    options: ReporterOptions,
}

impl Reporter {
    /// Returns a new reporter with the given options.
    pub const fn new(options: ReporterOptions) -> Self {
        Self {
            plan: None,
            options,
        }
    }

    /// Returns the options the reporter was created with.
    pub const fn options(&self) -> &ReporterOptions {
        &self.options
    }

    /// Returns the current plan, if one exists.
    pub const fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// Returns whether a plan is currently in place.
    pub const fn has_plan(&self) -> bool {
        self.plan.is_some()
    }

    /// Declares the suite's plan.
    ///
    /// A concrete count may be given at most once. Giving one after an undeclared plan is in
    /// place (declared explicitly or created by an earlier submission) fills in its count.
    pub fn declare_plan(&mut self, spec: PlanSpec) -> Result<(), Error> {
        let Some(existing) = self.plan.as_mut() else {
            self.plan = Some(Plan::create(
                spec,
                self.options.sink.clone(),
                self.options.exit,
            )?);
            return Ok(());
        };

        match (existing.expected_count(), spec) {
            (Some(expected), requested) => Err(Error::PlanRedeclared {
                existing: expected.to_string(),
                requested: requested.to_string(),
            }),
            (None, PlanSpec::Tests(n)) => existing.set_expected(n),
            (None, PlanSpec::NoPlan) => Ok(()),
            (None, PlanSpec::SkipAll) if existing.actual_count() == 0 => {
                existing.force_finalize();
                plan::skip_all(&self.options.sink, self.options.exit).map(|_| ())
            }
            (None, PlanSpec::SkipAll) => Err(Error::PlanRedeclared {
                existing: PlanSpec::NoPlan.to_string(),
                requested: PlanSpec::SkipAll.to_string(),
            }),
        }
    }

    /// Records a check and writes its protocol line. Returns the check's raw outcome, even
    /// when a TODO directive keeps it from counting as a failure.
    pub fn submit(&mut self, check: Check) -> Result<bool, Error> {
        check.validate()?;

        let seq = self
            .ensure_plan()?
            .record_outcome(check.counts_as_failure());

        tracing::debug!(
            target: trace_categories::REPORT,
            seq,
            ok = check.is_ok,
            skip = check.skip.is_some(),
            todo = check.todo.is_some(),
            "check submitted"
        );

        self.options.sink.write_line(&check.render(seq))?;
        Ok(check.is_ok)
    }

    /// Submits a check with a description and no directive.
    pub fn ok(&mut self, is_ok: bool, description: &str) -> Result<bool, Error> {
        self.submit(Check::new(is_ok).with_description(description))
    }

    /// Writes a diagnostic comment; every line of a multi-line message is prefixed with `# `.
    pub fn comment(&self, message: &str) -> Result<(), Error> {
        for line in message.split('\n') {
            self.options.sink.write_line(&format!("# {line}"))?;
        }
        Ok(())
    }

    /// Finalizes the current plan and returns the suite's exit status, leaving the reporter
    /// ready for a fresh suite.
    pub fn close(&mut self) -> Result<ExitStatus, Error> {
        let mut plan = self.take_plan()?;

        let status = ExitStatus::from_plan(&plan);
        tracing::debug!(target: trace_categories::PLAN, %status, "closing suite");

        if plan.actual_count() == 0 {
            self.comment("Looks like no tests were run")?;
        }
        self.comment(if status.is_success() {
            "RESULT: ok"
        } else {
            "RESULT: not ok"
        })?;

        plan.finalize()?;
        Ok(status)
    }

    /// Writes a `Bail out!` line and terminates the process with exit code 255.
    ///
    /// The current plan is marked finalized without the usual summary.
    pub fn bail_out(&mut self, message: &str) -> ! {
        if let Err(e) = self.options.sink.write_line(&format!("Bail out! {message}")) {
            tracing::error!(target: trace_categories::REPORT, "failed to write bail out line: {e}");
        }

        if let Some(plan) = self.plan.as_mut() {
            plan.force_finalize();
        }

        (self.options.exit)(i32::from(ExitStatus::ABNORMAL.code()))
    }

    fn ensure_plan(&mut self) -> Result<&mut Plan, Error> {
        let plan = self.take_plan()?;
        Ok(self.plan.insert(plan))
    }

    // Takes the current plan, or starts an undeclared one when the policy allows it.
    fn take_plan(&mut self) -> Result<Plan, Error> {
        if let Some(plan) = self.plan.take() {
            return Ok(plan);
        }

        match self.options.missing_plan {
            MissingPlanPolicy::Lazy => Ok(Plan::undeclared(self.options.sink.clone())),
            MissingPlanPolicy::Strict => Err(Error::MissingPlan),
        }
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if let Some(plan) = self.plan.as_mut() {
            if let Err(e) = plan.finalize() {
                tracing::warn!(target: trace_categories::PLAN, "failed to finalize plan: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::AssertUnwindSafe;

    use super::*;
    use crate::sink::{MemoryBuffer, TapSink};
    use pretty_assertions::{assert_eq, assert_matches};

    #[derive(Debug)]
    struct ExitRequested(i32);

    fn capture_exit(code: i32) -> ! {
        std::panic::panic_any(ExitRequested(code))
    }

    fn exit_code_of(f: impl FnOnce()) -> i32 {
        let payload = std::panic::catch_unwind(AssertUnwindSafe(f)).unwrap_err();
        payload.downcast::<ExitRequested>().unwrap().0
    }

    fn memory_reporter() -> (Reporter, MemoryBuffer) {
        let (sink, buffer) = TapSink::memory();
        let options = ReporterOptions::default()
            .with_sink(sink)
            .with_exit(capture_exit);
        (Reporter::new(options), buffer)
    }

    #[test]
    fn counts_follow_submissions() {
        let (mut reporter, _buffer) = memory_reporter();
        let outcomes = [true, false, true, false, false];

        for (i, outcome) in outcomes.iter().enumerate() {
            reporter.submit(Check::new(*outcome)).unwrap();
            assert_eq!(reporter.plan().unwrap().actual_count(), i + 1);
        }

        assert_eq!(reporter.plan().unwrap().failure_count(), 3);
    }

    #[test]
    fn concrete_plan_twice_is_rejected() {
        let (mut reporter, _buffer) = memory_reporter();
        reporter.declare_plan(PlanSpec::Tests(2)).unwrap();

        assert_matches!(
            reporter.declare_plan(PlanSpec::Tests(3)),
            Err(Error::PlanRedeclared { .. })
        );
        assert_matches!(
            reporter.declare_plan(PlanSpec::NoPlan),
            Err(Error::PlanRedeclared { .. })
        );
    }

    #[test]
    fn no_plan_then_concrete_count() {
        let (mut reporter, buffer) = memory_reporter();
        reporter.declare_plan(PlanSpec::NoPlan).unwrap();
        reporter.ok(true, "first").unwrap();
        reporter.declare_plan(PlanSpec::Tests(2)).unwrap();
        reporter.ok(true, "second").unwrap();

        assert_eq!(buffer.lines(), vec!["ok 1 - first", "ok 2 - second"]);
        assert_eq!(reporter.close().unwrap(), ExitStatus::SUCCESS);
        assert_eq!(
            &buffer.lines()[2..],
            ["# RESULT: ok", "1..2", "# All passed"]
        );
    }

    #[test]
    fn close_all_passed() {
        let (mut reporter, buffer) = memory_reporter();
        reporter.declare_plan(PlanSpec::Tests(3)).unwrap();
        for n in 0..3 {
            reporter.ok(true, &format!("check {n}")).unwrap();
        }

        assert_eq!(reporter.close().unwrap().code(), 0);
        assert_eq!(buffer.lines().last().unwrap(), "# All passed");
    }

    #[test]
    fn close_with_too_few_checks() {
        let (mut reporter, buffer) = memory_reporter();
        reporter.declare_plan(PlanSpec::Tests(3)).unwrap();
        reporter.ok(true, "one").unwrap();
        reporter.ok(true, "two").unwrap();

        assert_eq!(reporter.close().unwrap().code(), 255);
        assert!(
            buffer
                .lines()
                .contains(&String::from("# Looks like you planned 3 tests but ran 2."))
        );
        assert!(buffer.lines().contains(&String::from("# RESULT: not ok")));
    }

    #[test]
    fn close_with_failure() {
        let (mut reporter, buffer) = memory_reporter();
        reporter.declare_plan(PlanSpec::Tests(2)).unwrap();
        assert!(reporter.ok(true, "fine").unwrap());
        assert!(!reporter.ok(false, "broken").unwrap());

        assert_eq!(reporter.close().unwrap().code(), 1);
        assert_eq!(
            buffer.lines(),
            vec![
                "1..2",
                "ok 1 - fine",
                "not ok 2 - broken",
                "# RESULT: not ok",
                "# Failed 1 out of 2",
            ]
        );
    }

    #[test]
    fn failure_count_is_capped() {
        let (mut reporter, _buffer) = memory_reporter();
        for _ in 0..300 {
            reporter.submit(Check::new(false)).unwrap();
        }

        assert_eq!(reporter.close().unwrap().code(), ExitStatus::MAX_FAILURES);
    }

    #[test]
    fn todo_failure_is_not_counted() {
        let (mut reporter, buffer) = memory_reporter();
        let raw = reporter
            .submit(Check::new(false).with_description("x").with_todo("later"))
            .unwrap();

        assert!(!raw);
        assert_eq!(reporter.plan().unwrap().failure_count(), 0);
        assert_eq!(buffer.lines(), vec!["not ok 1 - x # TODO later"]);
    }

    #[test]
    fn todo_success_is_flagged() {
        let (mut reporter, buffer) = memory_reporter();
        assert!(reporter.submit(Check::new(true).with_todo("later")).unwrap());
        assert_eq!(
            buffer.lines(),
            vec!["ok 1 # TODO - UNEXPECTED SUCCESS - later"]
        );
    }

    #[test]
    fn conflicting_directives_leave_counters_alone() {
        let (mut reporter, buffer) = memory_reporter();
        reporter.declare_plan(PlanSpec::Tests(1)).unwrap();

        assert_matches!(
            reporter.submit(Check::new(false).with_skip("a").with_todo("b")),
            Err(Error::ConflictingDirective)
        );
        assert_eq!(reporter.plan().unwrap().actual_count(), 0);
        assert_eq!(reporter.plan().unwrap().failure_count(), 0);
        assert_eq!(buffer.lines(), vec!["1..1"]);
    }

    #[test]
    fn strict_policy_requires_a_plan() {
        let (sink, buffer) = TapSink::memory();
        let mut reporter = Reporter::new(
            ReporterOptions::default()
                .with_sink(sink)
                .with_missing_plan(MissingPlanPolicy::Strict),
        );

        assert_matches!(reporter.ok(true, "early"), Err(Error::MissingPlan));
        assert_matches!(reporter.close(), Err(Error::MissingPlan));
        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn strict_policy_closes_a_declared_plan() {
        let (sink, buffer) = TapSink::memory();
        let mut reporter = Reporter::new(
            ReporterOptions::default()
                .with_sink(sink)
                .with_missing_plan(MissingPlanPolicy::Strict),
        );

        reporter.declare_plan(PlanSpec::Tests(1)).unwrap();
        reporter.ok(true, "only").unwrap();

        assert_eq!(reporter.close().unwrap(), ExitStatus::SUCCESS);
        assert!(!reporter.has_plan());
        assert_matches!(reporter.close(), Err(Error::MissingPlan));
        assert_eq!(
            buffer.lines(),
            vec!["1..1", "ok 1 - only", "# RESULT: ok", "# All passed"]
        );
    }

    #[test]
    fn empty_suite_closes_cleanly() {
        let (mut reporter, buffer) = memory_reporter();

        assert_eq!(reporter.close().unwrap(), ExitStatus::SUCCESS);
        assert_eq!(
            buffer.lines(),
            vec![
                "# Looks like no tests were run",
                "# RESULT: ok",
                "1..0",
                "# All passed",
            ]
        );
    }

    #[test]
    fn close_resets_for_another_suite() {
        let (mut reporter, buffer) = memory_reporter();
        reporter.declare_plan(PlanSpec::Tests(1)).unwrap();
        reporter.ok(false, "first suite").unwrap();
        assert_eq!(reporter.close().unwrap().code(), 1);

        assert!(!reporter.has_plan());
        reporter.declare_plan(PlanSpec::Tests(1)).unwrap();
        reporter.ok(true, "second suite").unwrap();
        assert_eq!(reporter.close().unwrap().code(), 0);

        assert_eq!(&buffer.lines()[4..6], ["1..1", "ok 1 - second suite"]);
    }

    #[test]
    fn multi_line_comments_are_prefixed() {
        let (reporter, buffer) = memory_reporter();
        reporter.comment("want: 1\nhave: 2").unwrap();
        assert_eq!(buffer.lines(), vec!["# want: 1", "# have: 2"]);
    }

    #[test]
    fn drop_finalizes_unclosed_plan() {
        let (mut reporter, buffer) = memory_reporter();
        reporter.ok(true, "only").unwrap();
        drop(reporter);

        assert_eq!(buffer.lines(), vec!["ok 1 - only", "1..1", "# All passed"]);
    }

    #[test]
    fn skip_all_exits_with_zero() {
        let (mut reporter, buffer) = memory_reporter();
        let code = exit_code_of(|| {
            let _ = reporter.declare_plan(PlanSpec::SkipAll);
        });

        assert_eq!(code, 0);
        assert!(reporter.plan().is_none());
        assert_eq!(buffer.lines(), vec!["1..0 # skip all"]);
    }

    #[test]
    fn skip_all_after_checks_is_rejected() {
        let (mut reporter, _buffer) = memory_reporter();
        reporter.ok(true, "already ran").unwrap();

        assert_matches!(
            reporter.declare_plan(PlanSpec::SkipAll),
            Err(Error::PlanRedeclared { .. })
        );
    }

    #[test]
    fn bail_out_exits_with_255() {
        let (mut reporter, buffer) = memory_reporter();
        reporter.declare_plan(PlanSpec::Tests(3)).unwrap();
        reporter.ok(true, "connect").unwrap();

        let code = exit_code_of(|| {
            reporter.bail_out("database is gone");
        });
        drop(reporter);

        assert_eq!(code, 255);
        assert_eq!(
            buffer.lines(),
            vec!["1..3", "ok 1 - connect", "Bail out! database is gone"]
        );
    }
}
