//! A default, per-thread [`Tester`] writing to standard output.
//!
//! Convenient for small test programs that don't want to thread a tester through their
//! code. Suites that need their own sink or policy should create a [`Tester`] directly.
//! Calls must not nest: using the default tester from inside [`with_default`] panics.

use std::cell::RefCell;

use tapline_core::{ExitStatus, PlanSpec};

use crate::error::Error;
use crate::tester::Tester;

thread_local! {
    static DEFAULT_TESTER: RefCell<Tester> = RefCell::new(Tester::default());
}

/// Runs `f` with this thread's default tester.
pub fn with_default<R>(f: impl FnOnce(&mut Tester) -> R) -> R {
    DEFAULT_TESTER.with_borrow_mut(f)
}

/// Declares the plan on the default tester.
pub fn plan(spec: PlanSpec) -> Result<(), Error> {
    with_default(|t| t.plan(spec))
}

/// Records a check on the default tester.
pub fn ok(okness: bool, description: &str) -> Result<bool, Error> {
    with_default(|t| t.ok(okness, description))
}

/// Writes a diagnostic comment through the default tester.
pub fn diag(message: &str) -> Result<(), Error> {
    with_default(|t| t.diag(message))
}

/// Closes the default tester's suite and returns its exit status.
pub fn close() -> Result<ExitStatus, Error> {
    with_default(Tester::close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tapline_core::{ReporterOptions, TapSink};

    #[test]
    fn free_functions_share_one_tester() {
        let (sink, buffer) = TapSink::memory();
        with_default(|t| *t = Tester::with_options(ReporterOptions::default().with_sink(sink)));

        plan(PlanSpec::Tests(2)).unwrap();
        ok(true, "first").unwrap();
        diag("between").unwrap();
        ok(false, "second").unwrap();

        assert_eq!(close().unwrap().code(), 1);
        assert_eq!(
            buffer.lines(),
            vec![
                "1..2",
                "ok 1 - first",
                "# between",
                "not ok 2 - second",
                "# RESULT: not ok",
                "# Failed 1 out of 2",
            ]
        );
    }
}
