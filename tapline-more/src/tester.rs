//! The assertion helper layer.

use std::any::Any;
use std::fmt::Debug;

use regex::Regex;
use tapline_core::{
    Check, ExitStatus, PlanSpec, Reporter, ReporterOptions, directive, trace_categories,
};

use crate::capabilities::Capabilities;
use crate::compare::{Comparison, Membership};
use crate::error::Error;

/// Runs assertions against a suite's [`Reporter`].
///
/// Every helper returns the raw outcome of its check. Failure diagnostics are written as
/// comments after the check line; inside a SKIP scope checks always pass, so none are
/// written.
#[derive(Debug, Default)]
pub struct Tester {
    reporter: Reporter,
}

impl Tester {
    /// Returns a tester driving the given reporter.
    pub const fn new(reporter: Reporter) -> Self {
        Self { reporter }
    }

    /// Returns a tester driving a new reporter with the given options.
    pub const fn with_options(options: ReporterOptions) -> Self {
        Self::new(Reporter::new(options))
    }

    /// Returns the underlying reporter.
    pub const fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Returns the underlying reporter, mutably.
    pub const fn reporter_mut(&mut self) -> &mut Reporter {
        &mut self.reporter
    }

    /// Declares the suite's plan.
    pub fn plan(&mut self, spec: PlanSpec) -> Result<(), Error> {
        Ok(self.reporter.declare_plan(spec)?)
    }

    /// Records a check with the given outcome, honoring any active TODO or SKIP scope.
    pub fn ok(&mut self, okness: bool, description: &str) -> Result<bool, Error> {
        let check = Check::new(okness).with_description(description);
        Ok(directive::submit(&mut self.reporter, check)?)
    }

    /// Records a check that passes unconditionally.
    pub fn pass(&mut self, description: &str) -> Result<bool, Error> {
        self.ok(true, description)
    }

    /// Records a check that fails unconditionally.
    pub fn fail(&mut self, description: &str) -> Result<bool, Error> {
        self.ok(false, description)
    }

    /// Writes a diagnostic comment.
    pub fn diag(&self, message: &str) -> Result<(), Error> {
        Ok(self.reporter.comment(message)?)
    }

    /// Checks that `have == want`.
    pub fn eq<T>(&mut self, have: &T, want: &T, description: &str) -> Result<bool, Error>
    where
        T: PartialEq + Debug + ?Sized,
    {
        let okness = self.ok(have == want, description)?;
        if !okness {
            self.diag(&format!("want: {want:?}"))?;
            self.diag(&format!("have: {have:?}"))?;
        }
        Ok(okness)
    }

    /// Checks that `have != want`.
    pub fn isnt<T>(&mut self, have: &T, want: &T, description: &str) -> Result<bool, Error>
    where
        T: PartialEq + Debug + ?Sized,
    {
        let okness = self.ok(have != want, description)?;
        if !okness {
            self.diag(&format!("want: anything but {want:?}"))?;
            self.diag(&format!("have: {have:?}"))?;
        }
        Ok(okness)
    }

    /// Checks that `pattern` matches somewhere in `got`.
    pub fn like(&mut self, got: &str, pattern: &str, description: &str) -> Result<bool, Error> {
        let regex = Regex::new(pattern)?;
        let okness = self.ok(regex.is_match(got), description)?;
        if !okness {
            self.diag(&format!("               '{got}'"))?;
            self.diag(&format!("does not match '{pattern}'"))?;
        }
        Ok(okness)
    }

    /// Checks that `pattern` matches nowhere in `got`.
    pub fn unlike(&mut self, got: &str, pattern: &str, description: &str) -> Result<bool, Error> {
        let regex = Regex::new(pattern)?;
        let okness = self.ok(!regex.is_match(got), description)?;
        if !okness {
            self.diag(&format!("                     '{got}'"))?;
            self.diag(&format!("unexpectedly matches '{pattern}'"))?;
        }
        Ok(okness)
    }

    /// Checks that `got <op> expected` holds.
    pub fn cmp_ok<T>(
        &mut self,
        got: &T,
        op: Comparison,
        expected: &T,
        description: &str,
    ) -> Result<bool, Error>
    where
        T: PartialOrd + Debug + ?Sized,
    {
        let okness = self.ok(op.evaluate(got, expected), description)?;
        if !okness {
            self.diag(&format!("'{got:?} {op} {expected:?}' evaluated as false"))?;
        }
        Ok(okness)
    }

    /// Like [`cmp_ok`](Self::cmp_ok), with the operator given as text (e.g. `"<="` or
    /// `"is not"`). An unknown operator is reported as a diagnostic and no check is run.
    pub fn cmp_ok_with<T>(
        &mut self,
        got: &T,
        operator: &str,
        expected: &T,
        description: &str,
    ) -> Result<bool, Error>
    where
        T: PartialOrd + Debug + ?Sized,
    {
        match operator.parse::<Comparison>() {
            Ok(op) => self.cmp_ok(got, op, expected, description),
            Err(e) => {
                tracing::debug!(
                    target: trace_categories::REPORT,
                    %operator,
                    "unsupported comparison operator"
                );
                self.diag(&format!(
                    "Operator {operator} is not supported - test '{description}' not run!"
                ))?;
                Err(e)
            }
        }
    }

    /// Checks that `item <op> haystack` holds.
    pub fn contains_ok<T>(
        &mut self,
        item: &T,
        op: Membership,
        haystack: &[T],
        description: &str,
    ) -> Result<bool, Error>
    where
        T: PartialEq + Debug,
    {
        let okness = self.ok(op.evaluate(item, haystack), description)?;
        if !okness {
            self.diag(&format!("'{item:?} {op} {haystack:?}' evaluated as false"))?;
        }
        Ok(okness)
    }

    /// Checks that `got` and `expected` are the same object, not merely equal ones.
    pub fn same_ok<T: ?Sized>(
        &mut self,
        got: &T,
        expected: &T,
        description: &str,
    ) -> Result<bool, Error> {
        let okness = self.ok(std::ptr::eq(got, expected), description)?;
        if !okness {
            self.diag(&format!("expected at: {:p}", std::ptr::from_ref(expected).cast::<()>()))?;
            self.diag(&format!("     got at: {:p}", std::ptr::from_ref(got).cast::<()>()))?;
        }
        Ok(okness)
    }

    /// Checks that `value` is a `T`.
    pub fn isa_ok<T: Any>(&mut self, value: &dyn Any, object_name: &str) -> Result<bool, Error> {
        let description = format!("{object_name} is a {}", std::any::type_name::<T>());
        self.ok(value.is::<T>(), &description)
    }

    /// Checks that `object` declares support for every named operation.
    pub fn can_ok(
        &mut self,
        object: &dyn Capabilities,
        names: &[&str],
        description: &str,
    ) -> Result<bool, Error> {
        let missing: Vec<_> = names
            .iter()
            .filter(|name| !object.supports(name))
            .map(|name| format!("method {name} not supported by object"))
            .collect();

        let okness = self.ok(missing.is_empty(), description)?;
        if !okness {
            self.diag(&missing.join("\n"))?;
        }
        Ok(okness)
    }

    /// Aborts the suite with a `Bail out!` line and exit code 255.
    pub fn bail_out(&mut self, message: &str) -> ! {
        self.reporter.bail_out(message)
    }

    /// Completes the suite and returns its exit status.
    pub fn close(&mut self) -> Result<ExitStatus, Error> {
        Ok(self.reporter.close()?)
    }
}
