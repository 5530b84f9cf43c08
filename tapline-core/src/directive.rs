//! Scoped TODO and SKIP directives.
//!
//! Entering a scope with [`todo`] or [`skip`] returns a guard; while the guard lives, every
//! check routed through [`submit`] (or [`decorate`]) on the same thread picks up the
//! directive. Dropping the guard, including during unwinding, restores whatever was active
//! before it, so scopes nest and a panicking check never leaves a directive behind.
//!
//! The state is thread-local: suites running on different threads never see each other's
//! directives.
//!
//! ```
//! use tapline_core::{Check, Reporter, ReporterOptions, TapSink, directive};
//!
//! let (sink, buffer) = TapSink::memory();
//! let mut reporter = Reporter::new(ReporterOptions::default().with_sink(sink));
//!
//! {
//!     let _todo = directive::todo("parser rewrite");
//!     directive::submit(&mut reporter, Check::new(false).with_description("nested lists"))?;
//! }
//!
//! assert_eq!(buffer.lines(), ["not ok 1 # TODO parser rewrite (nested lists)"]);
//! # Ok::<(), tapline_core::Error>(())
//! ```

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::thread::LocalKey;

use crate::check::Check;
use crate::error::Error;
use crate::reporter::Reporter;
use crate::trace_categories;

type ReasonStack = RefCell<Vec<(u64, String)>>;

thread_local! {
    static NEXT_SCOPE_ID: Cell<u64> = const { Cell::new(0) };
    static TODO_REASONS: ReasonStack = const { RefCell::new(Vec::new()) };
    static SKIP_REASONS: ReasonStack = const { RefCell::new(Vec::new()) };
}

/// The directive currently in effect on this thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveDirective {
    /// No directive scope is active.
    None,
    /// Checks are expected to fail for the given reason.
    Todo(String),
    /// Checks are skipped for the given reason.
    Skip(String),
    /// Both kinds of scope are active at once; checks submitted now are rejected.
    Conflicting {
        /// The innermost TODO reason.
        todo: String,
        /// The innermost SKIP reason.
        skip: String,
    },
}

/// Guard for an active TODO scope.
#[must_use = "the TODO scope ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TodoGuard {
    id: u64,
    _not_send: PhantomData<*const ()>,
}

impl Drop for TodoGuard {
    fn drop(&mut self) {
        leave(&TODO_REASONS, self.id);
        tracing::debug!(target: trace_categories::DIRECTIVE, scope = self.id, "TODO scope ended");
    }
}

/// Guard for an active SKIP scope.
#[must_use = "the SKIP scope ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SkipGuard {
    id: u64,
    _not_send: PhantomData<*const ()>,
}

impl Drop for SkipGuard {
    fn drop(&mut self) {
        leave(&SKIP_REASONS, self.id);
        tracing::debug!(target: trace_categories::DIRECTIVE, scope = self.id, "SKIP scope ended");
    }
}

/// Enters a TODO scope with the given reason.
pub fn todo(reason: impl Into<String>) -> TodoGuard {
    let reason = reason.into();
    tracing::debug!(target: trace_categories::DIRECTIVE, %reason, "TODO scope started");

    TodoGuard {
        id: enter(&TODO_REASONS, reason),
        _not_send: PhantomData,
    }
}

/// Enters a SKIP scope with the given reason.
pub fn skip(reason: impl Into<String>) -> SkipGuard {
    let reason = reason.into();
    tracing::debug!(target: trace_categories::DIRECTIVE, %reason, "SKIP scope started");

    SkipGuard {
        id: enter(&SKIP_REASONS, reason),
        _not_send: PhantomData,
    }
}

fn enter(stack: &'static LocalKey<ReasonStack>, reason: String) -> u64 {
    let id = NEXT_SCOPE_ID.replace(NEXT_SCOPE_ID.get().wrapping_add(1));
    stack.with_borrow_mut(|reasons| reasons.push((id, reason)));
    id
}

// Only the guard's own entry goes; scopes entered after it stay active.
fn leave(stack: &'static LocalKey<ReasonStack>, id: u64) {
    stack.with_borrow_mut(|reasons| reasons.retain(|(entry, _)| *entry != id));
}

/// Returns the directive currently in effect on this thread.
pub fn current() -> ActiveDirective {
    let todo = TODO_REASONS.with_borrow(|reasons| reasons.last().map(|(_, r)| r.clone()));
    let skip = SKIP_REASONS.with_borrow(|reasons| reasons.last().map(|(_, r)| r.clone()));

    match (todo, skip) {
        (None, None) => ActiveDirective::None,
        (Some(todo), None) => ActiveDirective::Todo(todo),
        (None, Some(skip)) => ActiveDirective::Skip(skip),
        (Some(todo), Some(skip)) => ActiveDirective::Conflicting { todo, skip },
    }
}

/// Applies the active directive to a raw check.
///
/// Under TODO the outcome is kept and the description is folded into the TODO reason.
/// Under SKIP the outcome is forced to pass and the description is folded into the SKIP
/// reason, so a skipped check can never register as a failure.
pub fn decorate(check: Check) -> Result<Check, Error> {
    match current() {
        ActiveDirective::None => Ok(check),
        ActiveDirective::Todo(reason) => {
            let todo = fold_reason(reason, check.description.as_deref());
            Ok(Check {
                description: None,
                todo: Some(todo),
                ..check
            })
        }
        ActiveDirective::Skip(reason) => {
            let skip = fold_reason(reason, check.description.as_deref());
            Ok(Check {
                is_ok: true,
                description: None,
                skip: Some(skip),
                ..check
            })
        }
        ActiveDirective::Conflicting { .. } => Err(Error::ConflictingDirective),
    }
}

/// Submits a check to the reporter after applying the active directive. Returns the raw
/// outcome as reported by [`Reporter::submit`].
pub fn submit(reporter: &mut Reporter, check: Check) -> Result<bool, Error> {
    reporter.submit(decorate(check)?)
}

fn fold_reason(reason: String, description: Option<&str>) -> String {
    match description {
        Some(description) if !description.is_empty() => format!("{reason} ({description})"),
        _ => reason,
    }
}
