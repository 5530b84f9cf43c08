//! Runs the emitter for a parsed command line.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tapline_core::{ExitStatus, MissingPlanPolicy, ReporterOptions};
use tapline_more::Tester;

use crate::args::CommandLineArgs;
use crate::events;

/// Main entry point for `tapline`.
pub fn run() -> ExitCode {
    let args = match CommandLineArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();

            // clap returns errors for `--help` and `--version` too.
            return match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::from(2),
            };
        }
    };

    events::init(&args.enabled_trace_events);

    match execute(&args) {
        Ok(status) => status.into(),
        Err(e) => {
            tracing::error!("error: {e:#}");
            ExitStatus::ABNORMAL.into()
        }
    }
}

/// Emits the suite described by `args` and returns its exit status.
pub fn execute(args: &CommandLineArgs) -> anyhow::Result<ExitStatus> {
    let policy = if args.strict_plan {
        MissingPlanPolicy::Strict
    } else {
        MissingPlanPolicy::Lazy
    };
    let mut tester = Tester::with_options(ReporterOptions::default().with_missing_plan(policy));

    if let Some(spec) = args.plan {
        tester.plan(spec).context("failed to declare plan")?;
    }

    for message in &args.diagnostics {
        tester.diag(message)?;
    }

    let _todo = args.todo.as_deref().map(tapline_more::todo);
    let _skip = args.skip.as_deref().map(tapline_more::skip);

    for check in &args.checks {
        tester.ok(check.is_ok, check.description.as_deref().unwrap_or_default())?;
    }

    if let Some(message) = &args.bail_out {
        tester.bail_out(message);
    }

    tester.close().context("failed to close suite")
}
