//! Command-line arguments.

use std::str::FromStr;

use clap::Parser;
use tapline_core::PlanSpec;

use crate::events::TraceEvent;

const SHORT_DESCRIPTION: &str = "Emit a Test Anything Protocol stream";

const LONG_DESCRIPTION: &str = r"
tapline writes a TAP stream for the checks given on its command line and exits with the
suite's status: 0 when everything passed, the number of failures otherwise, or 255 when the
plan was not met or the suite bailed out.

Each CHECK is `ok` or `not-ok`, optionally followed by `:` and a description.
";

/// An error in a command-line argument.
#[derive(thiserror::Error, Debug)]
pub enum ArgError {
    /// A check argument was not of the form `ok[:DESCRIPTION]` or `not-ok[:DESCRIPTION]`.
    #[error("invalid check '{0}': expected ok[:DESCRIPTION] or not-ok[:DESCRIPTION]")]
    InvalidCheck(String),
}

/// A check given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckArg {
    /// Whether the check passes.
    pub is_ok: bool,
    /// Optional description.
    pub description: Option<String>,
}

impl FromStr for CheckArg {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (status, description) = match s.split_once(':') {
            Some((status, description)) => (status, Some(description.to_owned())),
            None => (s, None),
        };

        let is_ok = match status {
            "ok" => true,
            "not-ok" | "not_ok" => false,
            _ => return Err(ArgError::InvalidCheck(s.to_owned())),
        };

        Ok(Self { is_ok, description })
    }
}

/// Parsed command-line arguments for `tapline`.
#[derive(Parser, Debug)]
#[clap(name = "tapline", version, about = SHORT_DESCRIPTION, long_about = LONG_DESCRIPTION)]
pub struct CommandLineArgs {
    /// Plan to declare: a number of checks, `no_plan`, or `skip_all`.
    #[clap(long = "plan", value_name = "SPEC")]
    pub plan: Option<PlanSpec>,

    /// Mark every check as TODO for the given reason.
    #[clap(long = "todo", value_name = "REASON", conflicts_with = "skip")]
    pub todo: Option<String>,

    /// Skip every check for the given reason.
    #[clap(long = "skip", value_name = "REASON")]
    pub skip: Option<String>,

    /// Emit a diagnostic comment before the checks.
    #[clap(long = "diag", value_name = "MESSAGE")]
    pub diagnostics: Vec<String>,

    /// Bail out with the given message after the checks.
    #[clap(long = "bail-out", value_name = "MESSAGE")]
    pub bail_out: Option<String>,

    /// Reject checks submitted before a plan is declared.
    #[clap(long = "strict-plan", env = "TAPLINE_STRICT_PLAN")]
    pub strict_plan: bool,

    /// Enable debug tracing for the given event category.
    #[clap(long = "trace", value_name = "EVENT")]
    pub enabled_trace_events: Vec<TraceEvent>,

    /// Checks to report, in order.
    #[clap(value_name = "CHECK")]
    pub checks: Vec<CheckArg>,
}
