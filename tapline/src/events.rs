//! Tracing setup for the command-line emitter.

use std::fmt::Display;

use tapline_core::trace_categories;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Type of event to trace.
#[derive(Clone, Debug, Eq, Hash, PartialEq, clap::ValueEnum)]
pub enum TraceEvent {
    /// Traces TODO and SKIP scopes.
    #[clap(name = "directive")]
    Directive,
    /// Traces plan declaration and finalization.
    #[clap(name = "plan")]
    Plan,
    /// Traces check submission.
    #[clap(name = "report")]
    Report,
}

impl TraceEvent {
    const fn target(&self) -> &'static str {
        match self {
            Self::Directive => trace_categories::DIRECTIVE,
            Self::Plan => trace_categories::PLAN,
            Self::Report => trace_categories::REPORT,
        }
    }
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.target())
    }
}

/// Installs a stderr subscriber with INFO as the default level and DEBUG for the enabled
/// events. The TAP stream on stdout is never affected.
pub fn init(enabled_events: &[TraceEvent]) {
    let filter = tracing_subscriber::filter::Targets::new()
        .with_default(tracing_subscriber::filter::LevelFilter::INFO)
        .with_targets(
            enabled_events
                .iter()
                .map(|event| (event.target(), tracing::Level::DEBUG)),
        );

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        // Something went wrong; proceed on anyway but complain audibly.
        eprintln!("warning: failed to initialize tracing.");
    }
}
