/// Monolithic error type for the reporting engine.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A concrete plan was declared after one was already in place.
    #[error("tried to plan twice; existing plan: {existing}, second plan: {requested}")]
    PlanRedeclared {
        /// The plan already in place.
        existing: String,
        /// The plan that was requested second.
        requested: String,
    },

    /// The given plan specification was not understood.
    #[error("didn't understand plan '{0}'")]
    BadPlan(String),

    /// A single check was given both a SKIP and a TODO directive.
    #[error("tried running a test with more than one directive")]
    ConflictingDirective,

    /// A check was submitted before any plan was declared.
    #[error("tried running tests without a plan")]
    MissingPlan,

    /// The protocol sink's lock was poisoned by a panicking writer.
    #[error("protocol sink is poisoned")]
    SinkPoisoned,

    /// An I/O error occurred while writing to the protocol sink.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
