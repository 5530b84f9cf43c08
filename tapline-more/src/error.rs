/// Error type for the assertion helpers.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The reporting engine rejected the operation.
    #[error(transparent)]
    Core(#[from] tapline_core::Error),

    /// A regular expression given to a matching helper was invalid.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A comparison operator was not one of the supported kinds.
    #[error("operator {0} is not supported")]
    UnsupportedOperator(String),
}
