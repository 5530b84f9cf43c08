//! Trace utilities

/// Trace category for directive scopes.
pub const DIRECTIVE: &str = "directive";
/// Trace category for plan declaration and finalization.
pub const PLAN: &str = "plan";
/// Trace category for check submission.
pub const REPORT: &str = "report";
