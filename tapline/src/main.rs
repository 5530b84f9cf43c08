//! Implements the command-line interface for `tapline`.

/// Main entry point for `tapline`.
fn main() -> std::process::ExitCode {
    tapline::entry::run()
}
