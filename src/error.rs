//! Exit codes for the dupels application.

/// Exit codes reported to the shell.
///
/// - 0: Success (scan completed with no warnings)
/// - 1: General error (root path missing, unwritable stdout, ...)
/// - 3: Partial success (scan completed but some files were skipped)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the scan completed and every file was accounted for.
    Success = 0,
    /// General error: the scan could not run to completion.
    GeneralError = 1,
    /// Partial success: the scan completed but emitted warnings.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
