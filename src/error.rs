//! Exit codes for the finddup binary.

/// Process exit codes.
///
/// - 0: Success (scan completed, even if some paths were unreadable)
/// - 1: General error (unexpected internal failure)
/// - 2: Usage error (bad or missing command-line arguments)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the scan ran to completion.
    Success = 0,
    /// General error: a worker failed or output could not be written.
    GeneralError = 1,
    /// Usage error: reported by the argument parser.
    Usage = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FD000",
            Self::GeneralError => "FD001",
            Self::Usage => "FD002",
        }
    }

    /// Exit code for a command line that failed to parse.
    ///
    /// `--help` and `--version` also surface as parse errors and exit with
    /// success; everything else is a usage error.
    #[must_use]
    pub fn from_parse_error(err: &clap::Error) -> Self {
        if err.use_stderr() {
            Self::Usage
        } else {
            Self::Success
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // Every variant fits in a u8
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}
