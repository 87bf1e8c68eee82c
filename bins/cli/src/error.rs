use std::fmt;
use ubs_diag_shared::{ErrorEnvelope, ErrorKind};

/// Process exit status. `InvalidInput` also covers a failed check verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok = 0,
    Internal = 1,
    InvalidInput = 2,
    Io = 3,
}

impl ExitCode {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Exit code for a failure reported through an envelope.
    #[must_use]
    pub const fn for_envelope(error: &ErrorEnvelope) -> Self {
        match error.kind {
            ErrorKind::Expected => Self::InvalidInput,
            ErrorKind::Unexpected => Self::Io,
            ErrorKind::Invariant => Self::Internal,
        }
    }
}

/// Failures outside the envelope path: argument plumbing and terminal I/O.
///
/// Payload and store problems are reported as envelopes on stdout instead.
#[derive(Debug)]
pub enum CliError {
    /// A command needs a value that none of its sources supplied.
    MissingInput(&'static str),
    /// The password could not be read from stdin.
    Stdin(std::io::Error),
    /// A report could not be written to stdout or stderr.
    Output(std::io::Error),
    /// A report payload could not be encoded.
    Render(serde_json::Error),
}

impl CliError {
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::MissingInput(_) => ExitCode::InvalidInput,
            Self::Stdin(_) | Self::Output(_) => ExitCode::Io,
            Self::Render(_) => ExitCode::Internal,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput(what) => write!(formatter, "missing {what}"),
            Self::Stdin(error) => write!(formatter, "failed to read stdin: {error}"),
            Self::Output(error) => write!(formatter, "failed to write output: {error}"),
            Self::Render(error) => write!(formatter, "failed to encode report: {error}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingInput(_) => None,
            Self::Stdin(error) | Self::Output(error) => Some(error),
            Self::Render(error) => Some(error),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::Render(error)
    }
}
