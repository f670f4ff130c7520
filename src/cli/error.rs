//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(ApplicationError::Domain(e))
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io { .. } => exitcode::CANTCREAT,
            CliError::Application(e) => match e {
                ApplicationError::Config { .. } => exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => exitcode::IOERR,
                ApplicationError::Domain(d) => match d {
                    DomainError::Configuration(_) => exitcode::CONFIG,
                    DomainError::NotFound(_) => exitcode::NOINPUT,
                    DomainError::UnknownReport(_) => exitcode::USAGE,
                    DomainError::InvalidValue { .. } => exitcode::DATAERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_domain_errors_when_mapping_exit_code_then_uses_sysexits() {
        assert_eq!(
            CliError::from(DomainError::NotFound("S9".into())).exit_code(),
            exitcode::NOINPUT
        );
        assert_eq!(
            CliError::from(DomainError::UnknownReport("x".into())).exit_code(),
            exitcode::USAGE
        );
        assert_eq!(
            CliError::from(ApplicationError::Config {
                message: "bad".into()
            })
            .exit_code(),
            exitcode::CONFIG
        );
    }
}
