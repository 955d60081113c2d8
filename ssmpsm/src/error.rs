use std::{fmt, process::ExitCode};

use crate::{domain::InvocationError, storage::repository::RepositoryError};

/// Failure of a get or set, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    NotFound(String),
    AccessDenied(String),
    Transient(String),
    InvalidInput(String),
    Service(String),
}

impl ParameterError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Stable process exit status per error kind. Usage errors share 2 with clap.
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Service(_) => 1,
            Self::InvalidInput(_) => 2,
            Self::NotFound(_) => 3,
            Self::AccessDenied(_) => 4,
            Self::Transient(_) => 5,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::AccessDenied(_) => "access_denied",
            Self::Transient(_) => "transient",
            Self::InvalidInput(_) => "invalid_input",
            Self::Service(_) => "service",
        }
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "Parameter '{}' not found", name),
            Self::AccessDenied(msg) => write!(f, "Access denied: {}", msg),
            Self::Transient(msg) => write!(f, "Parameter Store unavailable: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Service(msg) => write!(f, "Parameter Store request failed: {}", msg),
        }
    }
}

impl std::error::Error for ParameterError {}

impl From<InvocationError> for ParameterError {
    fn from(err: InvocationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<RepositoryError> for ParameterError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ParameterNotFound(name) => Self::NotFound(name),
            RepositoryError::AccessDenied(msg) => Self::AccessDenied(msg),
            RepositoryError::ConnectionFailed(msg) | RepositoryError::Throttled(msg) => {
                Self::Transient(msg)
            }
            RepositoryError::ValidationError(msg) => Self::InvalidInput(msg),
            RepositoryError::QueryFailed(msg) => Self::Service(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_mapping() {
        assert_eq!(
            ParameterError::from(RepositoryError::ParameterNotFound("/a".into())),
            ParameterError::NotFound("/a".into())
        );
        assert!(ParameterError::from(RepositoryError::Throttled("x".into())).is_transient());
        assert!(
            ParameterError::from(RepositoryError::ConnectionFailed("x".into())).is_transient()
        );
        assert_eq!(
            ParameterError::from(RepositoryError::ValidationError("x".into())).kind(),
            "invalid_input"
        );
        assert_eq!(
            ParameterError::from(RepositoryError::QueryFailed("x".into())).kind(),
            "service"
        );
    }

    #[test]
    fn test_exit_statuses_are_non_zero_and_distinct() {
        let errors = [
            ParameterError::NotFound(String::new()),
            ParameterError::AccessDenied(String::new()),
            ParameterError::Transient(String::new()),
            ParameterError::InvalidInput(String::new()),
            ParameterError::Service(String::new()),
        ];
        let mut statuses: Vec<u8> = errors.iter().map(|e| e.exit_status()).collect();
        assert!(statuses.iter().all(|s| *s != 0));
        statuses.sort_unstable();
        statuses.dedup();
        assert_eq!(statuses.len(), errors.len());
    }

    #[test]
    fn test_invocation_error_is_invalid_input() {
        let err = ParameterError::from(InvocationError::MissingValue);
        assert_eq!(err.exit_status(), 2);
        assert!(err.to_string().starts_with("Invalid input"));
    }
}
