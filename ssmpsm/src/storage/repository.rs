use std::fmt;

use crate::domain::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    ConnectionFailed(String),
    Throttled(String),
    QueryFailed(String),
    ParameterNotFound(String),
    AccessDenied(String),
    ValidationError(String),
}

impl RepositoryError {
    /// Failures that may go away if the same call is made again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Throttled(_))
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            Self::Throttled(msg) => write!(f, "Request throttled: {}", msg),
            Self::QueryFailed(msg) => write!(f, "Query failed: {}", msg),
            Self::ParameterNotFound(msg) => write!(f, "Parameter not found: {}", msg),
            Self::AccessDenied(msg) => write!(f, "Access denied: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Remote key-value store holding the parameters.
#[async_trait::async_trait]
pub trait ParameterRepository: Send + Sync {
    async fn get_parameter(
        &self,
        name: &ParameterName,
        with_decryption: bool,
    ) -> Result<Parameter, RepositoryError>;

    /// Creates or overwrites the parameter and returns the version the store assigned.
    async fn put_parameter(
        &self,
        request: PutParameterRequest,
    ) -> Result<ParameterVersion, RepositoryError>;
}
