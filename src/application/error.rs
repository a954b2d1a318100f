use std::error::Error as StdError;

use thiserror::Error;

use crate::{
    application::{detail::DetailError, repos::ProviderError},
    config::LoadError,
    domain::error::DomainError,
    infra::error::InfraError,
};

/// Error chain flattened for structured logging.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    pub fn summary(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to load configuration")]
    Config(#[from] LoadError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Process exit status for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Domain(DomainError::NotFound { .. }) => 2,
            AppError::Validation(_)
            | AppError::Config(_)
            | AppError::Domain(DomainError::Validation { .. }) => 64,
            AppError::Infra(_) | AppError::Domain(DomainError::Invariant { .. }) => 70,
            AppError::Unexpected(_) => 1,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error("application::error::AppError", self)
    }
}

impl From<DetailError> for AppError {
    fn from(error: DetailError) -> Self {
        match error {
            DetailError::InvalidId(err) => AppError::validation(err.to_string()),
            DetailError::Provider(ProviderError::NotFound { id }) => {
                AppError::Domain(DomainError::not_found("post", id))
            }
            DetailError::Provider(err) => AppError::unexpected(err.to_string()),
        }
    }
}
