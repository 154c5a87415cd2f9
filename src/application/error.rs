use thiserror::Error;

use crate::application::modal::{ModalError, SubmitError};
use crate::application::remote::RemoteError;
use crate::domain::error::DomainError;
use crate::infra::error::InfraError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Modal(#[from] ModalError),
    #[error("post #{0} is not on the current page")]
    UnknownPost(u64),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Local input problems that are reported to the user and block the
    /// request, as opposed to failures of the board or the remote.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::Validation { .. }))
    }
}

impl From<SubmitError> for AppError {
    fn from(error: SubmitError) -> Self {
        match error {
            SubmitError::Modal(err) => AppError::Modal(err),
            SubmitError::Invalid(err) => AppError::Domain(err),
        }
    }
}
