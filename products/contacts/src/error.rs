use platform_authz::Operation;
use sea_orm::DbErr;
use thiserror::Error;

use crate::ValidationErrors;

pub type ContactResult<T> = Result<T, ContactError>;

/// The outward vocabulary the workflow reports to its own callers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ContactOutcome {
    Allowed,
    Forbidden,
    NotFound,
    ValidationFailed,
}

impl ContactOutcome {
    pub fn of<T>(result: &ContactResult<T>) -> Option<Self> {
        match result {
            Ok(_) => Some(ContactOutcome::Allowed),
            Err(err) => err.outcome(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{operation} forbidden")]
    Forbidden { operation: Operation },
    #[error("contact not found")]
    NotFound,
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("unknown contact status {0:?}")]
    UnknownStatus(String),
    #[error("contact changed concurrently; reload and retry")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ContactError {
    /// `None` for conflicts and storage faults, which sit outside the
    /// four-outcome vocabulary.
    pub fn outcome(&self) -> Option<ContactOutcome> {
        match self {
            ContactError::Forbidden { .. } => Some(ContactOutcome::Forbidden),
            ContactError::NotFound => Some(ContactOutcome::NotFound),
            ContactError::Validation(_) | ContactError::UnknownStatus(_) => {
                Some(ContactOutcome::ValidationFailed)
            }
            ContactError::Conflict | ContactError::Database(_) => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ContactError::Forbidden { .. } => "FORBIDDEN",
            ContactError::NotFound => "NOT_FOUND",
            ContactError::Validation(_) | ContactError::UnknownStatus(_) => "VALIDATION",
            ContactError::Conflict => "CONFLICT",
            ContactError::Database(_) => "INTERNAL",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ContactError::Conflict)
    }
}

impl From<ValidationErrors> for ContactError {
    fn from(value: ValidationErrors) -> Self {
        ContactError::Validation(value)
    }
}
