use thiserror::Error;

use crate::Operation;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("operation {operation} forbidden")]
    Forbidden { operation: Operation },
    #[error("unknown operation {0:?}")]
    UnknownOperation(String),
    #[error("unknown authorization rule {0:?}")]
    UnknownRule(String),
}
