//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::orders::{data::OrderValidationError, status::InvalidTransition};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error(transparent)]
    Validation(#[from] OrderValidationError),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("order not found")]
    NotFound,

    #[error("order was modified concurrently")]
    Conflict,

    #[error("order already exists")]
    AlreadyExists,

    #[error("invalid order data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation | ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::ForeignKeyViolation | ErrorKind::Other | _) | None => {
                Self::Sql(error)
            }
        }
    }
}
