//! Donations service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::donations::{data::DonationValidationError, records::InvalidDonationTransition};

#[derive(Debug, Error)]
pub enum DonationsServiceError {
    #[error(transparent)]
    Validation(#[from] DonationValidationError),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidDonationTransition),

    #[error("donation not found")]
    NotFound,

    #[error("donation was modified concurrently")]
    Conflict,

    #[error("donation already exists")]
    AlreadyExists,

    #[error("invalid donation data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for DonationsServiceError {
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
