use std::fmt::Display;

use models::errors::ModelError;
use thiserror::Error;

/// Business errors for booking workflows
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("no table available at restaurant {restaurant_id} for start time {start_time}")]
    NoAvailability { restaurant_id: i32, start_time: i64 },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("persistence failure in {op}: {message}")]
    Persistence { op: &'static str, message: String },
    #[error("transaction aborted in {op}: {message}")]
    TransactionAbort { op: &'static str, message: String },
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
}

impl ReservationError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ReservationError::NoAvailability { .. } => 2001,
            ReservationError::Validation(_) => 2002,
            ReservationError::Persistence { .. } => 2101,
            ReservationError::TransactionAbort { .. } => 2102,
            ReservationError::Timeout(_) => 2201,
        }
    }

    pub fn persistence(op: &'static str, e: impl Display) -> Self {
        ReservationError::Persistence { op, message: e.to_string() }
    }

    pub fn aborted(op: &'static str, e: impl Display) -> Self {
        ReservationError::TransactionAbort { op, message: e.to_string() }
    }

    /// Model validation stays a validation error; anything else is a storage failure in `op`.
    pub fn from_model(op: &'static str, e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ReservationError::Validation(msg),
            ModelError::Db(msg) => ReservationError::Persistence { op, message: msg },
        }
    }
}
