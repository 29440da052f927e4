//! Console error types

use city_client::ClientError;
use shared::{Denied, FieldError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Permission denied: {0}")]
    Denied(#[from] Denied),

    #[error("Validation error: {0}")]
    Invalid(#[from] FieldError),

    /// Completed schedules are frozen
    #[error("Schedule {0} is completed and can no longer be changed")]
    ScheduleFrozen(i64),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConsoleError {
    /// Message suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(err) => err.user_message(),
            Self::Invalid(err) => err.message.clone(),
            other => other.to_string(),
        }
    }

    /// True when the failure was caught before any request was sent
    pub fn is_client_side(&self) -> bool {
        match self {
            Self::Client(err) => err.is_client_side(),
            Self::Denied(_) | Self::Invalid(_) | Self::ScheduleFrozen(_) | Self::NotLoggedIn => true,
            Self::Config(_) => true,
        }
    }
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
