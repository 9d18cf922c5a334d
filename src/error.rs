use reqwest::StatusCode;
use thiserror::Error;

use crate::view::Severity;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Rejected before any request was made.
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("API responded with HTTP {0}")]
    Status(StatusCode),
    /// The API answered `success: false`.
    #[error("API error: {0}")]
    Application(String),
    #[error("Malformed API response: {0}")]
    Malformed(String),
    #[error("Session storage failure: {0}")]
    Storage(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] Box<figment::Error>),
    #[error("Authentication is already in progress")]
    AuthInProgress,
    #[error("Not authenticated as admin")]
    Unauthenticated,
}

impl Error {
    /// Whether this failure came from the HTTP layer rather than the API itself.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status(_))
    }

    /// How loudly this error should be presented.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Validation(_) | Self::AuthInProgress | Self::Unauthenticated => {
                Severity::Warning
            }
            _ => Severity::Danger,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
