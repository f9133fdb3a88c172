use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Login request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Login rejected with status {status}")]
    AuthRejected { status: u16 },

    #[error("Failed to parse login response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Login response contained no token")]
    TokenMissing,

    #[error("Scanner context call '{action}' failed: {reason}")]
    ContextMutation { action: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
