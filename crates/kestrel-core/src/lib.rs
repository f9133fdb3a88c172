pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod refresh;
pub mod scanner;

pub use auth::{Authenticator, BearerToken};
pub use config::RefreshConfig;
pub use credentials::{CredentialSource, Credentials, Secret};
pub use error::{Error, Result};
pub use refresh::{RefreshReport, RefreshStep, SessionRefresher, StepOutcome};
pub use scanner::{ContextDataCategory, HttpScannerClient, ScannerApi};
