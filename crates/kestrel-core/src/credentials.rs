use crate::{Error, Result};
use std::fmt;

/// A secret string that never appears in `Debug` or `Display` output.
///
/// Login passwords and bearer tokens travel through log-adjacent code paths;
/// wrapping them keeps a stray `{:?}` from leaking them into scan logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying value. Callers are responsible for keeping it
    /// out of log output.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A resolved username/password pair for the target application.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Secret,
}

/// Where login credentials come from.
///
/// `Env` reads two process environment variables at resolve time; `Inline`
/// carries the values directly (for configs that inject them some other way).
#[derive(Debug, Clone)]
pub enum CredentialSource {
    Env {
        username_var: String,
        password_var: String,
    },
    Inline {
        username: String,
        password: Secret,
    },
}

pub const DEFAULT_USERNAME_VAR: &str = "ZAP_USERNAME";
pub const DEFAULT_PASSWORD_VAR: &str = "ZAP_PASSWORD";

impl Default for CredentialSource {
    fn default() -> Self {
        CredentialSource::Env {
            username_var: DEFAULT_USERNAME_VAR.to_string(),
            password_var: DEFAULT_PASSWORD_VAR.to_string(),
        }
    }
}

impl CredentialSource {
    /// Resolve to concrete credentials without any network I/O.
    ///
    /// An unset or empty environment variable is a configuration error, not
    /// a login failure; callers short-circuit before issuing any HTTP call.
    pub fn resolve(&self) -> Result<Credentials> {
        match self {
            CredentialSource::Env {
                username_var,
                password_var,
            } => {
                let username = read_env_var(username_var)?;
                let password = read_env_var(password_var)?;
                Ok(Credentials {
                    username,
                    password: Secret::new(password),
                })
            }
            CredentialSource::Inline { username, password } => {
                if username.is_empty() {
                    return Err(Error::MissingCredentials("empty username".to_string()));
                }
                if password.is_empty() {
                    return Err(Error::MissingCredentials("empty password".to_string()));
                }
                Ok(Credentials {
                    username: username.clone(),
                    password: password.clone(),
                })
            }
        }
    }
}

fn read_env_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingCredentials(format!(
            "environment variable {} is not set",
            name
        ))),
    }
}
