use crate::credentials::Credentials;
use crate::{Error, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

/// Bearer token returned by the target application's login endpoint.
///
/// Wraps the raw token so it renders redacted in debug output; the only way
/// out is through the header formatting helpers.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Header value form, e.g. `Bearer abc123`.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Full header line form stored in the scanner's context data, e.g.
    /// `Authorization: Bearer abc123`.
    pub fn header_line(&self) -> String {
        format!("Authorization: Bearer {}", self.0)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([redacted])")
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    authentication: Option<AuthenticationBody>,
}

#[derive(Deserialize)]
struct AuthenticationBody {
    token: Option<String>,
}

/// Logs into the target application and extracts a bearer token.
pub struct Authenticator {
    client: reqwest::Client,
    login_url: Url,
}

impl Authenticator {
    pub fn new(client: reqwest::Client, login_url: Url) -> Self {
        Self { client, login_url }
    }

    /// POST the credentials to the login endpoint and pull the token out of
    /// the `authentication.token` field of the JSON response.
    ///
    /// Does not log the password, the token, or the response body.
    pub async fn login(&self, credentials: &Credentials) -> Result<BearerToken> {
        tracing::info!(
            "Logging in to {} as {}",
            self.login_url,
            credentials.username
        );

        let body = LoginRequest {
            email: &credentials.username,
            password: credentials.password.expose(),
        };

        let response = self
            .client
            .post(self.login_url.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Login endpoint answered with status {}", status);

        if status != StatusCode::OK {
            return Err(Error::AuthRejected {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let parsed: LoginResponse = serde_json::from_str(&text)?;

        let token = parsed
            .authentication
            .and_then(|auth| auth.token)
            .filter(|token| !token.is_empty())
            .ok_or(Error::TokenMissing)?;

        tracing::info!("Login succeeded, got a fresh session token");
        Ok(BearerToken::new(token))
    }
}
