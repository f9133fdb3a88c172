use crate::credentials::CredentialSource;
use std::time::Duration;
use url::Url;

pub const DEFAULT_LOGIN_URL: &str = "http://127.0.0.1:3002/rest/user/login";
pub const DEFAULT_SCANNER_API: &str = "http://127.0.0.1:8080";
pub const DEFAULT_CONTEXT_ID: u32 = 0;
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Configuration for one session-refresh invocation.
///
/// Everything the hook previously hardcoded lives here: the target login
/// endpoint, the scanner's API location, which context to patch, and where
/// credentials come from.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Login endpoint of the application under scan.
    pub login_url: Url,
    /// Base URL of the scanner's JSON API.
    pub scanner_api: Url,
    /// API key the scanner requires on API calls, if any.
    pub scanner_api_key: Option<String>,
    /// Scanner context to mark in-scope and patch.
    pub context_id: u32,
    /// Where the login credentials come from.
    pub credentials: CredentialSource,
    /// Technology names to pin on the context after patching. Empty skips
    /// the step entirely.
    pub technologies: Vec<String>,
    /// Pause after patching so the burst of context calls does not flood
    /// the scanner.
    pub settle_delay: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            login_url: Url::parse(DEFAULT_LOGIN_URL).expect("default login URL is valid"),
            scanner_api: Url::parse(DEFAULT_SCANNER_API).expect("default scanner URL is valid"),
            scanner_api_key: None,
            context_id: DEFAULT_CONTEXT_ID,
            credentials: CredentialSource::default(),
            technologies: Vec::new(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_juice_shop_setup() {
        let config = RefreshConfig::default();
        assert_eq!(config.login_url.as_str(), "http://127.0.0.1:3002/rest/user/login");
        assert_eq!(config.context_id, 0);
        assert!(config.technologies.is_empty());
        assert_eq!(config.settle_delay, Duration::from_secs(1));
        assert!(config.scanner_api_key.is_none());
    }
}
