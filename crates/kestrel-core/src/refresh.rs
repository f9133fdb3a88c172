use crate::auth::Authenticator;
use crate::config::RefreshConfig;
use crate::scanner::{ContextDataCategory, ScannerApi};
use crate::Result;
use serde::Serialize;

/// The individual steps of one refresh invocation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStep {
    Authenticate,
    SetInScope,
    RemoveStaleHeaders,
    AddAuthorizationHeader,
    SetTechnologies,
}

impl RefreshStep {
    pub fn describe(&self) -> &'static str {
        match self {
            RefreshStep::Authenticate => "log in and obtain a session token",
            RefreshStep::SetInScope => "mark the context in-scope",
            RefreshStep::RemoveStaleHeaders => "remove stale context headers",
            RefreshStep::AddAuthorizationHeader => "install the new Authorization header",
            RefreshStep::SetTechnologies => "pin the context technology list",
        }
    }
}

/// Outcome of a single step. `error` is `None` on success.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: RefreshStep,
    pub error: Option<String>,
}

impl StepOutcome {
    fn record(step: RefreshStep, result: Result<()>) -> Self {
        let error = match result {
            Ok(()) => None,
            Err(ref e) => {
                tracing::warn!("Refresh step failed ({}): {}", step.describe(), e);
                Some(e.to_string())
            }
        };
        Self { step, error }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate result of one refresh invocation.
///
/// The refresher never aborts mid-patch; every attempted step lands here so
/// the caller can log it, render it, or assert on it instead of digging
/// through console output.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub context_id: u32,
    pub steps: Vec<StepOutcome>,
}

impl RefreshReport {
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(StepOutcome::succeeded)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| !s.succeeded())
    }

    /// True when authentication failed and no context mutation was issued.
    pub fn skipped_patch(&self) -> bool {
        self.steps.len() == 1 && !self.steps[0].succeeded()
    }
}

/// Re-authenticates against the target application and patches the
/// scanner's context with a fresh `Authorization` header.
///
/// Intended to be invoked by the scanner at its scan-lifecycle events; each
/// invocation is self-contained and re-authenticates from scratch.
pub struct SessionRefresher<S: ScannerApi> {
    config: RefreshConfig,
    authenticator: Authenticator,
    scanner: S,
}

impl<S: ScannerApi> SessionRefresher<S> {
    pub fn new(config: RefreshConfig, authenticator: Authenticator, scanner: S) -> Self {
        Self {
            config,
            authenticator,
            scanner,
        }
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    pub fn config_mut(&mut self) -> &mut RefreshConfig {
        &mut self.config
    }

    /// Run one refresh: authenticate, then patch the context best-effort.
    ///
    /// Authentication failure ends the invocation without touching scanner
    /// state. Patch steps are independent; a failed step is recorded and
    /// the next one still runs.
    pub async fn run(&self) -> RefreshReport {
        let context_id = self.config.context_id;
        let mut steps = Vec::new();

        let token = match self.authenticate().await {
            Ok(token) => {
                steps.push(StepOutcome::record(RefreshStep::Authenticate, Ok(())));
                token
            }
            Err(e) => {
                tracing::error!("Session refresh aborted: {}", e);
                steps.push(StepOutcome::record(RefreshStep::Authenticate, Err(e)));
                return RefreshReport { context_id, steps };
            }
        };

        steps.push(StepOutcome::record(
            RefreshStep::SetInScope,
            self.scanner.set_context_in_scope(context_id, true).await,
        ));

        steps.push(StepOutcome::record(
            RefreshStep::RemoveStaleHeaders,
            self.scanner
                .remove_context_data(context_id, ContextDataCategory::HttpHeaders)
                .await,
        ));

        steps.push(StepOutcome::record(
            RefreshStep::AddAuthorizationHeader,
            self.scanner
                .add_context_data(
                    context_id,
                    ContextDataCategory::HttpHeaders,
                    &token.header_line(),
                )
                .await,
        ));

        if !self.config.technologies.is_empty() {
            steps.push(StepOutcome::record(
                RefreshStep::SetTechnologies,
                self.scanner
                    .set_technologies(context_id, &self.config.technologies)
                    .await,
            ));
        }

        // Let the scanner absorb the burst of context calls before the
        // caller fires the next lifecycle event.
        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }

        let report = RefreshReport { context_id, steps };
        if report.succeeded() {
            tracing::info!("Session refreshed for context {}", context_id);
        }
        report
    }

    async fn authenticate(&self) -> Result<crate::auth::BearerToken> {
        let credentials = self.config.credentials.resolve()?;
        self.authenticator.login(&credentials).await
    }
}

impl SessionRefresher<crate::scanner::HttpScannerClient> {
    /// Build a refresher that talks to a real scanner over its JSON API,
    /// sharing one HTTP client between the login and scanner calls.
    pub fn from_config(config: RefreshConfig, client: reqwest::Client) -> Self {
        let authenticator = Authenticator::new(client.clone(), config.login_url.clone());
        let scanner = crate::scanner::HttpScannerClient::new(
            client,
            config.scanner_api.clone(),
            config.scanner_api_key.clone(),
        );
        SessionRefresher::new(config, authenticator, scanner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(step: RefreshStep, error: Option<&str>) -> StepOutcome {
        StepOutcome {
            step,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn report_succeeds_when_all_steps_clean() {
        let report = RefreshReport {
            context_id: 0,
            steps: vec![
                outcome(RefreshStep::Authenticate, None),
                outcome(RefreshStep::SetInScope, None),
                outcome(RefreshStep::RemoveStaleHeaders, None),
                outcome(RefreshStep::AddAuthorizationHeader, None),
            ],
        };
        assert!(report.succeeded());
        assert!(!report.skipped_patch());
        assert_eq!(report.failed_steps().count(), 0);
    }

    #[test]
    fn report_with_auth_failure_only_is_a_skipped_patch() {
        let report = RefreshReport {
            context_id: 0,
            steps: vec![outcome(
                RefreshStep::Authenticate,
                Some("Login rejected with status 401"),
            )],
        };
        assert!(!report.succeeded());
        assert!(report.skipped_patch());
    }

    #[test]
    fn report_serializes_with_snake_case_steps() {
        let report = RefreshReport {
            context_id: 0,
            steps: vec![outcome(RefreshStep::RemoveStaleHeaders, Some("boom"))],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("remove_stale_headers"));
        assert!(json.contains("boom"));
    }
}
