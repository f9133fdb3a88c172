use crate::{Error, Result};
use async_trait::async_trait;
use url::Url;

/// Context-data categories the scanner stores per context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextDataCategory {
    HttpHeaders,
}

impl ContextDataCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextDataCategory::HttpHeaders => "httpHeaders",
        }
    }
}

/// Mutation operations on a scanner context.
///
/// The scanner owns and persists the context; this side only issues
/// commands against it. The trait exists so the refresh flow can be tested
/// without a running scanner.
#[async_trait]
pub trait ScannerApi: Send + Sync {
    /// Mark a context as in-scope for the active scan.
    async fn set_context_in_scope(&self, context_id: u32, in_scope: bool) -> Result<()>;

    /// Remove all stored entries under a category for a context.
    async fn remove_context_data(
        &self,
        context_id: u32,
        category: ContextDataCategory,
    ) -> Result<()>;

    /// Store one entry under a category for a context.
    async fn add_context_data(
        &self,
        context_id: u32,
        category: ContextDataCategory,
        value: &str,
    ) -> Result<()>;

    /// Pin the technology list for a context.
    async fn set_technologies(&self, context_id: u32, technologies: &[String]) -> Result<()>;
}

/// Client for a ZAP-style JSON action API.
///
/// Actions are plain GETs of the form
/// `{base}/JSON/context/action/{action}/?param=...`; the scanner answers
/// 200 with a small JSON body on success and a non-200 status otherwise.
pub struct HttpScannerClient {
    client: reqwest::Client,
    base: Url,
    api_key: Option<String>,
}

impl HttpScannerClient {
    pub fn new(client: reqwest::Client, base: Url, api_key: Option<String>) -> Self {
        Self {
            client,
            base,
            api_key,
        }
    }

    async fn call(&self, action: &str, params: Vec<(&str, String)>) -> Result<()> {
        let path = format!("JSON/context/action/{}/", action);
        let url = self.base.join(&path).map_err(|e| Error::ContextMutation {
            action: action.to_string(),
            reason: format!("invalid scanner API URL: {}", e),
        })?;

        let mut request = self.client.get(url).query(&params);
        if let Some(ref key) = self.api_key {
            request = request.query(&[("apikey", key.as_str())]);
        }

        tracing::debug!("Scanner API call: {}", action);

        let response = request.send().await.map_err(|e| Error::ContextMutation {
            action: action.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ContextMutation {
                action: action.to_string(),
                reason: format!("scanner answered with status {}", status),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ScannerApi for HttpScannerClient {
    async fn set_context_in_scope(&self, context_id: u32, in_scope: bool) -> Result<()> {
        self.call(
            "setContextInScope",
            vec![
                ("contextId", context_id.to_string()),
                ("booleanInScope", in_scope.to_string()),
            ],
        )
        .await
    }

    async fn remove_context_data(
        &self,
        context_id: u32,
        category: ContextDataCategory,
    ) -> Result<()> {
        self.call(
            "removeContextData",
            vec![
                ("contextId", context_id.to_string()),
                ("category", category.as_str().to_string()),
            ],
        )
        .await
    }

    async fn add_context_data(
        &self,
        context_id: u32,
        category: ContextDataCategory,
        value: &str,
    ) -> Result<()> {
        self.call(
            "addContextData",
            vec![
                ("contextId", context_id.to_string()),
                ("category", category.as_str().to_string()),
                ("data", value.to_string()),
            ],
        )
        .await
    }

    async fn set_technologies(&self, context_id: u32, technologies: &[String]) -> Result<()> {
        self.call(
            "setContextTechnologies",
            vec![
                ("contextId", context_id.to_string()),
                ("techNames", technologies.join(",")),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_name() {
        assert_eq!(ContextDataCategory::HttpHeaders.as_str(), "httpHeaders");
    }
}
