use crate::config::ScorecardConfig;
use crate::prelude::*;
use scorecard_core::query::{build_query, QueryDescriptor, SearchCriteria};
use scorecard_core::results::{shape_results, ShapedResults};

/// HTTP collaborator for the `schools.json` endpoint
///
/// One call to [`ScorecardClient::search`] is one fetch and one shaping pass.
/// Failures are classified into [`Error`] and never retried.
#[derive(Debug, Clone)]
pub struct ScorecardClient {
    http: reqwest::Client,
    config: ScorecardConfig,
}

impl ScorecardClient {
    pub fn new(config: ScorecardConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("scorecard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Query descriptor for `criteria` against the configured endpoint
    pub fn query(&self, criteria: &SearchCriteria) -> QueryDescriptor {
        build_query(criteria, &self.config.api_key).with_base_url(&self.config.base_url)
    }

    /// Execute a query and return the parsed JSON document
    pub async fn fetch(&self, query: &QueryDescriptor) -> Result<serde_json::Value, Error> {
        log::debug!("GET {}", query.redacted_url());

        let response = self
            .http
            .get(query.url())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("schools.json returned {status}");
            return Err(Error::Status(status.as_u16()));
        }

        response.json().await.map_err(classify)
    }

    /// Fetch and shape the results for `criteria`
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<ShapedResults, Error> {
        let document = self.fetch(&self.query(criteria)).await?;
        let shaped = shape_results(&document, criteria.program_title_filter());

        log::debug!(
            "shaped {} schools ({} failed)",
            shaped.records.len(),
            shaped.failures.len()
        );
        for failure in &shaped.failures {
            log::warn!(
                "skipping school #{} ({}): {}",
                failure.index,
                failure.school_name.as_deref().unwrap_or("unknown"),
                failure.error
            );
        }

        Ok(shaped)
    }
}

/// Map a transport error onto the fetch failure taxonomy
fn classify(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        return Error::Timeout;
    }
    if err.is_decode() {
        return Error::Decode(err.to_string());
    }
    if err.is_connect() {
        if is_dns_failure(&err) {
            return Error::Dns;
        }
        return Error::Connect;
    }
    Error::Unexpected(err.to_string())
}

fn is_dns_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(e) = source {
        let message = e.to_string().to_lowercase();
        if message.contains("dns error") || message.contains("failed to lookup address") {
            return true;
        }
        source = e.source();
    }
    false
}
