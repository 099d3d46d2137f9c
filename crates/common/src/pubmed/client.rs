//! PubMed E-utilities HTTP client
//!
//! API docs: https://www.ncbi.nlm.nih.gov/books/NBK25501/
//! Rate limit: 3 requests/second without API key, 10 with key

use crate::config::PubMedConfig;
use crate::errors::{AppError, Result};
use crate::metrics;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Thin client over `esearch` and `efetch`.
///
/// Every successful response is followed by the configured delay, so
/// sequential callers stay within the NCBI rate limit.
#[derive(Debug, Clone)]
pub struct PubMedClient {
    client: reqwest::Client,
    config: PubMedConfig,
}

impl PubMedClient {
    /// Create a new client
    pub fn new(config: PubMedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("{}/{}", config.tool, crate::VERSION))
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &PubMedConfig {
        &self.config
    }

    /// Raw esearch XML for `{last} {first}[author]`
    #[instrument(skip(self))]
    pub async fn search_author(&self, last_name: &str, first_name: &str) -> Result<String> {
        let term = format!("{} {}[author]", last_name, first_name);
        let params = vec![
            ("db", "pubmed".to_string()),
            ("term", term),
            ("retmax", self.config.max_results.to_string()),
        ];

        self.get("esearch", params, &format!("{} {}", last_name, first_name))
            .await
    }

    /// Raw MEDLINE text for one publication
    #[instrument(skip(self))]
    pub async fn fetch_medline(&self, pmid: &str) -> Result<String> {
        let params = vec![
            ("db", "pubmed".to_string()),
            ("id", pmid.to_string()),
            ("rettype", "medline".to_string()),
            ("retmode", "text".to_string()),
        ];

        self.get("efetch", params, pmid).await
    }

    async fn get(
        &self,
        endpoint: &str,
        mut params: Vec<(&str, String)>,
        query: &str,
    ) -> Result<String> {
        let url = format!("{}/{}.fcgi", self.config.base_url.trim_end_matches('/'), endpoint);

        params.push(("tool", self.config.tool.clone()));
        if let Some(ref email) = self.config.email {
            params.push(("email", email.clone()));
        }
        if let Some(ref api_key) = self.config.api_key {
            params.push(("api_key", api_key.clone()));
        }

        let start = Instant::now();
        let response = self
            .client
            .get(&url)
            .header("Accept", "text/xml")
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        metrics::record_remote(endpoint, status.as_u16(), start.elapsed().as_secs_f64());

        if status == reqwest::StatusCode::BAD_REQUEST {
            warn!(endpoint, query, "Bad request");
            return Err(AppError::BadRequest {
                query: query.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        debug!(endpoint, query, bytes = body.len(), "PubMed response");

        tokio::time::sleep(self.config.request_delay()).await;

        Ok(body)
    }
}
