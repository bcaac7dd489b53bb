use std::time::Duration;

use crate::error::{ImporterError, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.swimmingresults.org/individualbest";

#[derive(Debug, Clone)]
pub struct SwimmingResultsClient {
    base_url: String,
    client: reqwest::Client,
}

impl SwimmingResultsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("swimqt importer/0.1")
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn personal_best_url(&self, member_number: &str) -> String {
        format!(
            "{}/personal_best.php?mode=A&tiref={}",
            self.base_url, member_number
        )
    }

    pub async fn fetch_personal_bests(&self, member_number: &str) -> Result<String> {
        self.fetch_page(&self.personal_best_url(member_number)).await
    }

    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        tracing::debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ImporterError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await?;
        tracing::debug!("Fetched {} bytes", html.len());
        Ok(html)
    }
}
