mod client;
pub mod parser;

pub use client::{DEFAULT_BASE_URL, SwimmingResultsClient};
pub use parser::DetailLink;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::candidate::ImportCandidate;
use crate::error::{ImporterError, Result};
use crate::traits::TimesSource;

pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Pulls a swimmer's full swim history from the national results site: the
/// personal-best summary first, then each event's detail page.
pub struct SwimmingResultsImporter {
    client: SwimmingResultsClient,
    batch_size: usize,
}

impl SwimmingResultsImporter {
    pub fn new(client: SwimmingResultsClient, batch_size: usize) -> Self {
        Self {
            client,
            batch_size: batch_size.max(1),
        }
    }

    /// Fetches detail pages `batch_size` at a time. A page that fails to
    /// load is logged and skipped.
    async fn fetch_details(&self, links: Vec<DetailLink>) -> Vec<ImportCandidate> {
        let mut candidates = Vec::new();

        for batch in links.chunks(self.batch_size) {
            let mut tasks = JoinSet::new();
            for link in batch.iter().cloned() {
                let client = self.client.clone();
                tasks.spawn(async move {
                    let page = client.fetch_page(&link.url).await;
                    (link, page)
                });
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((link, Ok(html))) => {
                        candidates.extend(parser::parse_detail_page(&html, &link));
                    }
                    Ok((link, Err(e))) => {
                        warn!("Failed to fetch detail for {}: {}", link.event_name, e);
                    }
                    Err(e) => warn!("Detail fetch task failed: {}", e),
                }
            }
        }
        candidates
    }
}

#[async_trait::async_trait]
impl TimesSource for SwimmingResultsImporter {
    async fn fetch_times(&self, member_number: &str) -> Result<Vec<ImportCandidate>> {
        let html = self.client.fetch_personal_bests(member_number).await?;
        if parser::is_unrecognised(&html) {
            return Err(ImporterError::MemberNotRecognised(member_number.to_string()));
        }

        let links = parser::detail_links(&html, self.client.base_url());
        info!(
            "Found {} events for member {}, fetching in batches of {}",
            links.len(),
            member_number,
            self.batch_size
        );

        let mut candidates = self.fetch_details(links).await;
        candidates.sort_by_key(|c| (c.date, c.stroke, c.distance, c.course));
        info!("Parsed {} swims", candidates.len());
        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "swimmingresults.org"
    }
}
