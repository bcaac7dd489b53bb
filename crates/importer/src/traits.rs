use crate::Result;
use crate::candidate::ImportCandidate;

/// An external results source that can list a swimmer's historical swims.
#[async_trait::async_trait]
pub trait TimesSource: Send + Sync {
    async fn fetch_times(&self, member_number: &str) -> Result<Vec<ImportCandidate>>;

    fn name(&self) -> &'static str;
}
