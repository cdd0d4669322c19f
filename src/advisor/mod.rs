/// Service recommendation collaborator
///
/// Turns a free-text description of aches or preferences into a suggested
/// service. Advisory only: a recommendation annotates the service list and
/// never gates a wizard transition, and every failure collapses to "no
/// recommendation".
///
/// ## Architecture
///
/// ```text
/// RecommendationRequest (background thread, crossbeam channel)
///   └── dyn ServiceAdvisor
///         ├── HttpAdvisor    (remote endpoint via ureq)
///         └── KeywordAdvisor (offline keyword rules)
/// ```

pub mod http;
pub mod keyword;
pub mod request;

use serde::{Deserialize, Serialize};

use crate::catalog::Service;
use crate::config::AdvisorConfig;
use crate::error::AdvisorError;

pub use http::HttpAdvisor;
pub use keyword::KeywordAdvisor;
pub use request::{AdvisorOutcome, RecommendationRequest};

/// A suggested service with the reasoning shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub service_id: String,
    pub reasoning: String,
}

pub trait ServiceAdvisor: Send + Sync {
    /// `Ok(None)` means the advisor had nothing to suggest
    fn recommend(&self, prompt: &str, services: &[Service]) -> Result<Option<Recommendation>, AdvisorError>;
}

/// Run an advisor and swallow failures
pub fn recommend_or_none(
    advisor: &dyn ServiceAdvisor,
    prompt: &str,
    services: &[Service],
) -> Option<Recommendation> {
    if prompt.trim().is_empty() {
        return None;
    }

    match advisor.recommend(prompt, services) {
        Ok(Some(recommendation)) if services.iter().any(|s| s.id == recommendation.service_id) => {
            tracing::debug!("[advisor] Recommended {}", recommendation.service_id);
            Some(recommendation)
        }
        Ok(Some(recommendation)) => {
            tracing::warn!(
                "[advisor] Ignoring recommendation for unknown service {}",
                recommendation.service_id
            );
            None
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("[advisor] Recommendation unavailable: {}", e);
            None
        }
    }
}

/// Remote advisor when an endpoint is configured, keyword rules otherwise
pub fn from_config(config: &AdvisorConfig) -> Box<dyn ServiceAdvisor> {
    match HttpAdvisor::from_config(config) {
        Ok(advisor) => Box::new(advisor),
        Err(_) => Box::new(KeywordAdvisor::default()),
    }
}
