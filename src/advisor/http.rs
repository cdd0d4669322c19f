/// Remote advisor posting the prompt and service list to an HTTP endpoint
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::catalog::Service;
use crate::config::AdvisorConfig;
use crate::error::AdvisorError;

use super::{Recommendation, ServiceAdvisor};

#[derive(Debug, Serialize)]
struct RecommendationQuery<'a> {
    prompt: &'a str,
    services: Vec<ServiceSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct ServiceSummary<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
}

/// Endpoint response; a missing or empty id means "no recommendation"
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationResponse {
    recommended_service_id: Option<String>,
    #[serde(default)]
    reasoning: String,
}

impl RecommendationResponse {
    fn into_recommendation(self) -> Option<Recommendation> {
        let service_id = self.recommended_service_id?.trim().to_string();
        if service_id.is_empty() {
            return None;
        }
        Some(Recommendation {
            service_id,
            reasoning: self.reasoning,
        })
    }
}

pub struct HttpAdvisor {
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpAdvisor {
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(AdvisorError::NotConfigured)?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: env::var(&config.api_key_env).ok().filter(|k| !k.is_empty()),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

impl ServiceAdvisor for HttpAdvisor {
    fn recommend(&self, prompt: &str, services: &[Service]) -> Result<Option<Recommendation>, AdvisorError> {
        let query = RecommendationQuery {
            prompt,
            services: services
                .iter()
                .map(|s| ServiceSummary {
                    id: &s.id,
                    name: &s.name,
                    description: &s.description,
                })
                .collect(),
        };

        let mut request = ureq::post(&self.endpoint)
            .set("Accept", "application/json")
            .timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.set("Authorization", &format!("Bearer {}", key));
        }

        let response = request
            .send_json(&query)
            .map_err(|e| AdvisorError::RequestFailed(e.to_string().into()))?;

        let body: RecommendationResponse = response
            .into_json()
            .map_err(|e| AdvisorError::MalformedResponse(Box::new(e)))?;

        let recommendation = body.into_recommendation();
        if let Some(r) = &recommendation {
            if !services.iter().any(|s| s.id == r.service_id) {
                return Err(AdvisorError::UnknownService(r.service_id.clone()));
            }
        }
        Ok(recommendation)
    }
}
