/// Fire-and-forget recommendation requests
///
/// The advisor runs on its own thread and hands the result back over a
/// channel. Dropping the handle cancels delivery; the worker finishes and its
/// send fails silently. No retries.
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::catalog::Service;

use super::{recommend_or_none, Recommendation, ServiceAdvisor};

/// Result of polling a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisorOutcome {
    Pending,
    NoRecommendation,
    Recommended(Recommendation),
}

impl AdvisorOutcome {
    fn from_result(result: Option<Recommendation>) -> Self {
        match result {
            Some(r) => AdvisorOutcome::Recommended(r),
            None => AdvisorOutcome::NoRecommendation,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AdvisorOutcome::Pending)
    }

    pub fn into_recommendation(self) -> Option<Recommendation> {
        match self {
            AdvisorOutcome::Recommended(r) => Some(r),
            _ => None,
        }
    }
}

/// Handle to an in-flight recommendation
pub struct RecommendationRequest {
    rx: Receiver<Option<Recommendation>>,
    outcome: Option<AdvisorOutcome>,
}

impl RecommendationRequest {
    /// Start a request on a background thread. Blank prompts are never sent.
    pub fn spawn(advisor: Arc<dyn ServiceAdvisor>, prompt: &str, services: &[Service]) -> Option<Self> {
        let prompt = prompt.trim().to_string();
        if prompt.is_empty() {
            return None;
        }

        let services = services.to_vec();
        let (tx, rx) = bounded(1);

        let spawned = thread::Builder::new()
            .name("service-advisor".to_string())
            .spawn(move || {
                let result = recommend_or_none(advisor.as_ref(), &prompt, &services);
                if tx.send(result).is_err() {
                    tracing::debug!("[advisor] Request was cancelled before completion");
                }
            });

        if let Err(e) = spawned {
            tracing::warn!("[advisor] Failed to start advisor thread: {}", e);
            return None;
        }

        Some(Self { rx, outcome: None })
    }

    /// Non-blocking check for the result
    pub fn poll(&mut self) -> AdvisorOutcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let outcome = match self.rx.try_recv() {
            Ok(result) => AdvisorOutcome::from_result(result),
            Err(TryRecvError::Empty) => return AdvisorOutcome::Pending,
            Err(TryRecvError::Disconnected) => AdvisorOutcome::NoRecommendation,
        };
        self.outcome = Some(outcome.clone());
        outcome
    }

    /// Block up to `timeout`; a timeout counts as no recommendation
    pub fn wait(mut self, timeout: Duration) -> Option<Recommendation> {
        if let Some(outcome) = self.outcome.take() {
            return outcome.into_recommendation();
        }

        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!("[advisor] Gave up waiting after {:?}", timeout);
                None
            }
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Abandon the request. Consuming the handle drops the receiver, so the
    /// worker's send fails and its result is discarded.
    pub fn cancel(self) {}
}
