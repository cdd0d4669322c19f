/// Offline advisor matching symptom keywords to services
use crate::catalog::Service;
use crate::error::AdvisorError;

use super::{Recommendation, ServiceAdvisor};

/// One keyword rule
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub service_id: String,
    pub reasoning: String,
}

impl KeywordRule {
    pub fn new(keywords: &[&str], service_id: &str, reasoning: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            service_id: service_id.to_string(),
            reasoning: reasoning.to_string(),
        }
    }

    fn hits(&self, prompt: &str) -> usize {
        self.keywords.iter().filter(|k| prompt.contains(k.as_str())).count()
    }
}

/// Picks the rule with the most keyword hits; ties go to the earlier rule
pub struct KeywordAdvisor {
    rules: Vec<KeywordRule>,
}

impl KeywordAdvisor {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }
}

impl Default for KeywordAdvisor {
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new(
                &["neck", "shoulder", "office", "desk", "computer", "คอ", "บ่า", "ไหล่", "ออฟฟิศ"],
                "office-syndrome",
                "Focused work on the neck, shoulders and upper back eases desk-related aches.",
            ),
            KeywordRule::new(
                &["foot", "feet", "leg", "walk", "heel", "เท้า", "ขา", "เดิน"],
                "foot-massage",
                "Reflexology on the soles relieves tired legs and feet.",
            ),
            KeywordRule::new(
                &["stress", "sleep", "relax", "tired", "anxious", "เครียด", "นอน", "ผ่อนคลาย"],
                "aroma-oil",
                "A gentle aromatherapy oil massage helps you unwind and sleep better.",
            ),
            KeywordRule::new(
                &["back", "stiff", "whole body", "ache", "หลัง", "ปวดเมื่อย", "ตึง"],
                "thai-traditional",
                "Traditional Thai stretching and acupressure loosen stiffness across the body.",
            ),
        ])
    }
}

impl ServiceAdvisor for KeywordAdvisor {
    fn recommend(&self, prompt: &str, services: &[Service]) -> Result<Option<Recommendation>, AdvisorError> {
        let prompt = prompt.to_lowercase();

        let best = self
            .rules
            .iter()
            .filter(|rule| services.iter().any(|s| s.id == rule.service_id))
            .map(|rule| (rule.hits(&prompt), rule))
            .filter(|(hits, _)| *hits > 0)
            .fold(None::<(usize, &KeywordRule)>, |best, candidate| match best {
                Some((hits, _)) if hits >= candidate.0 => best,
                _ => Some(candidate),
            });

        Ok(best.map(|(_, rule)| Recommendation {
            service_id: rule.service_id.clone(),
            reasoning: rule.reasoning.clone(),
        }))
    }
}
