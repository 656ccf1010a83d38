//! Hand-off to a human agent.
//!
//! Two checks: an explicit request in the query short-circuits the whole
//! pipeline, and a hedging generated answer gets an offer appended.

use policyqa_core::config::EscalationConfig;

const HUMAN_REQUESTS: [&str; 3] = ["human agent", "speak to a person", "talk to someone"];

/// Matched literally; these are the phrasings the generator hedges with.
const LOW_CONFIDENCE_MARKERS: [&str; 2] = ["I don't know", "I'm not sure"];

pub const ESCALATION_OFFER: &str =
    "\n\nThis seems to be a complex query. Would you like me to connect you with a human agent for more detailed assistance?";

const MAX_DETAIL_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    phone: String,
    email: String,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new(&EscalationConfig::default())
    }
}

impl EscalationPolicy {
    pub fn new(config: &EscalationConfig) -> Self {
        Self { phone: config.phone.clone(), email: config.email.clone() }
    }

    pub fn wants_human(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        HUMAN_REQUESTS.iter().any(|phrase| query.contains(phrase))
    }

    pub fn human_agent_message(&self) -> String {
        format!(
            "I understand you'd like to speak with a human agent. Please call our customer service at {} or email {}. \
             An agent will assist you with your specific concerns.",
            self.phone, self.email
        )
    }

    pub fn is_low_confidence(&self, answer: &str) -> bool {
        LOW_CONFIDENCE_MARKERS.iter().any(|m| answer.contains(m))
    }

    pub fn apply_confidence_check(&self, mut answer: String) -> String {
        if self.is_low_confidence(&answer) {
            answer.push_str(ESCALATION_OFFER);
        }
        answer
    }

    /// Apology shown instead of an answer when anything in the pipeline failed.
    pub fn fallback_message(&self, detail: &str) -> String {
        let detail: String = detail.chars().take(MAX_DETAIL_CHARS).collect();
        format!(
            "I apologize, but I'm having trouble processing your request at the moment. This might be a complex query \
             that would be better addressed by one of our human insurance specialists. Please call our customer service \
             at {} or try rephrasing your question.\n\nTechnical details (for support): {}",
            self.phone, detail
        )
    }
}
