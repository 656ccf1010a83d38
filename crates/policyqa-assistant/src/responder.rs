use std::sync::Arc;

use tracing::{debug, warn};

use policyqa_core::traits::{GenerationRequest, Generator};
use policyqa_core::types::{Category, ChatTurn};
use policyqa_core::Error;
use policyqa_text::classify_query;

use crate::retriever::{RetrievalResult, Retriever};

pub const SYSTEM_PROMPT: &str = "You are an insurance policy information assistant. Your role is to help customers \
understand different insurance policies, coverage options, premiums, claims processes, and other insurance-related \
information.

Provide accurate, helpful, and concise responses based on the information available in the knowledge base. If you're \
unsure about something or if a question is outside the scope of insurance policies, acknowledge your limitations and \
suggest the customer speak with a human agent.

For complex or highly specific questions about individual policies, suggest that the customer contact a human agent \
for personalized assistance.

Be professional, empathetic, and focused on helping the customer understand their insurance options.";

const GENERAL_PROMPT: &str = "I can help you with information about the following types of insurance:

- Health insurance
- Life insurance
- Auto insurance
- Home insurance

Which type of insurance would you like to know more about?";

const CONDENSE_INSTRUCTION: &str = "Given the following conversation and a follow up question, rephrase the follow up \
question to be a standalone question, in its original language.";

const MORE_DETAIL_PROMPT: &str =
    "Could you tell me more about what you'd like to know, such as premiums, coverage, claims, or deductibles?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderMode {
    Generative,
    Extractive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Embedding,
    Generation,
    Index,
}

/// What a responder produced. Failures carry enough detail for the
/// pipeline to render a fail-open message; they are never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure { kind: FailureKind, detail: String },
}

impl Outcome {
    pub fn from_error(err: &Error) -> Self {
        let kind = match err {
            Error::EmbeddingFailure(_) => FailureKind::Embedding,
            Error::GenerationFailure(_) => FailureKind::Generation,
            Error::InvalidConfig(_) | Error::Io { .. } => FailureKind::Index,
        };
        Outcome::Failure { kind, detail: err.to_string() }
    }
}

pub trait Responder: Send + Sync {
    fn mode(&self) -> ResponderMode;
    fn respond(&self, query: &str, history: &[ChatTurn]) -> Outcome;
}

/// Retrieval-augmented answers from a generation provider.
pub struct GenerativeResponder {
    retriever: Retriever,
    generator: Arc<dyn Generator>,
}

impl GenerativeResponder {
    pub fn new(retriever: Retriever, generator: Arc<dyn Generator>) -> Self {
        Self { retriever, generator }
    }

    /// Rewrite a follow-up into a question that stands on its own, so that
    /// "what about its deductible?" retrieves with its subject. Without
    /// history, or when the rewrite fails, the query is used as typed.
    fn standalone_question(&self, query: &str, history: &[ChatTurn]) -> String {
        if history.is_empty() {
            return query.to_string();
        }
        match self.generator.complete(&condense_prompt(history, query)) {
            Ok(rewritten) if !rewritten.trim().is_empty() => {
                debug!(original = query, rewritten = rewritten.trim(), "condensed follow-up question");
                rewritten.trim().to_string()
            }
            Ok(_) => {
                warn!("question rewrite came back blank, retrieving with the raw query");
                query.to_string()
            }
            Err(e) => {
                warn!(error = %e, "question rewrite failed, retrieving with the raw query");
                query.to_string()
            }
        }
    }
}

impl Responder for GenerativeResponder {
    fn mode(&self) -> ResponderMode {
        ResponderMode::Generative
    }

    fn respond(&self, query: &str, history: &[ChatTurn]) -> Outcome {
        let question = self.standalone_question(query, history);
        let retrieved = match self.retriever.retrieve(&question) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "retrieval failed");
                return Outcome::from_error(&e);
            }
        };
        let request = GenerationRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            history: history.to_vec(),
            context: retrieved.context(),
            question,
        };
        debug!(history = history.len(), context_chars = request.context.len(), "generating answer");
        match self.generator.generate(&request) {
            Ok(text) => Outcome::Success(text),
            Err(e) => {
                warn!(error = %e, "generation failed");
                Outcome::from_error(&e)
            }
        }
    }
}

/// Prompt asking the generator to turn `question` into a standalone one,
/// given the conversation so far.
pub fn condense_prompt(history: &[ChatTurn], question: &str) -> String {
    let transcript: String = history
        .iter()
        .map(|turn| format!("Human: {}\nAssistant: {}\n", turn.query, turn.answer))
        .collect();
    format!("{CONDENSE_INSTRUCTION}\n\nChat History:\n{transcript}Follow Up Input: {question}\nStandalone question:")
}

/// Canned answers assembled from retrieved text; no generation provider.
pub struct ExtractiveResponder {
    retriever: Retriever,
}

impl ExtractiveResponder {
    pub fn new(retriever: Retriever) -> Self {
        Self { retriever }
    }
}

impl Responder for ExtractiveResponder {
    fn mode(&self) -> ResponderMode {
        ResponderMode::Extractive
    }

    fn respond(&self, query: &str, _history: &[ChatTurn]) -> Outcome {
        match self.retriever.retrieve(query) {
            Ok(RetrievalResult::Extract { category, segments, .. }) => Outcome::Success(extractive_answer(category, &segments)),
            // Over a vector index the query still picks the category; the
            // nearest chunks stand in for extracted lines.
            Ok(RetrievalResult::Chunks(hits)) => {
                let segments: Vec<String> = hits.into_iter().map(|h| h.chunk.text).collect();
                Outcome::Success(extractive_answer(classify_query(query).0, &segments))
            }
            Err(e) => Outcome::from_error(&e),
        }
    }
}

pub fn extractive_answer(category: Category, segments: &[String]) -> String {
    match category {
        Category::General => GENERAL_PROMPT.to_string(),
        _ if segments.is_empty() => format!("{} {}", category_description(category), MORE_DETAIL_PROMPT),
        _ => format!(
            "Based on our information about {} insurance:\n\n{}\n\nIs there anything specific about this you'd like to know more about?",
            category,
            segments.join("\n")
        ),
    }
}

fn category_description(category: Category) -> &'static str {
    match category {
        Category::Health => "Health insurance helps pay for medical care such as doctor visits, hospital stays, and prescriptions.",
        Category::Life => "Life insurance pays a benefit to your beneficiaries when you pass away.",
        Category::Auto => "Auto insurance protects you against the cost of vehicle damage and liability after an accident.",
        Category::Home => "Home insurance protects your house and belongings and covers liability for injuries on your property.",
        Category::General => GENERAL_PROMPT,
    }
}
