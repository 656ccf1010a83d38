//! policyqa-assistant
//!
//! The question-answering pipeline: a retriever over whichever index was
//! configured, a generative or extractive responder, the escalation policy,
//! and the per-conversation `Session` the pipeline threads through each query.

pub mod assistant;
pub mod escalation;
pub mod generator;
pub mod responder;
pub mod retriever;
pub mod session;

pub use assistant::{Assistant, KnowledgeBase, ResponderFactory};
pub use escalation::EscalationPolicy;
pub use generator::OpenAiGenerator;
pub use responder::{ExtractiveResponder, FailureKind, GenerativeResponder, Outcome, Responder, ResponderMode};
pub use retriever::{KnowledgeIndex, RetrievalResult, Retriever};
pub use session::Session;
