use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use policyqa_core::config::{Settings, Strategy};
use policyqa_core::data_processor::DataProcessor;
use policyqa_core::traits::{Embedder, Generator};
use policyqa_core::types::{ChatTurn, Chunk, Role};
use policyqa_core::Result;
use policyqa_embed::get_default_embedder;
use policyqa_text::CategoryIndex;
use policyqa_vector::{CacheStats, CachedEmbedder, FlatVectorIndex};

use crate::escalation::EscalationPolicy;
use crate::generator::OpenAiGenerator;
use crate::responder::{ExtractiveResponder, GenerativeResponder, Outcome, Responder, ResponderMode};
use crate::retriever::{KnowledgeIndex, Retriever};
use crate::session::Session;

/// Builds the responder a session answers with.
pub trait ResponderFactory: Send + Sync {
    fn build(&self) -> Result<Box<dyn Responder>>;
}

impl<F> ResponderFactory for F
where
    F: Fn() -> Result<Box<dyn Responder>> + Send + Sync,
{
    fn build(&self) -> Result<Box<dyn Responder>> {
        self()
    }
}

pub struct Assistant {
    factory: Box<dyn ResponderFactory>,
    escalation: EscalationPolicy,
    history_window: usize,
}

impl Assistant {
    pub fn new(factory: impl ResponderFactory + 'static, escalation: EscalationPolicy) -> Self {
        Self { factory: Box::new(factory), escalation, history_window: 5 }
    }

    pub fn with_history_window(mut self, turns: usize) -> Self {
        self.history_window = turns;
        self
    }

    /// Build the session's responder now rather than on the first query.
    pub fn prepare(&self, session: &mut Session) -> Result<()> {
        if session.responder.is_none() {
            session.responder = Some(self.factory.build()?);
        }
        Ok(())
    }

    /// Answer one query. Never fails: every error becomes the fail-open
    /// message, and the exchange is recorded either way.
    pub fn handle(&self, session: &mut Session, query: &str) -> String {
        session.push_message(Role::User, query);
        let answer = if self.escalation.wants_human(query) {
            info!("human agent requested");
            self.escalation.human_agent_message()
        } else {
            self.answer(session, query)
        };
        session.push_message(Role::Assistant, answer.as_str());
        session.record_turn(ChatTurn::new(query, answer.as_str()));
        answer
    }

    fn answer(&self, session: &mut Session, query: &str) -> String {
        if let Err(e) = self.prepare(session) {
            warn!(error = %e, "knowledge base unavailable");
            return self.escalation.fallback_message(&e.to_string());
        }
        let Some(responder) = session.responder.as_deref() else {
            return self.escalation.fallback_message("responder unavailable");
        };
        let history = session.recent_turns(self.history_window);
        match responder.respond(query, history) {
            Outcome::Success(text) if responder.mode() == ResponderMode::Generative => {
                self.escalation.apply_confidence_check(text)
            }
            Outcome::Success(text) => text,
            Outcome::Failure { kind, detail } => {
                warn!(?kind, detail = %detail, "responder failed");
                self.escalation.fallback_message(&detail)
            }
        }
    }
}

/// Production factory: loads (and seeds) the document directory, chunks it,
/// builds the configured index and wires the matching responder.
///
/// Embeddings go through one cache owned by the knowledge base, so rebuilding
/// over unchanged documents makes no provider calls.
pub struct KnowledgeBase {
    settings: Settings,
    base_dir: PathBuf,
    embedder: Arc<CachedEmbedder>,
    generator: Arc<dyn Generator>,
}

impl KnowledgeBase {
    pub fn new(settings: Settings, base_dir: &Path) -> Self {
        let embedder: Arc<dyn Embedder> = Arc::from(get_default_embedder(&settings.embedding));
        let generator: Arc<dyn Generator> = Arc::new(OpenAiGenerator::new(&settings.generation));
        Self { embedder: Arc::new(CachedEmbedder::new(embedder)), generator, settings, base_dir: base_dir.to_path_buf() }
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Arc::new(CachedEmbedder::new(embedder));
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.settings.data.documents_dir(&self.base_dir)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.embedder.stats()
    }

    pub fn load_chunks(&self) -> Result<Vec<Chunk>> {
        let processor = DataProcessor::new(self.settings.chunking)?;
        processor.process_directory(&self.documents_dir())
    }

    pub fn build_index(&self) -> Result<KnowledgeIndex> {
        let chunks = self.load_chunks()?;
        let index = match self.settings.retrieval.strategy {
            Strategy::Vector => KnowledgeIndex::Vector(FlatVectorIndex::build(
                &chunks,
                self.embedder.clone(),
                self.settings.retrieval.metric,
                self.settings.embedding.batch_size,
            )?),
            Strategy::Keyword => KnowledgeIndex::Keyword(CategoryIndex::build(&chunks)),
        };
        info!(strategy = ?self.settings.retrieval.strategy, entries = index.len(), "knowledge base ready");
        Ok(index)
    }

    pub fn retriever(&self) -> Result<Retriever> {
        Ok(Retriever::new(self.build_index()?, self.settings.retrieval.k))
    }
}

impl ResponderFactory for KnowledgeBase {
    fn build(&self) -> Result<Box<dyn Responder>> {
        let k = self.settings.retrieval.k;
        Ok(match self.build_index()? {
            index @ KnowledgeIndex::Keyword(_) => Box::new(ExtractiveResponder::new(Retriever::new(index, k))),
            index => Box::new(GenerativeResponder::new(Retriever::new(index, k), self.generator.clone())),
        })
    }
}
