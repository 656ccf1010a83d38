use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use policyqa_assistant::escalation::ESCALATION_OFFER;
use policyqa_assistant::session::GREETING;
use policyqa_assistant::{
    Assistant, EscalationPolicy, ExtractiveResponder, GenerativeResponder, KnowledgeBase, KnowledgeIndex, Outcome, Responder, ResponderMode,
    Retriever, Session,
};
use policyqa_core::chunker::split;
use policyqa_core::config::{DistanceMetric, EmbeddingProviderKind, Settings, Strategy};
use policyqa_core::seed::SEED_DOCUMENTS;
use policyqa_core::traits::{GenerationRequest, Generator};
use policyqa_core::types::{ChatTurn, Chunk, Role};
use policyqa_core::{Error, Result};
use policyqa_embed::HashEmbedder;
use policyqa_text::CategoryIndex;
use policyqa_vector::FlatVectorIndex;

fn settings(strategy: Strategy) -> Settings {
    let mut settings = Settings::default();
    settings.retrieval.strategy = strategy;
    settings.embedding.provider = EmbeddingProviderKind::Hash;
    settings
}

/// Replies with a fixed answer and keeps every request it saw. Question
/// rewrites answer with `standalone`, or fail when it is unset.
struct ScriptedGenerator {
    reply: String,
    standalone: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: reply.to_string(), standalone: None, requests: Mutex::new(Vec::new()), prompts: Mutex::new(Vec::new()) })
    }

    fn rewriting(reply: &str, standalone: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            standalone: Some(standalone.to_string()),
            requests: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().expect("lock").push(request.clone());
        Ok(self.reply.clone())
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().expect("lock").push(prompt.to_string());
        self.standalone.clone().ok_or_else(|| Error::GenerationFailure("no rewrite scripted".into()))
    }
}

struct FailingGenerator;

impl Generator for FailingGenerator {
    fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        Err(Error::GenerationFailure("upstream timed out".into()))
    }

    fn complete(&self, _prompt: &str) -> Result<String> {
        Err(Error::GenerationFailure("upstream timed out".into()))
    }
}

fn seed_chunks() -> Vec<Chunk> {
    SEED_DOCUMENTS
        .iter()
        .flat_map(|(name, text)| split(name.trim_end_matches(".txt"), text, 1000, 200).expect("valid params"))
        .collect()
}

struct FixedResponder {
    mode: ResponderMode,
    text: &'static str,
}

impl Responder for FixedResponder {
    fn mode(&self) -> ResponderMode {
        self.mode
    }
    fn respond(&self, _query: &str, _history: &[ChatTurn]) -> Outcome {
        Outcome::Success(self.text.to_string())
    }
}

fn counting_factory(builds: Arc<AtomicUsize>, mode: ResponderMode, text: &'static str) -> impl Fn() -> Result<Box<dyn Responder>> + Send + Sync {
    move || {
        builds.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixedResponder { mode, text }) as Box<dyn Responder>)
    }
}

#[test]
fn human_request_short_circuits_without_building() {
    let builds = Arc::new(AtomicUsize::new(0));
    let policy = EscalationPolicy::default();
    let assistant = Assistant::new(counting_factory(builds.clone(), ResponderMode::Generative, "unused"), policy.clone());
    let mut session = Session::new();

    let answer = assistant.handle(&mut session, "Can I speak to a person?");
    assert_eq!(answer, policy.human_agent_message());
    assert_eq!(builds.load(Ordering::SeqCst), 0);
    assert!(!session.has_responder());
    assert_eq!(session.turns().len(), 1);
}

#[test]
fn responder_is_built_once_per_session() {
    let builds = Arc::new(AtomicUsize::new(0));
    let assistant = Assistant::new(counting_factory(builds.clone(), ResponderMode::Extractive, "ok"), EscalationPolicy::default());
    let mut session = Session::new();
    for q in ["one", "two", "three"] {
        assert_eq!(assistant.handle(&mut session, q), "ok");
    }
    assert_eq!(builds.load(Ordering::SeqCst), 1);

    session.clear();
    assistant.handle(&mut session, "four");
    assert_eq!(builds.load(Ordering::SeqCst), 1, "clear keeps the built responder");
}

#[test]
fn failed_build_is_rendered_and_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let factory = move || -> Result<Box<dyn Responder>> {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(Error::InvalidConfig("documents unavailable".into()));
        }
        Ok(Box::new(FixedResponder { mode: ResponderMode::Extractive, text: "ready" }))
    };
    let assistant = Assistant::new(factory, EscalationPolicy::default());
    let mut session = Session::new();

    let first = assistant.handle(&mut session, "premium?");
    assert!(first.contains("1-800-INS-HELP"));
    assert!(first.contains("Technical details (for support): Invalid configuration: documents unavailable"));
    assert_eq!(assistant.handle(&mut session, "premium?"), "ready");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn hedging_generated_answer_gets_offer() {
    let builds = Arc::new(AtomicUsize::new(0));
    let assistant = Assistant::new(counting_factory(builds, ResponderMode::Generative, "I'm not sure about flood cover."), EscalationPolicy::default());
    let answer = assistant.handle(&mut Session::new(), "does home insurance cover floods");
    assert_eq!(answer, format!("I'm not sure about flood cover.{ESCALATION_OFFER}"));
}

#[test]
fn extractive_answers_skip_confidence_check() {
    let builds = Arc::new(AtomicUsize::new(0));
    let assistant = Assistant::new(counting_factory(builds, ResponderMode::Extractive, "I don't know"), EscalationPolicy::default());
    assert_eq!(assistant.handle(&mut Session::new(), "anything"), "I don't know");
}

#[test]
fn transcript_records_both_sides() {
    let builds = Arc::new(AtomicUsize::new(0));
    let assistant = Assistant::new(counting_factory(builds, ResponderMode::Extractive, "answer"), EscalationPolicy::default());
    let mut session = Session::new();
    assistant.handle(&mut session, "question");

    let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, [Role::Assistant, Role::User, Role::Assistant]);
    assert_eq!(session.messages()[0].content, GREETING);
    assert_eq!(session.turns(), &[ChatTurn::new("question", "answer")]);
}

#[test]
fn keyword_strategy_answers_home_deductible_from_seed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let kb = KnowledgeBase::new(settings(Strategy::Keyword), dir.path());
    let assistant = Assistant::new(kb, EscalationPolicy::default());
    let mut session = Session::new();

    let answer = assistant.handle(&mut session, "what's the deductible for home insurance");
    assert!(answer.starts_with("Based on our information about home insurance:\n\n"), "{answer}");
    assert!(answer.contains("Deductible Options: $500, $1,000, $2,500"));
    assert!(dir.path().join("insurance_data/home_insurance.txt").exists());
}

#[test]
fn keyword_strategy_lists_categories_for_general_queries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let assistant = Assistant::new(KnowledgeBase::new(settings(Strategy::Keyword), dir.path()), EscalationPolicy::default());
    let answer = assistant.handle(&mut Session::new(), "hello there");
    for name in ["Health", "Life", "Auto", "Home"] {
        assert!(answer.contains(&format!("{name} insurance")));
    }
}

#[test]
fn vector_strategy_fails_open_on_generator_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let kb = KnowledgeBase::new(settings(Strategy::Vector), dir.path()).with_generator(Arc::new(FailingGenerator));
    let assistant = Assistant::new(kb, EscalationPolicy::default());
    let answer = assistant.handle(&mut Session::new(), "how much does premium health insurance cost");
    assert!(answer.contains("1-800-INS-HELP"));
    assert!(answer.contains("upstream timed out"));
}

#[test]
fn generator_sees_context_and_recent_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let generator = ScriptedGenerator::new("Here is what I found.");
    let kb = KnowledgeBase::new(settings(Strategy::Vector), dir.path()).with_generator(generator.clone());
    let assistant = Assistant::new(kb, EscalationPolicy::default()).with_history_window(2);
    let mut session = Session::new();

    for q in ["life insurance beneficiary", "term life premium", "whole life cash value", "universal life"] {
        assert_eq!(assistant.handle(&mut session, q), "Here is what I found.");
    }
    let requests = generator.requests.lock().expect("lock");
    assert_eq!(requests.len(), 4);
    let last = &requests[3];
    assert_eq!(last.question, "universal life");
    let asked: Vec<&str> = last.history.iter().map(|t| t.query.as_str()).collect();
    assert_eq!(asked, ["term life premium", "whole life cash value"]);
    assert!(!last.context.is_empty());
    assert!(last.system_prompt.starts_with("You are an insurance policy information assistant."));
}

#[test]
fn follow_up_is_rewritten_before_retrieval() {
    let generator = ScriptedGenerator::rewriting("Deductibles range from $500 to $2,500.", "What is the deductible for home insurance?");
    let retriever = Retriever::new(KnowledgeIndex::Keyword(CategoryIndex::build(&seed_chunks())), 4);
    let responder = GenerativeResponder::new(retriever, generator.clone());
    let history = [ChatTurn::new("Tell me about home insurance", "Home insurance protects your house.")];

    let out = responder.respond("what about its deductible?", &history);
    assert_eq!(out, Outcome::Success("Deductibles range from $500 to $2,500.".into()));

    let prompts = generator.prompts.lock().expect("lock");
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Human: Tell me about home insurance\nAssistant: Home insurance protects your house.\n"));
    assert!(prompts[0].contains("Follow Up Input: what about its deductible?"));

    let requests = generator.requests.lock().expect("lock");
    assert_eq!(requests[0].question, "What is the deductible for home insurance?");
    assert!(requests[0].context.contains("Deductible Options: $500, $1,000, $2,500"), "{}", requests[0].context);
    assert_eq!(requests[0].history, history);
}

#[test]
fn first_question_skips_the_rewrite() {
    let generator = ScriptedGenerator::rewriting("ok", "never used");
    let retriever = Retriever::new(KnowledgeIndex::Keyword(CategoryIndex::build(&seed_chunks())), 4);
    let responder = GenerativeResponder::new(retriever, generator.clone());

    responder.respond("home insurance deductible", &[]);
    assert!(generator.prompts.lock().expect("lock").is_empty());
    assert_eq!(generator.requests.lock().expect("lock")[0].question, "home insurance deductible");
}

#[test]
fn extractive_answer_over_vector_index_uses_nearest_chunks() {
    let chunks = seed_chunks();
    let index = FlatVectorIndex::build(&chunks, Arc::new(HashEmbedder::new(64)), DistanceMetric::Cosine, 8).expect("index");
    let responder = ExtractiveResponder::new(Retriever::new(KnowledgeIndex::Vector(index), 2));
    assert_eq!(responder.mode(), ResponderMode::Extractive);

    match responder.respond("auto insurance collision coverage", &[]) {
        Outcome::Success(answer) => {
            assert!(answer.starts_with("Based on our information about auto insurance:\n\n"), "{answer}");
            assert!(chunks.iter().any(|c| answer.contains(&c.text)));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn rebuilding_reuses_cached_embeddings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let kb = KnowledgeBase::new(settings(Strategy::Vector), dir.path());
    let chunks = kb.load_chunks().expect("chunks").len();

    kb.build_index().expect("first build");
    kb.build_index().expect("second build");
    let stats = kb.cache_stats();
    assert_eq!(stats.misses, chunks);
    assert_eq!(stats.hits, chunks);
}
