use policyqa_core::types::{recent_turns, ChatTurn, Message, Role};

use crate::responder::Responder;

pub const GREETING: &str = "Hello! I'm your insurance policy assistant. How can I help you today?";

/// State of one conversation: the visible transcript, the completed turns
/// used as context, and the responder built on first use.
pub struct Session {
    pub(crate) messages: Vec<Message>,
    pub(crate) turns: Vec<ChatTurn>,
    pub(crate) responder: Option<Box<dyn Responder>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self { messages: vec![greeting()], turns: Vec::new(), responder: None }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn recent_turns(&self, k: usize) -> &[ChatTurn] {
        recent_turns(&self.turns, k)
    }

    pub fn push_message(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message { role, content: content.into() });
    }

    pub fn record_turn(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn has_responder(&self) -> bool {
        self.responder.is_some()
    }

    /// Drop the built responder so the next query rebuilds it from the
    /// current documents.
    pub fn reset_responder(&mut self) {
        self.responder = None;
    }

    /// Forget the conversation. The built responder stays.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.turns.clear();
    }
}

fn greeting() -> Message {
    Message { role: Role::Assistant, content: GREETING.to_string() }
}
