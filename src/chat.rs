//! Conversation state: the message list and the pending flag.
//!
//! This is the single source of truth for what the chat pane displays. It is
//! deliberately free of any network or UI dependency so the turn lifecycle can
//! be tested by feeding outcomes in directly.

use anyhow::Result;

/// Greeting seeded as the first message of every session.
pub const GREETING: &str = "Hello! I am your Indian Legal Assistant. \
Ask anything about IPC, CrPC, Evidence Act, or Indian court procedures.";

/// Prefix for bot messages that report a failed request.
pub const ERROR_PREFIX: &str = "⚠️ Error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// A single chat message. Bot text is markdown, user text is plain.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
}

/// Ordered, append-only message history plus the in-flight flag.
///
/// Messages are never mutated or removed once pushed, so a reply that lands
/// late can only append after whatever else completed first.
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    pending: bool,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            pending: false,
            next_id: 1,
        };
        conversation.push(Sender::Bot, GREETING.to_string());
        conversation
    }

    fn push(&mut self, sender: Sender, text: String) {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message { id, sender, text });
    }

    /// Start a turn from raw input.
    ///
    /// Whitespace-only input is ignored entirely: nothing is appended and no
    /// request should be issued. Otherwise the literal (untrimmed) text is
    /// appended as a user message, the pending flag is raised, and the
    /// question text is returned for the gateway call.
    pub fn begin_turn(&mut self, input: &str) -> Option<String> {
        if input.trim().is_empty() {
            return None;
        }
        self.push(Sender::User, input.to_string());
        self.pending = true;
        Some(input.to_string())
    }

    /// Finish a turn with the gateway's outcome.
    ///
    /// Failures become ordinary bot messages carrying [`ERROR_PREFIX`]; they
    /// are never fatal and the user may submit again immediately. The pending
    /// flag clears on both paths.
    pub fn resolve(&mut self, outcome: Result<String>) {
        match outcome {
            Ok(answer) => self.push(Sender::Bot, answer),
            Err(e) => self.push(Sender::Bot, format!("{}{}", ERROR_PREFIX, e)),
        }
        self.pending = false;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending(&self) -> bool {
        self.pending
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_initial_state_has_greeting_only() {
        let conversation = Conversation::new();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].sender, Sender::Bot);
        assert_eq!(conversation.messages()[0].text, GREETING);
        assert!(!conversation.pending());
    }

    #[test]
    fn test_empty_input_is_a_noop() {
        let mut conversation = Conversation::new();
        assert!(conversation.begin_turn("").is_none());
        assert!(conversation.begin_turn("   \t\n").is_none());
        assert_eq!(conversation.messages().len(), 1);
        assert!(!conversation.pending());
    }

    #[test]
    fn test_begin_turn_appends_literal_text_and_sets_pending() {
        let mut conversation = Conversation::new();
        let question = conversation.begin_turn("  What is bail?  ");
        assert_eq!(question.as_deref(), Some("  What is bail?  "));
        assert_eq!(conversation.messages().len(), 2);
        let last = conversation.messages().last().unwrap();
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.text, "  What is bail?  ");
        assert!(conversation.pending());
    }

    #[test]
    fn test_successful_turn_appends_bot_answer() {
        let mut conversation = Conversation::new();
        conversation.begin_turn("What is IPC 302?");
        conversation.resolve(Ok("IPC 302 defines punishment for murder.".to_string()));

        let messages = conversation.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].sender, Sender::Bot);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].text, "What is IPC 302?");
        assert_eq!(messages[2].sender, Sender::Bot);
        assert_eq!(messages[2].text, "IPC 302 defines punishment for murder.");
        assert!(!conversation.pending());
    }

    #[test]
    fn test_failed_turn_appends_diagnostic_message() {
        let mut conversation = Conversation::new();
        conversation.begin_turn("What is IPC 302?");
        conversation.resolve(Err(anyhow!("boom")));

        let last = conversation.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert!(last.text.starts_with(ERROR_PREFIX));
        assert!(last.text.contains("boom"));
        assert!(!conversation.pending());
    }

    #[test]
    fn test_turns_stay_ordered() {
        let mut conversation = Conversation::new();
        conversation.begin_turn("first");
        conversation.resolve(Ok("answer one".to_string()));
        conversation.begin_turn("second");
        conversation.resolve(Err(anyhow!("down")));

        let texts: Vec<&str> = conversation
            .messages()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts[0], GREETING);
        assert_eq!(texts[1], "first");
        assert_eq!(texts[2], "answer one");
        assert_eq!(texts[3], "second");
        assert!(texts[4].contains("down"));
    }

    #[test]
    fn test_message_ids_are_unique_and_increasing() {
        let mut conversation = Conversation::new();
        conversation.begin_turn("a");
        conversation.resolve(Ok("b".to_string()));
        conversation.begin_turn("c");

        let ids: Vec<u64> = conversation.messages().iter().map(|m| m.id).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_pending_clears_even_when_resolved_twice() {
        // Two queued submissions both complete: both replies append, in
        // completion order, and the flag ends cleared.
        let mut conversation = Conversation::new();
        conversation.begin_turn("one");
        conversation.begin_turn("two");
        conversation.resolve(Ok("reply one".to_string()));
        conversation.resolve(Ok("reply two".to_string()));

        assert_eq!(conversation.messages().len(), 5);
        assert!(!conversation.pending());
    }
}
