//! Quick-chat assistant.
//!
//! A lightweight transcript next to the tool panel: the user's raw text is
//! sent to the text-generation endpoint without any instruction prefix, and
//! whatever comes back is appended as the assistant's turn. Errors become
//! assistant turns too; the transcript never fails.

use std::sync::Arc;

use tracing::warn;

use crate::panel::PROVIDER_ERROR_PREFIX;
use crate::provider::{Extraction, GenerationProvider};

pub const GREETING: &str =
    "Hello! I'm your AI assistant. How can I help you navigate the AI Tools Hub?";
const MSG_CONNECT_FAILED: &str = "Error connecting to Gemini API.";
const MSG_NO_ANSWER: &str = "Sorry, I couldn't process your request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Transcript plus input state for the chat view.
#[derive(Debug)]
pub struct ChatState {
    turns: Vec<ChatTurn>,
    pub input: String,
    in_flight: bool,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            turns: vec![ChatTurn {
                speaker: Speaker::Assistant,
                text: GREETING.to_string(),
            }],
            input: String::new(),
            in_flight: false,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Take the pending input as a user turn. Returns the prompt to send,
    /// or `None` when the input is blank or a reply is already pending.
    pub fn begin_send(&mut self) -> Option<String> {
        if self.in_flight || self.input.trim().is_empty() {
            return None;
        }
        let prompt = std::mem::take(&mut self.input);
        self.turns.push(ChatTurn {
            speaker: Speaker::User,
            text: prompt.clone(),
        });
        self.in_flight = true;
        Some(prompt)
    }

    /// Append the assistant's reply and release the input.
    pub fn complete(&mut self, reply: String) {
        self.turns.push(ChatTurn {
            speaker: Speaker::Assistant,
            text: reply,
        });
        self.in_flight = false;
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

/// One chat round-trip, folded into displayable text the same way the tool
/// dispatcher folds its outcomes.
pub async fn chat_reply(provider: Arc<dyn GenerationProvider>, prompt: &str) -> String {
    if !provider.is_configured() {
        return crate::panel::MSG_NOT_CONFIGURED.to_string();
    }
    match provider.generate_text(prompt).await {
        Ok(Extraction::TextCandidate(text)) => text,
        Ok(Extraction::ProviderError(message)) => {
            format!("{}{}", PROVIDER_ERROR_PREFIX, message)
        }
        Ok(Extraction::ImageCandidate(_)) | Ok(Extraction::Empty) => MSG_NO_ANSWER.to_string(),
        Err(err) => {
            warn!(error = %err, "chat round-trip failed");
            MSG_CONNECT_FAILED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    struct OneShot(Option<Extraction>);

    #[async_trait]
    impl GenerationProvider for OneShot {
        async fn generate_text(&self, _prompt: &str) -> Result<Extraction> {
            self.0.clone().ok_or_else(|| anyhow!("boom"))
        }
        async fn generate_image(&self, _prompt: &str) -> Result<Extraction> {
            unreachable!("chat never generates images")
        }
        fn is_configured(&self) -> bool {
            true
        }
        fn name(&self) -> &str {
            "oneshot"
        }
    }

    #[test]
    fn test_transcript_starts_with_greeting() {
        let chat = ChatState::new();
        assert_eq!(chat.turns().len(), 1);
        assert_eq!(chat.turns()[0].speaker, Speaker::Assistant);
        assert_eq!(chat.turns()[0].text, GREETING);
    }

    #[test]
    fn test_begin_send_consumes_input() {
        let mut chat = ChatState::new();
        chat.input = "hi there".to_string();
        let prompt = chat.begin_send().unwrap();
        assert_eq!(prompt, "hi there");
        assert!(chat.input.is_empty());
        assert!(chat.in_flight());
        assert_eq!(chat.turns().last().unwrap().speaker, Speaker::User);
    }

    #[test]
    fn test_begin_send_ignores_blank_and_busy() {
        let mut chat = ChatState::new();
        chat.input = "   ".to_string();
        assert!(chat.begin_send().is_none());

        chat.input = "real".to_string();
        chat.begin_send().unwrap();
        chat.input = "second".to_string();
        assert!(chat.begin_send().is_none());
    }

    #[test]
    fn test_complete_appends_and_unblocks() {
        let mut chat = ChatState::new();
        chat.input = "q".to_string();
        chat.begin_send().unwrap();
        chat.complete("a".to_string());
        assert!(!chat.in_flight());
        assert_eq!(chat.turns().last().unwrap().text, "a");
    }

    #[tokio::test]
    async fn test_reply_success() {
        let provider = Arc::new(OneShot(Some(Extraction::TextCandidate("hey".into()))));
        assert_eq!(chat_reply(provider, "hi").await, "hey");
    }

    #[tokio::test]
    async fn test_reply_provider_error() {
        let provider = Arc::new(OneShot(Some(Extraction::ProviderError("quota".into()))));
        let reply = chat_reply(provider, "hi").await;
        assert!(reply.contains("quota"));
    }

    #[tokio::test]
    async fn test_reply_empty_and_transport_failure() {
        let provider = Arc::new(OneShot(Some(Extraction::Empty)));
        assert_eq!(chat_reply(provider, "hi").await, MSG_NO_ANSWER);

        let provider = Arc::new(OneShot(None));
        assert_eq!(chat_reply(provider, "hi").await, MSG_CONNECT_FAILED);
    }
}
