use crate::handle::ClientHandle;
use crate::models::{ChatReply, ChatRequest, ConversationTurn, Degradation};
use crate::prompts::{CLARIFICATION_REPLY, TEMPORARY_ERROR_REPLY, UNAVAILABLE_REPLY};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// The "Serena" chat assistant.
#[derive(Clone)]
pub struct ChatAssistant {
    handle: Arc<ClientHandle>,
}

impl ChatAssistant {
    pub fn new(handle: Arc<ClientHandle>) -> Self {
        Self { handle }
    }

    /// Answer `message` in the context of `history`.
    ///
    /// Never fails: when the backend is missing, errors out, or returns no
    /// text, a fixed Italian reply is returned instead. There is no retry.
    pub async fn send_message(&self, message: &str, history: &[ConversationTurn]) -> ChatReply {
        let Some(backend) = self.handle.backend() else {
            return ChatReply::Fallback {
                reason: Degradation::Unavailable,
                text: UNAVAILABLE_REPLY,
            };
        };

        let request = ChatRequest::new(message, history);
        debug!("Sending chat message with {} prior turns", history.len());

        match backend.chat.complete(&request).await {
            Ok(Some(text)) if !text.trim().is_empty() => ChatReply::Generated(text),
            Ok(_) => {
                warn!("Gemini chat response contained no text");
                ChatReply::Fallback {
                    reason: Degradation::EmptyResponse,
                    text: CLARIFICATION_REPLY,
                }
            }
            Err(e) => {
                error!("Gemini API error: {}", e);
                ChatReply::Fallback {
                    reason: Degradation::Backend(e.to_string()),
                    text: TEMPORARY_ERROR_REPLY,
                }
            }
        }
    }
}
