//! Data models and structures
//!
//! Defines conversation turns, image requests, the results handed back to the
//! presentation layer, and the environment-driven configuration.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Role name on the Gemini wire, where the assistant side is `model`.
    pub fn as_gemini_role(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "model",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// One chat exchange: the new message plus everything said before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub latest_message: String,
    pub prior_turns: Vec<ConversationTurn>,
}

impl ChatRequest {
    pub fn new(latest_message: &str, prior_turns: &[ConversationTurn]) -> Self {
        Self {
            latest_message: latest_message.to_string(),
            prior_turns: prior_turns.to_vec(),
        }
    }
}

/// Append-only chat history, owned by whoever renders the conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn::assistant(text));
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::Tall,
        AspectRatio::Wide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Tall => "9:16",
            AspectRatio::Wide => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s.trim())
            .ok_or_else(|| {
                Error::Generic(format!(
                    "Unsupported aspect ratio '{}'. Expected one of: 1:1, 3:4, 4:3, 9:16, 16:9",
                    s
                ))
            })
    }
}

/// An image generation request. Doubles as the image cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
}

impl ImageRequest {
    pub fn new(prompt: &str, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: prompt.to_string(),
            aspect_ratio,
        }
    }
}

/// Why a fallback was returned instead of live content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Degradation {
    #[error("AI backend unavailable: no API key configured")]
    Unavailable,

    #[error("AI backend returned no usable content")]
    EmptyResponse,

    #[error("AI backend call failed: {0}")]
    Backend(String),
}

/// Result of a chat exchange. Always carries displayable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    Generated(String),
    Fallback {
        reason: Degradation,
        text: &'static str,
    },
}

impl ChatReply {
    pub fn text(&self) -> &str {
        match self {
            ChatReply::Generated(text) => text,
            ChatReply::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ChatReply::Generated(text) => text,
            ChatReply::Fallback { text, .. } => text.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ChatReply::Fallback { .. })
    }

    pub fn degradation(&self) -> Option<&Degradation> {
        match self {
            ChatReply::Generated(_) => None,
            ChatReply::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Result of an image request.
///
/// `Fallback` carries no image; the caller substitutes its own placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Generated(String),
    Cached(String),
    Fallback(Degradation),
}

impl ImageOutcome {
    /// The `data:` URI, if an image is available.
    pub fn data_uri(&self) -> Option<&str> {
        match self {
            ImageOutcome::Generated(uri) | ImageOutcome::Cached(uri) => Some(uri),
            ImageOutcome::Fallback(_) => None,
        }
    }

    /// The image source to render: the data URI, or `fallback` when degraded.
    pub fn src_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.data_uri().unwrap_or(fallback)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ImageOutcome::Fallback(_))
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub chat_model: String,
    pub image_model: String,
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Reads configuration from the environment (and `.env`, if present).
    ///
    /// A missing API key is not an error: the assistant degrades to its
    /// static fallbacks instead.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: api_key_from_lookup(&lookup),
            chat_model: non_empty(lookup("CHAT_MODEL")).unwrap_or(defaults.chat_model),
            image_model: non_empty(lookup("IMAGE_MODEL")).unwrap_or(defaults.image_model),
            base_url: non_empty(lookup("GEMINI_BASE_URL")).unwrap_or(defaults.base_url),
        }
    }
}

/// `API_KEY`, falling back to `GEMINI_API_KEY`. Blank values count as unset.
pub(crate) fn api_key_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    non_empty(lookup("API_KEY")).or_else(|| non_empty(lookup("GEMINI_API_KEY")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
