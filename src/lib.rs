//! AI assistant core for the CuraSerena Roma home-care website
//!
//! Provides the "Serena" chat assistant and the photorealistic image
//! generator used by the site, both backed by Google's Gemini API and both
//! degrading to static fallbacks when the backend is unavailable.

pub mod ai;
pub mod assistant;
pub mod cache;
pub mod error;
pub mod handle;
pub mod models;
pub mod prompts;
pub mod site;

pub use assistant::{ChatAssistant, ImageGenerator};
pub use error::{Error, Result};
pub use handle::ClientHandle;
