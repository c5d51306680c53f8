//! Client-facing assistant operations
//!
//! These wrap the backend services with the website's fallback policy: every
//! failure is absorbed here and turned into a degraded-but-valid result.

pub mod chat;
pub mod image;

pub use chat::ChatAssistant;
pub use image::{png_data_uri, ImageGenerator};
