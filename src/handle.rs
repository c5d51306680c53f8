//! Shared handle to the generative-AI backend
//!
//! The handle is built once at startup and shared by the chat and image
//! clients. The backend itself is constructed lazily on the first call that
//! finds a credential, then reused for the life of the handle. A missing
//! credential is not remembered, so every call re-checks it.

use crate::ai::{ChatService, GeminiChatClient, GeminiImageClient, ImageGenerationService};
use crate::models::{api_key_from_lookup, Config};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Where the API key comes from.
pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// Reads `API_KEY` (or `GEMINI_API_KEY`) from the process environment on
/// every lookup.
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        api_key_from_lookup(|name| std::env::var(name).ok())
    }
}

/// A fixed credential, or a fixed absence of one.
pub struct StaticCredentials(pub Option<String>);

impl CredentialSource for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        self.0.clone()
    }
}

/// The configured key when present, otherwise whatever the environment holds
/// now.
struct ConfiguredCredentials(Option<String>);

impl CredentialSource for ConfiguredCredentials {
    fn api_key(&self) -> Option<String> {
        self.0.clone().or_else(|| EnvCredentials.api_key())
    }
}

/// Backend services reachable through one credential.
pub struct Backend {
    pub chat: Box<dyn ChatService>,
    pub image: Box<dyn ImageGenerationService>,
}

/// Builds a [`Backend`] from an API key.
pub trait BackendFactory: Send + Sync {
    fn build(&self, api_key: String) -> Backend;
}

impl<F> BackendFactory for F
where
    F: Fn(String) -> Backend + Send + Sync,
{
    fn build(&self, api_key: String) -> Backend {
        self(api_key)
    }
}

/// Builds Gemini clients that share one HTTP connection pool.
pub struct GeminiFactory {
    chat_model: String,
    image_model: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl GeminiFactory {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chat_model: config.chat_model.clone(),
            image_model: config.image_model.clone(),
            base_url: config.base_url.clone(),
            http_client: reqwest::Client::new(),
        }
    }
}

impl BackendFactory for GeminiFactory {
    fn build(&self, api_key: String) -> Backend {
        info!(
            "Connecting to Gemini (chat model: {}, image model: {})",
            self.chat_model, self.image_model
        );

        let chat = GeminiChatClient::new_with_client(
            api_key.clone(),
            self.chat_model.clone(),
            self.http_client.clone(),
        )
        .with_base_url(self.base_url.clone());

        let image = GeminiImageClient::new_with_client(
            api_key,
            self.image_model.clone(),
            self.http_client.clone(),
        )
        .with_base_url(self.base_url.clone());

        Backend {
            chat: Box::new(chat),
            image: Box::new(image),
        }
    }
}

pub struct ClientHandle {
    credentials: Box<dyn CredentialSource>,
    factory: Box<dyn BackendFactory>,
    backend: OnceLock<Backend>,
}

impl ClientHandle {
    pub fn new(
        credentials: impl CredentialSource + 'static,
        factory: impl BackendFactory + 'static,
    ) -> Self {
        Self {
            credentials: Box::new(credentials),
            factory: Box::new(factory),
            backend: OnceLock::new(),
        }
    }

    /// Gemini-backed handle using the configured key, falling back to the
    /// environment while no key is configured.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ConfiguredCredentials(config.api_key.clone()),
            GeminiFactory::from_config(config),
        )
    }

    /// A handle whose backend is already built.
    pub fn with_backend(backend: Backend) -> Self {
        let handle = Self::new(StaticCredentials(None), |_: String| -> Backend {
            unreachable!("backend is pre-built")
        });
        let _ = handle.backend.set(backend);
        handle
    }

    /// A handle that never has a backend.
    pub fn unavailable() -> Self {
        Self::new(StaticCredentials(None), |_: String| -> Backend {
            unreachable!("no credential is ever available")
        })
    }

    /// Returns the backend, building it on first use.
    ///
    /// `None` means no credential is configured right now.
    pub fn backend(&self) -> Option<&Backend> {
        if let Some(backend) = self.backend.get() {
            return Some(backend);
        }

        match self.credentials.api_key() {
            Some(api_key) => Some(self.backend.get_or_init(|| self.factory.build(api_key))),
            None => {
                warn!("API_KEY is missing in environment variables; AI features will use static fallbacks");
                None
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend().is_some()
    }
}
