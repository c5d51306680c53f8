use super::{ChatService, ImageGenerationService, InlineImage};
use crate::models::{ChatRequest, ImageRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Base64 of a 1x1 PNG, returned by the image mock when nothing is queued.
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVQImWP4z8AAAAMBAQDiJQC8AAAAAElFTkSuQmCC";

#[derive(Clone)]
pub struct MockChatClient {
    responses: Arc<Mutex<Vec<Option<String>>>>,
    failure: Option<String>,
    call_count: Arc<Mutex<usize>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            call_count: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(Some(response));
        self
    }

    /// Queue a reply that carries no text.
    pub fn with_empty_response(self) -> Self {
        self.responses.lock().unwrap().push(None);
        self
    }

    /// Make every call fail with an `AiProvider` error.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.requests.lock().unwrap().push(request.clone());

        if let Some(message) = &self.failure {
            return Err(Error::AiProvider(message.clone()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(Some(format!("Risposta simulata a: {}", request.latest_message)))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

#[derive(Clone)]
pub struct MockImageGenerationClient {
    image_responses: Arc<Mutex<Vec<Option<InlineImage>>>>,
    failure: Option<String>,
    call_count: Arc<Mutex<usize>>,
    requests: Arc<Mutex<Vec<ImageRequest>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            image_responses: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            call_count: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a PNG response carrying `data` (base64 text).
    pub fn with_image_response(self, data: String) -> Self {
        self.image_responses.lock().unwrap().push(Some(InlineImage {
            mime_type: "image/png".to_string(),
            data,
        }));
        self
    }

    /// Queue a response without any inline image part.
    pub fn with_empty_response(self) -> Self {
        self.image_responses.lock().unwrap().push(None);
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate(&self, request: &ImageRequest) -> Result<Option<InlineImage>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.requests.lock().unwrap().push(request.clone());

        if let Some(message) = &self.failure {
            return Err(Error::AiProvider(message.clone()));
        }

        let responses = self.image_responses.lock().unwrap();
        if responses.is_empty() {
            Ok(Some(InlineImage {
                mime_type: "image/png".to_string(),
                data: TINY_PNG_BASE64.to_string(),
            }))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
