use crate::cache::ImageCache;
use crate::handle::ClientHandle;
use crate::models::{AspectRatio, Degradation, ImageOutcome, ImageRequest};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Builds the `data:` URI for a base64 image payload.
///
/// The media type is always PNG, whatever the backend reported.
pub fn png_data_uri(base64_data: &str) -> String {
    format!("data:image/png;base64,{}", base64_data)
}

/// Generates photorealistic images for the website, memoizing successes.
#[derive(Clone)]
pub struct ImageGenerator {
    handle: Arc<ClientHandle>,
    cache: ImageCache,
}

impl ImageGenerator {
    pub fn new(handle: Arc<ClientHandle>) -> Self {
        Self::with_cache(handle, ImageCache::new())
    }

    pub fn with_cache(handle: Arc<ClientHandle>, cache: ImageCache) -> Self {
        Self { handle, cache }
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Return an image for `prompt` at `aspect_ratio`.
    ///
    /// A cached image is returned without contacting the backend. On a miss
    /// the backend is called once; only a usable image is cached. Failures
    /// come back as `ImageOutcome::Fallback` so the caller can show its own
    /// placeholder.
    ///
    /// The cache lock is not held across the backend call, so two concurrent
    /// misses for the same key may both generate and the later insert wins.
    pub async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio) -> ImageOutcome {
        let request = ImageRequest::new(prompt, aspect_ratio);

        if let Some(uri) = self.cache.get(&request) {
            debug!("Image cache hit ({})", aspect_ratio);
            return ImageOutcome::Cached(uri);
        }

        let Some(backend) = self.handle.backend() else {
            return ImageOutcome::Fallback(Degradation::Unavailable);
        };

        match backend.image.generate(&request).await {
            Ok(Some(image)) => {
                let uri = png_data_uri(&image.data);
                self.cache.insert(request, uri.clone());
                ImageOutcome::Generated(uri)
            }
            Ok(None) => {
                warn!("Gemini image response contained no inline image data");
                ImageOutcome::Fallback(Degradation::EmptyResponse)
            }
            Err(e) => {
                error!("Gemini Image Generation Error: {}", e);
                ImageOutcome::Fallback(Degradation::Backend(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::mock::TINY_PNG_BASE64;
    use crate::ai::{MockChatClient, MockImageGenerationClient};
    use crate::handle::Backend;
    use pretty_assertions::assert_eq;

    fn generator_with(image: MockImageGenerationClient) -> ImageGenerator {
        ImageGenerator::new(Arc::new(ClientHandle::with_backend(Backend {
            chat: Box::new(MockChatClient::new()),
            image: Box::new(image),
        })))
    }

    #[test]
    fn test_png_data_uri() {
        assert_eq!(png_data_uri("AAAA"), "data:image/png;base64,AAAA");
    }

    #[tokio::test]
    async fn test_unavailable_returns_fallback() {
        let generator = ImageGenerator::new(Arc::new(ClientHandle::unavailable()));

        let outcome = generator.generate_image("caregiver", AspectRatio::Square).await;
        assert_eq!(outcome, ImageOutcome::Fallback(Degradation::Unavailable));
        assert!(generator.cache().is_empty());
    }

    #[tokio::test]
    async fn test_second_call_hits_cache() {
        let image = MockImageGenerationClient::new();
        let observer = image.clone();
        let generator = generator_with(image);

        let first = generator
            .generate_image("sunset over Rome", AspectRatio::Wide)
            .await;
        let second = generator
            .generate_image("sunset over Rome", AspectRatio::Wide)
            .await;

        assert_eq!(first, ImageOutcome::Generated(png_data_uri(TINY_PNG_BASE64)));
        assert_eq!(second, ImageOutcome::Cached(png_data_uri(TINY_PNG_BASE64)));
        assert_eq!(observer.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_different_aspect_ratio_is_a_miss() {
        let image = MockImageGenerationClient::new();
        let observer = image.clone();
        let generator = generator_with(image);

        generator
            .generate_image("sunset over Rome", AspectRatio::Wide)
            .await;
        generator
            .generate_image("sunset over Rome", AspectRatio::Square)
            .await;

        assert_eq!(observer.get_call_count(), 2);
        assert_eq!(generator.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_response_is_not_cached() {
        let image = MockImageGenerationClient::new()
            .with_empty_response()
            .with_image_response("QUJD".to_string());
        let observer = image.clone();
        let generator = generator_with(image);

        let first = generator.generate_image("caregiver", AspectRatio::Square).await;
        assert_eq!(first, ImageOutcome::Fallback(Degradation::EmptyResponse));
        assert!(generator.cache().is_empty());

        let second = generator.generate_image("caregiver", AspectRatio::Square).await;
        assert_eq!(second.data_uri(), Some("data:image/png;base64,QUJD"));
        assert_eq!(observer.get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_backend_error_is_not_cached() {
        let generator = generator_with(MockImageGenerationClient::new().failing("boom"));

        let outcome = generator.generate_image("caregiver", AspectRatio::Square).await;
        assert!(outcome.is_fallback());
        assert!(matches!(
            outcome,
            ImageOutcome::Fallback(Degradation::Backend(ref reason)) if reason.contains("boom")
        ));
        assert!(generator.cache().is_empty());
    }

    #[tokio::test]
    async fn test_shared_cache_serves_other_generator() {
        let cache = ImageCache::new();
        cache.insert(
            ImageRequest::new("caregiver", AspectRatio::Square),
            "data:image/png;base64,CACHED".to_string(),
        );

        let generator =
            ImageGenerator::with_cache(Arc::new(ClientHandle::unavailable()), cache);

        let outcome = generator.generate_image("caregiver", AspectRatio::Square).await;
        assert_eq!(
            outcome,
            ImageOutcome::Cached("data:image/png;base64,CACHED".to_string())
        );
    }
}
