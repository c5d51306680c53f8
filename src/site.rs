//! Image slots on the CuraSerena website.

use crate::assistant::ImageGenerator;
use crate::models::AspectRatio;
use futures_util::future::join_all;

/// Placeholder shown while an image is unavailable.
pub const DEFAULT_FALLBACK_SRC: &str = "https://picsum.photos/800/600?grayscale";

/// An image-bearing content block: what to generate, and what to show if
/// generation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    pub prompt: &'static str,
    pub aspect_ratio: AspectRatio,
    pub alt: &'static str,
    pub fallback_src: &'static str,
}

impl ImageSlot {
    /// The source to render: a generated `data:` URI or the fallback.
    pub async fn resolve(&self, generator: &ImageGenerator) -> String {
        generator
            .generate_image(self.prompt, self.aspect_ratio)
            .await
            .src_or(self.fallback_src)
            .to_string()
    }
}

pub const HERO_IMAGE: ImageSlot = ImageSlot {
    prompt: "Professional caregiver gently holding the hand of an elderly patient in a comfortable, sunny bedroom in Rome. Warm lighting, compassionate atmosphere, photorealistic, high quality, 4k",
    aspect_ratio: AspectRatio::Wide,
    alt: "Mani che si stringono in segno di cura",
    fallback_src: DEFAULT_FALLBACK_SRC,
};

pub const ABOUT_IMAGE: ImageSlot = ImageSlot {
    prompt: "Portrait of a friendly and professional Italian female caregiver in a neat uniform smiling warmly, standing in a clean living room, soft daylight, trust, high quality, photorealistic",
    aspect_ratio: AspectRatio::Square,
    alt: "Operatore sorridente",
    fallback_src: DEFAULT_FALLBACK_SRC,
};

pub const SITE_IMAGES: [ImageSlot; 2] = [HERO_IMAGE, ABOUT_IMAGE];

/// Resolve every slot concurrently, preserving slot order.
pub async fn resolve_all(generator: &ImageGenerator, slots: &[ImageSlot]) -> Vec<String> {
    join_all(slots.iter().map(|slot| slot.resolve(generator))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockChatClient, MockImageGenerationClient};
    use crate::handle::{Backend, ClientHandle};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_unavailable_backend_resolves_to_fallback() {
        let generator = ImageGenerator::new(Arc::new(ClientHandle::unavailable()));

        let sources = resolve_all(&generator, &SITE_IMAGES).await;
        assert_eq!(sources, vec![DEFAULT_FALLBACK_SRC, DEFAULT_FALLBACK_SRC]);
    }

    #[tokio::test]
    async fn test_slots_request_their_aspect_ratio() {
        let image = MockImageGenerationClient::new();
        let observer = image.clone();
        let generator = ImageGenerator::new(Arc::new(ClientHandle::with_backend(Backend {
            chat: Box::new(MockChatClient::new()),
            image: Box::new(image),
        })));

        let sources = resolve_all(&generator, &SITE_IMAGES).await;
        assert!(sources.iter().all(|src| src.starts_with("data:image/png;base64,")));

        let ratios: Vec<AspectRatio> = observer
            .get_requests()
            .into_iter()
            .map(|r| r.aspect_ratio)
            .collect();
        assert_eq!(ratios.len(), 2);
        assert!(ratios.contains(&AspectRatio::Wide));
        assert!(ratios.contains(&AspectRatio::Square));
    }
}
