use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, InlineData, Part};
use crate::ai::{ImageGenerationService, InlineImage};
use crate::models::ImageRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ImageRequestBody {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: ImageGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig {
    response_modalities: Vec<String>,
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    /// The first part carrying inline data wins; later parts are ignored.
    fn first_inline_data(response: &GenerateContentResponse) -> Option<&InlineData> {
        response.first_parts().iter().find_map(|p| match p {
            Part::InlineData { inline_data } => Some(inline_data),
            _ => None,
        })
    }
}

super::impl_with_gemini_base_url!(GeminiImageClient);

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate(&self, request: &ImageRequest) -> Result<Option<InlineImage>> {
        tracing::debug!(
            model = self.http.model(),
            aspect_ratio = %request.aspect_ratio,
            "Sending image generation request to Gemini"
        );

        let body = ImageRequestBody {
            contents: vec![Content::text(None, &request.prompt)],
            generation_config: ImageGenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                image_config: ImageConfig {
                    aspect_ratio: request.aspect_ratio.to_string(),
                },
            },
        };

        let gemini_response: GenerateContentResponse = self.http.generate_content(&body).await?;

        let Some(image_data) = Self::first_inline_data(&gemini_response) else {
            return Ok(None);
        };

        tracing::debug!(
            "Gemini returned image with mime_type: {}",
            image_data.mime_type
        );

        base64::engine::general_purpose::STANDARD
            .decode(&image_data.data)
            .map_err(|e| {
                Error::AiProvider(format!("Failed to decode Gemini base64 image: {}", e))
            })?;

        Ok(Some(InlineImage {
            mime_type: image_data.mime_type.clone(),
            data: image_data.data.clone(),
        }))
    }
}
