use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, Part};
use crate::ai::ChatService;
use crate::models::ChatRequest;
use crate::{prompts, Result};
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ChatRequestBody {
    system_instruction: Content,
    contents: Vec<Content>,
}

pub struct GeminiChatClient {
    http: GeminiHttpClient,
    persona: String,
}

impl GeminiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
            persona: prompts::PERSONA.to_string(),
        }
    }

    /// Replace the default Serena persona.
    pub fn with_persona(mut self, persona: String) -> Self {
        self.persona = persona;
        self
    }

    fn build_body(&self, request: &ChatRequest) -> ChatRequestBody {
        let mut contents: Vec<Content> = request
            .prior_turns
            .iter()
            .map(|turn| Content::text(Some(turn.role.as_gemini_role()), &turn.text))
            .collect();
        contents.push(Content::text(Some("user"), &request.latest_message));

        ChatRequestBody {
            system_instruction: Content::text(None, &self.persona),
            contents,
        }
    }

    /// Joins every text part of the first candidate.
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let text: String = response
            .first_parts()
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

super::impl_with_gemini_base_url!(GeminiChatClient);

#[async_trait]
impl ChatService for GeminiChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>> {
        tracing::debug!(
            model = self.http.model(),
            prior_turns = request.prior_turns.len(),
            "Sending chat request to Gemini"
        );

        let body = self.build_body(request);
        let response: GenerateContentResponse = self.http.generate_content(&body).await?;

        Ok(Self::extract_text(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::models::ConversationTurn;
    use crate::Error;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::Mock;
    use wiremock::{MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash";

    fn make_client(server: &MockServer, api_key: &str, model: &str) -> GeminiChatClient {
        GeminiChatClient::new(api_key.to_string(), model.to_string()).with_base_url(server.uri())
    }

    fn text_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": text }]
                }
            }]
        })
    }

    #[test]
    fn test_body_replays_history_then_latest_message() {
        let client = GeminiChatClient::new("key".to_string(), DEFAULT_MODEL.to_string());
        let request = ChatRequest::new(
            "E il barbiere?",
            &[
                ConversationTurn::user("Fate igiene a letto?"),
                ConversationTurn::assistant("Sì, certamente."),
            ],
        );

        let body = serde_json::to_value(client.build_body(&request)).unwrap();

        assert_eq!(
            body["contents"],
            serde_json::json!([
                { "role": "user", "parts": [{ "text": "Fate igiene a letto?" }] },
                { "role": "model", "parts": [{ "text": "Sì, certamente." }] },
                { "role": "user", "parts": [{ "text": "E il barbiere?" }] }
            ])
        );
        assert_eq!(
            body["system_instruction"]["parts"][0]["text"],
            prompts::PERSONA
        );
    }

    #[test]
    fn test_body_with_custom_persona() {
        let client = GeminiChatClient::new("key".to_string(), DEFAULT_MODEL.to_string())
            .with_persona("Sei un test.".to_string());
        let body = serde_json::to_value(client.build_body(&ChatRequest::new("ciao", &[]))).unwrap();

        assert_eq!(body["system_instruction"]["parts"][0]["text"], "Sei un test.");
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_complete_parses_response() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(text_response("Certo, veniamo noi a domicilio.")),
            )
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);

        let reply = client
            .complete(&ChatRequest::new("Venite a casa?", &[]))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("Certo, veniamo noi a domicilio."));
    }

    #[tokio::test]
    async fn test_complete_joins_text_parts() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "text": "Buongiorno, " }, { "text": "come posso aiutarla?" }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);
        let reply = client
            .complete(&ChatRequest::new("Ciao", &[]))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("Buongiorno, come posso aiutarla?"));
    }

    #[tokio::test]
    async fn test_sends_history_in_request_body() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_partial_json(serde_json::json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "primo" }] },
                    { "role": "model", "parts": [{ "text": "secondo" }] },
                    { "role": "user", "parts": [{ "text": "terzo" }] }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);
        let history = vec![
            ConversationTurn::user("primo"),
            ConversationTurn::assistant("secondo"),
        ];

        client
            .complete(&ChatRequest::new("terzo", &history))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = make_client(&server, "bad-key", DEFAULT_MODEL);

        let err = client
            .complete(&ChatRequest::new("ciao", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_empty_candidates_yield_none() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);
        let reply = client
            .complete(&ChatRequest::new("ciao", &[]))
            .await
            .unwrap();
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn test_complete_strips_models_prefix_from_model_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", "models/gemini-2.5-flash");

        client
            .complete(&ChatRequest::new("ciao", &[]))
            .await
            .unwrap();
    }
}
