//! OpenAI-compatible HTTP client for chat completions and image generation.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use talereel_common::config::ServicesConfig;
use talereel_common::error::{TalereelError, TalereelResult};

use crate::model::{ChatMessage, ChatModel, ImageModel, ResponseSchema};

const CHAT_SERVICE: &str = "chat";
const IMAGE_SERVICE: &str = "images";

/// Client for `/chat/completions` and `/images/generations`.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    image: ImageSettings,
}

/// Image request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
    pub model: String,
    pub quality: String,
    pub size: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    quality: &'a str,
    size: &'a str,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        chat_model: impl Into<String>,
        image: ImageSettings,
        timeout: Duration,
    ) -> TalereelResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            TalereelError::external(CHAT_SERVICE, format!("failed to build client: {e}"))
        })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            chat_model: chat_model.into(),
            image,
        })
    }

    /// Build a client from service settings, reading the key from the environment.
    pub fn from_config(config: &ServicesConfig) -> TalereelResult<Self> {
        Self::new(
            config.openai_api_key()?,
            config.openai_base_url.clone(),
            config.chat_model.clone(),
            ImageSettings {
                model: config.image_model.clone(),
                quality: config.image_quality.clone(),
                size: config.image_size.clone(),
            },
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        service: &str,
        path: &str,
        body: &B,
    ) -> TalereelResult<R> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| TalereelError::external(service, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no response body>".to_string());
            return Err(TalereelError::external(
                service,
                format!("API error ({status}): {error_text}"),
            ));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| TalereelError::external(service, format!("invalid response: {e}")))
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        response_format: Option<serde_json::Value>,
    ) -> TalereelResult<String> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages,
            response_format,
        };
        let response: ChatResponse = self
            .post(CHAT_SERVICE, "chat/completions", &request)
            .await?;
        first_content(response)
    }
}

fn first_content(response: ChatResponse) -> TalereelResult<String> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| TalereelError::external(CHAT_SERVICE, "response has no choices"))?;
    if let Some(refusal) = message.refusal {
        return Err(TalereelError::external(
            CHAT_SERVICE,
            format!("model refused: {refusal}"),
        ));
    }
    message
        .content
        .ok_or_else(|| TalereelError::external(CHAT_SERVICE, "response has no content"))
}

fn json_schema_format(schema: &ResponseSchema) -> serde_json::Value {
    serde_json::json!({
        "type": "json_schema",
        "json_schema": {
            "name": schema.name,
            "strict": true,
            "schema": schema.schema,
        }
    })
}

fn decode_image(response: ImageResponse) -> TalereelResult<Vec<u8>> {
    let encoded = response
        .data
        .into_iter()
        .next()
        .and_then(|d| d.b64_json)
        .ok_or_else(|| TalereelError::external(IMAGE_SERVICE, "response has no b64_json image"))?;
    BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| TalereelError::external(IMAGE_SERVICE, format!("invalid base64 image: {e}")))
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> TalereelResult<String> {
        self.chat(messages, None).await
    }

    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema: &ResponseSchema,
    ) -> TalereelResult<serde_json::Value> {
        let content = self
            .chat(messages, Some(json_schema_format(schema)))
            .await?;
        serde_json::from_str(&content).map_err(|e| {
            TalereelError::external(CHAT_SERVICE, format!("structured output is not JSON: {e}"))
        })
    }
}

#[async_trait]
impl ImageModel for OpenAiClient {
    async fn generate(&self, prompt: &str) -> TalereelResult<Vec<u8>> {
        let request = ImageRequest {
            model: &self.image.model,
            prompt,
            quality: &self.image.quality,
            size: &self.image.size,
            n: 1,
        };
        let response: ImageResponse = self
            .post(IMAGE_SERVICE, "images/generations", &request)
            .await?;
        decode_image(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_shape() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let request = ChatRequest {
            model: "gpt-4.1",
            messages: &messages,
            response_format: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4.1");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn test_schema_format_is_strict() {
        let format = json_schema_format(&ResponseSchema {
            name: "text_data".to_string(),
            schema: serde_json::json!({"type": "object"}),
        });
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "text_data");
        assert_eq!(format["json_schema"]["strict"], true);
    }

    #[test]
    fn test_first_content_and_refusal() {
        let ok: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"A wide shot."}}]}"#,
        )
        .unwrap();
        assert_eq!(first_content(ok).unwrap(), "A wide shot.");

        let refused: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":null,"refusal":"no"}}]}"#,
        )
        .unwrap();
        assert!(first_content(refused).is_err());

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_content(empty).is_err());
    }

    #[test]
    fn test_decode_image() {
        let response: ImageResponse =
            serde_json::from_str(r#"{"data":[{"b64_json":"iVBORw0K"}]}"#).unwrap();
        assert_eq!(
            decode_image(response).unwrap(),
            vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a]
        );

        let missing: ImageResponse = serde_json::from_str(r#"{"data":[{}]}"#).unwrap();
        assert!(decode_image(missing).is_err());
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = OpenAiClient::new(
            "key",
            "https://api.openai.com/v1/",
            "gpt-4.1",
            ImageSettings {
                model: "gpt-image-1".into(),
                quality: "medium".into(),
                size: "1536x1024".into(),
            },
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.url("chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
