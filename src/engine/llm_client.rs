use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::engine::config::GatewayConfig;
use crate::engine::gateway::{GatewayError, Oracle, OracleRequest};

#[derive(Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: ChatMessageResponse,
}

#[derive(Deserialize)]
pub struct ChatMessageResponse {
    #[serde(default)]
    pub content: Option<String>,
}

/// Blocking client for an OpenAI-compatible chat completions API.
pub struct LlmClient {
    http: Client,
    config: GatewayConfig,
}

impl LlmClient {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self { http, config })
    }

    fn authorized(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match self.config.api_key.as_deref() {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }
}

/// Local servers answer 502/503 while a model is still loading.
fn status_error(status: StatusCode) -> GatewayError {
    match status {
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
            GatewayError::Unavailable(format!("server replied {status}"))
        }
        other => GatewayError::Status(other.as_u16()),
    }
}

impl Oracle for LlmClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn complete(&self, request: &OracleRequest) -> Result<String, GatewayError> {
        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            temperature: request.temperature,
            messages: vec![ChatMessage {
                role: "user".into(),
                content: request.prompt.clone(),
            }],
        };

        let resp = self
            .authorized(self.http.post(self.config.endpoint("chat/completions")))
            .json(&body)
            .send()?;

        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }

        let resp: ChatCompletionResponse = resp.json()?;

        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GatewayError::EmptyResponse)
    }

    fn probe(&self) -> Result<String, GatewayError> {
        let resp = self
            .authorized(self.http.get(self.config.endpoint("models")))
            .send()?;

        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }

        let resp: serde_json::Value = resp.json()?;

        Ok(format!(
            "Connected ({} models available)",
            resp["data"].as_array().map(|a| a.len()).unwrap_or(0)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let body = ChatCompletionRequest {
            model: "m".into(),
            temperature: 1.0,
            messages: vec![ChatMessage {
                role: "user".into(),
                content: "hi".into(),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["model"], "m");
    }

    #[test]
    fn response_without_content_decodes() {
        let resp: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant"}}]}"#).unwrap();
        assert!(resp.choices[0].message.content.is_none());
    }

    #[test]
    fn loading_server_is_unavailable() {
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE),
            GatewayError::Unavailable(_)
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED),
            GatewayError::Status(401)
        ));
    }

    #[test]
    fn unreachable_host_is_a_gateway_error() {
        let client = LlmClient::new(GatewayConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..GatewayConfig::default()
        })
        .unwrap();

        let err = client
            .complete(&OracleRequest {
                prompt: "p".into(),
                temperature: 0.0,
            })
            .unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
