use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "API_KEY";
pub const BASE_URL_ENV: &str = "JUDGE_LLM_BASE_URL";
pub const MODEL_ENV: &str = "JUDGE_LLM_MODEL";

/// Where and how to reach the judge model.
/// Any OpenAI-compatible chat completions endpoint works (LM Studio, Ollama, hosted APIs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub model: String,

    /// Read from the environment; never written to disk.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub battle_temperature: f32,
    pub suggestion_temperature: f32,
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".into(),
            model: "local-model".into(),
            api_key: None,
            battle_temperature: 1.0,
            suggestion_temperature: 0.9,
            timeout_secs: 60,
        }
    }
}

impl GatewayConfig {
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(BASE_URL_ENV) {
            self.base_url = url;
        }
        if let Some(model) = lookup(MODEL_ENV) {
            self.model = model;
        }
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
