use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::engine::config::GatewayConfig;
use crate::engine::llm_client::LlmClient;
use crate::engine::llm_decode::decode_payload;
use crate::engine::prompt_builder::{PromptBuilder, SUGGESTION_COUNT};
use crate::model::battle_round::{DialogueLine, Matchup, RoundOutcome};

pub const FALLBACK_REASON: &str = "信号中断，本次平局";
pub const FALLBACK_SCORE: u8 = 50;
pub const THINKING_PLACEHOLDER: &str = "AI在思考中...";
pub const FALLBACK_SUGGESTIONS: [&str; 5] =
    ["网络开小差了", "正在憋大招...", "这很有道理", "看情况吧", "这可不好说"];

pub const MIN_DIALOGUE_LINES: usize = 2;
pub const MAX_DIALOGUE_LINES: usize = 4;

/// Anything that can go wrong talking to the judge model.
/// Never escapes the gateway: every variant ends in a fallback.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("oracle answered with HTTP {0}")]
    Status(u16),
    #[error("oracle returned no content")]
    EmptyResponse,
    #[error("malformed oracle output: {0}")]
    Malformed(String),
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct OracleRequest {
    pub prompt: String,
    pub temperature: f32,
}

/// The external generative service, reduced to text in, text out.
pub trait Oracle: Send {
    fn name(&self) -> &str;

    fn complete(&self, request: &OracleRequest) -> Result<String, GatewayError>;

    /// Cheap reachability check for the settings window.
    fn probe(&self) -> Result<String, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct VerdictPayload {
    dialogue: Vec<DialogueLine>,
    #[serde(rename = "voteP1")]
    vote_p1: f64,
    reason: String,
}

pub struct Gateway {
    oracle: Box<dyn Oracle>,
    battle_temperature: f32,
    suggestion_temperature: f32,
}

impl Gateway {
    pub fn new(oracle: Box<dyn Oracle>, config: &GatewayConfig) -> Self {
        Self {
            oracle,
            battle_temperature: config.battle_temperature,
            suggestion_temperature: config.suggestion_temperature,
        }
    }

    /// Gateway backed by the HTTP client described by `config`.
    pub fn connect(config: &GatewayConfig) -> anyhow::Result<Self> {
        let client = LlmClient::new(config.clone())?;
        Ok(Self::new(Box::new(client), config))
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Stage one round. Always returns a usable outcome.
    pub fn simulate_battle_round(&self, matchup: &Matchup) -> RoundOutcome {
        match self.try_simulate(matchup) {
            Ok(outcome) => {
                info!(
                    oracle = self.oracle.name(),
                    vote_p1 = outcome.vote_p1,
                    lines = outcome.dialogue.len(),
                    "round adjudicated"
                );
                outcome
            }
            Err(e) => {
                warn!(oracle = self.oracle.name(), error = %e, "adjudication failed, using tie fallback");
                fallback_outcome(matchup)
            }
        }
    }

    fn try_simulate(&self, matchup: &Matchup) -> Result<RoundOutcome, GatewayError> {
        let prompt = PromptBuilder::battle(matchup);
        debug!(%prompt, "battle prompt");

        let raw = self.oracle.complete(&OracleRequest {
            prompt,
            temperature: self.battle_temperature,
        })?;

        let payload: VerdictPayload = decode_payload(&raw)?;
        outcome_from_payload(payload)
    }

    /// Candidate arguments for a stance. Falls back to generic filler on failure.
    pub fn generate_arguments(&self, topic: &str, stance: &str) -> Vec<String> {
        let prompt = PromptBuilder::suggestions(topic, stance);
        debug!(%prompt, "suggestion prompt");

        let request = OracleRequest {
            prompt,
            temperature: self.suggestion_temperature,
        };

        let raw = match self.oracle.complete(&request) {
            Ok(raw) => raw,
            Err(GatewayError::EmptyResponse) => return vec![THINKING_PLACEHOLDER.to_string()],
            Err(e) => {
                warn!(oracle = self.oracle.name(), error = %e, "suggestion request failed");
                return fallback_suggestions();
            }
        };

        if raw.trim().is_empty() {
            return vec![THINKING_PLACEHOLDER.to_string()];
        }

        match decode_payload::<Vec<String>>(&raw) {
            Ok(list) => {
                let cleaned = clean_suggestions(list);
                if cleaned.is_empty() {
                    vec![THINKING_PLACEHOLDER.to_string()]
                } else {
                    cleaned
                }
            }
            Err(e) => {
                warn!(error = %e, "suggestion output unusable");
                fallback_suggestions()
            }
        }
    }

    pub fn probe(&self) -> Result<String, GatewayError> {
        self.oracle.probe()
    }
}

fn outcome_from_payload(payload: VerdictPayload) -> Result<RoundOutcome, GatewayError> {
    let mut dialogue: Vec<DialogueLine> = payload
        .dialogue
        .into_iter()
        .filter(|line| !line.text.trim().is_empty())
        .collect();

    if dialogue.len() < MIN_DIALOGUE_LINES {
        return Err(GatewayError::Malformed(format!(
            "dialogue has {} usable line(s)",
            dialogue.len()
        )));
    }
    dialogue.truncate(MAX_DIALOGUE_LINES);

    if !payload.vote_p1.is_finite() {
        return Err(GatewayError::Malformed("voteP1 is not a number".into()));
    }
    let vote_p1 = payload.vote_p1.round().clamp(0.0, 100.0) as u8;

    Ok(RoundOutcome {
        dialogue,
        vote_p1,
        reason: payload.reason.trim().to_string(),
    })
}

/// Two verbatim lines, dead even.
pub fn fallback_outcome(matchup: &Matchup) -> RoundOutcome {
    RoundOutcome {
        dialogue: vec![
            DialogueLine::new(matchup.p1_name.clone(), matchup.p1_arg.clone()),
            DialogueLine::new(matchup.p2_name.clone(), matchup.p2_arg.clone()),
        ],
        vote_p1: FALLBACK_SCORE,
        reason: FALLBACK_REASON.to_string(),
    }
}

fn fallback_suggestions() -> Vec<String> {
    FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

fn clean_suggestions(list: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in list {
        let item = item.trim();
        if item.is_empty() || out.iter().any(|o| o == item) {
            continue;
        }
        out.push(item.to_string());
        if out.len() == SUGGESTION_COUNT {
            break;
        }
    }
    out
}
