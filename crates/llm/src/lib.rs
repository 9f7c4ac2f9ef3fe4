use std::env;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use triage_core::{Assessment, UrgencyLevel};

const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str =
    "You are a conservative medical triage assistant focused on patient safety.";

/// Why a delegated classification attempt did not produce an Assessment.
/// Callers treat every variant the same way: fall back to the rule-based
/// strategy. The distinction exists for diagnostics only.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to OpenAI failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("OpenAI returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("reply was not the expected JSON object: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("reply contained no message content")]
    EmptyReply,
    #[error("reply urgency level is not one of low/moderate/high: {0:?}")]
    UnknownUrgency(String),
    #[error("reply contained no recommendations")]
    MissingRecommendations,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
}

impl OpenAiConfig {
    /// Present only when OPENAI_API_KEY is set; absence disables the
    /// delegation strategy entirely.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())?;
        let model =
            env::var("TRIAGE_OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        Some(Self { api_key, model })
    }
}

/// Best-effort classification strategy delegating to an OpenAI chat model.
/// The HTTP client is supplied by the caller and carries the timeouts; no
/// retries are performed here, a single failure is final.
#[derive(Clone)]
pub struct OpenAiClassifier {
    config: OpenAiConfig,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentReply {
    urgency_level: String,
    summary: String,
    recommendations: Vec<String>,
    reasoning: String,
}

impl OpenAiClassifier {
    pub fn new(config: OpenAiConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn classify(&self, symptoms: &str) -> Result<Assessment, LlmError> {
        let payload = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_triage_prompt(symptoms) }
            ],
            "temperature": 0.3,
            "max_tokens": 500
        });

        let response = self
            .http_client
            .post(OPENAI_CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatCompletionResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyReply)?;

        parse_assessment_reply(&content)
    }
}

pub fn build_triage_prompt(symptoms: &str) -> String {
    format!(
        r#"You are a medical triage AI assistant. Analyze the following symptoms and provide a triage assessment.

IMPORTANT GUIDELINES:
- You are NOT providing a diagnosis
- You are assessing urgency level only
- Always recommend consulting healthcare professionals
- Be conservative and err on the side of caution

Symptoms: {symptoms}

Respond with a JSON object containing:
1. urgencyLevel: "low", "moderate", or "high"
2. summary: A brief explanation of the assessment (2-3 sentences)
3. recommendations: Array of 3-4 actionable recommendations
4. reasoning: Brief explanation of why this urgency level was chosen

Example format:
{{
    "urgencyLevel": "moderate",
    "summary": "Based on your symptoms, this appears to be a moderate concern that should be addressed within 24 hours.",
    "recommendations": [
        "Visit an urgent care center",
        "Monitor symptoms closely",
        "Seek immediate care if symptoms worsen"
    ],
    "reasoning": "The combination of symptoms suggests a condition that requires medical attention but is not immediately life-threatening."
}}"#
    )
}

/// Strict parse of the model reply. Missing fields, unknown urgency values,
/// and empty recommendation lists are all failures so the caller falls back
/// rather than returning a half-formed assessment.
pub fn parse_assessment_reply(content: &str) -> Result<Assessment, LlmError> {
    let reply: AssessmentReply = serde_json::from_str(content.trim())?;

    let urgency_level = match reply.urgency_level.trim().to_lowercase().as_str() {
        "low" => UrgencyLevel::Low,
        "moderate" => UrgencyLevel::Moderate,
        "high" => UrgencyLevel::High,
        other => return Err(LlmError::UnknownUrgency(other.to_string())),
    };

    if reply.recommendations.iter().all(|item| item.trim().is_empty()) {
        return Err(LlmError::MissingRecommendations);
    }

    Ok(Assessment {
        urgency_level,
        summary: reply.summary,
        recommendations: reply.recommendations,
        reasoning: reply.reasoning,
    })
}
