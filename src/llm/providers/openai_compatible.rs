//! OpenAI-compatible chat completion provider (`/v1/chat/completions`).
//!
//! All OpenAI wire types are private to this module — callers only see
//! [`ChatRequest`] and [`LlmResponse`]. The provider is stateless: one
//! request, one round-trip.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::llm::{ChatRequest, LlmResponse, LlmUsage, ProviderError};

// ── Public provider ───────────────────────────────────────────────────────────

/// Adapter for any HTTP endpoint implementing `/v1/chat/completions`.
///
/// Covers OpenAI, OpenAI-compatible local servers (Ollama, LM Studio…),
/// and hosted alternatives. Constructed once at startup, then cheaply cloned
/// because `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleProvider {
    client: Client,
    api_base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleProvider {
    /// Build a provider from config values and an optional API key.
    ///
    /// When `api_key` is present it is sent as `Authorization: Bearer <key>`.
    pub fn new(
        api_base_url: String,
        model: String,
        timeout_seconds: u64,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_base_url, model, api_key })
    }

    pub async fn complete(&self, request: &ChatRequest) -> Result<LlmResponse, ProviderError> {
        let payload = build_payload(&self.model, request);

        debug!(
            model = %payload.model,
            temperature = ?payload.temperature,
            max_tokens = ?payload.max_tokens,
            content_len = request.user.len(),
            "sending LLM request"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full LLM request payload");
        }

        let mut req = self.client.post(&self.api_base_url).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| {
            error!(url = %self.api_base_url, error = %e, timeout = e.is_timeout(), "LLM HTTP request failed (transport)");
            ProviderError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            let message = error_message(status, &body);
            error!(%status, %message, "LLM request returned HTTP error");
            return Err(ProviderError::Request(message));
        }

        let parsed = response.json::<ChatCompletionResponse>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize LLM response");
            ProviderError::Request(format!("failed to parse response body: {e}"))
        })?;

        debug!(choices = parsed.choices.len(), "received LLM response");
        into_llm_response(parsed)
    }
}

fn build_payload(model: &str, request: &ChatRequest) -> ChatCompletionRequest {
    // gpt-5 family models reject an explicit temperature.
    let temperature = if model.starts_with("gpt-5") { None } else { request.temperature };

    let mut messages = Vec::with_capacity(2);
    if let Some(sys) = &request.system {
        messages.push(Message { role: "system".to_string(), content: sys.clone() });
    }
    messages.push(Message { role: "user".to_string(), content: request.user.clone() });

    ChatCompletionRequest {
        model: model.to_string(),
        messages,
        max_tokens: request.max_tokens,
        temperature,
    }
}

fn into_llm_response(parsed: ChatCompletionResponse) -> Result<LlmResponse, ProviderError> {
    let usage = parsed.usage.map(|u| LlmUsage {
        input_tokens: u.prompt_tokens,
        output_tokens: u.completion_tokens,
    });

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProviderError::Request("empty or missing content in response".into()))?;

    Ok(LlmResponse { text, usage })
}

/// Render an HTTP failure, preferring the provider's own error envelope.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(env) = serde_json::from_str::<ErrorEnvelope>(body) {
        let code = env
            .error
            .code
            .map(|v| match v {
                serde_json::Value::String(s) => format!(" [code={s}]"),
                other => format!(" [code={other}]"),
            })
            .unwrap_or_default();
        format!("HTTP {status}{code}: {}", env.error.message)
    } else {
        format!("HTTP {status}: {body}")
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<UsageData>,
}

#[derive(Debug, Deserialize)]
struct UsageData {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// Error envelope used by OpenAI and compatible APIs.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::QueryKind;
    use serde_json::json;

    #[test]
    fn payload_carries_profile_controls() {
        let req = ChatRequest::from_profile(&QueryKind::Quiz.profile(), "ctx");
        let v = serde_json::to_value(build_payload("gpt-4o-mini", &req)).unwrap();
        assert_eq!(v["model"], "gpt-4o-mini");
        assert_eq!(v["max_tokens"], 5000);
        assert!((v["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["role"], "user");
        assert_eq!(v["messages"][1]["content"], "ctx");
    }

    #[test]
    fn gpt5_payload_omits_temperature() {
        let req = ChatRequest::from_profile(&QueryKind::Summary.profile(), "ctx");
        let v = serde_json::to_value(build_payload("gpt-5-mini", &req)).unwrap();
        assert!(v.get("temperature").is_none());
        assert_eq!(v["max_tokens"], 5000);
    }

    #[test]
    fn plain_request_has_single_message() {
        let v = serde_json::to_value(build_payload("m", &ChatRequest::user("hi"))).unwrap();
        assert_eq!(v["messages"].as_array().unwrap().len(), 1);
        assert!(v.get("max_tokens").is_none());
    }

    #[test]
    fn response_text_is_trimmed_and_usage_kept() {
        let parsed: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "  answer \n" } }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
        }))
        .unwrap();
        let out = into_llm_response(parsed).unwrap();
        assert_eq!(out.text, "answer");
        assert_eq!(out.usage, Some(LlmUsage { input_tokens: 12, output_tokens: 3 }));
    }

    #[test]
    fn empty_content_is_an_error() {
        let parsed: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [{ "message": { "content": "   " } }] })).unwrap();
        assert!(into_llm_response(parsed).is_err());

        let parsed: ChatCompletionResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(into_llm_response(parsed).is_err());
    }

    #[test]
    fn error_envelope_is_rendered() {
        let body = r#"{"error":{"message":"rate limited","code":"rate_limit_exceeded"}}"#;
        let msg = error_message(reqwest::StatusCode::TOO_MANY_REQUESTS, body);
        assert!(msg.contains("429"));
        assert!(msg.contains("[code=rate_limit_exceeded]"));
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn non_json_error_body_is_passed_through() {
        let msg = error_message(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert!(msg.ends_with("upstream down"));
    }
}
