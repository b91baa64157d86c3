// Chat-completions wire types
//
// The response side defaults every field so a reply missing `choices`,
// `message` or `content` decodes to empty content instead of failing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a single inference call
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Connection, DNS, TLS or timeout failure
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status
    #[error("inference endpoint returned {status}: {body}")]
    Protocol { status: u16, body: String },

    /// The endpoint answered 2xx with a body that is not JSON
    #[error("failed to decode inference response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            InferenceError::Network(format!("request timed out: {}", err))
        } else {
            InferenceError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body: `{model, messages, temperature}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// Response body: `{choices: [{message: {content}}]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, or `""` when any level is missing
    pub fn first_content(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ChatResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn extracts_first_choice_content() {
        let resp = parse(
            r#"{"id":"x","choices":[{"message":{"role":"assistant","content":"first"}},
                {"message":{"content":"second"}}]}"#,
        );
        assert_eq!(resp.first_content(), "first");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        assert_eq!(parse("{}").first_content(), "");
        assert_eq!(parse(r#"{"choices":[]}"#).first_content(), "");
        assert_eq!(parse(r#"{"choices":[{}]}"#).first_content(), "");
        assert_eq!(parse(r#"{"choices":[{"message":{}}]}"#).first_content(), "");
        assert_eq!(
            parse(r#"{"choices":[{"message":{"content":null}}]}"#).first_content(),
            ""
        );
    }

    #[test]
    fn request_serializes_expected_shape() {
        let req = ChatRequest {
            model: "acme/coder".into(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.2,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["model"], "acme/coder");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert!((value["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }
}
