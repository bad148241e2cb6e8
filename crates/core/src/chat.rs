//! Chat-completion wire types
//!
//! Request payload construction and reply extraction for an
//! OpenAI-compatible chat endpoint. The HTTP call itself lives in the shell.

use serde::{Deserialize, Serialize};

// =============================================================================
// Request Types (Serialization)
// =============================================================================

/// One message in a chat-completion request.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of a chat-completion request.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Build the two-message request: one system instruction, one user prompt.
pub fn build_chat_request(model: &str, system_prompt: &str, user_prompt: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            },
        ],
    }
}

// =============================================================================
// Response Types (Deserialization)
// =============================================================================

/// Chat-completion response body. Only the fields the pipeline reads are
/// modeled; everything else is ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One completion choice.
#[derive(Debug, Deserialize, Clone)]
pub struct ChatChoice {
    pub message: ChatReplyMessage,
}

/// The assistant message inside a choice.
#[derive(Debug, Deserialize, Clone)]
pub struct ChatReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Extract the first choice's reply text. `None` means the response had a
/// success status but not the expected shape.
pub fn extract_reply(response: ChatCompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chat_request_roles_and_order() {
        let request = build_chat_request("some/model", "be helpful", "make a site");

        assert_eq!(request.model, "some/model");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, "be helpful");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "make a site");
    }

    #[test]
    fn test_request_serializes_expected_shape() {
        let request = build_chat_request("m", "s", "u");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
    }

    #[test]
    fn test_extract_reply_first_choice() {
        let body = r#"{
            "id": "gen-1",
            "choices": [
                {"message": {"role": "assistant", "content": "IDEA: Calc"}},
                {"message": {"role": "assistant", "content": "second"}}
            ]
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();

        assert_eq!(extract_reply(response).as_deref(), Some("IDEA: Calc"));
    }

    #[test]
    fn test_extract_reply_empty_choices() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(extract_reply(response), None);
    }

    #[test]
    fn test_extract_reply_missing_choices_field() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(extract_reply(response), None);
    }

    #[test]
    fn test_extract_reply_null_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(extract_reply(response), None);
    }
}
