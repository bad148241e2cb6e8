//! One-shot chat completion call

use codemaker_core::chat::{build_chat_request, extract_reply, ChatCompletionResponse};

use super::OpenRouterConfig;
use crate::error::Error;

/// Request a single completion and return the raw reply text.
///
/// One attempt per call: a non-success status or an unexpected body shape
/// aborts the whole run upstream, so no forge call is ever made for a reply
/// that does not exist.
pub async fn request_completion(
    client: &reqwest::Client,
    config: &OpenRouterConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> Result<String, Error> {
    let url = format!(
        "{}/chat/completions",
        config.base_url.trim_end_matches('/')
    );
    let payload = build_chat_request(&config.model, system_prompt, user_prompt);

    let response = client
        .post(&url)
        .json(&payload)
        .send()
        .await
        .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::UpstreamUnavailable(format!(
            "HTTP {status}: {}",
            truncate(&body, 200)
        )));
    }

    let completion: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| Error::UpstreamMalformed(e.to_string()))?;

    extract_reply(completion)
        .ok_or_else(|| Error::UpstreamMalformed("response carries no reply text".to_string()))
}

fn truncate(text: &str, max_len: usize) -> &str {
    match text.char_indices().nth(max_len) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
