//! The generate-and-publish pipeline
//!
//! One run: ask the model once, parse the reply, then read-and-upsert each
//! generated file in the order the reply produced them. A failed file never
//! stops the remaining files; the run only aborts when there is nothing to
//! publish at all (chat failure, unparseable reply).

use codemaker_core::github::{PublishOutcome, PublishStatus};
use codemaker_core::parse::{parse_reply, GeneratedFile};

use super::{chat, publish, GithubConfig, OpenRouterConfig, SYSTEM_PREAMBLE, USER_PROMPT};
use crate::error::Error;
use crate::prelude::eprintln;

/// Everything a single pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub idea: String,
    pub files: Vec<GeneratedFile>,
    pub outcomes: Vec<PublishOutcome>,
}

/// Run the whole pipeline once and return the generated content along with
/// the per-file publish outcomes.
///
/// Files are published sequentially, each with its own read-then-write
/// pair; the two calls are not atomic, so a concurrent writer shows up as a
/// conflict outcome on that file.
pub async fn generate_site_data(
    chat_client: &reqwest::Client,
    github_client: &reqwest::Client,
    openrouter: &OpenRouterConfig,
    github: &GithubConfig,
) -> Result<PipelineResult, Error> {
    let reply =
        chat::request_completion(chat_client, openrouter, SYSTEM_PREAMBLE, USER_PROMPT).await?;
    let parsed = parse_reply(&reply)?;

    let mut outcomes = Vec::with_capacity(parsed.files.len() + parsed.rejected.len());

    // Hygiene rejects never reach the forge.
    for reject in &parsed.rejected {
        outcomes.push(PublishOutcome {
            filename: reject.name.clone(),
            status: PublishStatus::Failed,
            detail: Some(format!("invalid filename: {}", reject.reason)),
        });
    }

    for file in &parsed.files {
        let outcome = publish_one(github_client, github, file).await;

        if outcome.status == PublishStatus::Failed {
            eprintln!(
                "publish failed for {}: {}",
                outcome.filename,
                outcome.detail.as_deref().unwrap_or("unknown")
            );
        }

        outcomes.push(outcome);
    }

    Ok(PipelineResult {
        idea: parsed.idea,
        files: parsed.files,
        outcomes,
    })
}

/// Read-then-conditional-write for one file. A lookup failure skips the
/// write entirely.
async fn publish_one(
    client: &reqwest::Client,
    config: &GithubConfig,
    file: &GeneratedFile,
) -> PublishOutcome {
    let remote = match publish::fetch_remote_file(client, config, &file.name).await {
        Ok(remote) => remote,
        Err(err) => {
            return PublishOutcome {
                filename: file.name.clone(),
                status: PublishStatus::Failed,
                detail: Some(err.to_string()),
            }
        }
    };

    publish::upsert_file(client, config, &file.name, &file.content, remote.sha).await
}
