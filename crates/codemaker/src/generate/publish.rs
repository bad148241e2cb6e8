//! Reads and conditional writes against the repository contents API

use codemaker_core::github::{
    build_upsert_request, classify_upsert_status, publish_path, ContentsFileResponse,
    PublishOutcome, PublishStatus,
};

use super::GithubConfig;

/// Current remote state of one published file. `sha` is `None` when the
/// file does not exist yet on the target branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileRef {
    pub path: String,
    pub sha: Option<String>,
}

/// Failure of the remote read. A missing file is not an error; it is the
/// normal create path.
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("lookup failed: {0}")]
    Request(String),

    #[error("lookup failed: HTTP {0}")]
    Status(u16),

    #[error("lookup returned an unexpected body: {0}")]
    Malformed(String),
}

/// Fetch the current revision of a generated file on the configured branch.
pub async fn fetch_remote_file(
    client: &reqwest::Client,
    config: &GithubConfig,
    filename: &str,
) -> Result<RemoteFileRef, LookupError> {
    let path = publish_path(filename);
    let url = format!("{}?ref={}", config.contents_url(&path), config.branch);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| LookupError::Request(e.to_string()))?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(RemoteFileRef { path, sha: None });
    }

    if !response.status().is_success() {
        return Err(LookupError::Status(response.status().as_u16()));
    }

    let contents: ContentsFileResponse = response
        .json()
        .await
        .map_err(|e| LookupError::Malformed(e.to_string()))?;

    Ok(RemoteFileRef {
        path,
        sha: Some(contents.sha),
    })
}

/// Create or update one file with the revision obtained from the preceding
/// read. The API rejects the write when the remote file changed in between;
/// that surfaces as a `Failed` outcome with detail `conflict`, never as a
/// silent overwrite.
pub async fn upsert_file(
    client: &reqwest::Client,
    config: &GithubConfig,
    filename: &str,
    content: &str,
    sha: Option<String>,
) -> PublishOutcome {
    let path = publish_path(filename);
    let had_sha = sha.is_some();
    let payload = build_upsert_request(filename, content, &config.branch, sha);

    let response = match client
        .put(config.contents_url(&path))
        .json(&payload)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            return PublishOutcome {
                filename: filename.to_string(),
                status: PublishStatus::Failed,
                detail: Some(e.to_string()),
            }
        }
    };

    let (status, detail) = classify_upsert_status(response.status().as_u16(), had_sha);

    PublishOutcome {
        filename: filename.to_string(),
        status,
        detail,
    }
}
