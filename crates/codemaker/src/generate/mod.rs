use crate::prelude::*;

pub mod chat;
pub mod pipeline;
pub mod publish;
mod run;

// Re-export the pieces the server reuses
pub use pipeline::{generate_site_data, PipelineResult};
pub use run::{run, GenerateOptions};

/// System instruction sent with every generation request. The parser
/// tolerates replies that ignore these rules, but this layout is the happy
/// path.
pub const SYSTEM_PREAMBLE: &str = "\
You are a helpful AI that generates creative website ideas and simple HTML, CSS, JS code.

Reply in exactly this layout, with no markdown fences and no commentary:
IDEA: <one sentence describing the website>
FILE: index.html
<the complete HTML document>
FILE: style.css
<the complete stylesheet>
FILE: script.js
<the complete script>";

pub const USER_PROMPT: &str =
    "Give me a unique website idea and generate simple HTML, CSS, and JS files for it.";

/// OpenRouter configuration from environment variables
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl OpenRouterConfig {
    /// Default OpenRouter API base URL
    pub const DEFAULT_BASE_URL: &'static str = "https://openrouter.ai/api/v1";

    /// Default model for website generation
    pub const DEFAULT_MODEL: &'static str = "togethercomputer/CodeLlama-13b-Instruct";

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            base_url: std::env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("OPENROUTER_API_KEY")
                .map_err(|_| Error::ConfigMissing("OPENROUTER_API_KEY"))?,
            model: std::env::var("CODEMAKER_MODEL")
                .unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string()),
        })
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, base_url: Option<String>, model: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(model) = model {
            self.model = model;
        }
        self
    }
}

/// Target repository configuration from environment variables
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub api_base: String,
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl GithubConfig {
    /// Default GitHub API base URL
    pub const DEFAULT_API_BASE: &'static str = "https://api.github.com";

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            api_base: std::env::var("GITHUB_API_BASE")
                .unwrap_or_else(|_| Self::DEFAULT_API_BASE.to_string()),
            token: std::env::var("GITHUB_TOKEN")
                .map_err(|_| Error::ConfigMissing("GITHUB_TOKEN"))?,
            owner: std::env::var("GITHUB_REPO_OWNER")
                .map_err(|_| Error::ConfigMissing("GITHUB_REPO_OWNER"))?,
            repo: std::env::var("GITHUB_REPO_NAME")
                .map_err(|_| Error::ConfigMissing("GITHUB_REPO_NAME"))?,
            branch: std::env::var("GITHUB_BRANCH").unwrap_or_else(|_| "main".to_string()),
        })
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, branch: Option<String>) -> Self {
        if let Some(branch) = branch {
            self.branch = branch;
        }
        self
    }

    /// Contents API URL for a repository path
    pub fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            path
        )
    }
}

/// Create an HTTP client with Bearer auth headers for the chat API
pub fn create_openrouter_client(config: &OpenRouterConfig) -> Result<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| eyre!("Invalid header value: {}", e))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// Create an authenticated HTTP client for the GitHub API. GitHub requires
/// a User-Agent on every request.
pub fn create_github_client(config: &GithubConfig) -> Result<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| eyre!("Invalid header value: {}", e))?,
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static("codemaker"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}
