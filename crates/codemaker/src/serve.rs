//! HTTP entry point: the same pipeline behind `POST /generate`.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::error::Error;
use crate::generate::{
    create_github_client, create_openrouter_client, generate_site_data, GithubConfig,
    OpenRouterConfig, PipelineResult,
};
use crate::prelude::{eprintln, *};

#[derive(Debug, clap::Args, Clone)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}

/// Read-only state shared by all requests: configuration plus the two
/// prebuilt authenticated clients.
struct ServerState {
    openrouter: OpenRouterConfig,
    github: GithubConfig,
    chat_client: reqwest::Client,
    github_client: reqwest::Client,
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    // Fail fast on missing credentials, before binding the socket.
    let openrouter = OpenRouterConfig::from_env()?;
    let github = GithubConfig::from_env()?;
    let chat_client = create_openrouter_client(&openrouter)?;
    let github_client = create_github_client(&github)?;

    let state = Arc::new(ServerState {
        openrouter,
        github,
        chat_client,
        github_client,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app_router = Router::new()
        .route("/", get(home_handler))
        .route("/generate", post(generate_handler))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", options.host, options.port);

    if global.verbose {
        eprintln!("Codemaker server listening on http://{}", addr);
        eprintln!("Generation endpoint: http://{}/generate", addr);
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

async fn home_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello from Codemaker backend!" }))
}

async fn generate_handler(
    State(state): State<Arc<ServerState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    match generate_site_data(
        &state.chat_client,
        &state.github_client,
        &state.openrouter,
        &state.github,
    )
    .await
    {
        Ok(result) => (StatusCode::OK, Json(success_body(&result))),
        Err(err) => {
            eprintln!("generation failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error_body(&err)))
        }
    }
}

/// The success body carries the idea and the full parsed file map, even
/// when some publishes failed; those are visible in the logs and the
/// pipeline outcomes, not in the HTTP status.
fn success_body(result: &PipelineResult) -> serde_json::Value {
    let files: serde_json::Map<String, serde_json::Value> = result
        .files
        .iter()
        .map(|file| {
            (
                file.name.clone(),
                serde_json::Value::String(file.content.clone()),
            )
        })
        .collect();

    serde_json::json!({ "idea": result.idea, "files": files })
}

fn error_body(err: &Error) -> serde_json::Value {
    let (error, details) = match err {
        Error::UpstreamUnavailable(detail) => {
            ("chat completion request failed", Some(detail.clone()))
        }
        Error::UpstreamMalformed(detail) => {
            ("chat completion response malformed", Some(detail.clone()))
        }
        Error::Parse(parse) => ("could not parse model reply", Some(parse.to_string())),
        Error::ConfigMissing(var) => ("missing configuration", Some((*var).to_string())),
    };

    match details {
        Some(details) => serde_json::json!({ "error": error, "details": details }),
        None => serde_json::json!({ "error": error }),
    }
}
