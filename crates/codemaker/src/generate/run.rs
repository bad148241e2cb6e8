//! The `codemaker generate` command: one pipeline run from the terminal.

use colored::Colorize;
use serde::Serialize;

use codemaker_core::github::{PublishOutcome, PublishStatus};

use super::{
    create_github_client, create_openrouter_client, generate_site_data, GithubConfig,
    OpenRouterConfig, PipelineResult,
};
use crate::prelude::{new_table, println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct GenerateOptions {
    /// Chat model identifier
    #[clap(long, env = "CODEMAKER_MODEL")]
    pub model: Option<String>,

    /// Chat API base URL
    #[clap(long, env = "OPENROUTER_BASE_URL")]
    pub openrouter_url: Option<String>,

    /// Target branch for published files
    #[clap(long, env = "GITHUB_BRANCH")]
    pub branch: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: GenerateOptions, global: crate::Global) -> Result<()> {
    let openrouter = OpenRouterConfig::from_env()?
        .with_overrides(options.openrouter_url.clone(), options.model.clone());
    let github = GithubConfig::from_env()?.with_overrides(options.branch.clone());

    if global.verbose {
        println!("Model: {}", openrouter.model);
        println!("Repository: {}/{} ({})", github.owner, github.repo, github.branch);
        println!();
    }

    let chat_client = create_openrouter_client(&openrouter)?;
    let github_client = create_github_client(&github)?;

    let result = generate_site_data(&chat_client, &github_client, &openrouter, &github).await?;

    if options.json {
        println!("{}", format_result_json(&result)?);
    } else {
        print!("{}", format_result_text(&result));
    }

    Ok(())
}

#[derive(Serialize)]
struct ResultOutput<'a> {
    idea: &'a str,
    files: serde_json::Map<String, serde_json::Value>,
    outcomes: &'a [PublishOutcome],
}

/// Build JSON output for one pipeline run
fn format_result_json(result: &PipelineResult) -> Result<String> {
    let files = result
        .files
        .iter()
        .map(|file| {
            (
                file.name.clone(),
                serde_json::Value::String(file.content.clone()),
            )
        })
        .collect();

    let output = ResultOutput {
        idea: &result.idea,
        files,
        outcomes: &result.outcomes,
    };

    serde_json::to_string_pretty(&output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Build formatted text output for one pipeline run
fn format_result_text(result: &PipelineResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}: {}\n\n",
        "IDEA".bright_cyan().bold(),
        result.idea.white().bold()
    ));

    for file in &result.files {
        output.push_str(&format!(
            "{} {} ({} bytes)\n",
            "FILE".green(),
            file.name.bright_white(),
            file.content.len()
        ));
    }

    if !result.outcomes.is_empty() {
        let mut table = new_table();
        table.add_row(prettytable::row!["File", "Status", "Detail"]);

        for outcome in &result.outcomes {
            let status = match outcome.status {
                PublishStatus::Created => "Created".green(),
                PublishStatus::Updated => "Updated".cyan(),
                PublishStatus::Failed => "Failed".red(),
            };
            table.add_row(prettytable::row![
                outcome.filename,
                status,
                outcome.detail.as_deref().unwrap_or("-")
            ]);
        }

        output.push('\n');
        output.push_str(&table.to_string());
    }

    output
}
