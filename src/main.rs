use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

mod approve;
mod config;
mod events;
mod review;

use config::{RepoSlug, ReviewConfig};
use events::PullRequestEvent;
use review::{normalize, should_approve};

/// Auto-approval check for pull requests, meant to run as a step of a
/// `pull_request` workflow. Inputs arrive the way the workflow runner
/// delivers them: action inputs as `INPUT_*` environment variables and
/// the event payload as a JSON file.
#[derive(Parser)]
#[command(version)]
struct Opts {
    /// Token used to submit the approval review
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: String,
    /// Comma-separated logins whose pull requests may be auto-approved
    #[arg(long, env = "INPUT_ALLOWED_REVIEW_FOR", default_value = "")]
    allowed_review_for: String,
    /// Login the approval is submitted as
    #[arg(long, env = "INPUT_REVIEW_AS")]
    review_as: String,
    /// Path to the event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,
    /// Repository the workflow runs in, as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: RepoSlug,
    /// API endpoint override, for GitHub Enterprise hosts
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    let event_file = File::open(&opts.event_path)
        .with_context(|| format!("couldn't open {}:", opts.event_path.display()))?;
    let event: PullRequestEvent = serde_json::from_reader(BufReader::new(event_file))
        .context("couldn't parse event payload")?;

    if let Some(pull_request) = &event.pull_request {
        info!("handling {} event for {}", event.action, pull_request);
    }

    let config = ReviewConfig {
        token: opts.token,
        allowed_review_for: opts.allowed_review_for,
        review_as: opts.review_as,
    };

    let record = normalize(config, &event)?;
    let verdict = should_approve(&record);
    for line in &verdict.trace {
        info!("{}", line);
    }

    if !verdict.approve {
        return Ok(());
    }

    let octo = approve::build_client(record.token.clone(), opts.api_url.as_deref())?;
    approve::submit_approval(&octo, &opts.repository, event.number).await?;
    info!("approved {}#{}", opts.repository, event.number);
    Ok(())
}
