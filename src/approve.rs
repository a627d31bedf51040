use anyhow::anyhow;
use octocrab::Octocrab;
use serde_json::json;

use crate::config::RepoSlug;

/// Build an API client from the personal token, honoring an endpoint
/// override for GitHub Enterprise hosts.
pub fn build_client(token: String, api_url: Option<&str>) -> anyhow::Result<Octocrab> {
    let mut builder = Octocrab::builder().personal_token(token);
    if let Some(api) = api_url {
        builder = builder
            .base_uri(api)
            .map_err(|e| anyhow!("invalid GITHUB_API_URL: {e}"))?;
    }
    builder
        .build()
        .map_err(|e| anyhow!("failed to build GitHub client: {e}"))
}

/// Submit an "APPROVE" review with no body text against the given pull
/// request. Errors from the API call propagate to the caller unchanged;
/// there is no retry here.
pub async fn submit_approval(octo: &Octocrab, repo: &RepoSlug, number: u64) -> anyhow::Result<()> {
    let route = format!("/repos/{}/{}/pulls/{}/reviews", repo.owner, repo.repo, number);
    let _: serde_json::Value = octo
        .post(&route, Some(&json!({ "event": "APPROVE" })))
        .await
        .map_err(|e| anyhow!("failed to submit approval for {repo}#{number}: {e:?}"))?;
    Ok(())
}
