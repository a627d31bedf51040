use std::fmt::Display;

use serde::Deserialize;
use url::Url;

/// Payload of a `pull_request` event, reduced to the fields the approval
/// check looks at.
#[derive(Debug, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub number: u64,
    // absent when the delivered event is not about a pull request
    pub pull_request: Option<PullRequest>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: Url,
    pub title: String,
    pub user: GitHubUser,
    pub requested_reviewers: Vec<GitHubUser>,
    pub base: PrRef,
    pub head: PrRef,
}

impl Display for PullRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PR #{}: {} by {}", self.number, self.title, self.user.login)
    }
}

/// One side of the pull request. `git_url` identifies the repository the
/// ref lives in, which is what the fork check compares.
#[derive(Debug, Deserialize)]
pub struct PrRef {
    pub r#ref: String,
    pub git_url: String,
}
