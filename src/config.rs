use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

/// Raw configuration strings, exactly as the workflow runner hands them
/// over. The allow-list stays a single comma-separated string until it is
/// normalized into a decision record.
pub struct ReviewConfig {
    /// Credential used for the approval call, kept out of all output
    pub token: String,
    /// Comma-separated logins whose pull requests may be auto-approved
    pub allowed_review_for: String,
    /// Login the approval is submitted as
    pub review_as: String,
}

/// An `owner/repo` pair as found in `GITHUB_REPOSITORY`.
#[derive(Debug, Clone)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoSlug {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => Ok(RepoSlug {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(anyhow!("expected owner/repo, got {:?}", s)),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
