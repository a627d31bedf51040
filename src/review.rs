//! Decision logic for the auto-approval check: normalizing the raw inputs
//! into a [`DecisionRecord`] and evaluating the approval guards against it.

use std::fmt;

use anyhow::Context;

use crate::config::ReviewConfig;
use crate::events::PullRequestEvent;

/// Everything the approval decision depends on, derived from the raw
/// configuration and a single event payload. Built once per run and never
/// mutated afterwards.
pub struct DecisionRecord {
    pub token: String,
    pub allowed_review_for: Vec<String>,
    pub review_as: String,
    pub sender_login: String,
    pub requested_reviewers: Vec<String>,
    // `source_git` carries the base repo URL and `target_git` the head
    // repo URL. The names match the action's documented inputs; the
    // same-repo check is symmetric, so the swap does not affect behavior.
    pub source_git: String,
    pub target_git: String,
}

impl fmt::Debug for DecisionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the token is a credential and must stay out of any output
        f.debug_struct("DecisionRecord")
            .field("token", &"<redacted>")
            .field("allowed_review_for", &self.allowed_review_for)
            .field("review_as", &self.review_as)
            .field("sender_login", &self.sender_login)
            .field("requested_reviewers", &self.requested_reviewers)
            .field("source_git", &self.source_git)
            .field("target_git", &self.target_git)
            .finish()
    }
}

/// Outcome of the predicate: the decision plus one narration line per
/// guard evaluated, in evaluation order.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub approve: bool,
    pub trace: Vec<String>,
}

/// Split a comma-separated allow-list into logins, trimming surrounding
/// whitespace and dropping entries that end up empty.
pub fn split_allow_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|login| !login.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the decision record for this run. Fails when the payload has no
/// pull-request object, which means the workflow was triggered by an event
/// this check does not handle.
pub fn normalize(config: ReviewConfig, event: &PullRequestEvent) -> anyhow::Result<DecisionRecord> {
    let pull_request = event
        .pull_request
        .as_ref()
        .context("event payload does not contain a pull request")?;

    Ok(DecisionRecord {
        token: config.token,
        allowed_review_for: split_allow_list(&config.allowed_review_for),
        review_as: config.review_as,
        sender_login: pull_request.user.login.clone(),
        requested_reviewers: pull_request
            .requested_reviewers
            .iter()
            .map(|user| user.login.clone())
            .filter(|login| !login.is_empty())
            .collect(),
        source_git: pull_request.base.git_url.clone(),
        target_git: pull_request.head.git_url.clone(),
    })
}

/// Decide whether the pull request should be auto-approved.
///
/// Three guards, short-circuiting on the first failure:
/// 1. the pull request must come from the repo it targets (a fork must
///    never be approved, the token cannot be trusted in that context);
/// 2. `review_as` must actually be a requested reviewer;
/// 3. the pull-request author must be on the allow-list.
///
/// Login comparisons are exact; no case folding.
pub fn should_approve(record: &DecisionRecord) -> Verdict {
    let mut trace = Vec::new();

    if record.source_git != record.target_git {
        trace.push(format!(
            "PR repo is {}, which is not our repo {}. We are not allowed to use the API token in such context.",
            record.source_git, record.target_git
        ));
        trace.push("PR will not be auto-approved.".to_string());
        return Verdict { approve: false, trace };
    }
    trace.push("PR originated from the target git repo, we can review this.".to_string());

    if !record.requested_reviewers.iter().any(|r| r == &record.review_as) {
        trace.push(format!(
            "'{}' is not in list of requested reviewers: {}. PR will not be auto-approved.",
            record.review_as,
            record.requested_reviewers.join(", ")
        ));
        return Verdict { approve: false, trace };
    }
    trace.push(format!("'{}' has been requested to review.", record.review_as));

    if !record.allowed_review_for.iter().any(|u| u == &record.sender_login) {
        trace.push(format!(
            "User '{}' is not in allowed list: {}. PR will not be auto-approved.",
            record.sender_login,
            record.allowed_review_for.join(", ")
        ));
        return Verdict { approve: false, trace };
    }
    trace.push(format!("User '{}' PR will be approved.", record.sender_login));

    Verdict { approve: true, trace }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record() -> DecisionRecord {
        DecisionRecord {
            token: "s3cret".to_string(),
            allowed_review_for: vec!["alice".to_string(), "bob".to_string()],
            review_as: "bot1".to_string(),
            sender_login: "alice".to_string(),
            requested_reviewers: vec!["bot1".to_string()],
            source_git: "git://github.com/octo-org/widgets.git".to_string(),
            target_git: "git://github.com/octo-org/widgets.git".to_string(),
        }
    }

    fn event(value: serde_json::Value) -> PullRequestEvent {
        serde_json::from_value(value).unwrap()
    }

    fn config(allowed: &str) -> ReviewConfig {
        ReviewConfig {
            token: "s3cret".to_string(),
            allowed_review_for: allowed.to_string(),
            review_as: "bot1".to_string(),
        }
    }

    // ── allow-list splitting ──

    #[test]
    fn split_trims_and_drops_empty_entries() {
        assert_eq!(split_allow_list("alice, bob ,,charlie"), ["alice", "bob", "charlie"]);
    }

    #[test]
    fn split_handles_surrounding_whitespace() {
        assert_eq!(split_allow_list(" alice , bob "), ["alice", "bob"]);
    }

    #[test]
    fn split_of_empty_string_is_empty() {
        assert!(split_allow_list("").is_empty());
        assert!(split_allow_list(" , ,").is_empty());
    }

    #[test]
    fn split_is_idempotent() {
        let first = split_allow_list(" alice , bob ,,charlie");
        let rejoined = first.join(",");
        assert_eq!(split_allow_list(&rejoined), first);
    }

    // ── predicate ──

    #[test]
    fn approves_when_all_guards_pass() {
        let verdict = should_approve(&record());
        assert!(verdict.approve);
        assert!(verdict.trace.last().unwrap().contains("will be approved"));
    }

    #[test]
    fn rejects_pull_request_from_fork() {
        let mut record = record();
        record.target_git = "git://github.com/someone-else/widgets.git".to_string();
        let verdict = should_approve(&record);
        assert!(!verdict.approve);
        assert!(verdict.trace[0].contains("not our repo"));
    }

    #[test]
    fn rejects_when_reviewer_was_not_requested() {
        let mut record = record();
        record.requested_reviewers = vec!["bot2".to_string()];
        let verdict = should_approve(&record);
        assert!(!verdict.approve);
        assert!(verdict
            .trace
            .last()
            .unwrap()
            .contains("'bot1' is not in list of requested reviewers: bot2"));
    }

    #[test]
    fn rejects_sender_not_on_allow_list() {
        let mut record = record();
        record.sender_login = "charlie".to_string();
        let verdict = should_approve(&record);
        assert!(!verdict.approve);
        assert!(verdict
            .trace
            .last()
            .unwrap()
            .contains("'charlie' is not in allowed list: alice, bob"));
    }

    #[test]
    fn empty_allow_list_never_approves() {
        let mut record = record();
        record.allowed_review_for = vec![];
        assert!(!should_approve(&record).approve);
    }

    #[test]
    fn empty_requested_reviewers_never_approves() {
        let mut record = record();
        record.requested_reviewers = vec![];
        assert!(!should_approve(&record).approve);
    }

    #[test]
    fn login_comparison_is_case_sensitive() {
        let mut record = record();
        record.sender_login = "Alice".to_string();
        assert!(!should_approve(&record).approve);
    }

    #[test]
    fn guard_order_stops_at_first_failure() {
        // a fork is rejected before the reviewer list is even looked at
        let mut record = record();
        record.target_git = "git://github.com/someone-else/widgets.git".to_string();
        record.requested_reviewers = vec![];
        let verdict = should_approve(&record);
        assert_eq!(verdict.trace.len(), 2);
        assert!(verdict.trace[0].contains("not our repo"));
    }

    // ── normalization ──

    #[test]
    fn normalize_maps_payload_fields() {
        let event = event(json!({
            "action": "review_requested",
            "number": 4,
            "pull_request": {
                "number": 4,
                "html_url": "https://github.com/octo-org/widgets/pull/4",
                "title": "Fix typo",
                "user": { "login": "alice" },
                "requested_reviewers": [ { "login": "bot1" }, { "login": "" } ],
                "base": {
                    "ref": "main",
                    "git_url": "git://github.com/octo-org/widgets.git"
                },
                "head": {
                    "ref": "fix-typo",
                    "git_url": "git://github.com/forker/widgets.git"
                }
            }
        }));

        let record = normalize(config("alice,bob"), &event).unwrap();
        assert_eq!(record.sender_login, "alice");
        // empty logins are dropped, the rest kept verbatim
        assert_eq!(record.requested_reviewers, ["bot1"]);
        assert_eq!(record.allowed_review_for, ["alice", "bob"]);
        // base maps to source_git, head to target_git
        assert_eq!(record.source_git, "git://github.com/octo-org/widgets.git");
        assert_eq!(record.target_git, "git://github.com/forker/widgets.git");
    }

    #[test]
    fn normalize_fails_without_pull_request() {
        let event = event(json!({ "action": "ping", "number": 0 }));
        let err = normalize(config("alice"), &event).unwrap_err();
        assert!(err.to_string().contains("does not contain a pull request"));
    }

    #[test]
    fn debug_output_redacts_token() {
        let rendered = format!("{:?}", record());
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
