//! Repository events: push, fork, commit comments and commit statuses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{
    nullable, Actor, Author, Comment, Commit, CommitParent, CommitRef, Links, Repository,
};

/// `repo:push`: one or more branches or tags were pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoPushEvent {
    /// Pushing account
    #[serde(deserialize_with = "nullable")]
    pub actor: Actor,
    /// Target repository
    #[serde(deserialize_with = "nullable")]
    pub repository: Repository,
    /// Pushed changes
    #[serde(deserialize_with = "nullable")]
    pub push: Push,
}

/// Body of a push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Push {
    /// One entry per updated ref
    #[serde(deserialize_with = "nullable")]
    pub changes: Vec<PushChange>,
}

/// A single ref update within a push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushChange {
    /// Whether the push was forced
    #[serde(deserialize_with = "nullable")]
    pub forced: bool,
    /// Ref state before the push; `None` when the ref was created
    pub old: Option<OldOrNew>,
    /// Ref state after the push; `None` when the ref was deleted
    pub new: Option<OldOrNew>,
    /// Whether the ref was deleted
    #[serde(deserialize_with = "nullable")]
    pub closed: bool,
    /// Whether the ref was created
    #[serde(deserialize_with = "nullable")]
    pub created: bool,
    /// Whether `commits` was truncated
    #[serde(deserialize_with = "nullable")]
    pub truncated: bool,
    /// Change links
    #[serde(deserialize_with = "nullable")]
    pub links: Links,
    /// Commits added by this change, newest first
    #[serde(deserialize_with = "nullable")]
    pub commits: Vec<Commit>,
}

impl PushChange {
    /// Name of the updated ref, taken from whichever side is present.
    pub fn ref_name(&self) -> &str {
        self.new
            .as_ref()
            .or(self.old.as_ref())
            .map(|side| side.name.as_str())
            .unwrap_or_default()
    }
}

/// State of a branch or tag on one side of a push change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OldOrNew {
    /// Repository the ref lives in
    #[serde(deserialize_with = "nullable")]
    pub repository: RefRepository,
    /// Commit the ref points at
    #[serde(deserialize_with = "nullable")]
    pub target: RefTarget,
    /// Ref links
    #[serde(deserialize_with = "nullable")]
    pub links: Links,
    /// Branch or tag name
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// `"branch"`, `"tag"`, `"named_branch"` or `"bookmark"`
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
}

/// Abbreviated repository reference inside a push change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefRepository {
    /// `owner/name`
    #[serde(deserialize_with = "nullable")]
    pub full_name: String,
    /// Repository UUID
    #[serde(deserialize_with = "nullable")]
    pub uuid: String,
    /// Repository links
    #[serde(deserialize_with = "nullable")]
    pub links: Links,
    /// Repository slug
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Object type
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
}

/// Commit a ref points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefTarget {
    /// Commit date
    pub date: Option<DateTime<Utc>>,
    /// Parent commits
    #[serde(deserialize_with = "nullable")]
    pub parents: Vec<CommitParent>,
    /// Commit message
    #[serde(deserialize_with = "nullable")]
    pub message: String,
    /// Commit hash
    #[serde(deserialize_with = "nullable")]
    pub hash: String,
    /// Commit author
    #[serde(deserialize_with = "nullable")]
    pub author: Author,
    /// Commit links
    #[serde(deserialize_with = "nullable")]
    pub links: Links,
    /// Object type
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
}

/// `repo:fork`: a repository was forked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoForkEvent {
    /// Forking account
    #[serde(deserialize_with = "nullable")]
    pub actor: Actor,
    /// Original repository
    #[serde(deserialize_with = "nullable")]
    pub repository: Repository,
    /// The new fork
    #[serde(deserialize_with = "nullable")]
    pub fork: Repository,
}

/// `repo:commit_comment_created`: a comment was added to a commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoCommitCommentCreatedEvent {
    /// Commenting account
    #[serde(deserialize_with = "nullable")]
    pub actor: Actor,
    /// The new comment
    #[serde(deserialize_with = "nullable")]
    pub comment: Comment,
    /// Repository of the commit
    #[serde(deserialize_with = "nullable")]
    pub repository: Repository,
    /// The commented commit
    #[serde(deserialize_with = "nullable")]
    pub commit: CommitRef,
}

/// Build status reported against a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitStatus {
    /// Status name, e.g. the CI job title
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Status description
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    /// `"INPROGRESS"`, `"SUCCESSFUL"`, `"FAILED"` or `"STOPPED"`
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    /// Reporter-defined key identifying the status
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    /// Link to the build
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    /// Object type, always `"build"`
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    /// Creation time
    pub created_on: Option<DateTime<Utc>>,
    /// Last update time
    pub updated_on: Option<DateTime<Utc>>,
    /// Status links
    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

/// Fields shared by both commit-status events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoCommitStatusEvent {
    /// Reporting account
    #[serde(deserialize_with = "nullable")]
    pub actor: Actor,
    /// Repository of the commit
    #[serde(deserialize_with = "nullable")]
    pub repository: Repository,
    /// The status
    #[serde(deserialize_with = "nullable")]
    pub commit_status: CommitStatus,
}

/// `repo:commit_status_created`: a build status was created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoCommitStatusCreatedEvent {
    /// Shared commit-status fields
    #[serde(flatten)]
    pub base: RepoCommitStatusEvent,
}

/// `repo:commit_status_updated`: a build status changed state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoCommitStatusUpdatedEvent {
    /// Shared commit-status fields
    #[serde(flatten)]
    pub base: RepoCommitStatusEvent,
}
