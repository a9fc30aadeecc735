//! Pull-request events.
//!
//! Every event here embeds [`PullRequestEvent`]; the comment events embed it
//! through [`PullRequestCommentEvent`].

use serde::{Deserialize, Serialize};

use super::common::{nullable, Actor, Approval, Comment, PullRequest, Repository};

/// Fields shared by every pull-request event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestEvent {
    /// Account that triggered the event
    #[serde(deserialize_with = "nullable")]
    pub actor: Actor,
    /// The pull request
    #[serde(rename = "pullrequest", deserialize_with = "nullable")]
    pub pull_request: PullRequest,
    /// Destination repository
    #[serde(deserialize_with = "nullable")]
    pub repository: Repository,
}

/// `pullrequest:created`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestCreatedEvent {
    /// Shared pull-request fields
    #[serde(flatten)]
    pub base: PullRequestEvent,
}

/// `pullrequest:updated`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestUpdatedEvent {
    /// Shared pull-request fields
    #[serde(flatten)]
    pub base: PullRequestEvent,
}

/// `pullrequest:approved`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestApprovedEvent {
    /// Shared pull-request fields
    #[serde(flatten)]
    pub base: PullRequestEvent,
    /// The new approval
    #[serde(deserialize_with = "nullable")]
    pub approval: Approval,
}

/// `pullrequest:unapproved`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestApprovalRemovedEvent {
    /// Shared pull-request fields
    #[serde(flatten)]
    pub base: PullRequestEvent,
    /// The withdrawn approval
    #[serde(deserialize_with = "nullable")]
    pub approval: Approval,
}

/// `pullrequest:fulfilled`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestMergedEvent {
    /// Shared pull-request fields
    #[serde(flatten)]
    pub base: PullRequestEvent,
}

/// `pullrequest:rejected`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestDeclinedEvent {
    /// Shared pull-request fields
    #[serde(flatten)]
    pub base: PullRequestEvent,
}

/// Fields shared by the pull-request comment events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestCommentEvent {
    /// Shared pull-request fields
    #[serde(flatten)]
    pub base: PullRequestEvent,
    /// The comment
    #[serde(deserialize_with = "nullable")]
    pub comment: Comment,
}

/// `pullrequest:comment_created`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestCommentCreatedEvent {
    /// Shared comment-event fields
    #[serde(flatten)]
    pub base: PullRequestCommentEvent,
}

/// `pullrequest:comment_updated`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestCommentUpdatedEvent {
    /// Shared comment-event fields
    #[serde(flatten)]
    pub base: PullRequestCommentEvent,
}

/// `pull_request:comment_deleted`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestCommentDeletedEvent {
    /// Shared comment-event fields
    #[serde(flatten)]
    pub base: PullRequestCommentEvent,
}
