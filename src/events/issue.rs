//! Issue-tracker events.

use serde::{Deserialize, Serialize};

use super::common::{nullable, Actor, Comment, Issue, Repository};

/// Fields shared by every issue event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueEvent {
    /// Account that triggered the event
    #[serde(deserialize_with = "nullable")]
    pub actor: Actor,
    /// The issue
    #[serde(deserialize_with = "nullable")]
    pub issue: Issue,
    /// Repository owning the issue tracker
    #[serde(deserialize_with = "nullable")]
    pub repository: Repository,
}

/// `issue:created`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueCreatedEvent {
    /// Shared issue fields
    #[serde(flatten)]
    pub base: IssueEvent,
}

/// `issue:updated`: an issue changed, optionally with a comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueUpdatedEvent {
    /// Shared issue fields
    #[serde(flatten)]
    pub base: IssueEvent,
    /// Comment posted with the update
    #[serde(deserialize_with = "nullable")]
    pub comment: Comment,
    /// What changed
    #[serde(deserialize_with = "nullable")]
    pub changes: IssueChanges,
}

/// Changes carried by an `issue:updated` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueChanges {
    /// Status transition
    #[serde(deserialize_with = "nullable")]
    pub status: Change,
}

/// An old/new value pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Change {
    /// Previous value
    #[serde(deserialize_with = "nullable")]
    pub old: String,
    /// Current value
    #[serde(deserialize_with = "nullable")]
    pub new: String,
}

impl Change {
    /// Whether the value actually changed.
    pub fn is_changed(&self) -> bool {
        self.old != self.new
    }
}

/// `issue:comment_created`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueCommentCreatedEvent {
    /// Shared issue fields
    #[serde(flatten)]
    pub base: IssueEvent,
    /// The new comment
    #[serde(deserialize_with = "nullable")]
    pub comment: Comment,
}
