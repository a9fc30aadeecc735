//! Bitbucket webhook event payloads.
//!
//! Strongly-typed representations of every event Bitbucket Cloud delivers to
//! a repository webhook, plus the static catalog mapping each `X-Event-Key`
//! value to the payload it carries.
//!
//! # Event Keys
//!
//! | Key | Payload |
//! |-----|---------|
//! | `repo:push` | [`RepoPushEvent`] |
//! | `repo:fork` | [`RepoForkEvent`] |
//! | `repo:commit_comment_created` | [`RepoCommitCommentCreatedEvent`] |
//! | `repo:commit_status_created` | [`RepoCommitStatusCreatedEvent`] |
//! | `repo:commit_status_updated` | [`RepoCommitStatusUpdatedEvent`] |
//! | `issue:created` | [`IssueCreatedEvent`] |
//! | `issue:updated` | [`IssueUpdatedEvent`] |
//! | `issue:comment_created` | [`IssueCommentCreatedEvent`] |
//! | `pullrequest:created` | [`PullRequestCreatedEvent`] |
//! | `pullrequest:updated` | [`PullRequestUpdatedEvent`] |
//! | `pullrequest:approved` | [`PullRequestApprovedEvent`] |
//! | `pullrequest:unapproved` | [`PullRequestApprovalRemovedEvent`] |
//! | `pullrequest:fulfilled` | [`PullRequestMergedEvent`] |
//! | `pullrequest:rejected` | [`PullRequestDeclinedEvent`] |
//! | `pullrequest:comment_created` | [`PullRequestCommentCreatedEvent`] |
//! | `pullrequest:comment_updated` | [`PullRequestCommentUpdatedEvent`] |
//! | `pull_request:comment_deleted` | [`PullRequestCommentDeletedEvent`] |
//!
//! The last key really does use `pull_request`; Bitbucket sends it that way.
//!
//! # Shared Bases
//!
//! Event families share a base record embedded as a flattened `base` field:
//! [`RepoCommitStatusEvent`], [`IssueEvent`], [`PullRequestEvent`] and
//! [`PullRequestCommentEvent`].

use serde::de::DeserializeOwned;

pub mod catalog;
pub mod common;
pub mod issue;
pub mod pullrequest;
pub mod repo;

pub use catalog::PayloadShape;
pub use common::{
    Actor, Approval, Author, Comment, CommentParent, Commit, CommitParent, CommitRef, Content,
    Inline, Issue, Link, Links, Named, Owner, Participant, PullRequest, PullRequestEndpoint,
    Repository, User,
};
pub use issue::{
    Change, IssueChanges, IssueCommentCreatedEvent, IssueCreatedEvent, IssueEvent,
    IssueUpdatedEvent,
};
pub use pullrequest::{
    PullRequestApprovalRemovedEvent, PullRequestApprovedEvent, PullRequestCommentCreatedEvent,
    PullRequestCommentDeletedEvent, PullRequestCommentEvent, PullRequestCommentUpdatedEvent,
    PullRequestCreatedEvent, PullRequestDeclinedEvent, PullRequestEvent, PullRequestMergedEvent,
    PullRequestUpdatedEvent,
};
pub use repo::{
    CommitStatus, OldOrNew, Push, PushChange, RefRepository, RefTarget,
    RepoCommitCommentCreatedEvent, RepoCommitStatusCreatedEvent, RepoCommitStatusEvent,
    RepoCommitStatusUpdatedEvent, RepoForkEvent, RepoPushEvent,
};

/// A payload type bound to exactly one event key.
///
/// Implemented for every payload in the catalog. The key and the
/// [`Event`] variant are generated from the same table entry, so a handler
/// registered with [`crate::Webhook::on`] always receives the type it asked
/// for.
pub trait WebhookEvent: DeserializeOwned + Into<Event> + Send + 'static {
    /// The `X-Event-Key` value announcing this payload.
    const EVENT_KEY: &'static str;

    /// Take this payload out of an [`Event`], handing the event back if it
    /// holds a different variant.
    fn from_event(event: Event) -> Result<Self, Event>;
}

macro_rules! event_catalog {
    ($(
        $(#[$meta:meta])*
        $variant:ident($payload:ident) = $key:literal {
            actor: $($actor:ident).+,
            repository: $($repo:ident).+ $(,)?
        }
    )+) => {
        /// A decoded webhook payload, one variant per catalog entry.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Event {
            $(
                $(#[$meta])*
                $variant($payload),
            )+
        }

        impl Event {
            /// The event key this payload was decoded for.
            pub fn event_key(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => $key,)+
                }
            }

            /// Name of the concrete payload type.
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => stringify!($payload),)+
                }
            }

            /// The account that triggered the event.
            pub fn actor(&self) -> &Actor {
                match self {
                    $(Self::$variant(payload) => &payload.$($actor).+,)+
                }
            }

            /// The repository the event belongs to.
            pub fn repository(&self) -> &Repository {
                match self {
                    $(Self::$variant(payload) => &payload.$($repo).+,)+
                }
            }
        }

        $(
            impl From<$payload> for Event {
                fn from(payload: $payload) -> Self {
                    Self::$variant(payload)
                }
            }

            impl WebhookEvent for $payload {
                const EVENT_KEY: &'static str = $key;

                fn from_event(event: Event) -> Result<Self, Event> {
                    match event {
                        Event::$variant(payload) => Ok(payload),
                        other => Err(other),
                    }
                }
            }
        )+

        pub(crate) static SHAPES: &[PayloadShape] = &[
            $(PayloadShape {
                event_key: $key,
                type_name: stringify!($payload),
                decode: catalog::decode::<$payload>,
            },)+
        ];
    };
}

event_catalog! {
    /// `repo:push`
    RepoPush(RepoPushEvent) = "repo:push" {
        actor: actor,
        repository: repository,
    }
    /// `repo:fork`
    RepoFork(RepoForkEvent) = "repo:fork" {
        actor: actor,
        repository: repository,
    }
    /// `repo:commit_comment_created`
    RepoCommitCommentCreated(RepoCommitCommentCreatedEvent) = "repo:commit_comment_created" {
        actor: actor,
        repository: repository,
    }
    /// `repo:commit_status_created`
    RepoCommitStatusCreated(RepoCommitStatusCreatedEvent) = "repo:commit_status_created" {
        actor: base.actor,
        repository: base.repository,
    }
    /// `repo:commit_status_updated`
    RepoCommitStatusUpdated(RepoCommitStatusUpdatedEvent) = "repo:commit_status_updated" {
        actor: base.actor,
        repository: base.repository,
    }
    /// `issue:created`
    IssueCreated(IssueCreatedEvent) = "issue:created" {
        actor: base.actor,
        repository: base.repository,
    }
    /// `issue:updated`
    IssueUpdated(IssueUpdatedEvent) = "issue:updated" {
        actor: base.actor,
        repository: base.repository,
    }
    /// `issue:comment_created`
    IssueCommentCreated(IssueCommentCreatedEvent) = "issue:comment_created" {
        actor: base.actor,
        repository: base.repository,
    }
    /// `pullrequest:created`
    PullRequestCreated(PullRequestCreatedEvent) = "pullrequest:created" {
        actor: base.actor,
        repository: base.repository,
    }
    /// `pullrequest:updated`
    PullRequestUpdated(PullRequestUpdatedEvent) = "pullrequest:updated" {
        actor: base.actor,
        repository: base.repository,
    }
    /// `pullrequest:approved`
    PullRequestApproved(PullRequestApprovedEvent) = "pullrequest:approved" {
        actor: base.actor,
        repository: base.repository,
    }
    /// `pullrequest:unapproved`
    PullRequestApprovalRemoved(PullRequestApprovalRemovedEvent) = "pullrequest:unapproved" {
        actor: base.actor,
        repository: base.repository,
    }
    /// `pullrequest:fulfilled`
    PullRequestMerged(PullRequestMergedEvent) = "pullrequest:fulfilled" {
        actor: base.actor,
        repository: base.repository,
    }
    /// `pullrequest:rejected`
    PullRequestDeclined(PullRequestDeclinedEvent) = "pullrequest:rejected" {
        actor: base.actor,
        repository: base.repository,
    }
    /// `pullrequest:comment_created`
    PullRequestCommentCreated(PullRequestCommentCreatedEvent) = "pullrequest:comment_created" {
        actor: base.base.actor,
        repository: base.base.repository,
    }
    /// `pullrequest:comment_updated`
    PullRequestCommentUpdated(PullRequestCommentUpdatedEvent) = "pullrequest:comment_updated" {
        actor: base.base.actor,
        repository: base.base.repository,
    }
    /// `pull_request:comment_deleted`
    PullRequestCommentDeleted(PullRequestCommentDeletedEvent) = "pull_request:comment_deleted" {
        actor: base.base.actor,
        repository: base.base.repository,
    }
}

impl Event {
    /// Short human-readable description of what happened.
    pub fn summary(&self) -> String {
        match self {
            Self::RepoPush(push) => {
                let refs: Vec<&str> = push.push.changes.iter().map(|c| c.ref_name()).collect();
                let commits: usize = push.push.changes.iter().map(|c| c.commits.len()).sum();
                format!("pushed {} commit(s) to {}", commits, refs.join(", "))
            }
            Self::RepoFork(fork) => format!("forked to {}", fork.fork.full_name),
            Self::RepoCommitCommentCreated(e) => {
                format!("commented on commit {}", short_hash(&e.commit.hash))
            }
            Self::RepoCommitStatusCreated(RepoCommitStatusCreatedEvent { base })
            | Self::RepoCommitStatusUpdated(RepoCommitStatusUpdatedEvent { base }) => format!(
                "build '{}' is {}",
                base.commit_status.name, base.commit_status.state
            ),
            Self::IssueCreated(IssueCreatedEvent { base }) => {
                format!("opened issue #{} '{}'", base.issue.id, base.issue.title)
            }
            Self::IssueUpdated(e) => format!(
                "updated issue #{} '{}'",
                e.base.issue.id, e.base.issue.title
            ),
            Self::IssueCommentCreated(e) => format!("commented on issue #{}", e.base.issue.id),
            Self::PullRequestCreated(PullRequestCreatedEvent { base }) => {
                pull_request_summary("opened", base)
            }
            Self::PullRequestUpdated(PullRequestUpdatedEvent { base }) => {
                pull_request_summary("updated", base)
            }
            Self::PullRequestApproved(e) => pull_request_summary("approved", &e.base),
            Self::PullRequestApprovalRemoved(e) => pull_request_summary("unapproved", &e.base),
            Self::PullRequestMerged(PullRequestMergedEvent { base }) => {
                pull_request_summary("merged", base)
            }
            Self::PullRequestDeclined(PullRequestDeclinedEvent { base }) => {
                pull_request_summary("declined", base)
            }
            Self::PullRequestCommentCreated(PullRequestCommentCreatedEvent { base })
            | Self::PullRequestCommentUpdated(PullRequestCommentUpdatedEvent { base })
            | Self::PullRequestCommentDeleted(PullRequestCommentDeletedEvent { base }) => {
                format!("comment on pull request #{}", base.base.pull_request.id)
            }
        }
    }
}

fn pull_request_summary(verb: &str, event: &PullRequestEvent) -> String {
    format!(
        "{} pull request #{} '{}'",
        verb, event.pull_request.id, event.pull_request.title
    )
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_key_matches_trait_constant() {
        let event: Event = RepoForkEvent::default().into();
        assert_eq!(event.event_key(), RepoForkEvent::EVENT_KEY);
        assert_eq!(event.type_name(), "RepoForkEvent");
    }

    #[test]
    fn test_from_event_wrong_variant() {
        let event: Event = RepoPushEvent::default().into();
        let back = RepoForkEvent::from_event(event).unwrap_err();
        assert_eq!(back.event_key(), "repo:push");
    }

    #[test]
    fn test_accessors_reach_through_bases() {
        let mut payload = PullRequestCommentDeletedEvent::default();
        payload.base.base.actor.username = "alice".to_string();
        payload.base.base.repository.full_name = "team/test-repo".to_string();

        let event = Event::from(payload);
        assert_eq!(event.actor().username, "alice");
        assert_eq!(event.repository().full_name, "team/test-repo");
    }

    #[test]
    fn test_summary() {
        let mut payload = PullRequestMergedEvent::default();
        payload.base.pull_request.id = 12;
        payload.base.pull_request.title = "Add docs".to_string();
        assert_eq!(
            Event::from(payload).summary(),
            "merged pull request #12 'Add docs'"
        );
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(short_hash("d3c0ffee"), "d3c0ffee");
        assert_eq!(short_hash("0123456789abcdef"), "0123456789ab");
    }
}
