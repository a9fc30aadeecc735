//! Records shared by several Bitbucket event payloads.
//!
//! Every record derives `Default` and is deserialized with `#[serde(default)]`:
//! fields missing from the JSON keep their zero value and unknown fields are
//! ignored. Every field that is not an `Option` goes through [`nullable`],
//! so an explicit `null` also falls back to the zero value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize `null` as `T::default()`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single hyperlink in a [`Links`] block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    /// Target URL
    #[serde(deserialize_with = "nullable")]
    pub href: String,
}

/// Hyperlinks attached to most Bitbucket objects.
///
/// Which links are populated depends on the object and the event; absent
/// links have an empty `href`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    /// Avatar image
    #[serde(deserialize_with = "nullable")]
    pub avatar: Link,
    /// Web UI page
    #[serde(deserialize_with = "nullable")]
    pub html: Link,
    /// API resource
    #[serde(rename = "self", deserialize_with = "nullable")]
    pub self_link: Link,
    /// Commit listing (push changes)
    #[serde(deserialize_with = "nullable")]
    pub commits: Link,
    /// Single commit (comments, statuses)
    #[serde(deserialize_with = "nullable")]
    pub commit: Link,
}

/// A Bitbucket account (user or team).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Account type, usually `"user"` or `"team"`
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    /// Account username
    #[serde(deserialize_with = "nullable")]
    pub username: String,
    /// Human-readable name
    #[serde(deserialize_with = "nullable")]
    pub display_name: String,
    /// Account UUID in braces, e.g. `{1234-...}`
    #[serde(deserialize_with = "nullable")]
    pub uuid: String,
    /// Account links
    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

/// The account that triggered an event.
pub type Actor = User;

/// The account owning a repository.
pub type Owner = User;

/// A Bitbucket repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    /// Source-control system, `"git"` or `"hg"`
    #[serde(deserialize_with = "nullable")]
    pub scm: String,
    /// `owner/name`
    #[serde(deserialize_with = "nullable")]
    pub full_name: String,
    /// Object type, always `"repository"`
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    /// Project website
    #[serde(deserialize_with = "nullable")]
    pub website: String,
    /// Repository owner
    #[serde(deserialize_with = "nullable")]
    pub owner: Owner,
    /// Repository UUID
    #[serde(deserialize_with = "nullable")]
    pub uuid: String,
    /// Repository links
    #[serde(deserialize_with = "nullable")]
    pub links: Links,
    /// Repository slug
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Whether the repository is private
    #[serde(deserialize_with = "nullable")]
    pub is_private: bool,
}

/// The author of a commit.
///
/// `raw` is always present; `user` is the zero value when the author email
/// does not map to a Bitbucket account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    /// `Name <email>` as recorded in the commit
    #[serde(deserialize_with = "nullable")]
    pub raw: String,
    /// Linked Bitbucket account
    #[serde(deserialize_with = "nullable")]
    pub user: User,
}

/// A parent reference of a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitParent {
    /// Parent commit hash
    #[serde(deserialize_with = "nullable")]
    pub hash: String,
    /// Parent links
    #[serde(deserialize_with = "nullable")]
    pub links: Links,
    /// Object type, always `"commit"`
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
}

/// A commit as listed in push changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
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
    /// Object type, always `"commit"`
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
}

/// A bare commit reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitRef {
    /// Commit hash
    #[serde(deserialize_with = "nullable")]
    pub hash: String,
}

/// Rich-text content: the raw source plus its rendered HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// Source text
    #[serde(deserialize_with = "nullable")]
    pub raw: String,
    /// Rendered HTML
    #[serde(deserialize_with = "nullable")]
    pub html: String,
    /// Markup language, e.g. `"markdown"`
    #[serde(deserialize_with = "nullable")]
    pub markup: String,
}

/// Reference to a parent comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentParent {
    /// Parent comment id
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
}

/// Location of an inline (diff) comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inline {
    /// File path
    #[serde(deserialize_with = "nullable")]
    pub path: String,
    /// Line in the old version; Bitbucket sends a number or `null`
    pub from: serde_json::Value,
    /// Line in the new version
    #[serde(deserialize_with = "nullable")]
    pub to: i64,
}

/// A comment on a commit, issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    /// Comment id
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Parent comment, zero when this is a top-level comment
    #[serde(deserialize_with = "nullable")]
    pub parent: CommentParent,
    /// Comment body
    #[serde(deserialize_with = "nullable")]
    pub content: Content,
    /// Inline location, zero for general comments
    #[serde(deserialize_with = "nullable")]
    pub inline: Inline,
    /// Creation time
    pub created_on: Option<DateTime<Utc>>,
    /// Last update time
    pub updated_on: Option<DateTime<Utc>>,
    /// Comment links
    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

/// A named reference such as an issue milestone or version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Named {
    /// Display name
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}

/// An issue from the repository issue tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    /// Issue number
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Component name
    #[serde(deserialize_with = "nullable")]
    pub component: String,
    /// Issue title
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    /// Issue description
    #[serde(deserialize_with = "nullable")]
    pub content: Content,
    /// Priority, e.g. `"major"`
    #[serde(deserialize_with = "nullable")]
    pub priority: String,
    /// State, e.g. `"new"`, `"resolved"`
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    /// Kind, e.g. `"bug"`, `"task"`
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    /// Milestone
    #[serde(deserialize_with = "nullable")]
    pub milestone: Named,
    /// Version
    #[serde(deserialize_with = "nullable")]
    pub version: Named,
    /// Creation time
    pub created_on: Option<DateTime<Utc>>,
    /// Last update time
    pub updated_on: Option<DateTime<Utc>>,
    /// Issue links
    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

/// One side (source or destination) of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestEndpoint {
    /// Branch
    #[serde(deserialize_with = "nullable")]
    pub branch: Named,
    /// Head commit of the branch
    #[serde(deserialize_with = "nullable")]
    pub commit: CommitRef,
    /// Repository holding the branch
    #[serde(deserialize_with = "nullable")]
    pub repository: Repository,
}

/// A pull-request participant with their review state.
///
/// Bitbucket sends this shape in the `participants` list, not the plain
/// [`User`] its documentation describes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    /// `"PARTICIPANT"` or `"REVIEWER"`
    #[serde(deserialize_with = "nullable")]
    pub role: String,
    /// Object type, always `"participant"`
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    /// Whether the participant approved
    #[serde(deserialize_with = "nullable")]
    pub approved: bool,
    /// The participant account
    #[serde(deserialize_with = "nullable")]
    pub user: User,
}

/// A pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    /// Pull-request number
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Title
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    /// Description
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    /// `"OPEN"`, `"MERGED"`, `"DECLINED"` or `"SUPERSEDED"`
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    /// Pull-request author
    #[serde(deserialize_with = "nullable")]
    pub author: User,
    /// Source branch
    #[serde(deserialize_with = "nullable")]
    pub source: PullRequestEndpoint,
    /// Destination branch
    #[serde(deserialize_with = "nullable")]
    pub destination: PullRequestEndpoint,
    /// Merge commit, zero until merged
    #[serde(deserialize_with = "nullable")]
    pub merge_commit: CommitRef,
    /// Participants and their approval state
    #[serde(deserialize_with = "nullable")]
    pub participants: Vec<Participant>,
    /// Requested reviewers
    #[serde(deserialize_with = "nullable")]
    pub reviewers: Vec<User>,
    /// Whether the source branch is closed on merge
    #[serde(deserialize_with = "nullable")]
    pub close_source_branch: bool,
    /// Account that merged or declined, zero while open
    #[serde(deserialize_with = "nullable")]
    pub closed_by: User,
    /// Decline reason
    #[serde(deserialize_with = "nullable")]
    pub reason: String,
    /// Creation time
    pub created_on: Option<DateTime<Utc>>,
    /// Last update time
    pub updated_on: Option<DateTime<Utc>>,
    /// Pull-request links
    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

/// A pull-request approval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Approval {
    /// Approval time
    pub date: Option<DateTime<Utc>>,
    /// Approving account
    #[serde(deserialize_with = "nullable")]
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let repo: Repository = serde_json::from_str(r#"{"name": "test-repo"}"#).unwrap();
        assert_eq!(repo.name, "test-repo");
        assert!(repo.full_name.is_empty());
        assert!(!repo.is_private);
    }

    #[test]
    fn test_null_fields_default() {
        let json = r#"{
            "title": "Fix it",
            "description": null,
            "merge_commit": null,
            "closed_by": null,
            "reason": null
        }"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.title, "Fix it");
        assert!(pr.description.is_empty());
        assert!(pr.merge_commit.hash.is_empty());
        assert!(pr.closed_by.username.is_empty());
    }

    #[test]
    fn test_null_on_every_record() {
        let json = r#"{
            "id": null,
            "title": null,
            "close_source_branch": null,
            "author": {"username": null, "links": null},
            "source": {"branch": null, "repository": {"name": null, "owner": null}},
            "participants": [{"role": null, "approved": null, "user": null}],
            "reviewers": null,
            "links": {"html": {"href": null}}
        }"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.id, 0);
        assert!(pr.title.is_empty());
        assert!(!pr.close_source_branch);
        assert!(pr.source.repository.name.is_empty());
        assert_eq!(pr.participants.len(), 1);
        assert!(!pr.participants[0].approved);
        assert!(pr.reviewers.is_empty());

        let comment: Comment = serde_json::from_str(
            r#"{"id": null, "content": null, "links": null, "inline": {"path": null, "from": null}}"#,
        )
        .unwrap();
        assert_eq!(comment.id, 0);
        assert!(comment.content.raw.is_empty());
        assert!(comment.inline.from.is_null());

        let commit: Commit = serde_json::from_str(
            r#"{"parents": null, "author": {"raw": null, "user": null}, "message": null}"#,
        )
        .unwrap();
        assert!(commit.parents.is_empty());
        assert!(commit.author.raw.is_empty());

        let issue: Issue = serde_json::from_str(r#"{"content": null, "priority": null}"#).unwrap();
        assert_eq!(issue, Issue::default());
    }

    #[test]
    fn test_self_link_rename() {
        let links: Links =
            serde_json::from_str(r#"{"self": {"href": "https://api.example/x"}}"#).unwrap();
        assert_eq!(links.self_link.href, "https://api.example/x");
        assert!(links.html.href.is_empty());
    }

    #[test]
    fn test_optional_dates() {
        let comment: Comment = serde_json::from_str(
            r#"{"id": 7, "created_on": "2015-06-09T03:34:49.877Z", "updated_on": null}"#,
        )
        .unwrap();
        assert_eq!(comment.id, 7);
        assert!(comment.created_on.is_some());
        assert!(comment.updated_on.is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let user: User =
            serde_json::from_str(r#"{"username": "alice", "account_id": "557058:x"}"#).unwrap();
        assert_eq!(user.username, "alice");
    }
}
