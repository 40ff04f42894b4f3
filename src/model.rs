//! Output-facing entities for the aggregation endpoint.
//!
//! Field names are part of the inbound wire contract: `Branch` serialises its
//! commit field as `lastCommitSha`, and `ErrorResponse` is the envelope used
//! for every non-2xx response we produce ourselves.

use serde::{Deserialize, Serialize};

/// The account that owns a repository.
///
/// Shared between the upstream wire shape and our output shape; both sides
/// agree on a single `login` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// A branch together with the SHA of its latest commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,
    pub last_commit_sha: String,
}

/// A non-fork repository with its branch list, in upstream listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub name: String,
    pub owner: Owner,
    pub branches: Vec<Branch>,
}

/// Error envelope returned for failed inbound requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_serialises_last_commit_sha_camel_case() {
        let branch = Branch {
            name: "main".to_string(),
            last_commit_sha: "abc123".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&branch).unwrap(),
            serde_json::json!({"name": "main", "lastCommitSha": "abc123"})
        );
    }

    #[test]
    fn repository_wire_shape() {
        let repo = Repository {
            name: "repo1".to_string(),
            owner: Owner {
                login: "testuser".to_string(),
            },
            branches: vec![Branch {
                name: "main".to_string(),
                last_commit_sha: "abc123".to_string(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&repo).unwrap(),
            serde_json::json!({
                "name": "repo1",
                "owner": {"login": "testuser"},
                "branches": [{"name": "main", "lastCommitSha": "abc123"}],
            })
        );
    }

    #[test]
    fn error_response_wire_shape() {
        let err = ErrorResponse::new(404, "User not found");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({"status": 404, "message": "User not found"})
        );
    }
}
