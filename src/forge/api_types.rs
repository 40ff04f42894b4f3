use crate::model::Owner;

/// A repository as returned by `GET /users/{username}/repos`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct UpstreamRepo {
    pub name: String,
    pub owner: Owner,
    #[serde(default)]
    pub fork: bool,
}

/// A branch as returned by `GET /repos/{owner}/{repo}/branches`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct UpstreamBranch {
    pub name: String,
    pub commit: CommitRef,
}

/// The commit a branch currently points at.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct CommitRef {
    pub sha: String,
}
