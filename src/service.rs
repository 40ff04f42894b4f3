//! Aggregation over the upstream client: list a user's repositories, drop
//! forks, and enrich each survivor with its branch list.

use std::time::Instant;

use tracing::debug;

use crate::forge::api_types::{UpstreamBranch, UpstreamRepo};
use crate::forge::{ForgeError, UpstreamClient};
use crate::metrics::{EndpointLabels, MetricsRegistry};
use crate::model::{Branch, Repository};

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Produces the filtered, branch-enriched repository list for a username.
#[derive(Clone)]
pub struct RepoAggregator {
    client: UpstreamClient,
    metrics: MetricsRegistry,
}

impl RepoAggregator {
    pub fn new(client: UpstreamClient, metrics: MetricsRegistry) -> Self {
        Self { client, metrics }
    }

    /// List `username`'s non-fork repositories with their branches.
    ///
    /// Branch lookups run sequentially in listing order, and any single
    /// failure fails the whole call: the response is all-or-nothing, never a
    /// partial repository list.
    pub async fn user_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<Repository>, ForgeError> {
        let started = Instant::now();

        self.count_upstream_call("user_repos");
        let upstream_repos = self.client.list_user_repos(username).await?;
        let listed = upstream_repos.len();

        let mut repositories = Vec::new();
        for repo in upstream_repos.into_iter().filter(|r| !r.fork) {
            self.count_upstream_call("repo_branches");
            let branches = self
                .client
                .list_repo_branches(&repo.owner.login, &repo.name)
                .await?;
            repositories.push(assemble(repo, branches));
        }

        debug!(
            username,
            listed,
            returned = repositories.len(),
            "aggregated repositories"
        );
        self.metrics
            .metrics
            .aggregation_duration_seconds
            .observe(started.elapsed().as_secs_f64());

        Ok(repositories)
    }

    fn count_upstream_call(&self, endpoint: &str) {
        self.metrics
            .metrics
            .upstream_api_calls
            .get_or_create(&EndpointLabels {
                endpoint: endpoint.to_string(),
            })
            .inc();
    }
}

// ---------------------------------------------------------------------------
// Reshaping helpers
// ---------------------------------------------------------------------------

/// Build the output entity for one repository, preserving branch order.
fn assemble(repo: UpstreamRepo, branches: Vec<UpstreamBranch>) -> Repository {
    Repository {
        name: repo.name,
        owner: repo.owner,
        branches: branches.into_iter().map(to_branch).collect(),
    }
}

fn to_branch(branch: UpstreamBranch) -> Branch {
    Branch {
        name: branch.name,
        last_commit_sha: branch.commit.sha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::api_types::CommitRef;
    use crate::model::Owner;

    fn upstream_branch(name: &str, sha: &str) -> UpstreamBranch {
        UpstreamBranch {
            name: name.to_string(),
            commit: CommitRef {
                sha: sha.to_string(),
            },
        }
    }

    #[test]
    fn to_branch_maps_commit_sha() {
        let branch = to_branch(upstream_branch("main", "abc123"));
        assert_eq!(branch.name, "main");
        assert_eq!(branch.last_commit_sha, "abc123");
    }

    #[test]
    fn assemble_preserves_branch_order() {
        let repo = UpstreamRepo {
            name: "repo1".to_string(),
            owner: Owner {
                login: "testuser".to_string(),
            },
            fork: false,
        };
        let assembled = assemble(
            repo,
            vec![
                upstream_branch("main", "abc123"),
                upstream_branch("develop", "def456"),
            ],
        );

        assert_eq!(assembled.name, "repo1");
        assert_eq!(assembled.owner.login, "testuser");
        let names: Vec<_> = assembled.branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["main", "develop"]);
        assert_eq!(assembled.branches[1].last_commit_sha, "def456");
    }

    #[test]
    fn assemble_with_no_branches_yields_empty_list() {
        let repo = UpstreamRepo {
            name: "empty".to_string(),
            owner: Owner {
                login: "testuser".to_string(),
            },
            fork: false,
        };
        assert!(assemble(repo, Vec::new()).branches.is_empty());
    }
}
