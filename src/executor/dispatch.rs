//! Table name to walk strategy, and proxy filter composition.

use git2::Repository;

use super::extract::Entity;
use crate::catalog::{EntityKind, ResolvedTable};
use crate::sql::Expr;
use crate::storage::{CommitWalk, ReferenceWalk, RemoteWalk, RepositoryExt, StorageResult};

/// How rows for a table are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStrategy {
    Commits,
    References,
    Remotes,
    /// Declared but never yields.
    Trees,
}

impl WalkStrategy {
    /// Pick the strategy for a resolved table. Proxies walk their base.
    pub fn for_table(table: &ResolvedTable) -> Self {
        match table.kind {
            EntityKind::Commit => WalkStrategy::Commits,
            EntityKind::Reference => WalkStrategy::References,
            EntityKind::Remote => WalkStrategy::Remotes,
            EntityKind::Tree => WalkStrategy::Trees,
        }
    }

    /// Start walking. Nothing is read until the walk is pulled.
    pub fn open(self, repo: &Repository) -> StorageResult<Walk<'_>> {
        Ok(match self {
            WalkStrategy::Commits => Walk::Commits(repo.commit_walk()?),
            WalkStrategy::References => Walk::References(repo.reference_walk()?),
            WalkStrategy::Remotes => Walk::Remotes(repo.remote_walk()?),
            WalkStrategy::Trees => Walk::Trees,
        })
    }
}

/// An entity stream over one of the storage walkers.
pub enum Walk<'repo> {
    Commits(CommitWalk<'repo>),
    References(ReferenceWalk<'repo>),
    Remotes(RemoteWalk<'repo>),
    Trees,
}

impl Iterator for Walk<'_> {
    type Item = StorageResult<Entity>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Walk::Commits(w) => w.next().map(|r| r.map(Entity::Commit)),
            Walk::References(w) => w.next().map(|r| r.map(Entity::Reference)),
            Walk::Remotes(w) => w.next().map(|r| r.map(Entity::Remote)),
            Walk::Trees => None,
        }
    }
}

/// Conjoin a proxy table's implied filter with the user's filter.
pub fn compose_filter(table: &ResolvedTable, user: Option<&Expr>) -> Option<Expr> {
    let implied = table
        .implied
        .map(|f| Expr::column_eq(f.field, f.value));

    match (implied, user) {
        (Some(implied), Some(user)) => Some(implied.and(Expr::Nested(Box::new(user.clone())))),
        (Some(implied), None) => Some(implied),
        (None, user) => user.cloned(),
    }
}
