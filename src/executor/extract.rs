//! Field extraction from repository entities.
//!
//! Each entity kind has one extractor that matches its closed field enum
//! exhaustively. Names are looked up by the enum, so a name the enum does not
//! know is reported as [`ExecuteError::UnimplementedField`].

use serde_json::Value;

use super::error::{ExecuteError, ExecuteResult};
use crate::catalog::{CommitField, EntityKind, ReferenceField, RemoteField};
use crate::storage::{CommitInfo, ReferenceInfo, RemoteInfo};

/// Rendered `hash` of a reference without a direct target.
pub const NULL_HASH: &str = "NULL";

/// An entity pulled from a walker.
#[derive(Debug, Clone)]
pub enum Entity {
    Commit(CommitInfo),
    Reference(ReferenceInfo),
    Remote(RemoteInfo),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Commit(_) => EntityKind::Commit,
            Entity::Reference(_) => EntityKind::Reference,
            Entity::Remote(_) => EntityKind::Remote,
        }
    }

    /// Render a field as the string that appears in result rows.
    pub fn extract(&self, field: &str) -> ExecuteResult<String> {
        match self {
            Entity::Commit(commit) => commit_field(commit, self.field_enum(field, CommitField::from_name)?),
            Entity::Reference(reference) => {
                reference_field(reference, self.field_enum(field, ReferenceField::from_name)?)
            }
            Entity::Remote(remote) => remote_field(remote, self.field_enum(field, RemoteField::from_name)?),
        }
    }

    /// Field value for predicate evaluation.
    ///
    /// Identical to [`Entity::extract`] except that a reference without a
    /// target yields JSON null, so `hash IS NULL` holds for it.
    pub fn value(&self, field: &str) -> ExecuteResult<Value> {
        if let Entity::Reference(reference) = self {
            if reference.target.is_none() && ReferenceField::from_name(field) == Some(ReferenceField::Hash) {
                return Ok(Value::Null);
            }
        }
        self.extract(field).map(Value::String)
    }

    fn field_enum<F>(&self, field: &str, lookup: impl Fn(&str) -> Option<F>) -> ExecuteResult<F> {
        lookup(field).ok_or_else(|| ExecuteError::UnimplementedField {
            kind: self.kind(),
            field: field.to_string(),
        })
    }
}

fn commit_field(commit: &CommitInfo, field: CommitField) -> ExecuteResult<String> {
    Ok(match field {
        CommitField::Hash => commit.id.to_string(),
        CommitField::Date => commit.date_string(),
        CommitField::Author => commit.author.name.clone(),
        CommitField::AuthorEmail => commit.author.email.clone(),
        CommitField::Committer => commit.committer.name.clone(),
        CommitField::CommitterEmail => commit.committer.email.clone(),
        CommitField::Message => commit.summary().to_string(),
        CommitField::FullMessage => commit.message.clone(),
    })
}

fn reference_field(reference: &ReferenceInfo, field: ReferenceField) -> ExecuteResult<String> {
    match field {
        ReferenceField::Name => Ok(reference.shorthand.clone()),
        ReferenceField::FullName => Ok(reference.full_name.clone()),
        ReferenceField::Type => reference
            .kind
            .map(|k| k.as_str().to_string())
            .ok_or_else(|| ExecuteError::UnclassifiedReference(reference.full_name.clone())),
        ReferenceField::Hash => Ok(reference
            .target
            .map(|id| id.to_string())
            .unwrap_or_else(|| NULL_HASH.to_string())),
    }
}

fn remote_field(remote: &RemoteInfo, field: RemoteField) -> ExecuteResult<String> {
    Ok(match field {
        RemoteField::Name => remote.name.clone(),
        RemoteField::Url => remote.url.clone(),
        RemoteField::PushUrl => remote.push_url.clone(),
        RemoteField::Owner => remote.owner.display().to_string(),
    })
}
