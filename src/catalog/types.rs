//! Entity kinds and the closed field sets of each kind.
//!
//! Table schemas are declared from these enums, and the executor's extractors
//! match on them exhaustively, so a field cannot be declared without an
//! extractor branch.

use std::fmt;

use serde::Serialize;

/// The kind of repository entity a table's rows come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Commit,
    Reference,
    Remote,
    /// Reserved; tree walking is not implemented.
    Tree,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Commit => "commit",
            EntityKind::Reference => "reference",
            EntityKind::Remote => "remote",
            EntityKind::Tree => "tree",
        }
    }

    /// Declared field names for this kind, in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        match self {
            EntityKind::Commit => CommitField::ALL.iter().map(|f| f.as_str()).collect(),
            EntityKind::Reference => ReferenceField::ALL.iter().map(|f| f.as_str()).collect(),
            EntityKind::Remote => RemoteField::ALL.iter().map(|f| f.as_str()).collect(),
            EntityKind::Tree => TreeField::ALL.iter().map(|f| f.as_str()).collect(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of the `commits` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitField {
    Hash,
    Date,
    Author,
    AuthorEmail,
    Committer,
    CommitterEmail,
    Message,
    FullMessage,
}

impl CommitField {
    pub const ALL: [CommitField; 8] = [
        CommitField::Hash,
        CommitField::Date,
        CommitField::Author,
        CommitField::AuthorEmail,
        CommitField::Committer,
        CommitField::CommitterEmail,
        CommitField::Message,
        CommitField::FullMessage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitField::Hash => "hash",
            CommitField::Date => "date",
            CommitField::Author => "author",
            CommitField::AuthorEmail => "author_email",
            CommitField::Committer => "committer",
            CommitField::CommitterEmail => "committer_email",
            CommitField::Message => "message",
            CommitField::FullMessage => "full_message",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// Fields of the `refs` table and its proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceField {
    Name,
    FullName,
    Type,
    Hash,
}

impl ReferenceField {
    pub const ALL: [ReferenceField; 4] = [
        ReferenceField::Name,
        ReferenceField::FullName,
        ReferenceField::Type,
        ReferenceField::Hash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceField::Name => "name",
            ReferenceField::FullName => "full_name",
            ReferenceField::Type => "type",
            ReferenceField::Hash => "hash",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// Fields of the `remotes` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteField {
    Name,
    Url,
    PushUrl,
    Owner,
}

impl RemoteField {
    pub const ALL: [RemoteField; 4] = [
        RemoteField::Name,
        RemoteField::Url,
        RemoteField::PushUrl,
        RemoteField::Owner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteField::Name => "name",
            RemoteField::Url => "url",
            RemoteField::PushUrl => "push_url",
            RemoteField::Owner => "owner",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// Fields reserved for the `trees` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeField {
    Hash,
    Name,
    Id,
    Type,
    Filemode,
}

impl TreeField {
    pub const ALL: [TreeField; 5] = [
        TreeField::Hash,
        TreeField::Name,
        TreeField::Id,
        TreeField::Type,
        TreeField::Filemode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TreeField::Hash => "hash",
            TreeField::Name => "name",
            TreeField::Id => "id",
            TreeField::Type => "type",
            TreeField::Filemode => "filemode",
        }
    }
}
