//! core type-safe wrappers around git primitives for the storage layer.

use std::fmt;

use git2::Oid;
use serde::Serialize;

/// A git object identifier (commit, tag or blob target).
///
/// The inner Oid is only accessible within the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) Oid);

impl ObjectId {
    pub(crate) fn new(oid: Oid) -> Self {
        Self(oid)
    }

    #[cfg(test)]
    pub(crate) fn raw(&self) -> Oid {
        self.0
    }

    /// parse ObjectId from a hex string
    pub fn from_hex(hex: &str) -> Result<Self, git2::Error> {
        Oid::from_str(hex).map(ObjectId)
    }

    /// short form of the id
    pub fn short(&self) -> String {
        self.0.to_string()[..7].to_string()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// identity part of a git signature (author/committer info)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    /// create a new identity
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// copy the identity out of a git2 signature; non UTF-8 parts are replaced lossily
    pub(crate) fn from_git2(sig: &git2::Signature<'_>) -> Self {
        Self {
            name: String::from_utf8_lossy(sig.name_bytes()).into_owned(),
            email: String::from_utf8_lossy(sig.email_bytes()).into_owned(),
        }
    }
}

/// classification of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// local branch, `refs/heads/*`
    Branch,
    /// remote-tracking branch, `refs/remotes/*`
    Remote,
    /// tag, `refs/tags/*`
    Tag,
}

impl ReferenceKind {
    /// the name used for this kind in query results
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Branch => "branch",
            ReferenceKind::Remote => "remote",
            ReferenceKind::Tag => "tag",
        }
    }

    /// classify a git2 reference; `None` for notes, stash and other namespaces
    pub(crate) fn classify(reference: &git2::Reference<'_>) -> Option<Self> {
        if reference.is_branch() {
            Some(ReferenceKind::Branch)
        } else if reference.is_remote() {
            Some(ReferenceKind::Remote)
        } else if reference.is_tag() {
            Some(ReferenceKind::Tag)
        } else {
            None
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_hex() {
        let hex = "0123456789abcdef0123456789abcdef01234567";
        let id = ObjectId::from_hex(hex).unwrap();
        assert_eq!(id.to_string(), hex);
        assert_eq!(id.short(), "0123456");
        assert!(ObjectId::from_hex("not-hex").is_err());
    }

    #[test]
    fn test_reference_kind_names() {
        assert_eq!(ReferenceKind::Branch.as_str(), "branch");
        assert_eq!(ReferenceKind::Remote.to_string(), "remote");
        assert_eq!(ReferenceKind::Tag.as_str(), "tag");
    }

    #[test]
    fn test_identity_from_signature() {
        let sig = git2::Signature::now("Ada", "ada@example.com").unwrap();
        let identity = Identity::from_git2(&sig);
        assert_eq!(identity, Identity::new("Ada", "ada@example.com"));
    }
}
