//! Query execution errors.

use thiserror::Error;

use crate::catalog::{EntityKind, SchemaError};
use crate::sql::ParseError;
use crate::storage::StorageError;

/// Result type for query execution.
pub type ExecuteResult<T> = Result<T, ExecuteError>;

/// Query execution errors. Every variant ends the query with no rows.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The field is declared for the table but the entity has no extractor for it.
    #[error("field '{field}' is not implemented for {kind} entities")]
    UnimplementedField { kind: EntityKind, field: String },

    /// A reference that is neither a branch, a remote-tracking branch nor a tag.
    #[error("cannot classify reference '{0}'")]
    UnclassifiedReference(String),

    #[error("unknown qualifier '{qualifier}', table is bound as '{alias}'")]
    UnknownQualifier { qualifier: String, alias: String },

    #[error("invalid expression: {0}")]
    InvalidExpression(String),
}

impl ExecuteError {
    /// Check if the failure came from the repository rather than the query.
    pub fn is_storage(&self) -> bool {
        matches!(self, ExecuteError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unimplemented_field_message() {
        let err = ExecuteError::UnimplementedField {
            kind: EntityKind::Tree,
            field: "filemode".into(),
        };
        assert_eq!(
            err.to_string(),
            "field 'filemode' is not implemented for tree entities"
        );
        assert!(!err.is_storage());
    }

    #[test]
    fn test_schema_errors_convert() {
        let err: ExecuteError = SchemaError::UnknownTable("blobs".into()).into();
        assert!(matches!(err, ExecuteError::Schema(SchemaError::UnknownTable(_))));
    }
}
