//! The schema registry.

use super::schema::{ResolvedTable, SchemaError, SchemaResult, TableBinding, TableSchema};
use super::types::EntityKind;

/// Marker that selects every field of a table.
pub const WILDCARD: &str = "*";

/// The catalog of virtual tables. Immutable once built.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: Vec<TableSchema>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Build the catalog from the static table declarations.
    pub fn new() -> Self {
        let commits = TableSchema::base("commits", EntityKind::Commit);
        let refs = TableSchema::base("refs", EntityKind::Reference);
        let remotes = TableSchema::base("remotes", EntityKind::Remote);
        let trees = TableSchema::base("trees", EntityKind::Tree);
        let branches = TableSchema::proxy("branches", &refs, "type", "branch");
        let tags = TableSchema::proxy("tags", &refs, "type", "tag");

        Self {
            tables: vec![commits, refs, remotes, branches, tags, trees],
        }
    }

    /// Get a table schema by name.
    pub fn get_table(&self, name: &str) -> SchemaResult<&TableSchema> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| SchemaError::UnknownTable(name.to_string()))
    }

    /// Check if a table is declared.
    pub fn table_exists(&self, name: &str) -> bool {
        self.get_table(name).is_ok()
    }

    /// List all table names in declaration order.
    pub fn list_tables(&self) -> Vec<&'static str> {
        self.tables.iter().map(|t| t.name).collect()
    }

    /// Field names of a table, in declared order.
    pub fn fields_of(&self, table: &str) -> SchemaResult<&[&'static str]> {
        Ok(self.get_table(table)?.fields.as_slice())
    }

    /// Resolve a table name to the table its rows are drawn from.
    pub fn resolve(&self, table: &str) -> SchemaResult<ResolvedTable> {
        let schema = self.get_table(table)?;
        Ok(ResolvedTable {
            name: schema.name,
            base: schema.proxy.map(|p| p.base).unwrap_or(schema.name),
            kind: schema.kind,
            implied: schema.proxy.map(|p| p.filter),
        })
    }

    /// Check that `field` can be requested from `table`.
    ///
    /// The wildcard is always accepted. Other fields are checked against the
    /// base table of a proxy.
    pub fn validate_field(&self, field: &str, table: &str) -> SchemaResult<()> {
        let resolved = self.resolve(table)?;
        if field == WILDCARD {
            return Ok(());
        }

        if self.get_table(resolved.base)?.has_field(field) {
            Ok(())
        } else {
            Err(SchemaError::UnknownField {
                table: table.to_string(),
                field: field.to_string(),
            })
        }
    }

    /// Bind a table under an alias (the table name when `alias` is `None`).
    pub fn bind(&self, table: &str, alias: Option<&str>) -> SchemaResult<TableBinding> {
        let resolved = self.resolve(table)?;
        Ok(TableBinding {
            alias: alias.unwrap_or(resolved.name).to_string(),
            table: resolved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_tables() {
        let catalog = Catalog::new();
        let tables = catalog.list_tables();
        for name in ["commits", "refs", "remotes", "branches", "tags", "trees"] {
            assert!(tables.contains(&name), "missing {}", name);
        }
    }

    #[test]
    fn test_unknown_table() {
        let catalog = Catalog::new();
        assert_eq!(
            catalog.resolve("blobs"),
            Err(SchemaError::UnknownTable("blobs".into()))
        );
        assert!(catalog.fields_of("blobs").is_err());
        assert!(catalog.validate_field("*", "blobs").is_err());
    }

    #[test]
    fn test_resolve_proxy() {
        let catalog = Catalog::new();

        let tags = catalog.resolve("tags").unwrap();
        assert!(tags.is_proxy());
        assert_eq!(tags.base, "refs");
        assert_eq!(tags.kind, EntityKind::Reference);
        let filter = tags.implied.unwrap();
        assert_eq!((filter.field, filter.value), ("type", "tag"));

        let branches = catalog.resolve("branches").unwrap();
        assert_eq!(branches.implied.unwrap().value, "branch");

        let commits = catalog.resolve("commits").unwrap();
        assert!(!commits.is_proxy());
        assert_eq!(commits.base, "commits");
    }

    #[test]
    fn test_validate_field() {
        let catalog = Catalog::new();

        assert!(catalog.validate_field("hash", "commits").is_ok());
        assert!(catalog.validate_field(WILDCARD, "commits").is_ok());
        assert!(catalog.validate_field("type", "tags").is_ok());
        assert_eq!(
            catalog.validate_field("url", "commits"),
            Err(SchemaError::UnknownField {
                table: "commits".into(),
                field: "url".into(),
            })
        );
    }

    #[test]
    fn test_fields_of_proxy_match_base() {
        let catalog = Catalog::new();
        assert_eq!(
            catalog.fields_of("branches").unwrap(),
            catalog.fields_of("refs").unwrap()
        );
        assert_eq!(
            catalog.fields_of("remotes").unwrap(),
            &["name", "url", "push_url", "owner"]
        );
    }

    #[test]
    fn test_bind_alias() {
        let catalog = Catalog::new();

        let plain = catalog.bind("commits", None).unwrap();
        assert_eq!(plain.alias, "commits");

        let aliased = catalog.bind("tags", Some("t")).unwrap();
        assert_eq!(aliased.alias, "t");
        assert_eq!(aliased.table.base, "refs");
        assert!(aliased.accepts_qualifier("t"));
        assert!(aliased.accepts_qualifier("tags"));
        assert!(!aliased.accepts_qualifier("commits"));
    }
}
