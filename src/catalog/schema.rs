//! Virtual table definitions and per-query table bindings.

use serde::Serialize;
use thiserror::Error;

use super::types::EntityKind;

/// Result type for schema lookups.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("table '{0}' not found")]
    UnknownTable(String),

    #[error("table '{table}' has no field '{field}'")]
    UnknownField { table: String, field: String },
}

/// Equality filter a proxy table adds on top of its base table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImpliedFilter {
    pub field: &'static str,
    pub value: &'static str,
}

/// A declared virtual table.
#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    /// Table name as used in FROM.
    pub name: &'static str,
    /// Entity kind rows are drawn from.
    pub kind: EntityKind,
    /// Field names in declaration order.
    pub fields: Vec<&'static str>,
    /// Base table and filter when this table is a proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyDef>,
}

/// Proxy overlay: rows of `base` that satisfy `filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProxyDef {
    pub base: &'static str,
    pub filter: ImpliedFilter,
}

impl TableSchema {
    /// Declare a base table whose fields are the kind's full field set.
    pub fn base(name: &'static str, kind: EntityKind) -> Self {
        Self {
            name,
            kind,
            fields: kind.field_names(),
            proxy: None,
        }
    }

    /// Declare a proxy over `base`, sharing its fields.
    pub fn proxy(name: &'static str, base: &TableSchema, field: &'static str, value: &'static str) -> Self {
        Self {
            name,
            kind: base.kind,
            fields: base.fields.clone(),
            proxy: Some(ProxyDef {
                base: base.name,
                filter: ImpliedFilter { field, value },
            }),
        }
    }

    /// Check if this table is a filtered view over another.
    pub fn is_proxy(&self) -> bool {
        self.proxy.is_some()
    }

    /// Check if the table declares `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| *f == field)
    }
}

/// Outcome of resolving a table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTable {
    /// The name that was resolved.
    pub name: &'static str,
    /// The table rows are actually drawn from (itself unless a proxy).
    pub base: &'static str,
    pub kind: EntityKind,
    /// Filter to conjoin with the user's predicate, for proxies.
    pub implied: Option<ImpliedFilter>,
}

impl ResolvedTable {
    pub fn is_proxy(&self) -> bool {
        self.implied.is_some()
    }
}

/// Alias to table mapping established once per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBinding {
    /// Alias used in the query; the table name when none was given.
    pub alias: String,
    pub table: ResolvedTable,
}

impl TableBinding {
    /// Check whether a qualifier (`alias.field`) refers to this binding.
    pub fn accepts_qualifier(&self, qualifier: &str) -> bool {
        qualifier == self.alias || qualifier == self.table.name
    }
}
