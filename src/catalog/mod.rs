//! Catalog module: the schema registry of virtual tables.
//!
//! Declares the queryable tables, their field sets, and the proxy tables
//! (`branches`, `tags`) that are filtered views over `refs`.

mod manager;
mod schema;
mod types;

pub use manager::{Catalog, WILDCARD};
pub use schema::{
    ImpliedFilter, ProxyDef, ResolvedTable, SchemaError, SchemaResult, TableBinding, TableSchema,
};
pub use types::{CommitField, EntityKind, ReferenceField, RemoteField, TreeField};
