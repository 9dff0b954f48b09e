//! Per-entity evaluation context.

use serde_json::Value;

use super::error::{ExecuteError, ExecuteResult};
use super::extract::Entity;
use crate::catalog::{Catalog, TableBinding};
use crate::sql::ColumnRef;

/// The entity currently under test, together with the query's table binding.
///
/// Built for one pipeline step and dropped before the next entity is pulled.
pub struct EvalContext<'a> {
    catalog: &'a Catalog,
    binding: &'a TableBinding,
    entity: &'a Entity,
}

impl<'a> EvalContext<'a> {
    pub fn new(catalog: &'a Catalog, binding: &'a TableBinding, entity: &'a Entity) -> Self {
        Self {
            catalog,
            binding,
            entity,
        }
    }

    pub fn entity(&self) -> &Entity {
        self.entity
    }

    /// Extract a field for a result row.
    pub fn field(&self, column: &ColumnRef) -> ExecuteResult<String> {
        check_column(self.catalog, self.binding, column)?;
        self.entity.extract(&column.name)
    }

    /// Extract a field for predicate evaluation.
    pub fn value(&self, column: &ColumnRef) -> ExecuteResult<Value> {
        check_column(self.catalog, self.binding, column)?;
        self.entity.value(&column.name)
    }
}

/// Check a column reference against the bound table: the qualifier, if any,
/// must name the binding, and the field must exist on the queried table.
pub fn check_column(catalog: &Catalog, binding: &TableBinding, column: &ColumnRef) -> ExecuteResult<()> {
    if let Some(qualifier) = &column.qualifier {
        if !binding.accepts_qualifier(qualifier) {
            return Err(ExecuteError::UnknownQualifier {
                qualifier: qualifier.clone(),
                alias: binding.alias.clone(),
            });
        }
    }
    catalog.validate_field(&column.name, binding.table.name)?;
    Ok(())
}
