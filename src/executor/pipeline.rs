//! The row pipeline: filter, project and accumulate entities until the limit.

use tracing::{debug, trace};

use super::context::{check_column, EvalContext};
use super::dispatch::compose_filter;
use super::error::ExecuteResult;
use super::eval::matches;
use super::extract::Entity;
use super::order::order_by_key;
use super::result::{ResultSet, Row};
use crate::catalog::{Catalog, TableBinding};
use crate::sql::{ColumnRef, Expr, OrderBy, Projection, Select};
use crate::storage::StorageResult;

/// A validated SELECT, ready to run against an entity stream.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub binding: TableBinding,
    /// Projected fields; the wildcard is expanded to the table's fields.
    pub columns: Vec<ColumnRef>,
    /// User filter conjoined with the proxy filter, if any.
    pub filter: Option<Expr>,
    pub order: Option<OrderBy>,
    pub limit: usize,
}

impl QueryPlan {
    /// Bind the table and validate every field the query names.
    pub fn build(catalog: &Catalog, select: &Select, default_limit: usize) -> ExecuteResult<Self> {
        let binding = catalog.bind(&select.table, select.alias.as_deref())?;

        let columns = match &select.projection {
            Projection::Wildcard => catalog
                .fields_of(binding.table.name)?
                .iter()
                .map(|f| ColumnRef::new(*f))
                .collect(),
            Projection::Fields(fields) => fields.clone(),
        };
        for column in &columns {
            check_column(catalog, &binding, column)?;
        }
        if let Some(filter) = &select.where_clause {
            for column in filter.columns() {
                check_column(catalog, &binding, column)?;
            }
        }
        if let Some(order) = &select.order_by {
            check_column(catalog, &binding, &order.column)?;
        }

        let filter = compose_filter(&binding.table, select.where_clause.as_ref());

        Ok(Self {
            binding,
            columns,
            filter,
            order: select.order_by.clone(),
            limit: select.limit.unwrap_or(default_limit),
        })
    }

    /// Result column names, in projection order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

struct Accepted {
    /// Value of the ORDER BY field, extracted even when not projected.
    key: String,
    row: Row,
}

/// Pull entities until `plan.limit` rows are accepted or the stream ends,
/// then apply the ordering.
pub fn run<I>(plan: &QueryPlan, catalog: &Catalog, entities: I) -> ExecuteResult<ResultSet>
where
    I: IntoIterator<Item = StorageResult<Entity>>,
{
    if plan.limit == 0 {
        return Ok(ResultSet::new(plan.column_names()));
    }

    let mut accepted: Vec<Accepted> = Vec::new();
    let mut pulled = 0usize;
    for entity in entities {
        let entity = entity?;
        pulled += 1;

        let ctx = EvalContext::new(catalog, &plan.binding, &entity);
        if let Some(filter) = &plan.filter {
            if !matches(filter, &ctx)? {
                trace!(kind = %entity.kind(), "entity rejected");
                continue;
            }
        }

        let row = plan
            .columns
            .iter()
            .map(|c| Ok((c.name.clone(), ctx.field(c)?)))
            .collect::<ExecuteResult<Row>>()?;
        let key = match &plan.order {
            Some(order) => ctx.field(&order.column)?,
            None => String::new(),
        };
        trace!(kind = %entity.kind(), "entity accepted");
        accepted.push(Accepted { key, row });

        if accepted.len() >= plan.limit {
            debug!(limit = plan.limit, pulled, "limit reached, walk stopped");
            break;
        }
    }

    if let Some(order) = &plan.order {
        order_by_key(&mut accepted, |a| a.key.as_str(), order.ascending);
    }

    Ok(ResultSet {
        columns: plan.column_names(),
        rows: accepted.into_iter().map(|a| a.row).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;

    use crate::catalog::SchemaError;
    use crate::executor::error::ExecuteError;
    use crate::sql::{Parser, Statement};
    use crate::storage::{ObjectId, ReferenceInfo, ReferenceKind, RemoteInfo, StorageError};

    fn plan(sql: &str) -> ExecuteResult<QueryPlan> {
        match Parser::parse(sql).unwrap() {
            Statement::Select(s) => QueryPlan::build(&Catalog::new(), &s, 10),
            other => panic!("Expected Select, got {:?}", other),
        }
    }

    fn reference(name: &str, kind: ReferenceKind) -> StorageResult<Entity> {
        let prefix = match kind {
            ReferenceKind::Branch => "refs/heads",
            ReferenceKind::Remote => "refs/remotes",
            ReferenceKind::Tag => "refs/tags",
        };
        Ok(Entity::Reference(ReferenceInfo {
            shorthand: name.into(),
            full_name: format!("{}/{}", prefix, name),
            target: Some(ObjectId::from_hex("00000000000000000000000000000000000000aa").unwrap()),
            kind: Some(kind),
        }))
    }

    fn mixed_refs() -> Vec<StorageResult<Entity>> {
        vec![
            reference("main", ReferenceKind::Branch),
            reference("v2", ReferenceKind::Tag),
            reference("origin/main", ReferenceKind::Remote),
            reference("v10", ReferenceKind::Tag),
            reference("dev", ReferenceKind::Branch),
        ]
    }

    #[test]
    fn test_wildcard_expands_declared_fields() {
        let p = plan("SELECT * FROM tags").unwrap();
        assert_eq!(p.column_names(), vec!["name", "full_name", "type", "hash"]);
        assert_eq!(p.limit, 10);
        assert_eq!(p.filter, Some(Expr::column_eq("type", "tag")));
    }

    #[test]
    fn test_plan_rejects_unknown_fields() {
        assert!(matches!(
            plan("SELECT url FROM commits").unwrap_err(),
            ExecuteError::Schema(SchemaError::UnknownField { .. })
        ));
        assert!(matches!(
            plan("SELECT hash FROM commits ORDER BY url").unwrap_err(),
            ExecuteError::Schema(SchemaError::UnknownField { .. })
        ));
        assert!(matches!(
            plan("SELECT * FROM blobs").unwrap_err(),
            ExecuteError::Schema(SchemaError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_unknown_filter_field_fails_on_empty_walk() {
        let catalog = Catalog::new();
        for sql in [
            "SELECT name FROM remotes WHERE nosuch = 'x'",
            "SELECT hash FROM trees WHERE nosuch = 'x'",
            "SELECT name FROM tags WHERE lower(nosuch) LIKE 'v%'",
        ] {
            let err = plan(sql)
                .and_then(|p| run(&p, &catalog, Vec::<StorageResult<Entity>>::new()))
                .unwrap_err();
            assert!(
                matches!(err, ExecuteError::Schema(SchemaError::UnknownField { .. })),
                "{}: {:?}",
                sql,
                err
            );
        }
        assert!(matches!(
            plan("SELECT r.name FROM refs r WHERE x.type = 'tag'").unwrap_err(),
            ExecuteError::UnknownQualifier { .. }
        ));
    }

    #[test]
    fn test_proxy_filter_applies() {
        let p = plan("SELECT name, type FROM tags").unwrap();
        let rs = run(&p, &Catalog::new(), mixed_refs()).unwrap();
        assert_eq!(rs.column("name"), vec!["v2", "v10"]);
        assert!(rs.column("type").iter().all(|t| *t == "tag"));

        let p = plan("SELECT name FROM branches WHERE name <> 'main'").unwrap();
        let rs = run(&p, &Catalog::new(), mixed_refs()).unwrap();
        assert_eq!(rs.column("name"), vec!["dev"]);
    }

    #[test]
    fn test_limit_stops_pulling() {
        let pulled = Cell::new(0);
        let stream = mixed_refs().into_iter().inspect(|_| pulled.set(pulled.get() + 1));

        let p = plan("SELECT name FROM refs LIMIT 2").unwrap();
        let rs = run(&p, &Catalog::new(), stream).unwrap();
        assert_eq!(rs.column("name"), vec!["main", "v2"]);
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn test_zero_limit_pulls_nothing() {
        let pulled = Cell::new(0);
        let stream = mixed_refs().into_iter().inspect(|_| pulled.set(pulled.get() + 1));

        let p = plan("SELECT name FROM refs LIMIT 0").unwrap();
        let rs = run(&p, &Catalog::new(), stream).unwrap();
        assert!(rs.is_empty());
        assert_eq!(rs.columns, vec!["name"]);
        assert_eq!(pulled.get(), 0);
    }

    #[test]
    fn test_order_by_hidden_field() {
        let p = plan("SELECT full_name FROM tags ORDER BY name DESC").unwrap();
        let rs = run(&p, &Catalog::new(), mixed_refs()).unwrap();
        assert_eq!(rs.columns, vec!["full_name"]);
        // "v2" > "v10" as strings
        assert_eq!(rs.column("full_name"), vec!["refs/tags/v2", "refs/tags/v10"]);
        assert!(rs.rows.iter().all(|r| r.get("name").is_none()));
    }

    #[test]
    fn test_ordering_follows_limit() {
        let p = plan("SELECT name FROM refs ORDER BY name LIMIT 3").unwrap();
        let rs = run(&p, &Catalog::new(), mixed_refs()).unwrap();
        assert_eq!(rs.column("name"), vec!["main", "origin/main", "v2"]);
    }

    #[test]
    fn test_remote_load_failure_yields_no_rows() {
        let remote = |name: &str| {
            Ok(Entity::Remote(RemoteInfo {
                name: name.into(),
                url: format!("https://example.com/{}.git", name),
                push_url: String::new(),
                owner: PathBuf::from("/r/.git"),
            }))
        };
        let stream = vec![
            remote("origin"),
            Err(StorageError::RemoteLoad {
                name: "broken".into(),
                source: git2::Error::from_str("corrupt config"),
            }),
            remote("upstream"),
        ];

        let p = plan("SELECT name FROM remotes").unwrap();
        let err = run(&p, &Catalog::new(), stream).unwrap_err();
        assert!(matches!(err, ExecuteError::Storage(ref e) if e.is_remote_failure()));
    }

    #[test]
    fn test_unclassified_reference_is_fatal() {
        let stream = vec![Ok(Entity::Reference(ReferenceInfo {
            shorthand: "notes/commits".into(),
            full_name: "refs/notes/commits".into(),
            target: None,
            kind: None,
        }))];

        let p = plan("SELECT name, type FROM refs").unwrap();
        assert!(matches!(
            run(&p, &Catalog::new(), stream).unwrap_err(),
            ExecuteError::UnclassifiedReference(_)
        ));
    }
}
