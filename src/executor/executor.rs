//! Main query executor.

use tracing::debug;

use super::dispatch::WalkStrategy;
use super::error::ExecuteResult;
use super::pipeline::{self, QueryPlan};
use super::result::{ResultSet, Row};
use crate::catalog::Catalog;
use crate::sql::{Parser, Select, Statement};
use crate::storage::GitRepository;

/// Row limit applied when a query has no LIMIT clause.
pub const DEFAULT_LIMIT: usize = 10;

/// The query executor.
pub struct QueryExecutor {
    repo: GitRepository,
    catalog: Catalog,
    default_limit: usize,
}

impl QueryExecutor {
    /// Create a new executor.
    pub fn new(repo: GitRepository) -> Self {
        Self {
            repo,
            catalog: Catalog::new(),
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Override the limit used when a query has none.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Execute a query string.
    pub fn execute(&self, sql: &str) -> ExecuteResult<ResultSet> {
        let stmt = Parser::parse(sql)?;
        self.execute_statement(&stmt)
    }

    /// Execute a parsed statement.
    pub fn execute_statement(&self, stmt: &Statement) -> ExecuteResult<ResultSet> {
        match stmt {
            Statement::Select(s) => self.execute_select(s),
            Statement::ShowTables => Ok(self.execute_show_tables()),
            Statement::Describe(table) => self.execute_describe(table),
        }
    }

    fn execute_select(&self, select: &Select) -> ExecuteResult<ResultSet> {
        let plan = QueryPlan::build(&self.catalog, select, self.default_limit)?;
        if plan.limit == 0 {
            debug!(table = %select.table, "limit is zero, skipping walk");
            return Ok(ResultSet::new(plan.column_names()));
        }

        let strategy = WalkStrategy::for_table(&plan.binding.table);
        debug!(
            table = %select.table,
            base = plan.binding.table.base,
            ?strategy,
            limit = plan.limit,
            "dispatching walk"
        );

        self.repo.with_repo(|repo| {
            let walk = strategy.open(repo)?;
            pipeline::run(&plan, &self.catalog, walk)
        })
    }

    fn execute_show_tables(&self) -> ResultSet {
        let mut rs = ResultSet::new(vec!["table".into()]);
        for name in self.catalog.list_tables() {
            rs.push([("table", name)].into_iter().collect());
        }
        rs
    }

    fn execute_describe(&self, table: &str) -> ExecuteResult<ResultSet> {
        let schema = self.catalog.get_table(table)?;
        let base = schema.proxy.map(|p| p.base).unwrap_or("");

        let mut rs = ResultSet::new(vec!["field".into(), "kind".into(), "base".into()]);
        for field in &schema.fields {
            let mut row = Row::new();
            row.push("field", *field);
            row.push("kind", schema.kind.as_str());
            row.push("base", base);
            rs.push(row);
        }
        Ok(rs)
    }

    /// Get the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the repository handle.
    pub fn repository(&self) -> &GitRepository {
        &self.repo
    }
}

impl From<GitRepository> for QueryExecutor {
    fn from(repo: GitRepository) -> Self {
        Self::new(repo)
    }
}
