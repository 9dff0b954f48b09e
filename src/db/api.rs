//! Database API - high-level interface for gitql.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::catalog::TableSchema;
use crate::executor::{ExecuteError, QueryExecutor, ResultSet, DEFAULT_LIMIT};
use crate::sql::{ParseError, Parser, Statement};
use crate::storage::{GitRepository, StorageError};

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("execution error: {0}")]
    Execute(#[from] ExecuteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database configuration options.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path inside the repository to query.
    pub path: PathBuf,
    /// Row limit for queries without a LIMIT clause.
    pub default_limit: usize,
    /// Log each query and its row count.
    pub verbose: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            default_limit: DEFAULT_LIMIT,
            verbose: false,
        }
    }
}

impl DatabaseConfig {
    /// Create a new configuration with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set the default row limit.
    pub fn default_limit(mut self, value: usize) -> Self {
        self.default_limit = value;
        self
    }

    /// Set verbose flag.
    pub fn verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }
}

/// The main database handle: one repository and the engine that queries it.
pub struct Database {
    config: DatabaseConfig,
    executor: QueryExecutor,
}

impl Database {
    /// Open the repository containing `path`.
    pub fn open(path: impl AsRef<Path>) -> DatabaseResult<Self> {
        Self::open_with_config(DatabaseConfig::new(path.as_ref()))
    }

    /// Open a repository with custom configuration.
    pub fn open_with_config(config: DatabaseConfig) -> DatabaseResult<Self> {
        let repo = GitRepository::open(&config.path)?;
        let executor = QueryExecutor::new(repo).with_default_limit(config.default_limit);
        Ok(Self { config, executor })
    }

    /// Execute a query string.
    pub fn execute(&self, sql: &str) -> DatabaseResult<ResultSet> {
        if self.config.verbose {
            info!(%sql, "executing query");
        }

        let result = self.executor.execute(sql)?;

        if self.config.verbose {
            info!(rows = result.len(), "query finished");
        }
        Ok(result)
    }

    /// Execute several statements separated by semicolons.
    pub fn execute_batch(&self, sql: &str) -> DatabaseResult<Vec<ResultSet>> {
        sql.split(';')
            .map(str::trim)
            .filter(|stmt| !stmt.is_empty())
            .map(|stmt| self.execute(stmt))
            .collect()
    }

    /// Parse a statement without executing it.
    pub fn parse(&self, sql: &str) -> DatabaseResult<Statement> {
        Ok(Parser::parse(sql)?)
    }

    /// List all tables.
    pub fn tables(&self) -> Vec<&'static str> {
        self.executor.catalog().list_tables()
    }

    /// Check if a table exists.
    pub fn table_exists(&self, name: &str) -> bool {
        self.executor.catalog().table_exists(name)
    }

    /// Get the schema for a table.
    pub fn table_schema(&self, name: &str) -> Option<&TableSchema> {
        self.executor.catalog().get_table(name).ok()
    }

    /// Get the repository work tree path.
    pub fn path(&self) -> &Path {
        self.executor.repository().path()
    }

    /// Get the configuration.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }
}
