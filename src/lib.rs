//! gitql - SQL-shaped queries over git repository metadata
//!
//! Commits, references and remotes are exposed as read-only virtual tables.
//! A query names one table, the fields to project, an optional filter, an
//! optional single-field ordering and a row limit; rows are pulled lazily
//! from the repository and the walk stops as soon as the limit is reached.
//!
//! # Example
//!
//! ```no_run
//! use gitql::db::Database;
//!
//! let db = Database::open(".").unwrap();
//! let rs = db.execute("SELECT hash, message FROM commits LIMIT 2").unwrap();
//! for row in rs.iter() {
//!     println!("{} {}", row.get("hash").unwrap_or(""), row.get("message").unwrap_or(""));
//! }
//! ```

pub mod catalog;
pub mod db;
pub mod executor;
pub mod output;
pub mod sql;
pub mod storage;
