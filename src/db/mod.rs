//! High-level Database API and REPL interface.
//!
//! [`Database`] opens a repository and runs queries against it; [`Repl`]
//! wraps a database in an interactive session.

mod api;
mod repl;

pub use api::{Database, DatabaseConfig, DatabaseError, DatabaseResult};
pub use repl::{Repl, ReplConfig};
