//! Query execution engine for gitql.
//!
//! A SELECT is validated into a [`QueryPlan`], the table name picks a walk,
//! and the pipeline pulls entities one at a time: evaluate the filter against
//! a fresh [`EvalContext`], project accepted entities into rows, stop at the
//! limit, then order.

mod context;
mod dispatch;
mod error;
mod eval;
mod executor;
mod extract;
mod order;
mod pipeline;
mod result;

pub use context::EvalContext;
pub use dispatch::{compose_filter, Walk, WalkStrategy};
pub use error::{ExecuteError, ExecuteResult};
pub use eval::{compare_scalars, evaluate, matches};
pub use executor::{QueryExecutor, DEFAULT_LIMIT};
pub use extract::{Entity, NULL_HASH};
pub use order::{order, order_by_key};
pub use pipeline::{run, QueryPlan};
pub use result::{ResultSet, Row};
