//! Query parsing and AST types for gitql.
//!
//! Uses `sqlparser` crate for parsing, then converts to our internal AST
//! representation. Only read-only, single-table queries are accepted.

mod ast;
mod error;
mod parser;

pub use ast::*;
pub use error::{ParseError, ParseResult};
pub use parser::Parser;
