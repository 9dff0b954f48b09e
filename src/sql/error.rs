//! Query parsing errors.

use thiserror::Error;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Query parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unsupported statement: {0}")]
    UnsupportedStatement(String),

    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("missing required clause: {0}")]
    MissingClause(String),

    #[error("invalid limit: {0}")]
    InvalidLimit(String),

    #[error("empty query")]
    EmptyQuery,

    #[error("multiple statements not supported")]
    MultipleStatements,
}

impl From<sqlparser::parser::ParserError> for ParseError {
    fn from(e: sqlparser::parser::ParserError) -> Self {
        ParseError::Syntax(e.to_string())
    }
}
