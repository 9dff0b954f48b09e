//! Internal AST types for gitql queries.
//!
//! These types are simplified representations of SQL statements
//! that the query executor understands.

use std::fmt;

use serde_json::Value;

/// A parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// SELECT statement.
    Select(Select),
    /// SHOW TABLES.
    ShowTables,
    /// DESCRIBE table.
    Describe(String),
}

/// SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub projection: Projection,
    pub table: String,
    pub alias: Option<String>,
    pub where_clause: Option<Expr>,
    pub order_by: Option<OrderBy>,
    /// `None` when the query has no LIMIT clause.
    pub limit: Option<usize>,
}

/// The requested fields of a SELECT.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// SELECT *
    Wildcard,
    /// SELECT a, b, t.c
    Fields(Vec<ColumnRef>),
}

/// A possibly qualified field reference (`name` or `alias.name`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColumnRef {
    /// An unqualified reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    /// A reference qualified by a table name or alias.
    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// ORDER BY clause.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub ascending: bool,
}

/// Filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Field reference.
    Column(ColumnRef),
    /// Literal value.
    Literal(LiteralValue),
    /// Binary operation (e.g., a = b, a AND b).
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    /// Unary operation (e.g., NOT a, -1).
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    /// IS NULL / IS NOT NULL.
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
    /// IN list.
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    /// BETWEEN a AND b.
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
    /// LIKE pattern.
    Like {
        expr: Box<Expr>,
        pattern: String,
        negated: bool,
    },
    /// Function call.
    Function {
        name: String,
        args: Vec<Expr>,
    },
    /// Nested expression in parentheses.
    Nested(Box<Expr>),
}

impl Expr {
    /// `column = 'value'`
    pub fn column_eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Expr::BinaryOp {
            left: Box::new(Expr::Column(ColumnRef::new(column))),
            op: BinaryOperator::Eq,
            right: Box::new(Expr::Literal(LiteralValue::String(value.into()))),
        }
    }

    /// Every field reference in the expression, in source order.
    pub fn columns(&self) -> Vec<&ColumnRef> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Expr::Column(column) => out.push(column),
            Expr::Literal(_) => {}
            Expr::BinaryOp { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Expr::UnaryOp { expr, .. }
            | Expr::IsNull { expr, .. }
            | Expr::Like { expr, .. }
            | Expr::Nested(expr) => expr.collect_columns(out),
            Expr::InList { expr, list, .. } => {
                expr.collect_columns(out);
                list.iter().for_each(|e| e.collect_columns(out));
            }
            Expr::Between { expr, low, high, .. } => {
                expr.collect_columns(out);
                low.collect_columns(out);
                high.collect_columns(out);
            }
            Expr::Function { args, .. } => args.iter().for_each(|e| e.collect_columns(out)),
        }
    }

    /// `self AND other`
    pub fn and(self, other: Expr) -> Self {
        Expr::BinaryOp {
            left: Box::new(self),
            op: BinaryOperator::And,
            right: Box::new(other),
        }
    }
}

/// Literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl LiteralValue {
    /// Convert to a JSON value for evaluation.
    pub fn to_json(&self) -> Value {
        match self {
            LiteralValue::Null => Value::Null,
            LiteralValue::Boolean(b) => Value::Bool(*b),
            LiteralValue::Integer(n) => Value::Number((*n).into()),
            LiteralValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            LiteralValue::String(s) => Value::String(s.clone()),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    // Logical
    And,
    Or,
}

impl BinaryOperator {
    /// Check if this is a comparison operator.
    pub fn is_comparison(&self) -> bool {
        !self.is_logical()
    }

    /// Check if this is a logical operator.
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
    Plus,
}
