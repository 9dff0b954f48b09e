//! Query parser implementation.
//!
//! Converts query strings to our internal AST using sqlparser.

use sqlparser::ast as sp;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser as SqlParser;

use super::ast::*;
use super::error::{ParseError, ParseResult};

/// Query parser for gitql.
pub struct Parser;

impl Parser {
    /// Parse a query string into a statement.
    pub fn parse(sql: &str) -> ParseResult<Statement> {
        let sql = sql.trim().trim_end_matches(';').trim_end();
        if sql.is_empty() {
            return Err(ParseError::EmptyQuery);
        }

        // Handle special commands not supported by sqlparser
        let upper = sql.to_uppercase();
        if upper == "SHOW TABLES" {
            return Ok(Statement::ShowTables);
        }
        if upper.starts_with("DESCRIBE ") || upper.starts_with("DESC ") {
            let table = sql
                .split_whitespace()
                .nth(1)
                .ok_or_else(|| ParseError::MissingClause("table name".into()))?;
            return Ok(Statement::Describe(table.to_string()));
        }

        let dialect = GenericDialect {};
        let statements = SqlParser::parse_sql(&dialect, sql)?;

        if statements.is_empty() {
            return Err(ParseError::EmptyQuery);
        }
        if statements.len() > 1 {
            return Err(ParseError::MultipleStatements);
        }

        Self::convert_statement(&statements[0])
    }

    fn convert_statement(stmt: &sp::Statement) -> ParseResult<Statement> {
        match stmt {
            sp::Statement::Query(query) => Self::convert_query(query),
            other => Err(ParseError::UnsupportedStatement(other.to_string())),
        }
    }

    fn convert_query(query: &sp::Query) -> ParseResult<Statement> {
        let select = match query.body.as_ref() {
            sp::SetExpr::Select(s) => s,
            other => {
                return Err(ParseError::UnsupportedStatement(format!(
                    "Unsupported query type: {}",
                    other
                )))
            }
        };

        Self::reject_unsupported_clauses(query, select)?;

        // FROM clause
        if select.from.len() != 1 {
            return Err(ParseError::UnsupportedStatement(
                "Exactly one table in FROM required".into(),
            ));
        }
        let (table, alias) = Self::extract_from_table(&select.from[0])?;

        // SELECT fields
        let projection = Self::convert_projection(&select.projection)?;

        // WHERE clause
        let where_clause = select
            .selection
            .as_ref()
            .map(Self::convert_expr)
            .transpose()?;

        // ORDER BY
        let order_by = match &query.order_by {
            Some(ob) => Self::extract_order_by(ob)?,
            None => None,
        };

        // LIMIT
        let limit = query.limit.as_ref().map(Self::expr_to_usize).transpose()?;

        if query.offset.is_some() {
            return Err(ParseError::UnsupportedStatement("OFFSET".into()));
        }

        Ok(Statement::Select(Select {
            projection,
            table,
            alias,
            where_clause,
            order_by,
            limit,
        }))
    }

    /// Clauses the engine cannot honour are errors rather than silently dropped.
    fn reject_unsupported_clauses(query: &sp::Query, select: &sp::Select) -> ParseResult<()> {
        let group_by_empty = matches!(
            &select.group_by,
            sp::GroupByExpr::Expressions(exprs, modifiers)
                if exprs.is_empty() && modifiers.is_empty()
        );

        let clause = if query.with.is_some() {
            Some("WITH")
        } else if select.distinct.is_some() {
            Some("DISTINCT")
        } else if select.top.is_some() {
            Some("TOP")
        } else if select.into.is_some() {
            Some("SELECT INTO")
        } else if !group_by_empty {
            Some("GROUP BY")
        } else if select.having.is_some() {
            Some("HAVING")
        } else if select.qualify.is_some() {
            Some("QUALIFY")
        } else {
            None
        };

        match clause {
            Some(c) => Err(ParseError::UnsupportedStatement(c.into())),
            None => Ok(()),
        }
    }

    fn convert_projection(items: &[sp::SelectItem]) -> ParseResult<Projection> {
        if let [sp::SelectItem::Wildcard(_)] = items {
            return Ok(Projection::Wildcard);
        }

        items
            .iter()
            .map(|item| match item {
                sp::SelectItem::UnnamedExpr(expr) => Self::convert_column_ref(expr),
                sp::SelectItem::Wildcard(_) => Err(ParseError::UnsupportedExpression(
                    "wildcard mixed with fields".into(),
                )),
                other => Err(ParseError::UnsupportedExpression(other.to_string())),
            })
            .collect::<ParseResult<Vec<_>>>()
            .map(Projection::Fields)
    }

    fn convert_column_ref(expr: &sp::Expr) -> ParseResult<ColumnRef> {
        match expr {
            sp::Expr::Identifier(id) => Ok(ColumnRef::new(id.value.clone())),
            sp::Expr::CompoundIdentifier(parts) => match parts.as_slice() {
                [qualifier, name] => Ok(ColumnRef::qualified(
                    qualifier.value.clone(),
                    name.value.clone(),
                )),
                _ => Err(ParseError::InvalidIdentifier(expr.to_string())),
            },
            other => Err(ParseError::UnsupportedExpression(format!(
                "expected a field name, found {}",
                other
            ))),
        }
    }

    fn extract_order_by(ob: &sp::OrderBy) -> ParseResult<Option<OrderBy>> {
        let exprs = match &ob.kind {
            sp::OrderByKind::All(_) => {
                return Err(ParseError::UnsupportedExpression("ORDER BY ALL".into()))
            }
            sp::OrderByKind::Expressions(exprs) => exprs,
        };

        match exprs.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(OrderBy {
                column: Self::convert_column_ref(&single.expr)?,
                ascending: single.options.asc.unwrap_or(true),
            })),
            _ => Err(ParseError::UnsupportedExpression(
                "ORDER BY supports a single field".into(),
            )),
        }
    }

    fn convert_expr(expr: &sp::Expr) -> ParseResult<Expr> {
        match expr {
            // "tag" is a string in filters, as in most git query front ends
            sp::Expr::Identifier(id) if id.quote_style == Some('"') => {
                Ok(Expr::Literal(LiteralValue::String(id.value.clone())))
            }

            sp::Expr::Identifier(_) | sp::Expr::CompoundIdentifier(_) => {
                Ok(Expr::Column(Self::convert_column_ref(expr)?))
            }

            sp::Expr::Value(v) => Ok(Expr::Literal(Self::convert_value(v)?)),

            sp::Expr::BinaryOp { left, op, right } => {
                let l = Self::convert_expr(left)?;
                let r = Self::convert_expr(right)?;
                let o = Self::convert_binary_op(op)?;
                Ok(Expr::BinaryOp {
                    left: Box::new(l),
                    op: o,
                    right: Box::new(r),
                })
            }

            sp::Expr::UnaryOp { op, expr } => {
                let e = Self::convert_expr(expr)?;
                let o = Self::convert_unary_op(op)?;
                Ok(Expr::UnaryOp {
                    op: o,
                    expr: Box::new(e),
                })
            }

            sp::Expr::IsNull(e) => Ok(Expr::IsNull {
                expr: Box::new(Self::convert_expr(e)?),
                negated: false,
            }),

            sp::Expr::IsNotNull(e) => Ok(Expr::IsNull {
                expr: Box::new(Self::convert_expr(e)?),
                negated: true,
            }),

            sp::Expr::InList { expr, list, negated } => {
                let e = Self::convert_expr(expr)?;
                let items = list
                    .iter()
                    .map(Self::convert_expr)
                    .collect::<ParseResult<Vec<_>>>()?;
                Ok(Expr::InList {
                    expr: Box::new(e),
                    list: items,
                    negated: *negated,
                })
            }

            sp::Expr::Between { expr, low, high, negated } => Ok(Expr::Between {
                expr: Box::new(Self::convert_expr(expr)?),
                low: Box::new(Self::convert_expr(low)?),
                high: Box::new(Self::convert_expr(high)?),
                negated: *negated,
            }),

            sp::Expr::Like { expr, pattern, negated, .. } => Ok(Expr::Like {
                expr: Box::new(Self::convert_expr(expr)?),
                pattern: Self::extract_string_from_expr(pattern)?,
                negated: *negated,
            }),

            sp::Expr::Function(f) => {
                let name = f.name.to_string();
                let args = match &f.args {
                    sp::FunctionArguments::List(list) => list
                        .args
                        .iter()
                        .map(|arg| match arg {
                            sp::FunctionArg::Unnamed(sp::FunctionArgExpr::Expr(e)) => {
                                Self::convert_expr(e)
                            }
                            other => Err(ParseError::UnsupportedExpression(other.to_string())),
                        })
                        .collect::<ParseResult<Vec<_>>>()?,
                    _ => vec![],
                };
                Ok(Expr::Function { name, args })
            }

            sp::Expr::Nested(inner) => Ok(Expr::Nested(Box::new(Self::convert_expr(inner)?))),

            other => Err(ParseError::UnsupportedExpression(other.to_string())),
        }
    }

    fn convert_value(v: &sp::ValueWithSpan) -> ParseResult<LiteralValue> {
        match &v.value {
            sp::Value::Null => Ok(LiteralValue::Null),
            sp::Value::Boolean(b) => Ok(LiteralValue::Boolean(*b)),
            sp::Value::Number(s, _) => {
                if let Ok(i) = s.parse::<i64>() {
                    Ok(LiteralValue::Integer(i))
                } else if let Ok(f) = s.parse::<f64>() {
                    Ok(LiteralValue::Float(f))
                } else {
                    Err(ParseError::UnsupportedExpression(format!("Invalid number: {}", s)))
                }
            }
            sp::Value::SingleQuotedString(s) => Ok(LiteralValue::String(s.clone())),
            sp::Value::DoubleQuotedString(s) => Ok(LiteralValue::String(s.clone())),
            other => Err(ParseError::UnsupportedExpression(format!(
                "Unsupported value: {}",
                other
            ))),
        }
    }

    fn extract_string_from_expr(expr: &sp::Expr) -> ParseResult<String> {
        match expr {
            sp::Expr::Value(v) => match &v.value {
                sp::Value::SingleQuotedString(s) => Ok(s.clone()),
                sp::Value::DoubleQuotedString(s) => Ok(s.clone()),
                _ => Err(ParseError::UnsupportedExpression("expected string".into())),
            },
            sp::Expr::Identifier(id) if id.quote_style == Some('"') => Ok(id.value.clone()),
            _ => Err(ParseError::UnsupportedExpression("expected string literal".into())),
        }
    }

    fn convert_binary_op(op: &sp::BinaryOperator) -> ParseResult<BinaryOperator> {
        match op {
            sp::BinaryOperator::Eq => Ok(BinaryOperator::Eq),
            sp::BinaryOperator::NotEq => Ok(BinaryOperator::NotEq),
            sp::BinaryOperator::Lt => Ok(BinaryOperator::Lt),
            sp::BinaryOperator::LtEq => Ok(BinaryOperator::LtEq),
            sp::BinaryOperator::Gt => Ok(BinaryOperator::Gt),
            sp::BinaryOperator::GtEq => Ok(BinaryOperator::GtEq),
            sp::BinaryOperator::And => Ok(BinaryOperator::And),
            sp::BinaryOperator::Or => Ok(BinaryOperator::Or),
            other => Err(ParseError::UnsupportedExpression(format!(
                "Unsupported operator: {}",
                other
            ))),
        }
    }

    fn convert_unary_op(op: &sp::UnaryOperator) -> ParseResult<UnaryOperator> {
        match op {
            sp::UnaryOperator::Not => Ok(UnaryOperator::Not),
            sp::UnaryOperator::Minus => Ok(UnaryOperator::Minus),
            sp::UnaryOperator::Plus => Ok(UnaryOperator::Plus),
            other => Err(ParseError::UnsupportedExpression(format!(
                "Unsupported unary operator: {}",
                other
            ))),
        }
    }

    fn extract_table_name(name: &sp::ObjectName) -> ParseResult<String> {
        // Use just the table name, ignoring schema
        name.0
            .last()
            .map(|i| i.as_ident().map(|id| id.value.clone()).unwrap_or_else(|| i.to_string()))
            .ok_or_else(|| ParseError::InvalidIdentifier("empty table name".into()))
    }

    fn extract_from_table(from: &sp::TableWithJoins) -> ParseResult<(String, Option<String>)> {
        if !from.joins.is_empty() {
            return Err(ParseError::UnsupportedStatement("JOIN".into()));
        }
        match &from.relation {
            sp::TableFactor::Table { name, alias, .. } => Ok((
                Self::extract_table_name(name)?,
                alias.as_ref().map(|a| a.name.value.clone()),
            )),
            other => Err(ParseError::UnsupportedStatement(format!(
                "Unsupported FROM clause: {}",
                other
            ))),
        }
    }

    fn expr_to_usize(expr: &sp::Expr) -> ParseResult<usize> {
        match expr {
            sp::Expr::Value(v) => match &v.value {
                sp::Value::Number(s, _) => s
                    .parse()
                    .map_err(|_| ParseError::InvalidLimit(s.clone())),
                other => Err(ParseError::InvalidLimit(other.to_string())),
            },
            other => Err(ParseError::InvalidLimit(other.to_string())),
        }
    }
}
