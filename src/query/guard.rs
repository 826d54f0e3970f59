//! Statement classification for read-only sessions.

use sqlparser::ast::Statement;
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use std::fmt;

/// Coarse kind of a candidate statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// SELECT / WITH ... SELECT
    Query,
    /// INSERT, UPDATE, DELETE
    Mutation,
    /// CREATE, ALTER, DROP, TRUNCATE
    Definition,
    /// Parsed, but none of the above (SHOW, SET, ...)
    Other,
    /// Not parseable as MySQL
    Unparseable,
}

impl StatementKind {
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Query)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Definition => "definition",
            Self::Other => "other",
            Self::Unparseable => "unparseable",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn kind_of(statement: &Statement) -> StatementKind {
    match statement {
        Statement::Query(_) => StatementKind::Query,
        Statement::Insert(_) | Statement::Update { .. } | Statement::Delete(_) => {
            StatementKind::Mutation
        }
        Statement::CreateTable(_)
        | Statement::CreateIndex(_)
        | Statement::AlterTable { .. }
        | Statement::Drop { .. }
        | Statement::Truncate { .. } => StatementKind::Definition,
        _ => StatementKind::Other,
    }
}

fn parse(sql: &str) -> Option<Vec<Statement>> {
    Parser::parse_sql(&MySqlDialect {}, sql)
        .ok()
        .filter(|statements| !statements.is_empty())
}

/// Number of statements in `sql`, or `None` when it does not parse.
///
/// # Examples
///
/// ```
/// use db_chat::query::statement_count;
///
/// assert_eq!(statement_count("SELECT 1; DELETE FROM employees;"), Some(2));
/// assert_eq!(statement_count("not sql at all"), None);
/// ```
pub fn statement_count(sql: &str) -> Option<usize> {
    parse(sql).map(|statements| statements.len())
}

/// Classify SQL text. Multi-statement input takes the least permissive kind.
pub fn classify_statement(sql: &str) -> StatementKind {
    let Some(statements) = parse(sql) else {
        return StatementKind::Unparseable;
    };

    statements
        .iter()
        .map(kind_of)
        .find(|kind| !kind.is_read_only())
        .unwrap_or(StatementKind::Query)
}
