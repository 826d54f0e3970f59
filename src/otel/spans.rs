//! Span constructors for model calls, store statements and turns.

use tracing::field::Empty;
use tracing::{info_span, Span};
use uuid::Uuid;

/// Create database query span.
///
/// # Arguments
///
/// * `query_text` - Statement as sent to the server
/// * `namespace` - Schema name
///
/// # Example
///
/// ```rust,ignore
/// let span = db_query_span("SELECT * FROM employees", "company_db");
/// store.query(sql).instrument(span).await
/// ```
pub fn db_query_span(query_text: &str, namespace: &str) -> Span {
    info_span!(
        "db.query",
        otel.kind = "client",
        db.system.name = "mysql",
        db.operation.name = %operation_name(query_text),
        db.namespace = namespace,
        db.query.text = query_text,
        db.response.returned_rows = Empty,
    )
}

/// Record the returned row count on the current `db.query` span.
pub fn record_db_metrics(rows_returned: usize) {
    Span::current().record("db.response.returned_rows", rows_returned);
}

/// Create span around one model call.
pub fn llm_span(backend: &str, prompt_chars: usize) -> Span {
    info_span!(
        "llm.generate",
        otel.kind = "client",
        llm.backend = backend,
        llm.prompt.chars = prompt_chars,
    )
}

/// Create span for one interactive turn with a fresh id.
///
/// The `intent` field is recorded once routing has run.
pub fn turn_span() -> Span {
    info_span!("turn", turn.id = %Uuid::new_v4(), intent = Empty)
}

/// First keyword of the statement, upper-cased (`SELECT`, `EXPLAIN`, ...).
fn operation_name(query_text: &str) -> String {
    query_text
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase()
}
