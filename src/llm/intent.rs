//! Utterance routing.
//!
//! Every utterance maps to exactly one [`Intent`]. Rules are checked in order
//! against the trimmed, lower-cased text and the first match wins; anything
//! that mentions a data keyword but nothing more specific is a data query.

use crate::predicate::{first_match, TextPredicate};
use std::fmt;

/// Keywords that mark an utterance as being about the employee data.
///
/// Substring semantics: "records" and "databases" count. "update" is not in
/// the list, so update-style requests route to general knowledge.
pub const DATA_KEYWORDS: &[&str] = &[
    "select",
    "employee",
    "salary",
    "table",
    "database",
    "record",
    "from",
    "where",
    "hire_date",
    "department",
];

/// Handling mode for one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Show the server's slow query log
    SlowQueryDiagnostics,
    /// List indexes of the configured schema
    IndexDiagnostics,
    /// Host and server counters
    PerformanceDiagnostics,
    /// Free-form question answered by the LLM
    GeneralKnowledge,
    /// Natural language to SQL pipeline
    DataQuery,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SlowQueryDiagnostics => "slow_query_diagnostics",
            Self::IndexDiagnostics => "index_diagnostics",
            Self::PerformanceDiagnostics => "performance_diagnostics",
            Self::GeneralKnowledge => "general_knowledge",
            Self::DataQuery => "data_query",
        }
    }

    /// `true` for the modes that never call the LLM.
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            Self::SlowQueryDiagnostics | Self::IndexDiagnostics | Self::PerformanceDiagnostics
        )
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ROUTES: &[(TextPredicate, Intent)] = &[
    (TextPredicate::All(&["slow", "query"]), Intent::SlowQueryDiagnostics),
    (TextPredicate::Any(&["index"]), Intent::IndexDiagnostics),
    (TextPredicate::Any(&["performance", "system"]), Intent::PerformanceDiagnostics),
    (TextPredicate::None(DATA_KEYWORDS), Intent::GeneralKnowledge),
];

/// Classify an utterance.
///
/// Pure and total: the text is normalized here, so callers may pass raw input.
///
/// # Examples
///
/// ```
/// use db_chat::llm::{classify, Intent};
///
/// assert_eq!(classify("slow query and index"), Intent::SlowQueryDiagnostics);
/// assert_eq!(classify("check index usage"), Intent::IndexDiagnostics);
/// assert_eq!(classify("What is Rust?"), Intent::GeneralKnowledge);
/// assert_eq!(classify("employees hired in 2020"), Intent::DataQuery);
/// ```
pub fn classify(text: &str) -> Intent {
    let normalized = text.trim().to_lowercase();
    first_match(ROUTES, &normalized).unwrap_or(Intent::DataQuery)
}
