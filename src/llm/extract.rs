//! SQL extraction from free-form LLM output.
//!
//! Model output has no guaranteed structure, so extraction is a chain of
//! strategies tried in order. The first one that yields a statement wins; if
//! none does, the whole trimmed text is returned and the caller finds out at
//! execution time.

use std::fmt;

const SQL_FENCE: &str = "```SQL";
const FENCE: &str = "```";
const SELECT: &str = "SELECT";

/// Which strategy produced a candidate statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Payload of a ```sql fenced block
    FencedBlock,
    /// From the first SELECT keyword to the next `;` (or end of text)
    KeywordScan,
    /// Nothing recognizable; the trimmed input as-is
    RawText,
}

impl ExtractionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FencedBlock => "fenced_block",
            Self::KeywordScan => "keyword_scan",
            Self::RawText => "raw_text",
        }
    }
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL text derived from model output. Not guaranteed to be valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateStatement {
    pub sql: String,
    pub source: ExtractionSource,
}

impl CandidateStatement {
    /// `true` when no SQL shape was found in the output.
    pub fn is_ambiguous(&self) -> bool {
        self.source == ExtractionSource::RawText
    }
}

type Strategy = fn(&str) -> Option<String>;

const STRATEGIES: &[(ExtractionSource, Strategy)] = &[
    (ExtractionSource::FencedBlock, fenced_block),
    (ExtractionSource::KeywordScan, keyword_scan),
];

/// Extract a candidate statement from raw model output. Never fails.
///
/// # Examples
///
/// ```
/// use db_chat::llm::{extract, ExtractionSource};
///
/// let candidate = extract("Here you go: SELECT * FROM employees; thanks");
/// assert_eq!(candidate.sql, "SELECT * FROM employees;");
/// assert_eq!(candidate.source, ExtractionSource::KeywordScan);
/// ```
pub fn extract(raw: &str) -> CandidateStatement {
    STRATEGIES
        .iter()
        .find_map(|(source, strategy)| {
            strategy(raw).map(|sql| CandidateStatement { sql, source: *source })
        })
        .unwrap_or_else(|| CandidateStatement {
            sql: raw.trim().to_string(),
            source: ExtractionSource::RawText,
        })
}

/// Content between the first ```sql tag and the next closing fence.
///
/// The tag is matched case-insensitively, so ```SQL and ```Sql also open a
/// block, unlike a lowercase-only ```sql check. A missing
/// closing fence or an empty payload is not a match.
fn fenced_block(raw: &str) -> Option<String> {
    // ASCII upper-casing keeps byte offsets aligned with `raw`
    let open = raw.to_ascii_uppercase().find(SQL_FENCE)?;
    let body = &raw[open + SQL_FENCE.len()..];
    let close = body.find(FENCE)?;
    let sql = body[..close].trim();
    (!sql.is_empty()).then(|| sql.to_string())
}

/// From the first case-insensitive SELECT through the next `;` inclusive,
/// or to the end of the text when there is no terminator.
fn keyword_scan(raw: &str) -> Option<String> {
    let start = raw.to_ascii_uppercase().find(SELECT)?;
    let tail = &raw[start..];
    let sql = match tail.find(';') {
        Some(end) => &tail[..=end],
        None => tail,
    };
    Some(sql.trim().to_string())
}
