//! Slow query log reader.

use crate::types::{ChatError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static QUERY_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#\s*Query_time:\s*([0-9]+(?:\.[0-9]+)?)").expect("static regex")
});

/// Contents of the slow query log plus a small summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SlowQueryLog {
    pub path: PathBuf,
    pub contents: String,
    /// Number of `# Query_time:` headers
    pub entries: usize,
    /// Longest recorded query time in seconds
    pub max_query_time: Option<f64>,
}

impl SlowQueryLog {
    pub fn parse(path: impl Into<PathBuf>, contents: String) -> Self {
        let times: Vec<f64> = QUERY_TIME
            .captures_iter(&contents)
            .filter_map(|c| c.get(1)?.as_str().parse().ok())
            .collect();
        Self {
            path: path.into(),
            entries: times.len(),
            max_query_time: times.iter().copied().reduce(f64::max),
            contents,
        }
    }

    /// Panel title, e.g. `SLOW QUERY LOG (3 entries, max 12.50s)`.
    pub fn title(&self) -> String {
        match self.max_query_time {
            Some(max) => format!("SLOW QUERY LOG ({} entries, max {:.2}s)", self.entries, max),
            None => "SLOW QUERY LOG".to_string(),
        }
    }
}

/// Read the whole slow log.
///
/// # Errors
///
/// Returns `ChatError::DiagnosticUnavailable` if the file does not exist or
/// cannot be read
pub async fn read_slow_log(path: &Path) -> Result<SlowQueryLog> {
    if !path.exists() {
        return Err(ChatError::diagnostic(format!(
            "Slow query log not found at: {}",
            path.display()
        )));
    }
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        ChatError::diagnostic(format!("Cannot read slow query log {}: {}", path.display(), e))
    })?;
    Ok(SlowQueryLog::parse(path, contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
/usr/sbin/mysqld, Version: 8.0.36. started with:
# Time: 2024-03-01T10:00:00.000000Z
# User@Host: root[root] @ localhost []  Id:     8
# Query_time: 2.500123  Lock_time: 0.000010 Rows_sent: 1  Rows_examined: 300024
SET timestamp=1709287200;
SELECT * FROM employees ORDER BY salary DESC LIMIT 1;
# Time: 2024-03-01T10:05:00.000000Z
# Query_time: 12.5  Lock_time: 0.000011 Rows_sent: 10  Rows_examined: 900000
SELECT * FROM employees WHERE hire_date > '2020-01-01';
";

    #[test]
    fn test_summary() {
        let log = SlowQueryLog::parse("/tmp/slow.log", SAMPLE.to_string());
        assert_eq!(log.entries, 2);
        assert_eq!(log.max_query_time, Some(12.5));
        assert_eq!(log.title(), "SLOW QUERY LOG (2 entries, max 12.50s)");
    }

    #[test]
    fn test_empty_log() {
        let log = SlowQueryLog::parse("/tmp/slow.log", String::new());
        assert_eq!(log.entries, 0);
        assert_eq!(log.max_query_time, None);
        assert_eq!(log.title(), "SLOW QUERY LOG");
    }

    #[tokio::test]
    async fn test_read_existing_log() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let log = read_slow_log(file.path()).await.unwrap();
        assert_eq!(log.contents, SAMPLE);
        assert_eq!(log.entries, 2);
    }

    #[tokio::test]
    async fn test_missing_log_is_diagnostic_unavailable() {
        let err = read_slow_log(Path::new("/nonexistent/mysql-slow.log")).await.unwrap_err();
        assert!(matches!(err, ChatError::DiagnosticUnavailable(_)));
        assert!(err.to_string().contains("/nonexistent/mysql-slow.log"));
    }
}
