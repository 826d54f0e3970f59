//! Execution plan lookup through the store's own EXPLAIN facility.

use crate::store::Store;
use crate::types::{Result, ResultSet};
use tracing::debug;

/// Wraps a statement in the plan keyword and runs it.
#[derive(Debug, Clone)]
pub struct PlanInspector {
    keyword: String,
}

impl Default for PlanInspector {
    fn default() -> Self {
        Self::new("EXPLAIN")
    }
}

impl PlanInspector {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self { keyword: keyword.into() }
    }

    /// Plan statement text, with any trailing terminators moved to the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use db_chat::query::PlanInspector;
    ///
    /// let sql = PlanInspector::default().plan_statement(" SELECT * FROM employees;; ");
    /// assert_eq!(sql, "EXPLAIN SELECT * FROM employees;");
    /// ```
    pub fn plan_statement(&self, statement: &str) -> String {
        let body = statement.trim().trim_end_matches(';').trim_end();
        format!("{} {};", self.keyword, body)
    }

    /// Fetch the plan for a statement.
    ///
    /// # Errors
    ///
    /// Whatever the store raises; callers report it and carry on with the turn
    pub async fn get_plan(&self, store: &dyn Store, statement: &str) -> Result<ResultSet> {
        let sql = self.plan_statement(statement);
        debug!(sql = %sql, "requesting plan");
        store.query(&sql).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_statement() {
        let inspector = PlanInspector::default();
        assert_eq!(
            inspector.plan_statement("SELECT * FROM employees ORDER BY salary DESC;"),
            "EXPLAIN SELECT * FROM employees ORDER BY salary DESC;"
        );
        assert_eq!(inspector.plan_statement("SELECT 1"), "EXPLAIN SELECT 1;");
    }

    #[test]
    fn test_custom_keyword() {
        let inspector = PlanInspector::new("EXPLAIN ANALYZE");
        assert_eq!(inspector.plan_statement("SELECT 1 ;"), "EXPLAIN ANALYZE SELECT 1;");
    }
}
