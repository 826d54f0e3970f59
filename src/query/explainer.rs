//! Rule-based explanation of a generated statement.
//!
//! Two independent first-match chains run over the lower-cased statement: one
//! describes what the result shows, the other suggests an index. Both look only
//! at keyword presence, never at the parsed statement.

use crate::predicate::{first_match, TextPredicate};

/// What the result set represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insight {
    LowestSalary,
    HighestSalary,
    MostRecentlyHired,
    RowLimited,
    Filtered,
    FullTable,
}

const INSIGHT_RULES: &[(TextPredicate, Insight)] = &[
    (TextPredicate::All(&["order by salary", "asc"]), Insight::LowestSalary),
    (TextPredicate::All(&["order by salary", "desc"]), Insight::HighestSalary),
    (TextPredicate::All(&["hire_date", "desc"]), Insight::MostRecentlyHired),
    (TextPredicate::Any(&["limit"]), Insight::RowLimited),
    (TextPredicate::Any(&["where"]), Insight::Filtered),
];

impl Insight {
    /// Human-readable sentence for the insight.
    pub fn describe(&self, table: &str) -> String {
        match self {
            Self::LowestSalary => "This shows employee(s) with the lowest salary.".to_string(),
            Self::HighestSalary => "This shows employee(s) with the highest salary.".to_string(),
            Self::MostRecentlyHired => "This shows most recently hired employees.".to_string(),
            Self::RowLimited => "Query is limited to specific number of rows.".to_string(),
            Self::Filtered => "Filtered result based on specified condition.".to_string(),
            Self::FullTable => format!("General data retrieved from the {} table.", table),
        }
    }
}

/// Performance suggestion keyed off statement shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    IndexSalary,
    IndexHireDate,
    IndexDepartment,
    UseExplain,
}

const ADVICE_RULES: &[(TextPredicate, Advice)] = &[
    (TextPredicate::All(&["salary", "order by"]), Advice::IndexSalary),
    (TextPredicate::Any(&["hire_date"]), Advice::IndexHireDate),
    (TextPredicate::Any(&["department_id"]), Advice::IndexDepartment),
];

impl Advice {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::IndexSalary => "Consider indexing the salary column for better ORDER BY performance.",
            Self::IndexHireDate => "Consider indexing the hire_date column to improve sort speed.",
            Self::IndexDepartment => "Indexing department_id can help with filtering.",
            Self::UseExplain => "Use EXPLAIN to analyze performance and add indexes where needed.",
        }
    }

    /// `(index name, column)` for advice that recommends an index.
    pub fn index(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::IndexSalary => Some(("idx_salary", "salary")),
            Self::IndexHireDate => Some(("idx_hire_date", "hire_date")),
            Self::IndexDepartment => Some(("idx_department", "department_id")),
            Self::UseExplain => None,
        }
    }

    /// Ready-to-run DDL creating the recommended index.
    pub fn suggestion(&self, table: &str) -> Option<String> {
        self.index()
            .map(|(name, column)| format!("ALTER TABLE {} ADD INDEX {} ({});", table, name, column))
    }
}

/// Insight and advice for one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub insight: Insight,
    pub advice: Advice,
    /// Insight sentence
    pub summary: String,
    /// DDL for the advised index, if any
    pub suggestion: Option<String>,
}

/// Explains statements against one table.
#[derive(Debug, Clone)]
pub struct QueryExplainer {
    table: String,
}

impl Default for QueryExplainer {
    fn default() -> Self {
        Self::new("employees")
    }
}

impl QueryExplainer {
    pub fn new(table: impl Into<String>) -> Self {
        Self { table: table.into() }
    }

    pub fn insight(&self, statement: &str) -> Insight {
        first_match(INSIGHT_RULES, &statement.to_lowercase()).unwrap_or(Insight::FullTable)
    }

    pub fn advice(&self, statement: &str) -> Advice {
        first_match(ADVICE_RULES, &statement.to_lowercase()).unwrap_or(Advice::UseExplain)
    }

    /// Run both rule chains.
    ///
    /// # Examples
    ///
    /// ```
    /// use db_chat::query::{Advice, Insight, QueryExplainer};
    ///
    /// let e = QueryExplainer::default()
    ///     .explain("SELECT * FROM employees ORDER BY salary DESC LIMIT 5");
    /// assert_eq!(e.insight, Insight::HighestSalary);
    /// assert_eq!(e.advice, Advice::IndexSalary);
    /// ```
    pub fn explain(&self, statement: &str) -> Explanation {
        let insight = self.insight(statement);
        let advice = self.advice(statement);
        Explanation {
            insight,
            advice,
            summary: insight.describe(&self.table),
            suggestion: advice.suggestion(&self.table),
        }
    }
}
