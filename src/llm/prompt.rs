//! Prompt template for SQL generation.

use crate::config::SchemaConfig;

/// Builds the SQL-generation prompt from the configured table description.
#[derive(Debug, Clone)]
pub struct SqlPrompt {
    table: String,
    columns: Vec<String>,
}

impl SqlPrompt {
    pub fn new(schema: &SchemaConfig) -> Self {
        Self {
            table: schema.table.clone(),
            columns: schema.columns.clone(),
        }
    }

    /// Render the prompt for a (spell-corrected) request.
    pub fn render(&self, request: &str) -> String {
        format!(
            "You are querying a MySQL database with an '{table}' table.\n\
             The columns are: {columns}.\n\
             Write a MySQL query for this request: {request}\n\
             Return only the query.",
            table = self.table,
            columns = self.columns.join(", "),
            request = request.trim(),
        )
    }
}
