//! Data store collaborator.
//!
//! A synchronous request/response interface: one SQL string in, columns and
//! rows out. Implementations open a connection per statement and fetch all
//! rows eagerly.

pub mod mysql;

pub use mysql::MySqlStore;

use crate::types::{Result, ResultSet};
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync {
    /// Schema name, used for spans and introspection queries.
    fn namespace(&self) -> &str;

    /// Run one statement against the configured schema.
    async fn query(&self, sql: &str) -> Result<ResultSet>;

    /// Run one statement on a connection with no default schema
    /// (server-wide status queries).
    async fn query_global(&self, sql: &str) -> Result<ResultSet> {
        self.query(sql).await
    }
}
