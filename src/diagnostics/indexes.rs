//! Index listing for the configured schema.

use crate::store::Store;
use crate::types::{Result, ResultSet};

/// `information_schema` query listing every indexed column of `schema`.
pub fn index_query(schema: &str) -> String {
    format!(
        "SELECT TABLE_NAME, INDEX_NAME, COLUMN_NAME \
         FROM information_schema.STATISTICS \
         WHERE TABLE_SCHEMA = '{}';",
        schema.replace('\'', "''")
    )
}

/// List indexes of the store's schema.
pub async fn list_indexes(store: &dyn Store) -> Result<ResultSet> {
    store.query(&index_query(store.namespace())).await
}
