//! MySQL store over sqlx.
//!
//! Statements are sent with the text protocol (`raw_sql`) so any statement the
//! model produces, including `EXPLAIN` and `SHOW`, runs as typed, and every
//! value comes back as text regardless of column type.
//!
//! Every statement runs inside a transaction that is rolled back, so changes
//! made by generated SQL are never committed. DDL still commits implicitly on
//! the server side.

use crate::config::StoreConfig;
use crate::otel::{db_query_span, record_db_metrics};
use crate::store::Store;
use crate::types::{Result, ResultSet, Value};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Row, ValueRef};
use tracing::{warn, Instrument};

/// Connection-per-statement MySQL store.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    config: StoreConfig,
}

impl MySqlStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    fn connect_options(&self, with_schema: bool) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.user);
        if !self.config.password.is_empty() {
            options = options.password(&self.config.password);
        }
        if with_schema {
            options = options.database(&self.config.database);
        }
        options
    }

    async fn run(&self, sql: &str, with_schema: bool) -> Result<ResultSet> {
        let span = db_query_span(sql, &self.config.database);
        async {
            let mut conn = MySqlConnection::connect_with(&self.connect_options(with_schema)).await?;
            let fetched = fetch_uncommitted(&mut conn, sql).await;

            if let Err(e) = conn.close().await {
                warn!(error = %e, "failed to close MySQL connection");
            }

            let result = rows_to_result_set(&fetched?)?;
            record_db_metrics(result.len());
            Ok(result)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl Store for MySqlStore {
    fn namespace(&self) -> &str {
        &self.config.database
    }

    async fn query(&self, sql: &str) -> Result<ResultSet> {
        self.run(sql, true).await
    }

    async fn query_global(&self, sql: &str) -> Result<ResultSet> {
        self.run(sql, false).await
    }
}

/// Fetch all rows of `sql` in a transaction that is always rolled back.
async fn fetch_uncommitted(conn: &mut MySqlConnection, sql: &str) -> Result<Vec<MySqlRow>> {
    let mut tx = conn.begin().await?;
    let fetched = sqlx::Executor::fetch_all(&mut *tx, sqlx::raw_sql(sql)).await;

    if let Err(e) = tx.rollback().await {
        warn!(error = %e, "failed to roll back statement transaction");
    }

    Ok(fetched?)
}

/// Convert fetched rows; column names come from the first row.
fn rows_to_result_set(rows: &[MySqlRow]) -> Result<ResultSet> {
    let columns = rows
        .first()
        .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();

    let values = rows
        .iter()
        .map(|row| (0..row.len()).map(|i| decode_cell(row, i)).collect())
        .collect::<Result<Vec<Vec<Value>>>>()?;

    ResultSet::new(columns, values)
}

fn decode_cell(row: &MySqlRow, index: usize) -> Result<Value> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }
    match row.try_get_unchecked::<String, _>(index) {
        Ok(text) => Ok(Value::Text(text)),
        Err(_) => Ok(Value::Bytes(row.try_get_unchecked::<Vec<u8>, _>(index)?)),
    }
}
