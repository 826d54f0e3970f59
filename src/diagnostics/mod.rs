//! Diagnostics that bypass the LLM entirely.
//!
//! - `slow_log`: the server's slow query log
//! - `indexes`: index listing from `information_schema`
//! - `metrics`: host CPU/memory plus the server's statement counter

pub mod indexes;
pub mod metrics;
pub mod slow_log;

pub use indexes::{index_query, list_indexes};
pub use metrics::{collect_metrics, HostUsage, PerformanceSnapshot};
pub use slow_log::{read_slow_log, SlowQueryLog};
