//! Host and server counters.

use crate::store::Store;
use crate::types::{ChatError, Result};
use sysinfo::System;

const QUESTIONS_QUERY: &str = "SHOW GLOBAL STATUS LIKE 'Questions';";

/// Host CPU and memory utilisation in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostUsage {
    pub cpu_percent: f32,
    pub memory_percent: f64,
}

/// Host usage plus the server's `Questions` counter.
///
/// The counter is kept as a `Result` so an unreachable server still shows
/// host numbers.
#[derive(Debug)]
pub struct PerformanceSnapshot {
    pub host: HostUsage,
    pub questions: Result<u64>,
}

/// Sample CPU over the minimum update interval and read memory usage.
pub async fn sample_host() -> HostUsage {
    let mut system = System::new();
    system.refresh_cpu_usage();
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
    system.refresh_cpu_usage();
    system.refresh_memory();

    HostUsage {
        cpu_percent: system.global_cpu_usage(),
        memory_percent: percent(system.used_memory(), system.total_memory()),
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}

/// Read the server's `Questions` status counter.
pub async fn questions_count(store: &dyn Store) -> Result<u64> {
    let result = store.query_global(QUESTIONS_QUERY).await?;
    let value = result
        .cell(0, 1)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ChatError::diagnostic("Questions status variable not reported"))?;
    value
        .trim()
        .parse()
        .map_err(|_| ChatError::diagnostic(format!("Unexpected Questions value: {}", value)))
}

/// Collect host usage and the server counter.
pub async fn collect_metrics(store: &dyn Store) -> PerformanceSnapshot {
    PerformanceSnapshot {
        host: sample_host().await,
        questions: questions_count(store).await,
    }
}
