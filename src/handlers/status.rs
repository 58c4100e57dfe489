//! Status and health check handlers for the keyword server.
//!
//! HTTP endpoints for monitoring:
//! - `/status` - server status with runtime metrics
//! - `/health` - simple liveness check for systemd/load balancers

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::{debug, instrument};

/// Server version from Cargo.toml
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name from Cargo.toml
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

/// Health check response for liveness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (always "healthy" if responding)
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Detailed server status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server version (from Cargo.toml)
    pub version: String,
    /// Server name
    pub name: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Total keywords executed
    pub keywords_executed: u64,
    /// Total keyword failures
    pub keyword_failures: u64,
    /// Memory usage metrics
    pub memory: MemoryMetrics,
    /// Keyword latency statistics (percentiles)
    pub latency: LatencyMetrics,
    /// Server status (always "running" if responding)
    pub status: String,
}

/// Memory usage metrics collected from sysinfo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMetrics {
    /// Resident Set Size - actual physical memory used (bytes)
    pub rss_bytes: u64,
    /// Virtual memory size (bytes)
    pub virtual_bytes: u64,
}

/// Keyword latency percentile metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatencyMetrics {
    /// 50th percentile (median) latency in milliseconds
    pub p50_ms: f64,
    /// 95th percentile latency in milliseconds
    pub p95_ms: f64,
    /// 99th percentile latency in milliseconds
    pub p99_ms: f64,
    /// Total number of samples recorded
    pub total_samples: u64,
    /// Mean latency in milliseconds
    pub mean_ms: f64,
    /// Maximum latency recorded in milliseconds
    pub max_ms: f64,
}

/// Thread-safe latency histogram for keyword timings.
///
/// Tracks latencies from 1us to 60 seconds with 3 significant figures.
#[derive(Debug)]
pub struct LatencyHistogram {
    inner: RwLock<Histogram<u64>>,
}

impl LatencyHistogram {
    /// Create a new latency histogram.
    pub fn new() -> Self {
        let histogram =
            Histogram::new_with_bounds(1, 60_000_000, 3).expect("Failed to create histogram");
        Self {
            inner: RwLock::new(histogram),
        }
    }

    /// Record a latency value in microseconds; values outside the histogram
    /// bounds are ignored.
    pub fn record(&self, latency_us: u64) {
        let mut hist = self.inner.write();
        let _ = hist.record(latency_us);
    }

    /// Record a latency duration.
    pub fn record_duration(&self, duration: std::time::Duration) {
        self.record(duration.as_micros() as u64);
    }

    /// Number of recorded samples.
    pub fn count(&self) -> u64 {
        self.inner.read().len()
    }

    /// Complete latency metrics, converted to milliseconds.
    pub fn metrics(&self) -> LatencyMetrics {
        let hist = self.inner.read();
        LatencyMetrics {
            p50_ms: hist.value_at_percentile(50.0) as f64 / 1000.0,
            p95_ms: hist.value_at_percentile(95.0) as f64 / 1000.0,
            p99_ms: hist.value_at_percentile(99.0) as f64 / 1000.0,
            total_samples: hist.len(),
            mean_ms: hist.mean() / 1000.0,
            max_ms: hist.max() as f64 / 1000.0,
        }
    }

    /// Reset the histogram.
    pub fn reset(&self) {
        self.inner.write().reset();
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state for the monitoring endpoints.
///
/// All fields are thread-safe; the keyword server records into this state
/// and the handlers read from it.
#[derive(Debug)]
pub struct AppState {
    start_time: Instant,
    keywords_executed: AtomicU64,
    keyword_failures: AtomicU64,
    latency_histogram: LatencyHistogram,
}

impl AppState {
    /// Create a new state; the start time is the current instant.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            keywords_executed: AtomicU64::new(0),
            keyword_failures: AtomicU64::new(0),
            latency_histogram: LatencyHistogram::new(),
        }
    }

    /// Server uptime in seconds.
    #[inline]
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Record one keyword execution with its duration and outcome.
    pub fn record_keyword(&self, duration: std::time::Duration, failed: bool) {
        self.keywords_executed.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.keyword_failures.fetch_add(1, Ordering::Relaxed);
        }
        self.latency_histogram.record_duration(duration);
    }

    /// Total keywords executed.
    #[inline]
    pub fn keywords_executed(&self) -> u64 {
        self.keywords_executed.load(Ordering::Relaxed)
    }

    /// Total keyword failures.
    #[inline]
    pub fn keyword_failures(&self) -> u64 {
        self.keyword_failures.load(Ordering::Relaxed)
    }

    /// Current latency metrics.
    #[inline]
    pub fn latency_metrics(&self) -> LatencyMetrics {
        self.latency_histogram.metrics()
    }

    /// Reset all metrics (useful for testing).
    pub fn reset_metrics(&self) {
        self.keywords_executed.store(0, Ordering::Relaxed);
        self.keyword_failures.store(0, Ordering::Relaxed);
        self.latency_histogram.reset();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect memory metrics for the current process using sysinfo.
fn collect_memory_metrics() -> MemoryMetrics {
    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new();

    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

    match system.process(pid) {
        Some(process) => MemoryMetrics {
            rss_bytes: process.memory(),
            virtual_bytes: process.virtual_memory(),
        },
        None => {
            debug!("Could not find current process in sysinfo");
            MemoryMetrics::default()
        }
    }
}

/// Health check endpoint handler.
///
/// # Route
/// `GET /health`
#[instrument(skip_all)]
pub async fn health_handler() -> impl IntoResponse {
    debug!("Health check requested");
    (StatusCode::OK, Json(HealthResponse::default()))
}

/// Detailed status endpoint handler.
///
/// # Route
/// `GET /status`
#[instrument(skip_all)]
pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Status requested");

    let response = StatusResponse {
        version: SERVER_VERSION.to_string(),
        name: SERVER_NAME.to_string(),
        uptime_seconds: state.uptime_seconds(),
        keywords_executed: state.keywords_executed(),
        keyword_failures: state.keyword_failures(),
        memory: collect_memory_metrics(),
        latency: state.latency_metrics(),
        status: "running".to_string(),
    };

    (StatusCode::OK, Json(response))
}
