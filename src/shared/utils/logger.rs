use log::{debug, error, info, warn};
use std::sync::Once;
use std::time::Instant;
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, EnvFilter};

use crate::shared::errors::AppError;

static INIT: Once = Once::new();

/// Store round trips slower than this are logged at warn level
pub const SLOW_STORE_CALL_MS: u64 = 1_000;

/// Directives used for the tracing layer when RUST_LOG is unset
const DEFAULT_TRACING_DIRECTIVES: &str = "marquee_lib=info";

/// Initialize logging once at startup
///
/// `log` records go through env_logger; `tracing` events from the cache and
/// the search pipeline go through a fmt layer. Both honour RUST_LOG and both
/// write to stderr, keeping stdout for the console front end.
pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Warn)
            .filter_module("marquee_lib", log::LevelFilter::Info)
            .filter_module("reqwest", log::LevelFilter::Warn)
            .filter_module("hyper", log::LevelFilter::Warn)
            .parse_default_env() // RUST_LOG overrides the defaults above
            .format_timestamp_secs()
            .format_target(false)
            .format_module_path(false)
            .init();

        let filter = tracing_filter(std::env::var("RUST_LOG").ok().as_deref());
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        );
        // Set directly rather than via `try_init`, which would also try to
        // claim the `log` facade that env_logger already owns.
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            debug!("tracing subscriber already installed");
        }

        info!("Logging system initialized");
    });
}

/// Filter for the tracing layer: RUST_LOG directives when given, otherwise
/// info for this crate and warn for everything else
pub fn tracing_filter(directives: Option<&str>) -> EnvFilter {
    let directives = directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_TRACING_DIRECTIVES);

    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

/// One-line log shapes shared by the store client and the search pipeline
pub struct LogContext;

impl LogContext {
    pub fn store_call(resource: &str, status: &str, duration_ms: Option<u64>) {
        match duration_ms {
            Some(duration) => info!("Store: {} {} in {}ms", resource, status, duration),
            None => debug!("Store: {} {}", resource, status),
        }
    }

    pub fn search_operation(query: &str, page: Option<u32>, results: Option<usize>) {
        match (page, results) {
            (Some(p), Some(r)) => info!("Search: '{}' page {} returned {} results", query, p, r),
            (Some(p), None) => debug!("Search: Starting '{}' page {}", query, p),
            (None, Some(r)) => info!("Search: '{}' returned {} results", query, r),
            (None, None) => debug!("Search: Starting '{}'", query),
        }
    }

    /// Remote-side failures are warnings; rejected requests are errors
    pub fn store_failure(resource: &str, error: &AppError) {
        if error.is_transient() {
            warn!("Store: {} failed: {}", resource, error);
        } else {
            error!("Store: {} rejected: {}", resource, error);
        }
    }

    pub fn store_latency(resource: &str, duration_ms: u64, detail: Option<&str>) {
        let detail = detail.map(|d| format!(" ({})", d)).unwrap_or_default();
        if duration_ms >= SLOW_STORE_CALL_MS {
            warn!("Store: slow {} took {}ms{}", resource, duration_ms, detail);
        } else {
            debug!("Store: {} took {}ms{}", resource, duration_ms, detail);
        }
    }
}

/// Wall-clock timer around one store round trip
pub struct StoreTimer {
    start: Instant,
    resource: String,
}

impl StoreTimer {
    pub fn start(resource: &str) -> Self {
        Self {
            start: Instant::now(),
            resource: resource.to_string(),
        }
    }

    pub fn finish(self) -> u64 {
        let elapsed = self.elapsed_ms();
        LogContext::store_latency(&self.resource, elapsed, None);
        elapsed
    }

    /// Finish, noting how many rows survived ingress validation
    pub fn finish_with_rows(self, kept: usize, fetched: usize) -> u64 {
        let elapsed = self.elapsed_ms();
        let detail = if kept == fetched {
            format!("{} rows", fetched)
        } else {
            format!("{}/{} rows kept", kept, fetched)
        };
        LogContext::store_latency(&self.resource, elapsed, Some(&detail));
        elapsed
    }

    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
