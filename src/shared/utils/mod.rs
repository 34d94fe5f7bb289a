pub mod logger;

pub use logger::{init_logger, tracing_filter, LogContext, StoreTimer};
