//! Logging setup for a bridge host
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run -p core-runtime --example logging_demo
//!
//! # JSON format
//! cargo run -p core-runtime --example logging_demo -- json
//!
//! # Compact format with a custom filter
//! cargo run -p core-runtime --example logging_demo -- compact "core_bridge=trace"
//! ```

use std::env;
use std::sync::Arc;

use bridge_traits::logging::{LogLevel, LoggerSink, MemoryLogger};
use core_runtime::config::HostConfig;
use core_runtime::logging::{init_logging, redact_if_sensitive, strip_query, LogFormat, LoggingConfig};
use tracing::{debug, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    // Mirror warnings into an in-memory console, as a host UI might.
    let console = Arc::new(MemoryLogger::new(LogLevel::Warn, 32));
    let sink: Arc<dyn LoggerSink> = console.clone();

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_logger_sink(sink)
        .with_target(true);
    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }

    if let Err(err) = init_logging(config) {
        eprintln!("logging setup failed: {err}");
        return;
    }

    let host = match HostConfig::builder()
        .initial_address("https://app.local/index.html?session=abc")
        .build()
    {
        Ok(host) => host,
        Err(err) => {
            warn!(error = %err, "Invalid host configuration");
            return;
        }
    };

    info!(
        target: "core_bridge::bridge",
        bridge = %host.bridge.bridge_object_name,
        address = %strip_query(host.start_address()),
        "Bridge attached to content view"
    );
    debug!(target: "core_bridge::router", bytes = 17u64, depth = 1u64, "Routing inbound request");
    info!(
        target: "core_bridge::router",
        session_id = %redact_if_sensitive("sessionId", "abc"),
        "Handler context"
    );
    warn!(target: "core_bridge::bridge", abandoned_calls = 2u64, "Content view torn down with calls in flight");

    // The sink layer forwards from spawned tasks; let them run.
    tokio::task::yield_now().await;

    for entry in console.entries() {
        println!("[console] {:?} {}", entry.level, entry.message);
    }
}
