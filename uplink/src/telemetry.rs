//! Tracing initialization: console fmt subscriber with env-filter control.
//!
//! Verbosity is governed by `RUST_LOG` (default `info`), e.g.
//! `RUST_LOG=uplink=debug,tower_http=debug`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Call once, before serving.
pub fn init_telemetry() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
