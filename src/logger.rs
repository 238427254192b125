//! Log output for hosts that do not set up `tracing` themselves.
//!
//! Library code only emits `tracing` events. [`init`] installs a plain fmt
//! subscriber filtered by the `DS5BRIDGE_LOG` environment variable (same
//! syntax as `RUST_LOG`, default `warn`). It is safe to call more than once
//! and does nothing if the host already installed a global subscriber.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "DS5BRIDGE_LOG";

pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
