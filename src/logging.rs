//! Tracing subscriber setup for host applications.
//!
//! The crate itself only emits `tracing` events; a host that wants them on
//! stderr calls [`init`] once at startup. Filtering follows `RUST_LOG`,
//! defaulting to `info`.

use tracing_subscriber::{EnvFilter, fmt};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
