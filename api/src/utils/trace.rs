//! Tracing setup for the Matsight API

use tracing_subscriber::EnvFilter;

use crate::conf::Conf;

/// Setup our tracing subscriber
///
/// RUST_LOG wins when it is set; otherwise the configured level is used.
///
/// # Arguments
///
/// * `config` - The Matsight config
pub fn setup(config: &Conf) {
    // fall back to the configured level when RUST_LOG is unset
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.matsight.tracing.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
