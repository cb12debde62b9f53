// Tracing setup
// Installs the global fmt subscriber for hosts embedding the router
//
// Numan Thabit 2025 Nov

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter comes from `RUST_LOG`, defaulting to `info`.
/// Fails if a global subscriber is already installed.
pub fn init_tracing() -> Result<()> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("tracing subscriber init: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails() {
        let _ = init_tracing();
        assert!(init_tracing().is_err());
    }
}
