//! Shared setup for the demo binaries

use tracing_subscriber::EnvFilter;
use walutomat_rest::{ClientConfig, Credentials, RestError, WalutomatRestClient};

/// Install a `RUST_LOG`-driven subscriber, defaulting to `info`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Client from `WALUTOMAT_*` variables; `WALUTOMAT_SANDBOX=1` selects the sandbox host
pub fn client_from_env(dry_run: bool) -> Result<WalutomatRestClient, RestError> {
    let config = if std::env::var("WALUTOMAT_SANDBOX").is_ok_and(|v| v == "1") {
        ClientConfig::sandbox()
    } else {
        ClientConfig::new()
    };
    let credentials = Credentials::from_env()?;
    credentials.validate()?;

    Ok(WalutomatRestClient::with_config(
        config.with_credentials(credentials).with_dry_run(dry_run),
    ))
}
