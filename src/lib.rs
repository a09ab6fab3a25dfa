pub mod authenticator;
pub mod ceremony;
pub mod config;
pub mod credential;
pub mod diagnostics;
pub mod error;
pub mod fido2;
pub mod hmac_secret;
pub mod params;
pub mod transport;

pub use error::{Error, Result};

use std::io::Write;

use authenticator::Discovery;
use params::InvocationParameters;

/// Log to stderr; `RUST_LOG` wins over the `-v` level when set.
pub fn init_logging(cfg: &config::Config) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Derive the secret for `cfg` and print it to `out`.
///
/// Parameters are validated before any device is touched. Only the secret
/// line is ever written to `out`.
pub fn run(cfg: &config::Config, discovery: &mut dyn Discovery, out: &mut dyn Write) -> Result<()> {
    let params = InvocationParameters::try_from(cfg)?;
    tracing::debug!(?params, "Parameters parsed");

    let mut authn = match ceremony::select_authenticator(discovery) {
        Ok(authn) => authn,
        Err(e) => {
            discovery.report_no_authenticator();
            return Err(e);
        }
    };
    tracing::info!(transport = %authn.transport(), "Using authenticator");

    let secret = ceremony::derive_secret(authn.as_mut(), &params)?;
    drop(authn);

    ceremony::emit_secret(out, &secret)?;
    tracing::debug!("Secret emitted");
    Ok(())
}
