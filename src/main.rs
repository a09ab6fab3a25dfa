use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;

use hmac_secret::{config::{self, Config}, transport::LocalAuthenticators};

fn main() -> ExitCode {
    let cfg = Config::parse();
    hmac_secret::init_logging(&cfg);

    match derive(&cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err
                .downcast_ref::<hmac_secret::Error>()
                .map(hmac_secret::Error::exit_code)
                .unwrap_or(5);
            ExitCode::from(code)
        }
    }
}

fn derive(cfg: &Config) -> anyhow::Result<()> {
    let mut discovery = LocalAuthenticators::new(config::MAX_DEVICES);
    let stdout = std::io::stdout();
    hmac_secret::run(cfg, &mut discovery, &mut stdout.lock()).context("hmac-secret derivation failed")?;
    Ok(())
}
