pub const RP_ID: &str = "secrez.io";
pub const ORIGIN: &str = "https://secrez.io";
pub const CHALLENGE_LEN: usize = 12;
/// Upper bound on the devices libfido2 lists in one enumeration.
pub const MAX_DEVICES: usize = 64;

/// Derive a secret from a FIDO2 authenticator through the hmac-secret extension.
#[derive(clap::Parser, Debug, Clone)]
#[command(name = "hmac-secret", version)]
pub struct Config {
    /// User id the credential was registered for
    #[arg(short = 'i', value_name = "USER_ID")]
    pub user_id: String,
    /// User name the credential was registered for
    #[arg(short = 'n', value_name = "USER_NAME")]
    pub user_name: String,
    /// Salt to evaluate (hashed to 32 bytes unless already 32 bytes long)
    #[arg(short = 's', value_name = "SALT")]
    pub salt: String,
    /// Attested credential data, URL-safe base64
    #[arg(short = 'c', value_name = "CREDENTIAL")]
    pub credential: String,
    /// Log more on stderr (repeatable)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
