use crate::authenticator::AuthenticatorError;
use crate::credential::CredentialError;

/// Terminal failures of a derivation run, each with its own exit code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid arguments: {0}")]
    Configuration(String),
    #[error("Invalid credential: {0}")]
    Credential(#[from] CredentialError),
    #[error("No authenticator with the hmac-secret extension found")]
    NoCapableAuthenticator,
    #[error("Assertion failed: {0}")]
    Assertion(#[from] AuthenticatorError),
    #[error("Assertion failed: authenticator returned no assertions")]
    NoAssertion,
    #[error("Authenticator returned no hmac-secret result")]
    ExtensionResultMissing,
    #[error("Failed to write secret: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Configuration(_) | Error::Credential(_) => 2,
            Error::NoCapableAuthenticator => 1,
            Error::Assertion(_) | Error::NoAssertion => 3,
            Error::ExtensionResultMissing => 4,
            Error::Output(_) => 5,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
