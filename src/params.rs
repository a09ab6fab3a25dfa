use zeroize::Zeroizing;

use crate::config::Config;
use crate::credential::CredentialReference;
use crate::error::Error;

#[derive(Debug, Clone)]
pub struct UserEntity {
    pub id: Vec<u8>,
    pub name: String,
}

/// Validated inputs of one derivation.
#[derive(Clone)]
pub struct InvocationParameters {
    pub user: UserEntity,
    pub salt: Zeroizing<Vec<u8>>,
    pub credential: CredentialReference,
}

impl TryFrom<&Config> for InvocationParameters {
    type Error = Error;

    fn try_from(cfg: &Config) -> Result<Self, Error> {
        if cfg.salt.is_empty() {
            return Err(Error::Configuration("salt must not be empty".into()));
        }
        let credential = CredentialReference::decode_url_safe(&cfg.credential)?;
        Ok(Self {
            user: UserEntity {
                id: cfg.user_id.as_bytes().to_vec(),
                name: cfg.user_name.clone(),
            },
            salt: Zeroizing::new(cfg.salt.as_bytes().to_vec()),
            credential,
        })
    }
}

impl std::fmt::Debug for InvocationParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationParameters")
            .field("user", &self.user)
            .field("salt", &"..")
            .field("credential_id", &hex::encode(self.credential.credential_id()))
            .finish()
    }
}
