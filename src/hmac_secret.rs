//! Input side of the `hmac-secret` extension. The key agreement and salt
//! encryption happen inside libfido2.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

pub const HMAC_SECRET: &str = "hmac-secret";

pub const SALT_LEN: usize = 32;

/// The salt to evaluate, normalized to exactly 32 bytes.
#[derive(Clone)]
pub struct HmacSecretInput {
    salt: Zeroizing<[u8; SALT_LEN]>,
}

impl HmacSecretInput {
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }
}

impl std::fmt::Debug for HmacSecretInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HmacSecretInput(..)")
    }
}

/// Build the extension input for `salt`. A 32-byte salt is taken as-is,
/// anything else is hashed down to 32 bytes first.
pub fn payload(salt: &[u8]) -> HmacSecretInput {
    let mut normalized = Zeroizing::new([0u8; SALT_LEN]);
    if salt.len() == SALT_LEN {
        normalized.copy_from_slice(salt);
    } else {
        normalized.copy_from_slice(&Sha256::digest(salt));
    }
    HmacSecretInput { salt: normalized }
}

/// An hmac-secret output is one or two 32-byte HMACs.
pub fn is_valid_output(output: &[u8]) -> bool {
    output.len() == SALT_LEN || output.len() == 2 * SALT_LEN
}
