use rand::Rng;
use std::io::Write;
use zeroize::Zeroizing;

use crate::authenticator::{AssertionRequest, Authenticator, CredentialDescriptor, Discovery};
use crate::config::{CHALLENGE_LEN, ORIGIN, RP_ID};
use crate::hmac_secret::{self, HMAC_SECRET};
use crate::error::{Error, Result};
use crate::params::InvocationParameters;

/// Take the first authenticator advertising hmac-secret. Sessions passed
/// over are dropped, and with them their device handles.
pub fn select_authenticator(discovery: &mut dyn Discovery) -> Result<Box<dyn Authenticator>> {
    discovery
        .authenticators()
        .find(|authn| {
            let capable = authn.extensions().iter().any(|e| e == HMAC_SECRET);
            tracing::debug!(transport = %authn.transport(), capable, "Authenticator found");
            capable
        })
        .ok_or(Error::NoCapableAuthenticator)
}

/// Twelve random lowercase ASCII letters.
pub fn random_challenge() -> String {
    let mut rng = rand::thread_rng();
    (0..CHALLENGE_LEN).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

pub fn assertion_request(params: &InvocationParameters) -> AssertionRequest {
    AssertionRequest {
        rp_id: RP_ID.to_string(),
        origin: ORIGIN.to_string(),
        challenge: random_challenge(),
        allow_list: vec![CredentialDescriptor {
            id: params.credential.credential_id().to_vec(),
        }],
        hmac_secret: hmac_secret::payload(&params.salt),
    }
}

/// Run one assertion and pull the hmac-secret output of its first result.
pub fn derive_secret(authn: &mut dyn Authenticator, params: &InvocationParameters) -> Result<Zeroizing<Vec<u8>>> {
    let request = assertion_request(params);
    tracing::debug!(rp_id = %request.rp_id, allowed = request.allow_list.len(), "Requesting assertion");

    let mut assertions = authn.get_assertion(&request)?;
    tracing::debug!(count = assertions.len(), "Assertion received");
    if assertions.is_empty() {
        return Err(Error::NoAssertion);
    }

    assertions
        .swap_remove(0)
        .extensions
        .hmac_secret
        .ok_or(Error::ExtensionResultMissing)
}

/// Write `secret` as one line of lowercase hex.
pub fn emit_secret(out: &mut dyn Write, secret: &[u8]) -> Result<()> {
    let hex = Zeroizing::new(hex::encode(secret));
    writeln!(out, "{}", hex.as_str())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_is_twelve_lowercase_letters() {
        for _ in 0..100 {
            let challenge = random_challenge();
            assert_eq!(challenge.len(), 12);
            assert!(challenge.bytes().all(|b| b.is_ascii_lowercase()), "{challenge}");
        }
    }

    #[test]
    fn test_challenges_differ() {
        assert_ne!(random_challenge(), random_challenge());
    }

    #[test]
    fn test_emit_is_single_hex_line() {
        let mut out = Vec::new();
        emit_secret(&mut out, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        assert_eq!(out, b"deadbeef\n");
    }
}
