//! The seam between the secret-derivation ceremony and whatever talks to
//! the hardware.

use base64::Engine;
use serde::Serialize;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::hmac_secret::HmacSecretInput;
use crate::transport::TransportKind;

/// A `public-key` credential descriptor for the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialDescriptor {
    pub id: Vec<u8>,
}

/// A single getAssertion ceremony.
#[derive(Debug, Clone)]
pub struct AssertionRequest {
    pub rp_id: String,
    pub origin: String,
    pub challenge: String,
    pub allow_list: Vec<CredentialDescriptor>,
    pub hmac_secret: HmacSecretInput,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectedClientData<'a> {
    #[serde(rename = "type")]
    ty: &'static str,
    challenge: String,
    origin: &'a str,
    cross_origin: bool,
}

impl AssertionRequest {
    /// The CollectedClientData JSON the authenticator signs over.
    pub fn client_data_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&CollectedClientData {
            ty: "webauthn.get",
            challenge: base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(self.challenge.as_bytes()),
            origin: &self.origin,
            cross_origin: false,
        })
    }

    pub fn client_data_hash(&self) -> Result<[u8; 32], serde_json::Error> {
        Ok(Sha256::digest(self.client_data_json()?).into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthenticatorError {
    #[error(transparent)]
    Fido(#[from] fido2_rs::error::Error),
    #[error("client data: {0}")]
    ClientData(#[from] serde_json::Error),
    #[error("{0}")]
    Ceremony(String),
}

/// Client extension outputs bound to one assertion.
#[derive(Default)]
pub struct ExtensionResults {
    pub hmac_secret: Option<Zeroizing<Vec<u8>>>,
}

/// One assertion returned by an authenticator.
pub struct Assertion {
    pub credential_id: Option<Vec<u8>>,
    /// As signed by the authenticator.
    pub auth_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
    pub extensions: ExtensionResults,
}

/// An open authenticator session. Dropping it closes the device.
pub trait Authenticator {
    fn transport(&self) -> TransportKind;

    /// Extension identifiers advertised by getInfo.
    fn extensions(&self) -> &[String];

    /// Blocks until the user completes the gesture or the authenticator
    /// gives up.
    fn get_assertion(&mut self, request: &AssertionRequest) -> Result<Vec<Assertion>, AuthenticatorError>;
}

/// A lazy source of authenticator sessions, in transport order.
pub trait Discovery {
    fn authenticators(&mut self) -> Box<dyn Iterator<Item = Box<dyn Authenticator>> + '_>;

    /// Called when no session was usable, to explain why on stderr.
    fn report_no_authenticator(&mut self) {}
}
