//! The `-c` credential: WebAuthn attested credential data in URL-safe base64.

use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use ciborium::value::Value;

const AAGUID_LEN: usize = 16;

/// URL-safe alphabet; accepts input with or without `=` padding and emits none.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential is not URL-safe base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("credential is not valid attested credential data: {0}")]
    Malformed(String),
}

/// Attested credential data: `aaguid(16) | credIdLen(2) | credId | COSE_Key`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttestedCredentialData {
    pub aaguid: [u8; AAGUID_LEN],
    pub credential_id: Vec<u8>,
    pub public_key: Value,
}

impl AttestedCredentialData {
    /// Parse a standalone blob; trailing bytes after the COSE key are rejected.
    pub fn parse(data: &[u8]) -> Result<Self, CredentialError> {
        if data.len() < AAGUID_LEN + 2 {
            return Err(CredentialError::Malformed("truncated header".into()));
        }
        let mut aaguid = [0u8; AAGUID_LEN];
        aaguid.copy_from_slice(&data[..AAGUID_LEN]);
        let id_len = u16::from_be_bytes([data[AAGUID_LEN], data[AAGUID_LEN + 1]]) as usize;
        let rest = &data[AAGUID_LEN + 2..];
        if rest.len() < id_len {
            return Err(CredentialError::Malformed("credential id truncated".into()));
        }
        let (credential_id, mut rest) = rest.split_at(id_len);
        if credential_id.is_empty() {
            return Err(CredentialError::Malformed("empty credential id".into()));
        }

        // The reader advances `rest` past exactly one CBOR item.
        let public_key: Value = ciborium::from_reader(&mut rest)
            .map_err(|e| CredentialError::Malformed(format!("public key: {e}")))?;
        if !matches!(public_key, Value::Map(_)) {
            return Err(CredentialError::Malformed("public key is not a COSE_Key map".into()));
        }
        if !rest.is_empty() {
            return Err(CredentialError::Malformed(format!("{} trailing bytes", rest.len())));
        }

        Ok(Self {
            aaguid,
            credential_id: credential_id.to_vec(),
            public_key,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CredentialError> {
        let id_len = u16::try_from(self.credential_id.len())
            .map_err(|_| CredentialError::Malformed("credential id too long".into()))?;
        let mut data = Vec::with_capacity(AAGUID_LEN + 2 + self.credential_id.len() + 77);
        data.extend_from_slice(&self.aaguid);
        data.extend_from_slice(&id_len.to_be_bytes());
        data.extend_from_slice(&self.credential_id);
        ciborium::into_writer(&self.public_key, &mut data)
            .map_err(|e| CredentialError::Malformed(format!("public key: {e}")))?;
        Ok(data)
    }
}

/// A previously registered credential, as attested credential data.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialReference {
    data: AttestedCredentialData,
}

impl CredentialReference {
    /// Standard-alphabet `+` and `/` are read as their URL-safe counterparts.
    pub fn decode_url_safe(encoded: &str) -> Result<Self, CredentialError> {
        let websafe: String = encoded
            .trim()
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                c => c,
            })
            .collect();
        let raw = URL_SAFE_LENIENT.decode(websafe)?;
        let data = AttestedCredentialData::parse(&raw)?;
        Ok(Self { data })
    }

    pub fn encode_url_safe(&self) -> Result<String, CredentialError> {
        Ok(URL_SAFE_LENIENT.encode(self.data.to_bytes()?))
    }

    pub fn credential_id(&self) -> &[u8] {
        &self.data.credential_id
    }

    pub fn aaguid(&self) -> &[u8; AAGUID_LEN] {
        &self.data.aaguid
    }

    pub fn public_key(&self) -> &Value {
        &self.data.public_key
    }
}

impl From<AttestedCredentialData> for CredentialReference {
    fn from(data: AttestedCredentialData) -> Self {
        Self { data }
    }
}
