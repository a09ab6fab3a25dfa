//! `Authenticator` over libfido2, through `fido2-rs`.
//!
//! libfido2 owns the transports (USB-HID, NFC, PC/SC), the CTAP2 encoding and
//! the hmac-secret key agreement. This module only maps requests and results.

use fido2_rs::assertion::AssertRequest;
use fido2_rs::credentials::Extensions;
use fido2_rs::device::{Device, DeviceList};
use zeroize::Zeroizing;

use crate::authenticator::{Assertion, AssertionRequest, Authenticator, AuthenticatorError, ExtensionResults};
use crate::hmac_secret;
use crate::transport::TransportKind;

/// A device libfido2 listed but that was not opened yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePath {
    pub path: String,
    pub transport: TransportKind,
}

impl DevicePath {
    /// libfido2 prefixes NFC paths with `nfc:` and PC/SC paths with
    /// `pcsc://`. `windows://hello` is a platform authenticator, not a key.
    pub fn classify(path: &str) -> Option<TransportKind> {
        if path.starts_with("windows://") {
            None
        } else if path.starts_with("pcsc://") || path.starts_with("nfc:") {
            Some(TransportKind::Smartcard)
        } else {
            Some(TransportKind::Hid)
        }
    }
}

/// Every FIDO device libfido2 can see, in the order it reports them.
pub fn list_devices(max: usize) -> Vec<DevicePath> {
    let mut devices = Vec::new();
    for info in DeviceList::list_devices(max) {
        let path = match info.path.to_str() {
            Ok(path) => path.to_string(),
            Err(e) => {
                tracing::debug!("Skipping device with a non UTF-8 path: {e}");
                continue;
            }
        };
        match DevicePath::classify(&path) {
            Some(transport) => devices.push(DevicePath { path, transport }),
            None => tracing::debug!(%path, "Skipping platform authenticator"),
        }
    }
    devices
}

pub struct Fido2Authenticator {
    device: Device,
    path: String,
    transport: TransportKind,
    extensions: Vec<String>,
}

impl Fido2Authenticator {
    /// Open the device and read its getInfo extension list.
    pub fn open(listed: &DevicePath) -> Result<Self, AuthenticatorError> {
        let device = Device::open(&listed.path)?;
        let info = device.info()?;
        let extensions: Vec<String> = info.extensions().into_iter().map(|e| e.to_string()).collect();
        tracing::debug!(path = %listed.path, transport = %listed.transport, ?extensions, "Authenticator opened");
        Ok(Self {
            device,
            path: listed.path.clone(),
            transport: listed.transport,
            extensions,
        })
    }
}

fn non_empty(bytes: &[u8]) -> Option<Vec<u8>> {
    (!bytes.is_empty()).then(|| bytes.to_vec())
}

impl Authenticator for Fido2Authenticator {
    fn transport(&self) -> TransportKind {
        self.transport
    }

    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn get_assertion(&mut self, request: &AssertionRequest) -> Result<Vec<Assertion>, AuthenticatorError> {
        let mut req = AssertRequest::new()?;
        req.set_rp(&request.rp_id)?;
        req.set_client_data_hash(request.client_data_hash()?)?;
        for descriptor in &request.allow_list {
            req.set_allow_credential(&descriptor.id)?;
        }
        req.set_extensions(Extensions::HMAC_SECRET)?;
        req.set_hmac_salt(request.hmac_secret.salt())?;

        tracing::info!(path = %self.path, "Touch the authenticator to continue");
        let assertions = self.device.get_assertion(req, None)?;

        assertions
            .iter()
            .map(|assertion| {
                let output = assertion.hmac_secret();
                let hmac_secret = if output.is_empty() {
                    None
                } else if hmac_secret::is_valid_output(output) {
                    Some(Zeroizing::new(output.to_vec()))
                } else {
                    return Err(AuthenticatorError::Ceremony(format!(
                        "hmac-secret output of {} bytes",
                        output.len()
                    )));
                };
                Ok(Assertion {
                    credential_id: non_empty(assertion.id()),
                    auth_data: assertion.auth_data().to_vec(),
                    signature: assertion.signature().to_vec(),
                    user_handle: non_empty(assertion.user_id()),
                    extensions: ExtensionResults { hmac_secret },
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_paths() {
        assert_eq!(DevicePath::classify("/dev/hidraw3"), Some(TransportKind::Hid));
        assert_eq!(DevicePath::classify("IOService:/AppleARMPE/usb"), Some(TransportKind::Hid));
        assert_eq!(DevicePath::classify("pcsc://slot0"), Some(TransportKind::Smartcard));
        assert_eq!(DevicePath::classify("nfc:/sys/devices/nfc0"), Some(TransportKind::Smartcard));
        assert_eq!(DevicePath::classify("windows://hello"), None);
    }
}
