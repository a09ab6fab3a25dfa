use std::fmt;

use crate::authenticator::{Authenticator, AuthenticatorError, Discovery};
use crate::fido2::{self, DevicePath, Fido2Authenticator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Hid,
    Smartcard,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Hid => f.write_str("usb-hid"),
            TransportKind::Smartcard => f.write_str("smartcard"),
        }
    }
}

/// A listed device that could not be opened or did not answer getInfo.
#[derive(Debug, thiserror::Error)]
#[error("{path}: {source}")]
pub struct OpenError {
    pub path: String,
    #[source]
    pub source: AuthenticatorError,
}

pub type Opened = Result<Box<dyn Authenticator>, OpenError>;

/// HID sessions first, then smartcard ones. `smartcard` is only called once
/// the HID side is exhausted. Devices that failed to open are logged and
/// skipped.
pub fn chain_transports<'a, H, S>(
    hid: H,
    smartcard: impl FnOnce() -> S + 'a,
) -> impl Iterator<Item = Box<dyn Authenticator>> + 'a
where
    H: IntoIterator<Item = Opened> + 'a,
    H::IntoIter: 'a,
    S: IntoIterator<Item = Opened> + 'a,
    S::IntoIter: 'a,
{
    let hid = hid.into_iter().map(|opened| (TransportKind::Hid, opened));
    let smartcard = std::iter::once(smartcard)
        .flat_map(|open| open())
        .map(|opened| (TransportKind::Smartcard, opened));
    hid.chain(smartcard).filter_map(|(transport, opened)| match opened {
        Ok(authn) => Some(authn),
        Err(e) => {
            tracing::warn!(%transport, "Skipping authenticator: {e}");
            None
        }
    })
}

fn open(listed: DevicePath) -> Opened {
    Fido2Authenticator::open(&listed)
        .map(|authn| Box::new(authn) as Box<dyn Authenticator>)
        .map_err(|source| OpenError {
            path: listed.path,
            source,
        })
}

/// Authenticators attached to this machine, as libfido2 lists them. Devices
/// are opened lazily, USB-HID before NFC and PC/SC.
pub struct LocalAuthenticators {
    max_devices: usize,
}

impl LocalAuthenticators {
    pub fn new(max_devices: usize) -> Self {
        Self { max_devices }
    }
}

impl Discovery for LocalAuthenticators {
    fn authenticators(&mut self) -> Box<dyn Iterator<Item = Box<dyn Authenticator>> + '_> {
        let (hid, smartcard): (Vec<_>, Vec<_>) = fido2::list_devices(self.max_devices)
            .into_iter()
            .partition(|listed| listed.transport == TransportKind::Hid);
        tracing::debug!(hid = hid.len(), smartcard = smartcard.len(), "FIDO devices listed");
        Box::new(chain_transports(hid.into_iter().map(open), move || {
            smartcard.into_iter().map(open)
        }))
    }

    fn report_no_authenticator(&mut self) {
        crate::diagnostics::report_no_authenticator(self.max_devices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authenticator::{Assertion, AssertionRequest};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// The first advertised "extension" is the stub's name.
    struct Stub {
        transport: TransportKind,
        extensions: Vec<String>,
    }

    impl Authenticator for Stub {
        fn transport(&self) -> TransportKind {
            self.transport
        }

        fn extensions(&self) -> &[String] {
            &self.extensions
        }

        fn get_assertion(&mut self, _request: &AssertionRequest) -> Result<Vec<Assertion>, AuthenticatorError> {
            Ok(vec![])
        }
    }

    /// Either a session or an open failure, recording the name when opened.
    fn source(
        transport: TransportKind,
        devices: Vec<(&'static str, bool)>,
        log: Rc<RefCell<Vec<&'static str>>>,
    ) -> impl Iterator<Item = Opened> {
        devices.into_iter().map(move |(name, capable)| {
            log.borrow_mut().push(name);
            if name.starts_with("broken") {
                return Err(OpenError {
                    path: name.into(),
                    source: AuthenticatorError::Ceremony("getInfo failed".into()),
                });
            }
            let mut extensions = vec![name.to_string()];
            if capable {
                extensions.push("hmac-secret".to_string());
            }
            Ok(Box::new(Stub { transport, extensions }) as Box<dyn Authenticator>)
        })
    }

    fn name(authn: &dyn Authenticator) -> &str {
        &authn.extensions()[0]
    }

    #[test]
    fn test_hid_before_smartcard() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let hid = source(TransportKind::Hid, vec![("hid-a", false), ("hid-b", false)], log.clone());
        let card_log = log.clone();
        let all: Vec<TransportKind> = chain_transports(hid, move || {
            source(TransportKind::Smartcard, vec![("card-a", false)], card_log)
        })
        .map(|authn| authn.transport())
        .collect();
        assert_eq!(all, vec![TransportKind::Hid, TransportKind::Hid, TransportKind::Smartcard]);
        assert_eq!(*log.borrow(), vec!["hid-a", "hid-b", "card-a"]);
    }

    #[test]
    fn test_smartcard_untouched_when_hid_matches() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let smartcard_listed = Rc::new(Cell::new(false));
        let hid = source(TransportKind::Hid, vec![("hid-a", false), ("hid-b", true), ("hid-c", true)], log.clone());
        let (listed, card_log) = (smartcard_listed.clone(), log.clone());
        let found = chain_transports(hid, move || {
            listed.set(true);
            source(TransportKind::Smartcard, vec![("card-a", true)], card_log)
        })
        .find(|authn| authn.extensions().iter().any(|e| e == "hmac-secret"))
        .unwrap();
        assert_eq!(name(found.as_ref()), "hid-b");
        assert!(!smartcard_listed.get());
        assert_eq!(*log.borrow(), vec!["hid-a", "hid-b"]);
    }

    #[test]
    fn test_failed_device_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let hid = source(TransportKind::Hid, vec![("broken-hid", true)], log.clone());
        let card_log = log.clone();
        let found = chain_transports(hid, move || {
            source(TransportKind::Smartcard, vec![("broken-card", true), ("card-a", true)], card_log)
        })
        .find(|authn| authn.extensions().iter().any(|e| e == "hmac-secret"))
        .unwrap();
        assert_eq!(found.transport(), TransportKind::Smartcard);
        assert_eq!(name(found.as_ref()), "card-a");
        assert_eq!(*log.borrow(), vec!["broken-hid", "broken-card", "card-a"]);
    }

    #[test]
    fn test_open_error_names_path() {
        let err = OpenError {
            path: "/dev/hidraw0".into(),
            source: AuthenticatorError::Ceremony("getInfo failed".into()),
        };
        assert_eq!(err.to_string(), "/dev/hidraw0: getInfo failed");
    }
}
