use std::io;

use crate::fido2::{self, DevicePath};
use crate::transport::TransportKind;

/// Explain, on stderr, the usual reasons no authenticator was usable.
pub fn report_no_authenticator(max_devices: usize) {
    let listed = fido2::list_devices(max_devices);
    let hints = hints(&listed, |path| {
        std::fs::OpenOptions::new().read(true).write(true).open(path).map(drop)
    });
    for hint in &hints {
        tracing::warn!("{hint}");
    }
}

/// Only device nodes libfido2 reported as FIDO devices are checked for access,
/// so keyboards and mice behind other hidraw nodes never raise a hint.
fn hints(listed: &[DevicePath], open: impl Fn(&str) -> io::Result<()>) -> Vec<String> {
    let mut hints = Vec::new();

    if listed.is_empty() {
        hints.push("libfido2 lists no FIDO devices: is the security key plugged in?".to_string());
    }

    for device in listed.iter().filter(|d| d.transport == TransportKind::Hid && d.path.starts_with("/dev/")) {
        if let Err(e) = open(&device.path) {
            hints.push(format!(
                "cannot open {}: {e}\n  \
                 → install the udev rules shipped with libfido2 (70-u2f.rules)\n  \
                 → or add yourself to the 'plugdev' group: sudo usermod -aG plugdev $USER",
                device.path
            ));
        }
    }

    if !listed.iter().any(|d| d.transport == TransportKind::Smartcard) {
        hints.push("no NFC or PC/SC devices listed: libfido2 finds them only when built with NFC or PC/SC support".to_string());
    }

    hints.push("the key must advertise the hmac-secret extension in getInfo".to_string());
    hints
}
