//! Error types for open-dragonfly-core.

use thiserror::Error;

/// Session phase a transport error occurred in.
///
/// Carried on [`Error::Usb`] so that a permissions or hardware problem can
/// be pinned to the exact step that hit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Scanning the bus / opening the device.
    Locate,
    /// Detaching the kernel HID driver from an interface.
    Detach,
    /// Claiming an interface for userspace access.
    Claim,
    /// Sending a vendor command frame.
    Transfer,
    /// Releasing a claimed interface.
    Release,
    /// Re-attaching the kernel HID driver.
    Attach,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Locate => "device lookup",
            Self::Detach => "kernel driver detach",
            Self::Claim => "interface claim",
            Self::Transfer => "control transfer",
            Self::Release => "interface release",
            Self::Attach => "kernel driver reattach",
        };
        f.write_str(name)
    }
}

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// No device with the expected vendor/product id is on the bus.
    #[error(
        "device not found (VID 0x{vendor_id:04X}, PID 0x{product_id:04X}); \
         check that the dongle is plugged in and the product id matches"
    )]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    /// Transport-level USB failure, tagged with the phase it occurred in.
    #[error("USB error during {phase}: {source}")]
    Usb {
        phase: Phase,
        #[source]
        source: rusb::Error,
    },

    /// Value outside the enumerated domain for a setting.
    #[error("unsupported {setting} value: {value}")]
    UnsupportedValue { setting: &'static str, value: u32 },

    /// Polling rate above what the connected dongle supports.
    #[error("1K dongle detected: {rate_hz} Hz exceeds the {cap_hz} Hz cap")]
    RateCapExceeded { rate_hz: u16, cap_hz: u16 },

    /// No setting was requested at all.
    #[error("no settings requested, nothing to change")]
    NothingRequested,
}

impl Error {
    pub(crate) fn usb(phase: Phase, source: rusb::Error) -> Self {
        Self::Usb { phase, source }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usb_error_names_its_phase() {
        let err = Error::usb(Phase::Claim, rusb::Error::Busy);
        assert!(err.to_string().contains("interface claim"));
    }

    #[test]
    fn device_not_found_formats_ids_as_hex() {
        let err = Error::DeviceNotFound {
            vendor_id: 0x3554,
            product_id: 0xF505,
        };
        let msg = err.to_string();
        assert!(msg.contains("0x3554"));
        assert!(msg.contains("0xF505"));
    }
}
