//! Dongle discovery and the rusb-backed transport.

use std::time::Duration;

use rusb::{DeviceHandle, Direction, GlobalContext, Recipient, RequestType};
use tracing::{debug, info};

use crate::error::{Error, Phase, Result};
use crate::frames::CommandFrame;
use crate::transport::Dongle;

/// HID SET_REPORT request code.
const SET_REPORT: u8 = 0x09;
/// wValue: vendor report descriptor type, descriptor index 0.
const REPORT_VALUE: u16 = 0x0208;
/// wIndex: the vendor commands target interface 1.
const REPORT_INDEX: u16 = 1;

/// Zero means no bound; libusb blocks until the device answers.
pub const DEFAULT_TIMEOUT: Duration = Duration::ZERO;

/// An opened Dragonfly dongle.
///
/// Holds the rusb handle plus the interface count of the active
/// configuration, discovered once at open time.
pub struct DongleHandle {
    handle: DeviceHandle<GlobalContext>,
    interfaces: u8,
    product_id: u16,
    timeout: Duration,
}

impl DongleHandle {
    /// Override the control-transfer timeout (default: unbounded).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Find and open the dongle with the given ids.
///
/// The bus is scanned once; absence is fatal, there is no retry or
/// wait-for-attach. If several matching devices are somehow present, the
/// first one libusb enumerates wins.
pub fn open_dongle(vendor_id: u16, product_id: u16) -> Result<DongleHandle> {
    let devices = rusb::devices().map_err(|e| Error::usb(Phase::Locate, e))?;

    for device in devices.iter() {
        let Ok(descriptor) = device.device_descriptor() else {
            continue;
        };
        if descriptor.vendor_id() != vendor_id || descriptor.product_id() != product_id {
            continue;
        }

        info!(
            bus = device.bus_number(),
            address = device.address(),
            vid = format_args!("0x{vendor_id:04X}"),
            pid = format_args!("0x{product_id:04X}"),
            "Found Dragonfly dongle"
        );

        let handle = device.open().map_err(|e| Error::usb(Phase::Locate, e))?;
        let config = device
            .active_config_descriptor()
            .map_err(|e| Error::usb(Phase::Locate, e))?;
        let interfaces = config.num_interfaces();
        debug!(interfaces, "Read active configuration");

        return Ok(DongleHandle {
            handle,
            interfaces,
            product_id,
            timeout: DEFAULT_TIMEOUT,
        });
    }

    Err(Error::DeviceNotFound {
        vendor_id,
        product_id,
    })
}

impl Dongle for DongleHandle {
    fn product_id(&self) -> u16 {
        self.product_id
    }

    fn interface_count(&self) -> Result<u8> {
        Ok(self.interfaces)
    }

    fn kernel_driver_active(&self, iface: u8) -> Result<bool> {
        self.handle
            .kernel_driver_active(iface)
            .map_err(|e| Error::usb(Phase::Detach, e))
    }

    fn detach_kernel_driver(&mut self, iface: u8) -> Result<()> {
        self.handle
            .detach_kernel_driver(iface)
            .map_err(|e| Error::usb(Phase::Detach, e))
    }

    fn attach_kernel_driver(&mut self, iface: u8) -> Result<()> {
        self.handle
            .attach_kernel_driver(iface)
            .map_err(|e| Error::usb(Phase::Attach, e))
    }

    fn claim_interface(&mut self, iface: u8) -> Result<()> {
        self.handle
            .claim_interface(iface)
            .map_err(|e| Error::usb(Phase::Claim, e))
    }

    fn release_interface(&mut self, iface: u8) -> Result<()> {
        self.handle
            .release_interface(iface)
            .map_err(|e| Error::usb(Phase::Release, e))
    }

    fn send_frame(&mut self, frame: &CommandFrame) -> Result<usize> {
        self.handle
            .write_control(
                rusb::request_type(Direction::Out, RequestType::Class, Recipient::Interface),
                SET_REPORT,
                REPORT_VALUE,
                REPORT_INDEX,
                frame,
                self.timeout,
            )
            .map_err(|e| Error::usb(Phase::Transfer, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_type_matches_captured_traffic() {
        // Class | interface recipient | host-to-device = 0x21 on the wire.
        let request_type =
            rusb::request_type(Direction::Out, RequestType::Class, Recipient::Interface);
        assert_eq!(request_type, 0x21);
    }
}
