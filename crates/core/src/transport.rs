//! USB transport abstraction for device communication.
//!
//! Provides a trait-based transport layer so that the real dongle and a
//! recording fake share the same interface. Session and orchestration
//! logic only ever see this trait, which keeps the full
//! open→transfer→restore flow testable without hardware.

use std::time::Duration;

use crate::error::Result;
use crate::frames::CommandFrame;

/// Low-level operations the session performs on a dongle.
///
/// Implemented by [`crate::device::DongleHandle`] over rusb, and by the
/// recording fake in tests.
pub trait Dongle {
    /// Product id of the opened device.
    fn product_id(&self) -> u16;

    /// Number of interfaces in the active configuration.
    fn interface_count(&self) -> Result<u8>;

    /// Whether the kernel driver currently owns the interface.
    fn kernel_driver_active(&self, iface: u8) -> Result<bool>;

    /// Detach the kernel driver from an interface.
    fn detach_kernel_driver(&mut self, iface: u8) -> Result<()>;

    /// Re-attach the kernel driver to an interface.
    fn attach_kernel_driver(&mut self, iface: u8) -> Result<()>;

    /// Claim an interface for exclusive userspace access.
    fn claim_interface(&mut self, iface: u8) -> Result<()>;

    /// Release a claimed interface.
    fn release_interface(&mut self, iface: u8) -> Result<()>;

    /// Send one vendor frame; returns the byte count the device handle
    /// reports as transferred.
    fn send_frame(&mut self, frame: &CommandFrame) -> Result<usize>;

    /// Block while the firmware settles between writes.
    fn settle(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A scripted dongle for testing.
///
/// Records every call in order so tests can assert sequencing (rollback
/// order, settle position) and supports injected failures.
#[cfg(test)]
pub mod fake {
    use super::*;
    use crate::error::{Error, Phase};
    use crate::frames::FRAME_LEN;

    /// One recorded operation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        DetachKernelDriver(u8),
        AttachKernelDriver(u8),
        ClaimInterface(u8),
        ReleaseInterface(u8),
        SendFrame(CommandFrame),
        Settle(Duration),
    }

    /// Fake dongle with a call log and scriptable failures.
    #[derive(Debug)]
    pub struct FakeDongle {
        product_id: u16,
        kernel_owned: Vec<bool>,
        claimed: Vec<bool>,
        /// Everything the code under test did, in order.
        pub calls: Vec<Call>,
        /// Claiming this interface fails, simulating a partial open.
        pub fail_claim_on: Option<u8>,
        /// Every frame send fails with a transport error.
        pub fail_transfer: bool,
        /// Byte count reported for each successful send.
        pub transfer_result: usize,
    }

    impl FakeDongle {
        /// Fake with `interfaces` kernel-owned interfaces, behaving like a
        /// healthy dongle: every claim succeeds and every transfer reports
        /// the full frame length.
        pub fn new(product_id: u16, interfaces: u8) -> Self {
            Self {
                product_id,
                kernel_owned: vec![true; interfaces as usize],
                claimed: vec![false; interfaces as usize],
                calls: Vec::new(),
                fail_claim_on: None,
                fail_transfer: false,
                transfer_result: FRAME_LEN,
            }
        }

        /// Frames sent so far, in order.
        pub fn sent_frames(&self) -> Vec<CommandFrame> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::SendFrame(frame) => Some(*frame),
                    _ => None,
                })
                .collect()
        }

        /// True when every interface is back with the kernel and unclaimed.
        pub fn is_restored(&self) -> bool {
            self.kernel_owned.iter().all(|owned| *owned)
                && self.claimed.iter().all(|claimed| !*claimed)
        }
    }

    impl Dongle for FakeDongle {
        fn product_id(&self) -> u16 {
            self.product_id
        }

        fn interface_count(&self) -> Result<u8> {
            Ok(self.kernel_owned.len() as u8)
        }

        fn kernel_driver_active(&self, iface: u8) -> Result<bool> {
            Ok(self.kernel_owned[iface as usize])
        }

        fn detach_kernel_driver(&mut self, iface: u8) -> Result<()> {
            self.calls.push(Call::DetachKernelDriver(iface));
            self.kernel_owned[iface as usize] = false;
            Ok(())
        }

        fn attach_kernel_driver(&mut self, iface: u8) -> Result<()> {
            self.calls.push(Call::AttachKernelDriver(iface));
            self.kernel_owned[iface as usize] = true;
            Ok(())
        }

        fn claim_interface(&mut self, iface: u8) -> Result<()> {
            if self.fail_claim_on == Some(iface) {
                return Err(Error::usb(Phase::Claim, rusb::Error::Busy));
            }
            self.calls.push(Call::ClaimInterface(iface));
            self.claimed[iface as usize] = true;
            Ok(())
        }

        fn release_interface(&mut self, iface: u8) -> Result<()> {
            self.calls.push(Call::ReleaseInterface(iface));
            self.claimed[iface as usize] = false;
            Ok(())
        }

        fn send_frame(&mut self, frame: &CommandFrame) -> Result<usize> {
            if self.fail_transfer {
                return Err(Error::usb(Phase::Transfer, rusb::Error::NoDevice));
            }
            self.calls.push(Call::SendFrame(*frame));
            Ok(self.transfer_result)
        }

        fn settle(&mut self, duration: Duration) {
            // Recorded instead of slept so tests stay fast.
            self.calls.push(Call::Settle(duration));
        }
    }
}
