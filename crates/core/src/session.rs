//! Exclusive device session: kernel-driver detach plus interface claim on
//! open, guaranteed release plus reattach on every exit path.
//!
//! The session is the only place that mutates interface ownership. Open
//! and close are strictly paired: `close` is the explicit path whose
//! restore errors the caller can observe, and `Drop` backstops any path
//! that unwinds early so the mouse is never left without its kernel
//! driver.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::frames::{CommandFrame, FRAME_LEN};
use crate::transport::Dongle;

/// What `open` did to one interface, so restore can undo exactly that.
#[derive(Debug, Clone, Copy)]
struct InterfaceState {
    index: u8,
    detached: bool,
    claimed: bool,
}

/// An open exclusive session over the dongle.
///
/// Owns every interface of the active configuration for its lifetime.
#[derive(Debug)]
pub struct Session<'a, D: Dongle> {
    dongle: &'a mut D,
    interfaces: Vec<InterfaceState>,
    closed: bool,
}

impl<'a, D: Dongle> Session<'a, D> {
    /// Take exclusive control of every interface of the active
    /// configuration: detach the kernel driver where it is attached, then
    /// claim the interface.
    ///
    /// On a failure partway through, interfaces already taken are released
    /// and reattached before the original error is returned.
    pub fn open(dongle: &'a mut D) -> Result<Self> {
        let count = dongle.interface_count()?;
        debug!(interfaces = count, "Opening exclusive session");

        let mut taken: Vec<InterfaceState> = Vec::with_capacity(count as usize);
        for index in 0..count {
            let mut state = InterfaceState {
                index,
                detached: false,
                claimed: false,
            };
            let result = Self::take_interface(dongle, &mut state);
            // A detach may have succeeded even when the claim failed, so
            // the partial state is restored either way.
            taken.push(state);
            if let Err(e) = result {
                warn!(iface = index, error = %e, "Interface takeover failed, rolling back");
                let _ = Self::restore_interfaces(dongle, &taken);
                return Err(e);
            }
        }

        Ok(Self {
            dongle,
            interfaces: taken,
            closed: false,
        })
    }

    fn take_interface(dongle: &mut D, state: &mut InterfaceState) -> Result<()> {
        if dongle.kernel_driver_active(state.index)? {
            dongle.detach_kernel_driver(state.index)?;
            state.detached = true;
        }
        dongle.claim_interface(state.index)?;
        state.claimed = true;
        trace!(iface = state.index, detached = state.detached, "Interface taken");
        Ok(())
    }

    /// Undo in reverse order of acquisition; keep going past individual
    /// failures and report the first one.
    fn restore_interfaces(dongle: &mut D, taken: &[InterfaceState]) -> Result<()> {
        let mut first_err = None;
        for state in taken.iter().rev() {
            if state.claimed {
                if let Err(e) = dongle.release_interface(state.index) {
                    warn!(iface = state.index, error = %e, "Failed to release interface");
                    first_err.get_or_insert(e);
                }
            }
            if state.detached {
                if let Err(e) = dongle.attach_kernel_driver(state.index) {
                    warn!(iface = state.index, error = %e, "Failed to reattach kernel driver");
                    first_err.get_or_insert(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Send one vendor frame over the session.
    ///
    /// Returns the byte count the device handle reports. 17 is the only
    /// count confirmed to mean success; other values are passed through
    /// to the caller untouched, not treated as errors.
    pub fn send_frame(&mut self, frame: &CommandFrame) -> Result<usize> {
        trace!(frame = format_args!("{frame:02X?}"), "TX vendor frame");
        let transferred = self.dongle.send_frame(frame)?;
        if transferred != FRAME_LEN {
            warn!(transferred, expected = FRAME_LEN, "Unexpected transfer length");
        }
        Ok(transferred)
    }

    /// Pause to let the firmware settle between writes.
    pub fn settle(&mut self, duration: Duration) {
        debug!(?duration, "Settling before next write");
        self.dongle.settle(duration);
    }

    /// Release every interface and hand the device back to the kernel.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        let result = Self::restore_interfaces(self.dongle, &self.interfaces);
        debug!("Session closed");
        result
    }
}

impl<D: Dongle> Drop for Session<'_, D> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = Self::restore_interfaces(self.dongle, &self.interfaces) {
            warn!(error = %e, "Failed to restore device state while unwinding");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Phase};
    use crate::frames;
    use crate::pids;
    use crate::settings::PollingRate;
    use crate::transport::fake::{Call, FakeDongle};

    #[test]
    fn open_detaches_and_claims_every_interface() {
        let mut dongle = FakeDongle::new(pids::DONGLE_4K, 3);
        let session = Session::open(&mut dongle).unwrap();
        session.close().unwrap();

        assert_eq!(
            dongle.calls[..6],
            [
                Call::DetachKernelDriver(0),
                Call::ClaimInterface(0),
                Call::DetachKernelDriver(1),
                Call::ClaimInterface(1),
                Call::DetachKernelDriver(2),
                Call::ClaimInterface(2),
            ]
        );
        assert!(dongle.is_restored());
    }

    #[test]
    fn close_restores_in_reverse_order() {
        let mut dongle = FakeDongle::new(pids::DONGLE_4K, 2);
        let session = Session::open(&mut dongle).unwrap();
        session.close().unwrap();

        assert_eq!(
            dongle.calls[4..],
            [
                Call::ReleaseInterface(1),
                Call::AttachKernelDriver(1),
                Call::ReleaseInterface(0),
                Call::AttachKernelDriver(0),
            ]
        );
    }

    #[test]
    fn partial_open_rolls_back_claimed_prefix() {
        let mut dongle = FakeDongle::new(pids::DONGLE_4K, 3);
        dongle.fail_claim_on = Some(2);

        let err = Session::open(&mut dongle).unwrap_err();
        assert!(matches!(
            err,
            Error::Usb {
                phase: Phase::Claim,
                ..
            }
        ));

        // Interfaces 0 and 1 were fully taken; 2 was only detached. All
        // three must be handed back to the kernel.
        assert!(dongle.is_restored());
        assert_eq!(
            dongle.calls[5..],
            [
                Call::AttachKernelDriver(2),
                Call::ReleaseInterface(1),
                Call::AttachKernelDriver(1),
                Call::ReleaseInterface(0),
                Call::AttachKernelDriver(0),
            ]
        );
    }

    #[test]
    fn drop_restores_without_explicit_close() {
        let mut dongle = FakeDongle::new(pids::DONGLE_4K, 2);
        {
            let _session = Session::open(&mut dongle).unwrap();
            // Dropped here, simulating an early return.
        }
        assert!(dongle.is_restored());
    }

    #[test]
    fn send_frame_reports_transfer_count_verbatim() {
        let mut dongle = FakeDongle::new(pids::DONGLE_4K, 1);
        dongle.transfer_result = 5;

        let mut session = Session::open(&mut dongle).unwrap();
        let frame = frames::polling_rate_frame(PollingRate::Hz500);
        let transferred = session.send_frame(&frame).unwrap();
        session.close().unwrap();

        assert_eq!(transferred, 5);
        assert_eq!(dongle.sent_frames(), vec![frame]);
    }

    #[test]
    fn already_detached_interfaces_are_not_reattached() {
        let mut dongle = FakeDongle::new(pids::DONGLE_4K, 1);
        // Kernel never owned the interface in this run.
        dongle.detach_kernel_driver(0).unwrap();
        dongle.calls.clear();

        let session = Session::open(&mut dongle).unwrap();
        session.close().unwrap();

        assert_eq!(
            dongle.calls,
            [Call::ClaimInterface(0), Call::ReleaseInterface(0)]
        );
    }
}
