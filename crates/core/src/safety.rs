//! Safety layer: validates all requested values against the domains the
//! firmware is known to accept, before any USB communication happens.
//!
//! # Dragonfly value domains
//!
//! ## Polling rate
//! - **Supported values**: 125, 250, 500, 1000, 2000, 4000 Hz
//! - **Dongle cap**: the 1K dongle (PID 0xF58A) accepts at most 1000 Hz;
//!   2000/4000 Hz require the 4K dongle (PID 0xF505)
//!
//! ## Debounce
//! - **Supported values**: 0, 1, 2, 4, 8, 15, 20 ms
//! - **Note**: the 0 ms frame exists in the capture but its effect is
//!   unconfirmed; see [`crate::frames::DEBOUNCE_ZERO_WARNING`]
//!
//! ## Invariants
//! 1. Only enumerated values reach the frame catalog (no raw pass-through)
//! 2. The 1K-dongle cap is enforced before a session is opened
//! 3. All validation happens BEFORE any USB communication — no invalid
//!    request ever reaches the device

use crate::error::{Error, Result};
use crate::pids;
use crate::settings::{Debounce, PollingRate};

/// Highest polling rate the 1K dongle accepts.
pub const RATE_CAP_1K_HZ: u16 = 1000;

/// Reject polling rates the connected dongle variant cannot do.
pub fn check_rate_cap(rate: PollingRate, product_id: u16) -> Result<()> {
    if product_id == pids::DONGLE_1K && rate.as_hz() > RATE_CAP_1K_HZ {
        return Err(Error::RateCapExceeded {
            rate_hz: rate.as_hz(),
            cap_hz: RATE_CAP_1K_HZ,
        });
    }
    Ok(())
}

/// Validate a raw polling-rate value against the enumerated domain and the
/// dongle's cap.
pub fn validate_polling_rate(hz: u16, product_id: u16) -> Result<PollingRate> {
    let rate = PollingRate::from_hz(hz).ok_or(Error::UnsupportedValue {
        setting: "polling rate",
        value: hz as u32,
    })?;
    check_rate_cap(rate, product_id)?;
    Ok(rate)
}

/// Validate a raw debounce value against the enumerated domain.
pub fn validate_debounce(ms: u8) -> Result<Debounce> {
    Debounce::from_ms(ms).ok_or(Error::UnsupportedValue {
        setting: "debounce",
        value: ms as u32,
    })
}
