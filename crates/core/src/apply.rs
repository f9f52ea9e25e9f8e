//! Setting orchestration: validate, open a session, send frames in the
//! firmware-required order, and close the session no matter what.

use std::time::Duration;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::frames::{self, CommandFrame, FRAME_LEN};
use crate::safety;
use crate::session::Session;
use crate::settings::{ConfigRequest, Debounce, MotionSync, PollingRate};
use crate::transport::Dongle;

/// Pause between a polling-rate write and a debounce write. Back-to-back
/// commands make the firmware drop the debounce change.
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// The setting an outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    PollingRate(PollingRate),
    Debounce(Debounce),
    MotionSync(MotionSync),
}

impl std::fmt::Display for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PollingRate(rate) => write!(f, "polling rate {rate}"),
            Self::Debounce(delay) => write!(f, "debounce {delay}"),
            Self::MotionSync(state) => write!(f, "MotionSync {state}"),
        }
    }
}

/// Result of one transfer.
///
/// A transferred count of 17 is the only value observed from a successful
/// write. Other counts have never been shown to mean failure, so they are
/// reported as unconfirmed rather than treated as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    Confirmed,
    Unconfirmed { transferred: usize },
}

/// Per-setting outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub setting: Setting,
    pub status: ApplyStatus,
}

/// Apply every requested setting over one exclusive session.
///
/// Settings go out in a fixed order — polling rate, then debounce, then
/// MotionSync — with a single settling delay between the first two when
/// both are requested. The session is closed on every path; a transfer
/// error aborts the remaining settings but still restores the device.
pub fn apply<D: Dongle>(dongle: &mut D, request: &ConfigRequest) -> Result<Vec<Outcome>> {
    if request.is_empty() {
        return Err(Error::NothingRequested);
    }
    if let Some(rate) = request.polling_rate {
        safety::check_rate_cap(rate, dongle.product_id())?;
    }

    let mut session = Session::open(dongle)?;
    match send_all(&mut session, request) {
        Ok(outcomes) => {
            session.close()?;
            Ok(outcomes)
        }
        Err(e) => {
            if let Err(close_err) = session.close() {
                warn!(error = %close_err, "Restore failed after transfer error");
            }
            Err(e)
        }
    }
}

fn send_all<D: Dongle>(session: &mut Session<D>, request: &ConfigRequest) -> Result<Vec<Outcome>> {
    let mut outcomes = Vec::new();

    if let Some(rate) = request.polling_rate {
        let frame = frames::polling_rate_frame(rate);
        outcomes.push(send_one(session, Setting::PollingRate(rate), &frame)?);
        if request.debounce.is_some() {
            session.settle(SETTLE_DELAY);
        }
    }

    if let Some(delay) = request.debounce {
        if delay == Debounce::Ms0 {
            warn!("{}", frames::DEBOUNCE_ZERO_WARNING);
        }
        let frame = frames::debounce_frame(delay);
        outcomes.push(send_one(session, Setting::Debounce(delay), &frame)?);
    }

    if let Some(state) = request.motion_sync {
        let frame = frames::motion_sync_frame(state);
        outcomes.push(send_one(session, Setting::MotionSync(state), &frame)?);
    }

    Ok(outcomes)
}

fn send_one<D: Dongle>(
    session: &mut Session<D>,
    setting: Setting,
    frame: &CommandFrame,
) -> Result<Outcome> {
    let transferred = session.send_frame(frame)?;
    let status = if transferred == FRAME_LEN {
        info!(setting = %setting, "Setting applied");
        ApplyStatus::Confirmed
    } else {
        warn!(
            setting = %setting,
            transferred,
            "Transfer completed with unexpected length; result unconfirmed"
        );
        ApplyStatus::Unconfirmed { transferred }
    };
    Ok(Outcome { setting, status })
}
