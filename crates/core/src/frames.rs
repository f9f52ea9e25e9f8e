//! Vendor command frame catalog.
//!
//! Every setting value maps to a fixed 17-byte frame captured from the
//! vendor software with Wireshark. The frames are opaque protocol data: no
//! individual byte has a confirmed meaning, only the complete sequence is
//! known to be understood by the dongle firmware for that setting/value
//! pair. Nothing here talks to hardware, so the tables can be checked
//! exhaustively in tests.

use crate::settings::{Debounce, MotionSync, PollingRate};

/// Every vendor command frame is exactly this long.
pub const FRAME_LEN: usize = 17;

/// One vendor command frame, ready to ship as a SET_REPORT payload.
pub type CommandFrame = [u8; FRAME_LEN];

/// Shown whenever the 0 ms debounce frame is sent. The capture for this
/// value exists, but the vendor software's lowest selectable debounce is
/// 1 ms, so it is unconfirmed that the firmware actually applies 0 ms.
pub const DEBOUNCE_ZERO_WARNING: &str =
    "it is unconfirmed whether the device actually applies 0 ms debounce; \
     the vendor software's lowest selectable value is 1 ms";

/// Frame for a polling rate change.
pub fn polling_rate_frame(rate: PollingRate) -> CommandFrame {
    match rate {
        PollingRate::Hz125 => [
            0x08, 0x07, 0x00, 0x00, 0x00, 0x06, 0x08, 0x4d, 0x01, 0x54, 0x00, 0x55, 0x00, 0x00,
            0x00, 0x00, 0x41,
        ],
        PollingRate::Hz250 => [
            0x08, 0x07, 0x00, 0x00, 0x00, 0x06, 0x04, 0x51, 0x01, 0x54, 0x00, 0x55, 0x00, 0x00,
            0x00, 0x00, 0x41,
        ],
        PollingRate::Hz500 => [
            0x08, 0x07, 0x00, 0x00, 0x00, 0x06, 0x02, 0x53, 0x01, 0x54, 0x00, 0x55, 0x00, 0x00,
            0x00, 0x00, 0x41,
        ],
        PollingRate::Hz1000 => [
            0x08, 0x07, 0x00, 0x00, 0x00, 0x06, 0x01, 0x54, 0x01, 0x54, 0x00, 0x55, 0x00, 0x00,
            0x00, 0x00, 0x41,
        ],
        PollingRate::Hz2000 => [
            0x08, 0x07, 0x00, 0x00, 0x00, 0x06, 0x10, 0x45, 0x01, 0x54, 0x00, 0x55, 0x00, 0x00,
            0x00, 0x00, 0x41,
        ],
        PollingRate::Hz4000 => [
            0x08, 0x07, 0x00, 0x00, 0x00, 0x06, 0x20, 0x35, 0x01, 0x54, 0x00, 0x55, 0x00, 0x00,
            0x00, 0x00, 0x41,
        ],
    }
}

/// Frame for a debounce delay change.
///
/// The 0 ms frame is kept byte-for-byte as captured even though its effect
/// is unconfirmed — see [`DEBOUNCE_ZERO_WARNING`].
pub fn debounce_frame(delay: Debounce) -> CommandFrame {
    match delay {
        Debounce::Ms0 => [
            0x08, 0x07, 0x00, 0x00, 0xa9, 0x0a, 0x00, 0x55, 0x01, 0x54, 0x06, 0x4f, 0x00, 0x55,
            0x00, 0x55, 0xea,
        ],
        Debounce::Ms1 => [
            0x08, 0x07, 0x00, 0x00, 0xa9, 0x0a, 0x01, 0x54, 0x01, 0x54, 0x06, 0x4f, 0x00, 0x55,
            0x00, 0x55, 0xea,
        ],
        Debounce::Ms2 => [
            0x08, 0x07, 0x00, 0x00, 0xa9, 0x0a, 0x02, 0x53, 0x01, 0x54, 0x06, 0x4f, 0x00, 0x55,
            0x00, 0x55, 0xea,
        ],
        Debounce::Ms4 => [
            0x08, 0x07, 0x00, 0x00, 0xa9, 0x0a, 0x04, 0x51, 0x01, 0x54, 0x06, 0x4f, 0x00, 0x55,
            0x00, 0x55, 0xea,
        ],
        Debounce::Ms8 => [
            0x08, 0x07, 0x00, 0x00, 0xa9, 0x0a, 0x08, 0x4d, 0x01, 0x54, 0x06, 0x4f, 0x00, 0x55,
            0x00, 0x55, 0xea,
        ],
        Debounce::Ms15 => [
            0x08, 0x07, 0x00, 0x00, 0xa9, 0x0a, 0x15, 0x40, 0x01, 0x54, 0x06, 0x4f, 0x00, 0x55,
            0x00, 0x55, 0xea,
        ],
        Debounce::Ms20 => [
            0x08, 0x07, 0x00, 0x00, 0xa9, 0x0a, 0x14, 0x41, 0x01, 0x54, 0x06, 0x4f, 0x00, 0x55,
            0x00, 0x55, 0xea,
        ],
    }
}

/// Frame for a MotionSync toggle. On and off differ only in bytes 8–9.
pub fn motion_sync_frame(state: MotionSync) -> CommandFrame {
    match state {
        MotionSync::On => [
            0x08, 0x07, 0x00, 0x00, 0xa9, 0x0a, 0x00, 0x55, 0x01, 0x54, 0x06, 0x4f, 0x00, 0x55,
            0x00, 0x55, 0xea,
        ],
        MotionSync::Off => [
            0x08, 0x07, 0x00, 0x00, 0xa9, 0x0a, 0x00, 0x55, 0x00, 0x55, 0x06, 0x4f, 0x00, 0x55,
            0x00, 0x55, 0xea,
        ],
    }
}
