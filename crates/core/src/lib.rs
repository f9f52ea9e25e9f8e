//! open-dragonfly-core: vendor protocol and device session for VGN/VXE
//! Dragonfly mouse dongles.
//!
//! This crate provides the logic for changing polling rate, debounce delay,
//! and MotionSync on a Dragonfly wireless dongle: vendor command frames,
//! exclusive-access USB session management, and the orchestration that
//! applies a set of requested settings in one run.

pub mod apply;
pub mod device;
pub mod error;
pub mod frames;
pub mod safety;
pub mod session;
pub mod settings;
pub mod transport;

/// VGN/VXE USB Vendor ID.
pub const DRAGONFLY_VID: u16 = 0x3554;

/// Known Dragonfly dongle product IDs.
pub mod pids {
    /// 4K dongle (default target).
    pub const DONGLE_4K: u16 = 0xF505;
    /// 1K dongle — accepts at most 1000 Hz polling.
    pub const DONGLE_1K: u16 = 0xF58A;
}
