//! Setting domains: polling rate, debounce delay, and MotionSync.

/// Polling rates understood by Dragonfly dongles.
///
/// Rates above 1000 Hz require the 4K dongle; see
/// [`crate::safety::validate_polling_rate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum PollingRate {
    Hz125 = 125,
    Hz250 = 250,
    Hz500 = 500,
    Hz1000 = 1000,
    Hz2000 = 2000,
    Hz4000 = 4000,
}

impl PollingRate {
    /// Convert from raw Hz value.
    pub fn from_hz(hz: u16) -> Option<Self> {
        match hz {
            125 => Some(Self::Hz125),
            250 => Some(Self::Hz250),
            500 => Some(Self::Hz500),
            1000 => Some(Self::Hz1000),
            2000 => Some(Self::Hz2000),
            4000 => Some(Self::Hz4000),
            _ => None,
        }
    }

    /// Get the Hz value.
    pub fn as_hz(&self) -> u16 {
        *self as u16
    }

    /// All supported rates.
    pub const ALL: &'static [PollingRate] = &[
        PollingRate::Hz125,
        PollingRate::Hz250,
        PollingRate::Hz500,
        PollingRate::Hz1000,
        PollingRate::Hz2000,
        PollingRate::Hz4000,
    ];
}

impl std::fmt::Display for PollingRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.as_hz())
    }
}

/// Debounce delays understood by Dragonfly dongles.
///
/// The firmware only accepts this fixed set of values; anything else is
/// rejected before reaching the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Debounce {
    Ms0 = 0,
    Ms1 = 1,
    Ms2 = 2,
    Ms4 = 4,
    Ms8 = 8,
    Ms15 = 15,
    Ms20 = 20,
}

impl Debounce {
    /// Convert from raw millisecond value.
    pub fn from_ms(ms: u8) -> Option<Self> {
        match ms {
            0 => Some(Self::Ms0),
            1 => Some(Self::Ms1),
            2 => Some(Self::Ms2),
            4 => Some(Self::Ms4),
            8 => Some(Self::Ms8),
            15 => Some(Self::Ms15),
            20 => Some(Self::Ms20),
            _ => None,
        }
    }

    /// Get the millisecond value.
    pub fn as_ms(&self) -> u8 {
        *self as u8
    }

    /// All supported delays.
    pub const ALL: &'static [Debounce] = &[
        Debounce::Ms0,
        Debounce::Ms1,
        Debounce::Ms2,
        Debounce::Ms4,
        Debounce::Ms8,
        Debounce::Ms15,
        Debounce::Ms20,
    ];
}

impl std::fmt::Display for Debounce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ms", self.as_ms())
    }
}

/// MotionSync toggle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionSync {
    On,
    Off,
}

impl MotionSync {
    /// Parse from a CLI-friendly string ("on"/"off", case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl std::fmt::Display for MotionSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The settings requested for one run. Any subset may be present; an empty
/// request is rejected before any device lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigRequest {
    pub polling_rate: Option<PollingRate>,
    pub debounce: Option<Debounce>,
    pub motion_sync: Option<MotionSync>,
}

impl ConfigRequest {
    /// True when no setting was requested.
    pub fn is_empty(&self) -> bool {
        self.polling_rate.is_none() && self.debounce.is_none() && self.motion_sync.is_none()
    }
}
