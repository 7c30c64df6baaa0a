//! Canonical controller state shared by every consumer of the session.
use bitflags::bitflags;

bitflags! {
    /// Semantic button bitmask. Bits are stable across devices; device-unique
    /// inputs land in the OEM range.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ButtonFlags: u64 {
        /// Primary face buttons (south, east, west, north)
        const B1 = 1 << 0;
        const B2 = 1 << 1;
        const B3 = 1 << 2;
        const B4 = 1 << 3;

        const START = 1 << 4;
        const BACK = 1 << 5;
        /// Platform/guide button
        const SPECIAL = 1 << 6;

        const LEFT_SHOULDER = 1 << 7;
        const RIGHT_SHOULDER = 1 << 8;
        /// Trigger pull past the profile threshold
        const LEFT_TRIGGER = 1 << 9;
        const RIGHT_TRIGGER = 1 << 10;
        const LEFT_THUMB = 1 << 11;
        const RIGHT_THUMB = 1 << 12;

        const DPAD_UP = 1 << 13;
        const DPAD_DOWN = 1 << 14;
        const DPAD_LEFT = 1 << 15;
        const DPAD_RIGHT = 1 << 16;

        /// Stick deflection past the profile deadzone
        const LSTICK_UP = 1 << 17;
        const LSTICK_DOWN = 1 << 18;
        const LSTICK_LEFT = 1 << 19;
        const LSTICK_RIGHT = 1 << 20;
        const RSTICK_UP = 1 << 21;
        const RSTICK_DOWN = 1 << 22;
        const RSTICK_LEFT = 1 << 23;
        const RSTICK_RIGHT = 1 << 24;

        /// Device-unique inputs (quick access, back grips, touch and press
        /// states, ...)
        const OEM1 = 1 << 25;
        const OEM2 = 1 << 26;
        const OEM3 = 1 << 27;
        const OEM4 = 1 << 28;
        const OEM5 = 1 << 29;
        const OEM6 = 1 << 30;
        const OEM7 = 1 << 31;
        const OEM8 = 1 << 32;
        const OEM9 = 1 << 33;
        const OEM10 = 1 << 34;
        const OEM11 = 1 << 35;
    }
}

/// Device-independent controller state, recomputed in full from each raw
/// input report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanonicalControllerState {
    pub buttons: ButtonFlags,

    /// Stick positions in the raw signed range
    pub left_thumb_x: i16,
    pub left_thumb_y: i16,
    pub right_thumb_x: i16,
    pub right_thumb_y: i16,

    /// Trigger pull rescaled to 0..=255
    pub left_trigger: u8,
    pub right_trigger: u8,

    /// Trackpad positions shifted into the unsigned canonical space; the
    /// resting center is 32767.
    pub left_pad_x: u16,
    pub left_pad_y: u16,
    pub right_pad_x: u16,
    pub right_pad_y: u16,

    pub left_pad_touch: bool,
    pub left_pad_click: bool,
    pub right_pad_touch: bool,
    pub right_pad_click: bool,
}

/// One normalized IMU sample. Gyro axes are in degrees per second, accel
/// axes in units of standard gravity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSample {
    pub gyro_pitch: f32,
    pub gyro_roll: f32,
    pub gyro_yaw: f32,
    pub accel_x: f32,
    pub accel_y: f32,
    pub accel_z: f32,
}
