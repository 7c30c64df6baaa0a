//! Translates raw input reports into the canonical controller state.
use packed_struct::types::SizedInteger;

use crate::config::Thresholds;
use crate::drivers::deck::hid_report::{PackedInputDataReport, AXIS_MAX};

use super::state::{ButtonFlags, CanonicalControllerState};

/// Normalizes raw input reports into [CanonicalControllerState], skipping
/// reports that carry no change over the previously observed one.
pub struct StateNormalizer {
    thresholds: Thresholds,
    prev_report: Option<PackedInputDataReport>,
    prev_injected: ButtonFlags,
}

impl StateNormalizer {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            prev_report: None,
            prev_injected: ButtonFlags::empty(),
        }
    }

    /// Normalize the given report. Returns [None] when the report state and
    /// the injected button mask are both unchanged from the previous call, so
    /// callers can skip republishing an identical state.
    pub fn update(
        &mut self,
        report: &PackedInputDataReport,
        injected: ButtonFlags,
    ) -> Option<CanonicalControllerState> {
        if let Some(prev) = self.prev_report.as_ref() {
            if prev.same_state(report) && injected == self.prev_injected {
                return None;
            }
        }

        self.prev_report = Some(*report);
        self.prev_injected = injected;

        Some(translate(report, injected, &self.thresholds))
    }
}

/// Pure translation of a raw report into the canonical state. The output is
/// fully recomputed from the inputs on every call.
pub fn translate(
    report: &PackedInputDataReport,
    injected: ButtonFlags,
    thresholds: &Thresholds,
) -> CanonicalControllerState {
    let mut state = CanonicalControllerState {
        buttons: injected,
        ..Default::default()
    };

    // Physical button -> semantic flag mapping. Order-independent; each entry
    // OR-sets one bit.
    let mapping = [
        (report.a, ButtonFlags::B1),
        (report.b, ButtonFlags::B2),
        (report.x, ButtonFlags::B3),
        (report.y, ButtonFlags::B4),
        (report.options, ButtonFlags::START),
        (report.menu, ButtonFlags::BACK),
        (report.steam, ButtonFlags::SPECIAL),
        (report.quick_access, ButtonFlags::OEM1),
        (report.l1, ButtonFlags::LEFT_SHOULDER),
        (report.r1, ButtonFlags::RIGHT_SHOULDER),
        (report.l3, ButtonFlags::LEFT_THUMB),
        (report.r3, ButtonFlags::RIGHT_THUMB),
        (report.l_stick_touch, ButtonFlags::OEM2),
        (report.r_stick_touch, ButtonFlags::OEM3),
        (report.l4, ButtonFlags::OEM4),
        (report.l5, ButtonFlags::OEM5),
        (report.r4, ButtonFlags::OEM6),
        (report.r5, ButtonFlags::OEM7),
        (report.up, ButtonFlags::DPAD_UP),
        (report.down, ButtonFlags::DPAD_DOWN),
        (report.left, ButtonFlags::DPAD_LEFT),
        (report.right, ButtonFlags::DPAD_RIGHT),
    ];
    for (pressed, flag) in mapping {
        if pressed {
            state.buttons |= flag;
        }
    }

    // Triggers are rescaled into the canonical 0..=255 range so every device
    // driver shares one trigger threshold.
    state.left_trigger = rescale_trigger(report.l_trigg.to_primitive());
    state.right_trigger = rescale_trigger(report.r_trigg.to_primitive());
    if state.left_trigger > thresholds.trigger {
        state.buttons |= ButtonFlags::LEFT_TRIGGER;
    }
    if state.right_trigger > thresholds.trigger {
        state.buttons |= ButtonFlags::RIGHT_TRIGGER;
    }

    // Sticks pass through unscaled; direction bits come from a per-axis
    // deadzone compare against the signed value.
    state.left_thumb_x = report.l_stick_x.to_primitive();
    state.left_thumb_y = report.l_stick_y.to_primitive();
    state.right_thumb_x = report.r_stick_x.to_primitive();
    state.right_thumb_y = report.r_stick_y.to_primitive();

    let deadzone = thresholds.stick_deadzone;
    if state.left_thumb_x < -deadzone {
        state.buttons |= ButtonFlags::LSTICK_LEFT;
    }
    if state.left_thumb_x > deadzone {
        state.buttons |= ButtonFlags::LSTICK_RIGHT;
    }
    if state.left_thumb_y < -deadzone {
        state.buttons |= ButtonFlags::LSTICK_DOWN;
    }
    if state.left_thumb_y > deadzone {
        state.buttons |= ButtonFlags::LSTICK_UP;
    }
    if state.right_thumb_x < -deadzone {
        state.buttons |= ButtonFlags::RSTICK_LEFT;
    }
    if state.right_thumb_x > deadzone {
        state.buttons |= ButtonFlags::RSTICK_RIGHT;
    }
    if state.right_thumb_y < -deadzone {
        state.buttons |= ButtonFlags::RSTICK_DOWN;
    }
    if state.right_thumb_y > deadzone {
        state.buttons |= ButtonFlags::RSTICK_UP;
    }

    // Trackpad coordinates are centered signed values; shift them into the
    // unsigned canonical space, flipping Y so increasing Y is visually
    // downward.
    state.left_pad_x = remap_pad_x(report.l_pad_x.to_primitive());
    state.left_pad_y = remap_pad_y(report.l_pad_y.to_primitive());
    state.right_pad_x = remap_pad_x(report.r_pad_x.to_primitive());
    state.right_pad_y = remap_pad_y(report.r_pad_y.to_primitive());

    state.left_pad_touch = report.l_pad_touch;
    state.left_pad_click = report.l_pad_press;
    state.right_pad_touch = report.r_pad_touch;
    state.right_pad_click = report.r_pad_press;

    // Mirror pad activity into the device-unique bits so consumers that only
    // understand bitmasks still observe it.
    if state.left_pad_touch {
        state.buttons |= ButtonFlags::OEM8;
    }
    if state.left_pad_click {
        state.buttons |= ButtonFlags::OEM9;
    }
    if state.right_pad_touch {
        state.buttons |= ButtonFlags::OEM10;
    }
    if state.right_pad_click {
        state.buttons |= ButtonFlags::OEM11;
    }

    state
}

fn rescale_trigger(raw: u16) -> u8 {
    (raw as u32 * u8::MAX as u32 / AXIS_MAX as u32) as u8
}

fn remap_pad_x(raw: i16) -> u16 {
    (AXIS_MAX as i32 + raw as i32) as u16
}

fn remap_pad_y(raw: i16) -> u16 {
    (AXIS_MAX as i32 - raw as i32) as u16
}
