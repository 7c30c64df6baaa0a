//! Converts vibration requests into haptic pulses for the trackpad
//! actuators.
//!
//! The actuators are linear motors with a peak bell-curve response: the pulse
//! period shortens as the amplitude grows. Writes go through a [HapticSink]
//! so the curve mapping is testable without hardware.
use std::error::Error;

use crate::config::HapticProfile;
use crate::drivers::deck::driver::Driver;
use crate::drivers::deck::hid_report::PadSide;

/// Capability for issuing a haptic pulse to one actuator channel.
pub trait HapticSink {
    fn haptic_pulse(
        &mut self,
        side: PadSide,
        amplitude: u16,
        period: u16,
        count: u16,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

impl HapticSink for Driver {
    fn haptic_pulse(
        &mut self,
        side: PadSide,
        amplitude: u16,
        period: u16,
        count: u16,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        Driver::haptic_pulse(self, side, amplitude, period, count)
    }
}

/// Last-commanded on/off flag for one actuator channel.
#[derive(Debug, Default, Clone, Copy)]
struct HapticChannelState {
    on: bool,
}

/// Maps motor vibration levels onto actuator amplitude/period pairs, issuing
/// a hardware write only when a channel transitions between on and off.
pub struct HapticCurveMapper {
    profile: HapticProfile,
    left: HapticChannelState,
    right: HapticChannelState,
}

impl HapticCurveMapper {
    pub fn new(profile: HapticProfile) -> Self {
        Self {
            profile,
            left: HapticChannelState::default(),
            right: HapticChannelState::default(),
        }
    }

    /// Handle a vibration request. The large motor drives the left actuator
    /// and the small motor the right one; `strength` is the global vibration
    /// strength in 0.0..=1.0.
    pub fn set_vibration(
        &mut self,
        large_motor: u8,
        small_motor: u8,
        strength: f64,
        sink: &mut impl HapticSink,
    ) {
        let strength = strength.clamp(0.0, 1.0);
        Self::drive_channel(
            &mut self.left,
            PadSide::Left,
            large_motor,
            strength,
            &self.profile,
            sink,
        );
        Self::drive_channel(
            &mut self.right,
            PadSide::Right,
            small_motor,
            strength,
            &self.profile,
            sink,
        );
    }

    fn drive_channel(
        channel: &mut HapticChannelState,
        side: PadSide,
        level: u8,
        strength: f64,
        profile: &HapticProfile,
        sink: &mut impl HapticSink,
    ) {
        let on = level > 0;
        if on == channel.on {
            // Repeated identical requests never hit the device bus
            return;
        }

        let amplitude =
            (level as f64 * strength / u8::MAX as f64 * profile.amplitude_ceiling as f64) as u16;
        let period = (profile.period_ceiling as u16).saturating_sub(amplitude);
        let (amplitude, period) = if on { (amplitude, period) } else { (0, 0) };

        // Best-effort: the flag still advances on failure so the next
        // transition is computed correctly.
        if let Err(e) = sink.haptic_pulse(side, amplitude, period, 0) {
            log::debug!("Failed to send haptic pulse: {e:?}");
        }
        channel.on = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<(PadSide, u16, u16)>,
        fail: bool,
    }

    impl HapticSink for RecordingSink {
        fn haptic_pulse(
            &mut self,
            side: PadSide,
            amplitude: u16,
            period: u16,
            _count: u16,
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.writes.push((side, amplitude, period));
            if self.fail {
                return Err("write failed".into());
            }
            Ok(())
        }
    }

    #[test]
    fn test_debounce_issues_two_writes() {
        let mut mapper = HapticCurveMapper::new(HapticProfile::default());
        let mut sink = RecordingSink::default();

        // 0 -> 5 -> 5 -> 0 on the large motor
        mapper.set_vibration(0, 0, 1.0, &mut sink);
        mapper.set_vibration(5, 0, 1.0, &mut sink);
        mapper.set_vibration(5, 0, 1.0, &mut sink);
        mapper.set_vibration(0, 0, 1.0, &mut sink);

        assert_eq!(sink.writes.len(), 2);
        let (side, amplitude, _period) = sink.writes[0];
        assert_eq!(side, PadSide::Left);
        assert_eq!(amplitude, 5 * 12 / 255);
        // Off transition writes zeros
        assert_eq!(sink.writes[1], (PadSide::Left, 0, 0));
    }

    #[test]
    fn test_curve_at_full_level() {
        let mut mapper = HapticCurveMapper::new(HapticProfile::default());
        let mut sink = RecordingSink::default();

        mapper.set_vibration(255, 255, 1.0, &mut sink);
        assert_eq!(sink.writes.len(), 2);
        // amplitude = level * strength / 255 * ceiling; period = 30 - amplitude
        assert_eq!(sink.writes[0], (PadSide::Left, 12, 18));
        assert_eq!(sink.writes[1], (PadSide::Right, 12, 18));
    }

    #[test]
    fn test_strength_scales_amplitude() {
        let mut mapper = HapticCurveMapper::new(HapticProfile::default());
        let mut sink = RecordingSink::default();

        mapper.set_vibration(255, 0, 0.5, &mut sink);
        assert_eq!(sink.writes[0], (PadSide::Left, 6, 24));
    }

    #[test]
    fn test_failed_write_still_advances_flag() {
        let mut mapper = HapticCurveMapper::new(HapticProfile::default());
        let mut sink = RecordingSink {
            fail: true,
            ..Default::default()
        };

        mapper.set_vibration(255, 0, 1.0, &mut sink);
        mapper.set_vibration(0, 0, 1.0, &mut sink);
        // Both edges attempted despite the failures
        assert_eq!(sink.writes.len(), 2);
        assert_eq!(sink.writes[1], (PadSide::Left, 0, 0));
    }

    #[test]
    fn test_channels_are_independent() {
        let mut mapper = HapticCurveMapper::new(HapticProfile::default());
        let mut sink = RecordingSink::default();

        mapper.set_vibration(255, 0, 1.0, &mut sink);
        mapper.set_vibration(255, 128, 1.0, &mut sink);
        assert_eq!(sink.writes.len(), 2);
        assert_eq!(sink.writes[0].0, PadSide::Left);
        assert_eq!(sink.writes[1].0, PadSide::Right);
    }
}
