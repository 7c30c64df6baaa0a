//! Maps raw IMU axes into normalized motion samples using the device
//! profile's axis-swap table and full-scale constants.
use packed_struct::types::SizedInteger;

use crate::config::{AxisSource, DeviceProfile, MotionAxis};
use crate::drivers::deck::hid_report::{PackedInputDataReport, AXIS_MAX};

use super::state::MotionSample;

/// Normalize the raw IMU axes in the given report. Pure; the axis table and
/// scale constants come entirely from the profile.
pub fn normalize_motion(report: &PackedInputDataReport, profile: &DeviceProfile) -> MotionSample {
    MotionSample {
        gyro_pitch: scale_axis(report, profile.gyro.pitch, profile.angular_full_scale),
        gyro_roll: scale_axis(report, profile.gyro.roll, profile.angular_full_scale),
        gyro_yaw: scale_axis(report, profile.gyro.yaw, profile.angular_full_scale),
        accel_x: scale_axis(report, profile.accel.x, profile.accel_full_scale),
        accel_y: scale_axis(report, profile.accel.y, profile.accel_full_scale),
        accel_z: scale_axis(report, profile.accel.z, profile.accel_full_scale),
    }
}

fn scale_axis(report: &PackedInputDataReport, source: AxisSource, full_scale: f32) -> f32 {
    let raw = raw_axis(report, source.axis) as f32;
    let value = raw / AXIS_MAX as f32 * full_scale;
    if source.invert {
        -value
    } else {
        value
    }
}

fn raw_axis(report: &PackedInputDataReport, axis: MotionAxis) -> i16 {
    match axis {
        MotionAxis::AccelX => report.accel_x.to_primitive(),
        MotionAxis::AccelY => report.accel_y.to_primitive(),
        MotionAxis::AccelZ => report.accel_z.to_primitive(),
        MotionAxis::GyroPitch => report.pitch.to_primitive(),
        MotionAxis::GyroYaw => report.yaw.to_primitive(),
        MotionAxis::GyroRoll => report.roll.to_primitive(),
    }
}

#[cfg(test)]
mod tests {
    use packed_struct::prelude::*;

    use super::*;
    use crate::config::{AxisSource, GyroAxisMap};

    #[test]
    fn test_half_scale_inverted_pitch() {
        // Logical pitch fed by physical gyro X (pitch) with sign -1
        let mut profile = DeviceProfile::default();
        profile.gyro = GyroAxisMap {
            pitch: AxisSource {
                axis: MotionAxis::GyroPitch,
                invert: true,
            },
            roll: AxisSource {
                axis: MotionAxis::GyroRoll,
                invert: false,
            },
            yaw: AxisSource {
                axis: MotionAxis::GyroYaw,
                invert: false,
            },
        };

        let mut report = PackedInputDataReport::default();
        report.pitch = Integer::from_primitive(16383);

        let sample = normalize_motion(&report, &profile);
        assert!(
            (sample.gyro_pitch + 1000.0).abs() < 0.1,
            "expected ≈ -1000.0, got {}",
            sample.gyro_pitch
        );
    }

    #[test]
    fn test_default_profile_axis_swap() {
        let profile = DeviceProfile::default();

        let mut report = PackedInputDataReport::default();
        report.roll = Integer::from_primitive(32767);
        report.accel_z = Integer::from_primitive(-32767);

        let sample = normalize_motion(&report, &profile);
        // Pitch reads the physical roll axis, inverted
        assert!((sample.gyro_pitch + 2000.0).abs() < 0.1);
        // Roll reads the (zeroed) physical pitch axis
        assert_eq!(sample.gyro_roll, 0.0);
        // Accel Y reads the physical Z axis, inverted
        assert!((sample.accel_y - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_rest_report_is_all_zero() {
        let report = PackedInputDataReport::default();
        let sample = normalize_motion(&report, &DeviceProfile::default());
        assert_eq!(sample, MotionSample::default());
    }
}
