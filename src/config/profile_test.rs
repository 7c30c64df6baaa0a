use super::{DeviceProfile, MotionAxis};

#[test]
fn test_default_profile_matches_device_mapping() {
    let profile = DeviceProfile::default();

    // Pitch and roll are swapped by the sensor mounting
    assert_eq!(profile.gyro.pitch.axis, MotionAxis::GyroRoll);
    assert!(profile.gyro.pitch.invert);
    assert_eq!(profile.gyro.roll.axis, MotionAxis::GyroPitch);
    assert!(!profile.gyro.roll.invert);
    assert_eq!(profile.gyro.yaw.axis, MotionAxis::GyroYaw);
    assert!(profile.gyro.yaw.invert);

    assert_eq!(profile.accel.y.axis, MotionAxis::AccelZ);
    assert_eq!(profile.accel.z.axis, MotionAxis::AccelY);

    assert_eq!(profile.angular_full_scale, 2000.0);
    assert_eq!(profile.accel_full_scale, 2.0);
    assert_eq!(profile.haptics.amplitude_ceiling, 12);
    assert_eq!(profile.haptics.period_ceiling, 30);
    assert_eq!(profile.thresholds.trigger, 30);
    assert_eq!(profile.thresholds.stick_deadzone, 7849);
}

#[test]
fn test_profile_from_yaml() {
    let content = "
name: Test Device
gyro:
  pitch:
    axis: gyro_pitch
  roll:
    axis: gyro_roll
    invert: true
  yaw:
    axis: gyro_yaw
angular_full_scale: 1000.0
thresholds:
  trigger: 64
  stick_deadzone: 4000
";
    let profile = DeviceProfile::from_yaml(content).expect("should load profile");
    assert_eq!(profile.name, "Test Device");
    assert_eq!(profile.gyro.pitch.axis, MotionAxis::GyroPitch);
    assert!(!profile.gyro.pitch.invert);
    assert!(profile.gyro.roll.invert);
    assert_eq!(profile.angular_full_scale, 1000.0);
    assert_eq!(profile.thresholds.trigger, 64);
    assert_eq!(profile.thresholds.stick_deadzone, 4000);
    // Unspecified sections fall back to the device defaults
    assert_eq!(profile.accel, Default::default());
    assert_eq!(profile.haptics, Default::default());
}

#[test]
fn test_profile_yaml_roundtrip() {
    let profile = DeviceProfile::default();
    let yaml = serde_yaml::to_string(&profile).expect("should serialize profile");
    let decoded = DeviceProfile::from_yaml(&yaml).expect("should deserialize profile");
    assert_eq!(decoded, profile);
}
