#[cfg(test)]
mod profile_test;

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents all possible errors loading a [DeviceProfile]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
}

/// Physical motion axis in the raw input report.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MotionAxis {
    AccelX,
    AccelY,
    AccelZ,
    GyroPitch,
    GyroYaw,
    GyroRoll,
}

/// One entry of the axis-swap table: which physical axis feeds a logical axis
/// and with what sign.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AxisSource {
    pub axis: MotionAxis,
    #[serde(default)]
    pub invert: bool,
}

impl AxisSource {
    fn new(axis: MotionAxis, invert: bool) -> Self {
        Self { axis, invert }
    }
}

/// Axis-swap table for the angular velocity channels.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GyroAxisMap {
    pub pitch: AxisSource,
    pub roll: AxisSource,
    pub yaw: AxisSource,
}

impl Default for GyroAxisMap {
    fn default() -> Self {
        // Sensor mounting inside the device swaps pitch and roll
        Self {
            pitch: AxisSource::new(MotionAxis::GyroRoll, true),
            roll: AxisSource::new(MotionAxis::GyroPitch, false),
            yaw: AxisSource::new(MotionAxis::GyroYaw, true),
        }
    }
}

/// Axis-swap table for the acceleration channels.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AccelAxisMap {
    pub x: AxisSource,
    pub y: AxisSource,
    pub z: AxisSource,
}

impl Default for AccelAxisMap {
    fn default() -> Self {
        Self {
            x: AxisSource::new(MotionAxis::AccelX, true),
            y: AxisSource::new(MotionAxis::AccelZ, true),
            z: AxisSource::new(MotionAxis::AccelY, true),
        }
    }
}

/// Haptic actuator response constants.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct HapticProfile {
    /// Linear-response limit of the actuator amplitude
    pub amplitude_ceiling: u8,
    /// Period at zero amplitude; the actuator period shortens as amplitude
    /// grows
    pub period_ceiling: u8,
}

impl Default for HapticProfile {
    fn default() -> Self {
        Self {
            amplitude_ceiling: 12,
            period_ceiling: 30,
        }
    }
}

/// Deadzone policy shared with the other device drivers.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Thresholds {
    /// Trigger threshold on the canonical 0..=255 trigger scale
    pub trigger: u8,
    /// Stick deadzone on the raw signed axis range
    pub stick_deadzone: i16,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            trigger: 30,
            stick_deadzone: 7849,
        }
    }
}

/// Per-model device profile: motion axis-swap tables, scale constants and
/// deadzone policy. Loaded once at startup and immutable thereafter.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DeviceProfile {
    pub name: String,
    #[serde(default)]
    pub gyro: GyroAxisMap,
    #[serde(default)]
    pub accel: AccelAxisMap,
    /// Angular velocity full scale in degrees/second
    #[serde(default = "default_angular_full_scale")]
    pub angular_full_scale: f32,
    /// Acceleration full scale in g
    #[serde(default = "default_accel_full_scale")]
    pub accel_full_scale: f32,
    #[serde(default)]
    pub haptics: HapticProfile,
    #[serde(default)]
    pub thresholds: Thresholds,
}

fn default_angular_full_scale() -> f32 {
    2000.0
}

fn default_accel_full_scale() -> f32 {
    2.0
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            name: "Steam Deck Controller".to_string(),
            gyro: GyroAxisMap::default(),
            accel: AccelAxisMap::default(),
            angular_full_scale: default_angular_full_scale(),
            accel_full_scale: default_accel_full_scale(),
            haptics: HapticProfile::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl DeviceProfile {
    /// Load a [DeviceProfile] from the given YAML string
    pub fn from_yaml(content: &str) -> Result<DeviceProfile, LoadError> {
        let profile: DeviceProfile = serde_yaml::from_str(content)?;
        Ok(profile)
    }

    /// Load a [DeviceProfile] from the given YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<DeviceProfile, LoadError> {
        let file = std::fs::File::open(path)?;
        let profile: DeviceProfile = serde_yaml::from_reader(file)?;
        Ok(profile)
    }
}
