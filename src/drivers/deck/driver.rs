use std::{error::Error, ffi::CString};

use hidapi::HidDevice;
use packed_struct::prelude::*;

use super::hid_report::{
    PackedHapticPulseReport, PackedInputDataReport, PackedMappingsReport, PadSide, ReportType,
};
use super::{PID, VID};

const PACKET_SIZE: usize = 64;
/// How long a single read may block before giving the device loop a chance to
/// service pending commands.
const HID_TIMEOUT: i32 = 10;

/// Handle to the built-in controller's hidraw interface.
pub struct Driver {
    device: HidDevice,
}

impl Driver {
    pub fn new(path: String) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let path = CString::new(path)?;
        let api = hidapi::HidApi::new()?;
        let device = api.open_path(&path)?;
        let info = device.get_device_info()?;
        if info.vendor_id() != VID || info.product_id() != PID {
            return Err("Device is not a supported deck controller".into());
        }

        Ok(Self { device })
    }

    /// Read the next input report from the device. Returns [None] if no report
    /// arrived within the read timeout.
    pub fn read_report(
        &mut self,
    ) -> Result<Option<PackedInputDataReport>, Box<dyn Error + Send + Sync>> {
        let mut buf = [0; PACKET_SIZE];
        let bytes_read = self.device.read_timeout(&mut buf[..], HID_TIMEOUT)?;
        if bytes_read == 0 {
            return Ok(None);
        }

        // All input report descriptors are 64 bytes
        if bytes_read != PACKET_SIZE {
            log::warn!("Invalid input report size received: {bytes_read}/{PACKET_SIZE}");
            return Ok(None);
        }

        let report = PackedInputDataReport::unpack(&buf)?;
        Ok(Some(report))
    }

    /// Enable or disable the controller's built-in input mappings ("lizard
    /// mode"), which emulate mouse/keyboard when no driver is attached.
    pub fn set_lizard_mode(&self, enabled: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
        let report = match enabled {
            true => PackedMappingsReport {
                report_id: ReportType::DefaultMappings as u8,
            },
            false => PackedMappingsReport {
                report_id: ReportType::ClearMappings as u8,
            },
        };

        let buf = report.pack()?;
        let _bytes_written = self.device.write(&buf)?;

        Ok(())
    }

    /// Send a single haptic pulse command to the given trackpad actuator.
    pub fn haptic_pulse(
        &mut self,
        side: PadSide,
        amplitude: u16,
        period: u16,
        count: u16,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let report = PackedHapticPulseReport {
            side,
            amplitude: Integer::from_primitive(amplitude),
            period: Integer::from_primitive(period),
            count: Integer::from_primitive(count),
            ..Default::default()
        };

        let buf = report.pack()?;
        let _bytes_written = self.device.write(&buf)?;

        Ok(())
    }
}
