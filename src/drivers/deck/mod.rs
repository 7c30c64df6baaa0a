pub mod driver;
pub mod hid_report;
#[cfg(test)]
mod hid_report_test;

/// Vendor ID
pub const VID: u16 = 0x28de;
/// Product ID
pub const PID: u16 = 0x1205;
