//! HID report layouts for the built-in Steam Deck style controller.
//!
//! Layout sources:
//! https://gitlab.com/open-sd/opensd/-/blob/main/src/opensdd/drivers/gamepad/hid_reports.hpp
//! https://github.com/torvalds/linux/blob/master/drivers/hid/hid-steam.c
use packed_struct::prelude::*;

/// Maximum magnitude of the signed stick/pad/trigger axes.
pub const AXIS_MAX: i16 = i16::MAX;

/// Seconds to sleep before built-in keyboard emulation has to be disabled
/// again with a CLEAR_MAPPINGS report.
pub const LIZARD_SLEEP_SEC: u64 = 2;

/// Report types used by this driver. The device supports many more, but only
/// these are written or read here.
pub enum ReportType {
    InputData = 0x09,
    ClearMappings = 0x81,
    DefaultMappings = 0x85,
    TriggerHapticPulse = 0x8f,
}

/// Which trackpad actuator a haptic pulse is addressed to. On the wire the
/// right actuator is position 0 and the left actuator is position 1.
#[derive(PrimitiveEnum_u8, Clone, Copy, PartialEq, Debug)]
pub enum PadSide {
    Right = 0,
    Left = 1,
    Both = 2,
}

#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "64")]
pub struct PackedInputDataReport {
    // byte 0-3
    #[packed_field(bytes = "0")]
    pub major_ver: u8, // Always 0x01
    #[packed_field(bytes = "1")]
    pub minor_ver: u8, // Always 0x00
    #[packed_field(bytes = "2")]
    pub report_type: u8, // Always 0x09 for input reports
    #[packed_field(bytes = "3")]
    pub report_size: u8, // Actual data length in bytes. Always 64.

    // byte 4-7
    #[packed_field(bytes = "4..=7", endian = "lsb")]
    pub frame: Integer<u32, packed_bits::Bits<32>>, // Input frame counter

    // byte 8
    #[packed_field(bits = "64")]
    pub a: bool, // Button cluster
    #[packed_field(bits = "65")]
    pub x: bool,
    #[packed_field(bits = "66")]
    pub b: bool,
    #[packed_field(bits = "67")]
    pub y: bool,
    #[packed_field(bits = "68")]
    pub l1: bool, // Shoulder buttons
    #[packed_field(bits = "69")]
    pub r1: bool,
    #[packed_field(bits = "70")]
    pub l2: bool, // Binary sensor for analog triggers
    #[packed_field(bits = "71")]
    pub r2: bool,

    // byte 9
    #[packed_field(bits = "72")]
    pub l5: bool, // L5 & R5 on the back of the device
    #[packed_field(bits = "73")]
    pub menu: bool, // Hamburger (☰) button above the right stick
    #[packed_field(bits = "74")]
    pub steam: bool, // Vendor button below the left trackpad
    #[packed_field(bits = "75")]
    pub options: bool, // Overlapping square (⧉) button above the left stick
    #[packed_field(bits = "76")]
    pub down: bool,
    #[packed_field(bits = "77")]
    pub left: bool,
    #[packed_field(bits = "78")]
    pub right: bool,
    #[packed_field(bits = "79")]
    pub up: bool, // Directional pad buttons

    // byte 10
    #[packed_field(bits = "80")]
    pub _unk4: bool,
    #[packed_field(bits = "81")]
    pub l3: bool, // Z-axis button on the left stick
    #[packed_field(bits = "82")]
    pub _unk3: bool,
    #[packed_field(bits = "83")]
    pub r_pad_touch: bool, // Binary "touch" sensor for trackpads
    #[packed_field(bits = "84")]
    pub l_pad_touch: bool,
    #[packed_field(bits = "85")]
    pub r_pad_press: bool, // Binary "press" sensor for trackpads
    #[packed_field(bits = "86")]
    pub l_pad_press: bool,
    #[packed_field(bits = "87")]
    pub r5: bool,

    // byte 11
    #[packed_field(bits = "88")]
    pub _unk11: bool,
    #[packed_field(bits = "89")]
    pub _unk10: bool,
    #[packed_field(bits = "90")]
    pub _unk9: bool,
    #[packed_field(bits = "91")]
    pub _unk8: bool,
    #[packed_field(bits = "92")]
    pub _unk7: bool,
    #[packed_field(bits = "93")]
    pub r3: bool, // Z-axis button on the right stick
    #[packed_field(bits = "94")]
    pub _unk6: bool,
    #[packed_field(bits = "95")]
    pub _unk5: bool,

    // byte 12
    #[packed_field(bytes = "12")]
    pub _unk12: u8,

    // byte 13
    #[packed_field(bits = "104")]
    pub r_stick_touch: bool, // Binary touch sensors on the stick controls
    #[packed_field(bits = "105")]
    pub l_stick_touch: bool,
    #[packed_field(bits = "106")]
    pub _unk16: bool,
    #[packed_field(bits = "107")]
    pub _unk15: bool,
    #[packed_field(bits = "108")]
    pub _unk14: bool,
    #[packed_field(bits = "109")]
    pub r4: bool,
    #[packed_field(bits = "110")]
    pub l4: bool, // L4 & R4 on the back of the device
    #[packed_field(bits = "111")]
    pub _unk13: bool,

    // byte 14
    #[packed_field(bits = "112")]
    pub _unk22: bool,
    #[packed_field(bits = "113")]
    pub _unk21: bool,
    #[packed_field(bits = "114")]
    pub _unk20: bool,
    #[packed_field(bits = "115")]
    pub _unk19: bool,
    #[packed_field(bits = "116")]
    pub _unk18: bool,
    #[packed_field(bits = "117")]
    pub quick_access: bool, // Quick access (…) button below the right trackpad
    #[packed_field(bits = "118")]
    pub _unk17: bool,
    #[packed_field(bits = "119")]
    pub _unk23: bool,

    // byte 15
    #[packed_field(bytes = "15")]
    pub _unk24: u8,

    // byte 16-23
    #[packed_field(bytes = "16..=17", endian = "lsb")]
    pub l_pad_x: Integer<i16, packed_bits::Bits<16>>, // Trackpad touch coordinates
    #[packed_field(bytes = "18..=19", endian = "lsb")]
    pub l_pad_y: Integer<i16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "20..=21", endian = "lsb")]
    pub r_pad_x: Integer<i16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "22..=23", endian = "lsb")]
    pub r_pad_y: Integer<i16, packed_bits::Bits<16>>,

    // byte 24-29
    #[packed_field(bytes = "24..=25", endian = "lsb")]
    pub accel_x: Integer<i16, packed_bits::Bits<16>>, // Accelerometers
    #[packed_field(bytes = "26..=27", endian = "lsb")]
    pub accel_y: Integer<i16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "28..=29", endian = "lsb")]
    pub accel_z: Integer<i16, packed_bits::Bits<16>>,

    // byte 30-35
    #[packed_field(bytes = "30..=31", endian = "lsb")]
    pub pitch: Integer<i16, packed_bits::Bits<16>>, // Gyro
    #[packed_field(bytes = "32..=33", endian = "lsb")]
    pub yaw: Integer<i16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "34..=35", endian = "lsb")]
    pub roll: Integer<i16, packed_bits::Bits<16>>,

    // byte 36-43
    #[packed_field(bytes = "36..=37", endian = "lsb")]
    pub _magn_0: Integer<i16, packed_bits::Bits<16>>, // Magnetometer
    #[packed_field(bytes = "38..=39", endian = "lsb")]
    pub _magn_1: Integer<i16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "40..=41", endian = "lsb")]
    pub _magn_2: Integer<i16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "42..=43", endian = "lsb")]
    pub _magn_3: Integer<i16, packed_bits::Bits<16>>,

    // byte 44-47
    #[packed_field(bytes = "44..=45", endian = "lsb")]
    pub l_trigg: Integer<u16, packed_bits::Bits<16>>, // Pressure sensors for L2 & R2 triggers
    #[packed_field(bytes = "46..=47", endian = "lsb")]
    pub r_trigg: Integer<u16, packed_bits::Bits<16>>,

    // byte 48-55
    #[packed_field(bytes = "48..=49", endian = "lsb")]
    pub l_stick_x: Integer<i16, packed_bits::Bits<16>>, // Analog thumbsticks
    #[packed_field(bytes = "50..=51", endian = "lsb")]
    pub l_stick_y: Integer<i16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "52..=53", endian = "lsb")]
    pub r_stick_x: Integer<i16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "54..=55", endian = "lsb")]
    pub r_stick_y: Integer<i16, packed_bits::Bits<16>>,

    // byte 56-59
    #[packed_field(bytes = "56..=57", endian = "lsb")]
    pub l_pad_force: Integer<u16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "58..=59", endian = "lsb")]
    pub r_pad_force: Integer<u16, packed_bits::Bits<16>>,

    // byte 60-63
    #[packed_field(bytes = "60..=61", endian = "lsb")]
    pub l_stick_force: Integer<u16, packed_bits::Bits<16>>, // Thumbstick capacitive sensors
    #[packed_field(bytes = "62..=63", endian = "lsb")]
    pub r_stick_force: Integer<u16, packed_bits::Bits<16>>,
    // 64 bytes total
}

impl PackedInputDataReport {
    /// Returns true if the two reports carry the same controller state.
    /// The frame counter increments with every report, so it is masked out of
    /// the comparison.
    pub fn same_state(&self, other: &Self) -> bool {
        let mut a = *self;
        let mut b = *other;
        a.frame = Integer::from_primitive(0);
        b.frame = Integer::from_primitive(0);
        a == b
    }
}

impl Default for PackedInputDataReport {
    fn default() -> Self {
        PackedInputDataReport {
            major_ver: 0x01,
            minor_ver: 0x00,
            report_type: ReportType::InputData as u8,
            report_size: 64,
            frame: Integer::from_primitive(0),
            a: false,
            x: false,
            b: false,
            y: false,
            l1: false,
            r1: false,
            l2: false,
            r2: false,
            l5: false,
            menu: false,
            steam: false,
            options: false,
            down: false,
            left: false,
            right: false,
            up: false,
            _unk4: false,
            l3: false,
            _unk3: false,
            r_pad_touch: false,
            l_pad_touch: false,
            r_pad_press: false,
            l_pad_press: false,
            r5: false,
            _unk11: false,
            _unk10: false,
            _unk9: false,
            _unk8: false,
            _unk7: false,
            r3: false,
            _unk6: false,
            _unk5: false,
            _unk12: 0,
            r_stick_touch: false,
            l_stick_touch: false,
            _unk16: false,
            _unk15: false,
            _unk14: false,
            r4: false,
            l4: false,
            _unk13: false,
            _unk22: false,
            _unk21: false,
            _unk20: false,
            _unk19: false,
            _unk18: false,
            quick_access: false,
            _unk17: false,
            _unk23: false,
            _unk24: 0,
            l_pad_x: Integer::from_primitive(0),
            l_pad_y: Integer::from_primitive(0),
            r_pad_x: Integer::from_primitive(0),
            r_pad_y: Integer::from_primitive(0),
            accel_x: Integer::from_primitive(0),
            accel_y: Integer::from_primitive(0),
            accel_z: Integer::from_primitive(0),
            pitch: Integer::from_primitive(0),
            yaw: Integer::from_primitive(0),
            roll: Integer::from_primitive(0),
            _magn_0: Integer::from_primitive(0),
            _magn_1: Integer::from_primitive(0),
            _magn_2: Integer::from_primitive(0),
            _magn_3: Integer::from_primitive(0),
            l_trigg: Integer::from_primitive(0),
            r_trigg: Integer::from_primitive(0),
            l_stick_x: Integer::from_primitive(0),
            l_stick_y: Integer::from_primitive(0),
            r_stick_x: Integer::from_primitive(0),
            r_stick_y: Integer::from_primitive(0),
            l_pad_force: Integer::from_primitive(0),
            r_pad_force: Integer::from_primitive(0),
            l_stick_force: Integer::from_primitive(0),
            r_stick_force: Integer::from_primitive(0),
        }
    }
}

/// Send a haptic pulse to one of the trackpad actuators. Amplitude and period
/// are in device units; count is the number of pulses to send.
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0")]
pub struct PackedHapticPulseReport {
    #[packed_field(bytes = "0")]
    pub report_id: u8,
    #[packed_field(bytes = "1")]
    pub report_size: u8,
    #[packed_field(bytes = "2", ty = "enum")]
    pub side: PadSide,
    #[packed_field(bytes = "3..=4", endian = "lsb")]
    pub amplitude: Integer<u16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "5..=6", endian = "lsb")]
    pub period: Integer<u16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "7..=8", endian = "lsb")]
    pub count: Integer<u16, packed_bits::Bits<16>>,
}

impl Default for PackedHapticPulseReport {
    fn default() -> Self {
        Self {
            report_id: ReportType::TriggerHapticPulse as u8,
            report_size: 9,
            side: PadSide::Both,
            amplitude: Integer::from_primitive(0),
            period: Integer::from_primitive(0),
            count: Integer::from_primitive(0),
        }
    }
}

/// Single-byte report used to set or clear the built-in input mappings.
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "64")]
pub struct PackedMappingsReport {
    #[packed_field(bytes = "0")]
    pub report_id: u8,
}
