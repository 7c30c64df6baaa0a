use packed_struct::prelude::*;

use super::hid_report::{PackedHapticPulseReport, PackedInputDataReport, PadSide, ReportType};

#[test]
fn test_input_report_roundtrip() {
    let mut report = PackedInputDataReport {
        a: true,
        l_pad_touch: true,
        ..Default::default()
    };
    report.frame = Integer::from_primitive(1234);
    report.l_stick_x = Integer::from_primitive(-4096);
    report.l_trigg = Integer::from_primitive(20000);
    report.pitch = Integer::from_primitive(16383);

    let buf = report.pack().expect("should pack input report");
    assert_eq!(buf.len(), 64);

    let decoded = PackedInputDataReport::unpack(&buf).expect("should unpack input report");
    assert_eq!(decoded, report);
    assert!(decoded.a);
    assert!(decoded.l_pad_touch);
    assert_eq!(decoded.l_stick_x.to_primitive(), -4096);
    assert_eq!(decoded.l_trigg.to_primitive(), 20000);
    assert_eq!(decoded.pitch.to_primitive(), 16383);
}

#[test]
fn test_same_state_ignores_frame_counter() {
    let mut first = PackedInputDataReport::default();
    first.frame = Integer::from_primitive(100);
    let mut second = first;
    second.frame = Integer::from_primitive(101);
    assert!(first.same_state(&second));

    second.b = true;
    assert!(!first.same_state(&second));
}

#[test]
fn test_haptic_pulse_report_layout() {
    let report = PackedHapticPulseReport {
        side: PadSide::Left,
        amplitude: Integer::from_primitive(8),
        period: Integer::from_primitive(22),
        count: Integer::from_primitive(1),
        ..Default::default()
    };

    let buf = report.pack().expect("should pack haptic report");
    assert_eq!(buf[0], ReportType::TriggerHapticPulse as u8);
    assert_eq!(buf[1], 9);
    assert_eq!(buf[2], 1);
    // Little-endian amplitude/period/count
    assert_eq!(buf[3], 8);
    assert_eq!(buf[4], 0);
    assert_eq!(buf[5], 22);
    assert_eq!(buf[6], 0);
    assert_eq!(buf[7], 1);
}

#[test]
fn test_haptic_position_matches_actuator_side() {
    // The left (large motor) actuator is addressed as position 1 on the
    // wire, the right (small motor) actuator as position 0.
    let mut report = PackedHapticPulseReport {
        side: PadSide::Left,
        ..Default::default()
    };
    let buf = report.pack().expect("should pack haptic report");
    assert_eq!(buf[2], 1);

    report.side = PadSide::Right;
    let buf = report.pack().expect("should pack haptic report");
    assert_eq!(buf[2], 0);
}
