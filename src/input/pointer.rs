//! Legacy pointer emulation: trackpad clicks are bridged to synthetic mouse
//! buttons while the legacy mouse pass-through flag is enabled.
pub mod uinput;

use std::error::Error;

/// Identity of a synthetic mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Capability for injecting a synthetic pointer button event.
pub trait PointerSink {
    fn send_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Edge-triggered bridge from trackpad clicks to synthetic mouse buttons.
///
/// The left pad maps to the right mouse button and the right pad to the left
/// mouse button. The swap mirrors the physical device's default mapping and
/// is intentional.
pub struct PointerBridge<S: PointerSink> {
    sink: S,
    last_left_click: bool,
    last_right_click: bool,
}

impl<S: PointerSink> PointerBridge<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            last_left_click: false,
            last_right_click: false,
        }
    }

    /// Feed the current click state of both pads. A synthetic button event is
    /// injected only when a pad's click state differs from the last observed
    /// value; injection failures are ignored.
    pub fn update(&mut self, left_pad_click: bool, right_pad_click: bool) {
        if left_pad_click != self.last_left_click {
            if let Err(e) = self.sink.send_button(MouseButton::Right, left_pad_click) {
                log::debug!("Failed to inject right mouse button: {e:?}");
            }
            self.last_left_click = left_pad_click;
        }

        if right_pad_click != self.last_right_click {
            if let Err(e) = self.sink.send_button(MouseButton::Left, right_pad_click) {
                log::debug!("Failed to inject left mouse button: {e:?}");
            }
            self.last_right_click = right_pad_click;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<(MouseButton, bool)>,
    }

    impl PointerSink for RecordingSink {
        fn send_button(
            &mut self,
            button: MouseButton,
            pressed: bool,
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.events.push((button, pressed));
            Ok(())
        }
    }

    #[test]
    fn test_left_pad_click_injects_right_button_edges() {
        let mut bridge = PointerBridge::new(RecordingSink::default());

        // false -> true -> true -> false
        bridge.update(false, false);
        bridge.update(true, false);
        bridge.update(true, false);
        bridge.update(false, false);

        assert_eq!(
            bridge.sink.events,
            vec![(MouseButton::Right, true), (MouseButton::Right, false)]
        );
    }

    #[test]
    fn test_right_pad_click_injects_left_button() {
        let mut bridge = PointerBridge::new(RecordingSink::default());

        bridge.update(false, true);
        bridge.update(false, false);

        assert_eq!(
            bridge.sink.events,
            vec![(MouseButton::Left, true), (MouseButton::Left, false)]
        );
    }

    #[test]
    fn test_simultaneous_edges() {
        let mut bridge = PointerBridge::new(RecordingSink::default());

        bridge.update(true, true);
        assert_eq!(
            bridge.sink.events,
            vec![(MouseButton::Right, true), (MouseButton::Left, true)]
        );
    }
}
