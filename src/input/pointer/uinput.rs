//! uinput-backed pointer injection.
use std::error::Error;

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key,
};

use super::{MouseButton, PointerSink};

/// Synthetic pointer device backed by a uinput virtual device with left and
/// right mouse buttons.
pub struct VirtualPointer {
    device: VirtualDevice,
}

impl VirtualPointer {
    pub fn new() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let mut keys = AttributeSet::<Key>::new();
        keys.insert(Key::BTN_LEFT);
        keys.insert(Key::BTN_RIGHT);

        let device = VirtualDeviceBuilder::new()?
            .name("deckhand pointer")
            .with_keys(&keys)?
            .build()?;

        Ok(Self { device })
    }
}

impl PointerSink for VirtualPointer {
    fn send_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let key = match button {
            MouseButton::Left => Key::BTN_LEFT,
            MouseButton::Right => Key::BTN_RIGHT,
        };
        let event = InputEvent::new(EventType::KEY, key.code(), pressed as i32);
        self.device.emit(&[event])?;
        Ok(())
    }
}
