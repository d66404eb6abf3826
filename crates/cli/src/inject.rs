//! Key injection through a uinput virtual keyboard.
//!
//! Each attached mouse gets its own virtual device exposing every key the
//! special-button table can produce.

use anyhow::{Context, Result};
use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key,
};
use rog_keys_core::keymap::{self, StandardKey};
use rog_keys_core::sink::KeySink;
use tracing::{debug, warn};

/// Sink that writes key events to a uinput device.
pub struct UinputSink {
    device: VirtualDevice,
    /// Key events since the last sync.
    pending: Vec<InputEvent>,
}

impl UinputSink {
    /// Create a virtual keyboard named `name`.
    pub fn new(name: &str) -> Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for key in keymap::mapped_keys() {
            keys.insert(Key::new(key.code()));
        }

        let device = VirtualDeviceBuilder::new()
            .context("Failed to open /dev/uinput")?
            .name(name)
            .with_keys(&keys)
            .context("Failed to register keys on virtual device")?
            .build()
            .context("Failed to create virtual device")?;
        debug!(name, "uinput device created");

        Ok(Self {
            device,
            pending: Vec::new(),
        })
    }
}

/// `EV_KEY` event for a key going down (1) or up (0).
fn key_event(key: StandardKey, down: bool) -> InputEvent {
    InputEvent::new(EventType::KEY, key.code(), i32::from(down))
}

impl KeySink for UinputSink {
    fn press(&mut self, key: StandardKey) {
        self.pending.push(key_event(key, true));
    }

    fn release(&mut self, key: StandardKey) {
        self.pending.push(key_event(key, false));
    }

    fn sync(&mut self) {
        // emit() terminates the batch with SYN_REPORT
        if let Err(e) = self.device.emit(&self.pending) {
            warn!(error = %e, events = self.pending.len(), "uinput write failed");
        }
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_events_carry_linux_codes() {
        let down = key_event(StandardKey::A, true);
        assert_eq!(down.event_type(), EventType::KEY);
        assert_eq!(down.code(), 30);
        assert_eq!(down.value(), 1);

        let up = key_event(StandardKey::Kp8, false);
        assert_eq!(up.code(), 72);
        assert_eq!(up.value(), 0);
    }

    #[test]
    #[ignore] // Requires uinput access (run with: cargo test -- --ignored)
    fn create_and_type() {
        let mut sink = UinputSink::new("rog-keys test").unwrap();
        sink.press(StandardKey::F1);
        assert_eq!(sink.pending.len(), 1);
        sink.sync();
        sink.release(StandardKey::F1);
        sink.sync();
        assert!(sink.pending.is_empty());
    }
}
