//! Key event sink abstraction.
//!
//! Sessions deliver decoded key transitions through this trait so that a
//! uinput injector, a printer, or a test recorder share the same interface.

use crate::keymap::StandardKey;
use serde::Serialize;

/// Receiver of standard key events.
///
/// Calls for one report arrive in ascending vendor-code order, each press or
/// release followed by a [`sync`](KeySink::sync).
pub trait KeySink: Send {
    /// A key went down.
    fn press(&mut self, key: StandardKey);
    /// A key went up.
    fn release(&mut self, key: StandardKey);
    /// End of an atomic input update.
    fn sync(&mut self);
}

/// One call made on a [`KeySink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "key", rename_all = "lowercase")]
pub enum KeyEvent {
    Press(StandardKey),
    Release(StandardKey),
    Sync,
}

impl std::fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Press(key) => write!(f, "press {key}"),
            Self::Release(key) => write!(f, "release {key}"),
            Self::Sync => write!(f, "sync"),
        }
    }
}
