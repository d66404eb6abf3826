//! Per-device sessions: decode → diff → dispatch → commit.
//!
//! A [`Session`] owns the last observed key state of one attached mouse and
//! the sink its key events go to. Hosts that drive several mice keep one
//! session per device in a [`SessionRegistry`]; sessions never share state.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{Error, Result};
use crate::keymap;
use crate::report;
use crate::sink::KeySink;
use crate::state::{self, Direction, KeyState};
use tracing::{debug, info, warn};

/// What a single report did to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Not a special-button report; nothing happened.
    Ignored,
    /// Malformed special-button report; dropped, state unchanged.
    Rejected,
    /// Report applied and state committed.
    Applied {
        /// Transitions delivered to the sink.
        delivered: usize,
        /// Transitions dropped because their code has no key.
        skipped: usize,
    },
}

/// Special-button state of one attached device.
pub struct Session<S> {
    state: KeyState,
    sink: S,
}

impl<S: KeySink> Session<S> {
    /// Start a session for a freshly attached device.
    pub fn new(sink: S) -> Self {
        Self {
            state: KeyState::new(),
            sink,
        }
    }

    /// Process one inbound HID report.
    ///
    /// Each transition with a mapped key is delivered as a press or release
    /// followed by a sync, in ascending code order. Unmapped codes are
    /// skipped, and the decoded state is committed either way.
    pub fn on_report(&mut self, data: &[u8]) -> ReportOutcome {
        let current = match report::decode(data) {
            Ok(Some(current)) => current,
            Ok(None) => return ReportOutcome::Ignored,
            Err(e) => {
                warn!(error = %e, "dropping special-button report");
                return ReportOutcome::Rejected;
            }
        };

        let diff = state::diff(&self.state, &current);
        let mut delivered = 0;
        let mut skipped = 0;

        for transition in &diff.transitions {
            let Some(key) = keymap::lookup(transition.code) else {
                debug!(
                    code = format_args!("0x{:02X}", transition.code),
                    direction = ?transition.direction,
                    "unmapped special-button code, skipping"
                );
                skipped += 1;
                continue;
            };

            debug!(
                code = format_args!("0x{:02X}", transition.code),
                key = key.name(),
                direction = ?transition.direction,
                "special-button transition"
            );
            match transition.direction {
                Direction::Pressed => self.sink.press(key),
                Direction::Released => self.sink.release(key),
            }
            self.sink.sync();
            delivered += 1;
        }

        self.state = diff.next;
        ReportOutcome::Applied { delivered, skipped }
    }

    /// Last committed key state.
    pub fn state(&self) -> &KeyState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// End the session, handing back its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Sessions keyed by device identity.
pub struct SessionRegistry<K, S> {
    sessions: HashMap<K, Session<S>>,
}

impl<K, S> Default for SessionRegistry<K, S> {
    fn default() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }
}

impl<K, S> SessionRegistry<K, S>
where
    K: Eq + Hash + Debug,
    S: KeySink,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a device, starting from an empty key state.
    ///
    /// Re-attaching a known device replaces its session; the previous one is
    /// returned.
    pub fn attach(&mut self, device: K, sink: S) -> Option<Session<S>> {
        info!(device = ?device, "special-button session attached");
        let previous = self.sessions.insert(device, Session::new(sink));
        if previous.is_some() {
            warn!("device was already attached, previous session discarded");
        }
        previous
    }

    /// Detach a device and discard its state.
    pub fn detach(&mut self, device: &K) -> Option<Session<S>> {
        let session = self.sessions.remove(device);
        if session.is_some() {
            info!(device = ?device, "special-button session detached");
        }
        session
    }

    /// Route a report to the session of `device`.
    pub fn on_report(&mut self, device: &K, data: &[u8]) -> Result<ReportOutcome> {
        let session = self
            .sessions
            .get_mut(device)
            .ok_or_else(|| Error::DeviceNotFound(format!("no session for {device:?}")))?;
        Ok(session.on_report(data))
    }

    pub fn get(&self, device: &K) -> Option<&Session<S>> {
        self.sessions.get(device)
    }

    pub fn contains(&self, device: &K) -> bool {
        self.sessions.contains_key(device)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
