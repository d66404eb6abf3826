//! Special-button key state and edge detection.
//!
//! The state is a 128-bit vector split into four 32-bit words. Words are
//! stored most-significant first: the word holding codes `96..=127` sits at
//! position 0 and the word holding codes `0..=31` at position 3. All code to
//! (word, bit) arithmetic goes through [`slot`].

use crate::keymap::KeyCode;
use serde::Serialize;

/// Number of 32-bit words in a key state.
pub const STATE_WORDS: usize = 4;
/// Bits per key state word.
pub const WORD_BITS: usize = 32;
/// Number of codes a key state can hold.
pub const STATE_CODES: usize = STATE_WORDS * WORD_BITS;

/// Location of a key code inside a [`KeyState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Word position in storage order.
    pub word: usize,
    /// Bit index within the word.
    pub bit: u32,
}

impl Slot {
    fn mask(&self) -> u32 {
        1 << self.bit
    }
}

/// Map a key code to its word position and bit.
///
/// Returns `None` for codes that do not fit the 128-bit state.
pub fn slot(code: KeyCode) -> Option<Slot> {
    let code = code as usize;
    if code >= STATE_CODES {
        return None;
    }
    Some(Slot {
        word: word_position(code / WORD_BITS),
        bit: (code % WORD_BITS) as u32,
    })
}

/// Storage position of the word covering codes `group*32 ..= group*32+31`.
pub fn word_position(group: usize) -> usize {
    STATE_WORDS - 1 - group
}

/// Set of special-button codes currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyState {
    words: [u32; STATE_WORDS],
}

impl KeyState {
    /// The empty state: nothing held.
    pub const fn new() -> Self {
        Self {
            words: [0; STATE_WORDS],
        }
    }

    /// Build a state from words in storage order.
    pub const fn from_words(words: [u32; STATE_WORDS]) -> Self {
        Self { words }
    }

    /// Words in storage order (codes 96..=127 first).
    pub fn words(&self) -> [u32; STATE_WORDS] {
        self.words
    }

    /// Word at a storage position.
    pub fn word(&self, position: usize) -> u32 {
        self.words[position]
    }

    pub(crate) fn word_mut(&mut self, position: usize) -> &mut u32 {
        &mut self.words[position]
    }

    /// Mark a code as held. Returns `false` if the code does not fit.
    pub fn set(&mut self, code: KeyCode) -> bool {
        match slot(code) {
            Some(s) => {
                self.words[s.word] |= s.mask();
                true
            }
            None => false,
        }
    }

    /// Mark a code as released. Codes that do not fit are ignored.
    pub fn clear(&mut self, code: KeyCode) {
        if let Some(s) = slot(code) {
            self.words[s.word] &= !s.mask();
        }
    }

    /// Whether a code is held.
    pub fn contains(&self, code: KeyCode) -> bool {
        slot(code).is_some_and(|s| self.words[s.word] & s.mask() != 0)
    }

    /// Whether no code is held.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Held codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = KeyCode> + '_ {
        (0..STATE_CODES as u16)
            .map(|c| c as KeyCode)
            .filter(move |c| self.contains(*c))
    }
}

impl std::fmt::Display for KeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:08X} {:08X} {:08X} {:08X}",
            self.words[0], self.words[1], self.words[2], self.words[3]
        )
    }
}

/// Direction of a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Pressed,
    Released,
}

/// A single code changing state between two observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Transition {
    pub code: KeyCode,
    pub direction: Direction,
}

impl Transition {
    pub fn pressed(code: KeyCode) -> Self {
        Self {
            code,
            direction: Direction::Pressed,
        }
    }

    pub fn released(code: KeyCode) -> Self {
        Self {
            code,
            direction: Direction::Released,
        }
    }
}

/// Result of comparing two key states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDiff {
    /// Transitions in ascending code order.
    pub transitions: Vec<Transition>,
    /// State to retain for the next comparison.
    pub next: KeyState,
}

/// Compute the transitions from `previous` to `current`.
pub fn diff(previous: &KeyState, current: &KeyState) -> StateDiff {
    let mut transitions = Vec::new();

    for group in 0..STATE_WORDS {
        let position = word_position(group);
        let held = current.word(position);
        let changed = previous.word(position) ^ held;
        if changed == 0 {
            continue;
        }

        for bit in 0..WORD_BITS as u32 {
            let mask = 1u32 << bit;
            if changed & mask == 0 {
                continue;
            }
            let code = (group * WORD_BITS) as KeyCode + bit as KeyCode;
            transitions.push(if held & mask != 0 {
                Transition::pressed(code)
            } else {
                Transition::released(code)
            });
        }
    }

    StateDiff {
        transitions,
        next: *current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_of(codes: &[KeyCode]) -> KeyState {
        let mut s = KeyState::new();
        for c in codes {
            assert!(s.set(*c));
        }
        s
    }

    #[test]
    fn slot_reverses_word_order() {
        assert_eq!(slot(0), Some(Slot { word: 3, bit: 0 }));
        assert_eq!(slot(31), Some(Slot { word: 3, bit: 31 }));
        assert_eq!(slot(32), Some(Slot { word: 2, bit: 0 }));
        assert_eq!(slot(96), Some(Slot { word: 0, bit: 0 }));
        assert_eq!(slot(127), Some(Slot { word: 0, bit: 31 }));
    }

    #[test]
    fn slot_rejects_codes_past_state() {
        assert_eq!(slot(128), None);
        assert_eq!(slot(255), None);
    }

    #[test]
    fn set_places_bits_in_expected_words() {
        let s = state_of(&[4, 5, 40, 96]);
        assert_eq!(s.words(), [0x0000_0001, 0, 0x0000_0100, 0x0000_0030]);
        assert_eq!(s.to_string(), "00000001 00000000 00000100 00000030");
    }

    #[test]
    fn set_out_of_range_is_refused() {
        let mut s = KeyState::new();
        assert!(!s.set(200));
        assert!(s.is_empty());
    }

    #[test]
    fn clear_and_contains() {
        let mut s = state_of(&[10, 99]);
        assert!(s.contains(10));
        assert!(s.contains(99));
        s.clear(10);
        assert!(!s.contains(10));
        assert!(s.contains(99));
    }

    #[test]
    fn codes_ascending() {
        let s = state_of(&[97, 3, 64, 33]);
        assert_eq!(s.codes().collect::<Vec<_>>(), vec![3, 33, 64, 97]);
    }

    #[test]
    fn diff_against_itself_is_empty() {
        let s = state_of(&[4, 50, 99, 120]);
        let d = diff(&s, &s);
        assert!(d.transitions.is_empty());
        assert_eq!(d.next, s);
    }

    #[test]
    fn diff_from_empty_presses_every_code_ascending() {
        let s = state_of(&[100, 4, 63, 32, 31]);
        let d = diff(&KeyState::new(), &s);
        assert_eq!(
            d.transitions,
            vec![
                Transition::pressed(4),
                Transition::pressed(31),
                Transition::pressed(32),
                Transition::pressed(63),
                Transition::pressed(100),
            ]
        );
    }

    #[test]
    fn diff_to_empty_releases_every_code_ascending() {
        let s = state_of(&[127, 0, 65]);
        let d = diff(&s, &KeyState::new());
        assert_eq!(
            d.transitions,
            vec![
                Transition::released(0),
                Transition::released(65),
                Transition::released(127),
            ]
        );
        assert!(d.next.is_empty());
    }

    #[test]
    fn diff_mixed_changes() {
        let prev = state_of(&[4, 5, 90]);
        let cur = state_of(&[4, 6, 91]);
        let d = diff(&prev, &cur);
        assert_eq!(
            d.transitions,
            vec![
                Transition::released(5),
                Transition::pressed(6),
                Transition::released(90),
                Transition::pressed(91),
            ]
        );
        assert_eq!(d.next, cur);
    }

    #[test]
    fn replaying_transitions_rebuilds_state() {
        let prev = state_of(&[1, 40, 70, 110]);
        let cur = state_of(&[2, 40, 71, 119, 127]);
        let d = diff(&prev, &cur);

        let mut replay = prev;
        for t in &d.transitions {
            match t.direction {
                Direction::Pressed => {
                    replay.set(t.code);
                }
                Direction::Released => replay.clear(t.code),
            }
        }
        assert_eq!(replay, cur);
    }
}
