//! Fixed mapping from ROG special-button codes to standard keys.
//!
//! The mouse firmware reports macro buttons as vendor key codes that follow
//! the USB HID keyboard usage numbering (4 = A, 5 = B, ...). Only codes below
//! [`MAPPING_SIZE`] have a table entry; gaps in the table are reserved codes
//! the firmware never assigns.

use serde::Serialize;

/// Vendor-defined special-button code.
pub type KeyCode = u8;

/// Number of entries in the code-to-key table.
pub const MAPPING_SIZE: usize = 98;

/// Standard key identifiers understood by downstream input consumers.
///
/// Discriminants are the Linux `input-event-codes.h` `KEY_*` values, so a
/// uinput injector can forward [`StandardKey::code`] unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
#[repr(u16)]
pub enum StandardKey {
    Esc = 1,
    Num1 = 2,
    Num2 = 3,
    Num3 = 4,
    Num4 = 5,
    Num5 = 6,
    Num6 = 7,
    Num7 = 8,
    Num8 = 9,
    Num9 = 10,
    Num0 = 11,
    Minus = 12,
    Equal = 13,
    Backspace = 14,
    Tab = 15,
    Q = 16,
    W = 17,
    E = 18,
    R = 19,
    T = 20,
    Y = 21,
    U = 22,
    I = 23,
    O = 24,
    P = 25,
    Enter = 28,
    A = 30,
    S = 31,
    D = 32,
    F = 33,
    G = 34,
    H = 35,
    J = 36,
    K = 37,
    L = 38,
    Grave = 41,
    Z = 44,
    X = 45,
    C = 46,
    V = 47,
    B = 48,
    N = 49,
    M = 50,
    Slash = 53,
    Space = 57,
    F1 = 59,
    F2 = 60,
    F3 = 61,
    F4 = 62,
    F5 = 63,
    F6 = 64,
    F7 = 65,
    F8 = 66,
    F9 = 67,
    F10 = 68,
    Kp7 = 71,
    Kp8 = 72,
    Kp9 = 73,
    Kp4 = 75,
    Kp5 = 76,
    Kp6 = 77,
    KpPlus = 78,
    Kp1 = 79,
    Kp2 = 80,
    Kp3 = 81,
    F11 = 87,
    F12 = 88,
    Home = 102,
    Up = 103,
    PageUp = 104,
    Left = 105,
    Right = 106,
    Down = 108,
    PageDown = 109,
    Delete = 111,
}

impl StandardKey {
    /// Linux input event code for this key.
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Linux-style key name, e.g. `KEY_A`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Esc => "KEY_ESC",
            Self::Num1 => "KEY_1",
            Self::Num2 => "KEY_2",
            Self::Num3 => "KEY_3",
            Self::Num4 => "KEY_4",
            Self::Num5 => "KEY_5",
            Self::Num6 => "KEY_6",
            Self::Num7 => "KEY_7",
            Self::Num8 => "KEY_8",
            Self::Num9 => "KEY_9",
            Self::Num0 => "KEY_0",
            Self::Minus => "KEY_MINUS",
            Self::Equal => "KEY_EQUAL",
            Self::Backspace => "KEY_BACKSPACE",
            Self::Tab => "KEY_TAB",
            Self::Q => "KEY_Q",
            Self::W => "KEY_W",
            Self::E => "KEY_E",
            Self::R => "KEY_R",
            Self::T => "KEY_T",
            Self::Y => "KEY_Y",
            Self::U => "KEY_U",
            Self::I => "KEY_I",
            Self::O => "KEY_O",
            Self::P => "KEY_P",
            Self::Enter => "KEY_ENTER",
            Self::A => "KEY_A",
            Self::S => "KEY_S",
            Self::D => "KEY_D",
            Self::F => "KEY_F",
            Self::G => "KEY_G",
            Self::H => "KEY_H",
            Self::J => "KEY_J",
            Self::K => "KEY_K",
            Self::L => "KEY_L",
            Self::Grave => "KEY_GRAVE",
            Self::Z => "KEY_Z",
            Self::X => "KEY_X",
            Self::C => "KEY_C",
            Self::V => "KEY_V",
            Self::B => "KEY_B",
            Self::N => "KEY_N",
            Self::M => "KEY_M",
            Self::Slash => "KEY_SLASH",
            Self::Space => "KEY_SPACE",
            Self::F1 => "KEY_F1",
            Self::F2 => "KEY_F2",
            Self::F3 => "KEY_F3",
            Self::F4 => "KEY_F4",
            Self::F5 => "KEY_F5",
            Self::F6 => "KEY_F6",
            Self::F7 => "KEY_F7",
            Self::F8 => "KEY_F8",
            Self::F9 => "KEY_F9",
            Self::F10 => "KEY_F10",
            Self::Kp7 => "KEY_KP7",
            Self::Kp8 => "KEY_KP8",
            Self::Kp9 => "KEY_KP9",
            Self::Kp4 => "KEY_KP4",
            Self::Kp5 => "KEY_KP5",
            Self::Kp6 => "KEY_KP6",
            Self::KpPlus => "KEY_KPPLUS",
            Self::Kp1 => "KEY_KP1",
            Self::Kp2 => "KEY_KP2",
            Self::Kp3 => "KEY_KP3",
            Self::F11 => "KEY_F11",
            Self::F12 => "KEY_F12",
            Self::Home => "KEY_HOME",
            Self::Up => "KEY_UP",
            Self::PageUp => "KEY_PAGEUP",
            Self::Left => "KEY_LEFT",
            Self::Right => "KEY_RIGHT",
            Self::Down => "KEY_DOWN",
            Self::PageDown => "KEY_PAGEDOWN",
            Self::Delete => "KEY_DELETE",
        }
    }
}

impl From<StandardKey> for &'static str {
    fn from(key: StandardKey) -> Self {
        key.name()
    }
}

impl std::fmt::Display for StandardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

use StandardKey::*;

/// Code-to-key table; `None` marks reserved codes.
static KEY_TABLE: [Option<StandardKey>; MAPPING_SIZE] = [
    // 0..=3: reserved
    None,
    None,
    None,
    None,
    // 4..=29: letters
    Some(A),
    Some(B),
    Some(C),
    Some(D),
    Some(E),
    Some(F),
    Some(G),
    Some(H),
    Some(I),
    Some(J),
    Some(K),
    Some(L),
    Some(M),
    Some(N),
    Some(O),
    Some(P),
    Some(Q),
    Some(R),
    Some(S),
    Some(T),
    Some(U),
    Some(V),
    Some(W),
    Some(X),
    Some(Y),
    Some(Z),
    // 30..=39: digits
    Some(Num1),
    Some(Num2),
    Some(Num3),
    Some(Num4),
    Some(Num5),
    Some(Num6),
    Some(Num7),
    Some(Num8),
    Some(Num9),
    Some(Num0),
    // 40..=46
    Some(Enter),
    Some(Esc),
    Some(Backspace),
    Some(Tab),
    Some(Space),
    Some(Minus),
    Some(KpPlus),
    // 47..=52: reserved
    None,
    None,
    None,
    None,
    None,
    None,
    // 53..=57
    Some(Grave),
    Some(Equal),
    None,
    Some(Slash),
    None,
    // 58..=69: function keys
    Some(F1),
    Some(F2),
    Some(F3),
    Some(F4),
    Some(F5),
    Some(F6),
    Some(F7),
    Some(F8),
    Some(F9),
    Some(F10),
    Some(F11),
    Some(F12),
    // 70..=73: reserved
    None,
    None,
    None,
    None,
    // 74..=82: navigation
    Some(Home),
    Some(PageUp),
    Some(Delete),
    None,
    Some(PageDown),
    Some(Right),
    Some(Left),
    Some(Down),
    Some(Up),
    // 83..=88: reserved
    None,
    None,
    None,
    None,
    None,
    None,
    // 89..=97: keypad
    Some(Kp1),
    Some(Kp2),
    Some(Kp3),
    Some(Kp4),
    Some(Kp5),
    Some(Kp6),
    Some(Kp7),
    Some(Kp8),
    Some(Kp9),
];

/// Look up the standard key for a vendor code.
///
/// Returns `None` for codes outside the table and for reserved entries.
pub fn lookup(code: KeyCode) -> Option<StandardKey> {
    KEY_TABLE.get(code as usize).copied().flatten()
}

/// Every key the table can produce, in vendor-code order.
pub fn mapped_keys() -> impl Iterator<Item = StandardKey> {
    KEY_TABLE.iter().flatten().copied()
}
