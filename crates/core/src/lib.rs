//! rog-keys-core: special-button decoding for ASUS ROG mice.
//!
//! ROG mice report their extra macro buttons as vendor key codes on a
//! separate keyboard interface. This crate decodes those reports, tracks the
//! held codes per device, and turns every press or release into a standard
//! key event delivered to a [`sink::KeySink`].

pub mod device;
pub mod error;
pub mod keymap;
pub mod report;
pub mod session;
pub mod sink;
pub mod state;

/// ASUSTeK USB Vendor ID.
pub const ASUS_VID: u16 = 0x0B05;

/// USB interface that carries special-button reports.
pub const KEYBOARD_INTERFACE: i32 = 1;

/// Known ROG mouse product IDs.
///
/// `*_RF` IDs belong to wireless receivers, `*_USB` IDs to the same mice
/// connected by cable.
pub mod pids {
    pub const BUZZARD: u16 = 0x1816;
    pub const GLADIUS2: u16 = 0x1845;
    pub const GLADIUS2_ORIGIN: u16 = 0x1877;
    pub const GLADIUS2_ORIGIN_PINK: u16 = 0x18CD;
    pub const KERIS_WIRELESS_RF: u16 = 0x1960;
    pub const KERIS_WIRELESS_USB: u16 = 0x195E;
    pub const PUGIO: u16 = 0x1846;
    pub const STRIX_CARRY: u16 = 0x18B4;
    pub const STRIX_CHAKRAM_RF: u16 = 0x18E5;
    pub const STRIX_CHAKRAM_USB: u16 = 0x18E3;
    pub const STRIX_EVOLVE: u16 = 0x185B;
    pub const STRIX_IMPACT: u16 = 0x1847;
    pub const STRIX_IMPACT2_WIRELESS_RF: u16 = 0x1949;
    pub const STRIX_IMPACT2_WIRELESS_USB: u16 = 0x1947;
    pub const STRIX_SPATHA_RF: u16 = 0x1824;
    pub const STRIX_SPATHA_USB: u16 = 0x181C;
}
