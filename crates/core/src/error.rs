//! Error types for rog-keys-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HID device communication failure.
    #[error("HID error: {0}")]
    Hid(String),

    /// Device not found during enumeration, or no session attached for it.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Sparse report entry does not fit the 128-code key state.
    #[error("key code out of range: 0x{code:02X} (allowed 0x00..=0x7F)")]
    OutOfRangeCode { code: u8 },
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
