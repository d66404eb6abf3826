//! Special-button report decoding.
//!
//! ROG mice send macro-button state on their keyboard interface using one of
//! two layouts:
//! - Sparse reports: 9 bytes (report ID 0x01), bytes 3..9 list held codes,
//!   zero bytes are padding. Used by first-generation mice.
//! - Packed reports: 17 bytes (report ID 0x04), a 120-bit bitmap sent
//!   least-significant byte last. Used by Keris Wireless and Strix Chakram.
//!
//! Anything else belongs to generic HID processing and decodes to `None`.

use crate::error::{Error, Result};
use crate::state::{KeyState, STATE_WORDS, WORD_BITS};
use tracing::{trace, warn};

/// Report ID of sparse reports.
pub const SPARSE_REPORT_ID: u8 = 0x01;
/// Report ID of packed reports.
pub const PACKED_REPORT_ID: u8 = 0x04;

/// Sparse report length (including report ID).
pub const SPARSE_REPORT_LEN: usize = 9;
/// Packed report length (including report ID).
pub const PACKED_REPORT_LEN: usize = 17;

/// First byte of the code list in a sparse report.
const SPARSE_CODES_OFFSET: usize = 3;

/// Wire layout of a special-button report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Array of held codes.
    Sparse,
    /// Bitmap of held codes.
    Packed,
}

impl ReportFormat {
    /// Recognize the layout from length and report ID.
    pub fn detect(data: &[u8]) -> Option<Self> {
        match (data.len(), data.first()) {
            (SPARSE_REPORT_LEN, Some(&SPARSE_REPORT_ID)) => Some(Self::Sparse),
            (PACKED_REPORT_LEN, Some(&PACKED_REPORT_ID)) => Some(Self::Packed),
            _ => None,
        }
    }

    /// Report length for this layout.
    pub fn report_len(&self) -> usize {
        match self {
            Self::Sparse => SPARSE_REPORT_LEN,
            Self::Packed => PACKED_REPORT_LEN,
        }
    }

    /// Report ID for this layout.
    pub fn report_id(&self) -> u8 {
        match self {
            Self::Sparse => SPARSE_REPORT_ID,
            Self::Packed => PACKED_REPORT_ID,
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sparse => write!(f, "sparse ({SPARSE_REPORT_LEN} bytes)"),
            Self::Packed => write!(f, "packed ({PACKED_REPORT_LEN} bytes)"),
        }
    }
}

/// Decode a raw report into the set of held special-button codes.
///
/// Returns `Ok(None)` when the report is not a special-button report, and
/// [`Error::OutOfRangeCode`] when a sparse report names a code that does not
/// fit the key state.
pub fn decode(data: &[u8]) -> Result<Option<KeyState>> {
    let Some(format) = ReportFormat::detect(data) else {
        return Ok(None);
    };

    trace!(
        format = ?format,
        report_hex = format_args!("{:02X?}", data),
        "special-button report RX"
    );

    let state = match format {
        ReportFormat::Sparse => decode_sparse(data)?,
        ReportFormat::Packed => decode_packed(data),
    };

    trace!(state = %state, "decoded key state");
    Ok(Some(state))
}

/// Build a key state from the code list of a sparse report.
fn decode_sparse(data: &[u8]) -> Result<KeyState> {
    let mut state = KeyState::new();
    for &code in &data[SPARSE_CODES_OFFSET..] {
        if code == 0 {
            continue;
        }
        if !state.set(code) {
            warn!(
                code = format_args!("0x{:02X}", code),
                "special-button code out of range, dropping report"
            );
            return Err(Error::OutOfRangeCode { code });
        }
    }
    Ok(state)
}

/// Build a key state from the bitmap of a packed report.
///
/// Bytes are consumed from the end of the report backwards, most-significant
/// byte first within each word. The top byte of the 128-bit value is never
/// sent, so the word at position 0 only receives 24 bits.
fn decode_packed(data: &[u8]) -> KeyState {
    let mut state = KeyState::new();
    let mut offset = data.len() - 1;

    for position in 0..STATE_WORDS {
        let word = state.word_mut(position);
        let first_bit = if position == 0 { 8 } else { 0 };
        for bit in (first_bit..WORD_BITS).step_by(8) {
            *word |= (data[offset] as u32) << (WORD_BITS - 8 - bit);
            offset -= 1;
        }
    }

    state
}

/// Encode a key state as a sparse report.
///
/// Returns `None` when more codes are held than a sparse report can list.
pub fn encode_sparse(state: &KeyState) -> Option<[u8; SPARSE_REPORT_LEN]> {
    let mut buf = [0u8; SPARSE_REPORT_LEN];
    buf[0] = ReportFormat::Sparse.report_id();
    let mut codes = state.codes();
    for slot in buf[SPARSE_CODES_OFFSET..].iter_mut() {
        match codes.next() {
            Some(code) => *slot = code,
            None => return Some(buf),
        }
    }
    match codes.next() {
        Some(_) => None,
        None => Some(buf),
    }
}

/// Encode a key state as a packed report.
///
/// Codes `120..=127` cannot be represented and are dropped.
pub fn encode_packed(state: &KeyState) -> [u8; PACKED_REPORT_LEN] {
    let mut buf = [0u8; PACKED_REPORT_LEN];
    buf[0] = ReportFormat::Packed.report_id();
    let mut offset = ReportFormat::Packed.report_len() - 1;

    for position in 0..STATE_WORDS {
        let word = state.word(position);
        let first_bit = if position == 0 { 8 } else { 0 };
        for bit in (first_bit..WORD_BITS).step_by(8) {
            buf[offset] = (word >> (WORD_BITS - 8 - bit)) as u8;
            offset -= 1;
        }
    }

    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse(codes: &[u8]) -> Vec<u8> {
        let mut data = vec![SPARSE_REPORT_ID, 0x00, 0x00];
        data.extend_from_slice(codes);
        data.resize(SPARSE_REPORT_LEN, 0);
        data
    }

    fn state_of(codes: &[u8]) -> KeyState {
        let mut s = KeyState::new();
        for c in codes {
            s.set(*c);
        }
        s
    }

    #[test]
    fn detect_formats() {
        assert_eq!(ReportFormat::detect(&sparse(&[4])), Some(ReportFormat::Sparse));
        let mut packed = vec![0u8; PACKED_REPORT_LEN];
        packed[0] = PACKED_REPORT_ID;
        assert_eq!(ReportFormat::detect(&packed), Some(ReportFormat::Packed));
    }

    #[test]
    fn format_header_matches_detect() {
        for format in [ReportFormat::Sparse, ReportFormat::Packed] {
            let mut data = vec![0u8; format.report_len()];
            data[0] = format.report_id();
            assert_eq!(ReportFormat::detect(&data), Some(format));
        }
        assert_eq!(encode_sparse(&KeyState::new()).unwrap()[0], SPARSE_REPORT_ID);
        assert_eq!(encode_packed(&KeyState::new())[0], PACKED_REPORT_ID);
    }

    #[test]
    fn detect_rejects_mismatched_report_id() {
        let mut data = sparse(&[4]);
        data[0] = 0x02;
        assert_eq!(ReportFormat::detect(&data), None);

        let mut packed = vec![0u8; PACKED_REPORT_LEN];
        packed[0] = SPARSE_REPORT_ID;
        assert_eq!(ReportFormat::detect(&packed), None);
    }

    #[test]
    fn detect_rejects_other_lengths() {
        assert_eq!(ReportFormat::detect(&[]), None);
        assert_eq!(ReportFormat::detect(&[0x01; 8]), None);
        assert_eq!(ReportFormat::detect(&[0x01; 10]), None);
        assert_eq!(ReportFormat::detect(&[0x04; 16]), None);
        assert_eq!(ReportFormat::detect(&[0x04; 20]), None);
    }

    #[test]
    fn decode_not_applicable_is_none() {
        assert!(decode(&[0x02, 0, 0, 4, 0, 0, 0, 0, 0]).unwrap().is_none());
        assert!(decode(&[0x01, 0, 0, 4]).unwrap().is_none());
    }

    #[test]
    fn decode_sparse_sets_listed_codes() {
        let state = decode(&sparse(&[4, 5])).unwrap().unwrap();
        assert_eq!(state.words(), [0, 0, 0, 0x30]);
        assert_eq!(state.codes().collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn decode_sparse_ignores_header_and_padding() {
        // bytes 1 and 2 are not part of the code list
        let data = [SPARSE_REPORT_ID, 0x55, 0x66, 0, 10, 0, 0, 97, 0];
        let state = decode(&data).unwrap().unwrap();
        assert_eq!(state.codes().collect::<Vec<_>>(), vec![10, 97]);
    }

    #[test]
    fn decode_sparse_keeps_out_of_table_codes() {
        let state = decode(&sparse(&[99, 127])).unwrap().unwrap();
        assert_eq!(state.words(), [0x8000_0008, 0, 0, 0]);
    }

    #[test]
    fn decode_sparse_rejects_codes_past_state() {
        let err = decode(&sparse(&[4, 128])).unwrap_err();
        assert!(matches!(err, Error::OutOfRangeCode { code: 128 }));
        assert!(decode(&sparse(&[0xFF])).is_err());
    }

    #[test]
    fn decode_sparse_duplicates_collapse() {
        let state = decode(&sparse(&[7, 7, 7])).unwrap().unwrap();
        assert_eq!(state.codes().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn decode_packed_byte_order() {
        let mut data = [0u8; PACKED_REPORT_LEN];
        data[0] = PACKED_REPORT_ID;
        data[16] = 0xAA; // bits 16..23 of word 0
        data[14] = 0x01; // bit 0 of word 0: code 96
        data[13] = 0x80; // bit 31 of word 1: code 95
        data[2] = 0x01; // bit 0 of word 3: code 0
        data[1] = 0xFF; // not part of the bitmap
        let state = decode(&data).unwrap().unwrap();
        assert_eq!(
            state,
            KeyState::from_words([0x00AA_0001, 0x8000_0000, 0, 0x0000_0001])
        );
    }

    #[test]
    fn decode_packed_code_96() {
        let mut data = [0u8; PACKED_REPORT_LEN];
        data[0] = PACKED_REPORT_ID;
        data[14] = 0x01;
        let state = decode(&data).unwrap().unwrap();
        assert_eq!(state.codes().collect::<Vec<_>>(), vec![96]);
    }

    #[test]
    fn decode_packed_low_codes() {
        // byte 2 carries codes 0..=7, byte 5 carries codes 24..=31
        let mut data = [0u8; PACKED_REPORT_LEN];
        data[0] = PACKED_REPORT_ID;
        data[2] = 0x30;
        data[5] = 0x80;
        let state = decode(&data).unwrap().unwrap();
        assert_eq!(state.codes().collect::<Vec<_>>(), vec![4, 5, 31]);
    }

    #[test]
    fn decode_is_deterministic() {
        let data = sparse(&[4, 60, 90]);
        assert_eq!(decode(&data).unwrap(), decode(&data).unwrap());
    }

    #[test]
    fn sparse_reencode_preserves_codes() {
        for codes in [&[][..], &[4], &[4, 5], &[97, 3, 3, 64], &[1, 2, 3, 4, 5, 6]] {
            let data = sparse(codes);
            let state = decode(&data).unwrap().unwrap();
            let encoded = encode_sparse(&state).unwrap();
            let again = decode(&encoded).unwrap().unwrap();
            assert_eq!(again, state, "codes {codes:?}");

            let mut expected: Vec<u8> = codes.to_vec();
            expected.sort_unstable();
            expected.dedup();
            assert_eq!(state.codes().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn encode_sparse_overflow() {
        let state = state_of(&[1, 2, 3, 4, 5, 6, 7]);
        assert!(encode_sparse(&state).is_none());
    }

    #[test]
    fn encode_packed_matches_decoder() {
        let state = state_of(&[0, 4, 31, 32, 95, 96, 119]);
        let data = encode_packed(&state);
        assert_eq!(decode(&data).unwrap().unwrap(), state);
    }

    #[test]
    fn encode_packed_drops_unreachable_codes() {
        let state = state_of(&[4, 120, 127]);
        let data = encode_packed(&state);
        assert_eq!(
            decode(&data).unwrap().unwrap().codes().collect::<Vec<_>>(),
            vec![4]
        );
    }
}
