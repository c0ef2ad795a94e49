//! Script number encoding.
//!
//! Numbers on the script stack are little-endian byte arrays with a sign bit
//! in the most significant bit of the last byte. Disassembly reads pushes of
//! up to four bytes as numbers, so the width here is bounded and an `i64`
//! holds every value that can be decoded.

use crate::ScriptError;

/// Default maximum width, in bytes, of a numeric stack element.
pub const DEFAULT_MAX_NUM_SIZE: usize = 4;

/// A decoded script number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScriptNum(pub i64);

impl ScriptNum {
    /// Parse a stack element into a number.
    ///
    /// `max_len` bounds the element width; `require_minimal` rejects
    /// encodings with redundant trailing zero bytes (including negative
    /// zero). Widths above eight bytes are always rejected.
    pub fn from_bytes(
        bytes: &[u8],
        require_minimal: bool,
        max_len: usize,
    ) -> Result<Self, ScriptError> {
        if bytes.len() > max_len || bytes.len() > 8 {
            return Err(ScriptError::NumberTooBig(bytes.len()));
        }
        if require_minimal && !is_minimally_encoded(bytes) {
            return Err(ScriptError::NonMinimalNumber(hex::encode(bytes)));
        }
        let Some((&last, _)) = bytes.split_last() else {
            return Ok(ScriptNum(0));
        };

        let mut magnitude: u64 = 0;
        for (i, b) in bytes.iter().enumerate() {
            magnitude |= (*b as u64) << (8 * i);
        }
        if last & 0x80 == 0 {
            return Ok(ScriptNum(magnitude as i64));
        }
        magnitude &= !(0x80u64 << (8 * (bytes.len() - 1)));
        Ok(ScriptNum(-(magnitude as i64)))
    }

    /// Serialize to the minimal little-endian sign-magnitude form.
    ///
    /// Zero encodes as the empty vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.0 == 0 {
            return Vec::new();
        }
        let negative = self.0 < 0;
        let mut abs = self.0.unsigned_abs();
        let mut out = Vec::with_capacity(9);
        while abs > 0 {
            out.push((abs & 0xff) as u8);
            abs >>= 8;
        }
        let last = out.len() - 1;
        if out[last] & 0x80 != 0 {
            out.push(if negative { 0x80 } else { 0x00 });
        } else if negative {
            out[last] |= 0x80;
        }
        out
    }

    /// The numeric value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ScriptNum {
    fn from(v: i64) -> Self {
        ScriptNum(v)
    }
}

/// Whether `bytes` is the shortest encoding of the number it represents.
pub fn is_minimally_encoded(bytes: &[u8]) -> bool {
    match bytes {
        [] => true,
        [.., last] if last & 0x7f != 0 => true,
        [_] => false,
        [.., prev, _] => prev & 0x80 != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_values() {
        let cases: &[(&[u8], i64)] = &[
            (&[], 0),
            (&[0x01], 1),
            (&[0x81], -1),
            (&[0x7f], 127),
            (&[0x80, 0x00], 128),
            (&[0x80, 0x80], -128),
            (&[0xff, 0xff, 0xff, 0x7f], 2_147_483_647),
            (&[0xff, 0xff, 0xff, 0xff], -2_147_483_647),
        ];
        for (bytes, want) in cases {
            let n = ScriptNum::from_bytes(bytes, true, DEFAULT_MAX_NUM_SIZE).unwrap();
            assert_eq!(n.value(), *want, "{:02x?}", bytes);
            assert_eq!(n.to_bytes(), bytes.to_vec());
        }
    }

    #[test]
    fn test_non_minimal_allowed_when_not_required() {
        // Negative zero and padded values still decode.
        assert_eq!(ScriptNum::from_bytes(&[0x80], false, 4).unwrap().value(), 0);
        assert_eq!(ScriptNum::from_bytes(&[0x00], false, 4).unwrap().value(), 0);
        assert_eq!(ScriptNum::from_bytes(&[0x05, 0x00, 0x00], false, 4).unwrap().value(), 5);
        assert_eq!(ScriptNum::from_bytes(&[0x05, 0x00, 0x80], false, 4).unwrap().value(), -5);
    }

    #[test]
    fn test_non_minimal_rejected_when_required() {
        for bytes in [&[0x00][..], &[0x80], &[0x05, 0x00], &[0x05, 0x80]] {
            assert!(matches!(
                ScriptNum::from_bytes(bytes, true, 4),
                Err(ScriptError::NonMinimalNumber(_))
            ));
        }
        // A trailing sign byte is needed when the previous byte uses the top bit.
        assert!(ScriptNum::from_bytes(&[0xff, 0x00], true, 4).is_ok());
    }

    #[test]
    fn test_too_wide() {
        assert!(matches!(
            ScriptNum::from_bytes(&[1, 2, 3, 4, 5], false, 4),
            Err(ScriptError::NumberTooBig(5))
        ));
        assert!(ScriptNum::from_bytes(&[1, 2, 3, 4, 5], false, 5).is_ok());
    }
}
