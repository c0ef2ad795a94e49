//! Signature encoding checks.
//!
//! A script signature is a DER-encoded ECDSA signature followed by a single
//! sighash-type byte. These checks look only at the encoding; no signature
//! is ever verified against a key or a message.

use num_bigint::BigUint;

use crate::error::SigEncodingError;
use crate::flags::ScriptFlags;

pub const SIGHASH_ALL: u8 = 0x01;
pub const SIGHASH_NONE: u8 = 0x02;
pub const SIGHASH_SINGLE: u8 = 0x03;
pub const SIGHASH_FORKID: u8 = 0x40;
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// Half the secp256k1 group order, the largest S a low-S signature may carry.
const HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b,
    0x20, 0xa0,
];

/// Check a signature with its trailing hash-type byte against `flags`.
///
/// An empty signature always passes. With any of DER, low-S or strict
/// encoding requested the body must be strict DER; low-S additionally bounds
/// S, and strict encoding requires a defined hash type whose forkid bit
/// matches `ENABLE_SIGHASH_FORKID`.
pub fn check_signature_encoding(sig: &[u8], flags: ScriptFlags) -> Result<(), SigEncodingError> {
    let Some((&hash_type, der)) = sig.split_last() else {
        return Ok(());
    };

    if flags.has_any(&[
        ScriptFlags::VERIFY_DER_SIGNATURES,
        ScriptFlags::VERIFY_LOW_S,
        ScriptFlags::VERIFY_STRICT_ENCODING,
    ]) {
        let s = check_der_encoding(der)?;
        if flags.has_flag(ScriptFlags::VERIFY_LOW_S) && !is_low_s(s) {
            return Err(SigEncodingError::HighS);
        }
    }

    if flags.has_flag(ScriptFlags::VERIFY_STRICT_ENCODING) {
        check_hash_type_encoding(hash_type, flags)?;
    }
    Ok(())
}

/// Validate the hash-type byte of a signature.
pub fn check_hash_type_encoding(hash_type: u8, flags: ScriptFlags) -> Result<(), SigEncodingError> {
    let base = hash_type & !(SIGHASH_ANYONECANPAY | SIGHASH_FORKID);
    if !(SIGHASH_ALL..=SIGHASH_SINGLE).contains(&base) {
        return Err(SigEncodingError::UndefinedHashType(hash_type));
    }
    let uses_forkid = hash_type & SIGHASH_FORKID != 0;
    let forkid_enabled = flags.has_flag(ScriptFlags::ENABLE_SIGHASH_FORKID);
    if uses_forkid && !forkid_enabled {
        return Err(SigEncodingError::IllegalForkId(hash_type));
    }
    if forkid_enabled && !uses_forkid {
        return Err(SigEncodingError::MustUseForkId(hash_type));
    }
    Ok(())
}

/// Check strict DER layout and return the S integer bytes.
fn check_der_encoding(sig: &[u8]) -> Result<&[u8], SigEncodingError> {
    let sig_len = sig.len();
    if sig_len < 8 {
        return Err(SigEncodingError::TooShort(sig_len));
    }
    if sig_len > 72 {
        return Err(SigEncodingError::TooLong(sig_len));
    }
    if sig[0] != 0x30 {
        return Err(SigEncodingError::InvalidSeqId(sig[0]));
    }
    if sig[1] as usize != sig_len - 2 {
        return Err(SigEncodingError::InvalidDataLen(sig[1] as usize, sig_len - 2));
    }

    let r_len = sig[3] as usize;
    let s_type_offset = 4 + r_len;
    let s_len_offset = s_type_offset + 1;
    if s_type_offset >= sig_len {
        return Err(SigEncodingError::MissingSTypeId);
    }
    if s_len_offset >= sig_len {
        return Err(SigEncodingError::MissingSLen);
    }
    let s_offset = s_len_offset + 1;
    let s_len = sig[s_len_offset] as usize;
    if s_offset + s_len != sig_len {
        return Err(SigEncodingError::InvalidSLen);
    }

    if sig[2] != 0x02 {
        return Err(SigEncodingError::InvalidRIntId(sig[2]));
    }
    if r_len == 0 {
        return Err(SigEncodingError::ZeroRLen);
    }
    if sig[4] & 0x80 != 0 {
        return Err(SigEncodingError::NegativeR);
    }
    if r_len > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return Err(SigEncodingError::TooMuchRPadding);
    }

    if sig[s_type_offset] != 0x02 {
        return Err(SigEncodingError::InvalidSIntId(sig[s_type_offset]));
    }
    if s_len == 0 {
        return Err(SigEncodingError::ZeroSLen);
    }
    if sig[s_offset] & 0x80 != 0 {
        return Err(SigEncodingError::NegativeS);
    }
    if s_len > 1 && sig[s_offset] == 0x00 && sig[s_offset + 1] & 0x80 == 0 {
        return Err(SigEncodingError::TooMuchSPadding);
    }

    Ok(&sig[s_offset..])
}

fn is_low_s(s: &[u8]) -> bool {
    BigUint::from_bytes_be(s) <= BigUint::from_bytes_be(&HALF_ORDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Well-formed low-S DER signature body, without hash type.
    const DER_SIG: &str = "3044022072da3d2ba6c5a5b1b1b9a0bb8ec1bd4e2d4c9e1ef4dbd0df45ac83b7b2b9c6d7022047bd4a7a1e6ee0bfe4c8af3ef0d0ba9acbb3ceda3bb22a6b61fe1d8cc4fbcf0b";

    fn sig_with(hash_type: u8) -> Vec<u8> {
        let mut sig = hex::decode(DER_SIG).unwrap();
        sig.push(hash_type);
        sig
    }

    fn strict() -> ScriptFlags {
        ScriptFlags::VERIFY_STRICT_ENCODING | ScriptFlags::ENABLE_SIGHASH_FORKID
    }

    #[test]
    fn test_empty_signature_passes() {
        assert!(check_signature_encoding(&[], strict() | ScriptFlags::VERIFY_LOW_S).is_ok());
    }

    #[test]
    fn test_valid_forkid_signature() {
        let sig = sig_with(SIGHASH_ALL | SIGHASH_FORKID);
        assert!(check_signature_encoding(&sig, strict()).is_ok());
        assert!(check_signature_encoding(&sig, strict() | ScriptFlags::VERIFY_LOW_S).is_ok());
    }

    #[test]
    fn test_forkid_mismatch() {
        let sig = sig_with(SIGHASH_ALL);
        assert_eq!(
            check_signature_encoding(&sig, strict()),
            Err(SigEncodingError::MustUseForkId(SIGHASH_ALL))
        );
        let sig = sig_with(SIGHASH_ALL | SIGHASH_FORKID);
        assert_eq!(
            check_signature_encoding(&sig, ScriptFlags::VERIFY_STRICT_ENCODING),
            Err(SigEncodingError::IllegalForkId(0x41))
        );
    }

    #[test]
    fn test_undefined_hash_type() {
        let sig = sig_with(0x44);
        assert_eq!(
            check_signature_encoding(&sig, strict()),
            Err(SigEncodingError::UndefinedHashType(0x44))
        );
        let sig = sig_with(SIGHASH_SINGLE | SIGHASH_ANYONECANPAY | SIGHASH_FORKID);
        assert!(check_signature_encoding(&sig, strict()).is_ok());
    }

    #[test]
    fn test_no_flags_accepts_garbage() {
        assert!(check_signature_encoding(&[0xde, 0xad, 0xbe, 0xef], ScriptFlags::NONE).is_ok());
    }

    #[test]
    fn test_malformed_der() {
        let mut sig = sig_with(SIGHASH_ALL | SIGHASH_FORKID);
        sig[0] = 0x31;
        assert_eq!(
            check_signature_encoding(&sig, ScriptFlags::VERIFY_DER_SIGNATURES),
            Err(SigEncodingError::InvalidSeqId(0x31))
        );
        assert_eq!(
            check_signature_encoding(&[0x30, 0x01, 0x41], ScriptFlags::VERIFY_DER_SIGNATURES),
            Err(SigEncodingError::TooShort(2))
        );
    }

    #[test]
    fn test_high_s_rejected() {
        // r = 1, s = n - 1 (well above half order).
        let mut sig = vec![0x30, 0x26, 0x02, 0x01, 0x01, 0x02, 0x21, 0x00];
        sig.extend_from_slice(
            &hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140")
                .unwrap(),
        );
        sig.push(SIGHASH_ALL | SIGHASH_FORKID);
        assert!(check_signature_encoding(&sig, ScriptFlags::VERIFY_DER_SIGNATURES).is_ok());
        assert_eq!(
            check_signature_encoding(&sig, ScriptFlags::VERIFY_LOW_S),
            Err(SigEncodingError::HighS)
        );
    }
}
