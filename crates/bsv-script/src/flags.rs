//! Script verification flags (bitmask).

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Verification flags that govern signature encoding checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptFlags(pub u32);

impl ScriptFlags {
    pub const NONE: ScriptFlags = ScriptFlags(0);
    pub const VERIFY_P2SH: ScriptFlags = ScriptFlags(1 << 0);
    pub const VERIFY_STRICT_ENCODING: ScriptFlags = ScriptFlags(1 << 1);
    pub const VERIFY_DER_SIGNATURES: ScriptFlags = ScriptFlags(1 << 2);
    pub const VERIFY_LOW_S: ScriptFlags = ScriptFlags(1 << 3);
    pub const VERIFY_MINIMAL_DATA: ScriptFlags = ScriptFlags(1 << 6);
    pub const ENABLE_SIGHASH_FORKID: ScriptFlags = ScriptFlags(1 << 16);

    pub fn has_flag(self, flag: ScriptFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn has_any(self, flags: &[ScriptFlags]) -> bool {
        flags.iter().any(|f| self.has_flag(*f))
    }

    pub fn add_flag(&mut self, flag: ScriptFlags) {
        self.0 |= flag.0;
    }
}

impl BitOr for ScriptFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ScriptFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScriptFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ScriptFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        ScriptFlags(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_flag_and_any() {
        let mut flags = ScriptFlags::VERIFY_STRICT_ENCODING | ScriptFlags::VERIFY_LOW_S;
        assert!(flags.has_flag(ScriptFlags::VERIFY_LOW_S));
        assert!(!flags.has_flag(ScriptFlags::ENABLE_SIGHASH_FORKID));
        assert!(flags.has_any(&[ScriptFlags::VERIFY_DER_SIGNATURES, ScriptFlags::VERIFY_LOW_S]));

        flags.add_flag(ScriptFlags::ENABLE_SIGHASH_FORKID);
        assert!(flags.has_flag(ScriptFlags::ENABLE_SIGHASH_FORKID));
        assert_eq!(
            flags & ScriptFlags::VERIFY_LOW_S,
            ScriptFlags::VERIFY_LOW_S
        );
    }

    #[test]
    fn test_none_has_nothing() {
        assert!(!ScriptFlags::NONE.has_any(&[
            ScriptFlags::VERIFY_P2SH,
            ScriptFlags::VERIFY_DER_SIGNATURES,
        ]));
        assert_eq!(ScriptFlags::default(), ScriptFlags::NONE);
    }
}
