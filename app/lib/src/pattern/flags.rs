//! Pattern modifier flags.

use bitflags::bitflags;

bitflags! {
    /// Independent boolean pattern modifiers with bitset semantics.
    ///
    /// Flags participate in the cache key, so the same pattern text compiled
    /// under different flags occupies distinct cache entries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RegexFlags: u8 {
        /// Case-insensitive matching (ASCII case folding).
        const IGNORECASE = 1 << 0;
        /// Multi-line semantics. Accepted for compatibility; a fixed-string
        /// scan has no anchors for it to affect.
        const MULTILINE = 1 << 1;
        /// Dot-matches-newline semantics. Accepted for compatibility; no
        /// observable effect under the literal grammar.
        const DOTALL = 1 << 2;
        /// Optimization hint; never changes results.
        const OPTIMIZE = 1 << 3;
    }
}

impl RegexFlags {
    /// The empty flag set.
    pub const NONE: RegexFlags = RegexFlags::empty();
}

impl Default for RegexFlags {
    fn default() -> Self {
        RegexFlags::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_empty() {
        assert_eq!(RegexFlags::NONE, RegexFlags::empty());
        assert_eq!(RegexFlags::default(), RegexFlags::NONE);
    }

    #[test]
    fn test_bitset_combination() {
        let flags = RegexFlags::IGNORECASE | RegexFlags::MULTILINE;
        assert!(flags.contains(RegexFlags::IGNORECASE));
        assert!(flags.contains(RegexFlags::MULTILINE));
        assert!(!flags.contains(RegexFlags::DOTALL));
    }

    #[test]
    fn test_bits_round_trip() {
        let flags = RegexFlags::IGNORECASE | RegexFlags::OPTIMIZE;
        assert_eq!(RegexFlags::from_bits(flags.bits()), Some(flags));
    }
}
