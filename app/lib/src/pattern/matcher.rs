//! Matching operations on compiled patterns.
//!
//! All four operations run over the same two dispatcher primitives
//! (first-occurrence search and full enumeration), so flag handling and SIMD
//! behavior stay consistent across them. Under `IGNORECASE` the input is
//! ASCII-case-folded once per call; folding preserves byte length, so match
//! spans map 1:1 back onto the original input.

use std::borrow::Cow;

use crate::error::{MatchError, Result};
use crate::pattern::compiler::CompiledPattern;
use crate::pattern::flags::RegexFlags;
use crate::simd::SimdDispatcher;

impl CompiledPattern {
    /// Build the dispatcher for one operation call.
    ///
    /// Reads the process-wide mode at call time, so a concurrent mode change
    /// takes effect on the next operation. An instance with SIMD disabled
    /// always dispatches scalar regardless of the global mode.
    fn dispatcher(&self) -> SimdDispatcher {
        let mode = if self.use_simd() {
            self.ctx.simd_mode()
        } else {
            crate::config::SimdMode::ScalarOnly
        };
        SimdDispatcher::for_mode(mode, self.ctx.stats_arc())
    }

    /// The needle the scanners compare against.
    fn scan_needle(&self) -> &[u8] {
        match &self.folded_needle {
            Some(folded) => folded.as_bytes(),
            None => self.needle.as_bytes(),
        }
    }

    /// Case-fold the input when `IGNORECASE` is set.
    fn scan_input<'a>(&self, input: &'a str) -> Cow<'a, str> {
        if self.flags().contains(RegexFlags::IGNORECASE) {
            Cow::Owned(input.to_ascii_lowercase())
        } else {
            Cow::Borrowed(input)
        }
    }

    /// Test whether the entire input matches the pattern.
    ///
    /// For the literal grammar this is exact equality, case-normalized under
    /// `IGNORECASE`. The empty pattern matches only the empty input.
    pub fn matches(&self, input: &str) -> bool {
        let needle = self.scan_needle();
        if input.len() != needle.len() {
            return false;
        }
        let haystack = self.scan_input(input);
        // Equal lengths leave position 0 as the only candidate.
        self.dispatcher().find_first(haystack.as_bytes(), needle) == Some(0)
    }

    /// Test whether any contiguous region of the input matches the pattern.
    ///
    /// First-occurrence semantics; the position is not reported. The empty
    /// pattern is trivially contained in any input.
    pub fn search(&self, input: &str) -> bool {
        let haystack = self.scan_input(input);
        self.dispatcher()
            .find_first(haystack.as_bytes(), self.scan_needle())
            .is_some()
    }

    /// Find the `(start, end)` byte spans of all non-overlapping matches,
    /// left to right.
    ///
    /// After a match ending at `end`, the scan resumes at `end`; spans never
    /// overlap and are ordered by increasing start.
    pub fn find_spans(&self, input: &str) -> Vec<(usize, usize)> {
        let needle = self.scan_needle();
        let haystack = self.scan_input(input);
        self.dispatcher()
            .find_all(haystack.as_bytes(), needle)
            .into_iter()
            .map(|start| (start, start + needle.len()))
            .collect()
    }

    /// Find all non-overlapping matched substrings, left to right.
    ///
    /// Substrings preserve the original casing of the input even under
    /// `IGNORECASE`.
    pub fn find_all(&self, input: &str) -> Vec<String> {
        self.find_spans(input)
            .into_iter()
            .map(|(start, end)| input[start..end].to_string())
            .collect()
    }

    /// Replace every non-overlapping match with `replacement`.
    ///
    /// The replacement text is inserted literally (no backreference
    /// expansion) and all unmatched spans are preserved verbatim.
    pub fn replace(&self, input: &str, replacement: &str) -> String {
        let spans = self.find_spans(input);
        if spans.is_empty() {
            return input.to_string();
        }

        let mut result = String::with_capacity(input.len() + replacement.len() * 2);
        let mut last_end = 0;
        for (start, end) in spans {
            result.push_str(&input[last_end..start]);
            result.push_str(replacement);
            last_end = end;
        }
        result.push_str(&input[last_end..]);
        result
    }

    /// Byte-slice variant of [`matches`](Self::matches).
    ///
    /// Fails with [`MatchError::InvalidEncoding`] if the input is not valid
    /// UTF-8; the failure touches neither the cache nor the statistics.
    pub fn matches_bytes(&self, input: &[u8]) -> Result<bool> {
        Ok(self.matches(validate_utf8(input)?))
    }

    /// Byte-slice variant of [`search`](Self::search).
    pub fn search_bytes(&self, input: &[u8]) -> Result<bool> {
        Ok(self.search(validate_utf8(input)?))
    }

    /// Byte-slice variant of [`find_all`](Self::find_all).
    pub fn find_all_bytes(&self, input: &[u8]) -> Result<Vec<String>> {
        Ok(self.find_all(validate_utf8(input)?))
    }

    /// Byte-slice variant of [`replace`](Self::replace).
    pub fn replace_bytes(&self, input: &[u8], replacement: &str) -> Result<String> {
        Ok(self.replace(validate_utf8(input)?, replacement))
    }
}

fn validate_utf8(input: &[u8]) -> Result<&str> {
    std::str::from_utf8(input).map_err(|e| MatchError::InvalidEncoding {
        position: e.valid_up_to(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::EngineContext;

    fn compile(pattern: &str, flags: RegexFlags) -> CompiledPattern {
        let ctx = Arc::new(EngineContext::new());
        CompiledPattern::compile_in(ctx, pattern, true, flags, false).unwrap()
    }

    #[test]
    fn test_matches_whole_string() {
        let p = compile("hello", RegexFlags::NONE);
        assert!(p.matches("hello"));
        assert!(!p.matches("hello "));
        assert!(!p.matches(" hello"));
        assert!(!p.matches("hell"));
    }

    #[test]
    fn test_matches_empty_pattern() {
        let p = compile("", RegexFlags::NONE);
        assert!(p.matches(""));
        assert!(!p.matches("a"));
    }

    #[test]
    fn test_matches_ignorecase() {
        let p = compile("abc", RegexFlags::IGNORECASE);
        assert!(p.matches("ABC"));
        assert!(p.matches("aBc"));
        assert!(!p.matches("abd"));
    }

    #[test]
    fn test_search() {
        let p = compile("hello", RegexFlags::NONE);
        assert!(p.search("xxhelloxx"));
        assert!(p.search("hello"));
        assert!(!p.search("xxhelxx"));
    }

    #[test]
    fn test_search_empty_pattern_always_contained() {
        let p = compile("", RegexFlags::NONE);
        assert!(p.search(""));
        assert!(p.search("anything"));
    }

    #[test]
    fn test_find_all_non_overlapping() {
        let p = compile("abc", RegexFlags::NONE);
        assert_eq!(p.find_all("abcabcabc"), vec!["abc", "abc", "abc"]);
        assert_eq!(
            p.find_spans("abcabcabc"),
            vec![(0, 3), (3, 6), (6, 9)]
        );

        let p = compile("aa", RegexFlags::NONE);
        assert_eq!(p.find_spans("aaaa"), vec![(0, 2), (2, 4)]);
        assert_eq!(p.find_spans("aaa"), vec![(0, 2)]);
    }

    #[test]
    fn test_find_all_preserves_original_casing() {
        let p = compile("ab", RegexFlags::IGNORECASE);
        assert_eq!(p.find_all("AbxaBxab"), vec!["Ab", "aB", "ab"]);
    }

    #[test]
    fn test_find_all_empty_pattern_is_finite() {
        let p = compile("", RegexFlags::NONE);
        assert!(p.find_all("abc").is_empty());
    }

    #[test]
    fn test_replace() {
        let p = compile("a", RegexFlags::NONE);
        assert_eq!(p.replace("aaa", "b"), "bbb");

        let p = compile("abc", RegexFlags::NONE);
        assert_eq!(p.replace("xabcyabcz", "-"), "x-y-z");
        assert_eq!(p.replace("no match here", "-"), "no match here");
    }

    #[test]
    fn test_replace_empty_replacement() {
        let p = compile("ab", RegexFlags::NONE);
        assert_eq!(p.replace("xabyab", ""), "xy");
    }

    #[test]
    fn test_replace_is_literal_no_backrefs() {
        let p = compile("cat", RegexFlags::NONE);
        assert_eq!(p.replace("cat", "$0\\1"), "$0\\1");
    }

    #[test]
    fn test_replace_ignorecase_preserves_unmatched() {
        let p = compile("hello", RegexFlags::IGNORECASE);
        assert_eq!(p.replace("say HELLO World", "hi"), "say hi World");
    }

    #[test]
    fn test_escaped_pattern_matches_resolved_text() {
        let p = compile(r"a\.b", RegexFlags::NONE);
        assert!(p.matches("a.b"));
        assert!(!p.matches("axb"));
        assert!(p.search("xx a.b xx"));
    }

    #[test]
    fn test_unicode_input() {
        let p = compile("héllo", RegexFlags::NONE);
        assert!(p.matches("héllo"));
        assert_eq!(p.find_all("héllo héllo"), vec!["héllo", "héllo"]);
        assert_eq!(p.replace("héllo world", "hi"), "hi world");
    }

    #[test]
    fn test_bytes_entry_points() {
        let p = compile("hello", RegexFlags::NONE);
        assert!(p.matches_bytes(b"hello").unwrap());
        assert!(p.search_bytes(b"xxhelloxx").unwrap());

        let invalid = [b'h', 0xFF, b'i'];
        let err = p.search_bytes(&invalid).unwrap_err();
        match err {
            MatchError::InvalidEncoding { position } => assert_eq!(position, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_instance_simd_toggle_forces_scalar() {
        let ctx = Arc::new(EngineContext::new());
        let p =
            CompiledPattern::compile_in(Arc::clone(&ctx), "abc", false, RegexFlags::NONE, false)
                .unwrap();
        let haystack = "abc".repeat(50);
        assert!(p.search(&haystack));

        let stats = ctx.stats().snapshot();
        assert_eq!(stats.scalar_count, stats.total_calls);
        assert!(stats.scalar_count > 0);
    }

    #[test]
    fn test_replace_splice_consistency_with_spans() {
        let p = compile("ab", RegexFlags::NONE);
        let input = "ab ab cab abab";
        let spans = p.find_spans(input);

        let mut spliced = String::new();
        let mut last = 0;
        for (start, end) in spans {
            spliced.push_str(&input[last..start]);
            spliced.push_str("<>");
            last = end;
        }
        spliced.push_str(&input[last..]);

        assert_eq!(spliced, p.replace(input, "<>"));
    }
}
