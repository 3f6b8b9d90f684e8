//! Pattern compilation and classification.
//!
//! Compilation parses the pattern text into the fixed byte sequence the
//! scanners search for, classifies the pattern as literal-only or general,
//! and records the wall-clock compile duration. The supported grammar is the
//! minimal literal grammar plus backslash escapes; only a malformed escape
//! can fail.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::context::EngineContext;
use crate::error::{MatchError, Result};
use crate::pattern::flags::RegexFlags;
use crate::simd::CpuFeatures;

/// Characters with special meaning in the pattern grammar.
///
/// A pattern containing none of these is classified literal-only.
const SPECIAL_CHARS: &[u8] = b".*+?[](){}|^$\\";

/// Check whether a pattern string contains no special syntax characters.
///
/// This is a pure function of the pattern text; flags never change the
/// classification (case folding under `IGNORECASE` changes the comparison,
/// not the grammar).
pub fn is_literal_pattern(pattern: &str) -> bool {
    !pattern.bytes().any(|b| SPECIAL_CHARS.contains(&b))
}

/// Resolve backslash escapes, producing the fixed text the scanners search
/// for.
///
/// Recognized escapes are the special characters themselves (`\.`, `\*`,
/// `\\`, ...) and the control shorthands `\n`, `\t`, `\r`, `\0`. A trailing
/// backslash or an unrecognized escape fails with
/// [`MatchError::PatternSyntax`].
fn parse_literal(pattern: &str) -> Result<String> {
    if !pattern.as_bytes().contains(&b'\\') {
        return Ok(pattern.to_string());
    }

    let mut needle = String::with_capacity(pattern.len());
    let mut chars = pattern.char_indices();

    while let Some((position, ch)) = chars.next() {
        if ch != '\\' {
            needle.push(ch);
            continue;
        }
        match chars.next() {
            Some((_, escaped)) if SPECIAL_CHARS.contains(&(escaped as u8)) && escaped.is_ascii() => {
                needle.push(escaped);
            }
            Some((_, 'n')) => needle.push('\n'),
            Some((_, 't')) => needle.push('\t'),
            Some((_, 'r')) => needle.push('\r'),
            Some((_, '0')) => needle.push('\0'),
            Some((_, escaped)) => {
                return Err(MatchError::PatternSyntax {
                    position,
                    message: format!("unrecognized escape '\\{escaped}'"),
                });
            }
            None => {
                return Err(MatchError::PatternSyntax {
                    position,
                    message: "trailing backslash".to_string(),
                });
            }
        }
    }

    Ok(needle)
}

/// A pattern compiled for repeated matching.
///
/// Owns the pattern text, the resolved needle, and the flags; all are
/// immutable after construction, so cached handles can be shared freely
/// across threads.
///
/// The matching operations live in [`crate::pattern::matcher`].
#[derive(Debug)]
pub struct CompiledPattern {
    pattern: String,
    /// Pattern text with escapes resolved; what the scanners actually search.
    pub(crate) needle: String,
    /// ASCII-lowercased needle, precomputed when `IGNORECASE` is set.
    pub(crate) folded_needle: Option<String>,
    flags: RegexFlags,
    use_simd: bool,
    literal_only: bool,
    jit_compiled: bool,
    compile_time: Duration,
    pub(crate) ctx: Arc<EngineContext>,
}

impl CompiledPattern {
    /// Compile a pattern against the process-wide engine context.
    ///
    /// `enable_jit_hint` only controls whether the literal-scan eligibility
    /// check runs at construction; it never changes matching results.
    pub fn compile(
        pattern: &str,
        use_simd: bool,
        flags: RegexFlags,
        enable_jit_hint: bool,
    ) -> Result<Self> {
        Self::compile_in(
            Arc::clone(EngineContext::global()),
            pattern,
            use_simd,
            flags,
            enable_jit_hint,
        )
    }

    /// Compile a pattern against an explicit engine context.
    ///
    /// Used by the cache and by tests that need isolated statistics.
    pub fn compile_in(
        ctx: Arc<EngineContext>,
        pattern: &str,
        use_simd: bool,
        flags: RegexFlags,
        enable_jit_hint: bool,
    ) -> Result<Self> {
        let start = Instant::now();

        let needle = parse_literal(pattern)?;
        let literal_only = is_literal_pattern(pattern);
        let folded_needle = if flags.contains(RegexFlags::IGNORECASE) {
            Some(needle.to_ascii_lowercase())
        } else {
            None
        };
        // Reporting flag only: the literal fast path is eligible and the
        // hardware can vectorize it.
        let jit_compiled = enable_jit_hint && literal_only && CpuFeatures::cached().has_any();

        Ok(Self {
            pattern: pattern.to_string(),
            needle,
            folded_needle,
            flags,
            use_simd,
            literal_only,
            jit_compiled,
            compile_time: start.elapsed(),
            ctx,
        })
    }

    /// Get the original pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check if SIMD is enabled for this instance.
    ///
    /// Independent of the process-wide mode: `false` disables vectorization
    /// for this pattern even when SIMD is globally available.
    pub fn use_simd(&self) -> bool {
        self.use_simd
    }

    /// Get the flags this pattern was compiled with.
    pub fn flags(&self) -> RegexFlags {
        self.flags
    }

    /// Check if the pattern is literal-only (no special syntax).
    pub fn is_literal(&self) -> bool {
        self.literal_only
    }

    /// Check if the literal fast path was marked eligible at construction.
    pub fn is_jit_compiled(&self) -> bool {
        self.jit_compiled
    }

    /// Get the compile duration in microseconds.
    pub fn compile_time_us(&self) -> u64 {
        self.compile_time.as_micros() as u64
    }
}
