//! # Fastmatch
//!
//! SIMD-accelerated literal pattern matching engine with a compiled-pattern
//! cache.
//!
//! The engine offers whole-string matching, substring search, non-overlapping
//! match enumeration, and substitution over fixed (literal) patterns,
//! accelerated by runtime-selected vectorized scanning with a scalar fallback
//! that guarantees identical results on any hardware.
//!
//! ## Features
//!
//! - **Literal fast path**: patterns without special syntax compile to a
//!   direct fixed-string scan
//! - **SIMD acceleration**: AVX-512, AVX2, SSE4.2, or NEON selected at
//!   runtime; forcing an unavailable set degrades to scalar, never errors
//! - **Compiled-pattern cache**: process-wide, thread-safe, with hit-rate
//!   accounting
//! - **Dispatch statistics**: per-instruction-set usage counters, atomically
//!   resettable
//! - **Thread-safe**: all shared state is safe under concurrent use
//!
//! ## Quick Start
//!
//! ```rust
//! use fastmatch::{CompiledPattern, RegexFlags};
//!
//! let p = CompiledPattern::compile("hello", true, RegexFlags::NONE, false)?;
//! assert!(p.matches("hello"));
//! assert!(!p.matches("hello "));
//! assert!(p.search("xxhelloxx"));
//! assert_eq!(p.replace("say hello", "hi"), "say hi");
//! # Ok::<(), fastmatch::MatchError>(())
//! ```
//!
//! ### One-shot functions
//!
//! For single uses, the module-level functions compile, match, and discard
//! in one call (no caching):
//!
//! ```rust
//! use fastmatch::RegexFlags;
//!
//! assert!(fastmatch::search("abc", "xxabcxx", RegexFlags::NONE, true)?);
//! assert_eq!(
//!     fastmatch::find_all("abc", "abcabcabc", RegexFlags::NONE, true)?,
//!     vec!["abc", "abc", "abc"]
//! );
//! assert_eq!(
//!     fastmatch::replace("a", "aaa", "b", RegexFlags::NONE, true)?,
//!     "bbb"
//! );
//! # Ok::<(), fastmatch::MatchError>(())
//! ```
//!
//! ### Cached compilation
//!
//! ```rust
//! use fastmatch::RegexFlags;
//!
//! let p = fastmatch::compile_cached("hello", RegexFlags::NONE, true)?;
//! assert!(p.matches("hello"));
//! // A second lookup with the same key is a cache hit
//! let q = fastmatch::compile_cached("hello", RegexFlags::NONE, true)?;
//! assert!(std::sync::Arc::ptr_eq(&p, &q));
//! # Ok::<(), fastmatch::MatchError>(())
//! ```
//!
//! ### SIMD control
//!
//! ```rust
//! use fastmatch::SimdMode;
//!
//! let caps = fastmatch::simd_capabilities();
//! println!("avx2: {}, neon: {}", caps.avx2, caps.neon);
//!
//! fastmatch::set_simd_mode(SimdMode::ScalarOnly);
//! assert_eq!(fastmatch::get_simd_mode(), SimdMode::ScalarOnly);
//! fastmatch::set_simd_mode(SimdMode::Auto);
//! ```
//!
//! ## Thread Safety
//!
//! All shared state (the SIMD mode, the dispatch statistics, and the
//! pattern cache) is safe under concurrent read/write from multiple
//! threads. [`CompiledPattern`] is `Send + Sync` and immutable after
//! construction; cache clearing never invalidates outstanding handles.

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod pattern;
pub mod simd;

use std::sync::Arc;

pub use cache::{CacheReport, PatternCache};
pub use config::SimdMode;
pub use context::EngineContext;
pub use error::{MatchError, Result};
pub use pattern::{is_literal_pattern, CompiledPattern, RegexFlags};
pub use simd::{CpuFeatures, SimdDispatcher, SimdLevel, SimdStats, SimdStatsSnapshot};

/// Engine version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reporting label for the detected hardware: `"SIMD optimized"` when any
/// vector instruction set is available, `"Scalar only"` otherwise.
pub fn simd_version() -> &'static str {
    if CpuFeatures::cached().has_any() {
        "SIMD optimized"
    } else {
        "Scalar only"
    }
}

/// Compile a pattern for repeated use against the process-wide context.
///
/// Uncached; see [`compile_cached`] for the caching variant.
pub fn compile(
    pattern: &str,
    use_simd: bool,
    flags: RegexFlags,
    enable_jit_hint: bool,
) -> Result<CompiledPattern> {
    CompiledPattern::compile(pattern, use_simd, flags, enable_jit_hint)
}

/// Look up a compiled pattern in the process-wide cache, compiling on a miss.
pub fn compile_cached(
    pattern: &str,
    flags: RegexFlags,
    use_simd: bool,
) -> Result<Arc<CompiledPattern>> {
    EngineContext::global().compile_cached(pattern, flags, use_simd)
}

/// One-shot whole-string match.
///
/// Compiles, matches once, and discards; behaves identically to
/// [`CompiledPattern::matches`] on a freshly compiled pattern.
pub fn matches(pattern: &str, input: &str, flags: RegexFlags, use_simd: bool) -> Result<bool> {
    Ok(compile(pattern, use_simd, flags, false)?.matches(input))
}

/// One-shot substring search.
pub fn search(pattern: &str, input: &str, flags: RegexFlags, use_simd: bool) -> Result<bool> {
    Ok(compile(pattern, use_simd, flags, false)?.search(input))
}

/// One-shot non-overlapping match enumeration.
pub fn find_all(
    pattern: &str,
    input: &str,
    flags: RegexFlags,
    use_simd: bool,
) -> Result<Vec<String>> {
    Ok(compile(pattern, use_simd, flags, false)?.find_all(input))
}

/// One-shot substitution of every non-overlapping match.
pub fn replace(
    pattern: &str,
    input: &str,
    replacement: &str,
    flags: RegexFlags,
    use_simd: bool,
) -> Result<String> {
    Ok(compile(pattern, use_simd, flags, false)?.replace(input, replacement))
}

/// Set the process-wide SIMD execution mode.
pub fn set_simd_mode(mode: SimdMode) {
    EngineContext::global().set_simd_mode(mode);
}

/// Get the process-wide SIMD execution mode.
pub fn get_simd_mode() -> SimdMode {
    EngineContext::global().simd_mode()
}

/// Get the detected CPU vector capabilities.
pub fn simd_capabilities() -> CpuFeatures {
    CpuFeatures::cached()
}

/// Snapshot the process-wide dispatch statistics.
pub fn simd_stats() -> SimdStatsSnapshot {
    EngineContext::global().simd_stats()
}

/// Reset the process-wide dispatch statistics.
pub fn reset_simd_stats() {
    EngineContext::global().reset_simd_stats();
}

/// Clear the process-wide pattern cache.
///
/// Handles already returned by [`compile_cached`] remain valid.
pub fn clear_cache() {
    EngineContext::global().cache().clear();
}

/// Number of patterns in the process-wide cache.
pub fn cache_size() -> usize {
    EngineContext::global().cache().len()
}

/// Hit rate of the process-wide cache, in `[0, 1]`.
pub fn cache_hit_rate() -> f64 {
    EngineContext::global().cache().hit_rate()
}

#[cfg(test)]
mod thread_safety {
    use super::*;

    #[test]
    fn test_public_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompiledPattern>();
        assert_send_sync::<EngineContext>();
        assert_send_sync::<PatternCache>();
        assert_send_sync::<SimdStats>();
        assert_send_sync::<SimdStatsSnapshot>();
        assert_send_sync::<CpuFeatures>();
        assert_send_sync::<SimdMode>();
        assert_send_sync::<RegexFlags>();
        assert_send_sync::<MatchError>();
    }

    #[test]
    fn test_one_shot_matches_compiled() {
        let flags = RegexFlags::NONE;
        let compiled = CompiledPattern::compile("abc", true, flags, false).unwrap();

        for input in ["abc", "xabcx", "nothing", ""] {
            assert_eq!(matches("abc", input, flags, true).unwrap(), compiled.matches(input));
            assert_eq!(search("abc", input, flags, true).unwrap(), compiled.search(input));
            assert_eq!(
                find_all("abc", input, flags, true).unwrap(),
                compiled.find_all(input)
            );
            assert_eq!(
                replace("abc", input, "-", flags, true).unwrap(),
                compiled.replace(input, "-")
            );
        }
    }

    #[test]
    fn test_version_strings() {
        assert!(!VERSION.is_empty());
        let label = simd_version();
        assert!(label == "SIMD optimized" || label == "Scalar only");
    }
}
