//! Shared engine state: SIMD mode, dispatch statistics, and pattern cache.
//!
//! Rather than three hidden globals, the mutable process-wide state lives in
//! an explicit [`EngineContext`] passed by shared ownership. The usual "one
//! shared instance per process" usage pattern goes through
//! [`EngineContext::global`]; tests and embedders can construct isolated
//! contexts instead.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::cache::{CacheReport, PatternCache};
use crate::config::SimdMode;
use crate::error::Result;
use crate::pattern::{CompiledPattern, RegexFlags};
use crate::simd::{CpuFeatures, SimdStats, SimdStatsSnapshot};

/// Shared engine state for one matching domain.
///
/// Every getter/setter/lookup is independently atomic; no transaction spans
/// two operations. A mode change between "read mode" and "dispatch" in a
/// racing thread is harmless because every scanner produces identical
/// results.
#[derive(Debug, Default)]
pub struct EngineContext {
    mode: RwLock<SimdMode>,
    stats: Arc<SimdStats>,
    cache: PatternCache,
}

impl EngineContext {
    /// Create an isolated context with mode `Auto`, fresh statistics, and an
    /// empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the process-wide shared context, creating it on first use.
    pub fn global() -> &'static Arc<EngineContext> {
        static GLOBAL: OnceLock<Arc<EngineContext>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(EngineContext::new()))
    }

    /// Get the current SIMD execution mode.
    pub fn simd_mode(&self) -> SimdMode {
        *self.mode.read()
    }

    /// Set the SIMD execution mode.
    ///
    /// Forcing an instruction set the CPU lacks is accepted; dispatch falls
    /// back to scalar silently, with a debug-level diagnostic here since the
    /// fallback itself must stay non-fatal and result-preserving.
    pub fn set_simd_mode(&self, mode: SimdMode) {
        if mode.is_forced() {
            let features = CpuFeatures::cached();
            let available = match mode {
                SimdMode::ForceAvx512 => features.avx512,
                SimdMode::ForceAvx2 => features.avx2,
                SimdMode::ForceSse42 => features.sse42,
                SimdMode::ForceNeon => features.neon,
                _ => true,
            };
            if !available {
                log::debug!("forced SIMD mode {mode} unavailable on this CPU, dispatch will use scalar");
            }
        }
        *self.mode.write() = mode;
    }

    /// Get the dispatch statistics tracker.
    pub fn stats(&self) -> &SimdStats {
        &self.stats
    }

    /// Shared handle to the statistics tracker, for dispatcher construction.
    pub(crate) fn stats_arc(&self) -> Arc<SimdStats> {
        Arc::clone(&self.stats)
    }

    /// Take a snapshot of the dispatch statistics.
    pub fn simd_stats(&self) -> SimdStatsSnapshot {
        self.stats.snapshot()
    }

    /// Reset all dispatch counters.
    pub fn reset_simd_stats(&self) {
        self.stats.reset();
    }

    /// Get the pattern cache.
    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Look up a compiled pattern in this context's cache, compiling on a
    /// miss.
    pub fn compile_cached(
        self: &Arc<Self>,
        pattern: &str,
        flags: RegexFlags,
        use_simd: bool,
    ) -> Result<Arc<CompiledPattern>> {
        self.cache.get_or_compile(self, pattern, flags, use_simd)
    }

    /// Take a reporting snapshot of the cache.
    pub fn cache_report(&self) -> CacheReport {
        self.cache.report()
    }
}
