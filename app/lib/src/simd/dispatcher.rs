//! SIMD dispatcher with runtime CPU feature detection.
//!
//! This module provides the entry point for SIMD-accelerated scanning,
//! selecting a concrete scanner from the configured [`SimdMode`] and the
//! detected CPU features, and accounting every dispatch in [`SimdStats`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde::Serialize;

use crate::config::SimdMode;

/// Detected CPU features for SIMD acceleration.
///
/// Holds the results of runtime CPU feature detection, indicating which
/// vector instruction sets are available on the current CPU. Families that
/// are meaningless on the current architecture report `false` rather than
/// failing (e.g. `neon` on x86_64).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CpuFeatures {
    /// AVX-512 (F + BW) is available (x86_64 only).
    pub avx512: bool,
    /// AVX2 is available (x86_64 only).
    pub avx2: bool,
    /// SSE4.2 is available (x86_64 only).
    pub sse42: bool,
    /// NEON is available (ARM64 only).
    pub neon: bool,
}

impl CpuFeatures {
    /// Detect CPU features at runtime.
    ///
    /// Prefer [`CpuFeatures::cached`] in hot paths; the probe itself is
    /// cheap but not free.
    #[cfg(target_arch = "x86_64")]
    pub fn detect() -> Self {
        Self {
            avx512: std::arch::is_x86_feature_detected!("avx512f")
                && std::arch::is_x86_feature_detected!("avx512bw"),
            avx2: std::arch::is_x86_feature_detected!("avx2"),
            sse42: std::arch::is_x86_feature_detected!("sse4.2"),
            neon: false,
        }
    }

    /// Detect CPU features at runtime (ARM64 version).
    #[cfg(target_arch = "aarch64")]
    pub fn detect() -> Self {
        // NEON is mandatory on ARM64, so it's always available
        Self {
            avx512: false,
            avx2: false,
            sse42: false,
            neon: true,
        }
    }

    /// Detect CPU features at runtime (fallback for other architectures).
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    pub fn detect() -> Self {
        Self::none()
    }

    /// Get the process-wide cached detection result.
    ///
    /// The probe runs once on first use; subsequent calls are a plain load.
    pub fn cached() -> Self {
        static FEATURES: OnceLock<CpuFeatures> = OnceLock::new();
        *FEATURES.get_or_init(Self::detect)
    }

    /// Create a CpuFeatures with no SIMD support.
    ///
    /// Useful for testing scalar fallback selection.
    pub fn none() -> Self {
        Self {
            avx512: false,
            avx2: false,
            sse42: false,
            neon: false,
        }
    }

    /// Check if any SIMD instruction set is available.
    pub fn has_any(&self) -> bool {
        self.avx512 || self.avx2 || self.sse42 || self.neon
    }
}

impl Default for CpuFeatures {
    fn default() -> Self {
        Self::detect()
    }
}

/// The concrete scanner implementation selected for a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimdLevel {
    /// AVX-512 (512-bit vectors, x86_64).
    Avx512,
    /// AVX2 (256-bit vectors, x86_64).
    Avx2,
    /// SSE4.2 (128-bit vectors, x86_64).
    Sse42,
    /// NEON (128-bit vectors, ARM64).
    Neon,
    /// Scalar fallback (no SIMD).
    Scalar,
}

impl std::fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimdLevel::Avx512 => write!(f, "AVX-512"),
            SimdLevel::Avx2 => write!(f, "AVX2"),
            SimdLevel::Sse42 => write!(f, "SSE4.2"),
            SimdLevel::Neon => write!(f, "NEON"),
            SimdLevel::Scalar => write!(f, "Scalar"),
        }
    }
}

/// Select the scanner level for a mode and a set of detected features.
///
/// This is a pure function so every (mode, features) combination can be
/// tested exhaustively:
///
/// - `Auto` prefers the widest available vectors:
///   AVX-512 > AVX2 > SSE4.2 > NEON > scalar.
/// - A forced mode uses exactly the requested set if available, otherwise
///   scalar. It never substitutes a different set.
/// - `ScalarOnly` always selects scalar.
pub fn select_level(mode: SimdMode, features: CpuFeatures) -> SimdLevel {
    match mode {
        SimdMode::ScalarOnly => SimdLevel::Scalar,
        SimdMode::Auto => {
            if features.avx512 {
                SimdLevel::Avx512
            } else if features.avx2 {
                SimdLevel::Avx2
            } else if features.sse42 {
                SimdLevel::Sse42
            } else if features.neon {
                SimdLevel::Neon
            } else {
                SimdLevel::Scalar
            }
        }
        SimdMode::ForceAvx512 if features.avx512 => SimdLevel::Avx512,
        SimdMode::ForceAvx2 if features.avx2 => SimdLevel::Avx2,
        SimdMode::ForceSse42 if features.sse42 => SimdLevel::Sse42,
        SimdMode::ForceNeon if features.neon => SimdLevel::Neon,
        _ => SimdLevel::Scalar,
    }
}

/// Per-level dispatch counters.
///
/// Increments are lock-free atomic adds taken under the read side of an
/// `RwLock`; [`SimdStats::reset`] takes the write side, so an observer never
/// sees a partially-reset counter set.
#[derive(Debug, Default)]
struct StatsCounters {
    avx512_count: AtomicU64,
    avx2_count: AtomicU64,
    sse42_count: AtomicU64,
    neon_count: AtomicU64,
    scalar_count: AtomicU64,
}

/// Thread-safe SIMD dispatch statistics.
///
/// One dispatch is recorded per scanning-primitive invocation. The total is
/// derived as the sum of the per-level counters, so `total_calls` always
/// equals that sum in any snapshot.
#[derive(Debug, Default)]
pub struct SimdStats {
    inner: RwLock<StatsCounters>,
}

impl SimdStats {
    /// Create a statistics tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one dispatch at the given level.
    pub fn record(&self, level: SimdLevel) {
        let counters = self.inner.read();
        let counter = match level {
            SimdLevel::Avx512 => &counters.avx512_count,
            SimdLevel::Avx2 => &counters.avx2_count,
            SimdLevel::Sse42 => &counters.sse42_count,
            SimdLevel::Neon => &counters.neon_count,
            SimdLevel::Scalar => &counters.scalar_count,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Reset all counters to zero.
    ///
    /// Takes the write lock, so concurrent records and snapshots observe the
    /// reset as instantaneous.
    pub fn reset(&self) {
        let counters = self.inner.write();
        counters.avx512_count.store(0, Ordering::Relaxed);
        counters.avx2_count.store(0, Ordering::Relaxed);
        counters.sse42_count.store(0, Ordering::Relaxed);
        counters.neon_count.store(0, Ordering::Relaxed);
        counters.scalar_count.store(0, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> SimdStatsSnapshot {
        let counters = self.inner.read();
        let avx512_count = counters.avx512_count.load(Ordering::Relaxed);
        let avx2_count = counters.avx2_count.load(Ordering::Relaxed);
        let sse42_count = counters.sse42_count.load(Ordering::Relaxed);
        let neon_count = counters.neon_count.load(Ordering::Relaxed);
        let scalar_count = counters.scalar_count.load(Ordering::Relaxed);
        SimdStatsSnapshot {
            total_calls: avx512_count + avx2_count + sse42_count + neon_count + scalar_count,
            avx512_count,
            avx2_count,
            sse42_count,
            neon_count,
            scalar_count,
        }
    }
}

/// Immutable snapshot of [`SimdStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimdStatsSnapshot {
    /// Total dispatches since the last reset.
    pub total_calls: u64,
    /// Dispatches served by the AVX-512 scanner.
    pub avx512_count: u64,
    /// Dispatches served by the AVX2 scanner.
    pub avx2_count: u64,
    /// Dispatches served by the SSE4.2 scanner.
    pub sse42_count: u64,
    /// Dispatches served by the NEON scanner.
    pub neon_count: u64,
    /// Dispatches served by the scalar scanner.
    pub scalar_count: u64,
}

/// SIMD dispatcher for scanning primitives.
///
/// A dispatcher binds a selected [`SimdLevel`] to a shared statistics
/// tracker. Construction is cheap; the engine builds one per operation so a
/// concurrent mode change is picked up by the next call.
///
/// Every scanner produces byte-identical results for identical inputs;
/// vectorization is a performance choice, never a semantic one.
#[derive(Debug, Clone)]
pub struct SimdDispatcher {
    level: SimdLevel,
    stats: Arc<SimdStats>,
}

impl SimdDispatcher {
    /// Create a dispatcher at a pre-selected level.
    ///
    /// Crate-internal: the level must have been selected against real
    /// detected features, which [`Self::for_mode`] guarantees.
    pub(crate) fn new(level: SimdLevel, stats: Arc<SimdStats>) -> Self {
        Self { level, stats }
    }

    /// Create a dispatcher for a mode using the cached CPU features.
    pub fn for_mode(mode: SimdMode, stats: Arc<SimdStats>) -> Self {
        Self::new(select_level(mode, CpuFeatures::cached()), stats)
    }

    /// Get the selected scanner level.
    pub fn level(&self) -> SimdLevel {
        self.level
    }

    /// Check if SIMD acceleration is being used.
    pub fn is_accelerated(&self) -> bool {
        self.level != SimdLevel::Scalar
    }

    /// Find the first occurrence of `needle` in `haystack`.
    ///
    /// Records one dispatch against the selected level.
    pub fn find_first(&self, haystack: &[u8], needle: &[u8]) -> Option<usize> {
        self.stats.record(self.level);
        match self.level {
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx512 => {
                // Safety: selection verified AVX-512F/BW availability
                unsafe { super::avx512::find_first_avx512(haystack, needle) }
            }
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx2 => {
                // Safety: selection verified AVX2 availability
                unsafe { super::avx2::find_first_avx2(haystack, needle) }
            }
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Sse42 => {
                // Safety: selection verified SSE4.2 availability
                unsafe { super::sse42::find_first_sse42(haystack, needle) }
            }
            #[cfg(target_arch = "aarch64")]
            SimdLevel::Neon => {
                // Safety: NEON is always available on ARM64
                unsafe { super::neon::find_first_neon(haystack, needle) }
            }
            _ => super::scalar::find_first_scalar(haystack, needle),
        }
    }

    /// Find all non-overlapping occurrences of `needle` in `haystack`,
    /// left to right.
    ///
    /// Records one dispatch against the selected level.
    pub fn find_all(&self, haystack: &[u8], needle: &[u8]) -> Vec<usize> {
        self.stats.record(self.level);
        match self.level {
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx512 => {
                // Safety: selection verified AVX-512F/BW availability
                unsafe { super::avx512::find_all_avx512(haystack, needle) }
            }
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx2 => {
                // Safety: selection verified AVX2 availability
                unsafe { super::avx2::find_all_avx2(haystack, needle) }
            }
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Sse42 => {
                // Safety: selection verified SSE4.2 availability
                unsafe { super::sse42::find_all_sse42(haystack, needle) }
            }
            #[cfg(target_arch = "aarch64")]
            SimdLevel::Neon => {
                // Safety: NEON is always available on ARM64
                unsafe { super::neon::find_all_neon(haystack, needle) }
            }
            _ => super::scalar::find_all_scalar(haystack, needle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_features() -> CpuFeatures {
        CpuFeatures {
            avx512: true,
            avx2: true,
            sse42: true,
            neon: true,
        }
    }

    #[test]
    fn test_cpu_features_detect() {
        let features = CpuFeatures::detect();
        // Just verify it doesn't panic and stays stable
        assert_eq!(features, CpuFeatures::cached());
        assert_eq!(CpuFeatures::cached(), CpuFeatures::cached());
    }

    #[test]
    fn test_cpu_features_none() {
        let features = CpuFeatures::none();
        assert!(!features.avx512);
        assert!(!features.avx2);
        assert!(!features.sse42);
        assert!(!features.neon);
        assert!(!features.has_any());
    }

    #[test]
    fn test_select_level_auto_priority() {
        assert_eq!(
            select_level(SimdMode::Auto, all_features()),
            SimdLevel::Avx512
        );

        let mut features = all_features();
        features.avx512 = false;
        assert_eq!(select_level(SimdMode::Auto, features), SimdLevel::Avx2);

        features.avx2 = false;
        assert_eq!(select_level(SimdMode::Auto, features), SimdLevel::Sse42);

        features.sse42 = false;
        assert_eq!(select_level(SimdMode::Auto, features), SimdLevel::Neon);

        assert_eq!(
            select_level(SimdMode::Auto, CpuFeatures::none()),
            SimdLevel::Scalar
        );
    }

    #[test]
    fn test_select_level_forced_available() {
        assert_eq!(
            select_level(SimdMode::ForceSse42, all_features()),
            SimdLevel::Sse42
        );
        assert_eq!(
            select_level(SimdMode::ForceNeon, all_features()),
            SimdLevel::Neon
        );
    }

    #[test]
    fn test_select_level_forced_unavailable_falls_to_scalar() {
        // Never substitutes a different, unrequested set
        for mode in [
            SimdMode::ForceAvx512,
            SimdMode::ForceAvx2,
            SimdMode::ForceSse42,
            SimdMode::ForceNeon,
        ] {
            assert_eq!(select_level(mode, CpuFeatures::none()), SimdLevel::Scalar);
        }
    }

    #[test]
    fn test_select_level_scalar_only() {
        assert_eq!(
            select_level(SimdMode::ScalarOnly, all_features()),
            SimdLevel::Scalar
        );
    }

    #[test]
    fn test_stats_record_and_snapshot() {
        let stats = SimdStats::new();
        stats.record(SimdLevel::Scalar);
        stats.record(SimdLevel::Scalar);
        stats.record(SimdLevel::Avx2);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.scalar_count, 2);
        assert_eq!(snapshot.avx2_count, 1);
        assert_eq!(snapshot.total_calls, 3);
    }

    #[test]
    fn test_stats_total_equals_sum() {
        let stats = SimdStats::new();
        for level in [
            SimdLevel::Avx512,
            SimdLevel::Avx2,
            SimdLevel::Sse42,
            SimdLevel::Neon,
            SimdLevel::Scalar,
        ] {
            stats.record(level);
        }
        let s = stats.snapshot();
        assert_eq!(
            s.total_calls,
            s.avx512_count + s.avx2_count + s.sse42_count + s.neon_count + s.scalar_count
        );
    }

    #[test]
    fn test_stats_reset() {
        let stats = SimdStats::new();
        stats.record(SimdLevel::Scalar);
        stats.record(SimdLevel::Neon);
        stats.reset();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot, SimdStatsSnapshot {
            total_calls: 0,
            avx512_count: 0,
            avx2_count: 0,
            sse42_count: 0,
            neon_count: 0,
            scalar_count: 0,
        });
    }

    #[test]
    fn test_stats_concurrent_updates() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(SimdStats::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..100 {
                        stats.record(SimdLevel::Scalar);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.scalar_count, 400);
        assert_eq!(snapshot.total_calls, 400);
    }

    #[test]
    fn test_dispatcher_scalar_scan() {
        let stats = Arc::new(SimdStats::new());
        let dispatcher = SimdDispatcher::new(SimdLevel::Scalar, Arc::clone(&stats));
        assert!(!dispatcher.is_accelerated());

        assert_eq!(dispatcher.find_first(b"xxhelloxx", b"hello"), Some(2));
        assert_eq!(dispatcher.find_all(b"abcabcabc", b"abc"), vec![0, 3, 6]);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_calls, 2);
        assert_eq!(snapshot.scalar_count, 2);
    }

    #[test]
    fn test_dispatcher_detected_level_agrees_with_scalar() {
        let stats = Arc::new(SimdStats::new());
        let dispatcher = SimdDispatcher::for_mode(SimdMode::Auto, Arc::clone(&stats));
        let haystack = "lorem ipsum dolor sit amet lorem ipsum ".repeat(4);

        assert_eq!(
            dispatcher.find_first(haystack.as_bytes(), b"ipsum"),
            super::super::scalar::find_first_scalar(haystack.as_bytes(), b"ipsum")
        );
        assert_eq!(
            dispatcher.find_all(haystack.as_bytes(), b"lorem"),
            super::super::scalar::find_all_scalar(haystack.as_bytes(), b"lorem")
        );
    }

    #[test]
    fn test_simd_level_display() {
        assert_eq!(format!("{}", SimdLevel::Avx512), "AVX-512");
        assert_eq!(format!("{}", SimdLevel::Avx2), "AVX2");
        assert_eq!(format!("{}", SimdLevel::Sse42), "SSE4.2");
        assert_eq!(format!("{}", SimdLevel::Neon), "NEON");
        assert_eq!(format!("{}", SimdLevel::Scalar), "Scalar");
    }
}
