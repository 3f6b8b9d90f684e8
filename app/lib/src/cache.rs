//! Process-wide cache of compiled patterns.
//!
//! The cache maps `(pattern, flags, use_simd)` to a shared
//! [`CompiledPattern`] handle. Entries are reference-counted, so clearing
//! the cache never invalidates handles already returned to callers. Hit and
//! miss counters back the reported hit rate.
//!
//! Lookups use a concurrent map; concurrent misses for the same key may
//! compile more than once, which is harmless because compiled patterns are
//! immutable and cheap to discard; only one instance is retained.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use crate::context::EngineContext;
use crate::error::Result;
use crate::pattern::{CompiledPattern, RegexFlags};

/// Cache key: everything that affects compiled-pattern behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    pattern: String,
    flags: u8,
    use_simd: bool,
}

/// Thread-safe compiled-pattern cache with hit-rate accounting.
///
/// Entries are evicted only by an explicit [`clear`](Self::clear); no
/// automatic eviction policy exists.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: DashMap<CacheKey, Arc<CompiledPattern>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PatternCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a compiled pattern, compiling and inserting on a miss.
    ///
    /// A compile failure counts the miss but caches nothing; the error is
    /// local to this call.
    pub fn get_or_compile(
        &self,
        ctx: &Arc<EngineContext>,
        pattern: &str,
        flags: RegexFlags,
        use_simd: bool,
    ) -> Result<Arc<CompiledPattern>> {
        let key = CacheKey {
            pattern: pattern.to_string(),
            flags: flags.bits(),
            use_simd,
        };

        if let Some(entry) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(&entry));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let compiled = Arc::new(CompiledPattern::compile_in(
            Arc::clone(ctx),
            pattern,
            use_simd,
            flags,
            false,
        )?);

        // A racing miss may have inserted first; keep whichever won.
        let entry = self.entries.entry(key).or_insert(compiled);
        Ok(Arc::clone(&entry))
    }

    /// Remove all entries.
    ///
    /// Outstanding handles remain valid; only the counters and the map
    /// contents of future lookups are affected.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fraction of lookups satisfied without recompilation.
    ///
    /// Defined as 0.0 when no lookups have occurred.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Take a reporting snapshot of the cache state.
    pub fn report(&self) -> CacheReport {
        CacheReport {
            size: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            hit_rate: self.hit_rate(),
        }
    }
}

/// Immutable snapshot of cache size and hit-rate accounting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheReport {
    /// Number of cached patterns.
    pub size: usize,
    /// Lookups satisfied from the cache.
    pub hits: u64,
    /// Lookups that required compilation.
    pub misses: u64,
    /// hits / (hits + misses), 0.0 with no lookups.
    pub hit_rate: f64,
}
