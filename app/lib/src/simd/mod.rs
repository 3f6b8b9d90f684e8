//! SIMD acceleration module for scanning primitives.
//!
//! This module provides the two hardware-accelerated primitives every
//! matching operation is built on:
//!
//! - First-occurrence search: the position of the first match of a fixed
//!   byte sequence
//! - Full enumeration: all non-overlapping match positions, left to right
//!
//! Available CPU features are detected at runtime and the best enabled
//! implementation is selected:
//!
//! - **AVX-512**: 512-bit vectors on supported x86_64 CPUs
//! - **AVX2**: 256-bit vectors on modern x86_64 CPUs
//! - **SSE4.2**: 128-bit vectors on older x86_64 CPUs
//! - **NEON**: 128-bit vectors on ARM64 CPUs
//! - **Scalar**: Fallback for all platforms
//!
//! Every implementation produces byte-identical results; the level only
//! changes throughput.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use fastmatch::simd::{SimdDispatcher, SimdStats};
//! use fastmatch::SimdMode;
//!
//! let stats = Arc::new(SimdStats::new());
//! let dispatcher = SimdDispatcher::for_mode(SimdMode::Auto, Arc::clone(&stats));
//! assert_eq!(dispatcher.find_first(b"xxhelloxx", b"hello"), Some(2));
//! assert_eq!(stats.snapshot().total_calls, 1);
//! ```

mod dispatcher;
mod scalar;

#[cfg(target_arch = "x86_64")]
mod avx2;

#[cfg(target_arch = "x86_64")]
mod avx512;

#[cfg(target_arch = "x86_64")]
mod sse42;

#[cfg(target_arch = "aarch64")]
mod neon;

pub use dispatcher::{
    select_level, CpuFeatures, SimdDispatcher, SimdLevel, SimdStats, SimdStatsSnapshot,
};
