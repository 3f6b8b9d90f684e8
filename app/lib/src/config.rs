//! Execution-policy configuration for the fastmatch engine.
//!
//! The only user-facing knob is [`SimdMode`], the process-wide policy that
//! controls which vector instruction set the dispatcher may select. The mode
//! never affects matching results; every concrete scanner produces identical
//! output.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// SIMD execution mode.
///
/// Controls which instruction set the dispatcher selects for scanning.
/// Forcing an instruction set that the CPU does not support falls back to
/// scalar execution rather than erroring, and never substitutes a different,
/// unrequested set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimdMode {
    /// Pick the best available instruction set (widest vectors first).
    Auto,
    /// Force AVX-512; scalar if unavailable.
    ForceAvx512,
    /// Force AVX2; scalar if unavailable.
    ForceAvx2,
    /// Force SSE4.2; scalar if unavailable.
    ForceSse42,
    /// Force NEON; scalar if unavailable.
    ForceNeon,
    /// Disable vectorization entirely.
    ScalarOnly,
}

impl Default for SimdMode {
    fn default() -> Self {
        SimdMode::Auto
    }
}

impl fmt::Display for SimdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimdMode::Auto => write!(f, "auto"),
            SimdMode::ForceAvx512 => write!(f, "avx512"),
            SimdMode::ForceAvx2 => write!(f, "avx2"),
            SimdMode::ForceSse42 => write!(f, "sse42"),
            SimdMode::ForceNeon => write!(f, "neon"),
            SimdMode::ScalarOnly => write!(f, "scalar"),
        }
    }
}

impl FromStr for SimdMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SimdMode::Auto),
            "avx512" => Ok(SimdMode::ForceAvx512),
            "avx2" => Ok(SimdMode::ForceAvx2),
            "sse42" | "sse4.2" => Ok(SimdMode::ForceSse42),
            "neon" => Ok(SimdMode::ForceNeon),
            "scalar" => Ok(SimdMode::ScalarOnly),
            other => Err(format!("unknown SIMD mode: {other}")),
        }
    }
}

impl SimdMode {
    /// Check whether this mode forces a specific instruction set.
    pub fn is_forced(&self) -> bool {
        !matches!(self, SimdMode::Auto | SimdMode::ScalarOnly)
    }
}
