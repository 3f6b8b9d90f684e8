//! AVX2 scanning primitives for x86_64.
//!
//! AVX2 provides 256-bit wide vector operations, allowing 32 candidate match
//! positions to be screened per instruction. The scan broadcasts the first
//! needle byte, compares it against a 32-byte chunk of the haystack, and
//! verifies full needle equality only at positions where the first byte hit.
//!
//! # Safety
//!
//! All functions in this module are unsafe and require AVX2 support.
//! The caller must verify that AVX2 is available before calling them.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Find the first occurrence of `needle` in `haystack` using AVX2.
///
/// Produces results identical to [`super::scalar::find_first_scalar`].
///
/// # Safety
///
/// The caller must ensure that AVX2 is available on the current CPU.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn find_first_avx2(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if haystack.len() < needle.len() {
        return None;
    }
    // Short haystacks do not fill a vector; use the scalar path.
    if haystack.len() < 32 + needle.len() {
        return super::scalar::find_first_scalar(haystack, needle);
    }

    let first = _mm256_set1_epi8(needle[0] as i8);
    let nlen = needle.len();
    // Last valid match start.
    let end = haystack.len() - nlen;
    let ptr = haystack.as_ptr();

    let mut i = 0usize;
    while i + 32 <= end + 1 {
        let chunk = _mm256_loadu_si256(ptr.add(i) as *const __m256i);
        let mut mask = _mm256_movemask_epi8(_mm256_cmpeq_epi8(chunk, first)) as u32;

        while mask != 0 {
            let pos = i + mask.trailing_zeros() as usize;
            if haystack[pos..pos + nlen] == *needle {
                return Some(pos);
            }
            mask &= mask - 1;
        }

        i += 32;
    }

    // Scan the remaining tail with scalar code.
    super::scalar::find_first_scalar(&haystack[i..], needle).map(|rel| i + rel)
}

/// Find all non-overlapping occurrences of `needle` in `haystack` using AVX2.
///
/// Produces results identical to [`super::scalar::find_all_scalar`]: positions
/// are in increasing order and the scan resumes after each consumed match.
/// Candidates that fall inside an already-consumed span are filtered by a
/// monotonic cursor.
///
/// # Safety
///
/// The caller must ensure that AVX2 is available on the current CPU.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn find_all_avx2(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return Vec::new();
    }
    if haystack.len() < 32 + needle.len() {
        return super::scalar::find_all_scalar(haystack, needle);
    }

    let first = _mm256_set1_epi8(needle[0] as i8);
    let nlen = needle.len();
    let end = haystack.len() - nlen;
    let ptr = haystack.as_ptr();

    let mut positions = Vec::new();
    // Next allowed match start; enforces the non-overlap rule.
    let mut cursor = 0usize;

    let mut i = 0usize;
    while i + 32 <= end + 1 {
        let chunk = _mm256_loadu_si256(ptr.add(i) as *const __m256i);
        let mut mask = _mm256_movemask_epi8(_mm256_cmpeq_epi8(chunk, first)) as u32;

        while mask != 0 {
            let pos = i + mask.trailing_zeros() as usize;
            mask &= mask - 1;
            if pos < cursor {
                continue;
            }
            if haystack[pos..pos + nlen] == *needle {
                positions.push(pos);
                cursor = pos + nlen;
            }
        }

        i += 32;
    }

    // Scan the remaining tail with scalar code.
    let mut pos = i.max(cursor);
    while pos + nlen <= haystack.len() {
        match super::scalar::find_first_scalar(&haystack[pos..], needle) {
            Some(rel) => {
                let found = pos + rel;
                positions.push(found);
                pos = found + nlen;
            }
            None => break,
        }
    }

    positions
}
