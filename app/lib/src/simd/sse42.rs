//! SSE4.2 scanning primitives for x86_64.
//!
//! SSE4.2 is the narrowest vector level on x86_64, screening 16 candidate
//! match positions per instruction. It serves older CPUs without AVX2.
//!
//! # Safety
//!
//! All functions in this module are unsafe and require SSE4.2 support.
//! The caller must verify that SSE4.2 is available before calling them.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Find the first occurrence of `needle` in `haystack` using SSE4.2.
///
/// Produces results identical to [`super::scalar::find_first_scalar`].
///
/// # Safety
///
/// The caller must ensure that SSE4.2 is available on the current CPU.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.2")]
pub unsafe fn find_first_sse42(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if haystack.len() < needle.len() {
        return None;
    }
    if haystack.len() < 16 + needle.len() {
        return super::scalar::find_first_scalar(haystack, needle);
    }

    let first = _mm_set1_epi8(needle[0] as i8);
    let nlen = needle.len();
    let end = haystack.len() - nlen;
    let ptr = haystack.as_ptr();

    let mut i = 0usize;
    while i + 16 <= end + 1 {
        let chunk = _mm_loadu_si128(ptr.add(i) as *const __m128i);
        let mut mask = _mm_movemask_epi8(_mm_cmpeq_epi8(chunk, first)) as u32;

        while mask != 0 {
            let pos = i + mask.trailing_zeros() as usize;
            if haystack[pos..pos + nlen] == *needle {
                return Some(pos);
            }
            mask &= mask - 1;
        }

        i += 16;
    }

    super::scalar::find_first_scalar(&haystack[i..], needle).map(|rel| i + rel)
}

/// Find all non-overlapping occurrences of `needle` in `haystack` using
/// SSE4.2.
///
/// Produces results identical to [`super::scalar::find_all_scalar`].
///
/// # Safety
///
/// The caller must ensure that SSE4.2 is available on the current CPU.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.2")]
pub unsafe fn find_all_sse42(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return Vec::new();
    }
    if haystack.len() < 16 + needle.len() {
        return super::scalar::find_all_scalar(haystack, needle);
    }

    let first = _mm_set1_epi8(needle[0] as i8);
    let nlen = needle.len();
    let end = haystack.len() - nlen;
    let ptr = haystack.as_ptr();

    let mut positions = Vec::new();
    let mut cursor = 0usize;

    let mut i = 0usize;
    while i + 16 <= end + 1 {
        let chunk = _mm_loadu_si128(ptr.add(i) as *const __m128i);
        let mut mask = _mm_movemask_epi8(_mm_cmpeq_epi8(chunk, first)) as u32;

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

        i += 16;
    }

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
