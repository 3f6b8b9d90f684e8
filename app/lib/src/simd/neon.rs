//! NEON scanning primitives for ARM64.
//!
//! NEON provides 128-bit wide vector operations, screening 16 candidate match
//! positions per chunk. NEON lacks a byte-mask extraction instruction, so a
//! chunk whose horizontal maximum signals a first-byte hit is resolved with a
//! short scalar walk over its 16 lanes.
//!
//! # Safety
//!
//! All functions in this module are unsafe. NEON is mandatory on ARM64, but
//! the functions use unsafe intrinsics and raw loads.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

/// Find the first occurrence of `needle` in `haystack` using NEON.
///
/// Produces results identical to [`super::scalar::find_first_scalar`].
///
/// # Safety
///
/// The caller must ensure this is called on an ARM64 platform.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn find_first_neon(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if haystack.len() < needle.len() {
        return None;
    }
    if haystack.len() < 16 + needle.len() {
        return super::scalar::find_first_scalar(haystack, needle);
    }

    let first = vdupq_n_u8(needle[0]);
    let nlen = needle.len();
    let end = haystack.len() - nlen;
    let ptr = haystack.as_ptr();

    let mut i = 0usize;
    while i + 16 <= end + 1 {
        let chunk = vld1q_u8(ptr.add(i));
        let eq = vceqq_u8(chunk, first);

        if vmaxvq_u8(eq) != 0 {
            for lane in 0..16 {
                let pos = i + lane;
                if haystack[pos] == needle[0] && haystack[pos..pos + nlen] == *needle {
                    return Some(pos);
                }
            }
        }

        i += 16;
    }

    super::scalar::find_first_scalar(&haystack[i..], needle).map(|rel| i + rel)
}

/// Find all non-overlapping occurrences of `needle` in `haystack` using NEON.
///
/// Produces results identical to [`super::scalar::find_all_scalar`].
///
/// # Safety
///
/// The caller must ensure this is called on an ARM64 platform.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn find_all_neon(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return Vec::new();
    }
    if haystack.len() < 16 + needle.len() {
        return super::scalar::find_all_scalar(haystack, needle);
    }

    let first = vdupq_n_u8(needle[0]);
    let nlen = needle.len();
    let end = haystack.len() - nlen;
    let ptr = haystack.as_ptr();

    let mut positions = Vec::new();
    let mut cursor = 0usize;

    let mut i = 0usize;
    while i + 16 <= end + 1 {
        let chunk = vld1q_u8(ptr.add(i));
        let eq = vceqq_u8(chunk, first);

        if vmaxvq_u8(eq) != 0 {
            for lane in 0..16 {
                let pos = i + lane;
                if pos < cursor {
                    continue;
                }
                if haystack[pos] == needle[0] && haystack[pos..pos + nlen] == *needle {
                    positions.push(pos);
                    cursor = pos + nlen;
                }
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

#[cfg(all(test, target_arch = "aarch64"))]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_neon() {
        unsafe {
            let haystack = "x".repeat(50) + "needle" + &"y".repeat(50);
            assert_eq!(find_first_neon(haystack.as_bytes(), b"needle"), Some(50));
            assert_eq!(find_first_neon(haystack.as_bytes(), b"absent"), None);
        }
    }

    #[test]
    fn test_neon_matches_scalar() {
        unsafe {
            let haystack = "the quick brown fox jumps over the lazy dog. ".repeat(8);
            for needle in ["the", "fox", "o", "lazy dog", "zebra"] {
                let scalar_first =
                    super::super::scalar::find_first_scalar(haystack.as_bytes(), needle.as_bytes());
                let first = find_first_neon(haystack.as_bytes(), needle.as_bytes());
                assert_eq!(scalar_first, first, "find_first mismatch for {needle:?}");

                let scalar_all =
                    super::super::scalar::find_all_scalar(haystack.as_bytes(), needle.as_bytes());
                let all = find_all_neon(haystack.as_bytes(), needle.as_bytes());
                assert_eq!(scalar_all, all, "find_all mismatch for {needle:?}");
            }
        }
    }
}
