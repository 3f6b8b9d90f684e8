//! AVX-512 scanning primitives for x86_64.
//!
//! AVX-512 provides 512-bit wide vector operations, allowing 64 candidate
//! match positions to be screened per instruction. The byte-wise compare
//! produces a 64-bit mask directly (`_mm512_cmpeq_epi8_mask`), which requires
//! the AVX-512BW extension in addition to AVX-512F.
//!
//! # Safety
//!
//! All functions in this module are unsafe and require AVX-512F and AVX-512BW
//! support. The caller must verify both are available before calling them.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Find the first occurrence of `needle` in `haystack` using AVX-512.
///
/// Produces results identical to [`super::scalar::find_first_scalar`].
///
/// # Safety
///
/// The caller must ensure that AVX-512F and AVX-512BW are available on the
/// current CPU.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx512f,avx512bw")]
pub unsafe fn find_first_avx512(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if haystack.len() < needle.len() {
        return None;
    }
    if haystack.len() < 64 + needle.len() {
        return super::scalar::find_first_scalar(haystack, needle);
    }

    let first = _mm512_set1_epi8(needle[0] as i8);
    let nlen = needle.len();
    let end = haystack.len() - nlen;
    let ptr = haystack.as_ptr();

    let mut i = 0usize;
    while i + 64 <= end + 1 {
        let chunk = _mm512_loadu_epi8(ptr.add(i) as *const i8);
        let mut mask: u64 = _mm512_cmpeq_epi8_mask(chunk, first);

        while mask != 0 {
            let pos = i + mask.trailing_zeros() as usize;
            if haystack[pos..pos + nlen] == *needle {
                return Some(pos);
            }
            mask &= mask - 1;
        }

        i += 64;
    }

    super::scalar::find_first_scalar(&haystack[i..], needle).map(|rel| i + rel)
}

/// Find all non-overlapping occurrences of `needle` in `haystack` using
/// AVX-512.
///
/// Produces results identical to [`super::scalar::find_all_scalar`].
///
/// # Safety
///
/// The caller must ensure that AVX-512F and AVX-512BW are available on the
/// current CPU.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx512f,avx512bw")]
pub unsafe fn find_all_avx512(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return Vec::new();
    }
    if haystack.len() < 64 + needle.len() {
        return super::scalar::find_all_scalar(haystack, needle);
    }

    let first = _mm512_set1_epi8(needle[0] as i8);
    let nlen = needle.len();
    let end = haystack.len() - nlen;
    let ptr = haystack.as_ptr();

    let mut positions = Vec::new();
    let mut cursor = 0usize;

    let mut i = 0usize;
    while i + 64 <= end + 1 {
        let chunk = _mm512_loadu_epi8(ptr.add(i) as *const i8);
        let mut mask: u64 = _mm512_cmpeq_epi8_mask(chunk, first);

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

        i += 64;
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

#[cfg(all(test, target_arch = "x86_64"))]
mod tests {
    use super::*;

    fn has_avx512() -> bool {
        std::arch::is_x86_feature_detected!("avx512f")
            && std::arch::is_x86_feature_detected!("avx512bw")
    }

    #[test]
    fn test_find_first_avx512() {
        if !has_avx512() {
            println!("AVX-512 not available, skipping test");
            return;
        }

        unsafe {
            let haystack = "x".repeat(200) + "needle" + &"y".repeat(200);
            assert_eq!(find_first_avx512(haystack.as_bytes(), b"needle"), Some(200));
            assert_eq!(find_first_avx512(haystack.as_bytes(), b"absent"), None);
        }
    }

    #[test]
    fn test_avx512_matches_scalar() {
        if !has_avx512() {
            println!("AVX-512 not available, skipping test");
            return;
        }

        unsafe {
            let haystack = "the quick brown fox jumps over the lazy dog. ".repeat(10);
            for needle in ["the", "fox", "o", "lazy dog. the", "zebra"] {
                let scalar_first =
                    super::super::scalar::find_first_scalar(haystack.as_bytes(), needle.as_bytes());
                let first = find_first_avx512(haystack.as_bytes(), needle.as_bytes());
                assert_eq!(scalar_first, first, "find_first mismatch for {needle:?}");

                let scalar_all =
                    super::super::scalar::find_all_scalar(haystack.as_bytes(), needle.as_bytes());
                let all = find_all_avx512(haystack.as_bytes(), needle.as_bytes());
                assert_eq!(scalar_all, all, "find_all mismatch for {needle:?}");
            }
        }
    }
}
