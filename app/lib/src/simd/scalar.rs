//! Scalar (non-SIMD) scanning primitives.
//!
//! These implementations serve as the reference for every vectorized scanner
//! and as the fallback when SIMD instructions are unavailable or disabled.
//! Each vector module must produce byte-identical results to the functions
//! in this file.

/// Find the first occurrence of `needle` in `haystack` (scalar implementation).
///
/// Returns the byte position of the first occurrence, or `None` if the
/// needle does not occur. An empty needle matches at position 0.
///
/// # Arguments
///
/// * `haystack` - The bytes to scan
/// * `needle` - The byte sequence to find
pub fn find_first_scalar(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if haystack.len() < needle.len() {
        return None;
    }

    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Find all non-overlapping occurrences of `needle` in `haystack`
/// (scalar implementation).
///
/// Positions are returned in increasing order. After a match at position `p`
/// the scan resumes at `p + needle.len()`, so returned spans never overlap.
///
/// An empty needle yields no positions; this keeps enumeration finite and
/// substitution a no-op.
pub fn find_all_scalar(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return Vec::new();
    }

    let mut positions = Vec::new();
    let mut pos = 0;

    while pos + needle.len() <= haystack.len() {
        match find_first_scalar(&haystack[pos..], needle) {
            Some(rel) => {
                let found = pos + rel;
                positions.push(found);
                pos = found + needle.len();
            }
            None => break,
        }
    }

    positions
}
