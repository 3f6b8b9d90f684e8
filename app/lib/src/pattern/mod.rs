//! Pattern compilation, classification, and matching.
//!
//! A pattern is compiled once into a [`CompiledPattern`] and then matched
//! repeatedly. The supported grammar is the literal grammar with backslash
//! escapes: a pattern with no special syntax characters is classified
//! literal-only and eligible for the fixed-string fast path; general
//! patterns currently share that path since the grammar contains nothing a
//! fixed-string scan cannot express.
//!
//! # Example
//!
//! ```rust
//! use fastmatch::{CompiledPattern, RegexFlags};
//!
//! let p = CompiledPattern::compile("abc", true, RegexFlags::NONE, false)?;
//! assert!(p.matches("abc"));
//! assert_eq!(p.find_all("abcabcabc"), vec!["abc", "abc", "abc"]);
//! assert_eq!(p.replace("xabcy", "-"), "x-y");
//! # Ok::<(), fastmatch::MatchError>(())
//! ```

mod compiler;
mod flags;
mod matcher;

pub use compiler::{is_literal_pattern, CompiledPattern};
pub use flags::RegexFlags;
