//! Walk through the main operations: compile, match, search, find, replace
//!
//! Run with: cargo run --example scan_demo --release

use fastmatch::{CompiledPattern, RegexFlags};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Pattern Scan Demo ===\n");

    let caps = fastmatch::simd_capabilities();
    println!("--- CPU Capabilities ---");
    println!("  AVX-512:  {}", caps.avx512);
    println!("  AVX2:     {}", caps.avx2);
    println!("  SSE4.2:   {}", caps.sse42);
    println!("  NEON:     {}", caps.neon);
    println!("  Backend:  {}", fastmatch::simd_version());
    println!();

    let text = "the quick brown fox jumps over the lazy dog";

    let pattern = CompiledPattern::compile("the", true, RegexFlags::NONE, false)?;
    println!("--- Pattern \"the\" ---");
    println!("  literal:      {}", pattern.is_literal());
    println!("  compile time: {}us", pattern.compile_time_us());
    println!("  matches:      {}", pattern.matches(text));
    println!("  search:       {}", pattern.search(text));
    println!("  find_all:     {:?}", pattern.find_all(text));
    println!("  spans:        {:?}", pattern.find_spans(text));
    println!("  replace:      {}", pattern.replace(text, "a"));
    println!();

    let ci = CompiledPattern::compile("FOX", true, RegexFlags::IGNORECASE, false)?;
    println!("--- Pattern \"FOX\" (ignore case) ---");
    println!("  search:       {}", ci.search(text));
    println!("  find_all:     {:?}", ci.find_all(text));
    println!();

    let stats = fastmatch::simd_stats();
    println!("--- Dispatch Statistics ---");
    println!("  total calls:  {}", stats.total_calls);
    println!("  avx512:       {}", stats.avx512_count);
    println!("  avx2:         {}", stats.avx2_count);
    println!("  sse42:        {}", stats.sse42_count);
    println!("  neon:         {}", stats.neon_count);
    println!("  scalar:       {}", stats.scalar_count);

    Ok(())
}
