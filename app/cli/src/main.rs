use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fastmatch::{CompiledPattern, MatchError, RegexFlags, SimdMode};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::time::Instant;

/// SIMD-accelerated literal pattern matching tool
#[derive(Parser)]
#[command(name = "fastmatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// SIMD instruction set selection
    #[arg(long, global = true, value_enum, default_value = "auto")]
    simd: SimdOpt,

    #[command(subcommand)]
    command: Commands,
}

/// SIMD mode selection for the engine
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SimdOpt {
    /// Pick the widest instruction set the CPU supports
    Auto,
    /// Require AVX-512 (falls back to scalar if unavailable)
    Avx512,
    /// Require AVX2 (falls back to scalar if unavailable)
    Avx2,
    /// Require SSE4.2 (falls back to scalar if unavailable)
    Sse42,
    /// Require NEON (falls back to scalar if unavailable)
    Neon,
    /// Disable SIMD entirely
    Scalar,
}

impl From<SimdOpt> for SimdMode {
    fn from(opt: SimdOpt) -> Self {
        match opt {
            SimdOpt::Auto => SimdMode::Auto,
            SimdOpt::Avx512 => SimdMode::ForceAvx512,
            SimdOpt::Avx2 => SimdMode::ForceAvx2,
            SimdOpt::Sse42 => SimdMode::ForceSse42,
            SimdOpt::Neon => SimdMode::ForceNeon,
            SimdOpt::Scalar => SimdMode::ScalarOnly,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Test whether the entire input matches the pattern
    Match {
        /// Pattern to compile
        pattern: String,

        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Case-insensitive matching (ASCII)
        #[arg(long)]
        ignore_case: bool,
    },

    /// Test whether the pattern occurs anywhere in the input
    Search {
        /// Pattern to compile
        pattern: String,

        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Case-insensitive matching (ASCII)
        #[arg(long)]
        ignore_case: bool,
    },

    /// List every non-overlapping occurrence of the pattern
    Find {
        /// Pattern to compile
        pattern: String,

        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Case-insensitive matching (ASCII)
        #[arg(long)]
        ignore_case: bool,

        /// Print only the number of occurrences
        #[arg(short, long)]
        count: bool,

        /// Print byte spans instead of matched text
        #[arg(long, conflicts_with = "count")]
        spans: bool,
    },

    /// Replace every non-overlapping occurrence of the pattern
    Replace {
        /// Pattern to compile
        pattern: String,

        /// Replacement text
        #[arg(short, long, value_name = "TEXT")]
        with: String,

        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Output file (use '-' for stdout)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        output: String,

        /// Case-insensitive matching (ASCII)
        #[arg(long)]
        ignore_case: bool,
    },

    /// Display engine version, CPU capabilities, and dispatch statistics
    Info {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mode = SimdMode::from(cli.simd);
    fastmatch::set_simd_mode(mode);
    debug!("SIMD mode: {}", mode);

    match cli.command {
        Commands::Match {
            pattern,
            input,
            ignore_case,
        } => match_command(&pattern, &input, ignore_case, cli.quiet),
        Commands::Search {
            pattern,
            input,
            ignore_case,
        } => search_command(&pattern, &input, ignore_case, cli.quiet),
        Commands::Find {
            pattern,
            input,
            ignore_case,
            count,
            spans,
        } => find_command(&pattern, &input, ignore_case, count, spans, cli.quiet),
        Commands::Replace {
            pattern,
            with,
            input,
            output,
            ignore_case,
        } => replace_command(&pattern, &with, &input, &output, ignore_case, cli.quiet),
        Commands::Info { json } => info_command(json, mode),
    }
}

/// Set up logging based on verbosity flags
fn setup_logging(verbose: bool, quiet: bool) {
    let log_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logging initialized at {} level", log_level);
}

/// Read input from file or stdin
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read input file: {}", input))
    }
}

/// Write output to file or stdout
fn write_output(output: &str, content: &str) -> Result<()> {
    if output == "-" {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        io::stdout().flush().context("Failed to flush stdout")?;
    } else {
        fs::write(output, content)
            .with_context(|| format!("Failed to write output file: {}", output))?;
    }
    Ok(())
}

/// Compile the pattern, mapping engine errors into CLI-friendly messages
fn compile_pattern(pattern: &str, ignore_case: bool) -> Result<CompiledPattern> {
    let flags = if ignore_case {
        RegexFlags::IGNORECASE
    } else {
        RegexFlags::NONE
    };

    let compiled = CompiledPattern::compile(pattern, true, flags, false)
        .map_err(|e| map_match_error(e, "pattern compilation"))?;

    debug!(
        "Compiled pattern {:?} in {}us (literal: {})",
        pattern,
        compiled.compile_time_us(),
        compiled.is_literal()
    );

    Ok(compiled)
}

/// Execute the match command
fn match_command(pattern: &str, input: &str, ignore_case: bool, quiet: bool) -> Result<ExitCode> {
    let compiled = compile_pattern(pattern, ignore_case)?;
    let data = read_input(input)?;

    let matched = compiled.matches(&data);
    if !quiet {
        println!("{}", if matched { "match" } else { "no match" });
    }

    Ok(exit_for(matched))
}

/// Execute the search command
fn search_command(pattern: &str, input: &str, ignore_case: bool, quiet: bool) -> Result<ExitCode> {
    let compiled = compile_pattern(pattern, ignore_case)?;
    let data = read_input(input)?;

    let found = compiled.search(&data);
    if !quiet {
        println!("{}", if found { "found" } else { "not found" });
    }

    Ok(exit_for(found))
}

/// Execute the find command
fn find_command(
    pattern: &str,
    input: &str,
    ignore_case: bool,
    count: bool,
    spans: bool,
    quiet: bool,
) -> Result<ExitCode> {
    let start_time = Instant::now();
    let compiled = compile_pattern(pattern, ignore_case)?;

    let progress = create_progress_bar(quiet, "Reading input");
    let data = read_input(input)?;
    progress.finish_and_clear();

    if data.is_empty() {
        warn!("Input is empty");
    }

    let progress = create_progress_bar(quiet, "Scanning");
    let scan_start = Instant::now();
    let found = compiled.find_spans(&data);
    let scan_duration = scan_start.elapsed();
    progress.finish_and_clear();

    debug!(
        "Scanned {} bytes in {:.3}ms, {} occurrences",
        data.len(),
        scan_duration.as_secs_f64() * 1000.0,
        found.len()
    );

    if count {
        println!("{}", found.len());
    } else if spans {
        for (start, end) in &found {
            println!("{}..{}", start, end);
        }
    } else {
        for (start, end) in &found {
            println!("{}:{}", start, &data[*start..*end]);
        }
    }

    info!(
        "Find completed in {:.3}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(exit_for(!found.is_empty()))
}

/// Execute the replace command
fn replace_command(
    pattern: &str,
    with: &str,
    input: &str,
    output: &str,
    ignore_case: bool,
    quiet: bool,
) -> Result<ExitCode> {
    let start_time = Instant::now();
    let compiled = compile_pattern(pattern, ignore_case)?;

    let progress = create_progress_bar(quiet, "Reading input");
    let data = read_input(input)?;
    progress.finish_and_clear();

    let input_size = data.len();
    let occurrences = compiled.find_spans(&data).len();

    let progress = create_progress_bar(quiet, "Replacing");
    let replaced = compiled.replace(&data, with);
    progress.finish_and_clear();

    write_output(output, &replaced)?;

    let total_duration = start_time.elapsed();

    if !quiet && output != "-" {
        eprintln!("✓ Replace complete");
        eprintln!("  Input:        {} bytes", input_size);
        eprintln!("  Output:       {} bytes", replaced.len());
        eprintln!("  Occurrences:  {}", occurrences);
        eprintln!("  Time:         {:.3}s", total_duration.as_secs_f64());
    }

    info!(
        "Replaced {} occurrences in {:.3}s",
        occurrences,
        total_duration.as_secs_f64()
    );

    Ok(exit_for(occurrences > 0))
}

/// Execute the info command
fn info_command(json: bool, mode: SimdMode) -> Result<ExitCode> {
    let caps = fastmatch::simd_capabilities();
    let level = fastmatch::simd::select_level(mode, caps);
    let stats = fastmatch::simd_stats();

    if json {
        let report = serde_json::json!({
            "version": fastmatch::VERSION,
            "simd_version": fastmatch::simd_version(),
            "mode": mode.to_string(),
            "selected_level": level.to_string(),
            "capabilities": caps,
            "stats": stats,
            "cache": {
                "size": fastmatch::cache_size(),
                "hit_rate": fastmatch::cache_hit_rate(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("=== fastmatch {} ===\n", fastmatch::VERSION);
    println!("Backend: {}", fastmatch::simd_version());
    println!("Mode: {}", mode);
    println!("Selected level: {}", level);

    println!("\n--- CPU Capabilities ---");
    println!("  AVX-512: {}", caps.avx512);
    println!("  AVX2:    {}", caps.avx2);
    println!("  SSE4.2:  {}", caps.sse42);
    println!("  NEON:    {}", caps.neon);

    println!("\n--- Dispatch Statistics ---");
    println!("  Total calls: {}", stats.total_calls);
    println!("  AVX-512:     {}", stats.avx512_count);
    println!("  AVX2:        {}", stats.avx2_count);
    println!("  SSE4.2:      {}", stats.sse42_count);
    println!("  NEON:        {}", stats.neon_count);
    println!("  Scalar:      {}", stats.scalar_count);

    println!("\n--- Pattern Cache ---");
    println!("  Entries:  {}", fastmatch::cache_size());
    println!("  Hit rate: {:.2}", fastmatch::cache_hit_rate());

    Ok(ExitCode::SUCCESS)
}

/// Exit code 0 when the predicate held, 1 otherwise (grep convention)
fn exit_for(matched: bool) -> ExitCode {
    if matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Create a progress bar (spinner) for operations
fn create_progress_bar(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Map MatchError to anyhow::Error with context
fn map_match_error(error: MatchError, context: &str) -> anyhow::Error {
    match error {
        MatchError::PatternSyntax { position, message } => {
            anyhow::anyhow!(
                "{}: syntax error at position {}: {}",
                context,
                position,
                message
            )
        }
        MatchError::InvalidEncoding { position } => {
            anyhow::anyhow!("{}: invalid UTF-8 at byte {}", context, position)
        }
    }
}
