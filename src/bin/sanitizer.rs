//! Codex Sanitizer Binary
//!
//! Converts an export dump into chunked JSON for static hosting.
//!
//! ```text
//! codex-sanitizer --input ./raw_dump --output ./clean_data --cap-mib 20
//! ```

use std::path::PathBuf;

use clap::Parser;
use codex_sanitizer::{pipeline, Config};
use tracing_subscriber::{fmt, EnvFilter};

/// Codex Sanitizer
#[derive(Parser, Debug)]
#[command(name = "codex-sanitizer")]
#[command(about = "Sanitize game exports into size-capped JSON chunks")]
#[command(version)]
struct Args {
    /// Input folder containing exports (raw_dump / CodexDump)
    #[arg(short, long, default_value = "./raw_dump")]
    input: PathBuf,

    /// Output folder for website-ready data
    #[arg(short, long, default_value = "./clean_data")]
    output: PathBuf,

    /// Max size per JSON file in MiB
    #[arg(short = 'c', long, default_value = "20")]
    cap_mib: u64,

    /// Shorten /Game/... asset paths to their object name
    #[arg(long)]
    strip_asset_paths: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    tracing::info!("=== Codex Sanitizer v{} (chunked) ===", codex_sanitizer::VERSION);

    // Build config from args
    let config = Config::builder()
        .input_dir(&args.input)
        .output_dir(&args.output)
        .chunk_cap_mib(args.cap_mib)
        .strip_asset_paths(args.strip_asset_paths)
        .build();

    match pipeline::run(config) {
        Ok(summary) => {
            if summary.files_failed > 0 {
                tracing::warn!("{} file(s) skipped due to errors", summary.files_failed);
            }
        }
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}
