//! walcheck Binary
//!
//! Checks WAL archive directories and exits with a monitoring-plugin code.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use walcheck::config::DEFAULT_GAP_THRESHOLD_SECS;
use walcheck::verifier::overall_severity;
use walcheck::{verify_many, Config};

/// Exit code for invocation errors (monitoring-plugin UNKNOWN)
const EXIT_UNKNOWN: i32 = 3;

/// walcheck
#[derive(Parser, Debug)]
#[command(name = "walcheck")]
#[command(about = "Verify that archived WAL segments form a gap-free sequence")]
#[command(version)]
struct Args {
    /// WAL archive directory (repeat to check several)
    #[arg(short, long, required = true)]
    directory: Vec<PathBuf>,

    /// Suffix appended to archived segment names, e.g. ".gz"
    #[arg(short, long, default_value_t = String::new())]
    suffix: String,

    /// Gap length in seconds past which a gap is CRITICAL
    #[arg(short, long = "threshold-secs", default_value_t = DEFAULT_GAP_THRESHOLD_SECS)]
    threshold_secs: u64,

    /// Log walk details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(EXIT_UNKNOWN);
        }
    };

    // Initialize tracing/logging. Off by default: stderr carries only the
    // status line unless --verbose or RUST_LOG asks for more.
    let default_filter = if args.verbose { "walcheck=debug" } else { "off" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("walcheck v{}", walcheck::VERSION);

    // Build one config per directory
    let configs: Vec<Config> = args
        .directory
        .iter()
        .map(|dir| {
            Config::builder()
                .archive_dir(dir)
                .wal_suffix(&args.suffix)
                .gap_threshold_secs(args.threshold_secs)
                .build()
        })
        .collect();

    for config in &configs {
        if let Err(e) = config.validate() {
            eprintln!("UNKNOWN: {}", e);
            std::process::exit(EXIT_UNKNOWN);
        }
    }

    let reports = verify_many(&configs);

    if let [report] = reports.as_slice() {
        eprintln!("{}", report.outcome.status());
    } else {
        for report in &reports {
            eprintln!("{}: {}", report.archive_dir.display(), report.outcome.status());
        }
    }

    std::process::exit(overall_severity(&reports).exit_code());
}
