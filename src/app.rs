//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging (stderr)
//! - runs load -> seasonal correlation
//! - prints the summary table
//! - renders the chart and writes optional exports

use clap::Parser;
use tracing::Level;

use crate::cli::Cli;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `corrcoef` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    init_logging(&cli);

    let config = cli.to_config();
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_summary(&run.correlations));

    crate::plot::render(&run.ingest.records, &config.graph_path, &config.chart)?;

    if let Some(path) = &config.export {
        crate::io::export::write_joined_csv(path, &run.ingest.records)?;
    }
    if let Some(path) = &config.export_summary {
        crate::io::export::write_summary_json(path, &run.correlations)?;
    }

    Ok(())
}

/// Stdout is reserved for the summary table, so logs go to stderr.
fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Rewrite the historical two-letter single-dash flags to their long forms.
///
/// Clap only supports single-character short flags, so before parsing:
/// - `-sp VALUE` / `-sp=VALUE` -> `--stockPath ...`
/// - `-tp VALUE` / `-tp=VALUE` -> `--tempPath ...`
/// - `-gp VALUE` / `-gp=VALUE` -> `--graphPath ...`
///
/// Everything after a bare `--` is left untouched.
fn rewrite_args(argv: Vec<String>) -> Vec<String> {
    const SHORTHANDS: [(&str, &str); 3] = [
        ("-sp", "--stockPath"),
        ("-tp", "--tempPath"),
        ("-gp", "--graphPath"),
    ];

    let mut out = Vec::with_capacity(argv.len());
    let mut args = argv.into_iter();

    // Program name.
    out.extend(args.next());

    for arg in args.by_ref() {
        if arg == "--" {
            out.push(arg);
            break;
        }

        let (flag, value) = match arg.split_once('=') {
            Some((flag, value)) => (flag, Some(value)),
            None => (arg.as_str(), None),
        };

        match SHORTHANDS.iter().find(|(short, _)| *short == flag) {
            Some((_, long)) => match value {
                Some(value) => out.push(format!("{long}={value}")),
                None => out.push((*long).to_string()),
            },
            None => out.push(arg),
        }
    }

    out.extend(args);
    out
}
