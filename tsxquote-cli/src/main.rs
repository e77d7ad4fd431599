//! tsxquote CLI: TSX symbol list, quote reports and spreadsheet export.
//!
//! Commands:
//! - (none): fetch every listed symbol and export the full spreadsheet
//! - `symbols`: print the listed symbols, one per line
//! - `info`: company report for one symbol
//! - `etf`: fund report and screen verdict for one symbol
//! - `export`: spreadsheet for the given symbols, or all listed ones
//! - `watchlist`: company report for each configured watchlist symbol

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tsxquote_core::data::LogProgress;
use tsxquote_core::{
    live_pipeline, AppConfig, ExportMode, ExportOptions, ExportSummary, LivePipeline, Symbol,
};

#[derive(Parser)]
#[command(
    name = "tsxquote",
    version,
    about = "tsxquote: TSX listed symbols, quote reports and spreadsheet export"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every listed symbol, one per line.
    Symbols,
    /// Print the company report for a symbol.
    Info {
        /// Symbol in provider form (e.g. CEU.TO).
        symbol: String,

        /// Dump every raw field before the report.
        #[arg(long, default_value_t = false)]
        raw: bool,

        /// Print the raw record as JSON instead of the report.
        #[arg(long, default_value_t = false, conflicts_with = "raw")]
        json: bool,
    },
    /// Print the fund report and screen verdict for an ETF.
    Etf {
        /// Symbol in provider form (e.g. XIU.TO).
        symbol: String,
    },
    /// Write a spreadsheet row per symbol.
    Export {
        /// Symbols to export. Defaults to every listed symbol.
        symbols: Vec<String>,

        /// Output file. Defaults to the configured export path.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write only the symbol column; no quote lookups.
        #[arg(long, default_value_t = false)]
        symbols_only: bool,

        /// Never overwrite; number the file instead.
        #[arg(long, default_value_t = false)]
        no_clobber: bool,
    },
    /// Print the company report for each watchlist symbol.
    Watchlist,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    let pipeline = live_pipeline(&config).context("building HTTP client")?;

    match cli.command {
        None => run_report(&pipeline, &config),
        Some(Commands::Symbols) => run_symbols(&pipeline),
        Some(Commands::Info { symbol, raw, json }) => run_info(&pipeline, &symbol, raw, json),
        Some(Commands::Etf { symbol }) => run_etf(&pipeline, &symbol),
        Some(Commands::Export {
            symbols,
            output,
            symbols_only,
            no_clobber,
        }) => {
            let mode = if symbols_only {
                ExportMode::SymbolsOnly
            } else {
                ExportMode::Full
            };
            let options = ExportOptions {
                path: output.unwrap_or_else(|| config.export.path.clone()),
                mode,
                no_clobber: no_clobber || config.export.no_clobber,
            };
            run_export(&pipeline, &symbols, &options)
        }
        Some(Commands::Watchlist) => run_watchlist(&pipeline, &config.watchlist),
    }
}

/// Logs go to stderr; `-v`/`-q` win over `RUST_LOG`, which wins over `info`.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Some("warn"),
        (false, 0) => None,
        (false, 1) => Some("debug"),
        (false, _) => Some("trace"),
    };
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_symbol(raw: &str) -> Result<Symbol> {
    Symbol::parse(raw).with_context(|| format!("bad symbol argument {raw:?}"))
}

fn fetch_symbols(pipeline: &LivePipeline) -> Result<Vec<Symbol>> {
    pipeline
        .fetch_all_symbols()
        .context("fetching the TSX symbol list")
}

/// Default run: every listed symbol, full export.
fn run_report(pipeline: &LivePipeline, config: &AppConfig) -> Result<()> {
    let symbols = fetch_symbols(pipeline)?;
    info!("fetched {} symbols", symbols.len());
    let options = ExportOptions {
        path: config.export.path.clone(),
        mode: ExportMode::Full,
        no_clobber: config.export.no_clobber,
    };
    let summary = pipeline
        .export_symbols(&symbols, &options, &LogProgress)
        .context("exporting spreadsheet")?;
    print_summary(&summary)
}

fn run_symbols(pipeline: &LivePipeline) -> Result<()> {
    let symbols = fetch_symbols(pipeline)?;
    let mut out = io::stdout().lock();
    for symbol in &symbols {
        writeln!(out, "{symbol}")?;
    }
    Ok(())
}

fn run_info(pipeline: &LivePipeline, raw_symbol: &str, raw: bool, json: bool) -> Result<()> {
    let symbol = parse_symbol(raw_symbol)?;
    let mut out = io::stdout().lock();
    if json {
        let record = pipeline
            .get_company_info(&symbol)
            .with_context(|| format!("fetching {symbol}"))?;
        writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
    } else {
        pipeline
            .print_stock_info(&symbol, raw, &mut out)
            .with_context(|| format!("reporting on {symbol}"))?;
    }
    Ok(())
}

fn run_etf(pipeline: &LivePipeline, raw_symbol: &str) -> Result<()> {
    let symbol = parse_symbol(raw_symbol)?;
    let mut out = io::stdout().lock();
    pipeline
        .analyze_etf(&symbol, &mut out)
        .with_context(|| format!("analyzing ETF {symbol}"))?;
    Ok(())
}

fn run_export(pipeline: &LivePipeline, raw_symbols: &[String], options: &ExportOptions) -> Result<()> {
    let symbols = if raw_symbols.is_empty() {
        fetch_symbols(pipeline)?
    } else {
        raw_symbols
            .iter()
            .map(|s| parse_symbol(s))
            .collect::<Result<Vec<_>>>()?
    };
    let summary = pipeline
        .export_symbols(&symbols, options, &LogProgress)
        .with_context(|| format!("exporting to {}", options.path.display()))?;
    print_summary(&summary)
}

fn run_watchlist(pipeline: &LivePipeline, watchlist: &[String]) -> Result<()> {
    if watchlist.is_empty() {
        bail!("watchlist is empty; add symbols to the config file");
    }
    let symbols = watchlist
        .iter()
        .map(|s| parse_symbol(s))
        .collect::<Result<Vec<_>>>()?;

    let mut out = io::stdout().lock();
    let failed = pipeline.watchlist(&symbols, &mut out)?;
    if failed.len() == symbols.len() {
        bail!("no watchlist symbol could be reported");
    }
    Ok(())
}

fn print_summary(summary: &ExportSummary) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "Wrote {} rows to {} ({} without data)",
        summary.rows,
        summary.path.display(),
        summary.failed.len()
    )?;
    Ok(())
}
