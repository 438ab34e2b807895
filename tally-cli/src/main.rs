use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tally_finance::{StatementProcessor, write_csv, write_ledger};
use tally_ingest::{ProfileRegistry, TesseractOcr, TextResolver, open_document};
use tracing::{info, warn};

mod config;
mod discover;
mod logging;
mod run;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Extract, normalize and merge bank statement transactions")]
struct Cli {
    /// Config file (default: ./tally.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process every statement in the input directory into one consolidated CSV
    Run {
        #[arg(long)]
        input: Option<PathBuf>,

        #[arg(long)]
        output: Option<PathBuf>,

        /// Documents processed in parallel
        #[arg(long)]
        jobs: Option<usize>,

        /// Never OCR pages without a text layer
        #[arg(long)]
        no_ocr: bool,
    },

    /// Print one statement's transactions to stdout
    Extract {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        #[arg(long)]
        no_ocr: bool,
    },

    /// Print the institution each file is identified as
    Identify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default tally.toml
    Init,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Run {
            input,
            output,
            jobs,
            no_ocr,
        } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let input = input.unwrap_or_else(|| cfg.paths.input.clone());
            let output = output.unwrap_or_else(|| cfg.paths.output.clone());

            let files = discover::statement_files(&input)?;
            if files.is_empty() {
                warn!(input = %input.display(), "no statements found");
            }
            info!(files = files.len(), input = %input.display(), "processing statements");

            let processor = Arc::new(build_processor(&cfg, no_ocr)?);
            let batch = run::process_all(processor, files, jobs.unwrap_or(cfg.run.jobs)).await;
            let ledger = batch.ledger();
            batch.log_summary(&ledger);

            if let Some(path) = write_ledger(&ledger, &output, Local::now().date_naive())? {
                println!("Wrote {} transactions to {}", ledger.len(), path.display());
            }
            if batch.interrupted {
                std::process::exit(130);
            }
        }

        Command::Extract {
            file,
            format,
            no_ocr,
        } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let processor = build_processor(&cfg, no_ocr)?;
            let outcome = processor.process_path(&file)?;

            let stdout = io::stdout();
            let mut out = stdout.lock();
            match format {
                Format::Csv => write_csv(&mut out, &outcome.transactions)?,
                Format::Json => {
                    serde_json::to_writer_pretty(&mut out, &outcome.transactions)
                        .context("serialize transactions")?;
                    writeln!(out)?;
                }
            }
        }

        Command::Identify { files } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let processor = build_processor(&cfg, false)?;
            for path in files {
                let label = match open_document(&path) {
                    Ok(doc) => processor
                        .identify(doc.as_ref())
                        .map(|id| id.name().to_string())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    Err(e) => format!("error: {e}"),
                };
                println!("{}\t{}", path.display(), label);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(cli.config.as_deref())?,
        },
    }

    Ok(())
}

fn build_processor(cfg: &Config, no_ocr: bool) -> Result<StatementProcessor> {
    let registry = ProfileRegistry::builtin().context("building format profiles")?;
    let resolver = if cfg.ocr.enabled && !no_ocr {
        match TesseractOcr::new(&cfg.ocr.settings()) {
            Ok(ocr) => TextResolver::with_ocr(Arc::new(ocr)),
            Err(e) => {
                warn!(error = %e, "OCR unavailable, pages without a text layer will be empty");
                TextResolver::native_only()
            }
        }
    } else {
        TextResolver::native_only()
    };
    Ok(StatementProcessor::new(registry, resolver).with_default_year(cfg.normalize.default_year))
}
