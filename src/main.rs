use std::path::PathBuf;
use std::sync::Arc;
use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use docsim::config::Config;
use docsim::documents::{self, AutoTextSource, PdfTextSource, TextSource};
use docsim::ops;
use docsim::similarity::{DuplicateDetector, StopwordPolicy};

#[derive(Parser)]
#[command(name = "docsim")]
#[command(version)]
#[command(about = "Near-duplicate detection for filed PDF documents", long_about = None)]
struct Cli {
    /// Config file (default: config.json in the app data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More console output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Score two documents (PDF or plain text)
    Compare {
        a: PathBuf,
        b: PathBuf,
        /// Stopword list: compact or extended
        #[arg(long)]
        stopwords: Option<StopwordPolicy>,
        /// List the shared tokens
        #[arg(long)]
        tokens: bool,
    },
    /// Check one PDF against the output folder
    Check {
        path: PathBuf,
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        porcelain: bool,
    },
    /// Check every PDF in the input folder: duplicates go to the trash folder, the rest to the output folder
    Scan {
        /// Report only, move nothing
        #[arg(long)]
        dry_run: bool,
        /// Overwrite files in the trash folder
        #[arg(long)]
        force: bool,
        /// Print one DUPLIKAT_ERKANNT|original|incoming|score line per duplicate
        #[arg(long)]
        porcelain: bool,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Show the effective configuration
    Config {
        /// Write the defaults to the config file if it does not exist
        #[arg(long)]
        init: bool,
    },
    /// Internal: Extract PDF text (hidden)
    #[command(hide = true)]
    ExtractPdf {
        path: PathBuf,
    },
}

fn init_logging(verbose: u8) -> tracing_appender::non_blocking::WorkerGuard {
    let app_dir = Config::get_app_data_dir();
    let file_appender = tracing_appender::rolling::never(app_dir, "debug.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
    let console_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        // stdout is reserved for results
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(console_level)),
        )
        .init();
    guard
}

fn with_threshold(mut config: Config, threshold: Option<f64>) -> anyhow::Result<Config> {
    if let Some(t) = threshold {
        config.document_processing.similarity_threshold = t;
        config.validate()?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Child process for PDF extraction: no logging, no config
    if let Commands::ExtractPdf { path } = &cli.command {
        std::process::exit(documents::processing::extract_pdf_main(path));
    }

    dotenv::dotenv().ok();
    let _guard = init_logging(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;
    tracing::debug!("Loaded config from {:?}", config_path);

    match cli.command {
        Commands::Compare { a, b, stopwords, tokens } => {
            let policy = stopwords.unwrap_or(config.duplicate_detection.stopwords);
            let source: Arc<dyn TextSource> = Arc::new(AutoTextSource::new()?);
            let cmp = ops::run_compare(&a, &b, DuplicateDetector::new(policy), source).await?;

            println!("{} {:.4}", style("Similarity:").bold(), cmp.score);
            println!(
                "Shared tokens: {} of {} ({} / {} per side, {} stopwords)",
                cmp.shared, cmp.union, cmp.left_tokens, cmp.right_tokens, policy.name()
            );
            let threshold = config.document_processing.similarity_threshold;
            if cmp.score >= threshold {
                println!("{}", style(format!("Duplicate at threshold {:.2}", threshold)).yellow());
            } else {
                println!("{}", style(format!("Distinct at threshold {:.2}", threshold)).green());
            }
            if tokens {
                println!("{}", cmp.shared_tokens.join(" "));
            }
        }
        Commands::Check { path, threshold, porcelain } => {
            let config = with_threshold(config, threshold)?;
            let source: Arc<dyn TextSource> = Arc::new(PdfTextSource::new()?);
            documents::validate_pdf(&path, config.document_processing.max_file_size_mb)?;

            match ops::check_document(&path, &config, source).await? {
                ops::CheckOutcome::Duplicate(m) => {
                    if porcelain {
                        println!("{}", m);
                    } else {
                        println!(
                            "{} {} ~ {} ({:.2}{})",
                            style("Duplicate:").yellow().bold(),
                            path.display(),
                            m.original.display(),
                            m.score,
                            if m.is_exact() { ", identical bytes" } else { "" }
                        );
                    }
                }
                ops::CheckOutcome::Distinct { compared, best_score } => {
                    if !porcelain {
                        let best = best_score.map_or("-".to_string(), |s| format!("{:.2}", s));
                        println!(
                            "{} {} (compared {}, best {})",
                            style("Distinct:").green().bold(),
                            path.display(),
                            compared,
                            best
                        );
                    }
                }
                ops::CheckOutcome::Skipped(reason) => {
                    if !porcelain {
                        println!("{} {:?}", style("Not compared:").dim(), reason);
                    }
                }
            }
        }
        Commands::Scan { dry_run, force, porcelain, threshold } => {
            let config = with_threshold(config, threshold)?;
            let source: Arc<dyn TextSource> = Arc::new(PdfTextSource::new()?);
            let opts = ops::ScanOptions { dry_run, force, porcelain };

            if !porcelain {
                println!("Scanning {} (details in debug.log)...", config.paths.input_dir.display());
            }
            let summary = ops::run_scan(&config, opts, source).await?;

            if !porcelain {
                for m in &summary.duplicates {
                    println!(
                        "  {} {} ~ {} ({:.2})",
                        style("duplicate").yellow(),
                        m.incoming.display(),
                        m.original.display(),
                        m.score
                    );
                }
                for path in &summary.filed {
                    println!("  {} {}", style("filed").green(), path.display());
                }
                println!(
                    "{} processed, {} distinct, {} duplicates, {} skipped, {} errors{}",
                    summary.processed,
                    summary.distinct,
                    summary.duplicates.len(),
                    summary.skipped,
                    summary.errors,
                    if dry_run { " (dry run)" } else { "" }
                );
                for r in &summary.reports {
                    println!("Report: {}", r.display());
                }
            }
        }
        Commands::Config { init } => {
            if init && !config_path.exists() {
                Config::default().save_to(&config_path)?;
                println!("Wrote {}", config_path.display());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::ExtractPdf { .. } => unreachable!(), // Handled above
    }

    Ok(())
}
