mod error;
mod markup;
mod output;
mod parser;
mod record;
mod sources;

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "ose_spells", about = "Convert spell list HTML into an OSE spells.db")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the four class documents into one spells.db
    Convert {
        /// Directory holding beb_spell1.html .. beb_spell4.html
        #[arg(short, long, default_value = ".")]
        input_dir: PathBuf,
        /// Output file, one JSON record per line
        #[arg(short, long, default_value = output::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Show the spells detected in a single document
    Overview {
        /// HTML document to inspect
        file: PathBuf,
        /// Class the document describes
        #[arg(short, long, default_value = "Magic-User")]
        class: String,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { input_dir, output } => {
            let written = convert(&input_dir, &output)?;
            println!("Wrote {} spells to {}", written, output.display());
            Ok(())
        }
        Commands::Overview { file, class, limit } => overview(&file, &class, limit),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

/// Documents are converted in parallel, then written in list order. A failing
/// document stops the run after everything before it has been written.
fn convert(input_dir: &std::path::Path, output_path: &std::path::Path) -> anyhow::Result<usize> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(sources::SOURCES.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let results: Vec<_> = sources::SOURCES
        .par_iter()
        .map(|source| {
            let spells = sources::load(input_dir, source);
            pb.set_message(source.class);
            pb.inc(1);
            spells
        })
        .collect();
    pb.finish_and_clear();

    let mut out = output::create(output_path)?;
    let mut written = 0;
    for spells in results {
        written += output::write_spells(&mut out, &spells?)?;
    }
    out.flush()
        .with_context(|| format!("Failed to flush {}", output_path.display()))?;

    info!(records = written, output = %output_path.display(), "Finished");
    Ok(written)
}

fn overview(file: &std::path::Path, class: &str, limit: usize) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let document = markup::MarkupNode::parse_document(&html);
    let spells = parser::process_document(&document, class)
        .with_context(|| format!("Failed to convert {}", file.display()))?;
    if spells.is_empty() {
        println!("No spells found.");
        return Ok(());
    }

    println!(
        "{:>3} | {:<32} | {:>3} | {:<10} | {:<16} | {:<16}",
        "#", "Name", "Lvl", "Save", "Duration", "Range"
    );
    println!("{}", "-".repeat(96));

    for (i, s) in spells.iter().take(limit).enumerate() {
        println!(
            "{:>3} | {:<32} | {:>3} | {:<10} | {:<16} | {:<16}",
            i + 1,
            truncate(&s.name, 32),
            s.data.lvl,
            s.data.save.as_str(),
            truncate(&s.data.duration, 16),
            truncate(&s.data.range, 16),
        );
    }

    println!("\n{} spells ({} shown)", spells.len(), spells.len().min(limit));
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
