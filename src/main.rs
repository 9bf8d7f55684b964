//! Reflow CLI
//!
//! Paginates a serialized document with the built-in metrics measurer and
//! prints a per-page summary, or the reflowed document with `--json`.
//!
//! Usage:
//!   page-reflow doc.json
//!   page-reflow --text notes.txt --config letter.json --json
//!   RUST_LOG=page_reflow=debug page-reflow doc.json

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use page_reflow::{
    reflow_document, Document, MetricsMeasurer, PaginationConfig, Schema, Selection,
};

#[derive(Parser, Debug)]
#[command(name = "page-reflow")]
#[command(about = "Paginate a document and report the resulting pages")]
struct Args {
    /// Document to paginate; `-` reads stdin
    input: PathBuf,

    /// Treat the input as plain text, one paragraph per line
    #[arg(long)]
    text: bool,

    /// Pagination configuration as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the reflowed document instead of the summary
    #[arg(long)]
    json: bool,
}

fn read_input(path: &PathBuf) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => PaginationConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => PaginationConfig::default(),
    };
    let input = read_input(&args.input)?;
    let doc = if args.text {
        let mut doc = Document::from_text(&input);
        for page in &mut doc.pages {
            page.attrs = config.default_page.clone();
        }
        doc
    } else {
        Document::from_json(&input)?
    };

    let measurer = MetricsMeasurer::for_config(&config);
    let selection = Selection::at_start(&doc);
    let reflow = reflow_document(&doc, &selection, &config, &Schema::paged(), &measurer, &measurer)?;
    let layout = reflow.layout;

    if args.json {
        println!("{}", layout.document.to_json()?);
        return Ok(());
    }

    println!(
        "{} page(s), {} split(s), {} overflow(s)",
        layout.document.page_count(),
        layout.stats.splits,
        layout.stats.overflows
    );
    for (index, (page, summary)) in layout.document.pages.iter().zip(&layout.pages).enumerate() {
        println!(
            "  page {:>3}: {:>3} block(s), {:>7.1} / {:.1}{}",
            index + 1,
            page.body.blocks.len(),
            summary.height,
            summary.available,
            if summary.overflow { "  overflow" } else { "" }
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "reflow failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
