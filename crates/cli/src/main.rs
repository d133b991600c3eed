//! CLI tool for converting PowerPoint files to markdown.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pptmd_core::{ConversionResult, ReadingOrder};
use pptmd_pptx::{ConverterOptions, PowerPointConverter};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Convert a PowerPoint presentation to markdown.
#[derive(Parser, Debug)]
#[command(name = "pptx2md")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file (.pptx)
    file: PathBuf,

    /// Output markdown file (default: input path with .md extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the processing method and document metadata before writing
    #[arg(long)]
    summary: bool,

    /// How shapes are ordered on each slide
    #[arg(long, value_enum, default_value_t = OrderArg::Semantic)]
    reading_order: OrderArg,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OrderArg {
    /// Titles, then subtitles, then content
    Semantic,
    /// Order of shapes in the slide XML
    Document,
    /// Top-to-bottom, then left-to-right
    Position,
}

impl From<OrderArg> for ReadingOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Semantic => ReadingOrder::Semantic,
            OrderArg::Document => ReadingOrder::Document,
            OrderArg::Position => ReadingOrder::Position,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if !args.file.is_file() {
        eprintln!("Error: File '{}' not found", args.file.display());
        std::process::exit(1);
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.file.with_extension("md"));

    let converter = PowerPointConverter::with_options(
        ConverterOptions::new().with_reading_order(args.reading_order.into()),
    );

    let markdown = if args.summary {
        let result = converter
            .process_file(&args.file)
            .with_context(|| format!("Failed to convert {}", args.file.display()))?;
        print_summary(&result);
        result.content
    } else {
        converter
            .convert_to_markdown(&args.file)
            .with_context(|| format!("Failed to convert {}", args.file.display()))?
    };

    write_output(&output_path, &markdown)?;
    println!("Written to {}", output_path.display());

    Ok(())
}

/// Print the processing method and key document fields.
fn print_summary(result: &ConversionResult) {
    println!("Processing method: {}", result.processing_method);

    if let Some(metadata) = &result.metadata {
        let slide_count = metadata
            .slide_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        println!("Slide count: {}", slide_count);
        println!("Title: {}", metadata.title.as_deref().unwrap_or("N/A"));
    }

    println!("---");
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
