//! pdfrank CLI - rank PDF sections against a persona's job to be done

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfrank::pipeline::REPORT_FILE_NAME;
use pdfrank::render::{to_json, to_json_value};
use pdfrank::{
    AnalysisConfig, Analyzer, AnalyzerOptions, FilterOptions, JsonFormat, PipelineEvent,
    RankOptions, Report, SectionExtractor, Workspace,
};

#[derive(Parser)]
#[command(name = "pdfrank")]
#[command(version)]
#[command(about = "Extract and rank PDF sections for a persona's task", long_about = None)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct RunArgs {
    /// Run configuration (persona, job to be done, documents)
    #[arg(short, long, value_name = "FILE", default_value = "input.json")]
    config: PathBuf,

    /// Directory holding the documents [default: ./input or /app/input]
    #[arg(long, value_name = "DIR", env = "PDFRANK_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Directory the report is written to [default: ./output or /app/output]
    #[arg(long, value_name = "DIR", env = "PDFRANK_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Sections selected by the lexical pass
    #[arg(long, default_value = "10")]
    top_n: usize,

    /// Similarity percentile below which sections are dropped
    #[arg(long, default_value = "50")]
    percentile: f64,

    /// Cosine similarity above which a section is a near-duplicate
    #[arg(long, default_value = "0.95")]
    duplicate_threshold: f64,

    /// Similarity the semantic pass requires
    #[arg(long, default_value = "0.25")]
    threshold: f64,

    /// Items kept when nothing passes, and the report size cap
    #[arg(long, default_value = "5")]
    fallback: usize,

    /// Extract documents in parallel
    #[arg(long)]
    parallel: bool,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,

    /// Print the report instead of writing it
    #[arg(long)]
    stdout: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sections extracted from one PDF as JSON
    Sections {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Some(Commands::Sections { input, compact }) => cmd_sections(&input, compact),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_run(&cli.run),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn workspace(args: &RunArgs) -> Workspace {
    let resolved = Workspace::resolve(".");
    Workspace::new(
        args.input_dir.clone().unwrap_or(resolved.input_dir),
        args.output_dir.clone().unwrap_or(resolved.output_dir),
    )
}

fn cmd_run(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AnalysisConfig::load(&args.config)?;
    let workspace = workspace(args);
    let options = AnalyzerOptions::new()
        .with_rank(
            RankOptions::new()
                .with_top_n(args.top_n)
                .with_relevance_percentile(args.percentile)
                .with_duplicate_threshold(args.duplicate_threshold),
        )
        .with_filter(
            FilterOptions::new()
                .with_threshold(args.threshold)
                .with_fallback_count(args.fallback),
        )
        .with_parallel(args.parallel)
        .with_json_format(json_format(args.compact));
    let analyzer = Analyzer::new(options);

    let pb = ProgressBar::new(config.documents.len() as u64 + 2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    let on_event = |event: PipelineEvent| match event {
        PipelineEvent::ExtractionStarted { documents } => {
            pb.set_message(format!("Extracting {} documents...", documents));
        }
        PipelineEvent::DocumentExtracted { document, sections } => {
            pb.set_message(format!("{}: {} sections", document, sections));
            pb.inc(1);
        }
        PipelineEvent::DocumentFailed { document, reason } => {
            pb.println(format!("{} {}: {}", "Skipped".yellow(), document, reason));
            pb.inc(1);
        }
        PipelineEvent::Ranked { candidates } => {
            pb.set_message(format!("Ranked {} candidates", candidates));
            pb.inc(1);
        }
        PipelineEvent::Filtered { items } => {
            pb.set_message(format!("Kept {} sections", items));
            pb.inc(1);
        }
        PipelineEvent::ReportWritten { path } => {
            pb.set_message(format!("Wrote {}", path.display()));
        }
    };

    let result = analyzer.run_with_progress(&config, &workspace, on_event);
    pb.finish_and_clear();
    let report = result?;

    if args.stdout {
        println!("{}", to_json(&report, json_format(args.compact))?);
        return Ok(());
    }

    let path = analyzer.write(&report, &workspace)?;
    print_summary(&report, &path);
    Ok(())
}

fn print_summary(report: &Report, path: &Path) {
    println!("{}", "Top sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for section in &report.extracted_sections {
        println!(
            "{:>3}. {} {}",
            section.importance_rank,
            section.section_title.bold(),
            format!("({}, p{})", section.document, section.page_number).dimmed()
        );
    }
    if report.is_empty() {
        println!("{}", "No sections selected".yellow());
    }

    println!("\n{} {}", "Saved to".green(), path.display());
}

fn cmd_sections(input: &Path, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sections = SectionExtractor::default().extract_file(input)?;
    log::info!("{} sections in {}", sections.len(), input.display());
    println!("{}", to_json_value(&sections, json_format(compact))?);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfrank".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Persona-driven PDF section ranking");
    println!();
    println!("Report file: {}", REPORT_FILE_NAME.dimmed());
    println!("License: MIT");
}
