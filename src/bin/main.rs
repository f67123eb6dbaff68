//! Folio CLI - Generate reports from JSON report documents
//!
//! Usage:
//!   folio render <report.json> [--filter <filter.json>] [--config <folio.toml>] [--compact]
//!   folio check <report.json>
//!   folio list <report.json>
//!
//! Examples:
//!   folio render reports/sales.json --filter reports/east.json
//!   folio check reports/sales.json
//!   folio list reports/sales.json

use clap::{Parser, Subcommand};
use folio::config::Settings;
use folio::document::ReportDocument;
use folio::filter::ReportFilter;
use folio::logging::init_logging;
use folio::report::{ReportDefinition, ReportGenerator};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio - Concurrent report generation from declarative definitions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report and print it as JSON
    Render {
        /// Path to the report document
        file: PathBuf,

        /// Filter with parameter values and sorting/grouping rules
        #[arg(short, long)]
        filter: Option<PathBuf>,

        /// Settings file (defaults to FOLIO_CONFIG, ./folio.toml, then the user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print compact JSON instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },

    /// Validate a report document without running its queries
    Check {
        /// Path to the report document
        file: PathBuf,
    },

    /// List the sections and components of a report document
    List {
        /// Path to the report document
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            file,
            filter,
            config,
            compact,
        } => cmd_render(file, filter, config, compact),
        Commands::Check { file } => cmd_check(file),
        Commands::List { file } => cmd_list(file),
    }
}

fn load_definition(file: &Path) -> Result<ReportDefinition, ExitCode> {
    ReportDocument::from_path(file)
        .and_then(|document| document.build())
        .map_err(|e| {
            eprintln!("Error loading '{}': {}", file.display(), e);
            ExitCode::FAILURE
        })
}

fn load_filter(file: &Path) -> Result<ReportFilter, String> {
    let content = fs::read_to_string(file).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

fn cmd_render(
    file: PathBuf,
    filter: Option<PathBuf>,
    config: Option<PathBuf>,
    compact: bool,
) -> ExitCode {
    let settings = match config {
        Some(path) => Settings::from_file(&path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging);

    let definition = match load_definition(&file) {
        Ok(d) => Arc::new(d),
        Err(code) => return code,
    };

    let filter = match filter.as_deref().map(load_filter).transpose() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error reading filter: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let generator = ReportGenerator::new().with_settings(settings.generation);
    let result = runtime.block_on(generator.generate(definition, filter));

    let execution_time_ms = result.execution_time_ms;
    match result.into_result() {
        Ok(report) => {
            let json = if compact {
                serde_json::to_string(&report)
            } else {
                serde_json::to_string_pretty(&report)
            };
            match json {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to serialize report: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(errors) => {
            eprintln!("Report generation failed after {} ms:", execution_time_ms);
            for (name, message) in &errors {
                eprintln!("  {}: {}", name, message);
            }
            ExitCode::FAILURE
        }
    }
}

fn cmd_check(file: PathBuf) -> ExitCode {
    let definition = match load_definition(&file) {
        Ok(d) => d,
        Err(code) => return code,
    };

    let components: usize = definition.sections().map(|s| s.components().len()).sum();
    println!(
        "OK: {} is valid ({} sections, {} components, {} queries)",
        file.display(),
        definition.sections().count(),
        components,
        definition.queries().len()
    );
    ExitCode::SUCCESS
}

fn cmd_list(file: PathBuf) -> ExitCode {
    let definition = match load_definition(&file) {
        Ok(d) => d,
        Err(code) => return code,
    };

    println!("Report: {} ({})", definition.name, definition.title);
    println!();

    for section in definition.sections() {
        println!("{}: {}", section.section_type, section.title);
        if section.is_empty() {
            println!("  (no components)");
        }
        for component in section.components() {
            let queries: Vec<_> = component.queries().iter().map(|q| q.name().to_string()).collect();
            if queries.is_empty() {
                println!("  - {} [{}]", component.name(), component.kind());
            } else {
                println!(
                    "  - {} [{}] (queries: {})",
                    component.name(),
                    component.kind(),
                    queries.join(", ")
                );
            }
        }
        println!();
    }

    ExitCode::SUCCESS
}
