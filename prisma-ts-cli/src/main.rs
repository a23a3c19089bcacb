//! # prisma-ts
//!
//! Prisma generator emitting TypeScript interfaces and enum constants.
//!
//! ## Usage
//!
//! ```prisma
//! generator types {
//!   provider = "prisma-ts"
//!   output   = "./generated"
//! }
//! ```
//!
//! ```bash
//! # Generate offline from a DMMF dump
//! prisma-ts generate --dmmf ./dmmf.json --output ./generated
//!
//! # Dry run to preview output
//! prisma-ts generate --dmmf ./dmmf.json --output ./generated --dry-run
//!
//! # Print the generator manifest
//! prisma-ts manifest
//!
//! # Validate generated types are up-to-date
//! prisma-ts check --path ./generated/index.ts --dmmf ./dmmf.json
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use prisma_ts::{CliArgs, FileWriter, GeneratorConfig, TypesGenerator, WriteResult};
use prisma_ts_cli::{error::CliError, host, input::load_options, is_up_to_date};

#[derive(Parser)]
#[command(name = "prisma-ts")]
#[command(author, version, about = "Generate TypeScript types from a Prisma schema", long_about = None)]
struct Cli {
    /// Without a subcommand the binary serves the Prisma generator protocol on stdio
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript types from a DMMF JSON file
    Generate {
        /// DMMF JSON file (generator payload, DMMF document or datamodel)
        #[arg(short, long)]
        dmmf: PathBuf,

        /// Output directory for the generated file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file name
        #[arg(long)]
        file_name: Option<String>,

        /// Maximum line width of the formatted output
        #[arg(long)]
        print_width: Option<usize>,

        /// Preview output without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the generator manifest as JSON
    Manifest,

    /// Validate that a generated file is up-to-date
    Check {
        /// Path to the generated TypeScript file
        #[arg(short, long)]
        path: PathBuf,

        /// DMMF JSON file the file was generated from
        #[arg(short, long)]
        dmmf: PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        None => cmd_host(),

        Some(Commands::Generate {
            dmmf,
            output,
            file_name,
            print_width,
            dry_run,
        }) => cmd_generate(
            &dmmf,
            CliArgs {
                output,
                file_name,
                print_width,
            },
            dry_run,
        ),

        Some(Commands::Manifest) => cmd_manifest(),

        Some(Commands::Check { path, dmmf }) => cmd_check(&path, &dmmf),
    }
}

/// Serve the host protocol until stdin closes.
fn cmd_host() -> Result<(), CliError> {
    let stdin = std::io::stdin();
    let stderr = std::io::stderr();
    host::serve(stdin.lock(), stderr.lock())
}

/// Generate command implementation.
fn cmd_generate(dmmf: &Path, args: CliArgs, dry_run: bool) -> Result<(), CliError> {
    println!("{}", "Loading DMMF...".cyan());
    let options = load_options(dmmf)?;
    let datamodel = &options.dmmf.datamodel;

    println!(
        "  Found {} model(s) and {} enum(s)",
        datamodel.models.len().to_string().green(),
        datamodel.enums.len().to_string().green()
    );

    let config = GeneratorConfig::resolve(&options, &args).map_err(prisma_ts::GenerateError::from)?;

    println!("{}", "Generating TypeScript types...".cyan());
    let generator = TypesGenerator::new(config);

    match generator.write(datamodel, &FileWriter::new(dry_run))? {
        WriteResult::Written { path, bytes } => {
            println!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        WriteResult::DryRun { content, path } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            println!("{}", content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }

    Ok(())
}

/// Manifest command implementation.
fn cmd_manifest() -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(&prisma_ts::manifest())?);
    Ok(())
}

/// Check command implementation.
fn cmd_check(path: &Path, dmmf: &Path) -> Result<(), CliError> {
    println!("{}", "Checking generated types...".cyan());

    if !path.exists() {
        return Err(CliError::Validation(format!(
            "Generated file not found: {}",
            path.display()
        )));
    }

    let existing = std::fs::read_to_string(path)?;
    let options = load_options(dmmf)?;

    let output_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let args = CliArgs {
        output: Some(output_dir),
        ..Default::default()
    };
    let config = GeneratorConfig::resolve(&options, &args).map_err(prisma_ts::GenerateError::from)?;
    let output = TypesGenerator::new(config).generate(&options.dmmf.datamodel)?;

    if is_up_to_date(&existing, &output.content) {
        println!("{} Types are up-to-date", "✓".green());
        Ok(())
    } else {
        println!("{} Types are out of date", "✗".red());
        println!("  Run 'prisma generate' to update");
        Err(CliError::Validation("Types are out of date".to_string()))
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
