//! Command-line interface for to-CEI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cache::FileCache;
use crate::config::default_cache_dir;
use crate::error::{CeiError, Result};
use crate::input::{load_document, Document};
use crate::validator::{CeiValidator, SchemaValidator};
use crate::xml::{to_xml_string, Element};

/// to-CEI - Build CEI XML documents for medieval charters.
#[derive(Parser)]
#[command(name = "to-cei")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a charter or charter group file from a YAML or JSON description.
    Build {
        /// Input file (.yaml, .yml or .json)
        input: PathBuf,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Add xsi:schemaLocation to the root element
        #[arg(long)]
        schema_location: bool,

        /// Validate against the CEI schema before writing
        #[arg(long)]
        validate: bool,

        /// Directory for the downloaded schema (default: ~/.cache/to-cei)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Print the CEI XML of a YAML or JSON description to stdout.
    Print {
        /// Input file (.yaml, .yml or .json)
        input: PathBuf,

        /// Add xsi:schemaLocation to the root element
        #[arg(long)]
        schema_location: bool,
    },

    /// Validate a CEI XML file against the CEI schema.
    Validate {
        /// XML file to validate
        file: PathBuf,

        /// Directory for the downloaded schema (default: ~/.cache/to-cei)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Download the schema again even if it is cached
        #[arg(long)]
        refresh: bool,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            schema_location,
            validate,
            cache_dir,
        } => build_command(
            &input,
            output.as_deref(),
            schema_location,
            validate,
            cache_dir.as_deref(),
        ),
        Commands::Print {
            input,
            schema_location,
        } => print_command(&input, schema_location),
        Commands::Validate {
            file,
            cache_dir,
            refresh,
        } => validate_command(&file, cache_dir.as_deref(), refresh),
    }
}

/// Execute the build command.
fn build_command(
    input: &Path,
    output: Option<&Path>,
    schema_location: bool,
    validate: bool,
    cache_dir: Option<&Path>,
) -> Result<()> {
    if let Some(output_dir) = output {
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(CeiError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Output path is not a directory: {}", output_dir.display()),
            )));
        }
    }

    let document = load_document(input)?;
    match &document {
        Document::Charter(charter) => println!(
            "{} charter {}",
            style("Building").bold(),
            style(charter.id_text()).cyan()
        ),
        Document::Group(group) => println!(
            "{} group {} with {} charters",
            style("Building").bold(),
            style(group.name()).cyan(),
            group.charters().len()
        ),
    }

    if validate {
        validate_element(&document.to_xml(schema_location), cache_dir, false)?;
    }

    let path = document.to_file(output, schema_location)?;
    println!("{} {}", style("Saved to:").green().bold(), path.display());

    Ok(())
}

/// Execute the print command.
fn print_command(input: &Path, schema_location: bool) -> Result<()> {
    let document = load_document(input)?;
    print!("{}", to_xml_string(&document.to_xml(schema_location), true)?);
    Ok(())
}

/// Execute the validate command.
fn validate_command(file: &Path, cache_dir: Option<&Path>, refresh: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let element = Element::parse(&content)?;
    validate_element(&element, cache_dir, refresh)?;
    println!("{} {}", style("Valid:").green().bold(), file.display());
    Ok(())
}

fn open_cache(cache_dir: Option<&Path>) -> Result<FileCache> {
    let dir = match cache_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_cache_dir()?,
    };
    FileCache::new(dir)
}

fn validate_element(element: &Element, cache_dir: Option<&Path>, refresh: bool) -> Result<()> {
    let validator = CeiValidator::new(open_cache(cache_dir)?).with_refresh(refresh);

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Validating against the CEI schema...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = validator.validate_cei(element);
    pb.finish_and_clear();

    if let Err(CeiError::SchemaValidation { errors }) = &result {
        println!(
            "{} {} problem(s)",
            style("Invalid:").red().bold(),
            style(errors.len()).yellow().bold()
        );
        for error in errors {
            println!("  - {error}");
        }
    }
    result
}
