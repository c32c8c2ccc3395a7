use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docmatch::core::error::Rejection;
use docmatch::extract::GroqVisionClient;
use docmatch::photo::FaceCropBridge;
use docmatch::pipeline::{run, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "docmatch")]
#[command(version, about = "Identity document extraction, matching and validation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract and resolve identities from uploaded documents
    Extract {
        /// Input files (PDF, JPG, JPEG or PNG)
        inputs: Vec<PathBuf>,

        /// Output directory (default: ./extracted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Work directory for rendered pages and face crops
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Vision model to use for extraction
        #[arg(long)]
        model: Option<String>,

        /// OpenAI-compatible API base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Rendering DPI for PDF pages
        #[arg(long, default_value_t = 200)]
        dpi: u32,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show information about a PDF file
    Info {
        /// Input PDF file path
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            inputs,
            output,
            work_dir,
            model,
            base_url,
            dpi,
            quiet,
        } => extract(inputs, output, work_dir, model, base_url, dpi, quiet),
        Commands::Info { input } => show_info(input),
    }
}

fn extract(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    model: Option<String>,
    base_url: Option<String>,
    dpi: u32,
    quiet: bool,
) -> Result<()> {
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }
    for input in &inputs {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
    }

    let api_key = std::env::var("GROQ_API_KEY")
        .with_context(|| "GROQ_API_KEY is not set in the environment")?;

    let mut client = GroqVisionClient::new(api_key);
    if let Some(model) = model {
        client = client.with_model(model);
    }
    if let Some(base_url) = base_url {
        client = client.with_base_url(base_url);
    }

    let output = output.unwrap_or_else(|| PathBuf::from("extracted"));
    let work_dir = work_dir.unwrap_or_else(|| output.join("work"));
    let locator = FaceCropBridge::new(work_dir.join("faces"));

    if !quiet {
        println!("[*] Processing {} file(s)", inputs.len());
        println!("[*] Output: {}", output.display());
    }

    let config = PipelineConfig::new(inputs, output, work_dir, dpi);

    match run(&config, &client, &locator) {
        Ok(outcome) => {
            if !quiet {
                println!("[+] Resolved {} identities", outcome.identities.len());
                println!("[✓] Spreadsheet: {}", outcome.spreadsheet.display());
                println!("[✓] Records: {}", outcome.records.display());
            }
            Ok(())
        }
        Err(err) => {
            // User-input rejections get a distinct exit code so callers
            // can tell "fix your upload" apart from an internal failure.
            if let Some(rejection) = err.downcast_ref::<Rejection>() {
                eprintln!("[✗] Rejected: {rejection}");
                std::process::exit(2);
            }
            Err(err)
        }
    }
}

fn show_info(input: PathBuf) -> Result<()> {
    use docmatch::ingest::raster::page_count;

    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let pages = page_count(&input)
        .with_context(|| format!("Failed to read PDF: {}", input.display()))?;

    println!("PDF Information");
    println!("===============");
    println!("File: {}", input.display());
    println!("Pages: {pages}");

    Ok(())
}
