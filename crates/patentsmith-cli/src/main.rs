use anyhow::Result;
use clap::{Parser, Subcommand};
use patentsmith_application::OptimizationFocus;
use patentsmith_core::patent::{DocumentStatus, SortOrder};
use std::path::PathBuf;

mod commands;

use commands::records::ExportFormat;

#[derive(Parser)]
#[command(name = "patentsmith")]
#[command(about = "patentsmith - draft patent ideas and applications with an LLM", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store file to use instead of the configured one
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config.toml if none exists
    Init,

    /// Generate patent ideas concurrently
    Ideas {
        #[arg(short, long, default_value_t = 5)]
        count: usize,
        #[arg(short, long)]
        temperature: Option<f32>,
        #[arg(short, long)]
        workers: Option<usize>,
        /// Write the ideas as JSON (input for `batch`)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Draft one full patent application
    Generate {
        #[arg(long)]
        title: String,
        #[arg(short, long = "feature")]
        features: Vec<String>,
        #[arg(short, long)]
        temperature: Option<f32>,
    },

    /// Draft one patent per idea from an ideas JSON file
    Batch {
        #[arg(long)]
        ideas: PathBuf,
        #[arg(short, long)]
        temperature: Option<f32>,
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Optimize a stored patent or a text file
    Optimize {
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        id: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value_t = OptimizationFocus::Comprehensive)]
        focus: OptimizationFocus,
        #[arg(short, long)]
        temperature: Option<f32>,
        /// Store the result as a new optimized document (requires --id)
        #[arg(long, requires = "id")]
        save: bool,
    },

    /// List stored patents
    List {
        #[arg(long, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
    },

    /// Print one stored patent
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },

    /// Edit fields of a stored patent
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<DocumentStatus>,
        /// Replace the content with this file's text
        #[arg(long)]
        content_file: Option<PathBuf>,
    },

    /// Remove a stored patent
    Delete { id: String },

    /// Export all stored patents
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show store statistics
    Stats,

    /// List predefined providers and their models
    Providers,

    /// Check credentials and connectivity
    Ping,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("patentsmith={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let globals = commands::GlobalArgs {
        config: cli.config,
        data_file: cli.data_file,
    };

    match cli.command {
        Commands::Init => commands::setup::init(&globals)?,
        Commands::Providers => commands::setup::providers(&globals)?,
        Commands::Ping => commands::setup::ping(&globals).await?,
        Commands::Ideas {
            count,
            temperature,
            workers,
            out,
        } => commands::generation::ideas(&globals, count, temperature, workers, out).await?,
        Commands::Generate {
            title,
            features,
            temperature,
        } => commands::generation::generate(&globals, &title, &features, temperature).await?,
        Commands::Batch {
            ideas,
            temperature,
            workers,
        } => commands::generation::batch(&globals, &ideas, temperature, workers).await?,
        Commands::Optimize {
            id,
            file,
            focus,
            temperature,
            save,
        } => {
            let source = match (id, file) {
                (Some(id), _) => commands::generation::OptimizeSource::Stored(id),
                (None, Some(file)) => commands::generation::OptimizeSource::File(file),
                (None, None) => anyhow::bail!("either --id or --file is required"),
            };
            commands::generation::optimize(&globals, source, focus, temperature, save).await?
        }
        Commands::List { sort } => commands::records::list(&globals, sort).await?,
        Commands::Show { id, json } => commands::records::show(&globals, &id, json).await?,
        Commands::Update {
            id,
            title,
            status,
            content_file,
        } => commands::records::update(&globals, &id, title, status, content_file).await?,
        Commands::Delete { id } => commands::records::delete(&globals, &id).await?,
        Commands::Export { format, out } => commands::records::export(&globals, format, out).await?,
        Commands::Stats => commands::records::stats(&globals).await?,
    }

    Ok(())
}
