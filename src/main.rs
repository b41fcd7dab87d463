//! CLI entry point for penna

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "penna")]
#[command(version)]
#[command(about = "A Markdown content pipeline for personal blogs", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build documents, feeds and sitemap into the public directory
    #[command(alias = "b")]
    Build,

    /// List site content
    List {
        /// Type of content to list (post, tag, link)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Clean the public directory
    Clean,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "penna=debug,info"
    } else {
        "penna=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build => {
            let site = penna::Site::new(&base_dir)?;
            tracing::info!("Building site...");
            site.build()?;
            println!("Built successfully!");
        }

        Commands::List { r#type } => {
            let site = penna::Site::new(&base_dir)?;
            penna::commands::list::run(&site, &r#type)?;
        }

        Commands::Clean => {
            let site = penna::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("penna version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
