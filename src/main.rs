//! CLI entry point for insights-rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "insights-rs")]
#[command(author = "Genesis Research")]
#[command(version)]
#[command(about = "A fast static site generator for research insight feeds", long_about = None)]
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
    /// Initialize a new insights site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, category)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only list posts in this category
        #[arg(long)]
        cat: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "insights_rs=debug,tower_http=debug,info"
    } else {
        "insights_rs=info"
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
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing insights site in {:?}", target_dir);
            insights_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized insights site in {:?}", target_dir);
        }

        Commands::Generate { watch } => {
            let site = insights_rs::Site::from_env(&base_dir)?;
            tracing::info!("Generating static files...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                insights_rs::commands::generate::watch(&site).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let site = insights_rs::Site::from_env(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            insights_rs::server::start(&site, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let site = insights_rs::Site::from_env(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type, cat } => {
            let site = insights_rs::Site::from_env(&base_dir)?;
            insights_rs::commands::list::run(&site, &r#type, cat.as_deref())?;
        }

        Commands::Version => {
            println!("insights-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
