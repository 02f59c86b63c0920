//! CLI for xmd.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xmd_core::config;

use commands::{run_download, run_extract, run_resolve, run_serve};

/// Top-level CLI for xmd.
#[derive(Debug, Parser)]
#[command(name = "xmd")]
#[command(about = "xmd: resolve and download media attached to social-media posts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a post's video to a durable URL and print it.
    Resolve {
        /// Numeric post id or a post URL.
        input: String,
    },

    /// Resolve a post's video (or take a direct media URL) and save it.
    Download {
        /// Numeric post id, post URL, or direct http(s) media URL.
        input: String,
        /// Directory to save into (default: config `download_dir`, else the current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// File name; an extension is added when it has none.
        #[arg(long, value_name = "NAME")]
        filename: Option<String>,
    },

    /// Run the extraction engine over a saved page or API response.
    Extract {
        /// Path to the saved HTML/JSON/JS text.
        path: PathBuf,
        /// Post id used for log context.
        #[arg(long, default_value = "0", value_name = "ID")]
        id: String,
    },

    /// Answer JSON messages from stdin, one per line, with one JSON reply per stdout line.
    Serve,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve { input } => run_resolve(&cfg, &input).await?,
            CliCommand::Download {
                input,
                dir,
                filename,
            } => run_download(&cfg, &input, dir, filename).await?,
            CliCommand::Extract { path, id } => run_extract(&path, &id)?,
            CliCommand::Serve => run_serve(&cfg).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
