//! CLI for the uecap-shell web UI host.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uecap_shell_core::config;

use commands::{run_download, run_filename, run_rewrite, run_serve, DownloadArgs, ServeArgs};

/// Top-level CLI for uecap-shell.
#[derive(Debug, Parser)]
#[command(name = "uecap-shell")]
#[command(about = "uecap-shell: host for the locally served capability parser web UI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show how a request URL would be rewritten to a bundled asset.
    Rewrite {
        /// Absolute request URL.
        url: String,
        /// Local host name (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the file name a download would be saved under.
    Filename {
        /// Download URL (http(s) or data:).
        url: String,
        /// Raw Content-Disposition header value.
        #[arg(long)]
        content_disposition: Option<String>,
        /// MIME type announced for the download.
        #[arg(long)]
        mime: Option<String>,
    },

    /// Save a download (remote URL or data: URL) and print where it went.
    Download {
        /// Download URL (http(s) or data:).
        url: String,
        /// Raw Content-Disposition header value.
        #[arg(long)]
        content_disposition: Option<String>,
        /// MIME type announced for the download.
        #[arg(long)]
        mime: Option<String>,
        /// Target directory (defaults to the configured downloads dir, then the current dir).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Serve the bundled web UI, forwarding backend routes.
    Serve {
        /// Address to bind (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,
        /// Port to bind; 0 picks a free one.
        #[arg(long)]
        port: Option<u16>,
        /// Directory mounted under /assets/.
        #[arg(long, value_name = "DIR")]
        assets: Option<PathBuf>,
        /// Backend base URL for requests not answered from assets.
        #[arg(long, value_name = "URL")]
        backend: Option<String>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Rewrite { url, host } => run_rewrite(&cfg, &url, host.as_deref())?,
            CliCommand::Filename {
                url,
                content_disposition,
                mime,
            } => run_filename(&cfg, &url, content_disposition.as_deref(), mime.as_deref()),
            CliCommand::Download {
                url,
                content_disposition,
                mime,
                dir,
            } => run_download(
                &cfg,
                DownloadArgs {
                    url,
                    content_disposition,
                    mime,
                    dir,
                },
            )?,
            CliCommand::Serve {
                host,
                port,
                assets,
                backend,
            } => run_serve(
                &cfg,
                ServeArgs {
                    host,
                    port,
                    assets,
                    backend,
                },
            )?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
