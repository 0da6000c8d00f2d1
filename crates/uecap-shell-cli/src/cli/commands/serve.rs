//! `uecap-shell serve` – run the local shell server until interrupted.

use anyhow::Result;
use std::path::PathBuf;
use uecap_shell_core::config::ShellConfig;
use uecap_shell_core::rewrite::Rewriter;
use uecap_shell_core::server::{ServerOptions, ShellServer};

/// Command-line overrides for the configured server settings.
#[derive(Debug, Default)]
pub struct ServeArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub assets: Option<PathBuf>,
    pub backend: Option<String>,
}

pub fn server_options(cfg: &ShellConfig, args: ServeArgs) -> ServerOptions {
    let mut opts = ServerOptions::from_config(cfg);
    if let Some(host) = args.host {
        opts.rewriter = Rewriter::with_whitelist(host.clone(), opts.rewriter.whitelist().iter().cloned());
        opts.host = host;
    }
    if let Some(port) = args.port {
        opts.port = port;
    }
    if let Some(assets) = args.assets {
        opts.assets_dir = assets;
    }
    if args.backend.is_some() {
        opts.backend = args.backend;
    }
    opts
}

pub fn run_serve(cfg: &ShellConfig, args: ServeArgs) -> Result<()> {
    let server = ShellServer::bind(server_options(cfg, args))?;
    println!("Serving web UI at {}", server.base_url());
    server.serve()
}
