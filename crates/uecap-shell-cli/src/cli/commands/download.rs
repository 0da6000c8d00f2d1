//! `uecap-shell download <url>` – save a download like the web UI would.

use anyhow::Result;
use std::path::PathBuf;
use uecap_shell_core::config::ShellConfig;
use uecap_shell_core::download::{CurlQueue, DirSink, DownloadHandler};

#[derive(Debug)]
pub struct DownloadArgs {
    pub url: String,
    pub content_disposition: Option<String>,
    pub mime: Option<String>,
    pub dir: Option<PathBuf>,
}

pub fn run_download(cfg: &ShellConfig, args: DownloadArgs) -> Result<()> {
    let dir = match args.dir.or_else(|| cfg.downloads_dir.clone()) {
        Some(d) => d,
        None => std::env::current_dir()?,
    };
    let handler = DownloadHandler::new(DirSink::new(&dir), CurlQueue::new(DirSink::new(&dir), cfg.http()))
        .with_max_file_name_len(cfg.max_file_name_len);

    let outcome = handler.handle(
        &args.url,
        args.content_disposition.as_deref(),
        args.mime.as_deref(),
    )?;
    println!("{}", outcome.description);
    println!("{}", outcome.path.display());
    Ok(())
}
