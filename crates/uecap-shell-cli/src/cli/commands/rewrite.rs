//! `uecap-shell rewrite <url>` – show the asset rewrite for a request URL.

use anyhow::{Context, Result};
use uecap_shell_core::config::ShellConfig;
use uecap_shell_core::rewrite::Rewriter;
use url::Url;

pub fn run_rewrite(cfg: &ShellConfig, url: &str, host: Option<&str>) -> Result<()> {
    let parsed = Url::parse(url).with_context(|| format!("invalid URL: {url}"))?;
    let rewriter = match host {
        Some(h) => Rewriter::with_whitelist(h, cfg.rewriter().whitelist().iter().cloned()),
        None => cfg.rewriter(),
    };
    match rewriter.rewrite(&parsed) {
        Some(rewritten) => println!("{rewritten}"),
        None => println!("pass-through: {parsed}"),
    }
    Ok(())
}
