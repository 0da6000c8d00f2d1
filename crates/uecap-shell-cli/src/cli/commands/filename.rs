//! `uecap-shell filename <url>` – name a download would get.

use uecap_shell_core::config::ShellConfig;
use uecap_shell_core::download;

pub fn run_filename(cfg: &ShellConfig, url: &str, content_disposition: Option<&str>, mime: Option<&str>) {
    let name = download::download_file_name(url, content_disposition, mime, cfg.max_file_name_len);
    println!("{name}");
}
