use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::download::DEFAULT_MAX_FILE_NAME_LEN;
use crate::rewrite::{Rewriter, DEFAULT_WHITELIST};

/// libcurl timeouts for downloads and backend pass-through (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Upper bound for a whole transfer.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
        }
    }
}

/// Global configuration loaded from `~/.config/uecap-shell/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Host the web UI is served on; requests to other hosts are never rewritten.
    pub host: String,
    /// Port for `serve` (0 = pick a free one).
    pub port: u16,
    /// Directory mounted under `/assets/` (the web UI lives in `web/`).
    pub assets_dir: PathBuf,
    /// Where downloads are saved; current directory when missing.
    #[serde(default)]
    pub downloads_dir: Option<PathBuf>,
    /// Path prefixes left to the backend; built-in list when missing.
    #[serde(default)]
    pub whitelist: Option<Vec<String>>,
    /// Longer download names are replaced by a random one.
    #[serde(default = "default_max_file_name_len")]
    pub max_file_name_len: usize,
    /// Base URL requests are forwarded to when not answered from assets.
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

fn default_max_file_name_len() -> usize {
    DEFAULT_MAX_FILE_NAME_LEN
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 0,
            assets_dir: PathBuf::from("assets"),
            downloads_dir: None,
            whitelist: None,
            max_file_name_len: DEFAULT_MAX_FILE_NAME_LEN,
            backend: None,
            http: None,
        }
    }
}

impl ShellConfig {
    /// Rewriter for the configured host and whitelist.
    pub fn rewriter(&self) -> Rewriter {
        match &self.whitelist {
            Some(list) => Rewriter::with_whitelist(self.host.clone(), list.iter().cloned()),
            None => Rewriter::with_whitelist(self.host.clone(), DEFAULT_WHITELIST.iter().copied()),
        }
    }

    pub fn http(&self) -> HttpConfig {
        self.http.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("uecap-shell")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ShellConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ShellConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ShellConfig = toml::from_str(&data)?;
    Ok(cfg)
}
