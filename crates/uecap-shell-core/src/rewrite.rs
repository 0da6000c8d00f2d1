//! Request URL rewriting for the local web UI.
//!
//! Requests to the local host whose path is not reserved for the backend are
//! redirected to the bundled web assets under `/assets/web`. Directory
//! requests (trailing `/`) resolve to `index.html`.

use url::Url;

/// Prefix of the bundled web UI inside the asset tree.
pub const ASSET_PREFIX: &str = "/assets/web";

/// Document appended to directory requests.
pub const INDEX_DOCUMENT: &str = "index.html";

/// Path prefixes handled by the backend directly; never rewritten.
///
/// `/assets/web/` is listed first so a rewritten URL is never rewritten again.
pub const DEFAULT_WHITELIST: &[&str] = &[
    "/assets/web/",
    "/version",
    "/store/",
    "/parse/",
    "/csv/",
    "/status",
];

/// Rewrites request URLs aimed at the local host to bundled-asset paths.
#[derive(Debug, Clone)]
pub struct Rewriter {
    host: String,
    whitelist: Vec<String>,
}

impl Rewriter {
    /// Rewriter for `host` using [`DEFAULT_WHITELIST`].
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_whitelist(host, DEFAULT_WHITELIST.iter().map(|p| p.to_string()))
    }

    /// Rewriter for `host` with a custom set of pass-through prefixes.
    pub fn with_whitelist<I, S>(host: impl Into<String>, whitelist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let host: String = host.into();
        Self {
            host: url_host(&host),
            whitelist: whitelist.into_iter().map(Into::into).collect(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn whitelist(&self) -> &[String] {
        &self.whitelist
    }

    /// Returns the rewritten URL, or `None` when the request must pass through unchanged.
    ///
    /// Only the path is replaced; scheme, authority, query and fragment are kept.
    /// The whitelist is matched against the percent-decoded path, and the
    /// new path is encoded again segment by segment.
    pub fn rewrite(&self, url: &Url) -> Option<Url> {
        // Opaque URLs (mailto:, data:, ...) have no hierarchical path.
        let path = if url.cannot_be_a_base() {
            None
        } else {
            Some(decode_path(url.path()))
        };
        let new_path = self.rewrite_path(url.host_str(), path.as_deref())?;
        let mut rewritten = url.clone();
        rewritten.set_path(&encode_path(&new_path));
        Some(rewritten)
    }

    /// Decision on decoded URL parts. `path == None` means the URL has no path.
    pub fn rewrite_path(&self, host: Option<&str>, path: Option<&str>) -> Option<String> {
        if host != Some(self.host.as_str()) {
            return None;
        }
        let path = path?;
        if self.whitelist.iter().any(|prefix| path.starts_with(prefix.as_str())) {
            return None;
        }
        let index = if path.ends_with('/') { INDEX_DOCUMENT } else { "" };
        Some(format!("{ASSET_PREFIX}{path}{index}"))
    }
}

/// `host` the way `Url::host_str` reports it: lowercase, IPv6 in brackets.
pub(crate) fn url_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host
    }
}

fn decode_path(path: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(path.as_bytes())).into_owned()
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Rewrites `url` for `expected_host` with the default whitelist.
///
/// # Examples
///
/// - `http://localhost:8080/` → `http://localhost:8080/assets/web/index.html`
/// - `http://localhost:8080/status` → `None`
pub fn rewrite(url: &Url, expected_host: &str) -> Option<Url> {
    Rewriter::new(expected_host).rewrite(url)
}
