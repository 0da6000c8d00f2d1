//! Matching request URLs to files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use super::builder::AssetLoaderBuilder;
use super::AssetResponse;

#[derive(Debug, Clone)]
pub(super) struct PathHandler {
    pub(super) prefix: String,
    pub(super) root: PathBuf,
}

/// Serves bundled files for URLs on a single `host[:port]` domain.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    pub(super) domain: String,
    pub(super) http_allowed: bool,
    pub(super) handlers: Vec<PathHandler>,
}

impl AssetLoader {
    /// Start building a loader for `domain` (`host` or `host:port`).
    pub fn builder(domain: impl Into<String>) -> AssetLoaderBuilder {
        AssetLoaderBuilder::new(domain)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Answers `url` from disk if it belongs to this loader.
    ///
    /// `None` means the loader does not handle the URL (wrong scheme, domain or
    /// prefix). A handled URL whose file cannot be read yields a 404 response.
    pub fn should_intercept(&self, url: &Url) -> Option<AssetResponse> {
        match url.scheme() {
            "https" => {}
            "http" if self.http_allowed => {}
            _ => return None,
        }
        if authority(url)? != self.domain {
            return None;
        }
        let path = url.path();
        let handler = self.handlers.iter().find(|h| path.starts_with(h.prefix.as_str()))?;
        let rest = &path[handler.prefix.len()..];

        let Some(file) = resolve(&handler.root, rest) else {
            tracing::warn!(path, "refusing asset path outside handler root");
            return Some(AssetResponse::not_found());
        };
        match fs::read(&file) {
            Ok(body) => {
                let mime = mime_guess::from_path(&file).first_or_octet_stream();
                Some(AssetResponse::ok(mime.essence_str(), body))
            }
            Err(e) => {
                tracing::debug!("asset {} not readable: {}", file.display(), e);
                Some(AssetResponse::not_found())
            }
        }
    }
}

/// `host` or `host:port` as it appears in the URL (default ports omitted).
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Joins the percent-encoded `rest` of a request path onto `root`.
/// Returns `None` for `.`/`..` segments or segments that decode to a separator.
fn resolve(root: &Path, rest: &str) -> Option<PathBuf> {
    let mut out = root.to_path_buf();
    for segment in rest.split('/').filter(|s| !s.is_empty()) {
        let decoded = urlencoding::decode(segment).ok()?;
        if decoded == "." || decoded == ".." || decoded.contains(['/', '\\', '\0']) {
            return None;
        }
        out.push(&*decoded);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_decoded_segments() {
        let root = Path::new("/srv/assets");
        assert_eq!(
            resolve(root, "web/my%20app/index.html"),
            Some(PathBuf::from("/srv/assets/web/my app/index.html"))
        );
        assert_eq!(resolve(root, "web//a.js"), Some(PathBuf::from("/srv/assets/web/a.js")));
    }

    #[test]
    fn resolve_rejects_traversal() {
        let root = Path::new("/srv/assets");
        assert_eq!(resolve(root, "web/../../etc/passwd"), None);
        assert_eq!(resolve(root, "web/%2e%2e/secret"), None);
        assert_eq!(resolve(root, "web/a%2Fb"), None);
    }

    #[test]
    fn authority_includes_explicit_port() {
        let u = Url::parse("http://localhost:8080/x").unwrap();
        assert_eq!(authority(&u).as_deref(), Some("localhost:8080"));
        let u = Url::parse("http://localhost/x").unwrap();
        assert_eq!(authority(&u).as_deref(), Some("localhost"));
    }
}
