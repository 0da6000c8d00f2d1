//! Builder for an [`AssetLoader`].

use std::path::PathBuf;

use super::loader::{AssetLoader, PathHandler};
use super::AssetError;

/// Collects domain, scheme policy and path handlers for an [`AssetLoader`].
#[derive(Debug, Clone)]
pub struct AssetLoaderBuilder {
    domain: String,
    http_allowed: bool,
    handlers: Vec<(String, PathBuf)>,
}

impl AssetLoaderBuilder {
    pub(super) fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            http_allowed: false,
            handlers: Vec::new(),
        }
    }

    /// Also answer plain `http://` requests (HTTPS only by default).
    pub fn http_allowed(mut self, allowed: bool) -> Self {
        self.http_allowed = allowed;
        self
    }

    /// Serve files under `root` for request paths starting with `prefix`.
    /// Handlers are tried in registration order.
    pub fn path_handler(mut self, prefix: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.handlers.push((prefix.into(), root.into()));
        self
    }

    pub fn build(self) -> Result<AssetLoader, AssetError> {
        if self.domain.is_empty() {
            return Err(AssetError::EmptyDomain);
        }
        let mut handlers = Vec::with_capacity(self.handlers.len());
        for (prefix, root) in self.handlers {
            if !prefix.starts_with('/') || !prefix.ends_with('/') {
                return Err(AssetError::InvalidPrefix(prefix));
            }
            handlers.push(PathHandler { prefix, root });
        }
        Ok(AssetLoader {
            domain: self.domain,
            http_allowed: self.http_allowed,
            handlers,
        })
    }
}
