//! Bundled asset serving.
//!
//! An [`AssetLoader`] answers requests on one `host[:port]` domain by mapping
//! registered path prefixes (e.g. `/assets/`) to directories on disk. The
//! request interceptor hands it rewritten URLs; see [`crate::intercept`].

mod builder;
mod loader;

pub use builder::AssetLoaderBuilder;
pub use loader::AssetLoader;

/// Errors building an [`AssetLoader`].
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset loader domain must not be empty")]
    EmptyDomain,
    #[error("path handler prefix must start and end with '/': {0:?}")]
    InvalidPrefix(String),
}

/// Response produced for an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub mime_type: String,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn ok(mime_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            mime_type: mime_type.into(),
            body,
        }
    }

    /// Handled but absent: the caller must not fall back to the network.
    pub fn not_found() -> Self {
        Self {
            status: 404,
            mime_type: "text/plain".to_string(),
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
