//! Request interception: rewrite, then answer from bundled assets.

use url::Url;

use crate::assets::{AssetLoader, AssetResponse};
use crate::rewrite::Rewriter;

/// Rewriter and asset loader wired together, as used for both page and
/// service-worker requests.
#[derive(Debug, Clone)]
pub struct Interceptor {
    rewriter: Rewriter,
    loader: AssetLoader,
}

impl Interceptor {
    pub fn new(rewriter: Rewriter, loader: AssetLoader) -> Self {
        Self { rewriter, loader }
    }

    pub fn rewriter(&self) -> &Rewriter {
        &self.rewriter
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    /// Returns the asset response for `url`, or `None` to let the request
    /// through to the server unmodified.
    pub fn intercept(&self, url: &Url) -> Option<AssetResponse> {
        let rewritten = self.rewriter.rewrite(url)?;
        tracing::info!("url {} - {}", url, rewritten);
        self.loader.should_intercept(&rewritten)
    }
}
