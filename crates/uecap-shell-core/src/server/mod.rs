//! Local shell server.
//!
//! Serves the bundled web UI on `host:port`. Each request is first offered to
//! the [`Interceptor`]; anything it lets through is forwarded to the backend,
//! or answered with 502 when no backend is configured. HTTP framing
//! (keep-alive, chunked bodies) is left to tiny_http; each request is
//! handled on its own thread.

mod http;
mod proxy;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use url::Url;

use crate::assets::AssetLoader;
use crate::config::{HttpConfig, ShellConfig};
use crate::intercept::Interceptor;
use crate::rewrite::{url_host, Rewriter};

pub use http::{Request, Response};
pub use proxy::Backend;

/// Prefix the asset directory is mounted on.
pub const ASSETS_MOUNT: &str = "/assets/";

/// Everything needed to bind a [`ShellServer`].
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub host: String,
    /// 0 = pick a free port.
    pub port: u16,
    pub assets_dir: PathBuf,
    pub rewriter: Rewriter,
    pub backend: Option<String>,
    pub http: HttpConfig,
}

impl ServerOptions {
    pub fn from_config(cfg: &ShellConfig) -> Self {
        Self {
            host: cfg.host.clone(),
            port: cfg.port,
            assets_dir: cfg.assets_dir.clone(),
            rewriter: cfg.rewriter(),
            backend: cfg.backend.clone(),
            http: cfg.http(),
        }
    }
}

struct Shared {
    interceptor: Interceptor,
    backend: Option<Backend>,
    /// `host:port` used when a request carries no Host header.
    authority: String,
}

pub struct ShellServer {
    server: tiny_http::Server,
    addr: SocketAddr,
    shared: Arc<Shared>,
}

impl ShellServer {
    /// Binds the listener and wires the asset loader to the bound port.
    pub fn bind(opts: ServerOptions) -> Result<Self> {
        let bind_host = opts.host.trim_start_matches('[').trim_end_matches(']');
        let server = tiny_http::Server::http((bind_host, opts.port))
            .map_err(|e| anyhow::anyhow!("bind {}:{}: {}", opts.host, opts.port, e))?;
        let addr = server
            .server_addr()
            .to_ip()
            .context("shell server is not listening on TCP")?;
        let authority = authority(&opts.host, addr.port());

        let loader = AssetLoader::builder(authority.clone())
            .http_allowed(true)
            .path_handler(ASSETS_MOUNT, &opts.assets_dir)
            .build()?;
        let backend = opts.backend.map(|b| Backend::new(b, opts.http.clone()));
        tracing::info!(
            "shell server bound on {} (assets {}, backend {})",
            authority,
            opts.assets_dir.display(),
            backend.as_ref().map(Backend::base).unwrap_or("none")
        );

        Ok(Self {
            server,
            addr,
            shared: Arc::new(Shared {
                interceptor: Interceptor::new(opts.rewriter, loader),
                backend,
                authority,
            }),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL of the web UI, e.g. `http://localhost:41234/`.
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.shared.authority)
    }

    /// Answers requests until the server shuts down, one thread per request.
    pub fn serve(self) -> Result<()> {
        let Self { server, shared, .. } = self;
        for request in server.incoming_requests() {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                if let Err(e) = handle_request(&shared, request) {
                    tracing::warn!("request error: {:#}", e);
                }
            });
        }
        Ok(())
    }

    /// Runs [`serve`](Self::serve) on a background thread.
    pub fn spawn(self) -> thread::JoinHandle<Result<()>> {
        thread::spawn(move || self.serve())
    }
}

/// `host[:port]` as `Url` renders it: IPv6 in brackets, port 80 omitted.
fn authority(host: &str, port: u16) -> String {
    let host = url_host(host);
    if port == 80 {
        host
    } else {
        format!("{}:{}", host, port)
    }
}

fn handle_request(shared: &Shared, mut http_request: tiny_http::Request) -> Result<()> {
    let request = match Request::from_http(&mut http_request) {
        Ok(r) => r,
        Err(e) => {
            http_request.respond(Response::text(400, "bad request").into_http())?;
            return Err(e);
        }
    };
    let response = respond(shared, &request);
    tracing::debug!("{} {} -> {}", request.method, request.target, response.status);
    http_request.respond(response.into_http())?;
    Ok(())
}

fn respond(shared: &Shared, request: &Request) -> Response {
    let Some(url) = request_url(request, &shared.authority) else {
        return Response::text(400, "bad request target");
    };

    if request.method.eq_ignore_ascii_case("GET") || request.method.eq_ignore_ascii_case("HEAD") {
        if let Some(asset) = shared.interceptor.intercept(&url) {
            // tiny_http leaves the body out of HEAD answers.
            return Response {
                status: asset.status,
                headers: vec![("Content-Type".to_string(), asset.mime_type)],
                body: asset.body,
            };
        }
    }

    let Some(backend) = &shared.backend else {
        return Response::text(502, "no backend configured");
    };
    let target = match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    };
    match backend.forward(request, &target) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("backend error: {:#}", e);
            Response::text(502, "backend unavailable")
        }
    }
}

/// Absolute URL of the request, using the Host header when present.
fn request_url(request: &Request, default_authority: &str) -> Option<Url> {
    if !request.target.starts_with('/') {
        return Url::parse(&request.target).ok();
    }
    let authority = request.header("host").unwrap_or(default_authority);
    Url::parse(&format!("http://{}{}", authority, request.target)).ok()
}
