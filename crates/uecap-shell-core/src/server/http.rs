//! Owned request/response values passed between the tiny_http front, the
//! interceptor and the backend proxy.

use anyhow::{Context, Result};
use std::io::{Cursor, Read};

/// Upper bound on a request body (uploads of capability dumps).
const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

/// Headers that describe one connection, not the message; never relayed.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    // Recomputed from the body on each side.
    "content-length",
];

pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    /// Origin-form target (`/path?query`) or absolute URL as sent.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    /// Reads head and body of `request`. Chunked bodies arrive decoded.
    pub fn from_http(request: &mut tiny_http::Request) -> Result<Self> {
        let headers = request
            .headers()
            .iter()
            .map(|h| (h.field.to_string(), h.value.to_string()))
            .collect();
        let method = request.method().to_string();
        let target = request.url().to_string();

        let mut body = Vec::new();
        request
            .as_reader()
            .take(MAX_BODY_BYTES + 1)
            .read_to_end(&mut body)
            .context("read request body")?;
        if body.len() as u64 > MAX_BODY_BYTES {
            anyhow::bail!("request body larger than {} bytes", MAX_BODY_BYTES);
        }

        Ok(Self {
            method,
            target,
            headers,
            body,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![(
                "Content-Type".to_string(),
                "text/plain; charset=utf-8".to_string(),
            )],
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// tiny_http response carrying status, headers and body. Headers that
    /// are not valid ASCII are dropped.
    pub fn into_http(self) -> tiny_http::Response<Cursor<Vec<u8>>> {
        let mut out =
            tiny_http::Response::from_data(self.body).with_status_code(tiny_http::StatusCode(self.status));
        for (name, value) in &self.headers {
            if is_hop_by_hop(name) {
                continue;
            }
            match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => out.add_header(header),
                Err(()) => tracing::debug!("dropping response header {:?}", name),
            }
        }
        out
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
