//! Forwarding requests the shell does not answer itself to the backend.

use anyhow::{Context, Result};
use std::str;
use std::time::Duration;

use crate::config::HttpConfig;

use super::http::{is_hop_by_hop, Request, Response};

/// Backend base URL (e.g. `http://127.0.0.1:9000`) plus transfer limits.
#[derive(Debug, Clone)]
pub struct Backend {
    base: String,
    http: HttpConfig,
}

impl Backend {
    pub fn new(base: impl Into<String>, http: HttpConfig) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { base, http }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute backend URL for an origin-form request target.
    pub fn url_for(&self, target: &str) -> String {
        if target.starts_with('/') {
            format!("{}{}", self.base, target)
        } else {
            format!("{}/{}", self.base, target)
        }
    }

    /// Sends `request` to the backend and returns its answer with every
    /// end-to-end header. Redirects are returned to the client, not followed.
    pub fn forward(&self, request: &Request, target: &str) -> Result<Response> {
        let url = self.url_for(target);
        let mut easy = curl::easy::Easy::new();
        easy.url(&url).context("invalid backend URL")?;
        easy.custom_request(&request.method)?;
        easy.connect_timeout(Duration::from_secs(self.http.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.http.timeout_secs))?;
        if request.method.eq_ignore_ascii_case("HEAD") {
            easy.nobody(true)?;
        }
        if !request.body.is_empty() {
            easy.post_fields_copy(&request.body)?;
            // post_fields_copy switches to POST; keep the client's verb.
            easy.custom_request(&request.method)?;
        }

        let mut list = curl::easy::List::new();
        for (name, value) in &request.headers {
            if name.eq_ignore_ascii_case("host") || name.eq_ignore_ascii_case("expect") || is_hop_by_hop(name) {
                continue;
            }
            list.append(&format!("{}: {}", name, value))?;
        }
        // Suppress curl's automatic "Expect: 100-continue" on large bodies.
        list.append("Expect:")?;
        easy.http_headers(list)?;

        let mut body = Vec::new();
        let mut headers: Vec<(String, String)> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(line) = str::from_utf8(data) {
                    let line = line.trim_end();
                    if line.starts_with("HTTP/") {
                        // A new status line (after 1xx) starts a fresh header block.
                        headers.clear();
                    } else if let Some((name, value)) = line.split_once(':') {
                        let name = name.trim();
                        if !is_hop_by_hop(name) {
                            headers.push((name.to_string(), value.trim().to_string()));
                        }
                    }
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer
                .perform()
                .with_context(|| format!("{} {} failed", request.method, url))?;
        }

        let status = easy.response_code().context("no response code")?;
        tracing::debug!(status, headers = headers.len(), "forwarded {} {}", request.method, url);
        Ok(Response {
            status: u16::try_from(status).unwrap_or(502),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_for_joins_target() {
        let b = Backend::new("http://127.0.0.1:9000/", HttpConfig::default());
        assert_eq!(b.base(), "http://127.0.0.1:9000");
        assert_eq!(b.url_for("/status"), "http://127.0.0.1:9000/status");
        assert_eq!(b.url_for("/csv/x?y=1"), "http://127.0.0.1:9000/csv/x?y=1");
    }
}
