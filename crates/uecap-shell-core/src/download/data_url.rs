//! `data:` URL decoding for downloads generated in the page (e.g. exported CSV).

use base64::Engine as _;

use super::DownloadError;

const BASE64_MARKER: &str = "base64,";

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Media type without parameters; `text/plain` when omitted.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    pub fn is_data_url(s: &str) -> bool {
        s.starts_with("data:")
    }

    /// Decodes `data:[<mediatype>][;base64],<data>`.
    ///
    /// Base64 payloads start after the last `base64,` marker and may contain
    /// whitespace; other payloads are percent-decoded.
    pub fn parse(s: &str) -> Result<Self, DownloadError> {
        let rest = s.strip_prefix("data:").ok_or(DownloadError::NotDataUrl)?;
        let media = rest.split([';', ',']).next().unwrap_or("").trim();
        let mime_type = if media.is_empty() {
            "text/plain".to_string()
        } else {
            media.to_ascii_lowercase()
        };

        let bytes = if let Some(idx) = rest.rfind(BASE64_MARKER) {
            let payload: String = rest[idx + BASE64_MARKER.len()..]
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            base64::engine::general_purpose::STANDARD.decode(payload)?
        } else {
            let (_, payload) = rest.split_once(',').ok_or(DownloadError::MissingPayload)?;
            urlencoding::decode_binary(payload.as_bytes()).into_owned()
        };

        Ok(Self { mime_type, bytes })
    }
}
