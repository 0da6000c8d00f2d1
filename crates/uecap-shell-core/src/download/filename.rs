//! Naming downloaded files.
//!
//! Mirrors what a browser does when a page triggers a download: prefer the
//! Content-Disposition filename, then the last URL path segment, then a
//! generic name, and make sure the result has an extension matching the
//! MIME type.

use url::Url;

use super::disposition::parse_content_disposition_filename;
use super::sanitize::{sanitize_file_name, truncate_bytes, NAME_MAX};

/// Name used when neither the header nor the URL yields one.
pub const FALLBACK_NAME: &str = "downloadfile";

/// Longest name kept as-is before falling back to a random one.
pub const DEFAULT_MAX_FILE_NAME_LEN: usize = 32;

/// Extensions for common types where the MIME database lists several.
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("text/plain", "txt"),
    ("text/html", "html"),
    ("text/csv", "csv"),
    ("application/json", "json"),
    ("image/jpeg", "jpg"),
    ("application/octet-stream", "bin"),
];

/// Preferred file extension (without dot) for a MIME type, if known.
pub fn mime_extension(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type.split(';').next()?.trim().to_ascii_lowercase();
    if essence.is_empty() {
        return None;
    }
    if let Some((_, ext)) = PREFERRED_EXTENSIONS.iter().find(|(m, _)| *m == essence) {
        return Some(*ext);
    }
    mime_guess::get_mime_extensions_str(&essence)?.first().copied()
}

/// Last non-empty path segment of `url`, percent-decoded.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded = urlencoding::decode(segment).ok()?;
    if decoded == "." || decoded == ".." {
        return None;
    }
    Some(decoded.into_owned())
}

/// Guesses the name a download should be saved under.
///
/// When the chosen name has no extension one is added from `mime_type`:
/// the MIME database's, `txt` for other `text/*`, `bin` otherwise.
///
/// # Examples
///
/// - `guess_file_name("http://h/csv/combos.csv", None, Some("text/csv"))` → `"combos.csv"`
/// - `guess_file_name("http://h/export", None, Some("application/pdf"))` → `"export.pdf"`
/// - `guess_file_name("http://h/", None, None)` → `"downloadfile.bin"`
pub fn guess_file_name(url: &str, content_disposition: Option<&str>, mime_type: Option<&str>) -> String {
    let raw = content_disposition
        .and_then(parse_content_disposition_filename)
        .map(|name| base_name(&name).to_string())
        .filter(|name| !name.is_empty())
        .or_else(|| file_name_from_url(url))
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    let mut name = sanitize_file_name(&raw);
    if name.is_empty() {
        name = FALLBACK_NAME.to_string();
    }
    if name.contains('.') {
        return name;
    }
    let ext = match mime_type {
        Some(mime) => mime_extension(mime).unwrap_or(if mime.starts_with("text/") { "txt" } else { "bin" }),
        None => "bin",
    };
    // The extension must survive the length cap, so the stem gives way.
    let stem = truncate_bytes(&name, NAME_MAX - ext.len() - 1);
    format!("{stem}.{ext}")
}

/// [`guess_file_name`], replaced by a random UUID (plus MIME extension)
/// when the guess is longer than `max_len` characters.
pub fn download_file_name(
    url: &str,
    content_disposition: Option<&str>,
    mime_type: Option<&str>,
    max_len: usize,
) -> String {
    let guessed = guess_file_name(url, content_disposition, mime_type);
    if guessed.chars().count() <= max_len {
        return guessed;
    }
    let id = uuid::Uuid::new_v4();
    match mime_type.and_then(mime_extension) {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
