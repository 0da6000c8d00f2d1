//! Downloads triggered by the web UI.
//!
//! The page either links to a server route (remote download) or builds a
//! `data:` URL in the browser (e.g. a CSV export). [`DownloadHandler`] picks
//! a file name, then hands remote URLs to a [`DownloadQueue`] and writes
//! decoded `data:` payloads through a [`FileSink`].

mod data_url;
mod disposition;
mod filename;
mod sanitize;
mod sink;

use std::path::{Path, PathBuf};

pub use data_url::DataUrl;
pub use disposition::parse_content_disposition_filename;
pub use filename::{
    download_file_name, file_name_from_url, guess_file_name, mime_extension, DEFAULT_MAX_FILE_NAME_LEN,
    FALLBACK_NAME,
};
pub use sanitize::sanitize_file_name;
pub use sink::{CurlQueue, DirSink, DownloadQueue, DownloadRequest, FileSink, TEMP_SUFFIX};

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("not a data: URL")]
    NotDataUrl,
    #[error("data: URL has no payload")]
    MissingPayload,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid download file name: {0:?}")]
    InvalidFileName(String),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    #[error("HTTP {0}")]
    Http(u32),
}

impl DownloadError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        DownloadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// What a handled download produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub file_name: String,
    /// User-facing notice, e.g. `Downloading combos.csv`.
    pub description: String,
    pub path: PathBuf,
}

/// Routes page-triggered downloads to a sink or a queue.
#[derive(Debug, Clone)]
pub struct DownloadHandler<S, Q> {
    sink: S,
    queue: Q,
    max_file_name_len: usize,
}

impl<S: FileSink, Q: DownloadQueue> DownloadHandler<S, Q> {
    pub fn new(sink: S, queue: Q) -> Self {
        Self {
            sink,
            queue,
            max_file_name_len: DEFAULT_MAX_FILE_NAME_LEN,
        }
    }

    pub fn with_max_file_name_len(mut self, len: usize) -> Self {
        self.max_file_name_len = len;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// Handles a download of `url` as announced by the page.
    pub fn handle(
        &self,
        url: &str,
        content_disposition: Option<&str>,
        mime_type: Option<&str>,
    ) -> Result<DownloadOutcome, DownloadError> {
        let data = if DataUrl::is_data_url(url) {
            Some(DataUrl::parse(url)?)
        } else {
            None
        };
        // data: URLs carry their own media type when the page announced none.
        let mime_type: Option<String> = mime_type
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
            .or_else(|| data.as_ref().map(|d| d.mime_type.clone()));

        let file_name =
            download_file_name(url, content_disposition, mime_type.as_deref(), self.max_file_name_len);
        let description = format!("Downloading {file_name}");

        let path = match data {
            Some(data) => {
                tracing::info!("{description}");
                self.sink.save(&file_name, &data.bytes)?
            }
            None => self.queue.enqueue(&DownloadRequest {
                url: url.to_string(),
                mime_type,
                title: file_name.clone(),
                description: description.clone(),
                file_name: file_name.clone(),
            })?,
        };

        Ok(DownloadOutcome {
            file_name,
            description,
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingQueue {
        requests: Mutex<Vec<DownloadRequest>>,
    }

    impl DownloadQueue for RecordingQueue {
        fn enqueue(&self, request: &DownloadRequest) -> Result<PathBuf, DownloadError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(PathBuf::from("/queued").join(&request.file_name))
        }
    }

    struct FailingQueue;

    impl DownloadQueue for FailingQueue {
        fn enqueue(&self, _request: &DownloadRequest) -> Result<PathBuf, DownloadError> {
            Err(DownloadError::Http(404))
        }
    }

    #[test]
    fn data_url_written_to_sink() {
        let dir = tempfile::tempdir().unwrap();
        let handler = DownloadHandler::new(DirSink::new(dir.path()), RecordingQueue::default());

        let out = handler
            .handle(
                "data:text/csv;base64,YSxiCjEsMgo=",
                Some("attachment; filename=\"combos.csv\""),
                Some("text/csv"),
            )
            .unwrap();
        assert_eq!(out.file_name, "combos.csv");
        assert_eq!(out.description, "Downloading combos.csv");
        assert_eq!(std::fs::read(&out.path).unwrap(), b"a,b\n1,2\n");
        assert!(handler.queue().requests.lock().unwrap().is_empty());
    }

    #[test]
    fn data_url_without_announced_mime_uses_its_own() {
        let dir = tempfile::tempdir().unwrap();
        let handler = DownloadHandler::new(DirSink::new(dir.path()), RecordingQueue::default());
        let out = handler.handle("data:image/png;base64,iVBORw0KGgo=", None, Some("")).unwrap();
        assert_eq!(out.file_name, "downloadfile.png");
        assert_eq!(std::fs::read(&out.path).unwrap(), b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn remote_url_enqueued() {
        let dir = tempfile::tempdir().unwrap();
        let handler = DownloadHandler::new(DirSink::new(dir.path()), RecordingQueue::default());
        let out = handler
            .handle("http://localhost:8080/store/getOutput/abc", None, Some("application/json"))
            .unwrap();
        assert_eq!(out.file_name, "abc.json");
        assert_eq!(out.path, PathBuf::from("/queued/abc.json"));

        let requests = handler.queue().requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://localhost:8080/store/getOutput/abc");
        assert_eq!(requests[0].mime_type.as_deref(), Some("application/json"));
        assert_eq!(requests[0].title, "abc.json");
        assert_eq!(requests[0].description, "Downloading abc.json");
    }

    #[test]
    fn long_name_gets_random_replacement() {
        let dir = tempfile::tempdir().unwrap();
        let handler =
            DownloadHandler::new(DirSink::new(dir.path()), RecordingQueue::default()).with_max_file_name_len(8);
        let out = handler.handle("http://localhost/store/abcdefghij.csv", None, Some("text/csv")).unwrap();
        assert!(out.file_name.ends_with(".csv"));
        assert_ne!(out.file_name, "abcdefghij.csv");
    }

    #[test]
    fn errors_propagate() {
        let dir = tempfile::tempdir().unwrap();
        let handler = DownloadHandler::new(DirSink::new(dir.path()), FailingQueue);
        assert!(matches!(
            handler.handle("http://localhost/x.bin", None, None),
            Err(DownloadError::Http(404))
        ));
        assert!(matches!(
            handler.handle("data:;base64,***", None, None),
            Err(DownloadError::Base64(_))
        ));
    }
}
