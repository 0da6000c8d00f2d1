//! Where downloads end up: a file-save capability and a download queue.
//!
//! Both are traits so the host platform can plug in its own download manager
//! or storage picker; [`DirSink`] and [`CurlQueue`] are the desktop versions.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::HttpConfig;

use super::DownloadError;

/// Suffix of a file still being written.
pub const TEMP_SUFFIX: &str = ".part";

/// A request to fetch a remote resource into a named file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub mime_type: Option<String>,
    pub title: String,
    pub description: String,
    pub file_name: String,
}

/// Stores bytes produced in-process (decoded `data:` URLs).
pub trait FileSink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError>;
}

/// Fetches remote downloads.
pub trait DownloadQueue {
    fn enqueue(&self, request: &DownloadRequest) -> Result<PathBuf, DownloadError>;
}

/// Saves files into one directory, replacing any file of the same name.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path for `file_name`; creates the directory if needed.
    fn target(&self, file_name: &str) -> Result<PathBuf, DownloadError> {
        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\', '\0'])
        {
            return Err(DownloadError::InvalidFileName(file_name.to_string()));
        }
        fs::create_dir_all(&self.dir).map_err(|e| DownloadError::io(&self.dir, e))?;
        Ok(self.dir.join(file_name))
    }
}

impl FileSink for DirSink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
        let path = self.target(file_name)?;
        let tmp = temp_path(&path);
        fs::write(&tmp, bytes).map_err(|e| DownloadError::io(&tmp, e))?;
        finalize(&tmp, &path)?;
        tracing::debug!("saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// Downloads over HTTP(S) with libcurl, one blocking GET per request.
#[derive(Debug, Clone)]
pub struct CurlQueue {
    sink: DirSink,
    http: HttpConfig,
}

impl CurlQueue {
    pub fn new(sink: DirSink, http: HttpConfig) -> Self {
        Self { sink, http }
    }
}

impl DownloadQueue for CurlQueue {
    fn enqueue(&self, request: &DownloadRequest) -> Result<PathBuf, DownloadError> {
        let path = self.sink.target(&request.file_name)?;
        let tmp = temp_path(&path);
        let mut file = File::create(&tmp).map_err(|e| DownloadError::io(&tmp, e))?;

        tracing::info!(url = %request.url, file = %path.display(), "{}", request.description);
        match fetch_into(&request.url, &mut file, &tmp, &self.http) {
            Ok(written) => {
                file.sync_all().map_err(|e| DownloadError::io(&tmp, e))?;
                drop(file);
                finalize(&tmp, &path)?;
                tracing::info!("{} complete: {} bytes", request.title, written);
                Ok(path)
            }
            Err(e) => {
                drop(file);
                let _ = fs::remove_file(&tmp);
                Err(e)
            }
        }
    }
}

fn fetch_into(url: &str, file: &mut File, tmp: &Path, http: &HttpConfig) -> Result<u64, DownloadError> {
    let mut written: u64 = 0;
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(http.connect_timeout_secs))?;
    easy.timeout(Duration::from_secs(http.timeout_secs))?;
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        let performed = transfer.perform();
        drop(transfer);
        if let Some(e) = write_error {
            return Err(DownloadError::io(tmp, e));
        }
        performed?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(DownloadError::Http(code));
    }
    Ok(written)
}

/// `file.csv` → `file.csv.part`.
fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

fn finalize(tmp: &Path, path: &Path) -> Result<(), DownloadError> {
    fs::rename(tmp, path).map_err(|e| DownloadError::io(path, e))
}
