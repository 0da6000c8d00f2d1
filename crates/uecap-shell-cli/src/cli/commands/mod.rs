//! CLI command handlers, one file per command.

mod download;
mod filename;
mod rewrite;
mod serve;

pub use download::{run_download, DownloadArgs};
pub use filename::run_filename;
pub use rewrite::run_rewrite;
pub use serve::{run_serve, ServeArgs};
