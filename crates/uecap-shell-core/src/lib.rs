pub mod config;
pub mod logging;

pub mod assets;
pub mod chooser;
pub mod download;
pub mod intercept;
pub mod rewrite;
pub mod server;
