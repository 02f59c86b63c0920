//! CLI command handlers, one per file.

mod download;
mod extract;
mod resolve;
mod serve;

pub use download::run_download;
pub use extract::run_extract;
pub use resolve::run_resolve;
pub use serve::run_serve;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use xmd_core::cascade::Cascade;
use xmd_core::config::XmdConfig;
use xmd_core::dispatch::Dispatcher;

/// Standard cascade over a curl-backed dispatcher.
pub(crate) fn build_cascade(cfg: &XmdConfig) -> Cascade {
    let dispatcher = Arc::new(Dispatcher::with_curl(&cfg.dispatch));
    Cascade::standard(dispatcher, cfg)
}

/// `--dir`, else config `download_dir`, else the current directory.
pub(crate) fn download_dir(cfg: &XmdConfig, dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir.or_else(|| cfg.download_dir.clone()) {
        Some(d) => Ok(d),
        None => Ok(std::env::current_dir()?),
    }
}
