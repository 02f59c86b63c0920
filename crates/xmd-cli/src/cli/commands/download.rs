//! `xmd download <input>` – resolve if needed, then save to disk.

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;
use xmd_core::config::XmdConfig;
use xmd_core::media::MediaKind;
use xmd_core::media_id::{id_from_page_path, MediaId};
use xmd_core::save::Saver;
use xmd_core::url_model::video_filename;

use super::{build_cascade, download_dir};

/// A direct media URL (not a post or player page) is saved as-is.
fn is_direct_media_url(input: &str) -> bool {
    input.starts_with("http") && !input.contains("/status") && id_from_page_path(input).is_none()
}

pub async fn run_download(
    cfg: &XmdConfig,
    input: &str,
    dir: Option<PathBuf>,
    filename: Option<String>,
) -> Result<()> {
    let saver = Saver::new(
        download_dir(cfg, dir)?,
        Duration::from_secs(cfg.dispatch.connect_timeout_secs),
    );

    let path = if is_direct_media_url(input) {
        saver.save(input, filename.as_deref(), None).await?
    } else {
        let id = MediaId::from_id_or_url(input)?;
        let Some(found) = build_cascade(cfg).resolve_id(&id).await else {
            bail!("no video found for {id}");
        };
        let name = filename.unwrap_or_else(|| video_filename(&id));
        saver
            .save(found.url(), Some(name.as_str()), Some(MediaKind::Video))
            .await?
    };

    println!("Saved {}", path.display());
    Ok(())
}
