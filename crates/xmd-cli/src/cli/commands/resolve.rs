//! `xmd resolve <id-or-url>` – print the resolved video URL.

use anyhow::{bail, Result};
use xmd_core::config::XmdConfig;
use xmd_core::media_id::MediaId;

use super::build_cascade;

pub async fn run_resolve(cfg: &XmdConfig, input: &str) -> Result<()> {
    let id = MediaId::from_id_or_url(input)?;
    let cascade = build_cascade(cfg);
    match cascade.resolve_id(&id).await {
        Some(found) => {
            println!("{}", found.url());
            tracing::info!("resolved {id} via {} (quality {})", found.source(), found.quality_score());
            Ok(())
        }
        None => bail!("no video found for {id}"),
    }
}
