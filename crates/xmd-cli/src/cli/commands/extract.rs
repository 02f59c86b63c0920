//! `xmd extract <file>` – run the extraction engine over saved text.

use anyhow::{bail, Context, Result};
use std::path::Path;
use xmd_core::extract::{extract_best, PATTERN_BANK_VERSION};
use xmd_core::media_id::MediaId;

pub fn run_extract(path: &Path, id: &str) -> Result<()> {
    let id = MediaId::parse(id)?;
    let raw = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&raw);

    let Some(found) = extract_best(&text, &id) else {
        bail!(
            "no media url found in {} (pattern bank v{PATTERN_BANK_VERSION})",
            path.display()
        );
    };
    println!("{}", serde_json::to_string(&found)?);
    Ok(())
}
