//! Blocking curl GET streamed into a `.part` file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use super::error::DownloadError;
use super::target::{persist, reserve, temp_path};
use crate::dispatch::random_user_agent;

/// Download `url` into `dir/name` (uniquified). The body lands in a `.part`
/// file reserved exclusively for this call and moved into place only after a
/// 2xx transfer completes; on any failure the temp file is removed.
pub fn fetch_to_dir(url: &str, dir: &Path, name: &str, connect_timeout: Duration) -> Result<PathBuf, DownloadError> {
    fs::create_dir_all(dir)?;
    let (reserved, file) = reserve(dir, name)?;
    let part = temp_path(&reserved);

    let saved = stream_into(url, file, connect_timeout)
        .and_then(|()| persist(&reserved, dir, name).map_err(DownloadError::from));
    match saved {
        Ok(final_path) => {
            debug!(url, path = %final_path.display(), "saved");
            Ok(final_path)
        }
        Err(e) => {
            let _ = fs::remove_file(&part);
            Err(e)
        }
    }
}

fn stream_into(url: &str, mut file: File, connect_timeout: Duration) -> Result<(), DownloadError> {
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(connect_timeout)?;
    easy.useragent(random_user_agent())?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                write_error = Some(e);
                // Short count aborts the transfer.
                Ok(0)
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_error {
        return Err(DownloadError::Io(e));
    }
    performed?;

    let status = easy.response_code()?;
    if !(200..300).contains(&status) {
        return Err(DownloadError::Http(status));
    }
    file.sync_all()?;
    Ok(())
}
