//! Destination paths: `.part` temp files and collision-free final names.
//!
//! A save claims its name by creating `<name>.part` with `create_new`, so
//! concurrent saves of one name never share a temp file. The finished file
//! is linked into place without overwriting anything.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of a file still being written.
pub const TEMP_SUFFIX: &str = ".part";

/// Highest ` (n)` suffix tried before giving up.
const MAX_COLLISIONS: u32 = 9999;

/// `clip.mp4` → `clip.mp4.part`.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut os = final_path.as_os_str().to_owned();
    os.push(TEMP_SUFFIX);
    PathBuf::from(os)
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 => name.split_at(i),
        _ => (name, ""),
    }
}

/// `dir/name`, then `dir/stem (1).ext`, `dir/stem (2).ext`, ...
fn candidates<'a>(dir: &'a Path, name: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
    let (stem, ext) = split_extension(name);
    std::iter::once(dir.join(name)).chain(
        (1..=MAX_COLLISIONS).map(move |n| dir.join(format!("{stem} ({n}){ext}"))),
    )
}

fn no_free_name(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::AlreadyExists, format!("no free file name for {name}"))
}

/// `dir/name`, or `dir/stem (n).ext` with the smallest free `n`.
pub fn unique_target(dir: &Path, name: &str) -> PathBuf {
    candidates(dir, name)
        .find(|p| !p.exists())
        .unwrap_or_else(|| dir.join(name))
}

/// Claim the first candidate whose final file is absent and whose `.part`
/// this call creates. Returns the claimed final path and the open temp file.
pub fn reserve(dir: &Path, name: &str) -> io::Result<(PathBuf, File)> {
    for candidate in candidates(dir, name) {
        if candidate.exists() {
            continue;
        }
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp_path(&candidate))
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(no_free_name(name))
}

/// Move the finished temp file of `reserved` into place. If a file appeared
/// at `reserved` meanwhile, the next free candidate is used. Never
/// overwrites an existing file.
pub fn persist(reserved: &Path, dir: &Path, name: &str) -> io::Result<PathBuf> {
    let part = temp_path(reserved);
    let mut later = false;
    for candidate in candidates(dir, name) {
        later |= candidate == reserved;
        if !later {
            continue;
        }
        match fs::hard_link(&part, &candidate) {
            Ok(()) => {
                fs::remove_file(&part)?;
                return Ok(candidate);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            // No hard links on this filesystem.
            Err(_) if !candidate.exists() => {
                fs::rename(&part, &candidate)?;
                return Ok(candidate);
            }
            Err(e) => return Err(e),
        }
    }
    Err(no_free_name(name))
}
