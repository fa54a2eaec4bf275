//! Finding tile files in a dataset directory tree.
//!
//! Datasets keep one directory per 100 km square under `<root>/data`, named
//! after the square in any case (`data/sh`, `data/SH`). Each tile file in
//! it starts with the square letters and the tile's digits, e.g.
//! `sh65_OST50GRID_20190520.zip` for the 10 km tile `SH 65`.

use crate::{DataError, Result};
use osgrid::GridRef;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Resolve and check the `data` directory of a dataset root.
pub(crate) fn data_dir(root: &Path) -> Result<PathBuf> {
    let data = root.join("data");
    if !fs::metadata(&data)?.is_dir() {
        return Err(DataError::NotADirectory(data));
    }
    Ok(data)
}

/// Sorted entries of `dir` that pass `keep`.
fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or_default()
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Find the file holding the tile whose bottom left corner is `key`.
///
/// Only files with one of `extensions` are considered. When several match,
/// the first in name order wins.
pub(crate) fn find_tile_file(data: &Path, key: &GridRef, extensions: &[&str]) -> Result<PathBuf> {
    let square = key.square().to_string();
    let dir_pattern = Regex::new(&format!("(?i)^{}$", square))?;
    let file_pattern = Regex::new(&format!("(?i)^{}{}(?:\\D|$)", square, key.digits()))?;

    let dirs = sorted_entries(data, |p| p.is_dir() && dir_pattern.is_match(file_name(p)))?;
    for dir in dirs {
        let files = sorted_entries(&dir, |p| {
            p.is_file() && has_extension(p, extensions) && file_pattern.is_match(file_name(p))
        })?;
        if let Some(file) = files.into_iter().next() {
            trace!(%key, path = %file.display(), "found tile file");
            return Ok(file);
        }
    }

    Err(DataError::TileNotFound(*key))
}
