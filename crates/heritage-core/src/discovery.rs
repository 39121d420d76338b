//! Source file discovery and loading
//!
//! Directories are walked with `walkdir`; files are kept when their path
//! relative to the walked root matches an include pattern and no exclude
//! pattern. Explicitly named files are always kept.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::FilesConfiguration;
use crate::document::{DocumentSet, SourceTree};
use crate::{HeritageError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|e| {
                HeritageError::config_error(format!("Invalid glob pattern '{pattern}': {e}"))
            })
        })
        .collect()
}

/// Path relative to `root`, with `/` separators, for pattern matching
fn match_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

fn matches_any(patterns: &[Pattern], path: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
}

/// Find the source files under `paths`, sorted and deduplicated
pub fn discover_files(paths: &[PathBuf], files: &FilesConfiguration) -> Result<Vec<PathBuf>> {
    let include = compile_patterns(&files.include)?;
    let exclude = compile_patterns(&files.exclude)?;
    let mut found = Vec::new();

    for root in paths {
        if root.is_file() {
            found.push(root.clone());
            continue;
        }
        if !root.is_dir() {
            return Err(HeritageError::io_error(
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "path does not exist"),
            ));
        }

        let walker = WalkDir::new(root).follow_links(false).into_iter();
        for entry in walker.filter_entry(|e| {
            e.depth() == 0 || !matches_any(&exclude, &match_path(e.path(), root))
        }) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = match_path(entry.path(), root);
            if matches_any(&include, &relative) && !matches_any(&exclude, &relative) {
                found.push(entry.into_path());
            }
        }
    }

    found.sort();
    found.dedup();
    debug!("Discovered {} source files", found.len());
    Ok(found)
}

/// Read and parse `files` in parallel
///
/// Unreadable files are logged and skipped.
pub fn load_documents(files: &[PathBuf]) -> DocumentSet {
    let documents: Vec<SourceTree> = files
        .par_iter()
        .filter_map(|path| match fs::read_to_string(path) {
            Ok(text) => Some(SourceTree::parse(path.clone(), &text)),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    info!("Loaded {} documents", documents.len());
    DocumentSet::new(documents)
}

/// Discover and load every source file under `paths`
pub fn discover_documents(paths: &[PathBuf], files: &FilesConfiguration) -> Result<DocumentSet> {
    let files = discover_files(paths, files)?;
    Ok(load_documents(&files))
}
