//! Resolution of task locations to manifest files.
//!
//! Locations arrive as `file:` URLs (or plain paths). A directory location
//! stands for its direct children with a supported extension.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A manifest file selected for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    /// Location recorded in the technology-specific model
    pub location: String,
    pub path: PathBuf,
}

/// One task location after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub location: String,
    pub is_directory: bool,
    pub files: Vec<ManifestFile>,
}

/// Strip the trailing `.` some callers append to location URLs.
pub fn normalize_location(location: &str) -> String {
    location.trim().strip_suffix('.').unwrap_or(location.trim()).to_string()
}

/// Filesystem path of a location.
pub fn location_path(location: &str) -> Result<PathBuf> {
    if let Some(rest) = location.strip_prefix("file:") {
        let path = match rest.strip_prefix("//") {
            Some(absolute) if absolute.starts_with('/') => absolute,
            Some(_) => return Err(AnalysisError::InvalidLocation(location.to_string())),
            None => rest,
        };
        if path.is_empty() {
            return Err(AnalysisError::InvalidLocation(location.to_string()));
        }
        return Ok(PathBuf::from(path));
    }

    if location.contains("://") {
        return Err(AnalysisError::UnsupportedLocation(location.to_string()));
    }
    if location.is_empty() {
        return Err(AnalysisError::InvalidLocation(location.to_string()));
    }
    Ok(PathBuf::from(location))
}

/// `file:` URL of a path.
pub fn file_location(path: &Path) -> String {
    format!("file:{}", path.display())
}

/// Resolve a normalized location to the manifest files it denotes.
///
/// Files with an unsupported extension resolve to nothing. Missing paths are
/// an error.
pub fn resolve_location(location: &str, config: &AnalysisConfig) -> Result<ResolvedLocation> {
    let path = location_path(location)?;
    let metadata = std::fs::metadata(&path).map_err(|source| AnalysisError::FileRead {
        path: path.clone(),
        source,
    })?;

    if metadata.is_dir() {
        let mut files = Vec::new();
        for entry in WalkDir::new(&path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() && has_supported_extension(entry.path(), config) {
                files.push(ManifestFile {
                    location: file_location(entry.path()),
                    path: entry.into_path(),
                });
            }
        }
        log::debug!("{} expands to {} manifest files", location, files.len());
        return Ok(ResolvedLocation {
            location: location.to_string(),
            is_directory: true,
            files,
        });
    }

    let files = if has_supported_extension(&path, config) {
        vec![ManifestFile {
            location: location.to_string(),
            path,
        }]
    } else {
        log::info!("Skipping {}: unsupported file extension", location);
        Vec::new()
    };
    Ok(ResolvedLocation {
        location: location.to_string(),
        is_directory: false,
        files,
    })
}

fn has_supported_extension(path: &Path, config: &AnalysisConfig) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| config.is_supported(e))
}
