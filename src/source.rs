//! Input file handling: encoding resolution, whole-file reads and
//! geometry/attribute companion pairing.

use crate::constants::{ATTRIBUTE_EXTENSION, GEOMETRY_EXTENSION};
use crate::error::{DecodeError, Result};
use encoding_rs::Encoding;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Resolve an encoding label to a decoder.
///
/// Microsoft's code page 949 is not a WHATWG label, so its common names are
/// mapped to the EUC-KR decoder, which implements the same extended table.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "cp949" | "ms949" | "uhc" | "x-windows-949" => Ok(encoding_rs::EUC_KR),
        _ => Encoding::for_label(normalized.as_bytes()).ok_or_else(|| {
            DecodeError::UnknownEncoding {
                label: label.to_string(),
            }
        }),
    }
}

/// Read a whole file and decode it into lines.
///
/// The file is read in one scoped call before any scanning starts. Bytes
/// that are malformed under `encoding_label` make the read fail; nothing is
/// replaced or guessed.
pub fn read_lines(path: &Path, encoding_label: &str, max_bytes: Option<u64>) -> Result<Vec<String>> {
    let encoding = resolve_encoding(encoding_label)?;

    if !path.exists() {
        return Err(DecodeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    if let Some(limit) = max_bytes {
        let size = std::fs::metadata(path)
            .map_err(|e| DecodeError::io(path, e))?
            .len();
        if size > limit {
            return Err(DecodeError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                limit,
            });
        }
    }

    let bytes = std::fs::read(path).map_err(|e| DecodeError::io(path, e))?;
    // Only this encoding's own BOM is stripped; a foreign BOM never switches encodings
    let (text, had_errors) = encoding.decode_with_bom_removal(&bytes);
    if had_errors {
        return Err(DecodeError::Undecodable {
            path: path.to_path_buf(),
            encoding: encoding.name().to_string(),
        });
    }

    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    debug!(
        "Read {} lines ({} bytes) from {} as {}",
        lines.len(),
        bytes.len(),
        path.display(),
        encoding.name()
    );

    Ok(lines)
}

/// A geometry file and its attribute companion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionPair {
    pub geometry: PathBuf,
    pub attributes: PathBuf,
}

impl CompanionPair {
    pub fn new(geometry: impl Into<PathBuf>, attributes: impl Into<PathBuf>) -> Self {
        Self {
            geometry: geometry.into(),
            attributes: attributes.into(),
        }
    }

    /// Pair a geometry file with the attribute file of the same stem
    pub fn from_geometry_path(geometry: &Path) -> Result<Self> {
        if !geometry.exists() {
            return Err(DecodeError::FileNotFound {
                path: geometry.to_path_buf(),
            });
        }

        let candidates = [
            geometry.with_extension(ATTRIBUTE_EXTENSION),
            geometry.with_extension(ATTRIBUTE_EXTENSION.to_ascii_uppercase()),
        ];

        candidates
            .iter()
            .find(|candidate| candidate.exists())
            .map(|attributes| Self::new(geometry, attributes))
            .ok_or_else(|| DecodeError::FileNotFound {
                path: candidates[0].clone(),
            })
    }

    /// File stem of the geometry file, used to name the pair
    pub fn name(&self) -> String {
        self.geometry
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.geometry.display().to_string())
    }
}

/// Pairs found under a directory, plus geometry files without a companion
#[derive(Debug, Default)]
pub struct Discovery {
    pub pairs: Vec<CompanionPair>,
    pub unpaired: Vec<PathBuf>,
}

/// Walk `root` and pair every `.ngi` file with its `.nda` companion
pub fn discover_pairs(root: &Path) -> Result<Discovery> {
    if !root.exists() {
        return Err(DecodeError::FileNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut discovery = Discovery::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| DecodeError::DirectoryTraversal {
            path: root.to_path_buf(),
            source: e,
        })?;

        if !entry.file_type().is_file() || !has_extension(entry.path(), GEOMETRY_EXTENSION) {
            continue;
        }

        match CompanionPair::from_geometry_path(entry.path()) {
            Ok(pair) => discovery.pairs.push(pair),
            Err(DecodeError::FileNotFound { path }) => {
                warn!(
                    "No attribute file for {} (expected {})",
                    entry.path().display(),
                    path.display()
                );
                discovery.unpaired.push(entry.path().to_path_buf());
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        "Discovered {} pairs and {} unpaired geometry files under {}",
        discovery.pairs.len(),
        discovery.unpaired.len(),
        root.display()
    );

    Ok(discovery)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
