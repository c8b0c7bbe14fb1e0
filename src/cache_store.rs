use log::{debug, warn};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::ExtractionError;
use crate::page_extractor::CleanedDocument;

/// Extension of the extraction-cache sidecar written beside the source.
pub const CACHE_EXTENSION: &str = "doccache";

/// Extension of the human-readable cleaned-text sidecar.
pub const TEXT_EXTENSION: &str = "txt";

/// How cache keys are derived from a source.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyMode {
    /// Key on the source path only. Cheap, but serves stale text when the
    /// file's content changes under the same path.
    #[default]
    SourcePath,
    /// Key on a digest of the source bytes, so content changes miss the
    /// cache. Falls back to path keying when the source cannot be read.
    ContentDigest,
}

/// Persists extracted text beside its source so repeated runs skip
/// extraction entirely
///
/// One sidecar file per source, durable across restarts. There is no
/// eviction, no TTL and no locking; concurrent writers to the same key race
/// and the last writer wins, which is acceptable for the intended
/// single-process, one-document-at-a-time use.
pub struct CacheStore {
    mode: CacheKeyMode,
}

impl CacheStore {
    pub fn new() -> Self {
        CacheStore {
            mode: CacheKeyMode::SourcePath,
        }
    }

    pub fn with_mode(mode: CacheKeyMode) -> Self {
        CacheStore { mode }
    }

    /// Sidecar path holding the cached extraction for `source`.
    pub fn cache_path(&self, source: &Path) -> PathBuf {
        match self.mode {
            CacheKeyMode::SourcePath => source.with_extension(CACHE_EXTENSION),
            CacheKeyMode::ContentDigest => match sha256_file(source) {
                Ok(digest) => {
                    source.with_extension(format!("{}.{}", &digest[..16], CACHE_EXTENSION))
                }
                Err(err) => {
                    debug!(
                        "Cannot digest {} ({err}), falling back to path keying",
                        source.display()
                    );
                    source.with_extension(CACHE_EXTENSION)
                }
            },
        }
    }

    /// Sidecar path of the human-readable cleaned-text copy.
    pub fn text_sidecar_path(source: &Path) -> PathBuf {
        source.with_extension(TEXT_EXTENSION)
    }

    /// Load the cached document for `source`, if a valid entry exists.
    /// Unreadable or unparsable entries are treated as absent.
    pub fn get(&self, source: &Path) -> Option<CleanedDocument> {
        let path = self.cache_path(source);
        let raw = fs::read_to_string(&path).ok()?;

        match serde_json::from_str::<CleanedDocument>(&raw) {
            Ok(document) => {
                debug!("Cache hit: {}", path.display());
                Some(document)
            }
            Err(err) => {
                warn!("Ignoring unparsable cache file {}: {err}", path.display());
                None
            }
        }
    }

    /// Persist `document` as the cache entry for `source`.
    pub fn put(&self, source: &Path, document: &CleanedDocument) -> Result<(), ExtractionError> {
        let path = self.cache_path(source);
        let payload =
            serde_json::to_string(document).map_err(|err| ExtractionError::CacheWrite {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;

        fs::write(&path, payload).map_err(|err| ExtractionError::CacheWrite {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

        debug!("Cached extraction at {}", path.display());
        Ok(())
    }

    /// Write the cleaned text verbatim as a debugging artifact. Never read
    /// back by the pipeline.
    pub fn write_text_sidecar(
        source: &Path,
        document: &CleanedDocument,
    ) -> Result<(), ExtractionError> {
        let path = Self::text_sidecar_path(source);
        fs::write(&path, document.as_str()).map_err(|err| ExtractionError::CacheWrite {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

        debug!("Wrote cleaned text sidecar at {}", path.display());
        Ok(())
    }
}

fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0_u8; 8192];

    loop {
        let count = file.read(&mut buf)?;
        if count == 0 {
            break;
        }
        hasher.update(&buf[..count]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
