use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// One entry of the static video catalog.
///
/// Playback metadata the backend does not interpret (urls, durations,
/// thumbnails, ...) is carried through `extra` untouched so the feed returns
/// descriptors exactly as authored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDescriptor {
    pub id: String,
    pub creator: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Default)]
struct CatalogFile {
    // A document without a `videos` key is an empty catalog, not an error.
    #[serde(default)]
    videos: Vec<VideoDescriptor>,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog unreadable at {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("catalog malformed at {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Loader for the static video catalog.
///
/// The file is re-read on every call so edits to the dataset show up without
/// a restart; there is deliberately no in-process cache.
#[derive(Debug, Clone)]
pub struct VideoCatalog {
    path: PathBuf,
}

impl VideoCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalog and return only enabled descriptors, in file order.
    pub async fn load_enabled(&self) -> Result<Vec<VideoDescriptor>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Unreadable {
                path: self.path.clone(),
                source,
            })?;

        let file: CatalogFile =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        let videos: Vec<VideoDescriptor> =
            file.videos.into_iter().filter(|v| v.enabled).collect();

        debug!("Loaded {} enabled videos from {:?}", videos.len(), self.path);
        Ok(videos)
    }
}
