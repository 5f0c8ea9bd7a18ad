//! Pre-rendered audio playback.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no asset at {0}")]
    NotFound(String),
    #[error("playback of {src} rejected: {reason}")]
    Rejected { src: String, reason: String },
}

/// A started playback. Dropping it does not stop it; call [`PlaybackHandle::stop`].
pub trait PlaybackHandle: Send + Sync {
    fn source(&self) -> &str;

    /// Pause and rewind to the start.
    fn stop(&mut self);

    fn is_finished(&self) -> bool;
}

/// Host audio output.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Construct and start playback of `src`.
    ///
    /// Resolves once playback has actually started. Any error means the
    /// candidate is unusable and the next one should be tried.
    async fn play(&self, src: &str) -> Result<Box<dyn PlaybackHandle>, PlaybackError>;
}

/// Serves asset URLs such as `/Audio/x.mp3` from a directory on disk.
///
/// A candidate "plays" when the file exists; the handle exposes the resolved
/// path for whatever actually drives the speakers.
#[derive(Debug, Clone)]
pub struct FsAssetPlayer {
    root: PathBuf,
}

impl FsAssetPlayer {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, src: &str) -> PathBuf {
        self.root.join(src.trim_start_matches('/'))
    }
}

#[async_trait]
impl AudioPlayer for FsAssetPlayer {
    async fn play(&self, src: &str) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        let path = self.resolve(src);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Box::new(FsPlayback {
                source: src.to_string(),
                path,
                stopped: false,
            })),
            Ok(_) => Err(PlaybackError::Rejected {
                src: src.to_string(),
                reason: "not a regular file".to_string(),
            }),
            Err(_) => Err(PlaybackError::NotFound(src.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct FsPlayback {
    source: String,
    path: PathBuf,
    stopped: bool,
}

impl FsPlayback {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlaybackHandle for FsPlayback {
    fn source(&self) -> &str {
        &self.source
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn is_finished(&self) -> bool {
        self.stopped
    }
}
