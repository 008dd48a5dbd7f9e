use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod local;
pub mod youtube;

pub use local::LocalAcquirer;
pub use youtube::YoutubeAcquirer;

use crate::source::Source;
use crate::Result;

/// A local audio file produced by an acquisition step, with provenance.
#[derive(Debug, Clone)]
pub struct AudioAsset {
    /// Path to the audio bytes on disk
    pub path: PathBuf,

    /// The source this asset was produced from
    pub origin: Source,

    /// Whether the file lives in the pipeline's temporary working directory
    pub is_temporary: bool,
}

/// Best-effort video metadata. Lookup failures yield `None`, never a
/// placeholder value masquerading as a real title.
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub title: String,
    pub duration_seconds: Option<u64>,
}

/// Strategy for turning a source into a local audio file. The pipeline
/// picks the implementation by matching on the classified [`Source`];
/// acquirers reject the other variant with an error.
#[async_trait]
pub trait Acquirer: Send + Sync {
    /// Produce an audio file for the source, using `work_dir` for any
    /// intermediate or downloaded files.
    async fn acquire(&self, source: &Source, work_dir: &Path) -> Result<AudioAsset>;
}

/// Locate an external tool: PATH first, then the user's `~/bin` directory.
pub fn find_binary(name: &str) -> Result<PathBuf> {
    if let Some(paths) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths) {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        let candidate = home.join("bin").join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    anyhow::bail!("{} not found", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_binary_missing() {
        let err = find_binary("definitely-not-a-real-tool-xyz").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_find_binary_in_path() {
        // `sh` exists on every unix PATH
        let path = find_binary("sh").unwrap();
        assert!(path.is_file());
    }
}
