use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::{find_binary, Acquirer, AudioAsset};
use crate::source::Source;
use crate::Result;

/// Local-file acquirer: validates the input and normalizes it to MP3 with
/// ffmpeg when the service would not accept the container as-is.
pub struct LocalAcquirer;

impl LocalAcquirer {
    pub fn new() -> Self {
        Self
    }

    fn is_mp3(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("mp3"))
            .unwrap_or(false)
    }

    /// Convert any audio/video file to MP3 using ffmpeg.
    async fn convert_to_mp3(&self, input: &Path, target: &Path) -> Result<()> {
        let ffmpeg = find_binary("ffmpeg").map_err(|_| {
            anyhow::anyhow!(
                "ffmpeg not found. It is required for audio conversion. \
                 Install it from https://ffmpeg.org/download.html"
            )
        })?;

        tracing::info!("Converting audio to MP3 format...");

        let output = Command::new(ffmpeg)
            .args([
                "-i", &input.to_string_lossy(),
                "-vn",
                "-ar", "44100",
                "-ac", "2",
                "-b:a", "192k",
                "-f", "mp3",
                "-y",
                &target.to_string_lossy(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ffmpeg failed: {}", error.trim());
        }

        fs_err::metadata(target)
            .map_err(|_| anyhow::anyhow!("converted file not found"))?;

        tracing::debug!("Audio conversion completed");
        Ok(())
    }
}

impl Default for LocalAcquirer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Acquirer for LocalAcquirer {
    async fn acquire(&self, source: &Source, work_dir: &Path) -> Result<AudioAsset> {
        let Source::Local(path) = source else {
            anyhow::bail!("not a local source");
        };

        if !path.exists() {
            anyhow::bail!("audio file not found: {}", path.display());
        }

        let metadata = fs_err::metadata(path)?;
        if !metadata.is_file() {
            anyhow::bail!("path is not a file: {}", path.display());
        }
        if metadata.len() == 0 {
            anyhow::bail!("audio file is empty: {}", path.display());
        }

        // MP3 goes straight to upload; everything else is transcoded first
        if Self::is_mp3(path) {
            return Ok(AudioAsset {
                path: path.clone(),
                origin: source.clone(),
                is_temporary: false,
            });
        }

        let target = work_dir.join("converted.mp3");
        self.convert_to_mp3(path, &target).await?;

        Ok(AudioAsset {
            path: target,
            origin: source.clone(),
            is_temporary: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let acquirer = LocalAcquirer::new();
        let source = Source::Local(PathBuf::from("./does-not-exist.mp3"));
        let work = tempfile::tempdir().unwrap();

        let err = acquirer.acquire(&source, work.path()).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_empty_file_is_an_error() {
        let work = tempfile::tempdir().unwrap();
        let path = work.path().join("empty.mp3");
        fs_err::write(&path, b"").unwrap();

        let acquirer = LocalAcquirer::new();
        let source = Source::Local(path);

        let err = acquirer.acquire(&source, work.path()).await.unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[tokio::test]
    async fn test_mp3_passthrough_keeps_original_path() {
        let work = tempfile::tempdir().unwrap();
        let path = work.path().join("clip.mp3");
        fs_err::write(&path, b"fake mp3 bytes").unwrap();

        let acquirer = LocalAcquirer::new();
        let source = Source::Local(path.clone());

        let asset = acquirer.acquire(&source, work.path()).await.unwrap();
        assert_eq!(asset.path, path);
        assert!(!asset.is_temporary);
    }

    #[test]
    fn test_is_mp3() {
        assert!(LocalAcquirer::is_mp3(Path::new("a.mp3")));
        assert!(LocalAcquirer::is_mp3(Path::new("a.MP3")));
        assert!(!LocalAcquirer::is_mp3(Path::new("a.wav")));
        assert!(!LocalAcquirer::is_mp3(Path::new("noext")));
    }

    #[tokio::test]
    async fn test_rejects_youtube_sources() {
        let acquirer = LocalAcquirer::new();
        let source = Source::YouTube("https://youtu.be/x".into());
        let work = tempfile::tempdir().unwrap();

        let err = acquirer.acquire(&source, work.path()).await.unwrap_err();
        assert!(err.to_string().contains("not a local source"));
    }
}
