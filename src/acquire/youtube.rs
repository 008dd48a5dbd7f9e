use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use super::{find_binary, Acquirer, AudioAsset, VideoMetadata};
use crate::source::Source;
use crate::Result;

/// Deadline for the audio download itself.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Deadline for the metadata-only lookup.
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// YouTube audio acquirer backed by yt-dlp
pub struct YoutubeAcquirer {
    yt_dlp: PathBuf,
}

impl YoutubeAcquirer {
    /// Locate yt-dlp, failing with an install hint if it is missing.
    pub fn locate() -> Result<Self> {
        let yt_dlp = find_binary("yt-dlp").map_err(|_| {
            anyhow::anyhow!(
                "yt-dlp not found. Please install it first:\n\
                 - macOS: brew install yt-dlp\n\
                 - Ubuntu/Debian: sudo apt install yt-dlp\n\
                 - Or download from: https://github.com/yt-dlp/yt-dlp"
            )
        })?;

        Ok(Self { yt_dlp })
    }

    /// Fetch title and duration for a video. Failures and timeouts are
    /// tolerated: acquisition of the audio itself is the only hard
    /// requirement, so this returns `None` rather than an error.
    pub async fn metadata(&self, url: &str) -> Option<VideoMetadata> {
        match timeout(METADATA_TIMEOUT, self.fetch_metadata(url)).await {
            Ok(Ok(metadata)) => Some(metadata),
            Ok(Err(err)) => {
                tracing::warn!("Could not get video info: {:#}", err);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "Video info lookup timed out after {}s",
                    METADATA_TIMEOUT.as_secs()
                );
                None
            }
        }
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata> {
        tracing::debug!("Fetching video info for: {}", url);

        let output = Command::new(&self.yt_dlp)
            .args([
                "--print", "title",
                "--print", "duration",
                "--no-playlist",
                "--no-download",
                url,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error.trim());
        }

        // Title and duration come back on separate lines
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut lines = stdout.lines();

        let title = lines
            .next()
            .map(|l| l.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow::anyhow!("unexpected output format from yt-dlp"))?;

        let duration_seconds = lines.next().and_then(|l| l.trim().parse::<u64>().ok());

        Ok(VideoMetadata {
            title,
            duration_seconds,
        })
    }
}

#[async_trait]
impl Acquirer for YoutubeAcquirer {
    async fn acquire(&self, source: &Source, work_dir: &Path) -> Result<AudioAsset> {
        let Source::YouTube(url) = source else {
            anyhow::bail!("not a YouTube source");
        };

        let target = work_dir.join("audio.mp3");

        tracing::info!("Downloading audio from YouTube...");

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_message("Downloading audio stream...");
        progress.enable_steady_tick(Duration::from_millis(120));

        let download = Command::new(&self.yt_dlp)
            .args([
                "--extract-audio",
                "--audio-format", "mp3",
                "--audio-quality", "0",
                "--no-playlist",
                "--output", &target.to_string_lossy(),
                url.as_str(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        let result = timeout(DOWNLOAD_TIMEOUT, download).await;
        progress.finish_and_clear();

        let output = result.map_err(|_| {
            anyhow::anyhow!(
                "YouTube download timed out after {}s",
                DOWNLOAD_TIMEOUT.as_secs()
            )
        })??;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error.trim());
        }

        let size = fs_err::metadata(&target)
            .map_err(|_| anyhow::anyhow!("no audio file found after download"))?
            .len();

        tracing::info!(
            "Audio download completed ({:.2} MB)",
            size as f64 / 1024.0 / 1024.0
        );

        Ok(AudioAsset {
            path: target,
            origin: source.clone(),
            is_temporary: true,
        })
    }
}

/// Format a duration in seconds as a short human-readable string,
/// e.g. `1342` → `22m 22s`.
pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    let remaining = seconds % 60;

    if minutes > 0 {
        if remaining > 0 {
            format!("{}m {}s", minutes, remaining)
        } else {
            format!("{}m", minutes)
        }
    } else {
        format!("{}s", remaining)
    }
}
