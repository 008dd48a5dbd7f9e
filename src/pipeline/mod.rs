//! The transcription pipeline: classify a source, acquire audio into a
//! scoped temporary directory, transcribe it remotely, and place the
//! transcript deterministically. The temporary directory is removed on
//! every exit path.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tempfile::TempDir;

use crate::acquire::youtube::format_duration;
use crate::acquire::{Acquirer, AudioAsset, LocalAcquirer, YoutubeAcquirer};
use crate::assemblyai::TranscriptClient;
use crate::config::Config;
use crate::output;
use crate::source::{self, Source};

/// Per-invocation options, passed by value so concurrent runs within one
/// process never share hidden state.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Speech model requested from the service
    pub model: String,

    /// Explicit destination; `None` means auto-generate one
    pub output: Option<PathBuf>,
}

/// A finished transcription.
#[derive(Debug, Clone)]
pub struct TranscriptOutput {
    pub text: String,
    pub source_label: String,
    pub source: Source,
    pub destination: PathBuf,
}

/// Sequences acquisition → normalization → transcription → output.
pub struct Pipeline {
    config: Config,
    client: TranscriptClient,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self {
            config,
            client: TranscriptClient::new(api_key),
        })
    }

    /// Build a pipeline around a preconfigured client (tests point the
    /// client at a mock server).
    pub fn with_client(config: Config, client: TranscriptClient) -> Self {
        Self { config, client }
    }

    /// Run the whole pipeline once. No internal retries: a failed run is
    /// rolled back (temporary files removed) and must be re-invoked.
    pub async fn run(&self, input: &str, options: RunOptions) -> Result<TranscriptOutput> {
        let source = Source::classify(input);
        tracing::debug!("Classified {} as a {} source", input, source.kind());

        // Owns every temporary file for this run; dropped on all paths
        let work_dir = self.workspace()?;

        let (asset, label) = self.acquire(&source, &work_dir).await?;
        tracing::debug!(
            "Audio ready at {} (temporary: {})",
            asset.path.display(),
            asset.is_temporary
        );

        let text = self
            .client
            .transcribe(&asset.path, &options.model)
            .await
            .context("transcription failed")?;

        let destination = match options.output {
            Some(path) => path,
            None => output::resolve(
                &label,
                chrono::Local::now().date_naive(),
                &self.config.output_dir(),
            )
            .context("failed to resolve output path")?,
        };

        output::write_transcript(&destination, &text).context("failed to save transcript")?;
        tracing::info!("Transcript saved to {}", destination.display());

        Ok(TranscriptOutput {
            text,
            source_label: label,
            source,
            destination,
        })
    }

    /// Create the scoped working directory for one run.
    fn workspace(&self) -> Result<TempDir> {
        let builder_result = match &self.config.temp_dir {
            Some(root) => {
                fs_err::create_dir_all(root)?;
                tempfile::Builder::new().prefix("sona-").tempdir_in(root)
            }
            None => tempfile::Builder::new().prefix("sona-").tempdir(),
        };

        builder_result.context("failed to create temp directory")
    }

    async fn acquire(&self, source: &Source, work_dir: &TempDir) -> Result<(AudioAsset, String)> {
        match source {
            Source::YouTube(url) => {
                let acquirer = YoutubeAcquirer::locate().context("download failed")?;

                // Metadata is best-effort; the audio is the hard requirement
                let metadata = acquirer.metadata(url).await;
                if let Some(meta) = &metadata {
                    match meta.duration_seconds {
                        Some(secs) => {
                            tracing::info!("Video: {} ({})", meta.title, format_duration(secs))
                        }
                        None => tracing::info!("Video: {}", meta.title),
                    }
                }

                let asset = acquirer
                    .acquire(source, work_dir.path())
                    .await
                    .context("download failed")?;

                let label = metadata
                    .map(|m| m.title)
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| {
                        source::video_id(url)
                            .map(|id| format!("youtube-{}", id))
                            .unwrap_or_else(|| "youtube-video".to_string())
                    });

                Ok((asset, label))
            }
            Source::Local(path) => {
                let acquirer = LocalAcquirer::new();
                let asset = acquirer
                    .acquire(source, work_dir.path())
                    .await
                    .context("audio preparation failed")?;

                let label = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_else(|| output::FALLBACK_LABEL.to_string());

                Ok((asset, label))
            }
        }
    }
}
