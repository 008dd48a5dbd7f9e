//! Sona - a CLI tool for transcribing YouTube videos and local audio files
//!
//! This library drives an audio source through acquisition (yt-dlp / ffmpeg),
//! upload to AssemblyAI, asynchronous transcription (submit → poll), and
//! deterministic transcript placement on disk.

pub mod acquire;
pub mod assemblyai;
pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod source;

pub use assemblyai::{ClientError, JobStatus, TranscriptClient};
pub use config::Config;
pub use pipeline::{Pipeline, RunOptions, TranscriptOutput};
pub use source::Source;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;
