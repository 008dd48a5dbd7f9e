use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sona",
    about = "Sona - Transcribe YouTube videos and local audio files using AssemblyAI",
    version,
    long_about = "A CLI tool that converts audio into text transcripts. Sources can be \
YouTube URLs (downloaded with yt-dlp) or local audio/video files (normalized with ffmpeg). \
Transcription is done by the AssemblyAI speech-to-text service."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe audio from a YouTube URL or local file
    Transcribe {
        /// YouTube URL or path to a local audio/video file
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Output file path (default: auto-generated in the output directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Speech model to use (slam-1, best, nano)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },

    /// List available speech models
    Models,
}
