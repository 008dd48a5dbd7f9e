//! Transcript placement: filename sanitization, deterministic path
//! resolution, and the final write.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Label used when sanitization leaves nothing usable.
pub const FALLBACK_LABEL: &str = "transcript";

const MAX_LABEL_LEN: usize = 40;
const INVALID_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Default directory for auto-generated transcripts (`~/sona`).
pub fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("sona"))
        .unwrap_or_else(|| PathBuf::from("sona"))
}

/// Turn an arbitrary string into a safe filename fragment.
///
/// Filesystem-hostile characters, whitespace, and underscores become
/// hyphens; runs of hyphens collapse; the result is trimmed, lowercased,
/// and capped at 40 characters (after all transforms, so multi-byte titles
/// are never cut mid-transform). An empty result falls back to
/// `transcript`. The function is idempotent.
pub fn sanitize_label(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| {
            if INVALID_CHARS.contains(&c) || c.is_whitespace() || c == '_' {
                '-'
            } else {
                c
            }
        })
        .collect();

    let mut collapsed = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    let trimmed = collapsed.trim().trim_matches('-').to_lowercase();

    let truncated: String = trimmed.chars().take(MAX_LABEL_LEN).collect();
    let label = truncated.trim_end_matches('-');

    if label.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        label.to_string()
    }
}

/// Compute the destination path for a transcript: `<label>-<YYYYMMDD>.txt`
/// under `base_dir`, creating the directory if absent. Same source + same
/// day yields the same path; collisions overwrite.
pub fn resolve(label: &str, date: NaiveDate, base_dir: &Path) -> Result<PathBuf> {
    fs_err::create_dir_all(base_dir)
        .with_context(|| format!("failed to create output directory {}", base_dir.display()))?;

    let filename = format!("{}-{}.txt", sanitize_label(label), date.format("%Y%m%d"));
    Ok(base_dir.join(filename))
}

/// Write the transcript as UTF-8, overwriting any existing file.
pub fn write_transcript(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }

    fs_err::write(path, text)
        .with_context(|| format!("failed to write transcript to {}", path.display()))?;

    Ok(())
}
