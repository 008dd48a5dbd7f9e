use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// A user-supplied audio origin, classified once and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    /// A YouTube video reference
    YouTube(String),
    /// A local audio/video file
    Local(PathBuf),
}

impl Source {
    /// Classify raw user input. Anything mentioning a known video-host
    /// domain is a YouTube reference; everything else is a local path.
    pub fn classify(input: &str) -> Self {
        if input.contains("youtube.com") || input.contains("youtu.be") {
            Source::YouTube(input.to_string())
        } else {
            Source::Local(PathBuf::from(input))
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Source::YouTube(_) => "youtube",
            Source::Local(_) => "local",
        }
    }
}

/// Extract the video identifier from a YouTube URL.
///
/// The `v=` query parameter takes priority; short links (`youtu.be/<id>`)
/// and path-style links (`/embed/<id>`, `/v/<id>`, `/watch/<id>`) fall back
/// to the first meaningful path segment.
pub fn video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    if let Some((_, id)) = parsed.query_pairs().find(|(k, _)| k == "v") {
        if !id.is_empty() {
            return Some(id.into_owned());
        }
    }

    let mut segments = parsed.path_segments()?;
    segments
        .find(|s| !s.is_empty() && !matches!(*s, "watch" | "embed" | "v" | "shorts"))
        .map(|id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_youtube() {
        assert!(matches!(
            Source::classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Source::YouTube(_)
        ));
        assert!(matches!(
            Source::classify("https://youtu.be/abc123"),
            Source::YouTube(_)
        ));
        assert!(matches!(
            Source::classify("http://m.youtube.com/watch?v=x"),
            Source::YouTube(_)
        ));
    }

    #[test]
    fn test_classify_local() {
        assert!(matches!(Source::classify("./clip.mp3"), Source::Local(_)));
        assert!(matches!(
            Source::classify("/home/user/talk.wav"),
            Source::Local(_)
        ));
        // Non-YouTube URLs are not special-cased
        assert!(matches!(
            Source::classify("https://example.com/a.mp3"),
            Source::Local(_)
        ));
    }

    #[test]
    fn test_video_id_from_query() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            video_id("https://youtube.com/watch?v=abc&t=42"),
            Some("abc".to_string())
        );
    }

    #[test]
    fn test_video_id_from_path() {
        assert_eq!(
            video_id("https://youtu.be/abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(
            video_id("https://youtu.be/abc123?si=xyz"),
            Some("abc123".to_string())
        );
        assert_eq!(
            video_id("https://www.youtube.com/embed/qqq"),
            Some("qqq".to_string())
        );
    }

    #[test]
    fn test_video_id_unparseable() {
        assert_eq!(video_id("not a url"), None);
        assert_eq!(video_id("https://www.youtube.com/"), None);
    }

    #[test]
    fn test_query_param_wins_over_path() {
        assert_eq!(
            video_id("https://www.youtube.com/watch/ignored?v=real"),
            Some("real".to_string())
        );
    }
}
