pub mod config;
pub mod metadata;
pub mod output;
pub mod retry;
pub mod session;
pub mod summarize;
pub mod transcript;
pub mod youtube;

use serde::Serialize;

/// A single captioned segment
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Caption transcript for a video
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Join all segment texts in order, separated by single spaces.
    pub fn flatten(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Extract a video identifier from a YouTube URL.
///
/// Short links take the last path segment (query stripped), watch URLs take
/// the `v` parameter, and anything else is passed through as an identifier.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.contains("youtu.be") {
        let (_, tail) = input.rsplit_once('/')?;
        let id = tail.split('?').next().unwrap_or_default();
        return (!id.is_empty()).then(|| id.to_string());
    }

    if input.contains("youtube.com") {
        let (_, rest) = input.split_once("v=")?;
        let id = rest.split('&').next().unwrap_or_default();
        return (!id.is_empty()).then(|| id.to_string());
    }

    Some(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url_with_query() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abcdef"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=30"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_without_v_param() {
        assert_eq!(extract_video_id("https://www.youtube.com/feed/subscriptions"), None);
    }

    #[test]
    fn test_bare_id_passthrough() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("   "), None);
    }

    #[test]
    fn test_short_url_trailing_slash() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ/"), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(extract_video_id("  dQw4w9WgXcQ  "), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_flatten_joins_with_spaces() {
        let t = Transcript {
            video_id: "abc123".to_string(),
            language: "en".to_string(),
            segments: vec![
                Segment {
                    text: "Hello".to_string(),
                    start: 0.0,
                    duration: 1.0,
                },
                Segment {
                    text: "world".to_string(),
                    start: 1.0,
                    duration: 1.0,
                },
            ],
        };
        assert_eq!(t.flatten(), "Hello world");
    }

    #[test]
    fn test_flatten_empty() {
        let t = Transcript {
            video_id: "abc123".to_string(),
            language: "en".to_string(),
            segments: vec![],
        };
        assert_eq!(t.flatten(), "");
    }
}
