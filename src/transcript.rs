use log::debug;
use thiserror::Error;

use crate::youtube::{self, CaptionTrack, USER_AGENT};
use crate::{Segment, Transcript};

/// Why a transcript could not be produced. Variants carry the user-facing
/// diagnostic; the caller decides how to present it.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("this video has no captions in any language")]
    NoCaptions,
    #[error("the video is not playable: {0}")]
    Unavailable(String),
    #[error("could not reach the caption service: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not read caption data: {0}")]
    Parse(String),
    #[error("{0}")]
    Provider(eyre::Report),
}

/// Fetch the transcript for a video, trying caption tracks in fallback
/// order: the default track, then "en", then "en-US"/"en-GB", then the
/// first manually created track of any language.
pub async fn fetch_transcript(client: &reqwest::Client, video_id: &str) -> Result<Transcript, TranscriptError> {
    let player = youtube::fetch_player_response(client, video_id)
        .await
        .map_err(TranscriptError::Provider)?;

    if let Some(status) = &player.playability_status {
        if !status.is_playable() {
            return Err(TranscriptError::Unavailable(status.describe()));
        }
    }

    let tracks = player.caption_tracks();
    if tracks.is_empty() {
        return Err(TranscriptError::NoCaptions);
    }

    let mut last_err = None;
    for track in candidate_tracks(tracks) {
        debug!("Trying caption track: lang={}", track.language_code);
        match fetch_track(client, track).await {
            Ok(segments) if !segments.is_empty() => {
                return Ok(Transcript {
                    video_id: video_id.to_string(),
                    language: track.language_code.clone(),
                    segments,
                });
            }
            Ok(_) => debug!("Caption track {} was empty", track.language_code),
            Err(e) => {
                debug!("Caption track {} failed: {e}", track.language_code);
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or(TranscriptError::NoCaptions))
}

/// Selection strategies, evaluated in order with first-success-wins
/// semantics. Each is pure over the listed tracks.
const STRATEGIES: [fn(&[CaptionTrack]) -> Option<&CaptionTrack>; 4] =
    [pick_default, pick_english, pick_regional_english, pick_manual];

fn pick_default(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks.first()
}

fn pick_english(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks.iter().find(|t| t.language_code == "en")
}

fn pick_regional_english(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| matches!(t.language_code.as_str(), "en-US" | "en-GB"))
}

fn pick_manual(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks.iter().find(|t| !t.is_auto_generated())
}

/// Apply every strategy in order, keeping the first hit of each distinct
/// track so a failing candidate is not retried.
fn candidate_tracks(tracks: &[CaptionTrack]) -> Vec<&CaptionTrack> {
    let mut candidates: Vec<&CaptionTrack> = Vec::new();
    for pick in STRATEGIES {
        if let Some(track) = pick(tracks) {
            if !candidates.iter().any(|c| c.base_url == track.base_url) {
                candidates.push(track);
            }
        }
    }
    candidates
}

async fn fetch_track(client: &reqwest::Client, track: &CaptionTrack) -> Result<Vec<Segment>, TranscriptError> {
    let xml = client
        .get(&track.base_url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_caption_xml(&xml)
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>, TranscriptError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut pending: Option<(f64, f64)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value);
                    match attr.key.as_ref() {
                        b"start" => start = value.parse::<f64>().ok(),
                        b"dur" => dur = value.parse::<f64>().ok(),
                        _ => {}
                    }
                }
                pending = start.zip(dur);
            }
            Ok(Event::Text(ref e)) => {
                if let Some((start, duration)) = pending.take() {
                    let raw = e.unescape().unwrap_or_default();
                    // YouTube double-escapes entities inside caption text
                    let text = html_escape::decode_html_entities(raw.as_ref()).to_string();
                    if !text.is_empty() {
                        segments.push(Segment { text, start, duration });
                    }
                }
            }
            Ok(Event::Empty(_)) => {
                // Self-closing <text .../> carries no content
                pending = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TranscriptError::Parse(e.to_string())),
            _ => {}
        }
    }

    Ok(segments)
}
