use chrono::NaiveDate;
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;

use crate::retry::RetryPolicy;
use crate::youtube::{self, PlayerResponse};

pub const TITLE_UNAVAILABLE: &str = "Title not available";
pub const CHANNEL_UNAVAILABLE: &str = "Channel not available";
pub const LENGTH_UNAVAILABLE: &str = "Length not available";
pub const DATE_UNAVAILABLE: &str = "Not available";

/// Displayable video metadata. Fields degrade independently to sentinel
/// values, so a record is always renderable.
#[derive(Debug, Clone, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub channel: String,
    pub length: String,
    pub publish_date: String,
}

impl VideoMetadata {
    pub fn unavailable() -> Self {
        Self {
            title: TITLE_UNAVAILABLE.to_string(),
            channel: CHANNEL_UNAVAILABLE.to_string(),
            length: LENGTH_UNAVAILABLE.to_string(),
            publish_date: DATE_UNAVAILABLE.to_string(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.title == TITLE_UNAVAILABLE
            && self.channel == CHANNEL_UNAVAILABLE
            && self.length == LENGTH_UNAVAILABLE
            && self.publish_date == DATE_UNAVAILABLE
    }

    fn from_player(player: &PlayerResponse) -> Self {
        Self {
            title: player
                .title()
                .map(str::to_string)
                .unwrap_or_else(|| TITLE_UNAVAILABLE.to_string()),
            channel: player
                .author()
                .map(str::to_string)
                .unwrap_or_else(|| CHANNEL_UNAVAILABLE.to_string()),
            length: player
                .length_seconds()
                .map(format_length)
                .unwrap_or_else(|| LENGTH_UNAVAILABLE.to_string()),
            publish_date: player
                .publish_date()
                .and_then(format_publish_date)
                .unwrap_or_else(|| DATE_UNAVAILABLE.to_string()),
        }
    }
}

/// Fetch metadata for a video. Never fails outward: after the retry budget
/// is spent a fully-degraded record is returned and a warning logged.
pub async fn fetch_metadata(client: &reqwest::Client, video_id: &str, policy: &RetryPolicy) -> VideoMetadata {
    let player = policy.run(|| youtube::fetch_player_response(client, video_id)).await;

    match player {
        Ok(player) => {
            let mut meta = VideoMetadata::from_player(&player);
            if meta.title == TITLE_UNAVAILABLE {
                if let Some(title) = scrape_title(client, video_id).await {
                    meta.title = title;
                }
            }
            meta
        }
        Err(e) => {
            warn!("metadata fetch for {video_id} failed after retries: {e}");
            VideoMetadata::unavailable()
        }
    }
}

/// Title fallback: scrape the watch page's `<title>` tag.
async fn scrape_title(client: &reqwest::Client, video_id: &str) -> Option<String> {
    debug!("Falling back to watch-page title scrape for {video_id}");
    let html = youtube::fetch_watch_page(client, video_id).await.ok()?;
    title_from_html(&html)
}

pub fn title_from_html(html: &str) -> Option<String> {
    let re = Regex::new(r"<title>(.*?)</title>").ok()?;
    let raw = re.captures(html)?.get(1)?.as_str();
    let title = html_escape::decode_html_entities(raw)
        .replace(" - YouTube", "")
        .trim()
        .to_string();
    (!title.is_empty()).then_some(title)
}

pub fn format_length(seconds: u64) -> String {
    format!("{} min, {} sec", seconds / 60, seconds % 60)
}

/// Reformat the provider's publish date (`YYYY-MM-DD`, possibly with a time
/// suffix) as `DD/MM/YYYY`.
pub fn format_publish_date(raw: &str) -> Option<String> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    Some(date.format("%d/%m/%Y").to_string())
}
