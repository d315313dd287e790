use crate::metadata::VideoMetadata;
use crate::session::{ChatLog, ChatTurn, Speaker};

/// Render the metadata block shown after a video is loaded.
pub fn render_metadata(meta: &VideoMetadata) -> String {
    format!(
        "Title:    {}\nChannel:  {}\nLength:   {}\nUploaded: {}",
        meta.title, meta.channel, meta.length, meta.publish_date
    )
}

pub fn render_turn(turn: &ChatTurn) -> String {
    let label = match turn.speaker {
        Speaker::User => "You",
        Speaker::Assistant => "AI",
    };
    format!("{label}: {}", turn.text)
}

/// Render the full chat history, one turn per paragraph.
pub fn render_chat(log: &ChatLog) -> String {
    log.turns()
        .iter()
        .map(render_turn)
        .collect::<Vec<_>>()
        .join("\n\n")
}
