use eyre::{Result, bail};
use log::debug;

use crate::metadata::VideoMetadata;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const GENERATE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Build the initial summary prompt from the video's metadata and its
/// flattened transcript.
pub fn summary_prompt(meta: &VideoMetadata, transcript: &str) -> String {
    format!(
        "Analyze this YouTube video transcript and provide a detailed summary in the following format:\n\
         \n\
         Title: {title}\n\
         Channel: {channel}\n\
         Upload Date: {date}\n\
         Video Length: {length}\n\
         \n\
         Please determine the appropriate Category and Target Audience based on the content.\n\
         \n\
         Provide a comprehensive summary including:\n\
         1. Main topic and key discussion points\n\
         2. Key takeaways with timestamps\n\
         3. Detailed breakdown of the content\n\
         4. Final thoughts and recommendations\n\
         \n\
         Transcript: {transcript}",
        title = meta.title,
        channel = meta.channel,
        date = meta.publish_date,
        length = meta.length,
    )
}

/// Build a follow-up prompt that answers a question against the fixed
/// summary text as sole context.
pub fn chat_prompt(question: &str, summary: &str) -> String {
    format!(
        "Based on the following video summary, please answer this question: {question}\n\
         \n\
         Context: {summary}"
    )
}

/// Summarize a video via the generation endpoint. A single request, no
/// retries; failures surface to the caller.
pub async fn summarize(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    meta: &VideoMetadata,
    transcript: &str,
) -> Result<String> {
    generate(client, api_key, model, &summary_prompt(meta, transcript)).await
}

/// Answer a follow-up question against an existing summary.
pub async fn answer(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    question: &str,
    summary: &str,
) -> Result<String> {
    generate(client, api_key, model, &chat_prompt(question, summary)).await
}

async fn generate(client: &reqwest::Client, api_key: &str, model: &str, prompt: &str) -> Result<String> {
    debug!("Requesting generation from model {model} ({} prompt chars)", prompt.len());

    let url = format!("{GENERATE_URL}/{model}:generateContent");
    let body = serde_json::json!({
        "contents": [
            {
                "parts": [
                    { "text": prompt }
                ]
            }
        ]
    });

    let resp = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("generation endpoint returned {status}: {body}");
    }

    let json: serde_json::Value = resp.json().await?;
    extract_text(&json)
}

fn extract_text(json: &serde_json::Value) -> Result<String> {
    if let Some(parts) = json
        .pointer("/candidates/0/content/parts")
        .and_then(|p| p.as_array())
    {
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text")?.as_str())
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    bail!("generation endpoint returned an empty or unexpected response");
}
