use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use eyre::{Result, bail};
use log::info;

mod cli;

use cli::Cli;
use ytsum::retry::RetryPolicy;
use ytsum::session::ChatLog;
use ytsum::{config, extract_video_id, metadata, output, summarize, transcript};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn build_after_help() -> String {
    let config_path = config::config_path();
    let log_path = log_dir().join("ytsum.log");

    format!(
        "AUTHENTICATION:\n  Set GEMINI_API_KEY, or put api_key in: {}\n\nLogs are written to: {}",
        config_path.display(),
        log_path.display()
    )
}

/// Resolve the generation-endpoint credential: environment first, config
/// file second. A missing credential is fatal before any input is read.
fn resolve_api_key(config: &config::Config) -> Result<String> {
    api_key_from(std::env::var("GEMINI_API_KEY").ok(), config)
}

fn api_key_from(env_key: Option<String>, config: &config::Config) -> Result<String> {
    if let Some(key) = env_key {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }
    if let Some(key) = &config.api_key {
        if !key.trim().is_empty() {
            return Ok(key.clone());
        }
    }
    bail!(
        "no Gemini API key configured\n\nSet the GEMINI_API_KEY environment variable, or add to {}:\n  api_key = \"...\"",
        config::config_path().display()
    )
}

fn prompt_line(lines: &mut impl Iterator<Item = io::Result<String>>, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = config::Config::load().unwrap_or_default();

    // CLI flag takes priority over config default
    let model = cli
        .model
        .clone()
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| summarize::DEFAULT_MODEL.to_string());

    // Refuse to start without a credential
    let api_key = resolve_api_key(&config)?;

    let client = reqwest::Client::new();
    let retry = RetryPolicy::default();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut pending_url = cli.url.clone();

    loop {
        let url = match pending_url.take() {
            Some(url) => url,
            None => match prompt_line(&mut lines, "Enter a YouTube URL: ")? {
                Some(line) => line,
                None => break,
            },
        };
        let url = url.trim().to_string();
        if url.is_empty() {
            eprintln!("Please enter a valid YouTube URL");
            continue;
        }

        let Some(video_id) = extract_video_id(&url) else {
            eprintln!("Invalid YouTube URL. Please check the URL and try again.");
            continue;
        };
        if cli.verbose {
            eprintln!("Video ID: {video_id}");
        }

        println!("Fetching video information...");
        let meta = metadata::fetch_metadata(&client, &video_id, &retry).await;
        if meta.is_unavailable() {
            eprintln!("Warning: video information could not be fetched; continuing without it.");
        }
        println!("\n{}\n", output::render_metadata(&meta));

        println!("Fetching transcript...");
        let transcript = match transcript::fetch_transcript(&client, &video_id).await {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Could not fetch video transcript: {e}");
                eprintln!(
                    "This might be because:\n  \
                     1. The video has no captions available\n  \
                     2. Captions are disabled for this video\n  \
                     3. The video might be age-restricted or private"
                );
                continue;
            }
        };
        if cli.verbose {
            eprintln!(
                "Transcript: {} segments, language {}",
                transcript.segments.len(),
                transcript.language
            );
        }

        println!("Generating summary...");
        let summary = match summarize::summarize(&client, &api_key, &model, &meta, &transcript.flatten()).await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error generating summary: {e}");
                continue;
            }
        };

        println!("\n--- Summary ---\n{summary}\n");
        if let Some(ref path) = cli.output {
            std::fs::write(path, &summary)?;
            if cli.verbose {
                eprintln!("Summary written to: {}", path.display());
            }
        }

        // Question loop against the fixed summary. An empty line returns to
        // the URL prompt and discards this video's session state.
        let mut chat_log = ChatLog::new();
        println!("Ask questions about the video (empty line for a new URL, Ctrl-D to quit).");
        loop {
            let Some(line) = prompt_line(&mut lines, "question> ")? else {
                return Ok(());
            };
            let question = line.trim();
            if question.is_empty() {
                break;
            }

            match summarize::answer(&client, &api_key, &model, question, &summary).await {
                Ok(response) => {
                    chat_log.push_user(question);
                    chat_log.push_assistant(response);
                    if let Some(turn) = chat_log.turns().last() {
                        println!("{}\n", output::render_turn(turn));
                    }
                }
                Err(e) => eprintln!("Error generating response: {e}"),
            }
        }
    }

    Ok(())
}
