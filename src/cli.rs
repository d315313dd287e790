use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "Summarize YouTube videos and ask follow-up questions",
    version,
)]
pub struct Cli {
    /// YouTube video URL or video ID (prompts interactively if omitted)
    pub url: Option<String>,

    /// Generation model for summaries and answers
    #[arg(short, long)]
    pub model: Option<String>,

    /// Also write the summary to a file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show fetch details
    #[arg(short, long)]
    pub verbose: bool,
}
