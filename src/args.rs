use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-sift")]
#[command(about = "Crawls a site and sifts rendered page content for prompt relevance")]
#[command(version)]
pub struct Args {
    /// Seed URL to start crawling from
    pub url: String,

    /// Natural-language prompt; only content relevant to it is kept
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Link-following depth (0 fetches only the seed page)
    #[arg(short, long, default_value_t = 1)]
    pub depth: u32,

    /// Write results to this JSON file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
