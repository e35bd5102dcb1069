//! CLI argument parsing with clap.

use clap::Parser;

/// Generate hero images for site topics with a Gemini image model.
#[derive(Parser, Debug)]
#[command(name = "topic-images", version, about)]
pub struct Cli {
    /// TOML file of `[[topics]]` entries (built-in topics if omitted).
    #[arg(short, long)]
    pub topics: Option<String>,

    /// Only generate these topic ids (repeatable).
    #[arg(long = "only", value_name = "ID")]
    pub only: Vec<String>,

    /// Directory the `<id>.jpg` files are written to. Must exist.
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Model name or short alias.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Aspect ratio (e.g., 16:9, 1:1, 21:9).
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Image size: 1K, 2K, 4K.
    #[arg(short, long)]
    pub size: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}
