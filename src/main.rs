use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use typomd::Config;

#[derive(Parser)]
#[command(name = "typomd", version)]
#[command(about = "Rewrite Markdown with fixed French typography")]
struct Cli {
    /// Input Markdown file (reads standard input when omitted or `-`)
    input: Option<PathBuf>,

    /// Output file (defaults to standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file overriding the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::compiled_default(),
    };

    // Read input
    let markdown = match cli.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Error reading {}", path.display()))?,
        _ => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Error reading standard input")?;
            content
        }
    };

    let rendered = typomd::render_with_config(&markdown, &config);

    // Write output
    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Error writing {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("Error writing standard output")?,
    }

    Ok(())
}
