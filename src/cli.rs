use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::core::{Coordinate, DreamAnalysis};
use crate::server;
use crate::service::DreamService;

#[derive(Parser)]
#[command(name = "dream-interpreter")]
#[command(about = "Score dreams on upper/downer and static/dynamic axes and draw their symbol")]
#[command(version)]
pub struct Args {
    /// Directory holding config.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Analyze a single dream and print the result
    Analyze {
        /// The dream text
        text: String,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the symbol for the dreams in a file, one dream per line
    Symbol {
        /// Text file with one dream per line, oldest first
        file: PathBuf,
        /// Where to write the PNG
        #[arg(short, long, default_value = "symbol.png")]
        output: PathBuf,
    },
    /// Print the effective configuration
    Config,
}

pub async fn handle_serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    server::serve(&config).await
}

pub fn handle_analyze(config: &Config, text: &str, json: bool) -> Result<()> {
    let service = DreamService::from_config(config);
    let analysis = service.scorer().score(text);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis);
    }
    Ok(())
}

pub fn handle_symbol(config: &Config, file: &Path, output: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let service = DreamService::from_config(config);
    let coords: Vec<Coordinate> = dream_lines(&content)
        .map(|line| service.scorer().score(line).coordinate())
        .collect();

    let symbol = service.renderer().render_coordinates(&coords);
    std::fs::write(output, &symbol.png)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Dreams: {}", coords.len());
    if let Some(avg) = Coordinate::mean(&coords) {
        println!("Average position: ({:.2}, {:.2})", avg.x, avg.y);
        println!("Dominant pattern: {}", avg.quadrant().label());
    }
    println!("Symbol written to {} ({:?})", output.display(), symbol.tier);
    Ok(())
}

pub fn handle_config(config: &Config) -> Result<()> {
    println!("# {}", config.config_file().display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn dream_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().map(str::trim).filter(|line| !line.is_empty())
}

fn print_analysis(analysis: &DreamAnalysis) {
    let c = analysis.coordinate();
    let tone = if c.y > 0.0 { "Upper" } else { "Downer" };
    let energy = if c.x > 0.0 { "Dynamic" } else { "Static" };

    println!("Coordinates: ({:.2}, {:.2})", c.x, c.y);
    println!("Emotional Tone: {} ({:.2})", tone, c.y);
    println!("Energy Level: {} ({:.2})", energy, c.x);
    println!("Confidence: {:.1}%", analysis.confidence * 100.0);
    if analysis.keywords.is_empty() {
        println!("Keywords: None identified");
    } else {
        println!("Keywords: {}", analysis.keywords.join(", "));
    }
}
