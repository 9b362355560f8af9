//! species-gallery CLI
//!
//! Pulls a species table out of a wiki page and renders it with
//! reachable images.

use anyhow::Result;
use clap::{Parser, Subcommand};
use species_gallery::availability::{run_probe, ProbeArgs};
use species_gallery::config::{ClientConfig, DEFAULT_API_URL, USER_AGENT};
use species_gallery::gallery::{run_show, ShowArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "species-gallery")]
#[command(author = "RoyalBit Inc.")]
#[command(version)]
#[command(about = "Species table gallery from MediaWiki pages")]
#[command(long_about = "Fetches a page section's wikitext, extracts species table rows, resolves their images and renders the result.\n\nCommands:\n  show    Render the species gallery\n  probe   Check whether an image URL is reachable")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// MediaWiki action API endpoint
    #[arg(long, global = true, env = "SPECIES_GALLERY_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Timeout per request in milliseconds
    #[arg(long, global = true, default_value = "30000")]
    timeout: u64,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, extract and render the species gallery
    Show(ShowArgs),
    /// Check an image URL, printing the URL that would be displayed
    Probe(ProbeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let client_config = ClientConfig {
        api_url: cli.api_url,
        timeout_ms: cli.timeout,
        user_agent: USER_AGENT.to_string(),
    };

    match cli.command {
        Commands::Show(args) => run_show(args, &client_config).await,
        Commands::Probe(args) => run_probe(args, &client_config).await,
    }
}

/// Logs go to stderr; stdout carries the rendered output. `RUST_LOG` wins over `-v`.
fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("species_gallery={},warn", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
