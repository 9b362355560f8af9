//! show command: fetch, extract and render the species gallery
//!
//! This is the one place that catches pipeline faults. Anything raised by
//! the fetch or extract stage replaces the section with the error message.

use crate::availability::AvailabilityChecker;
use crate::comments::{parse_comment_arg, CommentBoard, CommentPanel};
use crate::config::{ClientConfig, DEFAULT_PAGE, DEFAULT_SECTION};
use crate::error::Result as FetchResult;
use crate::extract::{extract_records, Record};
use crate::fetch::WikiClient;
use crate::render::{render_error, render_records, RenderTarget, Section};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;

#[derive(Args)]
pub struct ShowArgs {
    /// Wiki page holding the species table
    #[arg(long, default_value = DEFAULT_PAGE)]
    page: String,

    /// Section index of the page to fetch
    #[arg(long, default_value_t = DEFAULT_SECTION)]
    section: u32,

    /// Read the table markup from a local file instead of the page
    #[arg(long, value_name = "FILE")]
    wikitext: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "text", value_parser = ["text", "html", "json", "yaml"])]
    format: String,

    /// Image lookups in flight at once (1 = sequential)
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
    concurrency: u8,

    /// Add a comment for this run (can be used multiple times)
    #[arg(long = "comment", value_name = "NAME=TEXT", value_parser = parse_comment_arg)]
    comments: Vec<(String, String)>,

    /// Render the comment panel expanded
    #[arg(long)]
    open_comments: bool,
}

/// Where the table markup comes from
#[derive(Debug, Clone)]
pub enum Source {
    Page { title: String, section: u32 },
    Markup(String),
}

impl Source {
    fn describe(&self) -> String {
        match self {
            Source::Page { title, section } => format!("{}#{}", title, section),
            Source::Markup(_) => "local markup".to_string(),
        }
    }
}

/// Configuration for one gallery run
pub struct GalleryConfig {
    pub source: Source,
    pub concurrency: usize,
}

/// Full report for JSON/YAML output (compact)
#[derive(Debug, Serialize)]
pub struct GalleryReport<'a> {
    pub source: String,
    pub generated: String,
    #[serde(flatten)]
    pub section: &'a Section,
    pub comments_open: bool,
    pub comments: &'a CommentBoard,
}

/// Run the show command
pub async fn run_show(args: ShowArgs, client_config: &ClientConfig) -> Result<()> {
    let source = match &args.wikitext {
        Some(path) => {
            let markup = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            Source::Markup(markup)
        }
        None => Source::Page {
            title: args.page.clone(),
            section: args.section,
        },
    };

    let client = WikiClient::new(client_config).context("Failed to build API client")?;
    let checker = AvailabilityChecker::new(client.http().clone());
    let config = GalleryConfig {
        source,
        concurrency: args.concurrency as usize,
    };

    let mut section = Section::default();
    let loaded = run_gallery(&client, &checker, &config, &mut section).await;

    let mut panel = CommentPanel::default();
    if args.open_comments {
        panel.toggle();
    }
    let mut board = CommentBoard::default();
    for (name, comment) in &args.comments {
        if let Err(e) = board.submit(name, comment) {
            tracing::warn!(error = %e, "Comment rejected");
        }
    }

    let output = match args.format.as_str() {
        "html" => format!(
            "{}\n{}",
            section.to_html().into_string(),
            board.to_html(&panel).into_string()
        ),
        "json" | "yaml" => {
            let report = GalleryReport {
                source: config.source.describe(),
                generated: Utc::now().to_rfc3339(),
                section: &section,
                comments_open: panel.is_expanded(),
                comments: &board,
            };
            if args.format == "yaml" {
                serde_yaml::to_string(&report)?
            } else {
                serde_json::to_string(&report)?
            }
        }
        _ => format!("{}\n{}", section.to_text(), board.to_text(&panel)),
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    if !loaded {
        std::process::exit(1);
    }

    Ok(())
}

/// Load, extract and render into `target`.
///
/// Returns `false` when a fault was caught and the error message rendered.
pub async fn run_gallery<T>(
    client: &WikiClient,
    checker: &AvailabilityChecker,
    config: &GalleryConfig,
    target: &mut T,
) -> bool
where
    T: RenderTarget + ?Sized,
{
    match load_records(client, config).await {
        Ok(records) => {
            tracing::info!(records = records.len(), "Rendering species");
            render_records(target, checker, records).await;
            true
        }
        Err(e) => {
            tracing::error!(source = %config.source.describe(), error = %e, "Error initializing gallery");
            render_error(target);
            false
        }
    }
}

async fn load_records(client: &WikiClient, config: &GalleryConfig) -> FetchResult<Vec<Record>> {
    let markup = match &config.source {
        Source::Page { title, section } => client.fetch_page_section(title, *section).await?,
        Source::Markup(markup) => markup.clone(),
    };
    extract_records(client, &markup, config.concurrency).await
}
