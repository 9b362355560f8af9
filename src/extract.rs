//! Species table extraction from wiki markup
//!
//! Rows follow the `{{Species table/row ...}}` template convention and
//! tables close with `{{Species table/end}}`. Fields are pulled out of each
//! row chunk by regex; rows missing a required field are skipped.

use crate::error::{FetchError, Result};
use crate::fetch::WikiClient;
use futures::{stream, StreamExt, TryStreamExt};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const TABLE_END: &str = "{{Species table/end}}";
pub const ROW_START: &str = "{{Species table/row";

/// Range text used when a row carries none
pub const RANGE_SENTINEL: &str = "Range information not available";

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|name=\[\[(.*?)\]\]").unwrap());
static BINOMIAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|binomial=(.*?)\n").unwrap());
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|image=(.*?)\n").unwrap());
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|range=([^|\n]+)").unwrap());

/// One table row before its image is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesRow {
    pub name: String,
    pub binomial: String,
    /// File name with any namespace prefix removed
    pub image_file: String,
    pub range: String,
}

impl SpeciesRow {
    pub fn into_record(self, image: String) -> Record {
        Record {
            name: self.name,
            binomial: self.binomial,
            image,
            range: self.range,
        }
    }
}

/// A species entry ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub binomial: String,
    /// Direct image URL, empty when the lookup found nothing
    pub image: String,
    pub range: String,
}

/// Row chunks in source order; the preamble before each table's first row is dropped
pub fn row_chunks(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(TABLE_END)
        .flat_map(|table| table.split(ROW_START).skip(1))
}

/// Parse every well-formed row without touching the network
pub fn parse_rows(raw: &str) -> Vec<SpeciesRow> {
    row_chunks(raw).filter_map(parse_row).collect()
}

/// Extract the fields of a single row chunk.
///
/// Returns `None` unless the name, binomial and image patterns all match.
/// A matched field may still be empty.
pub fn parse_row(chunk: &str) -> Option<SpeciesRow> {
    let name = capture(&NAME_RE, chunk).map(link_label)?;
    let binomial = capture(&BINOMIAL_RE, chunk)?;
    let image_file = capture(&IMAGE_RE, chunk).map(image_file_name)?;

    Some(SpeciesRow {
        name: name.to_string(),
        binomial: binomial.to_string(),
        image_file: image_file.to_string(),
        range: clean_range(capture(&RANGE_RE, chunk)),
    })
}

fn capture<'a>(re: &Regex, chunk: &'a str) -> Option<&'a str> {
    re.captures(chunk)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
}

/// `[[Target|Label]]` displays as `Label`
fn link_label(link: &str) -> &str {
    link.rsplit('|').next().unwrap_or(link).trim()
}

/// Strip a leading `File:` or `Image:` namespace from an image token
pub fn image_file_name(token: &str) -> &str {
    let token = token.trim();
    ["File:", "Image:"]
        .iter()
        .find_map(|prefix| token.strip_prefix(prefix))
        .unwrap_or(token)
        .trim()
}

/// Normalize a captured range value.
///
/// Blank or missing values become [`RANGE_SENTINEL`]; parenthesized text is
/// always removed.
pub fn clean_range(raw: Option<&str>) -> String {
    let range = match raw.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => RANGE_SENTINEL,
    };
    strip_parenthesized(range)
}

/// Remove every `( ... )` span, nested ones included.
///
/// Whitespace touching a removed span collapses to a single space; the rest
/// of the text is left alone. An unclosed `(` is kept along with the rest of
/// the text.
pub fn strip_parenthesized(text: &str) -> String {
    let mut kept = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut open_at = 0usize;
    // a span was just removed and no text has followed it yet
    let mut gap = false;

    for (i, c) in text.char_indices() {
        match c {
            '(' => {
                if depth == 0 {
                    open_at = i;
                }
                depth += 1;
            }
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    kept.truncate(kept.trim_end().len());
                    gap = true;
                }
            }
            _ if depth > 0 => {}
            c if gap && c.is_whitespace() => {}
            c => {
                if gap && !kept.is_empty() {
                    kept.push(' ');
                }
                gap = false;
                kept.push(c);
            }
        }
    }

    if depth > 0 {
        if gap && !kept.is_empty() {
            kept.push(' ');
        }
        kept.push_str(&text[open_at..]);
    }

    kept
}

/// Extract records and resolve each row's image URL.
///
/// With `concurrency == 1` lookups run strictly one after another. Larger
/// values allow that many lookups in flight; output keeps row order either
/// way. The first failed lookup aborts the whole batch.
pub async fn extract_records(client: &WikiClient, raw: &str, concurrency: usize) -> Result<Vec<Record>> {
    let rows = parse_rows(raw);
    tracing::info!(
        rows = rows.len(),
        chunks = row_chunks(raw).count(),
        "Resolving species images"
    );

    stream::iter(rows)
        .map(|row| async move {
            tracing::debug!(name = %row.name, file = %row.image_file, "Looking up image");
            let image = client.fetch_image_url(&row.image_file).await?;
            Ok::<_, FetchError>(row.into_record(image))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}
