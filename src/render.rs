//! Rendering species records into a display section

use crate::availability::AvailabilityChecker;
use crate::extract::Record;
use maud::{html, Markup};
use serde::Serialize;
use std::fmt::Write;

pub const EMPTY_MESSAGE: &str = "No bear data available at the moment. Please try again later.";
pub const ERROR_MESSAGE: &str = "Error loading bear data. Please try again later.";

/// A record together with the image URL chosen for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEntry {
    #[serde(flatten)]
    pub record: Record,
    pub display_image: String,
}

/// Where rendered output goes
pub trait RenderTarget {
    /// Drop everything rendered so far
    fn clear(&mut self);
    /// Replace the content with a single message
    fn show_message(&mut self, message: &str);
    fn append(&mut self, entry: DisplayEntry);
}

/// In-memory display section
#[derive(Debug, Default, Serialize)]
pub struct Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    entries: Vec<DisplayEntry>,
}

impl RenderTarget for Section {
    fn clear(&mut self) {
        self.message = None;
        self.entries.clear();
    }

    fn show_message(&mut self, message: &str) {
        self.entries.clear();
        self.message = Some(message.to_string());
    }

    fn append(&mut self, entry: DisplayEntry) {
        self.entries.push(entry);
    }
}

impl Section {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn entries(&self) -> &[DisplayEntry] {
        &self.entries
    }

    /// Plain text, one block per species
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(message) = &self.message {
            out.push_str(message);
            out.push('\n');
        }
        for entry in &self.entries {
            let record = &entry.record;
            let _ = writeln!(out, "{} ({})", record.name, record.binomial);
            let _ = writeln!(out, "  Image: {}", entry.display_image);
            let _ = writeln!(out, "  Range: {}", record.range);
        }
        out
    }

    /// HTML fragment for the `more_bears` section
    pub fn to_html(&self) -> Markup {
        html! {
            section class="more_bears" {
                @if let Some(message) = &self.message {
                    p { (message) }
                }
                @for entry in &self.entries {
                    @let record = &entry.record;
                    div {
                        h4 class="bear-name" { (record.name) " (" (record.binomial) ")" }
                        img src=(entry.display_image) alt=(record.name) style="width:200px; height:auto;";
                        p { strong { "Range:" } " " (record.range) }
                    }
                }
            }
        }
    }
}

/// Render records into `target`, probing each image in order
pub async fn render_records<T>(target: &mut T, checker: &AvailabilityChecker, records: Vec<Record>)
where
    T: RenderTarget + ?Sized,
{
    target.clear();

    if records.is_empty() {
        tracing::info!("No records to render");
        target.show_message(EMPTY_MESSAGE);
        return;
    }

    for record in records {
        let display_image = checker.resolve_display_url(&record.image).await;
        target.append(DisplayEntry {
            record,
            display_image,
        });
    }
}

/// Replace whatever the target shows with the generic error message
pub fn render_error<T: RenderTarget + ?Sized>(target: &mut T) {
    target.show_message(ERROR_MESSAGE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::PLACEHOLDER_IMAGE;
    use reqwest::Client;

    fn record(name: &str, image: &str) -> Record {
        Record {
            name: name.to_string(),
            binomial: "Ursus arctos".to_string(),
            image: image.to_string(),
            range: "Eurasia".to_string(),
        }
    }

    #[tokio::test]
    async fn test_render_empty() {
        let checker = AvailabilityChecker::new(Client::new());
        let mut section = Section::default();

        render_records(&mut section, &checker, Vec::new()).await;

        assert_eq!(section.message(), Some(EMPTY_MESSAGE));
        assert!(section.entries().is_empty());
        assert!(section.to_text().contains(EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn test_render_missing_image_uses_placeholder() {
        let checker = AvailabilityChecker::new(Client::new());
        let mut section = Section::default();

        render_records(&mut section, &checker, vec![record("Brown bear", "")]).await;

        assert_eq!(section.message(), None);
        assert_eq!(section.entries().len(), 1);
        assert_eq!(section.entries()[0].display_image, PLACEHOLDER_IMAGE);
    }

    #[tokio::test]
    async fn test_render_clears_previous_message() {
        let checker = AvailabilityChecker::new(Client::new());
        let mut section = Section::default();
        render_error(&mut section);

        render_records(&mut section, &checker, vec![record("Brown bear", "")]).await;

        assert_eq!(section.message(), None);
        assert_eq!(section.entries().len(), 1);
    }

    #[test]
    fn test_render_error_replaces_entries() {
        let mut section = Section::default();
        section.append(DisplayEntry {
            record: record("Brown bear", ""),
            display_image: PLACEHOLDER_IMAGE.to_string(),
        });

        render_error(&mut section);

        assert_eq!(section.message(), Some(ERROR_MESSAGE));
        assert!(section.entries().is_empty());
    }

    #[test]
    fn test_to_html_escapes() {
        let mut section = Section::default();
        section.append(DisplayEntry {
            record: record("<b>Bear</b>", ""),
            display_image: "http://x/a.jpg?w=1&h=2".to_string(),
        });

        let html = section.to_html().into_string();
        assert!(html.contains("<h4 class=\"bear-name\">&lt;b&gt;Bear&lt;/b&gt; (Ursus arctos)</h4>"));
        assert!(html.contains("src=\"http://x/a.jpg?w=1&amp;h=2\""));
        assert!(html.contains("<strong>Range:</strong> Eurasia"));
    }

    #[test]
    fn test_serialize_flattens_record() {
        let entry = DisplayEntry {
            record: record("Brown bear", "http://x/b.jpg"),
            display_image: "http://x/b.jpg".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "Brown bear");
        assert_eq!(json["display_image"], "http://x/b.jpg");
    }
}
