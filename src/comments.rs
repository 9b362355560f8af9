//! Comment widgets: a show/hide panel and a local comment list
//!
//! Comments live only for the current run.

use maud::{html, Markup};
use serde::Serialize;
use std::fmt::Write;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommentError {
    #[error("Both name and comment are required.")]
    MissingField,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub name: String,
    pub comment: String,
}

/// Collapsible comment panel, hidden until toggled
#[derive(Debug, Default, Clone, Copy)]
pub struct CommentPanel {
    expanded: bool,
}

impl CommentPanel {
    /// Flip visibility and return the new state
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn button_label(&self) -> &'static str {
        if self.expanded {
            "Hide comments"
        } else {
            "Show comments"
        }
    }

    pub fn aria_expanded(&self) -> &'static str {
        if self.expanded {
            "true"
        } else {
            "false"
        }
    }
}

/// Comments submitted during this run
#[derive(Debug, Default, Serialize)]
pub struct CommentBoard {
    comments: Vec<Comment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl CommentBoard {
    /// Validate and append a comment.
    ///
    /// Both fields are trimmed; a blank one leaves the list unchanged and
    /// records the validation message.
    pub fn submit(&mut self, name: &str, comment: &str) -> Result<Comment, CommentError> {
        let name = name.trim();
        let comment = comment.trim();

        if name.is_empty() || comment.is_empty() {
            let err = CommentError::MissingField;
            self.error = Some(err.to_string());
            return Err(err);
        }

        let entry = Comment {
            name: name.to_string(),
            comment: comment.to_string(),
        };
        self.error = None;
        self.comments.push(entry.clone());
        Ok(entry)
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Validation message from the last failed submission
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn to_text(&self, panel: &CommentPanel) -> String {
        let mut out = String::new();
        if !panel.is_expanded() {
            let _ = writeln!(out, "[{}: {}]", panel.button_label(), self.comments.len());
            return out;
        }
        let _ = writeln!(out, "Comments ({}):", self.comments.len());
        for c in &self.comments {
            let _ = writeln!(out, "  {}: {}", c.name, c.comment);
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "  ! {}", error);
        }
        out
    }

    pub fn to_html(&self, panel: &CommentPanel) -> Markup {
        html! {
            button class="show-hide" aria-expanded=(panel.aria_expanded()) { (panel.button_label()) }
            div id="comment-wrapper" class="comment-wrapper" hidden[!panel.is_expanded()] {
                ul class="comment-container" {
                    @for c in &self.comments {
                        li { p { (c.name) } p { (c.comment) } }
                    }
                }
                @if let Some(error) = &self.error {
                    p role="alert" aria-live="assertive" { (error) }
                }
            }
        }
    }
}

/// Parse a `NAME=TEXT` command-line comment
pub fn parse_comment_arg(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, comment)| (name.to_string(), comment.to_string()))
        .ok_or_else(|| format!("expected NAME=TEXT, got `{}`", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_starts_hidden() {
        let panel = CommentPanel::default();
        assert!(!panel.is_expanded());
        assert_eq!(panel.button_label(), "Show comments");
        assert_eq!(panel.aria_expanded(), "false");
    }

    #[test]
    fn test_panel_toggle() {
        let mut panel = CommentPanel::default();
        assert!(panel.toggle());
        assert_eq!(panel.button_label(), "Hide comments");
        assert_eq!(panel.aria_expanded(), "true");
        assert!(!panel.toggle());
        assert_eq!(panel.button_label(), "Show comments");
    }

    #[test]
    fn test_submit_trims() {
        let mut board = CommentBoard::default();
        let comment = board.submit("  Ada ", " Nice bears!  ").unwrap();
        assert_eq!(comment.name, "Ada");
        assert_eq!(comment.comment, "Nice bears!");
        assert_eq!(board.comments(), &[comment]);
    }

    #[test]
    fn test_submit_requires_both_fields() {
        let mut board = CommentBoard::default();
        assert_eq!(board.submit("", "text"), Err(CommentError::MissingField));
        assert_eq!(board.submit("Ada", "   "), Err(CommentError::MissingField));
        assert!(board.comments().is_empty());
        assert_eq!(board.error(), Some("Both name and comment are required."));

        board.submit("Ada", "Hello").unwrap();
        assert_eq!(board.error(), None);
    }

    #[test]
    fn test_to_html_hidden_panel() {
        let mut board = CommentBoard::default();
        board.submit("Ada", "<script>").unwrap();
        let html = board.to_html(&CommentPanel::default()).into_string();
        assert!(html.contains("aria-expanded=\"false\">Show comments</button>"));
        assert!(html.contains("class=\"comment-wrapper\" hidden>"));
        assert!(html.contains("<li><p>Ada</p><p>&lt;script&gt;</p></li>"));
    }

    #[test]
    fn test_to_text() {
        let mut board = CommentBoard::default();
        board.submit("Ada", "Hello").unwrap();
        let mut panel = CommentPanel::default();
        assert_eq!(board.to_text(&panel), "[Show comments: 1]\n");
        panel.toggle();
        assert_eq!(board.to_text(&panel), "Comments (1):\n  Ada: Hello\n");
    }

    #[test]
    fn test_parse_comment_arg() {
        assert_eq!(
            parse_comment_arg("Ada=Nice = bears"),
            Ok(("Ada".to_string(), "Nice = bears".to_string()))
        );
        assert!(parse_comment_arg("no separator").is_err());
    }
}
