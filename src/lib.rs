//! species-gallery: species table extraction from MediaWiki pages
//!
//! Pipeline:
//! - fetch: section wikitext and image URLs from the action API
//! - extract: species table rows to records
//! - availability: HEAD probes with a placeholder fallback
//! - render: records into a display section

pub mod availability;
pub mod comments;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod gallery;
pub mod render;

pub use availability::{AvailabilityChecker, PLACEHOLDER_IMAGE};
pub use comments::{Comment, CommentBoard, CommentError, CommentPanel};
pub use config::ClientConfig;
pub use error::FetchError;
pub use extract::{extract_records, parse_rows, Record, SpeciesRow, RANGE_SENTINEL};
pub use fetch::WikiClient;
pub use gallery::{run_gallery, GalleryConfig, Source};
pub use render::{render_error, render_records, DisplayEntry, RenderTarget, Section};
