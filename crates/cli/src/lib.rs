// ABOUTME: Library half of the sift CLI: HTTP rendering, run configuration and pagination.
// ABOUTME: The binary in main.rs wires these together behind clap arguments.

pub mod config;
pub mod error;
pub mod options;
pub mod output;
pub mod render;
pub mod scrape;

pub use config::ScrapeConfig;
pub use error::{NavigationError, NavigationErrorKind};
pub use options::{RenderOptions, RendererBuilder};
pub use output::Destination;
pub use render::{RenderedPage, Renderer};
pub use scrape::{PageReport, ScrapeOutcome, Scraper};
