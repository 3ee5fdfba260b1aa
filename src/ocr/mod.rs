pub mod bridge;
pub mod layout_builder;
pub mod tsv;

use anyhow::Result;
use std::path::Path;

use crate::project::Page;

pub use bridge::TesseractBridge;
pub use layout_builder::OcrLayoutBuilder;

/// A recognition stage that turns a page image into a document tree and its
/// region layout.
pub trait OcrTrack {
    fn analyze_page(&self, image: &Path, page_idx: usize) -> Result<Page>;
}
