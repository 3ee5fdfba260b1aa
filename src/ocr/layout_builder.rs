use anyhow::{Context, Result};
use std::path::Path;

use crate::ocr::bridge::TesseractBridge;
use crate::ocr::tsv::build_page;
use crate::ocr::OcrTrack;
use crate::project::Page;

#[derive(Debug, Clone, Default)]
pub struct OcrLayoutBuilder {
    bridge: TesseractBridge,
}

impl OcrLayoutBuilder {
    pub fn new(bridge: TesseractBridge) -> Self {
        Self { bridge }
    }
}

impl OcrTrack for OcrLayoutBuilder {
    fn analyze_page(&self, image: &Path, page_idx: usize) -> Result<Page> {
        let tsv = self.bridge.run(image)?;
        let mut page = build_page(&tsv, page_idx, self.bridge.lang())
            .with_context(|| format!("failed to read OCR output for {}", image.display()))?;
        page.image = Some(image.to_path_buf());
        Ok(page)
    }
}
