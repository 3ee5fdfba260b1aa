use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::{debug, info};

use crate::export::{Exporter, HocrExporter, JsonExporter, TextExporter};
use crate::ocr::{OcrLayoutBuilder, OcrTrack, TesseractBridge};
use crate::project::Project;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
    Hocr,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output: PathBuf,
    pub formats: Vec<ExportFormat>,
    pub lang: String,
    pub tesseract: PathBuf,
    pub psm: Option<u8>,
}

impl PipelineConfig {
    pub fn new(output: PathBuf) -> Self {
        Self {
            output,
            formats: vec![ExportFormat::Json, ExportFormat::Hocr],
            lang: "eng".to_string(),
            tesseract: PathBuf::from("tesseract"),
            psm: None,
        }
    }

    pub fn with_formats(mut self, formats: Vec<ExportFormat>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_lang(mut self, lang: String) -> Self {
        self.lang = lang;
        self
    }

    pub fn with_tesseract(mut self, tesseract: PathBuf) -> Self {
        self.tesseract = tesseract;
        self
    }

    pub fn with_psm(mut self, psm: Option<u8>) -> Self {
        self.psm = psm;
        self
    }

    pub fn ocr_track(&self) -> OcrLayoutBuilder {
        let mut bridge = TesseractBridge::new()
            .with_binary(self.tesseract.clone())
            .with_lang(self.lang.clone());
        if let Some(psm) = self.psm {
            bridge = bridge.with_psm(psm);
        }
        OcrLayoutBuilder::new(bridge)
    }
}

/// Recognizes every image in order; page indices follow the input order.
pub fn recognize_images(track: &impl OcrTrack, images: &[PathBuf]) -> Result<Project> {
    let mut pages = Vec::with_capacity(images.len());
    for (page_idx, image) in images.iter().enumerate() {
        let page = track
            .analyze_page(image, page_idx)
            .with_context(|| format!("failed to recognize {}", image.display()))?;
        debug!(page_idx, blocks = page.blocks.len(), "recognized page");
        pages.push(page);
    }
    Ok(Project { pages })
}

pub fn load_project(path: &Path) -> Result<Project> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read project {}", path.display()))?;
    let project = Project::from_json(&data)
        .with_context(|| format!("failed to parse project {}", path.display()))?;
    Ok(project)
}

pub fn export_project(project: &Project, config: &PipelineConfig) -> Result<()> {
    for format in &config.formats {
        let exporter: Box<dyn Exporter> = match format {
            ExportFormat::Json => Box::new(JsonExporter::new(config.output.clone())),
            ExportFormat::Text => Box::new(TextExporter::new(config.output.clone())),
            ExportFormat::Hocr => Box::new(HocrExporter::new(config.output.join("hocr"))),
        };
        exporter.export(project)?;
        info!(?format, output = %config.output.display(), "exported project");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::core::geometry::BoundingBox;
    use crate::core::model::{Block, Line, Paragraph, Word};
    use crate::project::Page;

    fn temp_output_dir(prefix: &str) -> PathBuf {
        let mut out = std::env::temp_dir();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis();
        let pid = std::process::id();
        out.push(format!("{prefix}-{pid}-{now}"));
        out
    }

    struct FixedTrack;

    impl OcrTrack for FixedTrack {
        fn analyze_page(&self, image: &Path, page_idx: usize) -> Result<Page> {
            let mut page = Page::new(page_idx, 100, 100);
            page.image = Some(image.to_path_buf());
            page.blocks.push(
                Block::new().with_bbox(BoundingBox::new(0, 0, 10, 10)).with_paragraph(
                    Paragraph::new().with_line(Line::new().with_word(Word::new("scanned"))),
                ),
            );
            Ok(page)
        }
    }

    #[test]
    fn ocr_track_follows_config() {
        let config = PipelineConfig::new(PathBuf::from("out"))
            .with_lang("deu".to_string())
            .with_tesseract(PathBuf::from("/nonexistent/tesseract"))
            .with_psm(Some(4));
        assert_eq!(config.psm, Some(4));
        assert!(config.ocr_track().analyze_page(Path::new("a.png"), 0).is_err());
    }

    #[test]
    fn recognizes_images_in_order() -> Result<()> {
        let images = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        let project = recognize_images(&FixedTrack, &images)?;
        assert_eq!(project.pages.len(), 2);
        assert_eq!(project.pages[1].page_idx, 1);
        assert_eq!(project.pages[1].image, Some(PathBuf::from("b.png")));
        Ok(())
    }

    #[test]
    fn export_project_writes_selected_formats() -> Result<()> {
        let output = temp_output_dir("ocrreader-pipeline");
        let project = recognize_images(&FixedTrack, &[PathBuf::from("a.png")])?;
        let config = PipelineConfig::new(output.clone()).with_formats(vec![
            ExportFormat::Json,
            ExportFormat::Text,
            ExportFormat::Hocr,
        ]);

        export_project(&project, &config)?;

        assert!(output.join("project.json").exists());
        assert!(output.join("document.txt").exists());
        assert!(output.join("hocr/page_001.hocr").exists());
        assert_eq!(load_project(&output.join("project.json"))?, project);

        let _ = fs::remove_dir_all(&output);
        Ok(())
    }
}
