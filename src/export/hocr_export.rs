use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::hocr::{BLOCK_CLASS, LINE_CLASS, PARAGRAPH_CLASS, WORD_CLASS};
use crate::export::Exporter;
use crate::project::{Page, Project};

/// Writes one standalone hOCR document per page.
#[derive(Debug, Clone)]
pub struct HocrExporter {
    out_dir: PathBuf,
}

impl HocrExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

fn page_title(page: &Page) -> String {
    let mut title = String::new();
    if let Some(image) = &page.image {
        title.push_str(&format!("image \"{}\"; ", image.display()));
    }
    title.push_str(&format!(
        "bbox 0 0 {} {}; ppageno {}",
        page.width, page.height, page.page_idx
    ));
    title
}

/// The full XHTML document for a page. Blocks without a bbox contribute
/// their escaped text.
pub fn page_document(page: &Page) -> String {
    let blocks: String = page
        .blocks
        .iter()
        .map(|block| block.hocr_fragment() + "\n")
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en" lang="en">
<head>
<title>Page {number}</title>
<meta http-equiv="Content-Type" content="text/html;charset=utf-8"/>
<meta name="ocr-system" content="ocrreader {version}"/>
<meta name="ocr-capabilities" content="ocr_page {BLOCK_CLASS} {PARAGRAPH_CLASS} {LINE_CLASS} {WORD_CLASS}"/>
</head>
<body>
<div class="ocr_page" id="page_{number}" title="{title}">
{blocks}</div>
</body>
</html>
"#,
        number = page.page_idx + 1,
        version = env!("CARGO_PKG_VERSION"),
        title = html_escape::encode_double_quoted_attribute(&page_title(page)),
        blocks = blocks,
    )
}

impl Exporter for HocrExporter {
    fn export(&self, project: &Project) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        for page in &project.pages {
            let path = self
                .out_dir
                .join(format!("page_{:03}.hocr", page.page_idx + 1));
            fs::write(path, page_document(page))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::BoundingBox;
    use crate::core::model::{Block, Line, Paragraph, Word};

    #[test]
    fn page_document_wraps_blocks() {
        let mut page = Page::new(0, 800, 1000);
        page.image = Some(PathBuf::from("scan \"1\".png"));
        page.blocks.push(
            Block::new().with_bbox(BoundingBox::new(0, 0, 10, 10)).with_paragraph(
                Paragraph::new().with_line(Line::new().with_word(Word::new("plain"))),
            ),
        );

        let html = page_document(&page);
        assert!(html.contains(
            r#"<div class="ocr_page" id="page_1" title="image &quot;scan &quot;1&quot;.png&quot;; bbox 0 0 800 1000; ppageno 0">"#
        ));
        assert!(html.contains(r#"<div class="ocrx_block" title="bbox 0 0 10 10; x_wconf 0.0">plain</div>"#));
        assert!(html.contains("ocr_page ocrx_block ocr_par ocrx_line ocrx_word"));
    }

    #[test]
    fn page_document_escapes_unlocated_text() {
        let mut page = Page::new(0, 100, 100);
        page.blocks.push(Block::new().with_paragraph(
            Paragraph::new().with_line(
                Line::new()
                    .with_bbox(BoundingBox::new(0, 0, 50, 10))
                    .with_word(Word::new("x</span><script>&")),
            ),
        ));

        let html = page_document(&page);
        assert!(!html.contains("<script>"));
        assert!(html.contains("x&lt;/span&gt;&lt;script&gt;&amp;\n</div>"));
    }
}
