//! Tesseract TSV output to document tree.
//!
//! Rows come in document order with levels 1 (page) through 5 (word); each
//! container row opens a new node that the following rows attach to.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::geometry::BoundingBox;
use crate::core::model::{Block, Line, Paragraph, Word};
use crate::layout::{BoxKind, OcrBox};
use crate::project::Page;

#[derive(Debug, Clone, Deserialize)]
pub struct TsvRow {
    pub level: u8,
    pub page_num: u32,
    pub block_num: u32,
    pub par_num: u32,
    pub line_num: u32,
    pub word_num: u32,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub conf: f64,
    #[serde(default)]
    pub text: String,
}

impl TsvRow {
    fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.left, self.top, self.width, self.height)
    }
}

pub fn read_rows(data: &str) -> Result<Vec<TsvRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<TsvRow>().enumerate() {
        let row: TsvRow = result.with_context(|| format!("failed to parse TSV row {}", idx + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Builds a page from TSV text; `language` is assigned to every block.
pub fn build_page(data: &str, page_idx: usize, language: &str) -> Result<Page> {
    let rows = read_rows(data)?;
    let mut page = Page::new(page_idx, 0, 0);

    for row in rows {
        match row.level {
            1 => {
                page = Page::new(page_idx, row.width, row.height);
            }
            2 => page
                .blocks
                .push(Block::new().with_bbox(row.bbox()).with_language(language)),
            3 => match page.blocks.last_mut() {
                Some(block) => block.add_paragraph(Paragraph::new().with_bbox(row.bbox())),
                None => warn!(block = row.block_num, "paragraph row outside a block, skipping"),
            },
            4 => match page
                .blocks
                .last_mut()
                .and_then(|block| block.paragraphs.last_mut())
            {
                Some(paragraph) => paragraph.add_line(Line::new().with_bbox(row.bbox())),
                None => warn!(par = row.par_num, "line row outside a paragraph, skipping"),
            },
            5 => {
                if row.text.trim().is_empty() {
                    continue;
                }
                let line = page
                    .blocks
                    .last_mut()
                    .and_then(|block| block.paragraphs.last_mut())
                    .and_then(|paragraph| paragraph.lines.last_mut());
                match line {
                    Some(line) => line.add_word(
                        Word::new(row.text.trim())
                            .with_bbox(row.bbox())
                            .with_confidence(row.conf.max(0.0)),
                    ),
                    None => warn!(word = row.word_num, "word row outside a line, skipping"),
                }
            }
            other => warn!(level = other, "unknown TSV level, skipping"),
        }
    }

    for block in &mut page.blocks {
        fill_confidence(block);
    }
    for block in &page.blocks {
        if let Some(bbox) = block.bbox {
            page.layout.add(
                OcrBox::new(bbox, BoxKind::Text).with_confidence(block.confidence),
                None,
            )?;
        }
    }

    debug!(
        page_idx,
        blocks = page.blocks.len(),
        words = page.word_count(),
        "built page from TSV"
    );
    Ok(page)
}

fn mean_confidence<'a>(words: impl Iterator<Item = &'a Word>) -> f64 {
    let (total, count) = words
        .map(|word| word.confidence)
        .filter(|conf| *conf > 0.0)
        .fold((0.0, 0usize), |(total, count), conf| (total + conf, count + 1));
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Containers take the mean positive confidence of the words below them.
fn fill_confidence(block: &mut Block) {
    for paragraph in &mut block.paragraphs {
        for line in &mut paragraph.lines {
            line.confidence = mean_confidence(line.words.iter());
        }
        paragraph.confidence = mean_confidence(paragraph.words());
    }
    block.confidence = mean_confidence(block.words());
}
