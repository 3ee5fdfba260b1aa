//! hOCR fragments for document tree nodes.
//!
//! A node with a bounding box renders as an element carrying the hOCR class
//! and a `title="bbox l t r b; x_wconf c"` property list. A node without one
//! renders as its plain text, at every level of the tree. Inside a located
//! parent that text is escaped.

use crate::core::geometry::BoundingBox;
use crate::core::model::{Block, Line, Node, Paragraph, Word};

pub const WORD_CLASS: &str = "ocrx_word";
pub const LINE_CLASS: &str = "ocrx_line";
pub const PARAGRAPH_CLASS: &str = "ocr_par";
pub const BLOCK_CLASS: &str = "ocrx_block";

/// Formats a confidence the way hOCR consumers expect: always with a
/// fractional part (`95.0`, `87.25`).
pub fn format_confidence(confidence: f64) -> String {
    if confidence.is_finite() && confidence.fract() == 0.0 {
        format!("{confidence:.1}")
    } else {
        format!("{confidence}")
    }
}

pub fn title(bbox: &BoundingBox, confidence: f64) -> String {
    format!(
        "bbox {} {} {} {}; x_wconf {}",
        bbox.x,
        bbox.y,
        bbox.right(),
        bbox.bottom(),
        format_confidence(confidence)
    )
}

fn element(tag: &str, class: &str, bbox: &BoundingBox, confidence: f64, body: &str) -> String {
    format!(
        r#"<{tag} class="{class}" title="{title}">{body}</{tag}>"#,
        title = title(bbox, confidence)
    )
}

/// Child markup as a located parent embeds it.
fn fragment(bbox: Option<&BoundingBox>, hocr: impl FnOnce() -> String, text: impl FnOnce() -> String) -> String {
    match bbox {
        Some(_) => hocr(),
        None => html_escape::encode_text(&text()).into_owned(),
    }
}

impl Word {
    pub(crate) fn hocr_fragment(&self) -> String {
        fragment(self.bbox.as_ref(), || self.get_hocr(), || self.get_text())
    }

    pub fn get_hocr(&self) -> String {
        match &self.bbox {
            Some(bbox) => element(
                "span",
                WORD_CLASS,
                bbox,
                self.confidence,
                &html_escape::encode_text(&self.text),
            ),
            None => self.get_text(),
        }
    }
}

impl Line {
    pub(crate) fn hocr_fragment(&self) -> String {
        fragment(self.bbox.as_ref(), || self.get_hocr(), || self.get_text())
    }

    pub fn get_hocr(&self) -> String {
        match &self.bbox {
            Some(bbox) => {
                let body = self
                    .words
                    .iter()
                    .map(Word::hocr_fragment)
                    .collect::<Vec<_>>()
                    .join(" ");
                element("span", LINE_CLASS, bbox, self.confidence, &body)
            }
            None => self.get_text(),
        }
    }
}

impl Paragraph {
    pub(crate) fn hocr_fragment(&self) -> String {
        fragment(self.bbox.as_ref(), || self.get_hocr(), || self.get_text())
    }

    pub fn get_hocr(&self) -> String {
        match &self.bbox {
            Some(bbox) => {
                let body = self
                    .lines
                    .iter()
                    .map(Line::hocr_fragment)
                    .collect::<Vec<_>>()
                    .join(" ");
                element("p", PARAGRAPH_CLASS, bbox, self.confidence, &body)
            }
            None => self.get_text(),
        }
    }
}

impl Block {
    pub(crate) fn hocr_fragment(&self) -> String {
        fragment(self.bbox.as_ref(), || self.get_hocr(), || self.get_text())
    }

    pub fn get_hocr(&self) -> String {
        match &self.bbox {
            Some(bbox) => {
                let body: String = self.paragraphs.iter().map(Paragraph::hocr_fragment).collect();
                element("div", BLOCK_CLASS, bbox, self.confidence, &body)
            }
            None => self.get_text(),
        }
    }
}

impl Node {
    pub fn get_hocr(&self) -> String {
        match self {
            Node::Block(block) => block.get_hocr(),
            Node::Paragraph(paragraph) => paragraph.get_hocr(),
            Node::Line(line) => line.get_hocr(),
            Node::Word(word) => word.get_hocr(),
        }
    }
}
