use serde::{Deserialize, Serialize};

use crate::core::geometry::BoundingBox;

/// An element whose position in a [`PageLayout`](super::PageLayout) is
/// mirrored in an integer `order` field.
pub trait Ordered {
    fn order(&self) -> usize;
    fn set_order(&mut self, order: usize);
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BoxKind {
    #[default]
    Text,
    Heading,
    Caption,
    Image,
    Table,
    Equation,
    Unknown,
}

impl BoxKind {
    pub fn is_text(&self) -> bool {
        matches!(self, BoxKind::Text | BoxKind::Heading | BoxKind::Caption)
    }
}

/// A page region found by layout analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OcrBox {
    #[serde(default)]
    pub order: usize,
    pub bbox: BoundingBox,
    #[serde(default)]
    pub kind: BoxKind,
    #[serde(default, serialize_with = "crate::core::mapping::serialize_confidence")]
    pub confidence: f64,
}

impl OcrBox {
    pub fn new(bbox: BoundingBox, kind: BoxKind) -> Self {
        Self {
            order: 0,
            bbox,
            kind,
            confidence: 0.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }
}

impl Ordered for OcrBox {
    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_kinds_carry_reading_content() {
        assert!(BoxKind::Text.is_text());
        assert!(BoxKind::Heading.is_text());
        assert!(BoxKind::Caption.is_text());
        assert!(!BoxKind::Image.is_text());
        assert!(!BoxKind::Table.is_text());
        assert_eq!(BoxKind::default(), BoxKind::Text);
    }

    #[test]
    fn non_finite_confidence_does_not_serialize() {
        let ocr_box = OcrBox::new(BoundingBox::new(0, 0, 1, 1), BoxKind::Image).with_confidence(f64::NAN);
        assert!(serde_json::to_string(&ocr_box).is_err());

        let ocr_box = ocr_box.with_confidence(42.5);
        assert_eq!(serde_json::to_value(&ocr_box).unwrap()["confidence"], 42.5);
    }
}
