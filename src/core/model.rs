use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{ModelError, Result};
use crate::core::geometry::{Baseline, BoundingBox};
use crate::core::mapping::{deserialize_baseline, nullable};

/// Per-word font data as reported by the engine (`pointsize`, `bold`, ...).
///
/// Symbol-level attributes (sub/superscript, drop caps) are carried here
/// verbatim; nothing in this crate interprets them.
pub type FontAttributes = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    Left,
    Center,
    Right,
    Justified,
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Word {
    #[serde(deserialize_with = "nullable")]
    pub text: String,
    pub bbox: Option<BoundingBox>,
    #[serde(deserialize_with = "nullable")]
    pub confidence: f64,
    #[serde(rename = "word_font_attributes", deserialize_with = "nullable")]
    pub font_attributes: FontAttributes,
    /// Empty when the word inherits its block's language.
    #[serde(rename = "word_recognition_language", deserialize_with = "nullable")]
    pub recognition_language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Line {
    pub bbox: Option<BoundingBox>,
    #[serde(deserialize_with = "nullable")]
    pub confidence: f64,
    #[serde(deserialize_with = "deserialize_baseline")]
    pub baseline: Option<Baseline>,
    #[serde(deserialize_with = "nullable")]
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    pub bbox: Option<BoundingBox>,
    #[serde(deserialize_with = "nullable")]
    pub confidence: f64,
    #[serde(deserialize_with = "nullable")]
    pub first_line_indent: bool,
    /// Paragraph opens with a drop cap.
    #[serde(deserialize_with = "nullable")]
    pub is_crown: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_list_item: bool,
    pub justification: Option<Justification>,
    #[serde(deserialize_with = "nullable")]
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Block {
    pub bbox: Option<BoundingBox>,
    #[serde(deserialize_with = "nullable")]
    pub confidence: f64,
    #[serde(deserialize_with = "nullable")]
    pub language: String,
    #[serde(deserialize_with = "nullable")]
    pub paragraphs: Vec<Paragraph>,
}

/// Any node of the document tree, discriminated by the mapping `type` key.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Block(Block),
    Paragraph(Paragraph),
    Line(Line),
    Word(Word),
}

fn replace_child<T>(children: &mut [T], index: usize, child: T) -> Result<T> {
    let len = children.len();
    children
        .get_mut(index)
        .map(|slot| std::mem::replace(slot, child))
        .ok_or(ModelError::IndexOutOfRange { index, len })
}

fn join_text<T>(children: &[T], text: impl Fn(&T) -> String, separator: &str) -> String {
    children.iter().map(text).collect::<Vec<_>>().join(separator)
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_font_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.font_attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.recognition_language = language.into();
        self
    }

    pub fn point_size(&self) -> Option<f64> {
        self.font_attributes.get("pointsize").and_then(Value::as_f64)
    }

    pub fn get_text(&self) -> String {
        self.text.clone()
    }
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn with_word(mut self, word: Word) -> Self {
        self.words.push(word);
        self
    }

    pub fn add_word(&mut self, word: Word) {
        self.words.push(word);
    }

    pub fn replace_word(&mut self, index: usize, word: Word) -> Result<Word> {
        replace_child(&mut self.words, index, word)
    }

    pub fn children_bbox(&self) -> Option<BoundingBox> {
        BoundingBox::union_all(self.words.iter().filter_map(|w| w.bbox.as_ref()))
    }

    pub fn get_text(&self) -> String {
        join_text(&self.words, Word::get_text, " ")
    }
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_justification(mut self, justification: Justification) -> Self {
        self.justification = Some(justification);
        self
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    pub fn add_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn replace_line(&mut self, index: usize, line: Line) -> Result<Line> {
        replace_child(&mut self.lines, index, line)
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|line| line.words.iter())
    }

    /// Mean `pointsize` over the words that report one.
    pub fn mean_font_size(&self) -> Option<f64> {
        let (total, count) = self
            .words()
            .filter_map(Word::point_size)
            .fold((0.0, 0usize), |(total, count), size| (total + size, count + 1));
        (count > 0).then(|| total / count as f64)
    }

    pub fn children_bbox(&self) -> Option<BoundingBox> {
        BoundingBox::union_all(self.lines.iter().filter_map(|l| l.bbox.as_ref()))
    }

    pub fn get_text(&self) -> String {
        join_text(&self.lines, Line::get_text, " ")
    }
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.paragraphs.push(paragraph);
        self
    }

    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    pub fn replace_paragraph(&mut self, index: usize, paragraph: Paragraph) -> Result<Paragraph> {
        replace_child(&mut self.paragraphs, index, paragraph)
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.paragraphs.iter().flat_map(|paragraph| paragraph.words())
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// The word's own recognition language, or this block's when it has none.
    pub fn word_language<'a>(&'a self, word: &'a Word) -> &'a str {
        if word.recognition_language.is_empty() {
            &self.language
        } else {
            &word.recognition_language
        }
    }

    pub fn children_bbox(&self) -> Option<BoundingBox> {
        BoundingBox::union_all(self.paragraphs.iter().filter_map(|p| p.bbox.as_ref()))
    }

    pub fn get_text(&self) -> String {
        join_text(&self.paragraphs, Paragraph::get_text, "\n")
    }
}

impl Node {
    pub fn get_text(&self) -> String {
        match self {
            Node::Block(block) => block.get_text(),
            Node::Paragraph(paragraph) => paragraph.get_text(),
            Node::Line(line) => line.get_text(),
            Node::Word(word) => word.get_text(),
        }
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

impl From<Paragraph> for Node {
    fn from(paragraph: Paragraph) -> Self {
        Node::Paragraph(paragraph)
    }
}

impl From<Line> for Node {
    fn from(line: Line) -> Self {
        Node::Line(line)
    }
}

impl From<Word> for Node {
    fn from(word: Word) -> Self {
        Node::Word(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(words: &[&str]) -> Line {
        words
            .iter()
            .fold(Line::new(), |line, text| line.with_word(Word::new(*text)))
    }

    #[test]
    fn joins_lines_with_spaces_and_paragraphs_with_newlines() {
        let first = Paragraph::new()
            .with_line(line(&["The", "quick"]))
            .with_line(line(&["brown", "fox"]));
        let second = Paragraph::new().with_line(line(&["jumps"]));
        let block = Block::new().with_paragraph(first).with_paragraph(second);

        assert_eq!(block.get_text(), "The quick brown fox\njumps");
    }

    #[test]
    fn empty_nodes_have_empty_text() {
        assert_eq!(Word::default().get_text(), "");
        assert_eq!(Line::default().get_text(), "");
        assert_eq!(Paragraph::default().get_text(), "");
        assert_eq!(Block::default().get_text(), "");
    }

    #[test]
    fn replace_word_returns_previous() {
        let mut line = line(&["teh", "cat"]);
        let old = line.replace_word(0, Word::new("the")).unwrap();
        assert_eq!(old.text, "teh");
        assert_eq!(line.get_text(), "the cat");
    }

    #[test]
    fn replace_out_of_range_is_rejected() {
        let mut paragraph = Paragraph::new();
        let err = paragraph.replace_line(0, Line::new()).unwrap_err();
        assert!(matches!(err, ModelError::IndexOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn mean_font_size_skips_words_without_pointsize() {
        let paragraph = Paragraph::new().with_line(
            Line::new()
                .with_word(Word::new("a").with_font_attribute("pointsize", 10))
                .with_word(Word::new("b").with_font_attribute("pointsize", 14))
                .with_word(Word::new("c")),
        );
        assert_eq!(paragraph.mean_font_size(), Some(12.0));
        assert_eq!(Paragraph::new().mean_font_size(), None);
    }

    #[test]
    fn words_inherit_block_language() {
        let block = Block::new().with_language("deu").with_paragraph(
            Paragraph::new().with_line(
                Line::new()
                    .with_word(Word::new("Haus"))
                    .with_word(Word::new("house").with_language("eng")),
            ),
        );
        let languages: Vec<&str> = block.words().map(|w| block.word_language(w)).collect();
        assert_eq!(languages, vec!["deu", "eng"]);
        assert_eq!(block.word_count(), 2);
    }

    #[test]
    fn children_bbox_is_union_of_located_children() {
        let line = Line::new()
            .with_word(Word::new("a").with_bbox(BoundingBox::new(10, 10, 5, 5)))
            .with_word(Word::new("b"))
            .with_word(Word::new("c").with_bbox(BoundingBox::new(20, 8, 5, 9)));
        assert_eq!(line.children_bbox(), Some(BoundingBox::new(10, 8, 15, 9)));
    }
}
