//! Conversion between the document tree and its generic mapping form.
//!
//! The mapping is a `serde_json::Value` tree where every node carries a
//! `type` discriminator (`block`, `paragraph`, `line`, `word`). It is the
//! persisted project format, so key names here are a stable contract.

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::core::error::{ModelError, Result};
use crate::core::geometry::{Baseline, Point};
use crate::core::model::{Block, Line, Node, Paragraph, Word};

/// Treats an explicit `null` like a missing key.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `null`, `[]` or exactly two `[x, y]` points.
pub(crate) fn deserialize_baseline<'de, D>(deserializer: D) -> std::result::Result<Option<Baseline>, D::Error>
where
    D: Deserializer<'de>,
{
    let points = Option::<Vec<Point>>::deserialize(deserializer)?.unwrap_or_default();
    match points.as_slice() {
        [] => Ok(None),
        [start, end] => Ok(Some(Baseline::new(*start, *end))),
        other => Err(D::Error::custom(format!(
            "baseline must hold 2 points, found {}",
            other.len()
        ))),
    }
}

fn check_kind(value: &Value, expected: &'static str) -> Result<()> {
    if !value.is_object() {
        return Err(ModelError::MalformedInput(format!(
            "expected a {expected} mapping, found {}",
            value_kind(value)
        )));
    }
    match value.get("type") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(found)) if found == expected => Ok(()),
        Some(Value::String(found)) => Err(ModelError::KindMismatch {
            expected,
            found: found.clone(),
        }),
        Some(other) => Err(ModelError::MalformedInput(format!(
            "`type` must be a string, found {}",
            value_kind(other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

fn from_value<T: DeserializeOwned>(value: &Value, kind: &'static str) -> Result<T> {
    check_kind(value, kind)?;
    Ok(T::deserialize(value)?)
}

fn to_value<T: Serialize>(node: &T) -> Result<Value> {
    Ok(serde_json::to_value(node)?)
}

/// JSON has no NaN or infinity; refuse them instead of writing `null`.
fn finite<E: serde::ser::Error>(confidence: f64) -> std::result::Result<f64, E> {
    if confidence.is_finite() {
        Ok(confidence)
    } else {
        Err(E::custom(format!("confidence must be finite, found {confidence}")))
    }
}

pub(crate) fn serialize_confidence<S: Serializer>(
    confidence: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(finite(*confidence)?)
}

impl Word {
    pub fn to_mapping(&self) -> Result<Value> {
        to_value(self)
    }

    pub fn from_mapping(value: &Value) -> Result<Self> {
        from_value(value, "word")
    }
}

impl Line {
    pub fn to_mapping(&self) -> Result<Value> {
        to_value(self)
    }

    pub fn from_mapping(value: &Value) -> Result<Self> {
        from_value(value, "line")
    }
}

impl Paragraph {
    pub fn to_mapping(&self) -> Result<Value> {
        to_value(self)
    }

    pub fn from_mapping(value: &Value) -> Result<Self> {
        from_value(value, "paragraph")
    }
}

impl Block {
    pub fn to_mapping(&self) -> Result<Value> {
        to_value(self)
    }

    pub fn from_mapping(value: &Value) -> Result<Self> {
        from_value(value, "block")
    }
}

impl Node {
    pub fn to_mapping(&self) -> Result<Value> {
        match self {
            Node::Block(block) => block.to_mapping(),
            Node::Paragraph(paragraph) => paragraph.to_mapping(),
            Node::Line(line) => line.to_mapping(),
            Node::Word(word) => word.to_mapping(),
        }
    }

    /// Reconstructs whichever node the mapping's `type` key names.
    pub fn from_mapping(value: &Value) -> Result<Self> {
        match value.get("type").and_then(Value::as_str) {
            Some("block") => Block::from_mapping(value).map(Node::Block),
            Some("paragraph") => Paragraph::from_mapping(value).map(Node::Paragraph),
            Some("line") => Line::from_mapping(value).map(Node::Line),
            Some("word") => Word::from_mapping(value).map(Node::Word),
            Some(other) => Err(ModelError::MalformedInput(format!(
                "unknown node type `{other}`"
            ))),
            None => Err(ModelError::MalformedInput(
                "node mapping has no `type` discriminator".to_string(),
            )),
        }
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Word", 6)?;
        state.serialize_field("type", "word")?;
        state.serialize_field("text", &self.text)?;
        state.serialize_field("bbox", &self.bbox)?;
        state.serialize_field("confidence", &finite::<S::Error>(self.confidence)?)?;
        state.serialize_field("word_font_attributes", &self.font_attributes)?;
        state.serialize_field("word_recognition_language", &self.recognition_language)?;
        state.end()
    }
}

impl Serialize for Line {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Line", 5)?;
        state.serialize_field("type", "line")?;
        state.serialize_field("bbox", &self.bbox)?;
        state.serialize_field("confidence", &finite::<S::Error>(self.confidence)?)?;
        state.serialize_field("baseline", &self.baseline)?;
        state.serialize_field("words", &self.words)?;
        state.end()
    }
}

impl Serialize for Paragraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Paragraph", 8)?;
        state.serialize_field("type", "paragraph")?;
        state.serialize_field("bbox", &self.bbox)?;
        state.serialize_field("confidence", &finite::<S::Error>(self.confidence)?)?;
        state.serialize_field("first_line_indent", &self.first_line_indent)?;
        state.serialize_field("is_crown", &self.is_crown)?;
        state.serialize_field("is_list_item", &self.is_list_item)?;
        state.serialize_field("justification", &self.justification)?;
        state.serialize_field("lines", &self.lines)?;
        state.end()
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Block", 5)?;
        state.serialize_field("type", "block")?;
        state.serialize_field("bbox", &self.bbox)?;
        state.serialize_field("confidence", &finite::<S::Error>(self.confidence)?)?;
        state.serialize_field("paragraphs", &self.paragraphs)?;
        state.serialize_field("language", &self.language)?;
        state.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Block(block) => block.serialize(serializer),
            Node::Paragraph(paragraph) => paragraph.serialize(serializer),
            Node::Line(line) => line.serialize(serializer),
            Node::Word(word) => word.serialize(serializer),
        }
    }
}
