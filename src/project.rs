use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::geometry::BoundingBox;
use crate::core::model::Block;
use crate::layout::PageLayout;

/// A set of reviewed pages, persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub page_idx: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub layout: PageLayout,
}

impl Page {
    pub fn new(page_idx: usize, width: u32, height: u32) -> Self {
        Self {
            page_idx,
            width,
            height,
            layout: PageLayout::new(Vec::new()).with_region(BoundingBox::new(0, 0, width, height)),
            ..Self::default()
        }
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(0, 0, self.width, self.height)
    }

    pub fn word_count(&self) -> usize {
        self.blocks.iter().map(Block::word_count).sum()
    }

    /// Non-empty block texts separated by a blank line.
    pub fn get_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::get_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Project {
    pub fn from_json(data: &str) -> Result<Self> {
        let mut project: Project = serde_json::from_str(data)?;
        for page in &mut project.pages {
            page.layout.sort_by_order();
        }
        Ok(project)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
