pub mod core;
pub mod export;
pub mod layout;
pub mod ocr;
pub mod pipeline;
pub mod project;

pub use crate::core::model::{Block, Line, Node, Paragraph, Word};
pub use layout::{OcrBox, PageLayout};
pub use project::{Page, Project};
