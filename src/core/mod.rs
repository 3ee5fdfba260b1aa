pub mod error;
pub mod geometry;
pub mod hocr;
pub mod mapping;
pub mod model;

pub use error::ModelError;
pub use geometry::{Baseline, BoundingBox, Point};
pub use model::{Block, FontAttributes, Justification, Line, Node, Paragraph, Word};
