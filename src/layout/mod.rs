pub mod error;
pub mod ocr_box;
pub mod page_layout;

pub use error::LayoutError;
pub use ocr_box::{BoxKind, OcrBox, Ordered};
pub use page_layout::PageLayout;
