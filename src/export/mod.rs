pub mod hocr_export;
pub mod json_export;
pub mod text_export;

use anyhow::Result;

use crate::project::Project;

pub use hocr_export::HocrExporter;
pub use json_export::JsonExporter;
pub use text_export::TextExporter;

pub trait Exporter {
    fn export(&self, project: &Project) -> Result<()>;
}
