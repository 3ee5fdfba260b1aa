use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::export::Exporter;
use crate::project::Project;

#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for TextExporter {
    fn export(&self, project: &Project) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;

        let mut full_text = String::new();
        for page in &project.pages {
            full_text.push_str(&format!("=== Page {} ===\n\n", page.page_idx + 1));
            let page_text = page.get_text();
            if !page_text.is_empty() {
                full_text.push_str(&page_text);
                full_text.push_str("\n\n");
            }

            let page_path = self
                .out_dir
                .join(format!("page_{:03}.txt", page.page_idx + 1));
            fs::write(page_path, page_text)?;
        }

        fs::write(self.out_dir.join("document.txt"), full_text)?;
        Ok(())
    }
}
