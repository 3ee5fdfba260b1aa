use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::export::Exporter;
use crate::project::Project;

/// Persists the project in the mapping schema, readable by [`Project::from_json`].
#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.out_dir.join("project.json")
    }
}

impl Exporter for JsonExporter {
    fn export(&self, project: &Project) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        fs::write(self.path(), project.to_json()?)?;
        Ok(())
    }
}
