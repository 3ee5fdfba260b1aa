use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Runs the `tesseract` command line engine and captures its TSV output.
#[derive(Debug, Clone)]
pub struct TesseractBridge {
    binary: PathBuf,
    lang: String,
    psm: Option<u8>,
}

impl Default for TesseractBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl TesseractBridge {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            lang: "eng".to_string(),
            psm: None,
        }
    }

    pub fn with_binary(mut self, binary: PathBuf) -> Self {
        self.binary = binary;
        self
    }

    pub fn with_lang(mut self, lang: String) -> Self {
        self.lang = lang;
        self
    }

    /// Page segmentation mode passed as `--psm`.
    pub fn with_psm(mut self, psm: u8) -> Self {
        self.psm = Some(psm);
        self
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    fn args(&self, image_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            image_path.into(),
            "stdout".into(),
            "-l".into(),
            self.lang.clone().into(),
        ];
        if let Some(psm) = self.psm {
            args.push("--psm".into());
            args.push(psm.to_string().into());
        }
        args.push("tsv".into());
        args
    }

    pub fn run(&self, image_path: &Path) -> Result<String> {
        let mut command = Command::new(&self.binary);
        command.args(self.args(image_path));

        debug!(binary = %self.binary.display(), image = %image_path.display(), "invoking tesseract");
        let output = command
            .output()
            .with_context(|| format!("failed to invoke {}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("tesseract failed on {}: {stderr}", image_path.display());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().copied().map(OsString::from).collect()
    }

    #[test]
    fn builds_tsv_arguments() {
        let bridge = TesseractBridge::new().with_lang("eng+deu".to_string());
        assert_eq!(
            bridge.args(Path::new("page.png")),
            os_args(&["page.png", "stdout", "-l", "eng+deu", "tsv"])
        );
    }

    #[test]
    fn passes_segmentation_mode() {
        let bridge = TesseractBridge::new().with_psm(6);
        assert_eq!(
            bridge.args(Path::new("page.png")),
            os_args(&["page.png", "stdout", "-l", "eng", "--psm", "6", "tsv"])
        );
    }

    #[test]
    fn missing_binary_is_an_error() {
        let bridge = TesseractBridge::new().with_binary(PathBuf::from("/nonexistent/tesseract"));
        assert!(bridge.run(Path::new("page.png")).is_err());
    }
}
