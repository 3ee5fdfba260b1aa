use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ocrreader::pipeline::{export_project, load_project, recognize_images, ExportFormat, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "ocrreader")]
#[command(version, about = "Review and export OCR results as text, hOCR or project JSON", long_about = None)]
struct Cli {
    /// Log debug events (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run OCR on page images and save the results
    Recognize {
        /// Page images, in page order
        images: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "ocr_output")]
        output: PathBuf,

        /// Output format(s) to generate
        #[arg(short, long, value_enum, default_values_t = vec![ExportFormat::Json, ExportFormat::Hocr])]
        format: Vec<ExportFormat>,

        /// Tesseract language code(s), e.g. `eng+deu`
        #[arg(short, long, default_value = "eng")]
        lang: String,

        /// Path to the tesseract binary
        #[arg(long, default_value = "tesseract")]
        tesseract: PathBuf,

        /// Tesseract page segmentation mode
        #[arg(long)]
        psm: Option<u8>,
    },

    /// Export a saved project
    Export {
        /// Project JSON file
        project: PathBuf,

        /// Output directory (default: ./<project_name>_output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format(s) to generate
        #[arg(short, long, value_enum, default_values_t = vec![ExportFormat::Text, ExportFormat::Hocr])]
        format: Vec<ExportFormat>,
    },

    /// Show information about a saved project
    Info {
        /// Project JSON file
        project: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Recognize {
            images,
            output,
            format,
            lang,
            tesseract,
            psm,
        } => recognize(images, output, format, lang, tesseract, psm),
        Commands::Export {
            project,
            output,
            format,
        } => export(project, output, format),
        Commands::Info { project } => show_info(project),
    }
}

fn recognize(
    images: Vec<PathBuf>,
    output: PathBuf,
    formats: Vec<ExportFormat>,
    lang: String,
    tesseract: PathBuf,
    psm: Option<u8>,
) -> Result<()> {
    if images.is_empty() {
        anyhow::bail!("No input images specified");
    }
    for image in &images {
        if !image.is_file() {
            anyhow::bail!("Input image does not exist: {}", image.display());
        }
    }

    println!("[*] Recognizing {} page(s)", images.len());
    println!("[*] Output: {}", output.display());

    let config = PipelineConfig::new(output.clone())
        .with_formats(formats)
        .with_lang(lang)
        .with_tesseract(tesseract)
        .with_psm(psm);

    let project = recognize_images(&config.ocr_track(), &images)?;

    println!("[+] Exporting results...");
    export_project(&project, &config)
        .with_context(|| format!("Failed to export to: {}", output.display()))?;

    println!("\n[✓] Done! Results saved to: {}", output.display());
    Ok(())
}

fn export(project_path: PathBuf, output: Option<PathBuf>, formats: Vec<ExportFormat>) -> Result<()> {
    let output = output.unwrap_or_else(|| {
        let stem = project_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        PathBuf::from(format!("{stem}_output"))
    });

    println!("[*] Loading: {}", project_path.display());
    let project = load_project(&project_path)?;

    let config = PipelineConfig::new(output.clone()).with_formats(formats);
    println!("[+] Exporting results...");
    export_project(&project, &config)
        .with_context(|| format!("Failed to export to: {}", output.display()))?;

    println!("\n[✓] Done! Results saved to: {}", output.display());
    Ok(())
}

fn show_info(project_path: PathBuf) -> Result<()> {
    let project = load_project(&project_path)?;

    println!("Project Information");
    println!("===================");
    println!("File: {}", project_path.display());
    println!("Pages: {}", project.pages.len());

    for page in &project.pages {
        let band = match page.layout.get_page_region() {
            Ok(region) => format!(
                "content band y={} h={}",
                region.y, region.height
            ),
            Err(err) => format!("[!] {err}"),
        };
        let text_boxes = page.layout.iter().filter(|b| b.kind.is_text()).count();
        println!(
            "  Page {}: {}x{}, {} block(s), {} word(s), {} layout box(es) ({} text), {}",
            page.page_idx + 1,
            page.width,
            page.height,
            page.blocks.len(),
            page.word_count(),
            page.layout.len(),
            text_boxes,
            band
        );
    }

    Ok(())
}
