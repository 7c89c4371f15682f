use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::notebook::Notebook;
use crate::preprocess::HugoPreprocessor;
use crate::renderer::{MarkdownRenderer, PathResolver, RelativePathResolver, UrlPrefixResolver};
use crate::scanner::{NotebookScanner, ScanError};

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Parsing(serde_json::Error),
    Scan(ScanError),
    InvalidPath(PathBuf),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Parsing(err)
    }
}

impl From<ScanError> for ExportError {
    fn from(err: ScanError) -> Self {
        ExportError::Scan(err)
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "IO error: {}", e),
            ExportError::Parsing(e) => write!(f, "Notebook parse error: {}", e),
            ExportError::Scan(e) => write!(f, "Scan error: {}", e),
            ExportError::InvalidPath(p) => write!(f, "Invalid path: {}", p.display()),
        }
    }
}

impl std::error::Error for ExportError {}

/// Loads notebooks, preprocesses them, and writes Hugo markdown into the
/// output directory.
pub struct HugoExporter {
    config: Config,
    output_dir: PathBuf,
}

impl HugoExporter {
    pub fn new<P: AsRef<Path>>(config: Config, output_dir: P) -> Self {
        Self {
            config,
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Converts a single notebook, returning the path of the markdown file
    /// it was written to.
    pub fn export_file(&self, notebook_path: &Path) -> Result<PathBuf, ExportError> {
        let data = std::fs::read_to_string(notebook_path)?;
        let mut notebook: Notebook = serde_json::from_str(&data)?;

        let draft = self
            .config
            .front_matter
            .clone()
            .unwrap_or_default()
            .draft;
        HugoPreprocessor::new(draft).preprocess(&mut notebook, notebook_path)?;

        let resolver = self.resolver();
        let rendered = MarkdownRenderer::new(resolver.as_ref()).render(&notebook);

        let stem = notebook_path
            .file_stem()
            .ok_or_else(|| ExportError::InvalidPath(notebook_path.to_path_buf()))?;
        let out_path = self.output_dir.join(stem).with_extension("md");
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&out_path, rendered)?;

        Ok(out_path)
    }

    /// Converts every notebook under `source_dir`.
    pub fn export_dir(&self, source_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        println!("Scanning: {}", source_dir.display());
        let notebooks = NotebookScanner::new(source_dir).scan()?;

        let mut written = Vec::new();
        for notebook_path in notebooks {
            let out_path = self.export_file(&notebook_path)?;
            println!("- {} -> {}", notebook_path.display(), out_path.display());
            written.push(out_path);
        }

        Ok(written)
    }

    fn resolver(&self) -> Box<dyn PathResolver> {
        let prefix = self
            .config
            .paths
            .as_ref()
            .and_then(|p| p.static_prefix.clone());
        match prefix {
            Some(prefix) => Box::new(UrlPrefixResolver::new(prefix)),
            None => Box::new(RelativePathResolver),
        }
    }
}
