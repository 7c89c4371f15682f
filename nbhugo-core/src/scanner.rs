use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub enum ScanError {
    Io(std::io::Error),
    InvalidPath(PathBuf),
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::Io(err)
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::Io(e) => write!(f, "IO error: {}", e),
            ScanError::InvalidPath(p) => write!(f, "Invalid path: {}", p.display()),
        }
    }
}

impl std::error::Error for ScanError {}

/// Discovers notebooks under a source directory.
pub struct NotebookScanner {
    source_dir: PathBuf,
}

impl NotebookScanner {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source_dir: path.as_ref().to_path_buf(),
        }
    }

    /// All `.ipynb` files under the source directory, sorted, skipping
    /// `.ipynb_checkpoints` directories.
    pub fn scan(&self) -> Result<Vec<PathBuf>, ScanError> {
        if !self.source_dir.is_dir() {
            return Err(ScanError::InvalidPath(self.source_dir.clone()));
        }

        let mut notebooks: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(&self.source_dir)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".ipynb_checkpoints")
        {
            let entry = entry.map_err(|e| match e.into_io_error() {
                Some(io) => ScanError::Io(io),
                None => ScanError::InvalidPath(self.source_dir.clone()),
            })?;

            let path = entry.path();
            if path.is_file() && path.extension().map(|ext| ext == "ipynb").unwrap_or(false) {
                notebooks.push(path.to_path_buf());
            }
        }

        notebooks.sort();
        Ok(notebooks)
    }
}
