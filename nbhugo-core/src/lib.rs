pub mod config;
pub mod exporter;
pub mod frontmatter;
pub mod notebook;
pub mod preprocess;
pub mod renderer;
pub mod scanner;

// Re-export main types
pub use exporter::{ExportError, HugoExporter};
pub use frontmatter::render_front_matter;
pub use notebook::{Cell, CellType, Notebook, Output, Source};
pub use preprocess::HugoPreprocessor;
pub use renderer::{MarkdownRenderer, PathResolver, RelativePathResolver, UrlPrefixResolver};
pub use scanner::{NotebookScanner, ScanError};
