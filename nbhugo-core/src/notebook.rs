use serde::Deserialize;
use serde_json::{Map, Value};

/// A parsed Jupyter notebook (nbformat 4).
///
/// The document is read-only from the renderer's point of view: cells and
/// outputs keep the exact order they have in the file.
#[derive(Debug, Clone, Deserialize)]
pub struct Notebook {
    #[serde(default)]
    pub metadata: NotebookMetadata,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotebookMetadata {
    /// The `hugo` sub-mapping drives the front-matter block. Key order is
    /// preserved as it appears in the file.
    #[serde(default)]
    pub hugo: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub outputs: Vec<Output>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

impl CellType {
    pub fn as_str(self) -> &'static str {
        match self {
            CellType::Code => "code",
            CellType::Markdown => "markdown",
            CellType::Raw => "raw",
        }
    }
}

/// Cell or output text. nbformat stores it as either a single string or a
/// list of line strings; both deserialize to the joined form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source(String);

impl Source {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn set(&mut self, text: String) {
        self.0 = text;
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Source(text)
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Self {
        Source(text.to_string())
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Lines(Vec<String>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Source(text),
            Raw::Lines(lines) => Source(lines.concat()),
        })
    }
}

/// A single cell output, tagged by `output_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    Stream {
        name: String,
        #[serde(default)]
        text: Source,
    },
    ExecuteResult {
        #[serde(default)]
        data: MimeBundle,
        #[serde(default)]
        metadata: OutputMetadata,
    },
    DisplayData {
        #[serde(default)]
        data: MimeBundle,
        #[serde(default)]
        metadata: OutputMetadata,
    },
    Error {
        ename: String,
        evalue: String,
        #[serde(default)]
        traceback: Vec<String>,
    },
}

/// MIME type -> payload mapping of a rich output. Text payloads may be a
/// string or a list of lines, like cell sources.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MimeBundle(pub Map<String, Value>);

impl MimeBundle {
    pub fn contains(&self, mime: &str) -> bool {
        self.0.contains_key(mime)
    }

    /// The payload for `mime` as joined text, if it is textual.
    pub fn text(&self, mime: &str) -> Option<String> {
        match self.0.get(mime)? {
            Value::String(text) => Some(text.clone()),
            Value::Array(lines) => Some(
                lines
                    .iter()
                    .filter_map(|line| line.as_str())
                    .collect::<String>(),
            ),
            _ => None,
        }
    }

    pub fn set_text(&mut self, mime: &str, text: String) {
        self.0.insert(mime.to_string(), Value::String(text));
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputMetadata {
    /// MIME type -> filename, filled in by output extraction upstream or by
    /// the preprocessor for PNG outputs that lack one.
    #[serde(default)]
    pub filenames: std::collections::HashMap<String, String>,
}
