use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde_json::Value;

use crate::notebook::{Cell, CellType, Notebook, Output};

// "$$ but not \$$", anything not ending in "\", "$$".
static DISPLAY_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)[^\\](\$\$.*?[^\\]\$\$)").unwrap());

// "$ but not \$ or $$", anything not ending in "\", "$".
static INLINE_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)[^$\\](\$.*?[^\\]\$)").unwrap());

/// Prepares a notebook for Hugo export.
///
/// Three responsibilities:
///
/// 1.  Quote underscores in math mode. See
///     https://gohugo.io/content-management/formats/#issues-with-markdown
///     for context; this takes the "tedious" route of quoting them all.
/// 2.  Fill in default `hugo` metadata (date, title, draft).
/// 3.  Flatten image output filenames so figure references resolve next to
///     the exported file.
pub struct HugoPreprocessor {
    default_draft: bool,
}

impl Default for HugoPreprocessor {
    fn default() -> Self {
        Self {
            default_draft: true,
        }
    }
}

impl HugoPreprocessor {
    pub fn new(default_draft: bool) -> Self {
        Self { default_draft }
    }

    /// Runs every preprocessing step in place. `notebook_path` supplies the
    /// fallback date (file mtime) and title (file stem).
    pub fn preprocess(&self, notebook: &mut Notebook, notebook_path: &Path) -> std::io::Result<()> {
        self.set_default_metadata(notebook, notebook_path)?;
        for cell in &mut notebook.cells {
            preprocess_cell(cell);
        }
        assign_image_filenames(notebook);
        Ok(())
    }

    fn set_default_metadata(
        &self,
        notebook: &mut Notebook,
        notebook_path: &Path,
    ) -> std::io::Result<()> {
        let title = notebook_title(notebook)
            .unwrap_or_else(|| title_from_stem(notebook_path));
        let date = default_date(notebook_path)?;

        let hugo = &mut notebook.metadata.hugo;
        if is_unset(hugo.get("date")) {
            hugo.insert("date".to_string(), Value::String(date));
        }
        if is_unset(hugo.get("title")) {
            hugo.insert("title".to_string(), Value::String(title));
        }
        if hugo.get("draft").is_none_or(Value::is_null) {
            hugo.insert("draft".to_string(), Value::Bool(self.default_draft));
        }
        Ok(())
    }
}

fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        _ => false,
    }
}

// Hugo expects a date of YYYY-MM-DDTHH:MM:SS+-HH:MM.
fn default_date(notebook_path: &Path) -> std::io::Result<String> {
    let mtime = std::fs::metadata(notebook_path)?.modified()?;
    let date: DateTime<Local> = mtime.into();
    Ok(date.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
}

// "my_cool_post.ipynb" -> "My Cool Post".
fn title_from_stem(notebook_path: &Path) -> String {
    let stem = notebook_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    stem.split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// The first markdown heading in the notebook, if any. Preferred over the
/// filename-derived title when filling in a default.
fn notebook_title(notebook: &Notebook) -> Option<String> {
    for cell in &notebook.cells {
        if cell.cell_type != CellType::Markdown {
            continue;
        }

        let parser = Parser::new_ext(cell.source.as_str(), Options::all());
        let mut in_heading = false;
        let mut text_buf = String::new();
        for event in parser {
            match event {
                Event::Start(Tag::Heading { .. }) => in_heading = true,
                Event::End(TagEnd::Heading { .. }) => {
                    if !text_buf.is_empty() {
                        return Some(text_buf);
                    }
                    in_heading = false;
                }
                Event::Text(text) => {
                    if in_heading {
                        text_buf.push_str(&text);
                    }
                }
                _ => continue,
            }
        }
    }
    None
}

fn preprocess_cell(cell: &mut Cell) {
    match cell.cell_type {
        CellType::Markdown => {
            let mut source = cell.source.as_str().to_string();
            for latex in extract_latex(&source) {
                source = quote_underscores_in_latex(&source, &latex);
            }
            source = insert_newline_before_lists(&source);
            cell.source.set(source);
        }
        CellType::Code => {
            for output in &mut cell.outputs {
                let (Output::ExecuteResult { data, .. } | Output::DisplayData { data, .. }) =
                    output
                else {
                    continue;
                };
                if let Some(latex) = data.text("text/latex") {
                    data.set_text("text/latex", quote_underscores_in_latex(&latex, &latex));
                }
            }
        }
        CellType::Raw => {}
    }
}

/// Returns a copy of `text` where every `_` inside `latex` is replaced by
/// `\_`. `latex` must be a substring of `text`.
pub fn quote_underscores_in_latex(text: &str, latex: &str) -> String {
    let quoted_latex = latex.replace('_', r"\_");
    text.replace(latex, &quoted_latex)
}

/// The blocks of latex occurring in `markdown`, delimiters included:
/// display math first, then inline math. Inline math cannot span two
/// newlines, and `\$` is not a delimiter.
pub fn extract_latex(markdown: &str) -> Vec<String> {
    let mut out: Vec<String> = DISPLAY_MATH
        .captures_iter(markdown)
        .map(|c| c[1].to_string())
        .collect();

    // Strip display math first so its delimiters are not picked up again
    // as inline math.
    let mut remaining = markdown.to_string();
    for block in &out {
        remaining = remaining.replace(block.as_str(), "");
    }

    for paragraph in remaining.split("\n\n") {
        out.extend(
            INLINE_MATH
                .captures_iter(paragraph)
                .map(|c| c[1].to_string()),
        );
    }

    out
}

/// Inserts a blank line before a `*` list that directly follows a non-list
/// line, which markdown requires but notebook authors often omit.
pub fn insert_newline_before_lists(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.split('\n') {
        if line.starts_with("* ")
            && lines
                .last()
                .is_some_and(|prev| !prev.is_empty() && !prev.starts_with("* "))
        {
            lines.push(String::new());
        }
        lines.push(line.to_string());
    }
    lines.join("\n")
}

// Name PNG outputs that extraction upstream did not, and flatten whatever
// path they carry to ./<name> so the relative resolver finds them beside
// the exported markdown file.
fn assign_image_filenames(notebook: &mut Notebook) {
    for (cell_index, cell) in notebook.cells.iter_mut().enumerate() {
        for (output_index, output) in cell.outputs.iter_mut().enumerate() {
            let (Output::ExecuteResult { data, metadata } | Output::DisplayData { data, metadata }) =
                output
            else {
                continue;
            };
            if !data.contains("image/png") {
                continue;
            }

            let entry = metadata
                .filenames
                .entry("image/png".to_string())
                .or_insert_with(|| format!("output_{}_{}.png", cell_index, output_index));
            if let Some(name) = entry.rsplit('/').next() {
                let flattened = format!("./{}", name);
                *entry = flattened;
            }
        }
    }
}
