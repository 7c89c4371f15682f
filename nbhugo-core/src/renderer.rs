use crate::frontmatter::render_front_matter;
use crate::notebook::{Cell, Notebook, Output};

const CELL_START: &str = "{{% jupyter_cell_start ";
const CELL_END: &str = "{{% jupyter_cell_end %}}";
const INPUT_START: &str = "{{% jupyter_input_start %}}";
const INPUT_END: &str = "{{% jupyter_input_end %}}";

/// Maps an internal output filename to the URL the published site will
/// serve it from.
pub trait PathResolver {
    fn path2url(&self, filename: &str) -> String;
}

/// Resolves filenames relative to the exported markdown file, matching the
/// preprocessor's flattening of resource paths.
pub struct RelativePathResolver;

impl PathResolver for RelativePathResolver {
    fn path2url(&self, filename: &str) -> String {
        format!("./{}", base_name(filename))
    }
}

/// Resolves filenames under a fixed URL prefix, e.g. `/images`.
pub struct UrlPrefixResolver {
    prefix: String,
}

impl UrlPrefixResolver {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl PathResolver for UrlPrefixResolver {
    fn path2url(&self, filename: &str) -> String {
        format!(
            "{}/{}",
            self.prefix.trim_end_matches('/'),
            base_name(filename)
        )
    }
}

fn base_name(filename: &str) -> &str {
    let trimmed = filename.trim_start_matches("./");
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Renders a notebook as a Hugo markdown document: front-matter first, then
/// every cell in order, each wrapped in cell markers with its input wrapped
/// in input markers and its outputs following in order.
///
/// Rendering is a single pure pass over the document; rendering the same
/// notebook twice yields byte-identical output.
pub struct MarkdownRenderer<'a> {
    resolver: &'a dyn PathResolver,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(resolver: &'a dyn PathResolver) -> Self {
        Self { resolver }
    }

    pub fn render(&self, notebook: &Notebook) -> String {
        let mut out = render_front_matter(&notebook.metadata.hugo);
        for cell in &notebook.cells {
            out.push('\n');
            self.render_cell(cell, &mut out);
        }
        out
    }

    fn render_cell(&self, cell: &Cell, out: &mut String) {
        out.push_str(CELL_START);
        out.push_str(cell.cell_type.as_str());
        out.push_str(" %}}\n");

        // The input markers hug the source: the text between them passes
        // through unchanged.
        out.push_str(INPUT_START);
        out.push_str(cell.source.as_str());
        out.push_str(INPUT_END);
        out.push('\n');

        for output in &cell.outputs {
            self.render_output(output, out);
        }

        out.push_str(CELL_END);
        out.push('\n');
    }

    fn render_output(&self, output: &Output, out: &mut String) {
        match output {
            Output::Stream { text, .. } => push_text(out, text.as_str()),
            Output::Error {
                ename,
                evalue,
                traceback,
            } => {
                if traceback.is_empty() {
                    push_text(out, &format!("{}: {}", ename, evalue));
                } else {
                    push_text(out, &traceback.join("\n"));
                }
            }
            Output::ExecuteResult { data, metadata } | Output::DisplayData { data, metadata } => {
                if let Some(filename) = metadata.filenames.get("image/png") {
                    let url = self.resolver.path2url(filename);
                    out.push_str(&format!("{{{{< figure src=\"{}\" >}}}}\n", url));
                } else if let Some(text) = data
                    .text("text/markdown")
                    .or_else(|| data.text("text/latex"))
                    .or_else(|| data.text("text/plain"))
                {
                    push_text(out, &text);
                }
            }
        }
    }
}

fn push_text(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::Notebook;

    fn notebook(json: &str) -> Notebook {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn code_cell_wrapped_in_markers() {
        let nb = notebook(
            r#"{"cells": [{"cell_type": "code", "source": "print(1)"}]}"#,
        );
        let out = MarkdownRenderer::new(&RelativePathResolver).render(&nb);

        let start = out.find("{{% jupyter_cell_start code %}}").unwrap();
        let end = out.find("{{% jupyter_cell_end %}}").unwrap();
        assert!(start < end);
        assert!(out.contains("{{% jupyter_input_start %}}print(1){{% jupyter_input_end %}}"));
    }

    #[test]
    fn figure_shortcode_uses_resolved_url() {
        let nb = notebook(
            r#"{"cells": [{
                "cell_type": "code",
                "source": "plot()",
                "outputs": [{
                    "output_type": "display_data",
                    "data": {"image/png": "iVBORw0="},
                    "metadata": {"filenames": {"image/png": "fig1.png"}}
                }]
            }]}"#,
        );

        let resolver = UrlPrefixResolver::new("/images");
        let out = MarkdownRenderer::new(&resolver).render(&nb);
        assert!(out.contains("{{< figure src=\"/images/fig1.png\" >}}"));
    }

    #[test]
    fn cells_render_in_document_order() {
        let nb = notebook(
            r#"{"cells": [
                {"cell_type": "markdown", "source": "first"},
                {"cell_type": "code", "source": "second"},
                {"cell_type": "raw", "source": "third"}
            ]}"#,
        );
        let out = MarkdownRenderer::new(&RelativePathResolver).render(&nb);

        let first = out.find("first").unwrap();
        let second = out.find("second").unwrap();
        let third = out.find("third").unwrap();
        assert!(first < second && second < third);
        assert!(out.contains("{{% jupyter_cell_start markdown %}}"));
        assert!(out.contains("{{% jupyter_cell_start raw %}}"));
    }

    #[test]
    fn outputs_follow_input_in_order() {
        let nb = notebook(
            r#"{"cells": [{
                "cell_type": "code",
                "source": "print(1); plot()",
                "outputs": [
                    {"output_type": "stream", "name": "stdout", "text": "1\n"},
                    {
                        "output_type": "display_data",
                        "data": {"image/png": "iVBORw0="},
                        "metadata": {"filenames": {"image/png": "./fig.png"}}
                    }
                ]
            }]}"#,
        );
        let out = MarkdownRenderer::new(&RelativePathResolver).render(&nb);

        let input = out.find("{{% jupyter_input_end %}}").unwrap();
        let stream = out.find("1\n").unwrap();
        let figure = out.find("{{< figure src=\"./fig.png\" >}}").unwrap();
        let end = out.find("{{% jupyter_cell_end %}}").unwrap();
        assert!(input < stream && stream < figure && figure < end);
    }

    #[test]
    fn rendering_is_idempotent() {
        let nb = notebook(
            r#"{
                "metadata": {"hugo": {"title": "T", "draft": true}},
                "cells": [
                    {"cell_type": "markdown", "source": "hello"},
                    {"cell_type": "code", "source": "1 + 1", "outputs": [
                        {"output_type": "execute_result", "data": {"text/plain": "2"}}
                    ]}
                ]
            }"#,
        );
        let renderer = MarkdownRenderer::new(&RelativePathResolver);
        assert_eq!(renderer.render(&nb), renderer.render(&nb));
    }

    #[test]
    fn front_matter_precedes_cells() {
        let nb = notebook(
            r#"{
                "metadata": {"hugo": {"title": "Hello"}},
                "cells": [{"cell_type": "markdown", "source": "body"}]
            }"#,
        );
        let out = MarkdownRenderer::new(&RelativePathResolver).render(&nb);
        assert!(out.starts_with("---\ntitle: \"Hello\"\n---\n"));
    }

    #[test]
    fn error_output_renders_traceback() {
        let nb = notebook(
            r#"{"cells": [{
                "cell_type": "code",
                "source": "boom()",
                "outputs": [{
                    "output_type": "error",
                    "ename": "NameError",
                    "evalue": "name 'boom' is not defined",
                    "traceback": ["Traceback (most recent call last):", "NameError: name 'boom' is not defined"]
                }]
            }]}"#,
        );
        let out = MarkdownRenderer::new(&RelativePathResolver).render(&nb);
        assert!(out.contains("Traceback (most recent call last):\nNameError"));
    }

    #[test]
    fn relative_resolver_flattens_paths() {
        assert_eq!(RelativePathResolver.path2url("fig1.png"), "./fig1.png");
        assert_eq!(RelativePathResolver.path2url("./fig1.png"), "./fig1.png");
        assert_eq!(
            RelativePathResolver.path2url("output/nested/fig1.png"),
            "./fig1.png"
        );
    }
}
