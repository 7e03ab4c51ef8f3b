//! HTML rendering of annotated documents
//!
//! Every line becomes a `<div class="md-line">`. Runs of text covered by the
//! same annotations become one `<span>` carrying the class of each tag, so
//! overlapping annotations such as heading text with bold inside simply
//! combine their classes.

use crate::markdown::syntax::{Annotation, LineSource, LineStyles};
use crate::markdown::theme::StyleScheme;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not write export to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Options for HTML export
#[derive(Debug, Clone)]
pub struct HtmlExportOptions {
    /// Wrap the lines in a complete page with embedded styles
    pub standalone: bool,
    /// Page title
    pub title: Option<String>,
}

impl Default for HtmlExportOptions {
    fn default() -> Self {
        Self {
            standalone: true,
            title: None,
        }
    }
}

/// Renders annotated lines as HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    scheme: StyleScheme,
}

impl HtmlExporter {
    pub fn new(scheme: StyleScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &StyleScheme {
        &self.scheme
    }

    /// Render one line with its annotations
    pub fn render_line(&self, text: &str, annotations: &[Annotation]) -> String {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();

        let mut bounds = vec![0, len];
        for annotation in annotations {
            bounds.push(annotation.start.min(len));
            bounds.push(annotation.end().min(len));
        }
        bounds.sort_unstable();
        bounds.dedup();

        let mut html = String::new();
        for pair in bounds.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let segment: String = chars[start..end].iter().collect();
            let classes: Vec<String> = annotations
                .iter()
                .filter(|a| a.start <= start && start < a.end())
                .map(|a| StyleScheme::css_class(a.style))
                .collect();

            if classes.is_empty() {
                html.push_str(&escape_html(&segment));
            } else {
                html.push_str(&format!(
                    r#"<span class="{}">{}</span>"#,
                    classes.join(" "),
                    escape_html(&segment)
                ));
            }
        }
        html
    }

    /// Render every line of a document as an HTML fragment
    pub fn render_document<S: LineSource + ?Sized>(&self, source: &S, styles: &LineStyles) -> String {
        let mut html = String::new();
        for line in 0..source.line_count() {
            html.push_str(r#"<div class="md-line">"#);
            html.push_str(&self.render_line(&source.line_text(line), styles.line(line)));
            html.push_str("</div>\n");
        }
        html
    }

    /// Render a document, optionally as a complete page
    pub fn export_html<S: LineSource + ?Sized>(
        &self,
        source: &S,
        styles: &LineStyles,
        options: &HtmlExportOptions,
    ) -> String {
        let body = self.render_document(source, styles);
        if !options.standalone {
            return body;
        }

        let title = options.title.as_deref().unwrap_or("Document");
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="generator" content="mdlive">
    <title>{}</title>
    <style>
{}    </style>
</head>
<body>
<article class="md-document">
{}</article>
</body>
</html>
"#,
            escape_html(title),
            self.scheme.to_css(),
            body
        )
    }

    /// Render a document and write it to `path`
    pub fn export_to_file<S: LineSource + ?Sized>(
        &self,
        source: &S,
        styles: &LineStyles,
        options: &HtmlExportOptions,
        path: &Path,
    ) -> ExportResult<()> {
        let html = self.export_html(source, styles, options);
        fs::write(path, html).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Exported HTML to {}", path.display());
        Ok(())
    }

    /// Suggested output path next to the input file
    pub fn suggest_output_path(input_path: &Path) -> PathBuf {
        input_path.with_extension("html")
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
