//! Markdown module for mdlive
//!
//! Handles caret-aware annotation of Markdown text:
//! - Line and inline syntax rules
//! - Fenced code block tracking across lines
//! - Requirement identifier detection
//! - Style schemes and HTML rendering of annotated lines

pub mod export;
pub mod patterns;
pub mod requirements;
pub mod syntax;
pub mod theme;

pub use export::{ExportError, ExportResult, HtmlExportOptions, HtmlExporter};
pub use requirements::RequirementIdPattern;
pub use syntax::{
    Annotation, FenceState, InlineAnnotator, LineAnnotations, LineSource, LineStyles, StrLines,
    StyleSink, StyleTag,
};
pub use theme::{Rgb, StyleScheme, TextStyle};
