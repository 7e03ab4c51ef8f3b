//! mdlive - caret-aware inline Markdown annotation
//!
//! The host editor owns the text and the caret. It reports caret moves and
//! text changes to an [`InlineAnnotator`], which restyles the affected lines
//! into a [`StyleSink`]: Markdown markers are dimmed except where the caret
//! is, and fenced code blocks are tracked line by line.

pub mod config;
pub mod editor;
pub mod error;
pub mod file_handler;
pub mod markdown;
pub mod utils;

pub use config::Config;
pub use editor::{LiveEditor, TextBuffer};
pub use error::{ConfigError, FileError};
pub use markdown::{
    Annotation, FenceState, InlineAnnotator, LineAnnotations, LineSource, LineStyles, StrLines,
    StyleSink, StyleTag,
};
