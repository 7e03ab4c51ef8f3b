//! mdlive - annotate a Markdown document from the command line
//!
//! Entry point for the binary. Handles CLI argument parsing, logging
//! initialization, and prints the annotations an editor would apply with
//! the caret at a given offset.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mdlive::config::{Config, ThemePreference};
use mdlive::error::FileError;
use mdlive::file_handler::read_document;
use mdlive::markdown::{HtmlExportOptions, HtmlExporter, RequirementIdPattern, StyleScheme};
use mdlive::utils::path;
use mdlive::{Annotation, FenceState, InlineAnnotator, LineSource, LiveEditor, LineStyles};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "mdlive", version, about = "Caret-aware Markdown live-preview annotations")]
struct Cli {
    /// Markdown file to annotate
    file: PathBuf,

    /// Absolute char offset of the caret
    #[arg(short, long)]
    caret: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// List requirement IDs found in the document and exit
    #[arg(long)]
    ids: bool,

    /// Colour theme, overriding the configuration
    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ThemePreference {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Light => ThemePreference::Light,
            ThemeArg::Dark => ThemePreference::Dark,
        }
    }
}

/// One line of JSON output
#[derive(Serialize)]
struct LineReport<'a> {
    line: usize,
    start: usize,
    text: String,
    end_state: FenceState,
    annotations: &'a [Annotation],
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        match err.downcast_ref::<FileError>() {
            Some(file_err) => eprintln!("Error: {}", file_err.user_message()),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}

/// Initialize the logging system
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info,mdlive=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => Config::load().unwrap_or_else(|err| {
            log::warn!("Ignoring configuration: {}", err);
            Config::default()
        }),
    };
    if let Some(theme) = cli.theme {
        config.theme.theme = theme.into();
    }

    if !path::is_markdown(&cli.file) {
        log::warn!("{} does not look like a Markdown file", cli.file.display());
    }
    let document = read_document(&cli.file, config.files.max_file_size)?;
    let text = document.content;
    log::info!(
        "Annotating {} ({} bytes, {:?})",
        cli.file.display(),
        document.size_bytes,
        document.encoding
    );

    let output = cli
        .output
        .as_deref()
        .map(|path| resolve_output(path, &cli.file, cli.format));

    if cli.ids {
        let pattern = RequirementIdPattern::new(&config.annotator.requirement_id_pattern)?;
        let ids = pattern.detect(&text);
        return emit(output.as_deref(), &ids.join("\n"));
    }

    let annotator = InlineAnnotator::from_config(&config.annotator)?;
    let mut editor = LiveEditor::with_sink(&text, annotator, LineStyles::new());
    if let Some(caret) = cli.caret {
        editor.set_caret(caret);
    }

    match cli.format {
        OutputFormat::Text => emit(output.as_deref(), &render_text(&editor)),
        OutputFormat::Json => emit(output.as_deref(), &render_json(&editor)?),
        OutputFormat::Html => {
            let exporter = HtmlExporter::new(StyleScheme::from_config(&config.theme));
            let options = HtmlExportOptions {
                standalone: true,
                title: Some(path::display_name(&cli.file)),
            };
            match output {
                Some(path) => {
                    exporter.export_to_file(editor.buffer(), editor.sink(), &options, &path)?
                }
                None => emit(
                    None,
                    &exporter.export_html(editor.buffer(), editor.sink(), &options),
                )?,
            }
            Ok(())
        }
    }
}

/// Output file for `-o`; a directory gets a file named after the input
fn resolve_output(output: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    if !output.is_dir() {
        return output.to_path_buf();
    }
    let suggested = match format {
        OutputFormat::Html => HtmlExporter::suggest_output_path(input),
        OutputFormat::Json => input.with_extension("json"),
        OutputFormat::Text => input.with_extension("txt"),
    };
    match suggested.file_name() {
        Some(name) => output.join(name),
        None => output.join("mdlive-output"),
    }
}

fn render_text(editor: &LiveEditor) -> String {
    let buffer = editor.buffer();
    let mut out = String::new();
    for line in 0..buffer.line_count() {
        let state = editor.annotator().line_state(line).unwrap_or_default();
        let spans: Vec<String> = editor
            .sink()
            .line(line)
            .iter()
            .map(|a| format!("{}..{} {}", a.start, a.end(), a.style))
            .collect();
        out.push_str(&format!(
            "{:>4} [{}] {}\n",
            line,
            state.as_i32(),
            buffer.line_text(line)
        ));
        for span in spans {
            out.push_str(&format!("       {}\n", span));
        }
    }
    out
}

fn render_json(editor: &LiveEditor) -> Result<String> {
    let buffer = editor.buffer();
    let reports: Vec<LineReport> = (0..buffer.line_count())
        .map(|line| LineReport {
            line,
            start: buffer.line_start(line),
            text: buffer.line_text(line).into_owned(),
            end_state: editor.annotator().line_state(line).unwrap_or_default(),
            annotations: editor.sink().line(line),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&reports)?)
}

fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).map_err(|source| FileError::WriteError {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", content.trim_end_matches('\n'))?;
        }
    }
    Ok(())
}
