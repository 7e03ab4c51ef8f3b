//! Caret-aware inline Markdown annotation
//!
//! Each line of a document is annotated on its own: line-level constructs
//! (headings, list items, blockquotes), inline constructs (strong and
//! regular emphasis, code spans) and requirement identifiers. Syntax markers
//! are dimmed unless the caret sits inside them. The only state carried
//! between lines is whether a line ends inside a fenced code block, so lines
//! must be processed top to bottom whenever that state may have changed.

use crate::config::AnnotatorConfig;
use crate::error::ConfigResult;
use crate::markdown::patterns::{
    is_fence, BLOCKQUOTE_RE, BOLD_RE, HEADING_RE, INLINE_CODE_RE, ORDERED_LIST_RE,
    UNORDERED_LIST_RE,
};
use crate::markdown::requirements::RequirementIdPattern;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Visual role of an annotated span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StyleTag {
    /// Emphasis, code span or heading marker hidden away from the caret
    MarkerDim,
    Bold,
    Italic,
    InlineCode,
    /// Heading text, level 1 through 6
    HeadingContent { level: u8 },
    ListMarkerDim,
    BlockquoteMarkerDim,
    BlockquoteText,
    /// A whole line belonging to a fenced code block, fences included
    FenceCodeLine,
    RequirementId,
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleTag::MarkerDim => write!(f, "marker-dim"),
            StyleTag::Bold => write!(f, "bold"),
            StyleTag::Italic => write!(f, "italic"),
            StyleTag::InlineCode => write!(f, "inline-code"),
            StyleTag::HeadingContent { level } => write!(f, "heading-content({})", level),
            StyleTag::ListMarkerDim => write!(f, "list-marker-dim"),
            StyleTag::BlockquoteMarkerDim => write!(f, "blockquote-marker-dim"),
            StyleTag::BlockquoteText => write!(f, "blockquote-text"),
            StyleTag::FenceCodeLine => write!(f, "fence-code-line"),
            StyleTag::RequirementId => write!(f, "requirement-id"),
        }
    }
}

/// A styled span within one line, in chars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Start offset within the line
    pub start: usize,
    /// Length of the span
    pub len: usize,
    pub style: StyleTag,
}

impl Annotation {
    pub fn new(start: usize, len: usize, style: StyleTag) -> Self {
        Self { start, len, style }
    }

    /// End offset within the line (exclusive)
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn overlaps(&self, other: &Annotation) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// State carried from the end of one line to the start of the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FenceState {
    #[default]
    Normal,
    InFence,
}

impl FenceState {
    /// Numeric block state, 0 for normal and 1 inside a fence
    pub fn as_i32(self) -> i32 {
        match self {
            FenceState::Normal => 0,
            FenceState::InFence => 1,
        }
    }

    /// State after a line, given the state before it
    pub fn after_line(self, text: &str) -> FenceState {
        match (self, is_fence(text)) {
            (FenceState::Normal, true) => FenceState::InFence,
            (FenceState::InFence, true) => FenceState::Normal,
            (state, false) => state,
        }
    }
}

/// Result of annotating one line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAnnotations {
    /// Annotations sorted by start offset
    pub annotations: Vec<Annotation>,
    /// Fence state at the end of the line
    pub end_state: FenceState,
}

/// Read access to the host's document
pub trait LineSource {
    /// Number of lines; an empty document has one empty line
    fn line_count(&self) -> usize;

    /// Text of a line without its newline
    fn line_text(&self, line: usize) -> Cow<'_, str>;

    /// Absolute char offset of the first char of a line
    fn line_start(&self, line: usize) -> usize;

    /// Line containing an absolute char offset, clamped to the last line
    fn line_of_offset(&self, offset: usize) -> usize;
}

/// Receiver of annotations, typically the host's renderer
pub trait StyleSink {
    /// Drop every style previously applied to a line
    fn clear_line(&mut self, line: usize);

    /// Style a span of a line
    fn apply_style(&mut self, line: usize, annotation: &Annotation);

    /// The document now has `count` lines
    fn set_line_count(&mut self, _count: usize) {}
}

/// Lines of a borrowed string, split on `\n`
#[derive(Debug, Clone)]
pub struct StrLines<'a> {
    lines: Vec<&'a str>,
    starts: Vec<usize>,
}

impl<'a> StrLines<'a> {
    pub fn new(text: &'a str) -> Self {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut starts = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in &lines {
            starts.push(offset);
            offset += line.chars().count() + 1;
        }
        Self { lines, starts }
    }
}

impl LineSource for StrLines<'_> {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_text(&self, line: usize) -> Cow<'_, str> {
        Cow::Borrowed(self.lines.get(line).copied().unwrap_or(""))
    }

    fn line_start(&self, line: usize) -> usize {
        self.starts.get(line).copied().unwrap_or(0)
    }

    fn line_of_offset(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1)
    }
}

/// Current annotations of every line, kept as a sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStyles {
    lines: Vec<Vec<Annotation>>,
}

impl LineStyles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotations of a line, empty when unknown
    pub fn line(&self, line: usize) -> &[Annotation] {
        self.lines.get(line).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Annotation]> {
        self.lines.iter().map(Vec::as_slice)
    }

    fn ensure_line(&mut self, line: usize) -> &mut Vec<Annotation> {
        if self.lines.len() <= line {
            self.lines.resize_with(line + 1, Vec::new);
        }
        &mut self.lines[line]
    }
}

impl StyleSink for LineStyles {
    fn clear_line(&mut self, line: usize) {
        self.ensure_line(line).clear();
    }

    fn apply_style(&mut self, line: usize, annotation: &Annotation) {
        self.ensure_line(line).push(*annotation);
    }

    fn set_line_count(&mut self, count: usize) {
        self.lines.resize_with(count, Vec::new);
    }
}

/// Byte to char offset conversion for one line
struct LineText<'a> {
    text: &'a str,
    /// Char index at each byte boundary; empty for ASCII lines
    char_at_byte: Vec<usize>,
}

impl<'a> LineText<'a> {
    fn new(text: &'a str) -> Self {
        let char_at_byte = if text.is_ascii() {
            Vec::new()
        } else {
            let mut table = vec![0; text.len() + 1];
            let mut count = 0;
            for (byte, _) in text.char_indices() {
                table[byte] = count;
                count += 1;
            }
            table[text.len()] = count;
            table
        };
        Self { text, char_at_byte }
    }

    fn to_char(&self, byte: usize) -> usize {
        if self.char_at_byte.is_empty() {
            byte
        } else {
            self.char_at_byte[byte]
        }
    }

    fn chars(&self, bytes: Range<usize>) -> Range<usize> {
        self.to_char(bytes.start)..self.to_char(bytes.end)
    }

    fn char_len(&self) -> usize {
        self.to_char(self.text.len())
    }
}

/// Collects the annotations of one line
struct LineBuilder<'a> {
    line: LineText<'a>,
    line_start: usize,
    caret: usize,
    annotations: Vec<Annotation>,
}

impl LineBuilder<'_> {
    /// Whether the caret lies in a line-relative char span
    fn caret_within(&self, span: &Range<usize>) -> bool {
        self.line_start + span.start <= self.caret && self.caret < self.line_start + span.end
    }

    fn push(&mut self, span: Range<usize>, style: StyleTag) {
        if span.start < span.end {
            self.annotations
                .push(Annotation::new(span.start, span.end - span.start, style));
        }
    }

    fn push_bytes(&mut self, bytes: Range<usize>, style: StyleTag) {
        let span = self.line.chars(bytes);
        self.push(span, style);
    }

    /// Dim a marker unless the caret is inside `reveal`
    fn push_marker(&mut self, marker: Range<usize>, reveal: Range<usize>, style: StyleTag) {
        let reveal = self.line.chars(reveal);
        if !self.caret_within(&reveal) {
            self.push_bytes(marker, style);
        }
    }

    /// Dimmed delimiters around styled content; `full` and `inner` are
    /// byte ranges with `full` enclosing `inner`
    fn push_delimited(&mut self, full: Range<usize>, inner: Range<usize>, style: StyleTag) {
        self.push_marker(full.start..inner.start, full.clone(), StyleTag::MarkerDim);
        self.push_bytes(inner.clone(), style);
        self.push_marker(inner.end..full.end, full, StyleTag::MarkerDim);
    }

    fn finish(mut self, end_state: FenceState) -> LineAnnotations {
        self.annotations.sort_by_key(|a| a.start);
        LineAnnotations {
            annotations: self.annotations,
            end_state,
        }
    }
}

/// Incremental, caret-aware Markdown annotator
///
/// The host owns the text and the caret. It reports caret moves and text
/// changes, and the annotator reprocesses the affected lines into a
/// [`StyleSink`]. Fence state is kept per line so that any single line can
/// be reprocessed without rescanning the document.
#[derive(Debug, Clone, Default)]
pub struct InlineAnnotator {
    caret: usize,
    /// Fence state at the end of each line, valid for a prefix of the document
    line_states: Vec<FenceState>,
    requirement_ids: Option<RequirementIdPattern>,
}

impl InlineAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an annotator from configuration
    pub fn from_config(config: &AnnotatorConfig) -> ConfigResult<Self> {
        let mut annotator = Self::new();
        if config.highlight_requirement_ids {
            annotator.requirement_ids =
                Some(RequirementIdPattern::new(&config.requirement_id_pattern)?);
        }
        Ok(annotator)
    }

    pub fn requirement_ids(&self) -> Option<&RequirementIdPattern> {
        self.requirement_ids.as_ref()
    }

    /// Absolute char offset of the caret
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Record the caret position. Nothing is recomputed until the next
    /// reprocessing call.
    pub fn set_caret(&mut self, offset: usize) {
        self.caret = offset;
    }

    /// Known fence state at the end of a line
    pub fn line_state(&self, line: usize) -> Option<FenceState> {
        self.line_states.get(line).copied()
    }

    /// Forget fence states from `line` onward
    pub fn invalidate_from_line(&mut self, line: usize) {
        self.line_states.truncate(line);
    }

    /// Annotate one line given its absolute start offset and the fence state
    /// it starts in
    pub fn annotate_line(&self, text: &str, line_start: usize, incoming: FenceState) -> LineAnnotations {
        let mut builder = LineBuilder {
            line: LineText::new(text),
            line_start,
            caret: self.caret,
            annotations: Vec::new(),
        };
        let end_state = incoming.after_line(text);

        if incoming == FenceState::InFence || end_state == FenceState::InFence {
            let len = builder.line.char_len();
            builder.push(0..len, StyleTag::FenceCodeLine);
            return builder.finish(end_state);
        }

        let body_start = Self::annotate_block(&mut builder);
        self.annotate_inline(&mut builder, body_start);
        builder.finish(end_state)
    }

    /// Heading, list item or blockquote, first match wins. Returns the byte
    /// offset where the remaining text begins.
    fn annotate_block(builder: &mut LineBuilder<'_>) -> usize {
        let text = builder.line.text;

        if let Some(caps) = HEADING_RE.captures(text) {
            let Some(marker) = caps.get(2) else {
                return 0;
            };
            let level = marker.as_str().trim_end().len() as u8;
            builder.push_marker(marker.range(), marker.range(), StyleTag::MarkerDim);
            builder.push_bytes(marker.end()..text.len(), StyleTag::HeadingContent { level });
            return marker.end();
        }

        if let Some(marker) = UNORDERED_LIST_RE
            .find(text)
            .or_else(|| ORDERED_LIST_RE.find(text))
        {
            builder.push_marker(marker.range(), marker.range(), StyleTag::ListMarkerDim);
            return marker.end();
        }

        if let Some(caps) = BLOCKQUOTE_RE.captures(text) {
            let Some(marker) = caps.get(2) else {
                return 0;
            };
            builder.push_marker(marker.range(), marker.range(), StyleTag::BlockquoteMarkerDim);
            builder.push_bytes(marker.end()..text.len(), StyleTag::BlockquoteText);
            return marker.end();
        }

        0
    }

    /// Code spans, emphasis and requirement identifiers after `body_start`
    fn annotate_inline(&self, builder: &mut LineBuilder<'_>, body_start: usize) {
        let text = builder.line.text;
        let body = &text[body_start..];
        let shift = |r: Range<usize>| r.start + body_start..r.end + body_start;

        let mut code_spans = Vec::new();
        for caps in INLINE_CODE_RE.captures_iter(body) {
            if let (Some(full), Some(inner)) = (caps.get(0), caps.get(1)) {
                builder.push_delimited(shift(full.range()), shift(inner.range()), StyleTag::InlineCode);
                code_spans.push(full.range());
            }
        }

        // Delimiters inside code spans are literal text
        let masked = mask_ranges(body, &code_spans);

        for caps in BOLD_RE.captures_iter(&masked) {
            if let (Some(full), Some(inner)) = (caps.get(0), caps.get(1)) {
                builder.push_delimited(shift(full.range()), shift(inner.range()), StyleTag::Bold);
            }
        }

        for (full, inner) in italic_spans(&masked) {
            builder.push_delimited(shift(full), shift(inner), StyleTag::Italic);
        }

        if let Some(pattern) = &self.requirement_ids {
            let body_char = builder.line.to_char(body_start);
            for span in pattern.spans(body) {
                builder.push(span.start + body_char..span.end + body_char, StyleTag::RequirementId);
            }
        }
    }

    /// Fence state a line starts in, folding unknown predecessors first
    fn incoming_state<S: LineSource + ?Sized>(&mut self, source: &S, line: usize) -> FenceState {
        while self.line_states.len() < line {
            let index = self.line_states.len();
            let before = self.line_states.last().copied().unwrap_or_default();
            let after = before.after_line(&source.line_text(index));
            self.line_states.push(after);
        }
        match line {
            0 => FenceState::Normal,
            _ => self.line_states[line - 1],
        }
    }

    /// Annotate one line of the host document and record its end state
    pub fn reprocess_line<S: LineSource + ?Sized>(&mut self, source: &S, line: usize) -> LineAnnotations {
        if line >= source.line_count() {
            return LineAnnotations::default();
        }
        let incoming = self.incoming_state(source, line);
        let text = source.line_text(line);
        let result = self.annotate_line(&text, source.line_start(line), incoming);

        if result.end_state != incoming {
            log::trace!(
                "line {} {} a fence",
                line,
                if incoming == FenceState::Normal { "opens" } else { "closes" }
            );
        }

        match self.line_states.get(line).copied() {
            Some(known) if known == result.end_state => {}
            Some(_) => {
                // Later states were derived from a different end state
                self.line_states.truncate(line);
                self.line_states.push(result.end_state);
            }
            None => self.line_states.push(result.end_state),
        }
        result
    }

    /// Reprocess a line and hand its annotations to the sink
    fn restyle_line<S, K>(&mut self, source: &S, line: usize, sink: &mut K) -> FenceState
    where
        S: LineSource + ?Sized,
        K: StyleSink + ?Sized,
    {
        let result = self.reprocess_line(source, line);
        sink.clear_line(line);
        for annotation in &result.annotations {
            sink.apply_style(line, annotation);
        }
        result.end_state
    }

    /// The caret moved from `previous_line` to `current_line`. Only these
    /// two lines are restyled.
    pub fn on_caret_moved<S, K>(
        &mut self,
        source: &S,
        previous_line: usize,
        current_line: usize,
        sink: &mut K,
    ) where
        S: LineSource + ?Sized,
        K: StyleSink + ?Sized,
    {
        let count = source.line_count();
        let (first, second) = if previous_line <= current_line {
            (previous_line, current_line)
        } else {
            (current_line, previous_line)
        };
        if first < count {
            self.restyle_line(source, first, sink);
        }
        if second != first && second < count {
            self.restyle_line(source, second, sink);
        }
    }

    /// Text changed starting at `first_changed_line`; restyle from there to
    /// the end of the document in order
    pub fn on_text_changed<S, K>(&mut self, source: &S, first_changed_line: usize, sink: &mut K)
    where
        S: LineSource + ?Sized,
        K: StyleSink + ?Sized,
    {
        let count = source.line_count();
        let first = first_changed_line.min(count);
        log::debug!("Restyling lines {}..{}", first, count);

        self.invalidate_from_line(first);
        sink.set_line_count(count);
        for line in first..count {
            self.restyle_line(source, line, sink);
        }
    }

    /// Restyle the whole document
    pub fn rehighlight<S, K>(&mut self, source: &S, sink: &mut K)
    where
        S: LineSource + ?Sized,
        K: StyleSink + ?Sized,
    {
        self.on_text_changed(source, 0, sink);
    }
}

/// Replace every byte inside `ranges` with a space, keeping offsets intact
fn mask_ranges<'a>(text: &'a str, ranges: &[Range<usize>]) -> Cow<'a, str> {
    if ranges.is_empty() {
        return Cow::Borrowed(text);
    }
    let mut masked = String::with_capacity(text.len());
    let mut pos = 0;
    for range in ranges {
        masked.push_str(&text[pos..range.start]);
        masked.extend(std::iter::repeat(' ').take(range.len()));
        pos = range.end;
    }
    masked.push_str(&text[pos..]);
    Cow::Owned(masked)
}

/// Single-star emphasis as `(full, inner)` byte ranges.
///
/// A delimiter is a lone `*` with no `*` on either side. Longer runs belong
/// to strong emphasis and are skipped, so each delimiter pairs with the next
/// lone star on the line. One left-to-right pass.
fn italic_spans(text: &str) -> Vec<(Range<usize>, Range<usize>)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'*' {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i] == b'*' {
            i += 1;
        }
        if i - start != 1 {
            continue;
        }
        match open.take() {
            Some(opening) => spans.push((opening..i, opening + 1..start)),
            None => open = Some(start),
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate(text: &str, caret: usize) -> LineAnnotations {
        let mut annotator = InlineAnnotator::new();
        annotator.set_caret(caret);
        annotator.annotate_line(text, 0, FenceState::Normal)
    }

    fn styles(result: &LineAnnotations) -> Vec<(usize, usize, StyleTag)> {
        result
            .annotations
            .iter()
            .map(|a| (a.start, a.len, a.style))
            .collect()
    }

    #[test]
    fn test_heading_marker_and_content() {
        let result = annotate("## Section", 100);
        assert_eq!(
            styles(&result),
            vec![
                (0, 3, StyleTag::MarkerDim),
                (3, 7, StyleTag::HeadingContent { level: 2 }),
            ]
        );
        assert_eq!(result.end_state, FenceState::Normal);
    }

    #[test]
    fn test_heading_indent_is_not_marker() {
        let result = annotate("   ###### Deep", 100);
        assert_eq!(result.annotations[0], Annotation::new(3, 7, StyleTag::MarkerDim));
        assert_eq!(result.annotations[1].style, StyleTag::HeadingContent { level: 6 });
    }

    #[test]
    fn test_heading_caret_boundary() {
        let mut annotator = InlineAnnotator::new();
        let dimmed = |annotator: &InlineAnnotator| {
            annotator
                .annotate_line("# Title", 10, FenceState::Normal)
                .annotations
                .iter()
                .any(|a| a.style == StyleTag::MarkerDim)
        };

        annotator.set_caret(10);
        assert!(!dimmed(&annotator));
        annotator.set_caret(11);
        assert!(!dimmed(&annotator));
        annotator.set_caret(9);
        assert!(dimmed(&annotator));
        annotator.set_caret(12);
        assert!(dimmed(&annotator));
    }

    #[test]
    fn test_heading_wins_over_list() {
        let result = annotate("# - not a list", 100);
        assert!(result
            .annotations
            .iter()
            .all(|a| a.style != StyleTag::ListMarkerDim));
        assert_eq!(result.annotations[1].style, StyleTag::HeadingContent { level: 1 });
    }

    #[test]
    fn test_list_markers_include_indent() {
        assert_eq!(
            styles(&annotate("  -  item", 100)),
            vec![(0, 5, StyleTag::ListMarkerDim)]
        );
        assert_eq!(
            styles(&annotate("10) item", 100)),
            vec![(0, 4, StyleTag::ListMarkerDim)]
        );
        assert!(annotate("-item", 100).annotations.is_empty());
    }

    #[test]
    fn test_list_marker_revealed_under_caret() {
        assert!(annotate("- item", 1).annotations.is_empty());
        assert_eq!(annotate("- item", 2).annotations.len(), 1);
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            styles(&annotate("> quoted", 100)),
            vec![
                (0, 2, StyleTag::BlockquoteMarkerDim),
                (2, 6, StyleTag::BlockquoteText),
            ]
        );
        assert_eq!(
            styles(&annotate("> quoted", 0)),
            vec![(2, 6, StyleTag::BlockquoteText)]
        );
    }

    #[test]
    fn test_inline_spans_do_not_overlap() {
        let result = annotate("**bold** and *italic* and `code`", 100);
        assert_eq!(
            styles(&result),
            vec![
                (0, 2, StyleTag::MarkerDim),
                (2, 4, StyleTag::Bold),
                (6, 2, StyleTag::MarkerDim),
                (13, 1, StyleTag::MarkerDim),
                (14, 6, StyleTag::Italic),
                (20, 1, StyleTag::MarkerDim),
                (26, 1, StyleTag::MarkerDim),
                (27, 4, StyleTag::InlineCode),
                (31, 1, StyleTag::MarkerDim),
            ]
        );
        for (i, a) in result.annotations.iter().enumerate() {
            for b in &result.annotations[i + 1..] {
                assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_caret_reveals_only_enclosing_delimiters() {
        let result = annotate("**a** *b*", 3);
        let dims: Vec<usize> = result
            .annotations
            .iter()
            .filter(|a| a.style == StyleTag::MarkerDim)
            .map(|a| a.start)
            .collect();
        assert_eq!(dims, vec![6, 8]);

        // The caret right after the closing delimiter is outside the span
        let result = annotate("**a** *b*", 5);
        let dims: Vec<usize> = result
            .annotations
            .iter()
            .filter(|a| a.style == StyleTag::MarkerDim)
            .map(|a| a.start)
            .collect();
        assert_eq!(dims, vec![0, 3, 6, 8]);
    }

    #[test]
    fn test_bold_content_may_contain_stars() {
        assert_eq!(
            styles(&annotate("**a*b**", 100)),
            vec![
                (0, 2, StyleTag::MarkerDim),
                (2, 3, StyleTag::Bold),
                (5, 2, StyleTag::MarkerDim),
            ]
        );
    }

    #[test]
    fn test_italic_inside_bold() {
        assert_eq!(
            styles(&annotate("**x *y* z**", 100)),
            vec![
                (0, 2, StyleTag::MarkerDim),
                (2, 7, StyleTag::Bold),
                (4, 1, StyleTag::MarkerDim),
                (5, 1, StyleTag::Italic),
                (6, 1, StyleTag::MarkerDim),
                (9, 2, StyleTag::MarkerDim),
            ]
        );
    }

    #[test]
    fn test_italic_spans_across_double_stars() {
        assert_eq!(
            styles(&annotate("*see **this** now*", 100)),
            vec![
                (0, 1, StyleTag::MarkerDim),
                (1, 16, StyleTag::Italic),
                (5, 2, StyleTag::MarkerDim),
                (7, 4, StyleTag::Bold),
                (11, 2, StyleTag::MarkerDim),
                (17, 1, StyleTag::MarkerDim),
            ]
        );
        assert_eq!(
            styles(&annotate("*a ** b*", 100)),
            vec![
                (0, 1, StyleTag::MarkerDim),
                (1, 6, StyleTag::Italic),
                (7, 1, StyleTag::MarkerDim),
            ]
        );
    }

    #[test]
    fn test_long_delimiter_lines() {
        let italic = "*a".repeat(50_000);
        let result = annotate(&italic, 0);
        assert_eq!(
            result
                .annotations
                .iter()
                .filter(|a| a.style == StyleTag::Italic)
                .count(),
            25_000
        );

        let mixed = "**a`*".repeat(20_000);
        let ticks = "`".repeat(100_000);
        for line in [&italic, &mixed, &ticks] {
            let result = annotate(line, 0);
            let len = line.chars().count();
            assert!(result.annotations.iter().all(|a| a.len > 0 && a.end() <= len));
            assert!(result.annotations.windows(2).all(|w| w[0].start <= w[1].start));
        }
    }

    #[test]
    fn test_italic_ignores_star_runs() {
        let result = annotate("***x*** and **y*", 100);
        assert!(result.annotations.iter().all(|a| a.style != StyleTag::Italic));
    }

    #[test]
    fn test_italic_skips_unpaired_delimiter() {
        let result = annotate("a ** b *c*", 100);
        let italic: Vec<_> = result
            .annotations
            .iter()
            .filter(|a| a.style == StyleTag::Italic)
            .collect();
        assert_eq!(italic, vec![&Annotation::new(8, 1, StyleTag::Italic)]);
    }

    #[test]
    fn test_code_span_hides_emphasis() {
        let result = annotate("`*a*` then *b*", 100);
        let italic: Vec<_> = result
            .annotations
            .iter()
            .filter(|a| a.style == StyleTag::Italic)
            .map(|a| a.start)
            .collect();
        assert_eq!(italic, vec![12]);
    }

    #[test]
    fn test_code_inside_bold_keeps_both() {
        let result = annotate("**a `b` c**", 100);
        assert!(result.annotations.iter().any(|a| a.style == StyleTag::Bold));
        assert!(result.annotations.iter().any(|a| a.style == StyleTag::InlineCode));
    }

    #[test]
    fn test_emphasis_scanned_after_list_marker() {
        let result = annotate("* item *x*", 100);
        assert_eq!(
            styles(&result),
            vec![
                (0, 2, StyleTag::ListMarkerDim),
                (7, 1, StyleTag::MarkerDim),
                (8, 1, StyleTag::Italic),
                (9, 1, StyleTag::MarkerDim),
            ]
        );
    }

    #[test]
    fn test_offsets_are_chars() {
        let result = annotate("# Å **ö**", 100);
        assert_eq!(
            styles(&result),
            vec![
                (0, 2, StyleTag::MarkerDim),
                (2, 7, StyleTag::HeadingContent { level: 1 }),
                (4, 2, StyleTag::MarkerDim),
                (6, 1, StyleTag::Bold),
                (7, 2, StyleTag::MarkerDim),
            ]
        );
    }

    #[test]
    fn test_fence_lines() {
        let annotator = InlineAnnotator::new();
        let open = annotator.annotate_line("```py", 0, FenceState::Normal);
        assert_eq!(open.end_state, FenceState::InFence);
        assert_eq!(styles(&open), vec![(0, 5, StyleTag::FenceCodeLine)]);

        let inside = annotator.annotate_line("# not a heading", 6, FenceState::InFence);
        assert_eq!(inside.end_state, FenceState::InFence);
        assert_eq!(styles(&inside), vec![(0, 15, StyleTag::FenceCodeLine)]);

        let empty = annotator.annotate_line("", 22, FenceState::InFence);
        assert!(empty.annotations.is_empty());
        assert_eq!(empty.end_state, FenceState::InFence);

        let close = annotator.annotate_line("  ```", 23, FenceState::InFence);
        assert_eq!(close.end_state, FenceState::Normal);
        assert_eq!(styles(&close), vec![(0, 5, StyleTag::FenceCodeLine)]);
    }

    #[test]
    fn test_plain_line_has_no_annotations() {
        let result = annotate("just text", 0);
        assert!(result.annotations.is_empty());
        assert_eq!(result.end_state, FenceState::Normal);
    }

    #[test]
    fn test_requirement_ids() {
        let annotator = InlineAnnotator::from_config(&AnnotatorConfig::default()).unwrap();
        let result = annotator.annotate_line("ID: Y10K-P-A-HL-001", 0, FenceState::Normal);
        assert_eq!(styles(&result), vec![(4, 15, StyleTag::RequirementId)]);

        let disabled = AnnotatorConfig {
            highlight_requirement_ids: false,
            ..AnnotatorConfig::default()
        };
        let annotator = InlineAnnotator::from_config(&disabled).unwrap();
        assert!(annotator.requirement_ids().is_none());
    }

    #[test]
    fn test_reprocess_line_is_idempotent() {
        let lines = StrLines::new("# Title\n**bold** *it*");
        let mut annotator = InlineAnnotator::new();
        annotator.set_caret(9);
        let first = annotator.reprocess_line(&lines, 1);
        let second = annotator.reprocess_line(&lines, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reprocess_line_folds_predecessors() {
        let lines = StrLines::new("```\ncode\n```\n# after");
        let mut annotator = InlineAnnotator::new();
        let result = annotator.reprocess_line(&lines, 1);
        assert_eq!(styles(&result), vec![(0, 4, StyleTag::FenceCodeLine)]);
        assert_eq!(annotator.line_state(0), Some(FenceState::InFence));

        let heading = annotator.reprocess_line(&lines, 3);
        assert_eq!(heading.annotations[1].style, StyleTag::HeadingContent { level: 1 });
        assert_eq!(annotator.line_state(2), Some(FenceState::Normal));
    }

    #[test]
    fn test_reprocess_out_of_range_line() {
        let lines = StrLines::new("one");
        let mut annotator = InlineAnnotator::new();
        assert_eq!(annotator.reprocess_line(&lines, 5), LineAnnotations::default());
    }

    #[test]
    fn test_str_lines_offsets() {
        let lines = StrLines::new("ab\nÅö\n");
        assert_eq!(lines.line_count(), 3);
        assert_eq!(lines.line_start(1), 3);
        assert_eq!(lines.line_start(2), 6);
        assert_eq!(lines.line_of_offset(2), 0);
        assert_eq!(lines.line_of_offset(3), 1);
        assert_eq!(lines.line_of_offset(100), 2);
        assert_eq!(lines.line_text(1), "Åö");
    }

    #[derive(Default)]
    struct CountingSink {
        restyled: Vec<usize>,
    }

    impl StyleSink for CountingSink {
        fn clear_line(&mut self, line: usize) {
            self.restyled.push(line);
        }

        fn apply_style(&mut self, _line: usize, _annotation: &Annotation) {}
    }

    #[test]
    fn test_caret_move_restyles_two_lines() {
        let lines = StrLines::new("# a\nb\n**c**\nd");
        let mut annotator = InlineAnnotator::new();
        let mut sink = CountingSink::default();

        annotator.on_caret_moved(&lines, 2, 0, &mut sink);
        assert_eq!(sink.restyled, vec![0, 2]);

        sink.restyled.clear();
        annotator.on_caret_moved(&lines, 3, 3, &mut sink);
        assert_eq!(sink.restyled, vec![3]);

        sink.restyled.clear();
        annotator.on_caret_moved(&lines, 9, 1, &mut sink);
        assert_eq!(sink.restyled, vec![1]);
    }

    #[test]
    fn test_text_changed_restyles_to_end() {
        let lines = StrLines::new("a\nb\nc");
        let mut annotator = InlineAnnotator::new();
        let mut sink = CountingSink::default();
        annotator.on_text_changed(&lines, 1, &mut sink);
        assert_eq!(sink.restyled, vec![1, 2]);
        assert_eq!(annotator.line_state(2), Some(FenceState::Normal));
    }
}
