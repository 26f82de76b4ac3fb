//! Layout analysis for PDF pages.
//!
//! Interprets a page's content stream into positioned text spans and image
//! placements, groups spans into lines and lines into blocks, and reports
//! the blocks top-down as [`PageBlock`]s.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::model::PageBlock;

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// Average glyph width as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;

/// TJ adjustments (thousandths of text space) beyond this count as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// A text span with position information, in PDF (bottom-up) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new span; width is estimated from the character count.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * font_size * AVG_CHAR_WIDTH;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// Approximate bottom edge (descender).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }

    /// Approximate top edge (ascender).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }
}

/// An image drawn on the page, in PDF (bottom-up) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    /// Lower edge
    pub bottom: f32,
    /// Upper edge
    pub top: f32,
}

/// Everything the layout pass extracts from one page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Page height in points
    pub height: f32,
    /// Text spans in content-stream order
    pub spans: Vec<TextSpan>,
    /// Image placements in content-stream order
    pub images: Vec<ImagePlacement>,
}

/// A text line composed of spans on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Spans sorted by X position
    pub spans: Vec<TextSpan>,
    /// Baseline
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size, weighted by text length
    pub font_size: f32,
}

impl TextLine {
    /// Create a line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = match spans.first() {
            Some(_) if total_chars > 0 => weighted / total_chars as f32,
            Some(first) => first.font_size,
            None => 0.0,
        };

        let (x, y) = spans.first().map(|s| (s.x, s.y)).unwrap_or((0.0, 0.0));

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Combined text of all spans.
    ///
    /// A space is inserted where the horizontal gap between spans exceeds a
    /// fifth of a character width, except between characters of scripts that
    /// do not separate words.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - (prev.x + prev.width);

                let char_count = span.text.chars().count();
                let avg_char_width = if char_count > 0 && span.width > 0.0 {
                    span.width / char_count as f32
                } else {
                    span.font_size * AVG_CHAR_WIDTH
                };

                let spaceless = prev.text.chars().last().is_some_and(is_spaceless_script_char)
                    && span.text.chars().next().is_some_and(is_spaceless_script_char);
                let has_space = prev.text.ends_with([' ', '\u{00A0}'])
                    || span.text.starts_with([' ', '\u{00A0}']);

                if gap > avg_char_width * 0.2 && !spaceless && !has_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }

        result
    }

    fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }
}

/// A group of consecutive lines.
#[derive(Debug, Clone)]
pub struct TextBlock {
    /// Lines from top to bottom
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    /// Block text: lines joined with newlines, newline-terminated.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line.text().trim_end());
            text.push('\n');
        }
        text
    }

    /// Upper edge in PDF coordinates.
    pub fn top(&self) -> f32 {
        self.lines
            .iter()
            .map(TextLine::top)
            .fold(f32::MIN, f32::max)
    }

    /// Lower edge in PDF coordinates.
    pub fn bottom(&self) -> f32 {
        self.lines
            .iter()
            .map(TextLine::bottom)
            .fold(f32::MAX, f32::min)
    }

    /// Convert to a top-down page block.
    pub fn to_page_block(&self, page_height: f32) -> PageBlock {
        PageBlock::text(
            page_height - self.top(),
            page_height - self.bottom(),
            self.text(),
        )
    }
}

/// A detected column in the page layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Left boundary X coordinate
    pub left: f32,
    /// Right boundary X coordinate
    pub right: f32,
}

impl Column {
    /// Check if an X coordinate falls within this column.
    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }

    /// Check if a span's left edge or center lies in this column.
    pub fn contains_span(&self, span: &TextSpan) -> bool {
        self.contains(span.x) || self.contains(span.x + span.width / 2.0)
    }
}

/// Layout analyzer for extracting positioned content from PDF pages.
pub struct LayoutAnalyzer<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> LayoutAnalyzer<'a, B> {
    /// Create a new layout analyzer over a backend.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract spans and image placements from a page.
    pub fn extract_page(&self, page: PageId) -> Result<PageContent> {
        let height = self.backend.page_height(page);
        let data = self.backend.page_content(page)?;
        let ops = self.backend.decode_content(&data)?;
        let images = self.backend.image_xobjects(page);

        let mut state = ContentState::default();
        let mut content = PageContent {
            height,
            ..PageContent::default()
        };

        for op in &ops {
            match op.operator.as_str() {
                "q" => state.gs_stack.push(state.ctm),
                "Q" => {
                    if let Some(ctm) = state.gs_stack.pop() {
                        state.ctm = ctm;
                    }
                }
                "cm" if op.operands.len() >= 6 => {
                    let m = Matrix::from_op(op);
                    state.ctm = m.concat(&state.ctm);
                }
                "BT" => {
                    state.in_text = true;
                    state.tm = Matrix::IDENTITY;
                    state.tlm = Matrix::IDENTITY;
                }
                "ET" => state.in_text = false,
                "Tf" if op.operands.len() >= 2 => {
                    if let PdfValue::Name(name) = &op.operands[0] {
                        state.font = name.clone();
                    }
                    state.font_size = op.number(1, 12.0);
                }
                "TL" => state.leading = op.number(0, 0.0),
                "Td" if op.operands.len() >= 2 => {
                    state.move_line(op.number(0, 0.0), op.number(1, 0.0));
                }
                "TD" if op.operands.len() >= 2 => {
                    let ty = op.number(1, 0.0);
                    state.leading = -ty;
                    state.move_line(op.number(0, 0.0), ty);
                }
                "Tm" if op.operands.len() >= 6 => {
                    state.tlm = Matrix::from_op(op);
                    state.tm = state.tlm;
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                        let text = self.backend.decode_text(page, &state.font, bytes);
                        state.show(text, &mut content.spans);
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = op.operands.first() {
                        let text = self.combine_tj(page, &state.font, items);
                        state.show(text, &mut content.spans);
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    let idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(PdfValue::Str(bytes)) = op.operands.get(idx) {
                        let text = self.backend.decode_text(page, &state.font, bytes);
                        state.show(text, &mut content.spans);
                    }
                }
                "Do" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        if images.contains(name) {
                            content.images.push(state.ctm.unit_square_band());
                        }
                    }
                }
                _ => {}
            }
        }

        log::debug!(
            "Page {:?}: {} spans, {} images",
            page,
            content.spans.len(),
            content.images.len()
        );

        Ok(content)
    }

    /// Decode a TJ array, turning large negative adjustments into spaces.
    fn combine_tj(&self, page: PageId, font: &[u8], items: &[PdfValue]) -> String {
        let mut combined = String::new();

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    combined.push_str(&self.backend.decode_text(page, font, bytes));
                }
                other => {
                    let adjustment = -other.as_number().unwrap_or(0.0);
                    let ends_spaceless = combined
                        .chars()
                        .last()
                        .map_or(true, |c| c == ' ' || c == '\u{00A0}' || is_spaceless_script_char(c));
                    if adjustment > TJ_SPACE_THRESHOLD && !ends_spaceless {
                        combined.push(' ');
                    }
                }
            }
        }

        combined
    }
}

/// 2D affine transform `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_op(op: &ContentOp) -> Self {
        Self {
            a: op.number(0, 1.0),
            b: op.number(1, 0.0),
            c: op.number(2, 0.0),
            d: op.number(3, 1.0),
            e: op.number(4, 0.0),
            f: op.number(5, 0.0),
        }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    /// Vertical extent of the unit square under this transform.
    fn unit_square_band(&self) -> ImagePlacement {
        let ys = [
            self.apply(0.0, 0.0).1,
            self.apply(1.0, 0.0).1,
            self.apply(0.0, 1.0).1,
            self.apply(1.0, 1.0).1,
        ];
        ImagePlacement {
            bottom: ys.iter().copied().fold(f32::MAX, f32::min),
            top: ys.iter().copied().fold(f32::MIN, f32::max),
        }
    }
}

/// Graphics and text state while walking a content stream.
#[derive(Debug, Clone)]
struct ContentState {
    ctm: Matrix,
    gs_stack: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    in_text: bool,
}

impl Default for ContentState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            gs_stack: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            font: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
            in_text: false,
        }
    }
}

impl ContentState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).concat(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// Record shown text as a span and advance the text matrix past it.
    fn show(&mut self, raw: String, spans: &mut Vec<TextSpan>) {
        if !self.in_text {
            return;
        }

        let text = normalize_span_text(&raw);
        let advance = text.chars().count() as f32 * self.font_size * AVG_CHAR_WIDTH;

        if !text.trim().is_empty() {
            let render = self.tm.concat(&self.ctm);
            let (x, y) = render.apply(0.0, 0.0);
            let size = self.font_size * render.vertical_scale();
            spans.push(TextSpan::new(text, x, y, size));
        }

        self.tm = Matrix::translation(advance, 0.0).concat(&self.tm);
    }
}

/// NFC-normalize decoded text and expand typographic ligatures.
pub fn normalize_span_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfc() {
        match LIGATURES.iter().find(|(lig, _)| *lig == c) {
            Some((_, expansion)) => out.push_str(expansion),
            None => out.push(c),
        }
    }
    out
}

/// Group spans into blocks in reading order.
///
/// In a two-column layout the left column's blocks come before the right
/// column's.
pub fn build_blocks(spans: &[TextSpan]) -> Vec<TextBlock> {
    let columns = detect_columns(spans);
    log::debug!("Detected {} columns", columns.len());

    if columns.len() <= 1 {
        return group_lines_into_blocks(group_spans_into_lines(spans.to_vec()));
    }

    let mut column_spans: Vec<Vec<TextSpan>> = vec![Vec::new(); columns.len()];
    for span in spans {
        let idx = columns
            .iter()
            .position(|c| c.contains_span(span))
            .unwrap_or(0);
        column_spans[idx].push(span.clone());
    }

    column_spans
        .into_iter()
        .flat_map(|col| group_lines_into_blocks(group_spans_into_lines(col)))
        .collect()
}

/// Convert extracted page content into top-down page blocks.
///
/// Image blocks are inserted before the first text block that starts below
/// them.
pub fn page_blocks(content: &PageContent) -> Vec<PageBlock> {
    let mut blocks: Vec<PageBlock> = build_blocks(&content.spans)
        .iter()
        .map(|b| b.to_page_block(content.height))
        .collect();

    for img in &content.images {
        let block = PageBlock::image(content.height - img.top, content.height - img.bottom);
        let pos = blocks
            .iter()
            .position(|b| b.y0 > block.y0)
            .unwrap_or(blocks.len());
        blocks.insert(pos, block);
    }

    blocks
}

/// Detect a two-column layout from a vertical gutter.
///
/// Returns a single column unless an empty vertical band at least 12pt wide
/// separates two columns of at least 80pt that each hold a tenth of the
/// spans.
pub fn detect_columns(spans: &[TextSpan]) -> Vec<Column> {
    if spans.is_empty() {
        return vec![];
    }

    let min_x = spans.iter().map(|s| s.x).fold(f32::MAX, f32::min);
    let max_x = spans.iter().map(|s| s.x + s.width).fold(f32::MIN, f32::max);
    let single = vec![Column {
        left: min_x - 10.0,
        right: max_x + 10.0,
    }];

    let page_width = max_x - min_x;
    if page_width < 250.0 {
        return single;
    }

    // Occupancy of 3pt vertical slices
    let slice_width = 3.0;
    let num_slices = (page_width / slice_width) as usize + 1;
    let mut occupancy = vec![0usize; num_slices];
    for span in spans {
        let start = ((span.x - min_x) / slice_width) as usize;
        let end = ((span.x + span.width - min_x) / slice_width) as usize;
        for slot in occupancy
            .iter_mut()
            .take(end.min(num_slices - 1) + 1)
            .skip(start)
        {
            *slot += 1;
        }
    }

    // Widest empty run in the middle 70%, preferring runs near the center
    let search_start = num_slices * 15 / 100;
    let search_end = num_slices * 85 / 100;
    let center = num_slices as f32 / 2.0;

    let mut best: Option<(usize, usize)> = None;
    let mut run_start = 0;
    let mut run_len = 0;

    let consider = |start: usize, len: usize, best: &mut Option<(usize, usize)>| {
        let width = len as f32 * slice_width;
        if width < 10.0 {
            return;
        }
        let dist = ((start + len / 2) as f32 - center).abs();
        match *best {
            None => *best = Some((start, len)),
            Some((b_start, b_len)) => {
                let b_width = b_len as f32 * slice_width;
                let b_dist = ((b_start + b_len / 2) as f32 - center).abs();
                if width > b_width * 1.5 || (width >= b_width * 0.7 && dist < b_dist) {
                    *best = Some((start, len));
                }
            }
        }
    };

    for (i, &count) in occupancy
        .iter()
        .enumerate()
        .take(search_end)
        .skip(search_start)
    {
        if count == 0 {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
        } else {
            if run_len > 0 {
                consider(run_start, run_len, &mut best);
            }
            run_len = 0;
        }
    }
    if run_len > 0 {
        consider(run_start, run_len, &mut best);
    }

    let (gap_start, gap_len) = match best {
        Some(b) if b.1 as f32 * slice_width >= 12.0 => b,
        _ => return single,
    };

    let gutter = min_x + (gap_start as f32 + gap_len as f32 / 2.0) * slice_width;
    if gutter - min_x < 80.0 || max_x - gutter < 80.0 {
        log::debug!("Column too narrow, treating as single column");
        return single;
    }

    let left = spans
        .iter()
        .filter(|s| s.x + s.width / 2.0 < gutter)
        .count();
    let right = spans.len() - left;
    let min_spans = (spans.len() / 10).max(2);
    if left < min_spans || right < min_spans {
        log::debug!("Spans too imbalanced, treating as single column");
        return single;
    }

    vec![
        Column {
            left: min_x - 10.0,
            right: gutter,
        },
        Column {
            left: gutter,
            right: max_x + 10.0,
        },
    ]
}

/// Group spans into lines by baseline, top to bottom.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Group lines into blocks, breaking on wide spacing, font size changes
/// and indentation changes.
pub fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<TextBlock> {
    let avg_spacing = average_line_spacing(&lines);
    let mut blocks: Vec<TextBlock> = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if should_break_block(prev, &line, avg_spacing) {
                blocks.push(TextBlock {
                    lines: std::mem::take(&mut current),
                });
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(TextBlock { lines: current });
    }

    blocks
}

fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
    (prev.y - curr.y).abs() > avg_spacing * 1.5
        || (prev.font_size - curr.font_size).abs() > 1.0
        || (prev.x - curr.x).abs() > 20.0
}

/// Check if a character belongs to a script that does not use word spaces.
///
/// Chinese and Japanese qualify; Korean uses word spaces and does not.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF       // CJK Unified Ideographs
        | 0x3400..=0x4DBF     // Extension A
        | 0x20000..=0x2EBEF   // Extensions B-F
        | 0x3040..=0x309F     // Hiragana
        | 0x30A0..=0x30FF     // Katakana
        | 0x3000..=0x303F     // CJK Symbols and Punctuation
    )
}
