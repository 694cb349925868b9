//! Layout analysis for PDF pages.
//!
//! Text-showing operators are turned into positioned spans, spans are split
//! into columns at a vertical gutter, and within each column spans on the same
//! baseline become lines and runs of lines become blocks. Blocks break on large
//! vertical gaps, font size changes and indentation changes, which is enough
//! for title lines set in a different size to land in their own block.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::model::RawBlock;
use crate::text::normalize_glyphs;

use super::backend::{get_number_from_value, PageId, PdfBackend, PdfValue};

/// TJ adjustments (thousandths of text space) above this are read as word gaps.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph advance as a fraction of the font size, for span widths.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Slice width in points for gutter detection.
const COLUMN_SLICE_WIDTH: f32 = 3.0;

/// Narrowest empty band accepted as a gutter.
const MIN_GUTTER_WIDTH: f32 = 12.0;

/// Narrowest column accepted on either side of a gutter.
const MIN_COLUMN_WIDTH: f32 = 80.0;

/// A text span with position and size information.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, PDF user space: bottom-up)
    pub y: f32,
    /// Width of the text, when known
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: String, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text,
            x,
            y,
            width: 0.0,
            font_size,
        }
    }

    /// Get the top Y coordinate (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8 // Approximate ascender
    }
}

/// A text line composed of spans on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Y position (baseline)
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size in this line
    pub font_size: f32,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        if spans.is_empty() {
            return Self {
                spans: vec![],
                y: 0.0,
                x: 0.0,
                font_size: 0.0,
            };
        }

        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

        // Dominant font size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted_size: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted_size / total_chars as f32
        } else {
            spans[0].font_size
        };

        let y = spans[0].y;
        let x = spans[0].x;

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Highest point of the line.
    pub fn top(&self) -> f32 {
        self.spans
            .iter()
            .map(TextSpan::top)
            .fold(self.y, f32::max)
    }

    /// Get the combined text of all spans.
    ///
    /// A space is inserted between spans separated by a horizontal gap, except
    /// between characters of scripts written without word spaces.
    pub fn text(&self) -> String {
        if self.spans.len() == 1 {
            return self.spans[0].text.clone();
        }

        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev_span = &self.spans[i - 1];
            let gap = span.x - (prev_span.x + prev_span.width);

            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.width > 0.0 {
                span.width / char_count as f32
            } else {
                span.font_size * 0.5
            };

            let should_insert_space = gap > avg_char_width * 0.2
                && !(prev_span
                    .text
                    .chars()
                    .last()
                    .is_some_and(is_spaceless_script_char)
                    && span
                        .text
                        .chars()
                        .next()
                        .is_some_and(is_spaceless_script_char));

            let prev_ends_with_space =
                prev_span.text.ends_with(' ') || prev_span.text.ends_with('\u{00A0}');
            let curr_starts_with_space =
                span.text.starts_with(' ') || span.text.starts_with('\u{00A0}');

            if should_insert_space && !prev_ends_with_space && !curr_starts_with_space {
                result.push(' ');
            }

            result.push_str(&span.text);
        }

        result
    }
}

/// Reads positioned text blocks from the pages of a document.
pub struct LayoutAnalyzer<'a, B: PdfBackend> {
    backend: &'a B,
}

impl<'a, B: PdfBackend> LayoutAnalyzer<'a, B> {
    /// Create a new layout analyzer.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Extract text blocks from a page (1-indexed).
    ///
    /// Blocks come column by column, left to right, each column top to bottom.
    pub fn extract_page_blocks(&self, page_num: u32) -> Result<Vec<RawBlock>> {
        let (page_id, page_height) = self.resolve_page(page_num)?;
        let spans = self.extract_spans(page_id)?;
        let columns = detect_columns(&spans);

        let mut column_spans: Vec<Vec<TextSpan>> = vec![Vec::new(); columns.len()];
        for span in spans {
            let index = columns
                .iter()
                .position(|c| c.contains_span(&span))
                .unwrap_or(0);
            column_spans[index].push(span);
        }

        let mut blocks = Vec::new();
        for (column, spans) in column_spans.into_iter().enumerate() {
            let lines = group_spans_into_lines(spans);
            blocks.extend(group_lines_into_blocks(lines).into_iter().filter_map(|lines| {
                let text = lines
                    .iter()
                    .map(TextLine::text)
                    .collect::<Vec<_>>()
                    .join(" ");
                if text.trim().is_empty() {
                    return None;
                }
                let top = lines[0].top();
                Some(RawBlock::new(text, page_height - top, page_num).with_column(column))
            }));
        }

        blocks.sort_by(|a, b| {
            a.column
                .cmp(&b.column)
                .then(a.top.partial_cmp(&b.top).unwrap_or(Ordering::Equal))
        });

        log::debug!(
            "Page {}: {} blocks in {} columns",
            page_num,
            blocks.len(),
            columns.len().max(1)
        );
        Ok(blocks)
    }

    fn resolve_page(&self, page_num: u32) -> Result<(PageId, f32)> {
        let pages = self.backend.pages();
        let page_id = *pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;
        Ok((page_id, self.backend.page_height(page_id)))
    }

    /// Walk the page's content stream and collect text spans.
    pub fn extract_spans(&self, page_id: PageId) -> Result<Vec<TextSpan>> {
        let content = self.backend.page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let operations = self.backend.decode_content(&content)?;

        let mut spans = Vec::new();
        let mut font_name: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut ctm = Transform::IDENTITY;
        let mut saved: Vec<Transform> = Vec::new();
        let mut in_text_block = false;

        for op in operations {
            match op.operator.as_str() {
                "q" => saved.push(ctm),
                "Q" => ctm = saved.pop().unwrap_or(Transform::IDENTITY),
                "cm" => {
                    if op.operands.len() >= 6 {
                        let n = |i: usize, d: f32| get_number_from_value(&op.operands[i]).unwrap_or(d);
                        let m = Transform::new(n(0, 1.0), n(1, 0.0), n(2, 0.0), n(3, 1.0), n(4, 0.0), n(5, 0.0));
                        ctm = m.then(&ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix {
                        leading: matrix.leading,
                        ..TextMatrix::default()
                    };
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let PdfValue::Name(name) = &op.operands[0] {
                            font_name = name.clone();
                        }
                        font_size = get_number_from_value(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number_from_value) {
                        matrix.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            matrix.leading = -ty;
                        }
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let n = |i: usize, d: f32| get_number_from_value(&op.operands[i]).unwrap_or(d);
                        matrix.set(n(0, 1.0), n(1, 0.0), n(2, 0.0), n(3, 1.0), n(4, 0.0), n(5, 0.0));
                    }
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        matrix.next_line();
                    }
                    if !in_text_block {
                        continue;
                    }
                    let operand = match op.operator.as_str() {
                        "\"" => op.operands.get(2),
                        _ => op.operands.first(),
                    };
                    let text = match operand {
                        Some(PdfValue::Str(bytes)) => {
                            self.backend.decode_text(page_id, &font_name, bytes)
                        }
                        Some(PdfValue::Array(items)) => self.decode_tj_array(page_id, &font_name, items),
                        _ => String::new(),
                    };
                    let text = normalize_glyphs(&text);
                    if !text.trim().is_empty() {
                        let (tx, ty) = matrix.position();
                        let (x, y) = ctm.apply(tx, ty);
                        let size = font_size * matrix.scale() * ctm.vertical_scale();
                        let mut span = TextSpan::new(text, x, y, size);
                        span.width = span.text.chars().count() as f32 * size * AVG_GLYPH_WIDTH;
                        spans.push(span);
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Decode a TJ array, turning large negative kerning into word spaces.
    fn decode_tj_array(&self, page_id: PageId, font_name: &[u8], items: &[PdfValue]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    combined.push_str(&self.backend.decode_text(page_id, font_name, bytes));
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = -get_number_from_value(item).unwrap_or(0.0);
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.ends_with(' ')
                        && !combined.ends_with('\u{00A0}')
                        && combined
                            .chars()
                            .last()
                            .is_some_and(|c| !is_spaceless_script_char(c))
                    {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        combined
    }
}

/// A vertical band of the page holding one column of text.
#[derive(Debug, Clone)]
struct Column {
    left: f32,
    right: f32,
}

impl Column {
    fn contains(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }

    /// A span belongs to the column holding its left edge or its center.
    fn contains_span(&self, span: &TextSpan) -> bool {
        self.contains(span.x) || self.contains(span.x + span.width / 2.0)
    }
}

/// Find a two-column layout by looking for an empty vertical gutter.
///
/// The text extent is cut into thin vertical slices and the widest run of
/// empty slices in the middle 70% becomes the gutter, preferring runs closer
/// to the center when widths are similar. A page without a convincing gutter
/// is a single column.
fn detect_columns(spans: &[TextSpan]) -> Vec<Column> {
    if spans.is_empty() {
        return vec![];
    }

    let min_x = spans.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
    let max_x = spans
        .iter()
        .map(|s| s.x + s.width)
        .fold(f32::NEG_INFINITY, f32::max);
    let single = vec![Column {
        left: min_x - 10.0,
        right: max_x + 10.0,
    }];

    let extent = max_x - min_x;
    if extent < 250.0 {
        return single;
    }

    let num_slices = (extent / COLUMN_SLICE_WIDTH) as usize + 1;
    let mut occupancy = vec![0usize; num_slices];
    for span in spans {
        let start = ((span.x - min_x) / COLUMN_SLICE_WIDTH) as usize;
        let end = ((span.x + span.width - min_x) / COLUMN_SLICE_WIDTH) as usize;
        for slot in occupancy
            .iter_mut()
            .take(end.min(num_slices - 1) + 1)
            .skip(start)
        {
            *slot += 1;
        }
    }

    let search_start = num_slices * 15 / 100;
    let search_end = num_slices * 85 / 100;
    let center = num_slices as f32 / 2.0;

    // (start, len, distance of its center from the page center)
    let mut best: Option<(usize, usize, f32)> = None;
    let mut consider = |start: usize, len: usize| {
        let width = len as f32 * COLUMN_SLICE_WIDTH;
        if width < 10.0 {
            return;
        }
        let dist = (start as f32 + len as f32 / 2.0 - center).abs();
        let better = match best {
            None => true,
            Some((_, best_len, best_dist)) => {
                let best_width = best_len as f32 * COLUMN_SLICE_WIDTH;
                width > best_width * 1.5 || (width >= best_width * 0.7 && dist < best_dist)
            }
        };
        if better {
            best = Some((start, len, dist));
        }
    };

    let mut run_start = 0;
    let mut run_len = 0;
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
                consider(run_start, run_len);
            }
            run_len = 0;
        }
    }
    if run_len > 0 {
        consider(run_start, run_len);
    }

    let Some((gap_start, gap_len, _)) = best else {
        return single;
    };
    let gap_width = gap_len as f32 * COLUMN_SLICE_WIDTH;
    if gap_width < MIN_GUTTER_WIDTH {
        return single;
    }

    let gutter = min_x + (gap_start as f32 + gap_len as f32 / 2.0) * COLUMN_SLICE_WIDTH;
    if gutter - min_x < MIN_COLUMN_WIDTH || max_x - gutter < MIN_COLUMN_WIDTH {
        return single;
    }

    // Each side needs a real share of the text, not a stray page number
    let left = spans
        .iter()
        .filter(|s| s.x + s.width / 2.0 < gutter)
        .count();
    let right = spans.len() - left;
    let min_spans = (spans.len() / 10).max(2);
    if left < min_spans || right < min_spans {
        return single;
    }

    log::debug!("Gutter of {:.1}pt at x={:.1}", gap_width, gutter);
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
fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    // PDF Y grows upward, so descending Y is reading order
    spans.sort_by(|a, b| match b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal),
        other => other,
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y_tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= y_tolerance => current.push(span),
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

/// Group consecutive lines into blocks.
fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<Vec<TextLine>> {
    let avg_spacing = calculate_avg_line_spacing(&lines);
    let mut blocks: Vec<Vec<TextLine>> = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if should_break_block(prev, &line, avg_spacing) {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn calculate_avg_line_spacing(lines: &[TextLine]) -> f32 {
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

fn should_break_block(prev_line: &TextLine, curr_line: &TextLine, avg_spacing: f32) -> bool {
    let spacing = (prev_line.y - curr_line.y).abs();
    if spacing > avg_spacing * 1.5 || spacing > prev_line.font_size * 2.0 {
        return true;
    }

    if (prev_line.font_size - curr_line.font_size).abs() > 1.0 {
        return true;
    }

    // Indentation change
    (prev_line.x - curr_line.x).abs() > 20.0
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    // Line start, which Td/T* move relative to
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

/// An affine transform `[a b c d e f]` as used by `cm`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Transform {
    const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// `self` followed by `next`.
    fn then(&self, next: &Transform) -> Transform {
        Transform {
            a: self.a * next.a + self.b * next.c,
            b: self.a * next.b + self.b * next.d,
            c: self.c * next.a + self.d * next.c,
            d: self.c * next.b + self.d * next.d,
            e: self.e * next.a + self.f * next.c + next.e,
            f: self.e * next.b + self.f * next.d + next.f,
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
}

/// Chinese and Japanese are written without word spaces; Korean is not.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana, Katakana
        || (0x3040..=0x30FF).contains(&code)
        // CJK symbols and punctuation
        || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::parser::backend::{decode_text_simple, ContentOp};

    /// Backend that serves one page of pre-built operations.
    struct OpsBackend {
        ops: Vec<ContentOp>,
    }

    impl PdfBackend for OpsBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }

        fn page_height(&self, _page: PageId) -> f32 {
            800.0
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(if self.ops.is_empty() { vec![] } else { vec![b' '] })
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }
    }

    fn show(x: i64, y: i64, size: i64, text: &str) -> Vec<ContentOp> {
        vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new(
                "Tf",
                vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(size)],
            ),
            ContentOp::new(
                "Tm",
                vec![
                    PdfValue::Integer(1),
                    PdfValue::Integer(0),
                    PdfValue::Integer(0),
                    PdfValue::Integer(1),
                    PdfValue::Integer(x),
                    PdfValue::Integer(y),
                ],
            ),
            ContentOp::new("Tj", vec![PdfValue::Str(text.as_bytes().to_vec())]),
            ContentOp::new("ET", vec![]),
        ]
    }

    #[test]
    fn test_blocks_split_on_font_size_and_sorted_top_down() {
        let mut ops = Vec::new();
        // Emitted bottom-up to check ordering
        ops.extend(show(72, 660, 11, "second line of the body paragraph"));
        ops.extend(show(72, 674, 11, "First line of the body paragraph"));
        ops.extend(show(72, 700, 16, "Coastal Adventures Guide"));
        let backend = OpsBackend { ops };

        let blocks = LayoutAnalyzer::new(&backend).extract_page_blocks(1).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "Coastal Adventures Guide");
        assert_eq!(
            blocks[1].text,
            "First line of the body paragraph second line of the body paragraph"
        );
        assert!(blocks[0].top < blocks[1].top);
        assert!(blocks.iter().all(|b| b.page == 1));
    }

    #[test]
    fn test_two_columns_are_kept_apart() {
        let mut ops = Vec::new();
        // Rows emitted across both columns, as typesetters often do
        ops.extend(show(72, 700, 16, "Coastal Adventures Nearby"));
        ops.extend(show(320, 700, 16, "Culinary Experiences Abound"));
        ops.extend(show(72, 680, 11, "Sheltered coves for swimming and"));
        ops.extend(show(320, 680, 11, "Cooking classes teach regional"));
        ops.extend(show(72, 666, 11, "kayaking line the whole coast."));
        ops.extend(show(320, 666, 11, "cuisine and market shopping."));
        let backend = OpsBackend { ops };

        let blocks = LayoutAnalyzer::new(&backend).extract_page_blocks(1).unwrap();
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Coastal Adventures Nearby",
                "Sheltered coves for swimming and kayaking line the whole coast.",
                "Culinary Experiences Abound",
                "Cooking classes teach regional cuisine and market shopping.",
            ]
        );
        let columns: Vec<usize> = blocks.iter().map(|b| b.column).collect();
        assert_eq!(columns, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_ragged_single_column_is_not_split() {
        let mut ops = Vec::new();
        ops.extend(show(72, 700, 11, "A long opening line that runs most of the way across the page"));
        ops.extend(show(72, 686, 11, "short line"));
        ops.extend(show(72, 672, 11, "Another long line that fills the measure from margin to margin"));
        let backend = OpsBackend { ops };

        let blocks = LayoutAnalyzer::new(&backend).extract_page_blocks(1).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].column, 0);
    }

    #[test]
    fn test_flipped_ctm_reads_top_down() {
        let cm = |d: i64, f: i64| {
            ContentOp::new(
                "cm",
                vec![
                    PdfValue::Integer(1),
                    PdfValue::Integer(0),
                    PdfValue::Integer(0),
                    PdfValue::Integer(d),
                    PdfValue::Integer(0),
                    PdfValue::Integer(f),
                ],
            )
        };
        let mut ops = vec![ContentOp::new("q", vec![]), cm(-1, 800)];
        // Y grows downward under the flip: 100 is above 126
        ops.extend(show(72, 100, 16, "Coastal Adventures Guide"));
        ops.extend(show(72, 126, 11, "First line of the body paragraph"));
        ops.push(ContentOp::new("Q", vec![]));
        // Back in page space after Q
        ops.extend(show(72, 300, 11, "Footer paragraph well below the rest"));
        let backend = OpsBackend { ops };

        let analyzer = LayoutAnalyzer::new(&backend);
        let spans = analyzer.extract_spans((1, 0)).unwrap();
        assert!((spans[0].y - 700.0).abs() < 0.01);
        assert!((spans[1].y - 674.0).abs() < 0.01);
        assert!((spans[2].y - 300.0).abs() < 0.01);

        let blocks = analyzer.extract_page_blocks(1).unwrap();
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Coastal Adventures Guide",
                "First line of the body paragraph",
                "Footer paragraph well below the rest",
            ]
        );
    }

    #[test]
    fn test_cm_scales_font_size() {
        let mut ops = vec![ContentOp::new(
            "cm",
            vec![
                PdfValue::Integer(2),
                PdfValue::Integer(0),
                PdfValue::Integer(0),
                PdfValue::Integer(2),
                PdfValue::Integer(10),
                PdfValue::Integer(20),
            ],
        )];
        ops.extend(show(30, 300, 8, "Scaled text"));
        let backend = OpsBackend { ops };

        let spans = LayoutAnalyzer::new(&backend).extract_spans((1, 0)).unwrap();
        assert!((spans[0].x - 70.0).abs() < 0.01);
        assert!((spans[0].y - 620.0).abs() < 0.01);
        assert!((spans[0].font_size - 16.0).abs() < 0.01);
    }

    #[test]
    fn test_blocks_split_on_large_gap() {
        let mut ops = Vec::new();
        ops.extend(show(72, 700, 11, "Paragraph one line one"));
        ops.extend(show(72, 686, 11, "Paragraph one line two"));
        ops.extend(show(72, 672, 11, "Paragraph one line three"));
        ops.extend(show(72, 620, 11, "Paragraph two starts here"));
        let backend = OpsBackend { ops };

        let blocks = LayoutAnalyzer::new(&backend).extract_page_blocks(1).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].text.starts_with("Paragraph two"));
    }

    #[test]
    fn test_tj_array_spacing_and_ligatures() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new(
                "Tf",
                vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(12)],
            ),
            ContentOp::new("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
            ContentOp::new(
                "TJ",
                vec![PdfValue::Array(vec![
                    PdfValue::Str("\u{FB01}nd".as_bytes().to_vec()),
                    PdfValue::Integer(-250),
                    PdfValue::Str(b"hidden".to_vec()),
                    PdfValue::Integer(-20),
                    PdfValue::Str(b"gems".to_vec()),
                ])],
            ),
            ContentOp::new("ET", vec![]),
        ];
        let backend = OpsBackend { ops };

        let blocks = LayoutAnalyzer::new(&backend).extract_page_blocks(1).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "find hiddengems");
    }

    #[test]
    fn test_t_star_uses_leading() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("TL", vec![PdfValue::Integer(14)]),
            ContentOp::new("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
            ContentOp::new("Tj", vec![PdfValue::Str(b"line one".to_vec())]),
            ContentOp::new("T*", vec![]),
            ContentOp::new("Tj", vec![PdfValue::Str(b"line two".to_vec())]),
            ContentOp::new("ET", vec![]),
        ];
        let backend = OpsBackend { ops };
        let analyzer = LayoutAnalyzer::new(&backend);
        let spans = analyzer.extract_spans((1, 0)).unwrap();
        assert_eq!(spans.len(), 2);
        assert!((spans[0].y - 700.0).abs() < 0.01);
        assert!((spans[1].y - 686.0).abs() < 0.01);
        assert!((spans[1].x - 72.0).abs() < 0.01);
    }

    #[test]
    fn test_blank_page_and_out_of_range() {
        let backend = OpsBackend { ops: vec![] };
        let analyzer = LayoutAnalyzer::new(&backend);
        assert!(analyzer.extract_page_blocks(1).unwrap().is_empty());
        assert!(matches!(
            analyzer.extract_page_blocks(3),
            Err(Error::PageOutOfRange(3, 1))
        ));
    }

    #[test]
    fn test_line_text_spacing() {
        let line = TextLine::from_spans(vec![
            TextSpan::new("World".to_string(), 110.0, 0.0, 12.0),
            TextSpan::new("Hello".to_string(), 72.0, 0.0, 12.0),
        ]);
        assert_eq!(line.text(), "Hello World");

        let cjk = TextLine::from_spans(vec![
            TextSpan::new("日本".to_string(), 72.0, 0.0, 12.0),
            TextSpan::new("語".to_string(), 100.0, 0.0, 12.0),
        ]);
        assert_eq!(cjk.text(), "日本語");
    }
}
