//! Table detection using text position analysis (stream mode).
//!
//! Tables are found from text alignment alone, without relying on ruling
//! lines: rows whose spans start at the same horizontal positions as their
//! neighbours form a table region. Regions are only used to keep tabular
//! debris out of prose, so nothing about cell contents is retained.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::model::TableRegion;

use super::layout::TextSpan;

/// Bucket width for grouping span left edges (points).
const EDGE_BUCKET: f32 = 5.0;

/// A detected table, in PDF (bottom-up) coordinates.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Upper edge of the first row
    pub top: f32,
    /// Lower edge of the last row
    pub bottom: f32,
    /// Left X boundary
    pub left_x: f32,
    /// Right X boundary
    pub right_x: f32,
    /// Column start positions
    pub columns: Vec<f32>,
    /// Number of rows
    pub row_count: usize,
}

impl DetectedTable {
    /// Convert to a top-down region on a page of the given height.
    pub fn to_region(&self, page_height: f32) -> TableRegion {
        TableRegion::new(
            self.left_x,
            page_height - self.top,
            self.right_x,
            page_height - self.bottom,
        )
    }
}

/// A row of text spans sharing a baseline.
#[derive(Debug, Clone)]
struct SpanRow {
    spans: Vec<TextSpan>,
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects table regions in a page's text spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect table regions, converted to top-down page coordinates.
    pub fn detect_regions(&self, spans: &[TextSpan], page_height: f32) -> Vec<TableRegion> {
        self.detect(spans)
            .iter()
            .map(|t| t.to_region(page_height))
            .collect()
    }

    /// Detect tables in the given spans.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<DetectedTable> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            log::debug!("TableDetector: not enough spans ({})", spans.len());
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < self.config.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: {} rows, candidate columns at {:?}",
            rows.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return vec![];
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_table_regions(&rows, &columns) {
            let table_rows = &rows[start..=end];

            // Re-detect columns for this specific region
            let table_columns = self.detect_columns(table_rows);
            if table_columns.len() < self.config.min_columns {
                continue;
            }
            if table_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    table_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if self.is_list_pattern(table_rows, &table_columns) {
                log::debug!("TableDetector: skipping region, detected as list pattern");
                continue;
            }

            let all_spans = || table_rows.iter().flat_map(|r| r.spans.iter());
            tables.push(DetectedTable {
                top: all_spans().map(TextSpan::top).fold(f32::MIN, f32::max),
                bottom: all_spans().map(TextSpan::bottom).fold(f32::MAX, f32::min),
                left_x: all_spans().map(|s| s.x).fold(f32::MAX, f32::min),
                right_x: all_spans().map(|s| s.x + s.width).fold(f32::MIN, f32::max),
                columns: table_columns,
                row_count: table_rows.len(),
            });
        }

        log::debug!("TableDetector: found {} tables", tables.len());
        tables
    }

    /// Group spans into rows by baseline, top to bottom.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<SpanRow> {
        let mut sorted = spans.to_vec();
        sorted.sort_by(|a, b| {
            b.y.partial_cmp(&a.y)
                .unwrap_or(Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
        });

        let mut rows: Vec<SpanRow> = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in sorted {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            match current_y {
                Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        rows.push(SpanRow {
                            spans: std::mem::take(&mut current),
                        });
                    }
                    current_y = Some(span.y);
                    current.push(span);
                }
            }
        }

        if !current.is_empty() {
            rows.push(SpanRow { spans: current });
        }

        rows
    }

    /// Detect column start positions from left edges that recur across rows.
    ///
    /// Rows with at least two spans are preferred as evidence; when too few
    /// exist, every row counts and each span is counted separately.
    fn detect_columns(&self, rows: &[SpanRow]) -> Vec<f32> {
        let multi_span_rows: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        let evidence_rows = if multi_span_rows.len() >= self.config.min_rows {
            for row in &multi_span_rows {
                // Count each bucket once per row
                let buckets: HashSet<i32> = row
                    .spans
                    .iter()
                    .map(|s| (s.x / EDGE_BUCKET).round() as i32)
                    .collect();
                for bucket in buckets {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            }
            multi_span_rows.len()
        } else {
            for span in rows.iter().flat_map(|r| r.spans.iter()) {
                *edge_counts
                    .entry((span.x / EDGE_BUCKET).round() as i32)
                    .or_insert(0) += 1;
            }
            rows.len()
        };

        let min_occurrences =
            ((evidence_rows as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        // Merge edges closer than the minimum column gap
        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }

        merged
    }

    /// Find runs of consecutive rows that align with the columns.
    fn find_table_regions(&self, rows: &[SpanRow], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut run_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if self.alignment_score(row, columns) >= self.config.min_alignment_ratio {
                run_start.get_or_insert(i);
            } else if let Some(start) = run_start.take() {
                if i - start >= self.config.min_rows {
                    regions.push((start, i - 1));
                }
            }
        }

        if let Some(start) = run_start {
            if rows.len() - start >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }

        regions
    }

    /// Fraction of a row's spans that start on a column edge.
    ///
    /// Single-span rows score zero: a prose line at the left margin would
    /// otherwise extend the table above or below it.
    fn alignment_score(&self, row: &SpanRow, columns: &[f32]) -> f32 {
        if row.spans.len() < 2 || columns.is_empty() {
            return 0.0;
        }

        let aligned = row
            .spans
            .iter()
            .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= EDGE_BUCKET))
            .count();

        aligned as f32 / row.spans.len() as f32
    }

    /// Check whether aligned rows are really a bulleted or numbered list.
    ///
    /// A list's markers and item text often become separate spans at two
    /// fixed X positions, which looks like a two-column table.
    fn is_list_pattern(&self, rows: &[SpanRow], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullets = 0;
        let mut numbers = 0;

        for row in rows {
            let first = row
                .spans
                .iter()
                .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
            if let Some(span) = first {
                if is_bullet_marker(&span.text) {
                    bullets += 1;
                } else if is_number_marker(&span.text) {
                    numbers += 1;
                }
            }
        }

        let bullet_ratio = bullets as f32 / rows.len() as f32;
        let marker_ratio = (bullets + numbers) as f32 / rows.len() as f32;

        // Numbered first columns occur in real tables, so numbers only
        // disqualify two-column regions.
        bullet_ratio >= 0.5 || (columns.len() == 2 && marker_ratio >= 0.5)
    }
}

/// Check if text is a bullet marker.
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "□" | "◆" | "▶" | "➤"
    )
}

/// Check if text is a number-style list marker (`1.`, `2)`, `a.`, `3`).
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (digits, suffix) = cleaned.split_at(pos);
        if !digits.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    } else {
        // Bare number
        return true;
    }

    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some('.' | ')'), None) if letter.is_alphabetic()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, y, 12.0)
    }

    #[test]
    fn test_group_into_rows() {
        let detector = TableDetector::new();
        let rows = detector.group_into_rows(&[
            span("A1", 10.0, 100.0),
            span("B1", 60.0, 100.0),
            span("A2", 10.0, 85.0),
            span("B2", 60.0, 85.0),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].spans.len(), 2);
        assert_eq!(rows[0].spans[0].text, "A1");
    }

    #[test]
    fn test_detect_simple_table() {
        let detector = TableDetector::new();
        let spans = vec![
            span("Name", 10.0, 100.0),
            span("Age", 60.0, 100.0),
            span("Alice", 10.0, 85.0),
            span("30", 60.0, 85.0),
            span("Bob", 10.0, 70.0),
            span("25", 60.0, 70.0),
        ];

        let tables = detector.detect(&spans);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].row_count, 3);
        assert_eq!(tables[0].columns.len(), 2);
        assert_eq!(tables[0].left_x, 10.0);
    }

    #[test]
    fn test_region_is_top_down() {
        let detector = TableDetector::new();
        let spans = vec![
            span("Name", 10.0, 700.0),
            span("Age", 60.0, 700.0),
            span("Alice", 10.0, 685.0),
            span("30", 60.0, 685.0),
        ];

        let regions = detector.detect_regions(&spans, 800.0);
        assert_eq!(regions.len(), 1);
        let r = regions[0];
        assert!(r.y0 < r.y1);
        // Top of "Name" row: 700 + 0.8 * 12
        assert!((r.y0 - (800.0 - 709.6)).abs() < 0.01);
        // Bottom of "Alice" row: 685 - 0.2 * 12
        assert!((r.y1 - (800.0 - 682.6)).abs() < 0.01);
    }

    #[test]
    fn test_no_table_single_column() {
        let detector = TableDetector::new();
        let spans = vec![
            span("Line 1", 10.0, 100.0),
            span("Line 2", 10.0, 85.0),
            span("Line 3", 10.0, 70.0),
            span("Line 4", 10.0, 55.0),
        ];
        assert!(detector.detect(&spans).is_empty());
    }

    #[test]
    fn test_numbered_list_not_detected_as_table() {
        let detector = TableDetector::new();
        let spans = vec![
            span("1.", 50.0, 400.0),
            span("Install the toolchain", 80.0, 400.0),
            span("2.", 50.0, 370.0),
            span("Configure the project", 80.0, 370.0),
            span("3.", 50.0, 340.0),
            span("Run the build", 80.0, 340.0),
        ];
        assert!(detector.detect(&spans).is_empty());
    }

    #[test]
    fn test_bullet_list_not_detected_as_table() {
        let detector = TableDetector::new();
        let spans = vec![
            span("•", 50.0, 400.0),
            span("Management", 80.0, 400.0),
            span("•", 50.0, 370.0),
            span("Interface options", 80.0, 370.0),
            span("•", 50.0, 340.0),
            span("Firmware", 80.0, 340.0),
        ];
        assert!(detector.detect(&spans).is_empty());
    }

    #[test]
    fn test_markers() {
        assert!(is_number_marker("1."));
        assert!(is_number_marker("12."));
        assert!(is_number_marker("1)"));
        assert!(is_number_marker("1 ."));
        assert!(is_number_marker("3"));
        assert!(is_number_marker("a."));
        assert!(is_number_marker("B)"));
        assert!(is_bullet_marker("-"));
        assert!(is_bullet_marker(" • "));

        assert!(!is_number_marker("Name"));
        assert!(!is_number_marker(""));
        assert!(!is_bullet_marker("Alice"));
    }
}
