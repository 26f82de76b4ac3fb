//! Paragraph normalization for raw, line-broken PDF text.
//!
//! Line-length analysis separates mid-paragraph wraps (full-width lines)
//! from paragraph endings and headings (short lines). Afterwards hyphenated
//! words are rejoined and noise (page numbers, stray labels, runs of table
//! cell fragments) is dropped.

use std::sync::LazyLock;

use regex::Regex;

use super::options::ParagraphConfig;

static RE_PAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,4}$").expect("valid page number regex"));

/// Join the lines of one paragraph, rejoining words hyphenated at a wrap.
pub fn join_lines(lines: &[&str]) -> String {
    let mut iter = lines.iter();
    let mut result = match iter.next() {
        Some(first) => first.to_string(),
        None => return String::new(),
    };

    for line in iter {
        if result.ends_with('-') {
            result.pop();
            result.push_str(line);
        } else {
            result.push(' ');
            result.push_str(line);
        }
    }

    result
}

/// Check whether a fragment should not be read aloud.
pub fn is_noise(text: &str) -> bool {
    let t = text.trim();
    if t.is_empty() {
        return true;
    }

    // Standalone page numbers
    if RE_PAGE_NUMBER.is_match(t) {
        return true;
    }

    // Very short fragments without sentence punctuation (diagram labels)
    if t.chars().count() <= 3 && !t.ends_with(['.', '!', '?']) {
        return true;
    }

    false
}

/// Paragraph normalizer.
pub struct ParagraphNormalizer {
    config: ParagraphConfig,
}

impl ParagraphNormalizer {
    /// Create a normalizer with the given thresholds.
    pub fn new(config: ParagraphConfig) -> Self {
        Self { config }
    }

    /// Turn raw line-broken text into paragraphs separated by blank lines.
    pub fn normalize(&self, raw: &str) -> String {
        let lines: Vec<&str> = raw.split('\n').map(str::trim).collect();

        let threshold = match self.break_threshold(&lines) {
            Some(t) => t,
            None => return raw.trim().to_string(),
        };
        log::debug!("Paragraph break threshold: {:.1} chars", threshold);

        let mut paragraphs: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in lines {
            if line.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(join_lines(&current));
                    current.clear();
                }
                continue;
            }

            current.push(line);

            if (line.chars().count() as f32) < threshold {
                paragraphs.push(join_lines(&current));
                current.clear();
            }
        }

        if !current.is_empty() {
            paragraphs.push(join_lines(&current));
        }

        let merged = merge_hyphenated(paragraphs);

        let cleaned: Vec<String> = merged.into_iter().filter(|p| !is_noise(p)).collect();
        let cleaned = self.remove_short_runs(cleaned);

        cleaned.join("\n\n")
    }

    /// Lines shorter than this end a paragraph; `None` when no line is long
    /// enough to measure a typical width.
    fn break_threshold(&self, lines: &[&str]) -> Option<f32> {
        let mut lengths: Vec<usize> = lines
            .iter()
            .map(|l| l.chars().count())
            .filter(|&len| len > self.config.min_measured_len)
            .collect();

        if lengths.is_empty() {
            return None;
        }

        lengths.sort_unstable();
        let idx = ((lengths.len() as f32 * self.config.typical_percentile) as usize)
            .min(lengths.len() - 1);
        Some(lengths[idx] as f32 * self.config.break_ratio)
    }

    /// Drop runs of consecutive short paragraphs (likely table cells).
    ///
    /// Runs shorter than `short_run_min` survive, which keeps title,
    /// author and date lines at the top of a paper.
    pub fn remove_short_runs(&self, paragraphs: Vec<String>) -> Vec<String> {
        let is_short = |p: &String| p.chars().count() < self.config.short_fragment_len;
        let n = paragraphs.len();
        let mut keep = vec![true; n];

        let mut run_start = 0;
        while run_start < n {
            if !is_short(&paragraphs[run_start]) {
                run_start += 1;
                continue;
            }

            let mut run_end = run_start + 1;
            while run_end < n && is_short(&paragraphs[run_end]) {
                run_end += 1;
            }

            if run_end - run_start >= self.config.short_run_min {
                log::debug!(
                    "Dropping run of {} short fragments",
                    run_end - run_start
                );
                keep[run_start..run_end].fill(false);
            }
            run_start = run_end;
        }

        paragraphs
            .into_iter()
            .zip(keep)
            .filter_map(|(p, k)| k.then_some(p))
            .collect()
    }
}

impl Default for ParagraphNormalizer {
    fn default() -> Self {
        Self::new(ParagraphConfig::default())
    }
}

/// Rejoin paragraphs split mid-word by hyphenation at a short-line boundary.
fn merge_hyphenated(paragraphs: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(paragraphs.len());

    for para in paragraphs {
        let starts_lower = para.chars().next().is_some_and(char::is_lowercase);
        match merged.last_mut() {
            Some(last) if last.ends_with('-') && starts_lower => {
                last.pop();
                last.push_str(&para);
            }
            _ => merged.push(para),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_join_lines() {
        assert_eq!(join_lines(&["hello", "world"]), "hello world");
        assert_eq!(join_lines(&["occupa-", "tional"]), "occupational");
        assert_eq!(join_lines(&[]), "");
        assert_eq!(join_lines(&["just one"]), "just one");
        assert_eq!(
            join_lines(&["pre-", "trained", "lan-", "guage"]),
            "pretrained language"
        );
    }

    #[test]
    fn test_is_noise() {
        assert!(is_noise("42"));
        assert!(is_noise(" 7 "));
        assert!(is_noise("A"));
        assert!(is_noise("xy"));
        assert!(is_noise(""));
        assert!(is_noise("   "));
        assert!(!is_noise("This is a sentence."));
        assert!(!is_noise("No."));
    }

    #[test]
    fn test_keeps_long_paragraphs() {
        let normalizer = ParagraphNormalizer::default();
        let paras = vec!["A".repeat(80), "B".repeat(100), "C".repeat(70)];
        assert_eq!(normalizer.remove_short_runs(paras.clone()), paras);
    }

    #[test]
    fn test_removes_long_run_of_short() {
        let normalizer = ParagraphNormalizer::default();
        let mut paras = vec!["Long paragraph here.".repeat(5)];
        paras.extend(strings(&["cell"; 8]));
        paras.push("Another long one.".repeat(5));

        let result = normalizer.remove_short_runs(paras);
        assert_eq!(result.len(), 2);
        assert!(!result.join(" ").contains("cell"));
    }

    #[test]
    fn test_keeps_short_run_below_threshold() {
        let normalizer = ParagraphNormalizer::default();
        let mut paras = vec!["Long paragraph.".repeat(5)];
        paras.extend(strings(&["cell"; 3]));
        paras.push("Another.".repeat(5));

        assert_eq!(normalizer.remove_short_runs(paras).len(), 5);
    }

    #[test]
    fn test_keeps_leading_header_lines() {
        let normalizer = ParagraphNormalizer::new(ParagraphConfig::default().with_short_run_min(7));
        let mut paras = strings(&[
            "A Great Title",
            "Jane Doe",
            "February 2026",
            "Abstract text",
            "More abstract",
            "Keywords here",
        ]);
        paras.push("Long body paragraph.".repeat(5));
        paras.extend(strings(&["cell"; 8]));

        let result = normalizer.remove_short_runs(paras);
        assert!(result.contains(&"A Great Title".to_string()));
        assert!(result.contains(&"Jane Doe".to_string()));
        assert!(!result.contains(&"cell".to_string()));
    }

    #[test]
    fn test_configurable_run_length() {
        let normalizer =
            ParagraphNormalizer::new(ParagraphConfig::default().with_short_run_min(3));
        let mut paras = vec!["Long paragraph.".repeat(5)];
        paras.extend(strings(&["cell"; 3]));

        assert_eq!(normalizer.remove_short_runs(paras).len(), 1);
    }

    #[test]
    fn test_joins_wrapped_lines() {
        let raw = "This is a long line that fills the full width of the page in a PDF document.\n\
                   This continues the same paragraph and should be joined with the line above.\n\
                   And this is yet another continuation of the same flowing paragraph text.\n";
        let result = ParagraphNormalizer::default().normalize(raw);
        assert!(!result.contains("\n\n"));
        assert!(result.starts_with("This is a long line"));
    }

    #[test]
    fn test_preserves_paragraph_break() {
        let raw = "First paragraph which is long enough to be a real paragraph in a document.\n\
                   \n\
                   Second paragraph which is also long enough to be a real paragraph here.\n";
        let result = ParagraphNormalizer::default().normalize(raw);
        assert_eq!(result.matches("\n\n").count(), 1);
    }

    #[test]
    fn test_rejoins_hyphenation_across_paragraphs() {
        let raw = "This is a long enough line to establish a reasonable typical length for analysis.\n\
                   occupa-\n\
                   tional mobility is important for studying social change over time.";
        let result = ParagraphNormalizer::default().normalize(raw);
        assert!(result.contains("occupational"));
    }

    #[test]
    fn test_drops_page_numbers_and_fragments() {
        let raw = "A sufficiently long sentence that sets the typical width of the page.\n\
                   \n\
                   42\n\
                   \n\
                   xy\n\
                   \n\
                   No.\n\
                   \n\
                   Another sufficiently long sentence that closes the page nicely here.";
        let result = ParagraphNormalizer::default().normalize(raw);
        let paras: Vec<&str> = result.split("\n\n").collect();
        assert_eq!(paras.len(), 3);
        assert_eq!(paras[1], "No.");
        assert!(!result.contains("42"));
        assert!(!result.contains("xy"));
    }

    #[test]
    fn test_short_text_returned_trimmed() {
        let raw = "  Title\nAuthor\n  ";
        assert_eq!(ParagraphNormalizer::default().normalize(raw), "Title\nAuthor");
    }
}
