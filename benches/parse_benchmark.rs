//! Benchmarks for structure recovery.
//!
//! Run with: cargo bench
//!
//! PDF input is synthetic; LaTeX input is generated in memory.

use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docstruct::latex::{clean, parse_latex_source, LatexOptions};
use docstruct::pdf::{reconstruct, LopdfProvider, ParagraphNormalizer, ReconstructOptions};
use docstruct::speech::chunk_text;

/// Creates a minimal synthetic PDF with the given number of pages.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut content = String::new();

    // PDF header
    content.push_str("%PDF-1.4\n");

    // Object 1: Catalog
    content.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    // Object 2: Pages
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", i + 3)).collect();
    content.push_str(&format!(
        "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
        kids.join(" "),
        page_count
    ));

    // Page objects and content
    let mut next_obj = 3;
    for i in 0..page_count {
        let page_obj = next_obj;
        let content_obj = next_obj + 1;
        next_obj += 2;

        // Page object
        content.push_str(&format!(
            "{} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R >>\nendobj\n",
            page_obj, content_obj
        ));

        // Content stream
        let text = format!(
            "BT /F1 12 Tf 100 700 Td (Page {} - Benchmark content for layout reconstruction measurement.) Tj ET",
            i + 1
        );
        content.push_str(&format!(
            "{} 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
            content_obj,
            text.len(),
            text
        ));
    }

    // Cross-reference table (simplified)
    let xref_offset = content.len();
    content.push_str(&format!("xref\n0 {}\n", next_obj));
    content.push_str("0000000000 65535 f \n");
    // Simplified: just write placeholder offsets
    for _ in 1..next_obj {
        content.push_str("0000000000 00000 n \n");
    }

    // Trailer
    content.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        next_obj, xref_offset
    ));

    content.into_bytes()
}

/// A LaTeX body with `sections` sections of mixed content.
fn create_test_latex(sections: usize) -> String {
    let mut source = String::from("\\documentclass{article}\n\\title{Benchmark \\emph{Paper}}\n\\begin{document}\n");
    for i in 0..sections {
        source.push_str(&format!(
            "\\section{{Section {i}}}\n\
             Text with \\textbf{{bold}} and $x_{i}$ math~\\cite{{ref{i}}}. More prose follows here.\n\n\
             \\subsection{{Details}}\n\
             \\begin{{itemize}}\\item First point.\\item Second point.\\end{{itemize}}\n\
             \\begin{{table}}\\caption{{Data {i}}}\\begin{{tabular}}{{ll}}a & b \\\\ c & d \\\\\\end{{tabular}}\\end{{table}}\n"
        ));
    }
    source.push_str("\\end{document}\n");
    source
}

/// Raw line-broken text resembling extracted PDF pages.
fn create_raw_text(paragraphs: usize) -> String {
    let mut raw = String::new();
    for i in 0..paragraphs {
        raw.push_str("This line is long enough to count as a full-width wrapped line of a para-\n");
        raw.push_str("graph that continues onto another full-width line before it finally ends\n");
        raw.push_str(&format!("with a short line {}.\n", i));
        raw.push_str(&format!("{}\n", i + 1));
    }
    raw
}

/// Benchmark format detection.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = create_test_pdf(1);
    let latex_data = create_test_latex(1).into_bytes();
    let unknown_data = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_pdf", |b| {
        b.iter(|| docstruct::detect_format_from_bytes(black_box(&pdf_data)).is_ok());
    });

    c.bench_function("detect_latex", |b| {
        b.iter(|| docstruct::detect_format_from_bytes(black_box(&latex_data)).is_ok());
    });

    c.bench_function("detect_unknown", |b| {
        b.iter(|| docstruct::detect_format_from_bytes(black_box(unknown_data)).is_err());
    });
}

/// Benchmark PDF reconstruction at various sizes.
fn bench_pdf_reconstruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdf_reconstruction");

    for page_count in [1, 5, 10].iter() {
        let data = create_test_pdf(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                // Synthetic PDFs carry placeholder xref offsets and may be rejected
                if let Ok(provider) = LopdfProvider::from_bytes(black_box(&data)) {
                    let _ = reconstruct(&provider, &ReconstructOptions::default());
                }
            });
        });
    }

    group.finish();
}

/// Benchmark paragraph normalization of raw page text.
fn bench_normalize(c: &mut Criterion) {
    let raw = create_raw_text(200);
    let normalizer = ParagraphNormalizer::default();

    c.bench_function("normalize_200_paragraphs", |b| {
        b.iter(|| normalizer.normalize(black_box(&raw)));
    });
}

/// Benchmark markup cleaning and whole-source parsing.
fn bench_latex(c: &mut Criterion) {
    let fragment = r"A \textbf{bold \emph{nested}} claim~\cite{a} with $x^2$ and 50\% more---see \url{https://example.org}.";
    c.bench_function("clean_fragment", |b| {
        b.iter(|| clean(black_box(fragment)));
    });

    let mut group = c.benchmark_group("latex_parsing");
    let options = LatexOptions::default();
    for sections in [10, 100].iter() {
        let source = create_test_latex(*sections);
        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter(|| parse_latex_source(black_box(&source), Path::new("."), &options));
        });
    }
    group.finish();
}

/// Benchmark sentence chunking.
fn bench_chunking(c: &mut Criterion) {
    let text = "A sentence of moderate length for packing. ".repeat(500);
    c.bench_function("chunk_text_500", |b| {
        b.iter(|| chunk_text(black_box(&text), 500));
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_pdf_reconstruction,
    bench_normalize,
    bench_latex,
    bench_chunking,
);
criterion_main!(benches);
