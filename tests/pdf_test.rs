//! Integration tests for PDF reconstruction on generated documents.

use std::path::Path;

use docstruct::convert::{ConvertOptions, ConverterRegistry, OutputFormat, PdfConverter};
use docstruct::model::ContentElement;
use docstruct::pdf::{reconstruct, reconstruct_file, LopdfProvider, PageBlockProvider, ReconstructOptions};
use docstruct::Error;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tempfile::TempDir;

const LINE_1: &str = "Structure recovery turns page layouts back into readable paragraphs,";
const LINE_2: &str = "joining wrapped lines and repairing words split by hyphen-";
const LINE_3: &str = "ation at line ends.";
const PAGE_2: &str = "A second page holds a single closing sentence for the reader.";

const PARAGRAPH_1: &str = "Structure recovery turns page layouts back into readable paragraphs, joining wrapped lines and repairing words split by hyphenation at line ends.";

fn text_op(x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Two pages: a wrapped, hyphenated paragraph with a page number, then a
/// single sentence.
fn build_pdf() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let page_ops = [
        [
            text_op(72, 720, LINE_1),
            text_op(72, 706, LINE_2),
            text_op(72, 692, LINE_3),
            text_op(300, 40, "7"),
        ]
        .concat(),
        text_op(72, 720, PAGE_2),
    ];

    let mut kids: Vec<Object> = Vec::new();
    for operations in page_ops {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => 2,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn write_pdf(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("paper.pdf");
    build_pdf().save(&path).unwrap();
    path
}

fn pdf_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    build_pdf().save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn test_reconstruct_generated_pdf() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path());

    let text = reconstruct_file(&path, &ReconstructOptions::default()).unwrap();
    assert_eq!(text, format!("{}\n\n{}", PARAGRAPH_1, PAGE_2));
}

#[test]
fn test_sequential_matches_parallel() {
    let provider = LopdfProvider::from_bytes(&pdf_bytes()).unwrap();
    assert_eq!(provider.page_count(), 2);

    let parallel = reconstruct(&provider, &ReconstructOptions::default()).unwrap();
    let sequential = reconstruct(&provider, &ReconstructOptions::default().sequential()).unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_page_range() {
    let provider = LopdfProvider::from_bytes(&pdf_bytes()).unwrap();

    let second = reconstruct(&provider, &ReconstructOptions::new().with_page_range(1..2)).unwrap();
    assert_eq!(second, PAGE_2);

    let err = reconstruct(&provider, &ReconstructOptions::new().with_page_range(99..100)).unwrap_err();
    assert!(matches!(err, Error::PageOutOfRange(99, 2)));
}

#[test]
fn test_page_blocks_are_top_down() {
    let provider = LopdfProvider::from_bytes(&pdf_bytes()).unwrap();
    let blocks = provider.page_blocks(0).unwrap();

    assert!(!blocks.is_empty());
    assert!(blocks.iter().all(|b| b.y0 <= b.y1));
    assert!(blocks.windows(2).all(|w| w[0].y0 <= w[1].y0));
    assert!(blocks[0].text.starts_with(LINE_1));
}

#[test]
fn test_missing_pdf() {
    let err = reconstruct_file("no/such/paper.pdf", &ReconstructOptions::default()).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_invalid_pdf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"%PDF-1.4\nnot really a pdf").unwrap();

    let result = ConverterRegistry::with_defaults().load(&path, &ConvertOptions::default());
    assert!(matches!(
        result,
        Err(Error::PdfParse(_)) | Err(Error::Io(_)) | Err(Error::EmptyContent(_))
    ));
}

#[test]
fn test_pdf_converter() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path());

    let doc = ConverterRegistry::with_defaults()
        .load(&path, &ConvertOptions::default())
        .unwrap();
    assert_eq!(
        doc.elements,
        vec![
            ContentElement::paragraph(PARAGRAPH_1),
            ContentElement::paragraph(PAGE_2),
        ]
    );

    let options = ConvertOptions::new().with_format(OutputFormat::Json);
    let result = PdfConverter::new().convert_bytes(&pdf_bytes(), &options).unwrap();
    let json: serde_json::Value = serde_json::from_str(&result.content).unwrap();
    assert_eq!(json["elements"][0]["type"], "paragraph");
    assert_eq!(json["elements"][1]["text"], PAGE_2);
}
