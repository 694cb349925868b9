//! Section extraction from generated PDFs.

mod common;

use common::{
    blank_pdf, build_pdf, build_two_column_pdf, section_page, travel_guide, write_pdf, Line,
};
use pdfrank::{extract_sections, Error, ExtractOptions, SectionExtractor, TitleRule};

#[test]
fn test_sections_follow_page_order() {
    let sections = SectionExtractor::default()
        .extract_bytes(&build_pdf(&travel_guide()))
        .unwrap();

    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Coastal Adventures Nearby",
            "Nightlife And Entertainment",
            "History Of The Old Town",
            "Culinary Experiences Abound",
            "Packing Tips For Travellers",
        ]
    );
    let pages: Vec<u32> = sections.iter().map(|s| s.page).collect();
    assert_eq!(pages, vec![1, 1, 1, 2, 2]);
}

#[test]
fn test_body_lines_joined() {
    let sections = SectionExtractor::default()
        .extract_bytes(&build_pdf(&travel_guide()))
        .unwrap();

    assert_eq!(
        sections[0].text,
        "The beaches east of the harbour have soft sand and calm water, \
         ideal for a group of friends who want to swim and kayak."
    );
}

#[test]
fn test_two_column_page_yields_one_section_per_column() {
    let pdf = build_two_column_pdf(
        &section_page(&[(
            "Coastal Adventures Nearby",
            &["Sheltered coves for swimming and", "kayaking line the whole coast."],
        )]),
        &section_page(&[(
            "Culinary Experiences Abound",
            &["Cooking classes teach regional", "cuisine and market shopping."],
        )]),
    );
    let sections = SectionExtractor::default().extract_bytes(&pdf).unwrap();

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "Coastal Adventures Nearby");
    assert_eq!(
        sections[0].text,
        "Sheltered coves for swimming and kayaking line the whole coast."
    );
    assert_eq!(sections[1].title, "Culinary Experiences Abound");
    assert_eq!(
        sections[1].text,
        "Cooking classes teach regional cuisine and market shopping."
    );
}

#[test]
fn test_extract_file_matches_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "guide.pdf", &travel_guide());

    let from_file = extract_sections(&path).unwrap();
    let from_bytes = SectionExtractor::default()
        .extract_bytes(&std::fs::read(&path).unwrap())
        .unwrap();
    assert_eq!(from_file, from_bytes);
}

#[test]
fn test_blank_document_has_no_sections() {
    let sections = SectionExtractor::default()
        .extract_bytes(&blank_pdf())
        .unwrap();
    assert!(sections.is_empty());
}

#[test]
fn test_short_sections_and_untitled_text_dropped() {
    let page = vec![
        Line::body("Introductory text before any heading is not part of a section."),
        Line::title("Coastal Adventures Nearby"),
        Line::body("Too short to keep."),
        Line::title("Culinary Experiences Abound"),
        Line::body("Seafood restaurants along the promenade serve fresh fish daily."),
    ];
    let sections = SectionExtractor::default()
        .extract_bytes(&build_pdf(&[page]))
        .unwrap();

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Culinary Experiences Abound");
}

#[test]
fn test_title_rule_is_configurable() {
    let page = section_page(&[(
        "Coastal adventures nearby",
        &["The beaches east of the harbour have soft sand and calm water for swimming."],
    )]);
    let pdf = build_pdf(&[page]);

    assert!(SectionExtractor::default()
        .extract_bytes(&pdf)
        .unwrap()
        .is_empty());

    let relaxed = ExtractOptions::new().with_title_rule(TitleRule::new().with_title_case(false));
    let sections = SectionExtractor::new(relaxed).extract_bytes(&pdf).unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Coastal adventures nearby");
}

#[test]
fn test_not_a_pdf_is_document_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    std::fs::write(&path, "<html>not a pdf</html>").unwrap();

    let err = extract_sections(&path).unwrap_err();
    assert!(!err.is_fatal());
    match err {
        Error::DocumentRead { document, .. } => assert_eq!(document, "report.pdf"),
        other => panic!("unexpected error: {other}"),
    }
}
