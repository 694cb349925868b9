//! Builds small PDFs in memory for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const TITLE_SIZE: f32 = 16.0;
pub const BODY_SIZE: f32 = 11.0;

/// One line of text set at a font size.
#[derive(Debug, Clone)]
pub struct Line {
    pub text: String,
    pub size: f32,
}

impl Line {
    pub fn title(text: &str) -> Self {
        Self {
            text: text.to_string(),
            size: TITLE_SIZE,
        }
    }

    pub fn body(text: &str) -> Self {
        Self {
            text: text.to_string(),
            size: BODY_SIZE,
        }
    }
}

/// Lay out `(title, body lines)` pairs top to bottom on one page.
pub fn section_page(sections: &[(&str, &[&str])]) -> Vec<Line> {
    let mut lines = Vec::new();
    for (title, body) in sections {
        lines.push(Line::title(title));
        lines.extend(body.iter().map(|b| Line::body(b)));
    }
    lines
}

fn page_operations(lines: &[Line]) -> Vec<Operation> {
    let mut ops = vec![Operation::new("BT", vec![])];
    ops.extend(column_operations(lines, 72));
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// Left and right columns side by side, both starting at the top margin.
fn two_column_operations(left: &[Line], right: &[Line]) -> Vec<Operation> {
    let mut ops = vec![Operation::new("BT", vec![])];
    ops.extend(column_operations(left, 72));
    ops.extend(column_operations(right, 320));
    ops.push(Operation::new("ET", vec![]));
    ops
}

fn column_operations(lines: &[Line], x: i64) -> Vec<Operation> {
    let mut ops = Vec::new();
    let mut y = 740.0f32;
    let mut first = true;

    for line in lines {
        let is_title = line.size >= TITLE_SIZE;
        if is_title && !first {
            y -= 10.0;
        }
        first = false;

        ops.push(Operation::new(
            "Tf",
            vec!["F1".into(), Object::Real(line.size)],
        ));
        ops.push(Operation::new(
            "Tm",
            vec![
                Object::Integer(1),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(1),
                Object::Integer(x),
                Object::Real(y),
            ],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.text.as_str())],
        ));

        y -= if is_title { 22.0 } else { 14.0 };
    }

    ops
}

/// Build a PDF with one page per entry. An empty entry is a page without
/// a content stream.
pub fn build_pdf(pages: &[Vec<Line>]) -> Vec<u8> {
    let pages: Vec<Vec<Operation>> = pages
        .iter()
        .map(|lines| {
            if lines.is_empty() {
                Vec::new()
            } else {
                page_operations(lines)
            }
        })
        .collect();
    build_pdf_from_operations(pages)
}

/// A single page set in two columns.
pub fn build_two_column_pdf(left: &[Line], right: &[Line]) -> Vec<u8> {
    build_pdf_from_operations(vec![two_column_operations(left, right)])
}

fn build_pdf_from_operations(pages: Vec<Vec<Operation>>) -> Vec<u8> {
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

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        if !operations.is_empty() {
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            page.set("Contents", content_id);
        }
        kids.push(doc.add_object(page).into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write a PDF into `dir` and return its path.
pub fn write_pdf(dir: &Path, name: &str, pages: &[Vec<Line>]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(pages)).unwrap();
    path
}

/// A single blank page.
pub fn blank_pdf() -> Vec<u8> {
    build_pdf(&[Vec::new()])
}

/// Two pages of a travel guide with five sections.
pub fn travel_guide() -> Vec<Vec<Line>> {
    vec![
        section_page(&[
            (
                "Coastal Adventures Nearby",
                &[
                    "The beaches east of the harbour have soft sand and calm water,",
                    "ideal for a group of friends who want to swim and kayak.",
                ],
            ),
            (
                "Nightlife And Entertainment",
                &[
                    "Bars and clubs around the old port stay open late, and the",
                    "nightlife draws college students from all over the region.",
                ],
            ),
            (
                "History Of The Old Town",
                &[
                    "Medieval ramparts and a Romanesque cathedral anchor the",
                    "historic quarter, with guided walks leaving every morning.",
                ],
            ),
        ]),
        section_page(&[
            (
                "Culinary Experiences Abound",
                &[
                    "Seafood restaurants along the promenade serve bouillabaisse,",
                    "and cooking classes teach groups to shop at the market.",
                ],
            ),
            (
                "Packing Tips For Travellers",
                &[
                    "Bring light layers, sturdy sandals and a reusable bottle;",
                    "evenings by the water can turn cool after sunset.",
                ],
            ),
        ]),
    ]
}

/// Two pages of a dry technical manual with three sections.
pub fn technical_manual() -> Vec<Vec<Line>> {
    vec![
        section_page(&[
            (
                "Installing The Controller",
                &[
                    "Mount the controller on a vertical surface and connect the",
                    "ground wire before applying power to the terminal block.",
                ],
            ),
            (
                "Calibration Procedure Steps",
                &[
                    "Zero the pressure sensor with the valve closed, then record",
                    "the reference voltage shown on the diagnostic screen.",
                ],
            ),
        ]),
        section_page(&[(
            "Maintenance Schedule Overview",
            &[
                "Replace filters every six months and inspect seals annually",
                "for cracking, swelling or discoloration near the fittings.",
            ],
        )]),
    ]
}
