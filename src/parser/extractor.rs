//! Section extraction: groups page blocks under heuristically detected titles.

use std::path::Path;

use crate::detect::pdf_version_from_path;
use crate::error::{Error, Result};
use crate::model::{RawBlock, Section};
use crate::text::TextCleaner;

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::LayoutAnalyzer;
use super::options::{ErrorMode, ExtractOptions};

/// Splits documents into titled sections.
#[derive(Debug, Clone, Default)]
pub struct SectionExtractor {
    options: ExtractOptions,
    cleaner: TextCleaner,
}

impl SectionExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            cleaner: TextCleaner::new(),
        }
    }

    /// The options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the sections of a PDF file.
    ///
    /// Any failure to open or parse the document is reported as
    /// [`Error::DocumentRead`] naming the file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Section>> {
        let path = path.as_ref();
        let document = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let read_error = |e: Error| Error::DocumentRead {
            document: document.clone(),
            reason: e.to_string(),
        };

        let version = pdf_version_from_path(path).map_err(read_error)?;
        let backend = LopdfBackend::load_file(path).map_err(read_error)?;
        log::debug!(
            "Loaded {} (PDF {}{})",
            document,
            version,
            if backend.is_encrypted() { ", encrypted" } else { "" }
        );

        self.extract(&backend).map_err(read_error)
    }

    /// Extract the sections of an in-memory PDF.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<Vec<Section>> {
        let backend = LopdfBackend::load_bytes(data)?;
        self.extract(&backend)
    }

    /// Extract sections from every page of a loaded document, in page order.
    pub fn extract<B: PdfBackend>(&self, backend: &B) -> Result<Vec<Section>> {
        let analyzer = LayoutAnalyzer::new(backend);
        let mut sections = Vec::new();

        for page_num in backend.pages().into_keys() {
            let blocks = match analyzer.extract_page_blocks(page_num) {
                Ok(blocks) => blocks,
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping unreadable page {}: {}", page_num, e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            sections.extend(self.sections_from_blocks(page_num, blocks));
        }

        log::debug!(
            "Extracted {} sections from {} pages",
            sections.len(),
            analyzer.page_count()
        );
        Ok(sections)
    }

    /// Group one page's blocks into sections.
    ///
    /// Blocks are read column by column, each top to bottom. A block that
    /// passes the title rule opens a new section; every other block is body
    /// text of the current one. Body text seen before the first title on the
    /// page is dropped.
    pub fn sections_from_blocks(&self, page: u32, mut blocks: Vec<RawBlock>) -> Vec<Section> {
        blocks.sort_by(|a, b| {
            a.column.cmp(&b.column).then(
                a.top
                    .partial_cmp(&b.top)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });

        let mut sections = Vec::new();
        let mut current_title: Option<String> = None;
        let mut current_paragraph: Vec<String> = Vec::new();

        for block in blocks {
            let mut text = self.cleaner.clean(&block.text);
            if text.is_empty() || self.options.noise_filter.is_noise(&text) {
                continue;
            }

            if self.options.title_rule.is_title(&text) {
                if let Some(title) = &current_title {
                    self.push_section(&mut sections, page, title, &current_paragraph);
                }
                current_title = Some(text);
                current_paragraph.clear();
            } else {
                if self.options.strip_bullets {
                    text = self.cleaner.strip_bullet_prefix(&text);
                }
                current_paragraph.push(text);
            }
        }

        if let Some(title) = &current_title {
            self.push_section(&mut sections, page, title, &current_paragraph);
        }

        sections
    }

    fn push_section(&self, sections: &mut Vec<Section>, page: u32, title: &str, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        let body = lines.join(" ").trim().to_string();
        if body.chars().count() > self.options.min_section_chars {
            sections.push(Section::new(body, page, title));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TitleRule;

    fn block(text: &str, top: f32) -> RawBlock {
        RawBlock::new(text, top, 1)
    }

    const BODY: &str = "The coastline offers sheltered coves for swimming and kayaking in summer.";

    #[test]
    fn test_groups_body_under_titles() {
        let extractor = SectionExtractor::default();
        let sections = extractor.sections_from_blocks(
            2,
            vec![
                block("Coastal Adventures Nearby", 10.0),
                block(BODY, 30.0),
                block("Culinary Experiences Abound", 60.0),
                block("Cooking classes teach the basics of regional cuisine and markets.", 80.0),
            ],
        );

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Coastal Adventures Nearby");
        assert_eq!(sections[0].text, BODY);
        assert_eq!(sections[0].page, 2);
        assert_eq!(sections[1].title, "Culinary Experiences Abound");
    }

    #[test]
    fn test_blocks_sorted_by_position() {
        let extractor = SectionExtractor::default();
        let sections = extractor.sections_from_blocks(
            1,
            vec![block(BODY, 30.0), block("Coastal Adventures Nearby", 10.0)],
        );
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Coastal Adventures Nearby");
    }

    #[test]
    fn test_columns_read_one_after_another() {
        let extractor = SectionExtractor::default();
        let right_body = "Cooking classes teach regional cuisine and market shopping.";
        let sections = extractor.sections_from_blocks(
            1,
            vec![
                block("Coastal Adventures Nearby", 10.0),
                block("Culinary Experiences Abound", 10.0).with_column(1),
                block(BODY, 30.0),
                block(right_body, 30.0).with_column(1),
            ],
        );

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Coastal Adventures Nearby");
        assert_eq!(sections[0].text, BODY);
        assert_eq!(sections[1].title, "Culinary Experiences Abound");
        assert_eq!(sections[1].text, right_body);
    }

    #[test]
    fn test_short_body_is_dropped() {
        let extractor = SectionExtractor::default();
        let sections = extractor.sections_from_blocks(
            1,
            vec![
                block("Coastal Adventures Nearby", 10.0),
                // 43 chars: passes the noise filter, fails the 50 char gate
                block("Pack sunscreen and a hat for the beach trip", 30.0),
            ],
        );
        assert!(sections.is_empty());
    }

    #[test]
    fn test_body_lines_joined_with_space() {
        let extractor = SectionExtractor::default();
        let sections = extractor.sections_from_blocks(
            1,
            vec![
                block("Packing Tips For Travellers", 10.0),
                block("Bring layers for cool evenings by the sea.", 20.0),
                block("Comfortable shoes matter on cobbled streets.", 30.0),
            ],
        );
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].text,
            "Bring layers for cool evenings by the sea. Comfortable shoes matter on cobbled streets."
        );
    }

    #[test]
    fn test_text_before_first_title_and_noise_ignored() {
        let extractor = SectionExtractor::default();
        let sections = extractor.sections_from_blocks(
            1,
            vec![
                block("An orphan paragraph with no title above it at all.", 5.0),
                block("Nightlife And Entertainment", 10.0),
                block("Page 3", 15.0),
                block("Short", 16.0),
                block(BODY, 20.0),
            ],
        );
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Nightlife And Entertainment");
        assert_eq!(sections[0].text, BODY);
    }

    #[test]
    fn test_consecutive_titles_keep_latest() {
        let extractor = SectionExtractor::default();
        let sections = extractor.sections_from_blocks(
            1,
            vec![
                block("Comprehensive Travel Guide", 5.0),
                block("Coastal Adventures Nearby", 10.0),
                block(BODY, 20.0),
            ],
        );
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Coastal Adventures Nearby");
    }

    #[test]
    fn test_whitespace_and_periods_cleaned() {
        let extractor = SectionExtractor::default();
        let sections = extractor.sections_from_blocks(
            1,
            vec![
                block("  Coastal   Adventures Nearby ", 10.0),
                block("Sheltered coves.... and   quiet   beaches line the coast for miles", 20.0),
            ],
        );
        assert_eq!(sections[0].title, "Coastal Adventures Nearby");
        assert_eq!(
            sections[0].text,
            "Sheltered coves. and quiet beaches line the coast for miles"
        );
    }

    #[test]
    fn test_bullet_stripping_option() {
        let extractor =
            SectionExtractor::new(ExtractOptions::new().with_strip_bullets(true));
        let sections = extractor.sections_from_blocks(
            1,
            vec![
                block("Packing Tips For Travellers", 10.0),
                block("• Bring layers for the cool evenings by the sea and the hills", 20.0),
            ],
        );
        assert_eq!(
            sections[0].text,
            "Bring layers for the cool evenings by the sea and the hills"
        );
    }

    #[test]
    fn test_custom_title_rule() {
        let extractor = SectionExtractor::new(
            ExtractOptions::new().with_title_rule(TitleRule::new().with_title_case(false)),
        );
        let sections = extractor.sections_from_blocks(
            1,
            vec![block("Coastal adventures nearby", 10.0), block(BODY, 20.0)],
        );
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Coastal adventures nearby");
    }

    #[test]
    fn test_extract_file_not_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"plain text, not a pdf").unwrap();

        let err = SectionExtractor::default().extract_file(&path).unwrap_err();
        match err {
            Error::DocumentRead { document, .. } => assert_eq!(document, "notes.pdf"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
