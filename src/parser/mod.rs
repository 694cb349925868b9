//! PDF reading and section extraction.

mod backend;
mod extractor;
mod layout;
mod options;

pub use backend::{
    decode_text_simple, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue, DEFAULT_PAGE_HEIGHT,
};
pub use extractor::SectionExtractor;
pub use layout::{LayoutAnalyzer, TextLine, TextSpan};
pub use options::{ErrorMode, ExtractOptions};
