//! PDF header sniffing.
//!
//! Documents listed in a run configuration are checked here before lopdf
//! loads them, so a mislabelled file fails fast with a clear error instead of
//! a parser message about a missing xref table.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const HEADER_LEN: usize = PDF_MAGIC.len() + 3; // "%PDF-1.7"

/// Read the header of a file and return its PDF version (e.g. "1.7").
pub fn pdf_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    File::open(path)?
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)?;
    pdf_version_from_bytes(&header)
}

/// Return the PDF version declared by a header, or an error if the bytes are
/// not a PDF.
pub fn pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    if data.len() < HEADER_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version = String::from_utf8_lossy(&data[PDF_MAGIC.len()..HEADER_LEN]).to_string();
    let bytes = version.as_bytes();
    if bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit() {
        Ok(version)
    } else {
        Err(Error::UnsupportedVersion(version))
    }
}

/// Check if a file starts with a PDF header.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    pdf_version_from_path(path).is_ok()
}
