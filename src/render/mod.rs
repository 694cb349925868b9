//! Rendering of analysis reports.

mod json;

pub use json::{to_json, to_json_value, write_report, JsonFormat};
