//! Rendering of responses and failures into panel text.

use crate::errors::Error;

/// Content-type fragments that mark a body as human readable. Matched case-sensitively.
pub const TEXTUAL_MARKERS: [&str; 4] = ["text", "json", "svg", "xml"];

/// Placeholder shown while an upload is in flight.
pub const SENDING: &str = "Sending...";

/// Placeholder shown while a fetch is in flight.
pub const FETCHING: &str = "Fetching...";

/// Advisory shown when an upload is attempted without a file.
pub const NO_FILE_SELECTED: &str = "Choose a file first";

pub fn is_textual(content_type: &str) -> bool {
    TEXTUAL_MARKERS.iter().any(|marker| content_type.contains(marker))
}

/// `Status: <code> <text>` followed by the body on the next line.
pub fn upload(status: u16, status_text: &str, body: &str) -> String {
    format!("Status: {status} {status_text}\n{body}")
}

/// Status line, content type, a blank line, then the body or its placeholder.
pub fn fetch(status: u16, status_text: &str, content_type: &str, body: &str) -> String {
    format!("Status: {status} {status_text}\nContent-Type: {content_type}\n\n{body}")
}

pub fn binary_placeholder(len: usize) -> String {
    format!("[binary {len} bytes]")
}

pub fn error(err: &Error) -> String {
    format!("Error: {}", err.describe())
}
