//! Response formatting.

use std::fmt::Display;

/// Answer to unrecognized commands and duplicate channel creation
pub const FALSE_RESPONSE: &str = "FALSE";

/// Terminator of every line written to a stream transport
pub const LINE_DELIMITER: char = '\n';

const ENTRY_SEPARATOR: char = ';';

/// Join listing entries with `;`, trailing separator included.
///
/// Returns `None` for an empty listing: empty listings are not answered at all.
pub fn format_listing<I, S>(entries: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut response = String::new();
    for entry in entries {
        response.push_str(entry.as_ref());
        response.push(ENTRY_SEPARATOR);
    }
    (!response.is_empty()).then_some(response)
}

/// `ERROR <description>`
pub fn format_error<E: Display + ?Sized>(error: &E) -> String {
    format!("ERROR {error}")
}

/// Append the line delimiter for stream transports.
pub fn frame_line(line: &str) -> String {
    let mut framed = String::with_capacity(line.len() + 1);
    framed.push_str(line);
    framed.push(LINE_DELIMITER);
    framed
}
