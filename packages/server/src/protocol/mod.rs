//! Line protocol codec.
//!
//! Parses one text line into a typed [`Request`] and formats response lines.
//! Holds no state.

mod request;
mod response;

pub use request::{CommandKind, ParsedLine, ProtocolError, Request, parse_line};
pub use response::{FALSE_RESPONSE, LINE_DELIMITER, format_error, format_listing, frame_line};
