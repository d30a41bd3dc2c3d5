//! Whole-file text I/O in a configurable charset.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

pub fn read_text(path: &Path, charset: &'static Encoding) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let (decoded, _had_errors) = charset.decode_without_bom_handling(&bytes);
    Ok(normalize_line_endings(&decoded))
}

/// Truncates `path` and writes `text` encoded in `charset`. Nothing is added
/// after the text.
pub fn write_text(path: &Path, text: &str, charset: &'static Encoding) -> io::Result<usize> {
    let bytes = encode(text, charset);
    fs::write(path, &bytes)?;
    Ok(bytes.len())
}

pub fn normalize_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + LINE_SEPARATOR.len());
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(idx) => {
                out.push_str(&rest[..idx]);
                out.push_str(LINE_SEPARATOR);
                let width = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[idx + width..];
            }
            None => {
                out.push_str(rest);
                out.push_str(LINE_SEPARATOR);
                break;
            }
        }
    }
    out
}

// encoding_rs only encodes to UTF-8 for the UTF-16 family, so those are
// serialized by hand in their own byte order.
fn encode<'a>(text: &'a str, charset: &'static Encoding) -> Cow<'a, [u8]> {
    if charset == UTF_16LE {
        Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect())
    } else if charset == UTF_16BE {
        Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect())
    } else {
        let (bytes, _, _unmappable) = charset.encode(text);
        bytes
    }
}
