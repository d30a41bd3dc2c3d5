use std::string::FromUtf8Error;

use crate::diagnostics::Position;

/// Errors raised by a compressor adapter while minifying one file's text.
///
/// ```text
///   CompressError
///   ├── Css         ← lightningcss could not parse, minify or print the sheet
///   ├── JavaScript  ← oxc could not parse the source
///   └── Utf8        ← an engine produced bytes that are not UTF-8
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CompressError {
    #[error("CSS error{}: {message}", at(.position))]
    Css {
        message: String,
        position: Option<Position>,
    },

    #[error("JavaScript syntax error{}: {message}", at(.position))]
    JavaScript {
        message: String,
        position: Option<Position>,
    },

    #[error("minified output is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),
}

fn at(position: &Option<Position>) -> String {
    match position {
        Some(p) => format!(" at {}:{}", p.line, p.column),
        None => String::new(),
    }
}
