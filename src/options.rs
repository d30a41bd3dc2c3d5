use encoding_rs::{Encoding, REPLACEMENT, UTF_8};
use log::debug;

/// Settings shared by every compressor adapter. Built once from the command
/// line and never changed afterwards.
#[derive(Debug, Clone)]
pub struct Options {
    pub charset: &'static Encoding,
    /// Column after which a line break is forced. `None` keeps one line.
    pub line_break: Option<usize>,
    pub compress_css: bool,
    pub compress_js: bool,
    pub disable_optimizations: bool,
    pub no_munge: bool,
    pub preserve_comments: bool,
    pub preserve_intertag_spaces: bool,
    pub preserve_line_breaks: bool,
    pub preserve_multi_spaces: bool,
    pub preserve_quotes: bool,
    pub preserve_semi: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            charset: UTF_8,
            line_break: None,
            compress_css: false,
            compress_js: false,
            disable_optimizations: false,
            no_munge: false,
            preserve_comments: false,
            preserve_intertag_spaces: false,
            preserve_line_breaks: false,
            preserve_multi_spaces: false,
            preserve_quotes: false,
            preserve_semi: false,
        }
    }
}

/// Looks up a charset label, falling back to UTF-8 when the label is missing
/// or names an encoding that cannot be used for decoding.
pub fn resolve_charset(label: Option<&str>) -> &'static Encoding {
    let Some(label) = label else {
        return UTF_8;
    };
    match Encoding::for_label(label.trim().as_bytes()) {
        Some(encoding) if encoding != REPLACEMENT => encoding,
        _ => {
            debug!("unsupported charset {label:?}, using UTF-8");
            UTF_8
        }
    }
}

/// Negative columns mean "no line break".
pub fn line_break_column(value: Option<i64>) -> Option<usize> {
    value.and_then(|col| usize::try_from(col).ok())
}
