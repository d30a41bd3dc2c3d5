use crate::compressor::Compressor;
use crate::error::CompressError;
use crate::markup::{self, MarkupOptions};
use crate::options::Options;

/// Removes comments and the whitespace between tags. Text content, CDATA
/// sections and declarations are left as they are.
pub struct XmlCompressor {
    markup: MarkupOptions,
}

impl XmlCompressor {
    pub fn new(options: &Options) -> Self {
        XmlCompressor {
            markup: MarkupOptions {
                remove_comments: !options.preserve_comments,
                remove_intertag_spaces: !options.preserve_intertag_spaces,
                ..MarkupOptions::default()
            },
        }
    }
}

impl Compressor for XmlCompressor {
    fn compress(&self, input: &str) -> Result<String, CompressError> {
        markup::minify_markup(input, &self.markup, |_, _, _| Ok(None))
    }
}
