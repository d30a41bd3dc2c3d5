use std::rc::Rc;

use log::debug;
use minify_html::Cfg;

use crate::compressor::Compressor;
use crate::css::CssCompressor;
use crate::diagnostics::DiagnosticSink;
use crate::error::CompressError;
use crate::js::JsCompressor;
use crate::markup::{self, MarkupOptions, RawElement};
use crate::options::Options;

/// HTML minification.
///
/// `minify-html` shrinks tags and text first unless a spacing or quote flag
/// asks for them to be kept. The markup pass always runs after it and owns
/// comments, intertag spaces and the embedded `<style>`/`<script>` bodies.
pub struct HtmlCompressor {
    prepass: Option<Cfg>,
    markup: MarkupOptions,
    css: Option<CssCompressor>,
    js: Option<JsCompressor>,
}

impl HtmlCompressor {
    pub fn new(options: &Options, sink: Rc<dyn DiagnosticSink>) -> Self {
        let keeps_spacing = options.preserve_intertag_spaces
            || options.preserve_multi_spaces
            || options.preserve_line_breaks
            || options.preserve_quotes;
        let prepass = (!keeps_spacing).then(|| {
            debug!("html: minify-html before the markup pass");
            Cfg {
                keep_comments: true,
                keep_closing_tags: true,
                keep_html_and_head_opening_tags: true,
                ensure_spec_compliant_unquoted_attribute_values: true,
                ..Cfg::default()
            }
        });
        HtmlCompressor {
            prepass,
            markup: MarkupOptions {
                remove_comments: !options.preserve_comments,
                remove_intertag_spaces: !options.preserve_intertag_spaces,
                remove_multi_spaces: !options.preserve_multi_spaces,
                preserve_line_breaks: options.preserve_line_breaks,
                remove_quotes: !options.preserve_quotes,
                html: true,
            },
            css: options
                .compress_css
                .then(|| CssCompressor::new(options.line_break, Rc::clone(&sink))),
            js: options
                .compress_js
                .then(|| JsCompressor::new(options, Rc::clone(&sink))),
        }
    }
}

impl Compressor for HtmlCompressor {
    fn compress(&self, input: &str) -> Result<String, CompressError> {
        let shrunk;
        let input = match &self.prepass {
            Some(cfg) => {
                shrunk = String::from_utf8(minify_html::minify(input.as_bytes(), cfg))?;
                shrunk.as_str()
            }
            None => input,
        };
        markup::minify_markup(input, &self.markup, |element, open_tag, body| {
            if body.trim().is_empty() || is_wrapped(body) {
                return Ok(None);
            }
            match (element, &self.css, &self.js) {
                (RawElement::Style, Some(css), _) if is_css(open_tag) => css.compress(body).map(Some),
                (RawElement::Script, _, Some(js)) if is_javascript(open_tag) => {
                    js.compress(body).map(Some)
                }
                _ => Ok(None),
            }
        })
    }
}

// Bodies hidden from old browsers inside a comment or CDATA are left alone.
fn is_wrapped(body: &str) -> bool {
    let body = body.trim_start();
    body.starts_with("<!--") || body.starts_with("<![CDATA[")
}

fn is_css(open_tag: &str) -> bool {
    markup::attribute(open_tag, "type").is_none_or(|t| t.eq_ignore_ascii_case("text/css"))
}

fn is_javascript(open_tag: &str) -> bool {
    markup::attribute(open_tag, "type").is_none_or(|t| {
        let t = t.to_ascii_lowercase();
        t.is_empty() || t.contains("javascript") || t.contains("ecmascript") || t == "module"
    })
}
