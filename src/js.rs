use std::rc::Rc;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions};
use oxc::diagnostics::OxcDiagnostic;
use oxc::minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::compressor::Compressor;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Position};
use crate::error::CompressError;
use crate::linebreak::{self, CodeBytes, Syntax, is_ident_byte};
use crate::options::Options;

/// JavaScript minification with `oxc`: parse, optimize, mangle, print.
pub struct JsCompressor {
    line_break: Option<usize>,
    munge: bool,
    preserve_all_semicolons: bool,
    disable_optimizations: bool,
    sink: Rc<dyn DiagnosticSink>,
}

impl JsCompressor {
    pub fn new(options: &Options, sink: Rc<dyn DiagnosticSink>) -> Self {
        JsCompressor {
            line_break: options.line_break,
            munge: !options.no_munge,
            preserve_all_semicolons: options.preserve_semi,
            disable_optimizations: options.disable_optimizations,
            sink,
        }
    }

    fn minifier_options(&self, mangle: bool) -> MinifierOptions {
        MinifierOptions {
            mangle: mangle.then(MangleOptions::default),
            compress: (!self.disable_optimizations).then(CompressOptions::default),
        }
    }

    // Minified printing drops the semicolon before `}`; the regular printer
    // terminates every statement.
    fn codegen_options(&self) -> CodegenOptions {
        if self.preserve_all_semicolons {
            CodegenOptions {
                minify: false,
                ..CodegenOptions::minify()
            }
        } else {
            CodegenOptions::minify()
        }
    }

    fn fail(&self, source: &str, error: &OxcDiagnostic) -> CompressError {
        let message = error.message.to_string();
        let position = error
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| Position::of_offset(source, label.offset()));
        self.sink.report(Diagnostic::error(message.clone(), position));
        CompressError::JavaScript { message, position }
    }
}

impl Compressor for JsCompressor {
    fn compress(&self, input: &str) -> Result<String, CompressError> {
        let mut mangle = self.munge;
        if mangle {
            let hazards = scope_hazards(input);
            for &(offset, word) in &hazards {
                self.sink.report(Diagnostic::warning(
                    format!(
                        "Using '{word}' is not recommended. Moreover, using '{word}' reduces the level of compression!"
                    ),
                    Some(Position::of_offset(input, offset)),
                ));
            }
            // Renaming locals is unsafe once code can look names up at runtime.
            mangle = hazards.is_empty();
        }

        let allocator = Allocator::default();
        let parsed = Parser::new(&allocator, input, SourceType::default().with_module(false)).parse();
        if let Some(error) = parsed.errors.first() {
            return Err(self.fail(input, error));
        }
        let mut program = parsed.program;
        let minified = Minifier::new(self.minifier_options(mangle)).build(&allocator, &mut program);
        let code = Codegen::new()
            .with_options(self.codegen_options())
            .with_scoping(minified.scoping)
            .build(&program)
            .code;

        Ok(match self.line_break {
            Some(column) => linebreak::break_lines(&code, column, Syntax::JavaScript),
            None => code,
        })
    }
}

/// Offsets of `eval` and `with` used as identifiers, outside literals and
/// comments and not as property names.
fn scope_hazards(source: &str) -> Vec<(usize, &'static str)> {
    let bytes = source.as_bytes();
    CodeBytes::new(source, Syntax::JavaScript)
        .filter(|&(offset, _)| {
            offset == 0 || !(is_ident_byte(bytes[offset - 1]) || bytes[offset - 1] == b'.')
        })
        .filter_map(|(offset, _)| {
            ["eval", "with"]
                .into_iter()
                .find(|word| {
                    bytes[offset..].starts_with(word.as_bytes())
                        && !bytes
                            .get(offset + word.len())
                            .is_some_and(|&b| is_ident_byte(b))
                })
                .map(|word| (offset, word))
        })
        .collect()
}
