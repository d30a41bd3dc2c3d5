use std::fmt;
use std::rc::Rc;
use std::sync::{Arc, RwLock};

use lightningcss::error::Error as CssError;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

use crate::compressor::Compressor;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Position};
use crate::error::CompressError;
use crate::linebreak::{self, Syntax};

/// Stylesheet minification through `lightningcss`.
///
/// Rules the parser can recover from are dropped and reported as warnings;
/// anything else fails the file.
pub struct CssCompressor {
    line_break: Option<usize>,
    sink: Rc<dyn DiagnosticSink>,
}

impl CssCompressor {
    pub fn new(line_break: Option<usize>, sink: Rc<dyn DiagnosticSink>) -> Self {
        CssCompressor { line_break, sink }
    }

    fn fail<T: fmt::Display>(&self, err: CssError<T>) -> CompressError {
        let (message, position) = describe(&err);
        self.sink.report(Diagnostic::error(message.clone(), position));
        CompressError::Css { message, position }
    }
}

impl Compressor for CssCompressor {
    fn compress(&self, input: &str) -> Result<String, CompressError> {
        let warnings = Arc::new(RwLock::new(Vec::new()));
        let parser_options = ParserOptions {
            error_recovery: true,
            warnings: Some(Arc::clone(&warnings)),
            ..ParserOptions::default()
        };

        let mut sheet = StyleSheet::parse(input, parser_options).map_err(|e| self.fail(e))?;
        if let Ok(recovered) = warnings.read() {
            for warning in recovered.iter() {
                let (message, position) = describe(warning);
                self.sink.report(Diagnostic::warning(message, position));
            }
        }

        sheet
            .minify(MinifyOptions::default())
            .map_err(|e| self.fail(e))?;
        let printed = sheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|e| self.fail(e))?;

        Ok(match self.line_break {
            Some(column) => linebreak::break_lines(&printed.code, column, Syntax::Css),
            None => printed.code,
        })
    }
}

// lightningcss lines are 0-based, columns 1-based.
fn describe<T: fmt::Display>(err: &CssError<T>) -> (String, Option<Position>) {
    let position = err.loc.as_ref().map(|loc| Position {
        line: loc.line + 1,
        column: loc.column,
    });
    (err.kind.to_string(), position)
}
