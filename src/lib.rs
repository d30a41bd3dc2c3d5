//! In-place minification of website assets.

pub mod cli;
pub mod compressor;
pub mod css;
pub mod diagnostics;
pub mod error;
pub mod html;
pub mod js;
pub mod linebreak;
pub mod markup;
pub mod options;
pub mod textio;
pub mod walker;
pub mod xml;

use std::path::PathBuf;
use std::rc::Rc;

use compressor::Compressors;
use diagnostics::DiagnosticSink;
use options::Options;
use walker::{Report, Walker};

/// Compresses every target in order. Stops at the first failing file.
pub fn run(options: Options, targets: &[PathBuf], sink: Rc<dyn DiagnosticSink>) -> anyhow::Result<Report> {
    let charset = options.charset;
    let mut walker = Walker::new(charset, Compressors::new(options, sink));
    for target in targets {
        walker.process(target)?;
    }
    Ok(walker.report())
}
