use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use log::debug;

use crate::css::CssCompressor;
use crate::diagnostics::DiagnosticSink;
use crate::error::CompressError;
use crate::html::HtmlCompressor;
use crate::js::JsCompressor;
use crate::options::Options;
use crate::xml::XmlCompressor;

/// Turns the full text of one file into its minified form.
pub trait Compressor {
    fn compress(&self, input: &str) -> Result<String, CompressError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Css,
    Html,
    JavaScript,
    Xml,
}

impl ContentType {
    pub fn from_extension(extension: &str) -> Option<Self> {
        [
            ("css", ContentType::Css),
            ("html", ContentType::Html),
            ("js", ContentType::JavaScript),
            ("xml", ContentType::Xml),
        ]
        .into_iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, kind)| kind)
    }

    /// Classifies a file by its name. Hidden files such as `.css` and names
    /// ending in a dot have no extension.
    pub fn for_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        extension_of(name).and_then(Self::from_extension)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentType::Css => "css",
            ContentType::Html => "html",
            ContentType::JavaScript => "javascript",
            ContentType::Xml => "xml",
        })
    }
}

pub fn extension_of(name: &str) -> Option<&str> {
    let dot = name.rfind('.')?;
    (dot > 0 && dot + 1 < name.len()).then(|| &name[dot + 1..])
}

pub type Factory = Box<dyn FnMut(ContentType) -> Box<dyn Compressor>>;

/// Builds one compressor per content type on first use and hands out the
/// same instance for every later file of that type.
pub struct Compressors {
    factory: Factory,
    built: HashMap<ContentType, Box<dyn Compressor>>,
}

impl Compressors {
    pub fn new(options: Options, sink: Rc<dyn DiagnosticSink>) -> Self {
        Self::with_factory(Box::new(move |kind| build(kind, &options, &sink)))
    }

    pub fn with_factory(factory: Factory) -> Self {
        Compressors {
            factory,
            built: HashMap::new(),
        }
    }

    pub fn get(&mut self, kind: ContentType) -> &dyn Compressor {
        let factory = &mut self.factory;
        &**self.built.entry(kind).or_insert_with(|| {
            debug!("building {kind} compressor");
            factory(kind)
        })
    }

    #[cfg(test)]
    pub(crate) fn is_built(&self, kind: ContentType) -> bool {
        self.built.contains_key(&kind)
    }
}

pub fn build(kind: ContentType, options: &Options, sink: &Rc<dyn DiagnosticSink>) -> Box<dyn Compressor> {
    match kind {
        ContentType::Css => Box::new(CssCompressor::new(options.line_break, Rc::clone(sink))),
        ContentType::Html => Box::new(HtmlCompressor::new(options, Rc::clone(sink))),
        ContentType::JavaScript => Box::new(JsCompressor::new(options, Rc::clone(sink))),
        ContentType::Xml => Box::new(XmlCompressor::new(options)),
    }
}
