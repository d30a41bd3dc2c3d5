use std::fs;
use std::rc::Rc;

use tempfile::tempdir;
use website_compressor::diagnostics::{Diagnostic, DiagnosticSink};
use website_compressor::options::Options;

struct Quiet;

impl DiagnosticSink for Quiet {
    fn report(&self, _: Diagnostic) {}
}

fn make_css(rules: usize) -> String {
    (0..rules)
        .map(|i| format!(".rule-{i} {{\n    padding: {}px;\n    color: #336699;\n}}\n\n", i % 17))
        .collect()
}

fn make_js(functions: usize) -> String {
    (0..functions)
        .map(|i| {
            format!(
                "// helper {i}\nfunction helper{i}(input, factor) {{\n    var scaled = input * factor;\n    return scaled + {i};\n}}\n\n"
            )
        })
        .collect()
}

fn make_xml(items: usize) -> String {
    let body: String = (0..items)
        .map(|i| format!("    <!-- item {i} -->\n    <item n=\"{i}\">\n        value {i}\n    </item>\n"))
        .collect();
    format!("<?xml version=\"1.0\"?>\n<list>\n{body}</list>\n")
}

fn make_html(paragraphs: usize) -> String {
    let body: String = (0..paragraphs)
        .map(|i| format!("    <p class=\"para\">\n        Paragraph   number {i}\n    </p>\n"))
        .collect();
    format!("<!DOCTYPE html>\n<html>\n<body>\n{body}</body>\n</html>\n")
}

fn test_size(name: &str, source: &str, options: Options) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();

    let report = website_compressor::run(options, &[path.clone()], Rc::new(Quiet)).unwrap();
    let out = fs::read_to_string(&path).unwrap();
    assert_eq!(report.files_compressed, 1);
    assert_eq!(report.bytes_out, out.len() as u64);
    assert!(out.len() * 4 < source.len() * 3, "{name}: {} -> {}", source.len(), out.len());
}

#[test]
fn test_large_css() {
    test_size("big.css", &make_css(5_000), Options::default());
}

#[test]
fn test_large_css_with_line_breaks() {
    let options = Options {
        line_break: Some(200),
        ..Options::default()
    };
    let dir = tempdir().unwrap();
    let path = dir.path().join("wrapped.css");
    fs::write(&path, make_css(2_000)).unwrap();
    website_compressor::run(options, &[path.clone()], Rc::new(Quiet)).unwrap();

    let out = fs::read_to_string(&path).unwrap();
    assert!(out.lines().count() > 10);
    for line in out.lines() {
        assert!(line.ends_with('}'), "{line}");
    }
}

#[test]
fn test_large_js() {
    test_size("big.js", &make_js(2_000), Options::default());
}

#[test]
fn test_large_js_without_munging() {
    let options = Options {
        no_munge: true,
        ..Options::default()
    };
    test_size("plain.js", &make_js(2_000), options);
}

#[test]
fn test_large_xml() {
    test_size("big.xml", &make_xml(5_000), Options::default());
}

#[test]
fn test_large_html() {
    test_size("big.html", &make_html(5_000), Options::default());
}

#[test]
fn test_large_html_markup_pass() {
    let options = Options {
        preserve_line_breaks: true,
        ..Options::default()
    };
    test_size("lines.html", &make_html(5_000), options);
}
