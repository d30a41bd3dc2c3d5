use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use tempfile::tempdir;
use website_compressor::compressor::{self, Compressors};
use website_compressor::diagnostics::{Diagnostic, DiagnosticSink};
use website_compressor::options::Options;
use website_compressor::walker::Walker;

struct Quiet;

impl DiagnosticSink for Quiet {
    fn report(&self, _: Diagnostic) {}
}

fn run(targets: &[PathBuf]) -> anyhow::Result<website_compressor::walker::Report> {
    website_compressor::run(Options::default(), targets, Rc::new(Quiet))
}

#[test]
fn test_folder_compresses_known_types_only() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("a.css"), "body {\n  color: red;\n}\n").unwrap();
    fs::write(root.join("b.txt"), "keep   me\r\n").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(
        root.join("sub").join("c.js"),
        "function double(value) {\n  return value * 2;\n}\n",
    )
    .unwrap();

    let report = run(&[root.to_path_buf()]).unwrap();

    assert_eq!(fs::read_to_string(root.join("a.css")).unwrap(), "body{color:red}");
    assert_eq!(fs::read(root.join("b.txt")).unwrap(), b"keep   me\r\n");
    let js = fs::read_to_string(root.join("sub").join("c.js")).unwrap();
    assert!(js.contains("double"));
    assert!(!js.contains("value"));
    assert_eq!(report.files_seen, 3);
    assert_eq!(report.files_compressed, 2);
}

#[test]
fn test_extensions_any_case_and_unknown_untouched() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let loose_css = "a  {  color : red  }\n";
    let routed = [
        ("A.CSS", loose_css),
        ("page.Html", "<p>\n  hi   there\n</p>\n"),
        ("app.Js", "var  x = 1 ;\n"),
        ("feed.XML", "<a>\n  <b/>\n</a>\n"),
    ];
    let ignored = ["noext", ".css", "trailing.", "style.less", "index.htm"];
    for (name, body) in routed {
        fs::write(root.join(name), body).unwrap();
    }
    for name in ignored {
        fs::write(root.join(name), loose_css).unwrap();
    }

    run(&[root.to_path_buf()]).unwrap();

    for (name, body) in routed {
        let now = fs::read_to_string(root.join(name)).unwrap();
        assert!(now.len() < body.len(), "{name} was not compressed: {now:?}");
    }
    for name in ignored {
        assert_eq!(fs::read_to_string(root.join(name)).unwrap(), loose_css, "{name} changed");
    }
    assert_eq!(fs::read_to_string(root.join("feed.XML")).unwrap(), "<a><b/></a>");
}

#[test]
fn test_compressor_built_once_for_ten_files() {
    let dir = tempdir().unwrap();
    for i in 0..10 {
        fs::write(dir.path().join(format!("s{i}.css")), format!(".c{i} {{ margin: {i}px }}\n")).unwrap();
    }

    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let options = Options::default();
    let charset = options.charset;
    let sink: Rc<dyn DiagnosticSink> = Rc::new(Quiet);
    let compressors = Compressors::with_factory(Box::new(move |kind| {
        counter.set(counter.get() + 1);
        compressor::build(kind, &options, &sink)
    }));

    let mut walker = Walker::new(charset, compressors);
    walker.process(dir.path()).unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(walker.report().files_compressed, 10);
    assert_eq!(
        fs::read_to_string(dir.path().join("s3.css")).unwrap(),
        ".c3{margin:3px}"
    );
}

#[test]
fn test_first_failure_aborts_the_run() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("1-bad.js"), "var = ;\n").unwrap();
    fs::write(root.join("2-good.css"), "a { color: red }\n").unwrap();

    let err = run(&[root.to_path_buf()]).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("Failed to compress"), "{chain}");
    assert!(chain.contains("1-bad.js"), "{chain}");
    assert_eq!(fs::read_to_string(root.join("1-bad.js")).unwrap(), "var = ;\n");
    assert_eq!(fs::read_to_string(root.join("2-good.css")).unwrap(), "a { color: red }\n");
}

#[test]
fn test_missing_targets() {
    let dir = tempdir().unwrap();
    assert!(run(&[dir.path().join("gone.css")]).is_err());

    let report = run(&[dir.path().join("gone.txt")]).unwrap();
    assert_eq!(report.files_compressed, 0);
}

#[test]
fn test_targets_processed_in_order() {
    let dir = tempdir().unwrap();
    let single = dir.path().join("single.xml");
    fs::write(&single, "<r>\n  <!-- c -->\n</r>\n").unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir_all(nested.join("deeper")).unwrap();
    fs::write(nested.join("deeper").join("x.css"), "x { top: 0px }\n").unwrap();

    let report = run(&[single.clone(), nested.clone()]).unwrap();
    assert_eq!(report.files_compressed, 2);
    assert_eq!(fs::read_to_string(&single).unwrap(), "<r></r>");
    assert_eq!(
        fs::read_to_string(nested.join("deeper").join("x.css")).unwrap(),
        "x{top:0}"
    );
}
