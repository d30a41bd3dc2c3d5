use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::*;
use encoding_rs::Encoding;
use log::{info, trace};
use walkdir::WalkDir;

use crate::compressor::{Compressors, ContentType};
use crate::textio;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub files_seen: usize,
    pub files_compressed: usize,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl Report {
    pub fn print_summary(&self) {
        eprintln!("\n{}", "📦 Compression summary".bold().green());
        eprintln!("{} {}", "Files seen:       ".blue(), self.files_seen);
        eprintln!("{} {}", "Files compressed: ".blue(), self.files_compressed);
        eprintln!(
            "{} {:.2} KB -> {:.2} KB",
            "Size:             ".magenta(),
            self.bytes_in as f64 / 1024.0,
            self.bytes_out as f64 / 1024.0
        );
        let ratio = self.bytes_out as f64 / self.bytes_in.max(1) as f64;
        eprintln!("{} {:.2}%", "Overall ratio:    ".yellow(), ratio * 100.0);
    }
}

/// Walks targets and rewrites every recognized file in place.
///
/// The first file that fails to read, compress or write stops the walk; the
/// files handled before it stay rewritten.
pub struct Walker {
    charset: &'static Encoding,
    compressors: Compressors,
    report: Report,
}

impl Walker {
    pub fn new(charset: &'static Encoding, compressors: Compressors) -> Self {
        Walker {
            charset,
            compressors,
            report: Report::default(),
        }
    }

    pub fn process(&mut self, path: &Path) -> anyhow::Result<()> {
        if !path.is_dir() {
            return self.process_file(path);
        }
        // unreadable directories and broken links are skipped silently
        for entry in WalkDir::new(path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_dir() {
                self.process_file(entry.path())?;
            }
        }
        Ok(())
    }

    fn process_file(&mut self, path: &Path) -> anyhow::Result<()> {
        self.report.files_seen += 1;
        let Some(kind) = ContentType::for_path(path) else {
            trace!("skipping {}", path.display());
            return Ok(());
        };

        let original_size = fs::metadata(path)
            .with_context(|| format!("Failed to open {}", path.display()))?
            .len();
        let input = textio::read_text(path, self.charset)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let output = self
            .compressors
            .get(kind)
            .compress(&input)
            .with_context(|| format!("Failed to compress {}", path.display()))?;
        let written = textio::write_text(path, &output, self.charset)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(
            "{kind} {}: {original_size} -> {written} bytes",
            path.display()
        );
        self.report.files_compressed += 1;
        self.report.bytes_in += original_size;
        self.report.bytes_out += written as u64;
        Ok(())
    }

    pub fn report(&self) -> Report {
        self.report
    }
}
