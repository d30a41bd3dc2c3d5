use std::fmt;

use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// 1-based line and column inside the text handed to the compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Position of byte `offset` in `source`. Columns count characters.
    pub fn of_offset(source: &str, offset: usize) -> Self {
        let before = &source[..offset.min(source.len())];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        Position {
            line: before.matches('\n').count() as u32 + 1,
            column: before[line_start..].chars().count() as u32 + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub position: Option<Position>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>, position: Option<Position>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            position,
        }
    }

    pub fn error(message: impl Into<String>, position: Option<Position>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            position,
        }
    }

    fn tag(&self) -> &'static str {
        match self.severity {
            Severity::Warning => "[WARNING]",
            Severity::Error => "[ERROR]",
        }
    }
}

/// `[WARNING] 3:14:message`, or `[WARNING] message` when there is no position.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(p) => write!(f, "{} {}:{}:{}", self.tag(), p.line, p.column, self.message),
            None => write!(f, "{} {}", self.tag(), self.message),
        }
    }
}

pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Writes each diagnostic to standard error, preceded by a blank line.
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&self, diagnostic: Diagnostic) {
        let tag = match diagnostic.severity {
            Severity::Warning => diagnostic.tag().yellow().bold(),
            Severity::Error => diagnostic.tag().red().bold(),
        };
        match diagnostic.position {
            Some(p) => eprintln!("\n{} {}:{}:{}", tag, p.line, p.column, diagnostic.message),
            None => eprintln!("\n{} {}", tag, diagnostic.message),
        }
    }
}
