use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::debug;

use crate::options::{self, Options};

#[derive(Parser, Debug)]
#[command(
    name = "websitecompressor",
    version,
    about = "Minifies CSS, HTML, JavaScript and XML files in place",
    override_usage = "websitecompressor [options] <file-or-directory> [<file-or-directory> ...]",
    disable_help_flag = true
)]
pub struct CliArgs {
    /// Files or folders; every .css, .html, .js and .xml file is compressed in place
    #[arg(value_name = "FILES_OR_FOLDERS")]
    pub targets: Vec<PathBuf>,

    /// Print this screen
    #[arg(short, long, help_heading = "Global Options")]
    pub help: bool,

    /// Read and write the files using <CHARSET>
    #[arg(long, value_name = "CHARSET", help_heading = "Global Options")]
    pub charset: Option<String>,

    /// Print a summary when done
    #[arg(short, long, help_heading = "Global Options")]
    pub verbose: bool,

    /// Insert a line break after the specified column number
    #[arg(
        long,
        value_name = "COLUMN",
        allow_hyphen_values = true,
        help_heading = "CSS and JavaScript Options"
    )]
    pub line_break: Option<i64>,

    /// Enable inline CSS compression
    #[arg(long, help_heading = "HTML Options")]
    pub compress_css: bool,

    /// Enable inline JavaScript compression
    #[arg(long, help_heading = "HTML Options")]
    pub compress_js: bool,

    /// Preserve line breaks
    #[arg(long, help_heading = "HTML Options")]
    pub preserve_line_breaks: bool,

    /// Preserve multiple spaces
    #[arg(long, help_heading = "HTML Options")]
    pub preserve_multi_spaces: bool,

    /// Preserve unneeded quotes
    #[arg(long, help_heading = "HTML Options")]
    pub preserve_quotes: bool,

    /// Preserve comments
    #[arg(long, help_heading = "HTML and XML Options")]
    pub preserve_comments: bool,

    /// Preserve intertag spaces
    #[arg(long, help_heading = "HTML and XML Options")]
    pub preserve_intertag_spaces: bool,

    /// Disable all micro optimizations
    #[arg(long, help_heading = "JavaScript Options")]
    pub disable_optimizations: bool,

    /// Minify only, do not obfuscate
    #[arg(long = "nomunge", help_heading = "JavaScript Options")]
    pub no_munge: bool,

    /// Preserve all semicolons
    #[arg(long = "preserve-semi", help_heading = "JavaScript Options")]
    pub preserve_semi: bool,
}

/// What the command line asks the program to do.
#[derive(Debug)]
pub enum Invocation {
    Help,
    Version(String),
    UsageError,
    Run(RunRequest),
}

#[derive(Debug)]
pub struct RunRequest {
    pub options: Options,
    pub targets: Vec<PathBuf>,
    pub verbose: bool,
}

impl CliArgs {
    fn into_request(self) -> RunRequest {
        RunRequest {
            options: Options {
                charset: options::resolve_charset(self.charset.as_deref()),
                line_break: options::line_break_column(self.line_break),
                compress_css: self.compress_css,
                compress_js: self.compress_js,
                disable_optimizations: self.disable_optimizations,
                no_munge: self.no_munge,
                preserve_comments: self.preserve_comments,
                preserve_intertag_spaces: self.preserve_intertag_spaces,
                preserve_line_breaks: self.preserve_line_breaks,
                preserve_multi_spaces: self.preserve_multi_spaces,
                preserve_quotes: self.preserve_quotes,
                preserve_semi: self.preserve_semi,
            },
            targets: self.targets,
            verbose: self.verbose,
        }
    }
}

/// Parses a full argument vector, program name first.
///
/// A help flag wins over everything else, including arguments that would
/// otherwise be rejected.
pub fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    match CliArgs::try_parse_from(&args) {
        Ok(parsed) if parsed.help => Invocation::Help,
        Ok(parsed) if parsed.targets.is_empty() => Invocation::UsageError,
        Ok(parsed) => Invocation::Run(parsed.into_request()),
        Err(err) if err.kind() == ErrorKind::DisplayVersion => Invocation::Version(err.to_string()),
        Err(_) if requests_help(&args) => Invocation::Help,
        Err(err) => {
            debug!("rejected arguments: {err}");
            Invocation::UsageError
        }
    }
}

fn requests_help(args: &[OsString]) -> bool {
    args.iter()
        .skip(1)
        .take_while(|arg| *arg != "--")
        .any(|arg| arg == "-h" || arg == "--help")
}

pub fn print_usage(out: &mut dyn Write) -> io::Result<()> {
    let help = CliArgs::command().render_help();
    writeln!(out, "{}", help.to_string().trim_end())
}
