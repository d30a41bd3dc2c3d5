use std::io;
use std::process;
use std::rc::Rc;

use website_compressor::cli::{self, Invocation};
use website_compressor::diagnostics::StderrSink;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match cli::parse_args(std::env::args_os()) {
        Invocation::Help => {
            cli::print_usage(&mut io::stdout())?;
        }
        Invocation::Version(version) => {
            print!("{version}");
        }
        Invocation::UsageError => {
            let _ = cli::print_usage(&mut io::stderr());
            process::exit(1);
        }
        Invocation::Run(request) => {
            let report = website_compressor::run(request.options, &request.targets, Rc::new(StderrSink))?;
            if request.verbose {
                report.print_summary();
            }
        }
    }

    Ok(())
}
