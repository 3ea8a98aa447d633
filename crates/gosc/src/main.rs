//! gosc - semantic front end for a Go subset
//!
//! Usage: gosc --input <source> --output <graph.dot>

use anyhow::{Context as _, Result};
use clap::Parser as ClapParser;
use go_frontend::common::DiagnosticReporter;
use go_frontend::driver::{self, write_graph};
use go_frontend::Config;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "gosc")]
#[command(version)]
#[command(about = "Type-check a Go subset and export its annotated derivation", long_about = None)]
struct Args {
    /// Source file to translate
    #[arg(short, long)]
    input: PathBuf,

    /// Destination of the DOT graph
    #[arg(short, long)]
    output: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether the source translated without diagnostics
fn run(args: &Args) -> Result<bool> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let translation = driver::translate(&source, &Config::default());

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(args.input.display().to_string(), source);
    reporter.report_all(file_id, &translation.diagnostics);

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    let mut out = BufWriter::new(file);
    write_graph(translation.root.as_ref(), &mut out)
        .and_then(|()| out.flush())
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    log::info!(
        "{}: {} diagnostics",
        args.input.display(),
        translation.diagnostics.len()
    );
    Ok(translation.diagnostics.is_empty())
}
