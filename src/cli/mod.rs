//! The sycheck command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::PathBuf;
use std::{fs, io, process};

use clap::Parser;

use crate::cli::args::{Command, Selection, SycheckArgs};
use crate::cli::output::Reporter;
use crate::corpus::{discover_cases, CaseFilter, CaseOrdering};
use crate::errors::{HarnessError, Result};
use crate::harness::{run_batch, BatchOptions, BatchReport};
use crate::toolchain::{CommandTemplate, ToolchainConfig, ToolchainRunner};

pub mod args;
pub mod output;

/// The main entry point for the CLI. Exits nonzero when any selected case
/// did not pass or the harness itself failed.
pub fn run() {
    let args = SycheckArgs::parse();

    let result = match args.command {
        Command::Run {
            selection,
            config,
            keep_going,
            json,
        } => handle_run(&selection, config.as_deref(), keep_going, json.as_deref()),
        Command::List { selection } => handle_list(&selection),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Translates the CLI selection surface into a corpus root and filter.
fn resolve_selection(selection: &Selection) -> (PathBuf, CaseFilter) {
    let root = match selection.suite {
        Some(suite) => selection.corpus.join(suite.dir_name()),
        None => selection.corpus.clone(),
    };
    let range = selection
        .from
        .clone()
        .zip(selection.to.clone());
    let filter = CaseFilter {
        prefix: selection.prefix.clone(),
        range,
        exclude: selection.exclude.clone(),
        ordering: if selection.numeric {
            CaseOrdering::Numeric
        } else {
            CaseOrdering::Lexical
        },
    };
    (root, filter)
}

fn handle_list(selection: &Selection) -> Result<bool> {
    let (root, filter) = resolve_selection(selection);
    let cases = discover_cases(&root, &filter)?;
    for case in &cases {
        println!("{}", case.id);
    }
    Ok(true)
}

fn handle_run(
    selection: &Selection,
    config: Option<&std::path::Path>,
    keep_going: bool,
    json: Option<&std::path::Path>,
) -> Result<bool> {
    let (root, filter) = resolve_selection(selection);
    let cases = discover_cases(&root, &filter)?;

    let config = match config {
        Some(path) => ToolchainConfig::load(path)?,
        None => ToolchainConfig::with_compiler(CommandTemplate::new("./compiler")),
    };
    let runner = ToolchainRunner::new(config);
    let mut reporter = Reporter::auto();

    let report = run_batch(
        &cases,
        &runner,
        &mut reporter,
        BatchOptions {
            fail_fast: !keep_going,
        },
    );

    if let Some(path) = json {
        write_json_report(path, &report)?;
    }
    Ok(report.summary.all_passed())
}

fn write_json_report(path: &std::path::Path, report: &BatchReport) -> Result<()> {
    let body = serde_json::to_vec_pretty(report).map_err(|e| HarnessError::WriteFile {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })?;
    fs::write(path, body).map_err(|e| HarnessError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
