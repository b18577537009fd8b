//! Defines the command-line arguments and subcommands for sycheck.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "sycheck",
    version,
    about = "Differential test harness for a SysY compiler toolchain."
)]
pub struct SycheckArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every selected case through the toolchain and compare results.
    Run {
        #[command(flatten)]
        selection: Selection,

        /// Toolchain description file (YAML). Without it the stock
        /// llvm-as/llvm-link/lli pipeline with `./compiler` is assumed.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Keep running after a failure instead of halting at the first.
        #[arg(long)]
        keep_going: bool,

        /// Write a machine-readable JSON report to this path.
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
    },
    /// List the case ids the filters select, without running anything.
    List {
        #[command(flatten)]
        selection: Selection,
    },
}

/// Case-selection filters shared by `run` and `list`.
#[derive(Debug, Args)]
pub struct Selection {
    /// Corpus root directory.
    #[arg(default_value = "testcases")]
    pub corpus: PathBuf,

    /// Named corpus subset (subdirectory of the corpus root).
    #[arg(long, value_enum)]
    pub suite: Option<Suite>,

    /// Only cases whose id starts with this literal prefix.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Lower bound (inclusive) of an id range.
    #[arg(long, requires = "to", value_name = "ID")]
    pub from: Option<String>,

    /// Upper bound (exclusive) of an id range.
    #[arg(long, requires = "from", value_name = "ID")]
    pub to: Option<String>,

    /// Exclude a specific case id (repeatable).
    #[arg(long, value_name = "ID")]
    pub exclude: Vec<String>,

    /// Order and range-compare ids by their leading number instead of
    /// lexically (for corpora with unpadded numeric ids).
    #[arg(long)]
    pub numeric: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Suite {
    Functional,
    Performance,
}

impl Suite {
    pub fn dir_name(self) -> &'static str {
        match self {
            Suite::Functional => "functional",
            Suite::Performance => "performance",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn run_accepts_full_selection_surface() {
        let args = SycheckArgs::parse_from([
            "sycheck",
            "run",
            "corpus",
            "--suite",
            "functional",
            "--prefix",
            "24",
            "--from",
            "247",
            "--to",
            "324",
            "--exclude",
            "320_io",
            "--exclude",
            "246_io",
            "--numeric",
            "--keep-going",
        ]);
        let Command::Run {
            selection,
            keep_going,
            ..
        } = args.command
        else {
            panic!("expected run subcommand");
        };
        assert_eq!(selection.corpus, PathBuf::from("corpus"));
        assert_eq!(selection.suite, Some(Suite::Functional));
        assert_eq!(selection.prefix.as_deref(), Some("24"));
        assert_eq!(selection.from.as_deref(), Some("247"));
        assert_eq!(selection.to.as_deref(), Some("324"));
        assert_eq!(selection.exclude, vec!["320_io", "246_io"]);
        assert!(selection.numeric);
        assert!(keep_going);
    }

    #[test]
    fn range_bounds_require_each_other() {
        assert!(SycheckArgs::try_parse_from(["sycheck", "list", "--from", "100"]).is_err());
        assert!(SycheckArgs::try_parse_from(["sycheck", "list", "--to", "200"]).is_err());
    }
}
