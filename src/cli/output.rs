//! Handles all user-facing output for the CLI.
//!
//! Verdicts, failure diagnostics, and the end-of-run summary all go through
//! [`Reporter`] so every command colors and formats them the same way.

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::corpus::TestCase;
use crate::harness::{CaseOutcome, RunSummary};
use crate::verdict::Comparison;

/// Prints per-case verdicts and the batch summary to stdout.
pub struct Reporter {
    stdout: StandardStream,
}

impl Reporter {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
        }
    }

    /// Colors only when stdout is a terminal.
    pub fn auto() -> Self {
        let choice = if atty::is(atty::Stream::Stdout) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(choice)
    }

    /// Marker printed before the case runs, so a hung toolchain stage is
    /// attributable to a specific case.
    pub fn case_started(&mut self, id: &str) {
        println!("testing : {id}");
    }

    pub fn case_finished(&mut self, case: &TestCase, outcome: &CaseOutcome) {
        match outcome {
            CaseOutcome::Pass => self.pass(),
            CaseOutcome::Mismatch(comparison) => self.mismatch(comparison),
            CaseOutcome::BuildFailure { status } => self.build_failure(case, *status),
            CaseOutcome::Error { message } => self.case_error(message),
        }
    }

    fn pass(&mut self) {
        let _ = self
            .stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        println!("correct");
        let _ = self.stdout.reset();
    }

    /// The four compared values are wrapped in `>` `<` sentinels so that
    /// leading or trailing whitespace shows up on inspection.
    fn mismatch(&mut self, comparison: &Comparison) {
        let _ = self
            .stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        println!("wrong");
        let _ = self.stdout.reset();

        println!(">{}<", comparison.observed.exit_code);
        println!(">{}<", comparison.expected.exit_code);
        println!(">{}<", comparison.observed.output);
        println!(">{}<", comparison.expected.output);

        if comparison.observed.output != comparison.expected.output {
            println!("output diff (expected -> observed):");
            let changeset = Changeset::new(
                &comparison.expected.output,
                &comparison.observed.output,
                "\n",
            );
            self.print_diff(&changeset.diffs);
        }
    }

    /// A build failure is not a wrong answer: the front-end rejected the
    /// source and no comparison happened.
    fn build_failure(&mut self, case: &TestCase, status: i32) {
        let _ = self
            .stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        println!("build failed");
        let _ = self.stdout.reset();
        println!("compiler exited with status {status} for {}", case.source.display());
    }

    fn case_error(&mut self, message: &str) {
        let _ = self
            .stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        println!("error");
        let _ = self.stdout.reset();
        println!("{message}");
    }

    pub fn summary(&mut self, summary: &RunSummary) {
        print!("\nchecked {}: ", plural(summary.total(), "case"));
        self.count(summary.passed, "correct", Color::Green);
        print!(", ");
        self.count(summary.mismatched, "wrong", Color::Red);
        print!(", ");
        self.count(summary.build_failures, "build failures", Color::Yellow);
        print!(", ");
        self.count(summary.errors, "errors", Color::Yellow);
        println!();
    }

    fn count(&mut self, n: usize, label: &str, color: Color) {
        if n > 0 {
            let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(color)));
        }
        print!("{n} {label}");
        let _ = self.stdout.reset();
    }

    fn print_diff(&mut self, diffs: &[Difference]) {
        for diff in diffs {
            match diff {
                Difference::Same(x) => {
                    let _ = self.stdout.reset();
                    println!(" {x}");
                }
                Difference::Add(x) => {
                    let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                    println!("+{x}");
                }
                Difference::Rem(x) => {
                    let _ = self
                        .stdout
                        .set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                    println!("-{x}");
                }
            }
        }
        let _ = self.stdout.reset();
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
