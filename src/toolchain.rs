//! External-toolchain orchestration for one test case.
//!
//! A configured toolchain is an ordered list of external-stage command
//! templates: front-end compiler, IR assembler, linker, and executor. The
//! runner invokes them synchronously in sequence, wiring stdin redirection
//! from the case's `.in` file and capturing the final stage's stdout. Each
//! case gets a private workspace under `work_dir` for its intermediate
//! artifacts, so sequential runs never trample each other's files.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use serde::Deserialize;

use crate::corpus::TestCase;
use crate::errors::{HarnessError, Result, Stage};
use crate::verdict::RunOutcome;

/// One external-stage invocation: a program plus its fixed base arguments.
/// Stage-specific arguments (artifact paths) are appended per run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandTemplate {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandTemplate {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// How the front-end participates in a run.
///
/// `Pipeline` is the full compile → assemble → link → execute chain over a
/// textual IR artifact. `Direct` covers interpreter configurations where
/// the compiler invocation itself executes the program and its exit status
/// is the observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Pipeline,
    Direct,
}

/// Toolchain description, loadable from a YAML file.
///
/// `ir_output` and `staged_source` are fixed paths because they belong to
/// the external tool's contract (where the compiler writes its IR, and the
/// fixed filename some tools read instead of taking a path argument); they
/// are only safe because cases run strictly one at a time.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    #[serde(default)]
    pub mode: ExecutionMode,
    pub compiler: CommandTemplate,
    /// Where the front-end writes its textual IR (pipeline mode).
    #[serde(default = "default_ir_output")]
    pub ir_output: PathBuf,
    #[serde(default = "default_assembler")]
    pub assembler: CommandTemplate,
    #[serde(default = "default_linker")]
    pub linker: CommandTemplate,
    #[serde(default = "default_executor")]
    pub executor: CommandTemplate,
    /// Runtime-support binary artifact linked into every case.
    #[serde(default = "default_runtime_lib")]
    pub runtime_lib: PathBuf,
    /// Root for per-case artifact workspaces.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    /// Fixed filename the tool reads when it does not take a path argument
    /// (direct mode); the case source is copied there before the run.
    #[serde(default)]
    pub staged_source: Option<PathBuf>,
}

fn default_ir_output() -> PathBuf {
    PathBuf::from("testmy.ll")
}

fn default_assembler() -> CommandTemplate {
    CommandTemplate::new("llvm-as")
}

fn default_linker() -> CommandTemplate {
    CommandTemplate::new("llvm-link")
}

fn default_executor() -> CommandTemplate {
    CommandTemplate::new("lli")
}

fn default_runtime_lib() -> PathBuf {
    PathBuf::from("sylib.bc")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("target/sycheck-work")
}

impl ToolchainConfig {
    /// Loads a toolchain description from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| HarnessError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_yaml::from_str(&raw).map_err(|e| HarnessError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// A pipeline config with the stock llvm-as / llvm-link / lli stages
    /// and the given front-end command.
    pub fn with_compiler(compiler: CommandTemplate) -> Self {
        Self {
            mode: ExecutionMode::default(),
            compiler,
            ir_output: default_ir_output(),
            assembler: default_assembler(),
            linker: default_linker(),
            executor: default_executor(),
            runtime_lib: default_runtime_lib(),
            work_dir: default_work_dir(),
            staged_source: None,
        }
    }
}

/// Runs the configured stages for one case at a time. All invocations are
/// blocking; no stage starts before the previous one exits.
#[derive(Debug)]
pub struct ToolchainRunner {
    config: ToolchainConfig,
}

impl ToolchainRunner {
    pub fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    /// Executes the full stage sequence for `case` and reads back what it
    /// printed and how it exited.
    ///
    /// A nonzero front-end status in pipeline mode aborts with
    /// [`HarnessError::BuildFailure`] before any comparison can happen;
    /// assembler or linker failures abort with
    /// [`HarnessError::StageFailure`].
    pub fn run_case(&self, case: &TestCase) -> Result<RunOutcome> {
        let workspace = self.case_workspace(&case.id)?;
        match self.config.mode {
            ExecutionMode::Pipeline => self.run_pipeline(case, &workspace),
            ExecutionMode::Direct => self.run_direct(case, &workspace),
        }
    }

    fn run_pipeline(&self, case: &TestCase, workspace: &Path) -> Result<RunOutcome> {
        // Front-end: nonzero here is a build error, not a test failure.
        let mut compile = self.config.compiler.command();
        compile.arg(&case.source);
        let status = run_stage(Stage::Compile, &self.config.compiler.program, &mut compile)?;
        if !status.success() {
            return Err(HarnessError::BuildFailure {
                id: case.id.clone(),
                status: raw_exit_code(status),
            });
        }

        let assembled = workspace.join("case.bc");
        let mut assemble = self.config.assembler.command();
        assemble.arg(&self.config.ir_output).arg("-o").arg(&assembled);
        let status = run_stage(Stage::Assemble, &self.config.assembler.program, &mut assemble)?;
        check_stage(Stage::Assemble, case, status)?;

        let linked = workspace.join("linked.bc");
        let mut link = self.config.linker.command();
        link.arg(&self.config.runtime_lib)
            .arg(&assembled)
            .arg("-o")
            .arg(&linked);
        let status = run_stage(Stage::Link, &self.config.linker.program, &mut link)?;
        check_stage(Stage::Link, case, status)?;

        let mut execute = self.config.executor.command();
        execute.arg(&linked);
        self.execute_and_capture(case, workspace, &self.config.executor.program, execute)
    }

    fn run_direct(&self, case: &TestCase, workspace: &Path) -> Result<RunOutcome> {
        let mut cmd = self.config.compiler.command();
        match &self.config.staged_source {
            // The tool reads a fixed filename; stage the source there.
            Some(staged) => {
                fs::copy(&case.source, staged).map_err(|e| HarnessError::WriteFile {
                    path: staged.clone(),
                    source: e,
                })?;
            }
            None => {
                cmd.arg(&case.source);
            }
        }
        self.execute_and_capture(case, workspace, &self.config.compiler.program, cmd)
    }

    /// Final stage: wire stdin from the case's `.in` file when present,
    /// capture stdout into the workspace, and read it back along with the
    /// raw exit status.
    fn execute_and_capture(
        &self,
        case: &TestCase,
        workspace: &Path,
        program: &str,
        mut cmd: Command,
    ) -> Result<RunOutcome> {
        match &case.stdin {
            Some(path) => {
                let input = File::open(path).map_err(|e| HarnessError::ReadFile {
                    path: path.clone(),
                    source: e,
                })?;
                cmd.stdin(Stdio::from(input));
            }
            None => {
                cmd.stdin(Stdio::null());
            }
        }
        // Stderr stays on the console: toolchain noise is for the operator,
        // never part of the observed behavior.
        cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());

        let output = cmd.output().map_err(|e| HarnessError::Spawn {
            stage: Stage::Execute,
            program: program.to_string(),
            source: e,
        })?;

        let capture = workspace.join("captured.out");
        fs::write(&capture, &output.stdout).map_err(|e| HarnessError::WriteFile {
            path: capture.clone(),
            source: e,
        })?;
        let captured = fs::read(&capture).map_err(|e| HarnessError::ReadFile {
            path: capture,
            source: e,
        })?;

        Ok(RunOutcome::new(
            &String::from_utf8_lossy(&captured),
            raw_exit_code(output.status),
        ))
    }

    fn case_workspace(&self, id: &str) -> Result<PathBuf> {
        let dir = self.config.work_dir.join(id);
        fs::create_dir_all(&dir).map_err(|e| HarnessError::WriteFile {
            path: dir.clone(),
            source: e,
        })?;
        Ok(dir)
    }
}

fn run_stage(stage: Stage, program: &str, cmd: &mut Command) -> Result<ExitStatus> {
    cmd.status().map_err(|e| HarnessError::Spawn {
        stage,
        program: program.to_string(),
        source: e,
    })
}

/// Assembler/linker nonzero status is an infrastructure failure, kept
/// apart from observed program behavior.
fn check_stage(stage: Stage, case: &TestCase, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    Err(HarnessError::StageFailure {
        stage,
        id: case.id.clone(),
        status: raw_exit_code(status),
    })
}

/// Raw exit code for normalization. A signal-terminated process maps to
/// the shell convention `128 + signal` on Unix.
fn raw_exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status
            .code()
            .or_else(|| status.signal().map(|sig| 128 + sig))
            .unwrap_or(-1)
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(-1)
    }
}
