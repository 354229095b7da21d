//! Tool presence checks (`git`, `node`) through a command-execution seam

use std::process::{Command, Stdio};

use semver::Version;

use crate::core::runner::Check;
use crate::core::types::{check_names, CheckResult};

pub const DEFAULT_MIN_NODE_MAJOR: u64 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs an external program and captures its stdout
pub trait CommandRunner {
    fn run(&self, name: &str, args: &[&str]) -> std::io::Result<CommandOutput>;
}

#[derive(Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, name: &str, args: &[&str]) -> std::io::Result<CommandOutput> {
        let output = Command::new(name)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        })
    }
}

pub struct GitCheck<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> GitCheck<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> Check for GitCheck<R> {
    fn name(&self) -> &'static str {
        check_names::GIT
    }

    fn run(&self) -> CheckResult {
        match self.runner.run("git", &["--version"]) {
            Ok(output) if output.succeeded() => CheckResult::pass(self.name(), "Git is installed"),
            _ => CheckResult::fail(self.name(), "Git is not installed or not in PATH"),
        }
    }
}

pub struct NodeCheck<R: CommandRunner> {
    runner: R,
    min_major: u64,
}

impl<R: CommandRunner> NodeCheck<R> {
    pub fn new(runner: R, min_major: u64) -> Self {
        Self { runner, min_major }
    }
}

/// Parse `node --version` output such as `v18.17.1`
pub fn parse_node_version(output: &str) -> Option<Version> {
    let trimmed = output.trim();
    let raw = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(raw).ok()
}

impl<R: CommandRunner> Check for NodeCheck<R> {
    fn name(&self) -> &'static str {
        check_names::NODEJS
    }

    fn run(&self) -> CheckResult {
        let output = match self.runner.run("node", &["--version"]) {
            Ok(output) if output.succeeded() => output,
            _ => return CheckResult::fail(self.name(), "Node.js is not installed or not in PATH"),
        };

        match parse_node_version(&output.stdout) {
            Some(version) if version.major >= self.min_major => CheckResult::pass(
                self.name(),
                format!("Node.js v{} is installed", version.major),
            ),
            Some(version) => CheckResult::fail(
                self.name(),
                format!(
                    "Node.js version too old (v{}), need v{}+",
                    version.major, self.min_major
                ),
            ),
            None => CheckResult::pass(self.name(), "Node.js is installed (version check inconclusive)"),
        }
    }
}
