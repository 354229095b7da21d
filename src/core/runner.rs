//! Sequential check runner
//!
//! Checks are independent and run one after another; each yields exactly one
//! [`CheckResult`], which is handed to the reporter as soon as it exists.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::core::checks::{FolderStructureCheck, GitCheck, NodeCheck, SystemCommandRunner};
use crate::core::debug_logger::DebugLogger;
use crate::core::heartbeat::HeartbeatCheck;
use crate::core::report::Reporter;
use crate::core::types::CheckResult;

/// One independent environment validation
pub trait Check {
    /// Stable identifier, e.g. `git_check`
    fn name(&self) -> &'static str;
    fn run(&self) -> CheckResult;
}

pub struct Doctor {
    checks: Vec<Box<dyn Check>>,
    logger: Arc<DebugLogger>,
}

impl Doctor {
    pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
        Self {
            checks,
            logger: Arc::new(DebugLogger::disabled()),
        }
    }

    /// Logging is off unless a logger is supplied here
    pub fn with_logger(mut self, logger: Arc<DebugLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run every check in order, feeding results to `reporter`
    pub fn run(&self, reporter: &mut dyn Reporter) -> Vec<CheckResult> {
        reporter.begin();

        let mut results = Vec::with_capacity(self.checks.len());
        for check in &self.checks {
            self.logger.check_start(check.name());
            let started = Instant::now();

            let result = check.run();

            self.logger.check_end(
                check.name(),
                result.success,
                started.elapsed().as_millis() as u64,
            );
            reporter.record(&result);
            results.push(result);
        }

        reporter.finish();
        results
    }
}

/// The four checks in run order: git, node, project files, API connection
pub fn standard_checks(
    config: &Config,
    project_root: &Path,
    logger: Arc<DebugLogger>,
) -> Vec<Box<dyn Check>> {
    vec![
        Box::new(GitCheck::new(SystemCommandRunner)) as Box<dyn Check>,
        Box::new(NodeCheck::new(SystemCommandRunner, config.min_node_major)),
        Box::new(FolderStructureCheck::new(
            project_root,
            config.required_files.clone(),
        )),
        Box::new(
            HeartbeatCheck::new(config.timeout(), config.heartbeat_path.clone())
                .with_port(config.port)
                .with_logger(logger),
        ),
    ]
}

pub fn has_failures(results: &[CheckResult]) -> bool {
    results.iter().any(|result| !result.success)
}
