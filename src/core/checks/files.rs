// Project layout check: required files must exist as regular files
use std::path::PathBuf;

use crate::core::runner::Check;
use crate::core::types::{check_names, CheckResult};

pub fn default_required_files() -> Vec<String> {
    vec![
        "README.md".to_string(),
        "LICENSE".to_string(),
        ".gitignore".to_string(),
    ]
}

pub struct FolderStructureCheck {
    root: PathBuf,
    required: Vec<String>,
}

impl FolderStructureCheck {
    pub fn new(root: impl Into<PathBuf>, required: Vec<String>) -> Self {
        Self {
            root: root.into(),
            required,
        }
    }

    /// Required entries that are absent or not regular files, in config order
    pub fn missing_files(&self) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| !self.root.join(name).is_file())
            .cloned()
            .collect()
    }
}

impl Check for FolderStructureCheck {
    fn name(&self) -> &'static str {
        check_names::FOLDER_STRUCTURE
    }

    fn run(&self) -> CheckResult {
        let missing = self.missing_files();
        if missing.is_empty() {
            CheckResult::pass(self.name(), "All required files present")
        } else {
            CheckResult::fail(
                self.name(),
                format!("Missing required files: {}", missing.join(", ")),
            )
        }
    }
}
