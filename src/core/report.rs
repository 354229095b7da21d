// Result sinks: colored terminal summary and machine-readable JSON
use std::io::Write;

use ansi_term::{Colour, Style};

use crate::core::heartbeat::error::SETUP_URL;
use crate::core::types::{check_names, CheckResult};

/// Receives check results as they are produced
pub trait Reporter {
    fn begin(&mut self) {}
    fn record(&mut self, result: &CheckResult);
    fn finish(&mut self);
}

/// Remediation hint for a failed check
pub fn debug_tip(check_name: &str) -> Option<String> {
    let tip = match check_name {
        check_names::GIT => {
            "Install Git from https://git-scm.com/downloads and make sure `git` is on your PATH".to_string()
        }
        check_names::NODEJS => {
            "Install a current Node.js LTS from https://nodejs.org (or via nvm) and make sure `node` is on your PATH".to_string()
        }
        check_names::FOLDER_STRUCTURE => {
            "Add the missing files to your project root; a README, a LICENSE and a .gitignore are expected".to_string()
        }
        check_names::API_CONNECTION => format!(
            "Export HACKATIME_API_KEY and HACKATIME_API_URL (see {}) and check that the API host is reachable",
            SETUP_URL
        ),
        _ => return None,
    };
    Some(tip)
}

pub struct TerminalReporter<W: Write> {
    out: W,
    color: bool,
    results: Vec<CheckResult>,
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            results: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn print_summary(&mut self) {
        let mut lines = Vec::with_capacity(self.results.len() + 2);
        lines.push(self.paint(Style::new().bold(), "\nSummary:"));

        for result in &self.results {
            let mark = if result.success {
                self.paint(Colour::Green.normal(), "✓")
            } else {
                self.paint(Colour::Red.normal(), "✗")
            };
            lines.push(format!("  {} [{}] {}", mark, result.check_name, result.message));
        }

        let passed = self.results.iter().filter(|r| r.success).count();
        let total = self.results.len();
        let tally = format!("\n{}/{} checks passed", passed, total);
        lines.push(if passed == total {
            self.paint(Colour::Green.bold(), &tally)
        } else {
            self.paint(Colour::Yellow.bold(), &tally)
        });

        for line in lines {
            let _ = writeln!(self.out, "{}", line);
        }
    }

    fn print_debug_tips(&mut self) {
        let tips: Vec<(String, String)> = self
            .results
            .iter()
            .filter(|r| !r.success)
            .filter_map(|r| debug_tip(&r.check_name).map(|tip| (r.check_name.clone(), tip)))
            .collect();

        if tips.is_empty() {
            return;
        }

        let header = self.paint(Colour::Yellow.bold(), "\nDebug tips:");
        let _ = writeln!(self.out, "{}", header);
        for (name, tip) in tips {
            let _ = writeln!(self.out, "  - {}: {}", name, tip);
        }
    }
}

impl<W: Write> Reporter for TerminalReporter<W> {
    fn begin(&mut self) {
        let banner = self.paint(
            Colour::Blue.normal(),
            "⚕️ HackaTime Doctor - Checking your development environment...",
        );
        let _ = writeln!(self.out, "{}", banner);
    }

    fn record(&mut self, result: &CheckResult) {
        self.results.push(result.clone());
    }

    fn finish(&mut self) {
        self.print_summary();
        self.print_debug_tips();
        let _ = self.out.flush();
    }
}

/// Prints all results as one pretty JSON array when the run ends
pub struct JsonReporter<W: Write> {
    out: W,
    results: Vec<CheckResult>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            results: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn record(&mut self, result: &CheckResult) {
        self.results.push(result.clone());
    }

    fn finish(&mut self) {
        if let Ok(json) = serde_json::to_string_pretty(&self.results) {
            let _ = writeln!(self.out, "{}", json);
        }
        let _ = self.out.flush();
    }
}
