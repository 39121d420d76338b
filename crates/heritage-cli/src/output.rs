//! Output formatting and reporting
//!
//! Human output is colored with `colored`; JSON output is a single document
//! on stdout so it can be piped.

use std::path::Path;

use colored::*;
use heritage_core::{Diagnostic, FixCandidate, Severity};
use heritage_rules::RuleMetadata;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use crate::OutputFormat;

/// A diagnostic together with the fixes offered for it
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
    pub fixes: Vec<FixCandidate>,
}

/// Summary statistics for a run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    pub files_checked: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub hints: usize,
    pub fixes_applied: usize,
}

impl CheckSummary {
    pub fn new(files_checked: usize) -> Self {
        Self {
            files_checked,
            ..Self::default()
        }
    }

    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info => self.info += 1,
            Severity::Hint => self.hints += 1,
        }
    }

    pub fn total_issues(&self) -> usize {
        self.errors + self.warnings + self.info + self.hints
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Output formatter for the check command
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn print_reports(&self, reports: &[CheckReport], summary: &CheckSummary) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                for report in reports {
                    print_diagnostic(&report.diagnostic);
                    for fix in &report.fixes {
                        println!("  {} {}", "=".blue().bold(), describe_fix(fix));
                    }
                    println!();
                }
                print_summary(summary);
            }
            OutputFormat::Json => {
                let result = serde_json::json!({
                    "diagnostics": reports,
                    "summary": summary,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
        Ok(())
    }

    pub fn print_rules(&self, rules: &[(&RuleMetadata, bool)], detailed: bool) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                for (rule, enabled) in rules {
                    let state = if *enabled {
                        "enabled".green()
                    } else {
                        "off".dimmed()
                    };
                    println!(
                        "{} ({}) [{}] {}",
                        rule.id.bold(),
                        rule.category,
                        state,
                        rule.title
                    );
                    if detailed {
                        println!("  {}", rule.description);
                        println!("  Message: {}", rule.message_format);
                        println!("  Default severity: {}", rule.default_severity);
                    }
                }
            }
            OutputFormat::Json => {
                let rules: Vec<_> = rules
                    .iter()
                    .map(|(rule, enabled)| {
                        serde_json::json!({
                            "rule": rule,
                            "enabled": enabled,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rules)?);
            }
        }
        Ok(())
    }
}

pub fn print_diagnostic(diagnostic: &Diagnostic) {
    let severity = match diagnostic.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Info => "info".blue().bold(),
        Severity::Hint => "hint".cyan().bold(),
    };
    println!(
        "{}[{}]: {}",
        severity,
        diagnostic.rule_id,
        diagnostic.message.bold()
    );
    println!("  {} {}", "-->".blue().bold(), diagnostic.location);
}

pub fn describe_fix(fix: &FixCandidate) -> String {
    match &fix.target_namespace {
        Some(namespace) => format!("fix: {} (imports {})", fix.title, namespace),
        None => format!("fix: {}", fix.title),
    }
}

pub fn print_summary(summary: &CheckSummary) {
    println!("{}", "Summary:".bold());
    println!("  Files checked: {}", summary.files_checked);

    if summary.total_issues() > 0 {
        println!("  Issues found:");
        if summary.errors > 0 {
            println!("    Errors: {}", summary.errors.to_string().red());
        }
        if summary.warnings > 0 {
            println!("    Warnings: {}", summary.warnings.to_string().yellow());
        }
        if summary.info > 0 {
            println!("    Info: {}", summary.info.to_string().blue());
        }
        if summary.hints > 0 {
            println!("    Hints: {}", summary.hints.to_string().cyan());
        }
    } else {
        println!("  {}", "No issues found".green());
    }

    if summary.fixes_applied > 0 {
        println!(
            "  Fixes applied: {}",
            summary.fixes_applied.to_string().green()
        );
    }
}

/// Print a unified line diff of one file
pub fn print_diff(path: &Path, before: &str, after: &str) {
    println!("{}", format!("--- {}", path.display()).red());
    println!("{}", format!("+++ {}", path.display()).green());

    let diff = TextDiff::from_lines(before, after);
    for hunk in diff.unified_diff().context_radius(2).iter_hunks() {
        println!("{}", hunk.header().to_string().cyan());
        for change in hunk.iter_changes() {
            let line = change.value().trim_end_matches(['\r', '\n']);
            match change.tag() {
                ChangeTag::Delete => println!("{}", format!("-{line}").red()),
                ChangeTag::Insert => println!("{}", format!("+{line}").green()),
                ChangeTag::Equal => println!(" {line}"),
            }
        }
    }
}
