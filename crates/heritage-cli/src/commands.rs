//! CLI command implementations

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use colored::*;
use heritage_core::{
    ConfigLoader, Diagnostic, DocumentSet, FixCandidate, HeritageConfig, HeritageError,
    ResultExt, SourceTree, discover_documents,
};
use heritage_rules::{LintEngine, RuleRegistry};
use tracing::{debug, info, warn};

use crate::output::{
    CheckReport, CheckSummary, OutputFormatter, describe_fix, print_diagnostic, print_diff,
    print_summary,
};
use crate::{ConfigFormat, OutputFormat};

/// Load the explicit config, or the nearest one above the first path
fn load_config(config_path: Option<&Path>, paths: &[PathBuf]) -> anyhow::Result<HeritageConfig> {
    let start_dir = paths.first().map(|path| {
        if path.is_file() {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            }
        } else {
            path.as_path()
        }
    });

    let config = ConfigLoader::load(config_path, start_dir)?;
    debug!("Loaded configuration");
    Ok(config)
}

/// Fix candidates, or none when no provider handles the rule
fn candidates_for(
    engine: &LintEngine,
    documents: &DocumentSet,
    diagnostic: &Diagnostic,
) -> anyhow::Result<Vec<FixCandidate>> {
    match engine.fixes_for(documents, diagnostic) {
        Ok(candidates) => Ok(candidates),
        Err(HeritageError::UnknownRule { .. }) => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Check command implementation
pub fn check_command(
    paths: Vec<PathBuf>,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    debug!("Running check command on paths: {:?}", paths);

    let config = load_config(config_path, &paths)?;
    let documents = discover_documents(&paths, &config.files)?;
    if documents.is_empty() && format == OutputFormat::Human {
        println!("No source files found in specified paths.");
        return Ok(ExitCode::SUCCESS);
    }

    let engine = LintEngine::from_config(&config);
    let diagnostics = engine.analyze(&documents)?;

    let mut summary = CheckSummary::new(documents.len());
    let mut reports = Vec::with_capacity(diagnostics.len());
    for diagnostic in diagnostics {
        summary.record(diagnostic.severity);
        let fixes = candidates_for(&engine, &documents, &diagnostic)?;
        reports.push(CheckReport { diagnostic, fixes });
    }

    OutputFormatter::new(format).print_reports(&reports, &summary)?;

    Ok(if summary.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Candidate to apply: the one named by `base`, else the only one
fn choose<'a>(candidates: &'a [FixCandidate], base: Option<&str>) -> Option<&'a FixCandidate> {
    match base {
        Some(base) => candidates.iter().find(|c| c.target_class == base),
        None if candidates.len() == 1 => candidates.first(),
        None => None,
    }
}

/// Fix command implementation
///
/// Fixes are applied one at a time; the file is re-analyzed after each so
/// every fix locates its class in the current text. Diagnostics without a
/// usable candidate, and fixes that fail, are reported and left alone.
pub fn fix_command(
    paths: Vec<PathBuf>,
    base: Option<&str>,
    dry_run: bool,
    config_path: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    debug!("Running fix command on paths: {:?}", paths);

    let config = load_config(config_path, &paths)?;
    let mut documents = discover_documents(&paths, &config.files)?;
    if documents.is_empty() {
        println!("No source files found in specified paths.");
        return Ok(ExitCode::SUCCESS);
    }

    let engine = LintEngine::from_config(&config);
    let files: Vec<PathBuf> = documents.iter().map(|d| d.path().to_path_buf()).collect();
    let mut summary = CheckSummary::new(files.len());
    let mut files_changed = 0;

    for path in &files {
        let Some(original) = documents.get(path).map(SourceTree::text) else {
            continue;
        };

        let mut skipped = 0;
        loop {
            let Some(current) = documents.get(path) else {
                break;
            };
            let diagnostics = engine.analyze_document(current);
            let Some(diagnostic) = diagnostics.get(skipped) else {
                break;
            };

            let candidates = candidates_for(&engine, &documents, diagnostic)?;
            let Some(candidate) = choose(&candidates, base) else {
                report_unfixed(diagnostic, &candidates, base);
                summary.record(diagnostic.severity);
                skipped += 1;
                continue;
            };

            let Some(fixed) = engine
                .apply_fix(&documents, diagnostic, candidate)
                .log_and_continue()
            else {
                summary.record(diagnostic.severity);
                skipped += 1;
                continue;
            };
            let remaining = engine.analyze_document(&fixed).len();
            documents.insert(fixed);
            summary.fixes_applied += 1;
            info!("{}: {}", diagnostic.location, candidate.title);

            if remaining >= diagnostics.len() {
                // The fix did not clear its diagnostic; do not retry it
                warn!("{} still reported after fix", diagnostic.location);
                skipped += 1;
            }
        }

        let Some(updated) = documents.get(path).map(SourceTree::text) else {
            continue;
        };
        if updated == original {
            continue;
        }
        files_changed += 1;

        if dry_run {
            print_diff(path, &original, &updated);
        } else {
            fs::write(path, &updated)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    let verb = if dry_run { "Would fix" } else { "Fixed" };
    println!(
        "{} {} issues in {} files",
        verb,
        summary.fixes_applied.to_string().green(),
        files_changed
    );
    print_summary(&summary);

    Ok(if summary.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn report_unfixed(diagnostic: &Diagnostic, candidates: &[FixCandidate], base: Option<&str>) {
    print_diagnostic(diagnostic);
    match (candidates.is_empty(), base) {
        (true, _) => println!("  {} no base controller found in this folder", "note:".yellow()),
        (false, Some(base)) => println!(
            "  {} no candidate named {} in this folder",
            "note:".yellow(),
            base
        ),
        (false, None) => {
            println!(
                "  {} several base controllers found; choose one with --base",
                "note:".yellow()
            );
            for candidate in candidates {
                println!("  {} {}", "=".blue().bold(), describe_fix(candidate));
            }
        }
    }
    println!();
}

/// Rules command implementation
pub fn rules_command(
    detailed: bool,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let config = ConfigLoader::load(config_path, None)?;
    let registry = RuleRegistry::builtin(&config);

    let rules: Vec<_> = RuleRegistry::builtin_metadata()
        .into_iter()
        .map(|rule| (rule, registry.analyzer(rule.id).is_some()))
        .collect();

    OutputFormatter::new(format).print_rules(&rules, detailed)?;
    Ok(ExitCode::SUCCESS)
}

fn render_config(config: &HeritageConfig, format: ConfigFormat) -> anyhow::Result<String> {
    Ok(match format {
        ConfigFormat::Toml => config.to_toml_string()?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
    })
}

/// Config init command implementation
pub fn config_init_command(format: ConfigFormat, force: bool) -> anyhow::Result<ExitCode> {
    let path = PathBuf::from(match format {
        ConfigFormat::Toml => ".heritagerc.toml",
        ConfigFormat::Json => ".heritagerc.json",
    });

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let content = render_config(&HeritageConfig::default(), format)?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Created {}", "✓".green(), path.display());
    Ok(ExitCode::SUCCESS)
}

/// Config show command implementation
pub fn config_show_command(
    format: ConfigFormat,
    config_path: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let config = ConfigLoader::load(config_path, None)?;
    println!("{}", render_config(&config, format)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chooses_named_or_sole_candidate() {
        let one = [FixCandidate::new("_BaseController", None)];
        let two = [
            FixCandidate::new("_BaseController", None),
            FixCandidate::new("_SecureController", None),
        ];

        assert_eq!(choose(&one, None).map(|c| c.target_class.as_str()), Some("_BaseController"));
        assert_eq!(choose(&two, None), None);
        assert_eq!(
            choose(&two, Some("_SecureController")).map(|c| c.target_class.as_str()),
            Some("_SecureController")
        );
        assert_eq!(choose(&one, Some("_Missing")), None);
        assert_eq!(choose(&[], None), None);
    }
}
