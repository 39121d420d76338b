//! Configuration types

use serde::{Deserialize, Serialize};

use crate::diagnostics::Severity;
use crate::{HeritageError, Result};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HeritageConfig {
    /// Per-rule settings
    pub rules: RulesConfiguration,
    /// Which files are analyzed
    pub files: FilesConfiguration,
    /// How fixes are written
    pub fix: FixConfiguration,
}

/// Rules configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesConfiguration {
    pub controller_inheritance: ControllerInheritanceConfig,
}

/// Settings of the controller inheritance rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerInheritanceConfig {
    pub severity: RuleSeverity,
    /// Prefix marking a class as a valid base controller
    pub reserved_prefix: String,
    /// Also flag controller classes that declare no base list at all
    pub require_base_list: bool,
}

impl Default for ControllerInheritanceConfig {
    fn default() -> Self {
        Self {
            severity: RuleSeverity::Error,
            reserved_prefix: "_".to_string(),
            require_base_list: false,
        }
    }
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Warning (doesn't fail the run)
    Warn,
    /// Error (fails the run)
    #[default]
    Error,
}

impl RuleSeverity {
    /// Diagnostic severity, `None` when the rule is off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

/// Files configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilesConfiguration {
    /// Glob patterns of files to analyze
    pub include: Vec<String>,
    /// Glob patterns excluded from analysis
    pub exclude: Vec<String>,
}

impl Default for FilesConfiguration {
    fn default() -> Self {
        Self {
            include: vec!["**/*.cs".to_string()],
            exclude: vec!["**/bin/**".to_string(), "**/obj/**".to_string()],
        }
    }
}

/// Fix configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FixConfiguration {
    /// Keyword for inserted import directives when a file has none to copy
    pub import_keyword: String,
}

impl Default for FixConfiguration {
    fn default() -> Self {
        Self {
            import_keyword: "using".to_string(),
        }
    }
}

impl HeritageConfig {
    /// Reject settings the rules cannot work with
    pub fn validate(&self) -> Result<()> {
        let prefix = &self.rules.controller_inheritance.reserved_prefix;
        if prefix.is_empty() {
            return Err(HeritageError::config_error(
                "rules.controllerInheritance.reservedPrefix must not be empty",
            ));
        }
        if prefix.chars().any(char::is_whitespace) {
            return Err(HeritageError::config_error(format!(
                "rules.controllerInheritance.reservedPrefix '{prefix}' contains whitespace"
            )));
        }

        let keyword = &self.fix.import_keyword;
        if keyword != "using" && keyword != "import" {
            return Err(HeritageError::config_error(format!(
                "fix.importKeyword must be 'using' or 'import', got '{keyword}'"
            )));
        }

        for pattern in self.files.include.iter().chain(&self.files.exclude) {
            glob::Pattern::new(pattern).map_err(|e| {
                HeritageError::config_error(format!("Invalid glob pattern '{pattern}': {e}"))
            })?;
        }

        Ok(())
    }

    /// Render as TOML, used by `config init` and `config show`
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| HeritageError::config_error(format!("Failed to serialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HeritageConfig::default();
        let rule = &config.rules.controller_inheritance;
        assert_eq!(rule.severity, RuleSeverity::Error);
        assert_eq!(rule.reserved_prefix, "_");
        assert!(!rule.require_base_list);
        assert_eq!(config.files.include, ["**/*.cs"]);
        assert_eq!(config.fix.import_keyword, "using");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: HeritageConfig = serde_json::from_str(
            r#"{ "rules": { "controllerInheritance": { "severity": "warn" } } }"#,
        )
        .unwrap();
        assert_eq!(config.rules.controller_inheritance.severity, RuleSeverity::Warn);
        assert_eq!(config.rules.controller_inheritance.reserved_prefix, "_");
        assert_eq!(config.files, FilesConfiguration::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = HeritageConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("reservedPrefix = \"_\""));
        let back: HeritageConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = HeritageConfig::default();
        config.rules.controller_inheritance.reserved_prefix = String::new();
        assert!(config.validate().is_err());

        let mut config = HeritageConfig::default();
        config.fix.import_keyword = "include".to_string();
        assert!(config.validate().is_err());

        let mut config = HeritageConfig::default();
        config.files.exclude.push("[".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(RuleSeverity::Off.to_severity(), None);
        assert_eq!(RuleSeverity::Warn.to_severity(), Some(Severity::Warning));
    }
}
