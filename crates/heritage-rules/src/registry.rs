//! Explicit rule registry
//!
//! Maps rule ids to their analyzer and fix provider. Built once at startup;
//! there is no runtime discovery.

use std::collections::BTreeMap;
use std::sync::Arc;

use heritage_core::{HeritageConfig, HeritageError, Result};

use crate::builtin::{ControllerInheritance, ControllerInheritanceFix};
use crate::rule::{ClassAnalyzer, FixProvider, RuleMetadata};

/// Registry of analyzers and fix providers keyed by rule id
#[derive(Default, Clone)]
pub struct RuleRegistry {
    analyzers: BTreeMap<&'static str, Arc<dyn ClassAnalyzer>>,
    fix_providers: BTreeMap<&'static str, Arc<dyn FixProvider>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in rule configured from `config`
    ///
    /// Rules whose severity is `off` are not registered.
    pub fn builtin(config: &HeritageConfig) -> Self {
        let mut registry = Self::new();

        let rule = ControllerInheritance::from_config(&config.rules.controller_inheritance);
        if rule.is_enabled() {
            registry.register_analyzer(rule);
            registry.register_fix_provider(ControllerInheritanceFix::from_config(config));
        } else {
            tracing::debug!("ControllerInheritance is off");
        }

        registry
    }

    /// Metadata of every built-in rule, registered or not
    pub fn builtin_metadata() -> Vec<&'static RuleMetadata> {
        vec![&crate::builtin::controller_inheritance::METADATA]
    }

    /// Register an analyzer, replacing any with the same rule id
    pub fn register_analyzer(&mut self, analyzer: impl ClassAnalyzer + 'static) {
        let id = analyzer.metadata().id;
        if self.analyzers.insert(id, Arc::new(analyzer)).is_some() {
            tracing::warn!("Analyzer for '{}' replaced", id);
        }
    }

    /// Register a fix provider for each rule id it can fix
    pub fn register_fix_provider(&mut self, provider: impl FixProvider + 'static) {
        let provider: Arc<dyn FixProvider> = Arc::new(provider);
        for &id in provider.fixable_rule_ids() {
            self.fix_providers.insert(id, Arc::clone(&provider));
        }
    }

    pub fn analyzer(&self, rule_id: &str) -> Option<&dyn ClassAnalyzer> {
        self.analyzers.get(rule_id).map(|a| a.as_ref())
    }

    pub fn analyzers(&self) -> impl Iterator<Item = &dyn ClassAnalyzer> {
        self.analyzers.values().map(|a| a.as_ref())
    }

    /// Fix provider for `rule_id`, or `UnknownRule` if none is registered
    pub fn fix_provider(&self, rule_id: &str) -> Result<&dyn FixProvider> {
        self.fix_providers
            .get(rule_id)
            .map(|p| p.as_ref())
            .ok_or_else(|| HeritageError::unknown_rule(rule_id))
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.analyzers.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("analyzers", &self.analyzers.keys().collect::<Vec<_>>())
            .field("fix_providers", &self.fix_providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::CONTROLLER_INHERITANCE;
    use heritage_core::RuleSeverity;

    #[test]
    fn builtin_registers_rule_and_fix() {
        let registry = RuleRegistry::builtin(&HeritageConfig::default());
        assert_eq!(registry.rule_ids().collect::<Vec<_>>(), [CONTROLLER_INHERITANCE]);
        assert!(registry.analyzer(CONTROLLER_INHERITANCE).is_some());
        assert!(registry.fix_provider(CONTROLLER_INHERITANCE).is_ok());
    }

    #[test]
    fn disabled_rule_is_not_registered() {
        let mut config = HeritageConfig::default();
        config.rules.controller_inheritance.severity = RuleSeverity::Off;
        let registry = RuleRegistry::builtin(&config);
        assert!(registry.is_empty());
        assert_eq!(RuleRegistry::builtin_metadata().len(), 1);
    }

    #[test]
    fn unknown_rule_has_no_fix_provider() {
        let registry = RuleRegistry::builtin(&HeritageConfig::default());
        let err = registry.fix_provider("NoSuchRule").err().unwrap();
        assert!(matches!(err, HeritageError::UnknownRule { .. }));
    }
}
