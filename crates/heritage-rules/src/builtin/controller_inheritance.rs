//! Controller inheritance rule
//!
//! Classes in a `Controllers` or `ApiControllers` folder must derive from a
//! project base controller, recognized by a reserved name prefix (`_` by
//! default, as in `_BaseController`).
//!
//! ### Examples
//!
//! ```csharp
//! // Controllers/HomeController.cs
//!
//! // Valid: parent carries the reserved prefix
//! public class HomeController : _BaseController { }
//!
//! // Flagged: "HomeController does not inherit from a valid base Controller."
//! public class HomeController : Controller, IDisposable { }
//!
//! // Valid: the base controller itself may extend the framework class
//! public class _BaseController : Controller { }
//! ```
//!
//! The folder is matched case-insensitively; the prefix is matched
//! case-sensitively everywhere. Anything that cannot be determined (no
//! category folder, no class name, no readable base list) yields no diagnostic.

use std::path::Path;

use heritage_core::config::{ControllerInheritanceConfig, HeritageConfig};
use heritage_core::cst::ast::ClassDeclaration;
use heritage_core::{Diagnostic, FixCandidate, HeritageError, Result, Severity, SourceTree};
use tracing::debug;

use crate::rewrite::apply_base_class_fix;
use crate::rule::{ClassAnalyzer, FixContext, FixProvider, RuleContext, RuleMetadata};
use crate::scanner::scan_candidates;

/// Rule ID for controller inheritance
pub const CONTROLLER_INHERITANCE: &str = "ControllerInheritance";

pub const METADATA: RuleMetadata = RuleMetadata {
    id: CONTROLLER_INHERITANCE,
    title: "Invalid Parent Class",
    message_format: "{0} does not inherit from a valid {1} Controller.",
    description: "All controllers must inherit from a project base controller",
    category: "Inheritance",
    default_severity: Severity::Error,
    enabled_by_default: true,
};

/// Which kind of controller a folder holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `controllers/`
    Base,
    /// `apicontrollers/`
    ApiBase,
}

impl Category {
    /// Category of the folder directly containing `path`
    ///
    /// Both `/` and `\` separate segments. Paths without a containing folder
    /// and folders other than the two controller folders have no category.
    pub fn from_path(path: &Path) -> Option<Category> {
        let path = path.to_string_lossy();
        let segments: Vec<&str> = path
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .collect();

        let folder = segments.len().checked_sub(2).and_then(|i| segments.get(i))?;
        if folder.eq_ignore_ascii_case("controllers") {
            Some(Category::Base)
        } else if folder.eq_ignore_ascii_case("apicontrollers") {
            Some(Category::ApiBase)
        } else {
            None
        }
    }

    /// Label used in the diagnostic message
    pub fn label(self) -> &'static str {
        match self {
            Category::Base => "base",
            Category::ApiBase => "Api base",
        }
    }

    /// Framework class a base controller of any category may extend
    fn is_sentinel(name: &str) -> bool {
        name.eq_ignore_ascii_case("controller") || name.eq_ignore_ascii_case("apicontroller")
    }
}

/// Convention analyzer for controller classes
#[derive(Debug, Clone)]
pub struct ControllerInheritance {
    severity: Option<Severity>,
    reserved_prefix: String,
    require_base_list: bool,
}

impl Default for ControllerInheritance {
    fn default() -> Self {
        Self::from_config(&ControllerInheritanceConfig::default())
    }
}

impl ControllerInheritance {
    pub fn from_config(config: &ControllerInheritanceConfig) -> Self {
        Self {
            severity: config.severity.to_severity(),
            reserved_prefix: config.reserved_prefix.clone(),
            require_base_list: config.require_base_list,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.severity.is_some()
    }

    fn has_reserved_prefix(&self, name: &str) -> bool {
        name.starts_with(&self.reserved_prefix)
    }
}

impl ClassAnalyzer for ControllerInheritance {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn analyze(&self, class: &ClassDeclaration, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let severity = self.severity?;
        let category = Category::from_path(ctx.file)?;
        let identifier = class.identifier()?;
        let class_name = identifier.text();

        let parent_name = match class.base_list() {
            Some(base_list) => {
                // Nothing readable to judge: `class A : { }` or only non-type entries
                let parent = base_list.types().next()?;
                parent.ty().and_then(|name| name.simple_identifier())
            }
            None if self.require_base_list => None,
            None => {
                debug!("{class_name}: no base list, skipped");
                return None;
            }
        };

        let compliant = parent_name
            .as_deref()
            .is_some_and(|parent| self.has_reserved_prefix(parent));

        let mut diagnostic = None;
        if !compliant {
            let message = METADATA.format_message(&[class_name, category.label()]);
            diagnostic = Some(
                Diagnostic::new(CONTROLLER_INHERITANCE, severity, message, ctx.location(&identifier))
                    .with_arguments([class_name, category.label()])
                    .with_code(CONTROLLER_INHERITANCE)
                    .with_category(METADATA.category),
            );
        }

        // Base controllers extend the framework class; always exempt them
        if parent_name.as_deref().is_some_and(Category::is_sentinel)
            && self.has_reserved_prefix(class_name)
        {
            debug!("{class_name}: base controller, exempt");
            diagnostic = None;
        }

        diagnostic
    }
}

/// Offers "Inherit from _X" actions for controller inheritance diagnostics
#[derive(Debug, Clone)]
pub struct ControllerInheritanceFix {
    reserved_prefix: String,
    import_keyword: String,
}

impl Default for ControllerInheritanceFix {
    fn default() -> Self {
        Self::from_config(&HeritageConfig::default())
    }
}

impl ControllerInheritanceFix {
    pub fn from_config(config: &HeritageConfig) -> Self {
        Self {
            reserved_prefix: config.rules.controller_inheritance.reserved_prefix.clone(),
            import_keyword: config.fix.import_keyword.clone(),
        }
    }
}

impl FixProvider for ControllerInheritanceFix {
    fn fixable_rule_ids(&self) -> &[&'static str] {
        &[CONTROLLER_INHERITANCE]
    }

    fn candidates(&self, diagnostic: &Diagnostic, ctx: &FixContext<'_>) -> Result<Vec<FixCandidate>> {
        let file = &diagnostic.location.file;
        let target = ctx
            .documents
            .get(file)
            .ok_or_else(|| HeritageError::stale_diagnostic(file, diagnostic.location.offset))?;

        scan_candidates(
            ctx.documents.siblings(file),
            target,
            diagnostic,
            &self.reserved_prefix,
            ctx.cancel,
        )
    }

    fn apply(
        &self,
        tree: &SourceTree,
        diagnostic: &Diagnostic,
        candidate: &FixCandidate,
    ) -> Result<SourceTree> {
        apply_base_class_fix(
            tree,
            diagnostic,
            &candidate.target_class,
            candidate.target_namespace.as_ref(),
            &self.import_keyword,
        )
    }
}
