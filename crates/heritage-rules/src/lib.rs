//! Heritage Rules
//!
//! The controller inheritance rule and the machinery around it:
//!
//! - [`builtin::ControllerInheritance`] classifies class declarations
//! - [`scanner`] finds sibling base classes that can fix a violation
//! - [`rewrite`] produces the corrected tree for one file
//! - [`RuleRegistry`] maps rule ids to analyzers and fix providers
//! - [`LintEngine`] runs everything over a [`heritage_core::DocumentSet`]

pub mod builtin;
pub mod engine;
pub mod registry;
pub mod rewrite;
pub mod rule;
pub mod scanner;

pub use builtin::{Category, ControllerInheritance, ControllerInheritanceFix};
pub use engine::LintEngine;
pub use registry::RuleRegistry;
pub use rewrite::apply_base_class_fix;
pub use rule::{ClassAnalyzer, FixContext, FixProvider, RuleContext, RuleMetadata};
pub use scanner::scan_candidates;
