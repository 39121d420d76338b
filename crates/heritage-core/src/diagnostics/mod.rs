//! Diagnostics produced by rules and the fixes offered for them
//!
//! - [`Diagnostic`] records with precise locations
//! - [`SourceMap`] for byte offset to line/column conversion
//! - [`FixCandidate`] describing one selectable corrective action

mod source_map;
pub mod types;

pub use source_map::SourceMap;
pub use types::*;
