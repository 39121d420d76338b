//! Heritage Core
//!
//! Core engine for heritage, a checker for controller inheritance
//! conventions in C# source trees. This crate provides the lossless syntax
//! tree, qualified-name handling, diagnostics, configuration and document
//! discovery that the rules in `heritage-rules` build on.

pub mod cancel;
pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod diagnostics;
pub mod discovery;
pub mod document;
pub mod error;
pub mod qualified_name;
pub mod result;

pub use cancel::CancellationToken;
pub use config::{ConfigLoader, HeritageConfig, RuleSeverity};
pub use diagnostics::{Diagnostic, FixCandidate, Location, Severity, SourceMap};
pub use discovery::{discover_documents, discover_files, load_documents};
pub use document::{DocumentSet, SourceTree};
pub use error::{ErrorKind, HeritageError};
pub use qualified_name::{
    QualifiedName, collect_imported_namespaces, enclosing_namespace, parse_qualified_name,
    synthesize_import_directive, synthesize_import_fragment,
};
pub use result::{Result, ResultExt};

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` wins when set. Otherwise `verbosity` selects
/// `heritage=info` (0), `heritage=debug` (1) or `heritage=trace` (2+).
pub fn init_tracing(verbosity: u8) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("heritage={default_level}")));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
