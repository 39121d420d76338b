//! Configuration for heritage
//!
//! Configuration is read from `.heritagerc.toml`, `.heritagerc.json` or
//! `heritage.json`, discovered by walking up from the working directory.
//! Every field is optional; defaults reproduce the built-in convention.

mod heritage_config;
mod loader;

pub use heritage_config::{
    ControllerInheritanceConfig, FilesConfiguration, FixConfiguration, HeritageConfig,
    RuleSeverity, RulesConfiguration,
};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
