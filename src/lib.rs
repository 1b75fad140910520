pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CdnValidatorSource, GithubRegistry, LocalRegistry};
pub use config::toml_config::TomlConfig;
pub use core::store::{LoadSummary, RegistryStore, Snapshot};
pub use utils::error::{Result, StoreError};
