//! Configuration for the marketplace watcher.
//!
//! Values come from an optional config file (TOML, YAML or JSON, with
//! `${ENV_VAR}` substitution) and are then overridden by process environment
//! variables such as `PLUGIN_URLS` and `DISCORD_WEBHOOK_URL`.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{ConfigError, Result},
    loader::{apply_env_overrides, discover_and_load, load_config, load_with_env},
    schema::{DEFAULT_MARKETPLACE_BASE_URL, MarketwatchConfig, parse_plugin_list},
};
