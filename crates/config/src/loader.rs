use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    env_subst::substitute_env,
    error::{ConfigError, Result},
    schema::{MarketwatchConfig, parse_plugin_list},
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "marketwatch.toml",
    "marketwatch.yaml",
    "marketwatch.yml",
    "marketwatch.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<MarketwatchConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Load the config file, if any.
///
/// An explicit path must load. Otherwise the standard locations are searched:
/// 1. `./marketwatch.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/marketwatch/marketwatch.{toml,yaml,yml,json}` (user-global)
///
/// A discovered file that fails to load is reported and defaults are used,
/// since the environment alone is a complete configuration.
pub fn discover_and_load(explicit: Option<&Path>) -> Result<MarketwatchConfig> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading explicit config");
        return load_config(path);
    }

    let Some(path) = find_config_file() else {
        debug!("no config file found, using environment only");
        return Ok(MarketwatchConfig::default());
    };

    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            Ok(MarketwatchConfig::default())
        },
    }
}

/// Config file (if any) with process environment overrides applied on top.
pub fn load_with_env(explicit: Option<&Path>) -> Result<MarketwatchConfig> {
    let config = discover_and_load(explicit)?;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Overlay environment-style keys onto `config`.
///
/// `lookup` abstracts the environment so callers (and tests) can supply their own.
pub fn apply_env_overrides(
    mut config: MarketwatchConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<MarketwatchConfig> {
    if let Some(raw) = lookup("PLUGIN_URLS") {
        config.plugin_urls = parse_plugin_list(&raw);
    }
    if let Some(url) = lookup("DISCORD_WEBHOOK_URL") {
        config.discord_webhook_url = Some(Secret::new(url));
    }
    if let Some(url) = lookup("SLACK_WEBHOOK_URL") {
        config.slack_webhook_url = Some(Secret::new(url));
    }
    if let Some(base) = lookup("MARKETPLACE_BASE_URL").filter(|s| !s.trim().is_empty()) {
        config.marketplace_base_url = base.trim().trim_end_matches('/').to_string();
    }
    if let Some(raw) = lookup("LOOKBACK_MINUTES") {
        config.lookback_minutes = parse_number("LOOKBACK_MINUTES", &raw)?;
    }
    if let Some(raw) = lookup("REQUEST_TIMEOUT_SECS") {
        config.request_timeout_secs = parse_number("REQUEST_TIMEOUT_SECS", &raw)?;
    }
    if let Some(path) = lookup("SUMMARY_PATH").filter(|s| !s.trim().is_empty()) {
        config.summary_path = Some(PathBuf::from(path));
    }
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::ZeroTimeout);
    }
    Ok(config)
}

fn parse_number(key: &'static str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: raw.to_string(),
        })
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/marketwatch/
    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns `~/.config/marketwatch/` on all platforms.
fn config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().join(".config").join("marketwatch"))
}

fn parse_config(raw: &str, path: &Path) -> Result<MarketwatchConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    let parse_err = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "json" => serde_json::from_str(raw).map_err(|e| parse_err(e.to_string())),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}
