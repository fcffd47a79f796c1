use std::path::{Path, PathBuf};

use super::types::AppConfig;

pub const CONFIG_ENV: &str = "FLEETRUN_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "fleetrun.toml";

/// Resolve which config file to read.
///
/// Priority: explicit path, then `$FLEETRUN_CONFIG`, then `./fleetrun.toml`.
/// Returns `None` when nothing applies and defaults should be used.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    if let Ok(v) = std::env::var(CONFIG_ENV) {
        if !v.trim().is_empty() {
            return Some(PathBuf::from(v));
        }
    }
    let local = Path::new(DEFAULT_CONFIG_FILE);
    local.exists().then(|| local.to_path_buf())
}

pub fn load(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut cfg = match resolve_config_path(explicit) {
        Some(path) => {
            let s = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("read {}: {e}", path.display()))?;
            parse(&s)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

pub fn parse(s: &str) -> anyhow::Result<AppConfig> {
    Ok(toml::from_str::<AppConfig>(s)?)
}

// Environment variable overrides (highest priority)
fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(v) = std::env::var("FLEETRUN_PORTAL_URL") {
        if !v.trim().is_empty() {
            cfg.portal.base_url = v;
        }
    }
    if let Ok(v) = std::env::var("FLEETRUN_PORTAL_API_KEY") {
        if !v.trim().is_empty() {
            cfg.portal.api_key = v;
        }
    }
}
