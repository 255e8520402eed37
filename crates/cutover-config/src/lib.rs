//! Severity-rule configuration for the cutover engine.
//!
//! TOML profiles merged with environment overrides via figment, then
//! translated into a validated [`SeverityRuleSet`]. Loading is
//! fail-fast: an unknown field name or a bad tolerance is rejected
//! here, before any endpoint is processed.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cutover_core::{CoreError, DiffField, SeverityRuleSet};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("invalid severity rules: {0}")]
    Rules(#[from] CoreError),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
///
/// Field names arrive as plain strings and are only parsed into
/// [`DiffField`]s when a rule set is built, so a typo surfaces as a
/// named validation error rather than a silent default.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when the caller doesn't name one.
    pub default_profile: Option<String>,

    /// Baseline rules every profile starts from.
    #[serde(default)]
    pub defaults: RuleDefaults,

    /// Named rule profiles overriding the baseline per maintenance
    /// window type (e.g. "core-switch-swap" vs "access-refresh").
    #[serde(default)]
    pub profiles: HashMap<String, RuleProfile>,
}

/// Baseline severity rules, fully populated.
#[derive(Debug, Deserialize, Serialize)]
pub struct RuleDefaults {
    #[serde(default = "default_critical_fields")]
    pub critical_fields: Vec<String>,

    #[serde(default = "default_warning_fields")]
    pub warning_fields: Vec<String>,

    #[serde(default = "default_latency_tolerance")]
    pub latency_tolerance_ms: f64,
}

impl Default for RuleDefaults {
    fn default() -> Self {
        Self {
            critical_fields: default_critical_fields(),
            warning_fields: default_warning_fields(),
            latency_tolerance_ms: default_latency_tolerance(),
        }
    }
}

fn sorted_names(fields: &HashSet<DiffField>) -> Vec<String> {
    let mut names: Vec<String> = fields.iter().map(ToString::to_string).collect();
    names.sort();
    names
}

fn default_critical_fields() -> Vec<String> {
    sorted_names(&SeverityRuleSet::default().critical_fields)
}

fn default_warning_fields() -> Vec<String> {
    sorted_names(&SeverityRuleSet::default().warning_fields)
}

fn default_latency_tolerance() -> f64 {
    cutover_core::DEFAULT_LATENCY_TOLERANCE_MS
}

/// A named profile; unset values fall back to the baseline.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RuleProfile {
    pub critical_fields: Option<Vec<String>>,
    pub warning_fields: Option<Vec<String>>,
    pub latency_tolerance_ms: Option<f64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "cutover", "cutover").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("rules.toml");
            p
        },
        |dirs| dirs.config_dir().join("rules.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("cutover");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path (defaults → file → `CUTOVER__` env vars).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CUTOVER__").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Serialize config to TOML and write it to an explicit path.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML at the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Rule-set construction ───────────────────────────────────────────

fn parse_fields(kind: &str, names: &[String]) -> Result<HashSet<DiffField>, ConfigError> {
    names
        .iter()
        .map(|name| {
            name.parse::<DiffField>()
                .map_err(|_| ConfigError::Validation {
                    field: kind.to_owned(),
                    reason: format!("unknown observation field '{name}'"),
                })
        })
        .collect()
}

/// Build a validated [`SeverityRuleSet`] for a profile.
///
/// `profile` falls back to `default_profile`; with neither set, the
/// baseline alone applies. Naming a profile that doesn't exist is an
/// error — a silently-ignored profile name would misclassify an
/// entire run.
pub fn rules_for_profile(
    config: &Config,
    profile: Option<&str>,
) -> Result<SeverityRuleSet, ConfigError> {
    let name = profile.or(config.default_profile.as_deref());

    let overlay = match name {
        Some(name) => Some(config.profiles.get(name).ok_or_else(|| {
            ConfigError::UnknownProfile {
                profile: name.to_owned(),
            }
        })?),
        None => None,
    };

    let critical_names = overlay
        .and_then(|p| p.critical_fields.as_ref())
        .unwrap_or(&config.defaults.critical_fields);
    let warning_names = overlay
        .and_then(|p| p.warning_fields.as_ref())
        .unwrap_or(&config.defaults.warning_fields);
    let tolerance = overlay
        .and_then(|p| p.latency_tolerance_ms)
        .unwrap_or(config.defaults.latency_tolerance_ms);

    let rules = SeverityRuleSet {
        critical_fields: parse_fields("critical_fields", critical_names)?,
        warning_fields: parse_fields("warning_fields", warning_names)?,
        latency_tolerance_ms: tolerance,
    };
    rules.validate()?;
    Ok(rules)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn baseline_rules_match_core_defaults() {
        let config = Config::default();
        let rules = rules_for_profile(&config, None).unwrap();
        assert_eq!(rules, SeverityRuleSet::default());
    }

    #[test]
    fn unknown_field_name_is_a_validation_error() {
        let mut config = Config::default();
        config.defaults.critical_fields.push("flux_capacitor".into());
        let err = rules_for_profile(&config, None).unwrap_err();
        assert!(err.to_string().contains("flux_capacitor"));
    }

    #[test]
    fn status_pseudo_field_is_rejected_at_load() {
        let mut config = Config::default();
        config.defaults.warning_fields.push("_status".into());
        assert!(rules_for_profile(&config, None).is_err());
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let config = Config::default();
        let err = rules_for_profile(&config, Some("nonexistent")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { .. }));
    }

    #[test]
    fn profile_overlays_only_what_it_sets() {
        let mut config = Config::default();
        config.profiles.insert(
            "lenient".into(),
            RuleProfile {
                latency_tolerance_ms: Some(50.0),
                ..RuleProfile::default()
            },
        );
        let rules = rules_for_profile(&config, Some("lenient")).unwrap();
        assert_eq!(rules.latency_tolerance_ms, 50.0);
        assert_eq!(
            rules.critical_fields,
            SeverityRuleSet::default().critical_fields
        );
    }
}
