use std::path::Path;

use projection::ProjectionOptions;
use runtime::{PlaybackConfig, PlaybackMode};
use scene::SceneConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;
use viewport::ViewportConfig;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub playback: PlaybackConfig,
    pub viewport: ViewportConfig,
    pub projection: ProjectionOptions,
    pub scene: SceneConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, source: std::io::Error },
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "failed to read config {path}: {source}"),
            ConfigError::Json(err) => write!(f, "invalid config JSON: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json(err) => Some(err),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(payload).map_err(ConfigError::Json)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    /// Applies `FLOWMAP_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies playback overrides read through `lookup`. Unparsable values
    /// are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("FLOWMAP_TICK_INTERVAL_MS") {
            match v.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.playback.tick_interval_ms = ms,
                _ => warn!(value = %v, "ignoring FLOWMAP_TICK_INTERVAL_MS"),
            }
        }
        if let Some(v) = lookup("FLOWMAP_TICK_STEP_MS") {
            match v.trim().parse::<i64>() {
                Ok(ms) if ms > 0 => self.playback.tick_step_ms = ms,
                _ => warn!(value = %v, "ignoring FLOWMAP_TICK_STEP_MS"),
            }
        }
        if let Some(v) = lookup("FLOWMAP_LOOP") {
            match parse_flag(&v) {
                Some(true) => self.playback.default_mode = PlaybackMode::LoopAtEnd,
                Some(false) => self.playback.default_mode = PlaybackMode::StopAtEnd,
                None => warn!(value = %v, "ignoring FLOWMAP_LOOP"),
            }
        }
        if let Some(v) = lookup("FLOWMAP_AUTOPLAY") {
            match parse_flag(&v) {
                Some(flag) => self.playback.autoplay = flag,
                None => warn!(value = %v, "ignoring FLOWMAP_AUTOPLAY"),
            }
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::ViewerConfig;
    use pretty_assertions::assert_eq;
    use projection::ProjectionKind;
    use runtime::PlaybackMode;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ViewerConfig::from_json_str(
            r#"{"playback": {"tick_step_ms": 250}, "viewport": {"initial_projection": "orthographic"}}"#,
        )
        .expect("config");
        assert_eq!(cfg.playback.tick_step_ms, 250);
        assert_eq!(cfg.playback.tick_interval_ms, 20);
        assert_eq!(cfg.viewport.initial_projection, ProjectionKind::Globe);
        assert_eq!(cfg.viewport.width, 960.0);
        assert_eq!(cfg.scene.arrow_size, 4.0);
        assert_eq!(cfg.projection.resample_step_deg, 2.0);
    }

    #[test]
    fn env_overrides_playback() {
        let vars: HashMap<&str, &str> = [
            ("FLOWMAP_TICK_INTERVAL_MS", "40"),
            ("FLOWMAP_TICK_STEP_MS", "oops"),
            ("FLOWMAP_LOOP", "true"),
            ("FLOWMAP_AUTOPLAY", "0"),
        ]
        .into_iter()
        .collect();
        let mut cfg = ViewerConfig::default();
        cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.playback.tick_interval_ms, 40);
        assert_eq!(cfg.playback.tick_step_ms, 100);
        assert_eq!(cfg.playback.default_mode, PlaybackMode::LoopAtEnd);
        assert!(!cfg.playback.autoplay);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(ViewerConfig::from_json_str("{\"playback\": 3}").is_err());
    }
}
