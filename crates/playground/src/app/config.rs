use std::fs;
use std::path::{Path, PathBuf};

use sandbox::assertions::{ensure, ensure_in_range};
use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_FILE_NAME: &str = "playground.json";
pub(crate) const TICKS_ENV_VAR: &str = "SANDBOX_TICKS";
const DEFAULT_TICKS: u32 = 120;
const DEFAULT_FIXED_DT_SECONDS: f32 = 1.0 / 60.0;
const MIN_FIXED_DT_SECONDS: f32 = 1.0e-4;
const MAX_FIXED_DT_SECONDS: f32 = 1.0;

pub(crate) type ConfigResult<T> = Result<T, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlaygroundConfig {
    pub(crate) ticks: u32,
    pub(crate) fixed_dt_seconds: f32,
    /// Relative to the sandbox root. `None` disables the dump.
    pub(crate) dump_path: Option<PathBuf>,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            fixed_dt_seconds: DEFAULT_FIXED_DT_SECONDS,
            dump_path: Some(PathBuf::from("cache").join("actors.json")),
        }
    }
}

impl PlaygroundConfig {
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        ensure(self.ticks > 0, "ticks must be greater than 0").map_err(|error| error.to_string())?;
        ensure_in_range(
            "fixed_dt_seconds",
            self.fixed_dt_seconds,
            MIN_FIXED_DT_SECONDS,
            MAX_FIXED_DT_SECONDS,
        )
        .map_err(|error| error.to_string())?;
        Ok(())
    }
}

/// Missing file means defaults. `ticks_override` wins over the file.
pub(crate) fn load_config(
    path: &Path,
    ticks_override: Option<&str>,
) -> ConfigResult<PlaygroundConfig> {
    let mut config = if path.is_file() {
        let raw = fs::read_to_string(path)
            .map_err(|error| format!("read config '{}': {error}", path.display()))?;
        parse_config_json(&raw)?
    } else {
        PlaygroundConfig::default()
    };

    if let Some(raw) = ticks_override {
        config.ticks = raw
            .trim()
            .parse::<u32>()
            .map_err(|error| format!("invalid {TICKS_ENV_VAR} '{raw}': {error}"))?;
    }

    config.validate()?;
    Ok(config)
}

pub(crate) fn parse_config_json(raw: &str) -> ConfigResult<PlaygroundConfig> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, PlaygroundConfig>(&mut deserializer) {
        Ok(config) => Ok(config),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse config json: {source}"))
            } else {
                Err(format!("parse config json at {path}: {source}"))
            }
        }
    }
}
