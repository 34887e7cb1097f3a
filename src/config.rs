use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "forksh.toml";

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ForkshConfig {
    pub engine: EngineConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Nodes deeper than this are refused with a failure status.
    pub max_depth: usize,
    /// Run a bare `true`/`false` through the minimal fork+exec path.
    pub fast_path: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_depth: 1024, fast_path: true }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "warn".to_string() }
    }
}

/// Loads `explicit` (which must exist) or, failing that, `forksh.toml` in the
/// current directory if there is one. No file means defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<ForkshConfig> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = Path::new(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(ForkshConfig::default());
            }
            p.to_path_buf()
        }
    };
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<ForkshConfig> {
    let config: ForkshConfig = toml::from_str(content)?;
    if config.engine.max_depth == 0 {
        bail!("engine.max_depth must be at least 1");
    }
    Ok(config)
}
