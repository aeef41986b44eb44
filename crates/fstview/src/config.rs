use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "fstview";

pub const DEFAULT_GENERATOR: &str = "html_generator.py";
pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_GENERATOR_TIMEOUT_SECS: u64 = 120;

const VALID_KEYS: &str = "render.theme, render.generator, render.generator_interpreter, \
    render.generator_timeout_secs, render.use_generator, defaults.budget";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Script handed the raw input paths before the built-in renderer runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_interpreter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_generator: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Budget used when neither the command line nor the transcript gives one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `fstview config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# fstview configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "render.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.render_mut().theme = Some(value.to_string());
            }
            "render.generator" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Invalid generator: path must not be empty.");
                }
                self.render_mut().generator = Some(PathBuf::from(value));
            }
            "render.generator_interpreter" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Invalid generator_interpreter: must not be empty.");
                }
                self.render_mut().generator_interpreter = Some(value.to_string());
            }
            "render.generator_timeout_secs" => {
                let secs = match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => secs,
                    _ => anyhow::bail!(
                        "Invalid generator_timeout_secs: {value}. Must be a positive whole number."
                    ),
                };
                self.render_mut().generator_timeout_secs = Some(secs);
            }
            "render.use_generator" => {
                let enabled = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => anyhow::bail!("Invalid use_generator: {value}. Must be 'true' or 'false'."),
                };
                self.render_mut().use_generator = Some(enabled);
            }
            "defaults.budget" => {
                let budget = match value.parse::<f64>() {
                    Ok(b) if b.is_finite() && b >= 0.0 => b,
                    _ => anyhow::bail!(
                        "Invalid budget: {value}. Must be a non-negative number."
                    ),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .budget = Some(budget);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }

    fn render_mut(&mut self) -> &mut RenderConfig {
        self.render.get_or_insert_with(RenderConfig::default)
    }

    pub fn theme_name(&self) -> &str {
        self.render
            .as_ref()
            .and_then(|r| r.theme.as_deref())
            .unwrap_or("light")
    }

    pub fn generator(&self) -> PathBuf {
        self.render
            .as_ref()
            .and_then(|r| r.generator.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GENERATOR))
    }

    pub fn generator_interpreter(&self) -> &str {
        self.render
            .as_ref()
            .and_then(|r| r.generator_interpreter.as_deref())
            .unwrap_or(DEFAULT_INTERPRETER)
    }

    pub fn generator_timeout(&self) -> Duration {
        let secs = self
            .render
            .as_ref()
            .and_then(|r| r.generator_timeout_secs)
            .unwrap_or(DEFAULT_GENERATOR_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn use_generator(&self) -> bool {
        self.render
            .as_ref()
            .and_then(|r| r.use_generator)
            .unwrap_or(true)
    }

    pub fn default_budget(&self) -> Option<f64> {
        self.defaults.as_ref().and_then(|d| d.budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::default();
        assert_eq!(config.theme_name(), "light");
        assert_eq!(config.generator(), PathBuf::from("html_generator.py"));
        assert_eq!(config.generator_interpreter(), "python3");
        assert_eq!(config.generator_timeout(), Duration::from_secs(120));
        assert!(config.use_generator());
        assert_eq!(config.default_budget(), None);
    }

    #[test]
    fn test_set_valid_keys() {
        let mut config = Config::default();
        config.set("render.theme", "dark").unwrap();
        config.set("render.generator", "tools/gen.py").unwrap();
        config.set("render.generator_interpreter", "python").unwrap();
        config.set("render.generator_timeout_secs", "30").unwrap();
        config.set("render.use_generator", "false").unwrap();
        config.set("defaults.budget", "1500000").unwrap();

        assert_eq!(config.theme_name(), "dark");
        assert_eq!(config.generator(), PathBuf::from("tools/gen.py"));
        assert_eq!(config.generator_interpreter(), "python");
        assert_eq!(config.generator_timeout(), Duration::from_secs(30));
        assert!(!config.use_generator());
        assert_eq!(config.default_budget(), Some(1_500_000.0));
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("render.theme", "sepia").is_err());
        assert!(config.set("render.generator_timeout_secs", "0").is_err());
        assert!(config.set("render.generator_timeout_secs", "soon").is_err());
        assert!(config.set("render.use_generator", "maybe").is_err());
        assert!(config.set("defaults.budget", "-5").is_err());
        assert!(config.set("defaults.budget", "NaN").is_err());
        assert!(config.set("render.generator", "  ").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_set_unknown_key_lists_valid_keys() {
        let mut config = Config::default();
        let err = config.set("render.colour", "red").unwrap_err().to_string();
        assert!(err.contains("Unknown config key: render.colour"));
        assert!(err.contains("defaults.budget"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let mut config = Config::default();
        config.set("render.theme", "dark").unwrap();
        config.set("defaults.budget", "250.5").unwrap();
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# fstview configuration"));

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_mentions_config_show() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.yaml"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("fstview config show"));
    }

    #[test]
    fn test_empty_sections_omitted_from_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }
}
