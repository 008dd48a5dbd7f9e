use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the API key stored in the config file.
pub const API_KEY_ENV: &str = "ASSEMBLYAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// AssemblyAI API key (the ASSEMBLYAI_API_KEY environment variable wins)
    pub api_key: Option<String>,

    /// Directory for auto-generated transcripts (default: ~/sona)
    pub output_dir: Option<PathBuf>,

    /// Root for per-run temporary working directories (default: system temp)
    pub temp_dir: Option<PathBuf>,

    /// Speech model used when --model is not given
    pub default_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            output_dir: None,
            temp_dir: None,
            default_model: "slam-1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // A config.yaml in the current directory takes precedence for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("sona").join("config.yaml"))
    }

    /// Resolve the AssemblyAI API key: environment variable first, then the
    /// config file.
    pub fn api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                return Ok(key);
            }
        }

        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }

        anyhow::bail!(
            "AssemblyAI API key not found. Set it with one of:\n\
             1. Environment variable: export {}='your_key_here'\n\
             2. The api_key field in {}",
            API_KEY_ENV,
            Self::config_path()?.display()
        )
    }

    /// Directory where auto-generated transcripts land.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(crate::output::default_output_dir)
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        match &self.api_key {
            Some(key) => println!("  API Key: {}", mask_api_key(key)),
            None => println!("  API Key: (not set)"),
        }
        println!("  Output Dir: {}", self.output_dir().display());
        if let Some(temp) = &self.temp_dir {
            println!("  Temp Dir: {}", temp.display());
        }
        println!("  Default Model: {}", self.default_model);
    }
}

/// Mask an API key for display, keeping the first and last four characters.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("abcd1234efgh"), "abcd...efgh");
        assert_eq!(mask_api_key("short"), "*****");
        assert_eq!(mask_api_key(""), "");
    }

    #[test]
    fn test_mask_api_key_multibyte() {
        // Character-based masking must not split multi-byte sequences
        assert_eq!(mask_api_key("ключ-секрет-ключ"), "ключ...ключ");
        assert_eq!(mask_api_key("日本語キー"), "*****");
    }

    #[test]
    fn test_default_model() {
        let config = Config::default();
        assert_eq!(config.default_model, "slam-1");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            api_key: Some("key".into()),
            output_dir: Some(PathBuf::from("/tmp/out")),
            temp_dir: None,
            default_model: "nano".into(),
        };

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.api_key.as_deref(), Some("key"));
        assert_eq!(parsed.default_model, "nano");
        assert_eq!(parsed.output_dir, Some(PathBuf::from("/tmp/out")));
    }
}
