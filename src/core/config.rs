use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub bind_address: String, // "host:port"
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// BCM pin numbers for the three status LEDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusLedConfig {
    pub enabled: bool,
    pub red_pin: u8,
    pub yellow_pin: u8,
    pub green_pin: u8,
    pub blink_interval_ms: u64,
}

impl Default for StatusLedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            red_pin: 17,
            yellow_pin: 27,
            green_pin: 22,
            blink_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub volume: f32,
    pub output_device_name: Option<String>,
    pub last_directory: Option<PathBuf>,
    pub remote: RemoteConfig,
    pub status_leds: StatusLedConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            volume: 0.8,
            output_device_name: None,
            last_directory: None,
            remote: RemoteConfig::default(),
            status_leds: StatusLedConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads the config at `config_path`, writing defaults when it is missing
    /// or cannot be parsed.
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| anyhow::anyhow!("Failed to read config file at {}: {}", config_path.display(), e))?;

            match serde_json::from_str::<Self>(&content) {
                Ok(config) => {
                    log::info!("Loaded existing config from {}", config_path.display());
                    Ok(config)
                }
                Err(e) => {
                    log::warn!("Config file exists but has issues ({}), creating new one with defaults", e);
                    let new_config = Self::default();
                    new_config.save_to(config_path)
                        .map_err(|save_err| anyhow::anyhow!("Failed to save new config: {}", save_err))?;
                    log::info!("Created new config file at {}", config_path.display());
                    Ok(new_config)
                }
            }
        } else {
            log::info!("No config file found, creating default config");
            let config = Self::default();
            config.save_to(config_path)
                .map_err(|e| anyhow::anyhow!("Failed to save default config: {}", e))?;
            log::info!("Created new config file at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        log::debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("music-player")
            .join("config.json")
    }

    /// Volume as stored, clamped to the mixer's range.
    pub fn clamped_volume(&self) -> f32 {
        self.volume.clamp(0.0, 1.0)
    }

    /// Remembers the directory of a freshly loaded file for the next dialog.
    pub fn remember_directory(&mut self, file: &Path) {
        if let Some(parent) = file.parent() {
            self.last_directory = Some(parent.to_path_buf());
        }
    }
}
