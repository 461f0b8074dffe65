//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`ISO_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Grid resolution
    #[serde(default)]
    pub grid: GridConfig,
    /// Synthetic field
    #[serde(default)]
    pub field: FieldConfig,
    /// Iso levels
    #[serde(default)]
    pub contour: ContourConfig,
    /// Backend selection
    #[serde(default)]
    pub backend: BackendConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`ISO_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // ISO_GRID__NX=64 -> grid.nx = 64
        figment = figment.merge(Env::prefixed("ISO_").split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no generator can be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.nx < 2 || self.grid.ny < 2 {
            return Err(ConfigError::new(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid.nx, self.grid.ny
            )));
        }
        if let Some(level) = self.contour.levels.iter().find(|l| !l.is_finite()) {
            return Err(ConfigError::new(format!("non-finite iso level {}", level)));
        }
        Ok(())
    }
}

/// Grid configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Samples along x
    pub nx: u32,
    /// Samples along y
    pub ny: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { nx: 128, ny: 128 }
    }
}

/// Synthetic field presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldPreset {
    /// Single radial bump at the center
    Peak,
    /// Concentric cosine rings
    Ripple,
    /// `(u - 0.5) * (v - 0.5)`, a saddle at the center
    Saddle,
    /// Same value everywhere
    Constant,
}

/// Field configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Which field to synthesize
    pub preset: FieldPreset,
    /// Spatial frequency for `ripple`
    pub frequency: f32,
    /// Peak height for `peak`, `ripple` and `saddle`
    pub amplitude: f32,
    /// Value for `constant`
    pub value: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            preset: FieldPreset::Ripple,
            frequency: 12.0,
            amplitude: 1.0,
            value: 0.0,
        }
    }
}

/// Contour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourConfig {
    /// Iso thresholds, one update each
    pub levels: Vec<f32>,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            levels: vec![-0.5, 0.0, 0.5],
        }
    }
}

/// Which generator runs the updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// GPU when available, CPU otherwise
    Auto,
    Gpu,
    Cpu,
}

/// Adapter power preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerPreference {
    High,
    Low,
}

impl From<PowerPreference> for wgpu::PowerPreference {
    fn from(p: PowerPreference) -> Self {
        match p {
            PowerPreference::High => wgpu::PowerPreference::HighPerformance,
            PowerPreference::Low => wgpu::PowerPreference::LowPower,
        }
    }
}

/// Backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend selection
    pub kind: BackendKind,
    /// CPU worker count (0 = one per core)
    pub threads: usize,
    /// Optional WGSL file replacing the built-in program
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shader_path: Option<PathBuf>,
    /// GPU adapter preference
    pub power_preference: PowerPreference,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Auto,
            threads: 0,
            shader_path: None,
            power_preference: PowerPreference::High,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log every captured segment
    pub dump_points: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            dump_points: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: String) -> Self {
        Self { message }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
