use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

// --- Error Type ---
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

// --- Enums for Choices ---
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmissionMode {
    /// Drop the fractional part of each frame's spawn count.
    #[default]
    Truncate,
    /// Carry the fractional part over to the next frame.
    Accumulate,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SerializerType {
    #[default]
    Json,
    Binary,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    #[default]
    Null,
    Stdio,
    File,
}

// --- Limits ---

/// Highest accepted frame rate.
pub const MAX_FRAMERATE: u32 = 1000;
/// Largest accepted surface width or height, in pixels.
pub const MAX_SURFACE_SIZE: u32 = 16_384;
/// Largest accepted sprite size, in pixels.
pub const MAX_SPRITE_SIZE: u32 = 4096;

// --- Configuration Sections ---

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SurfaceSettings {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ParticleSettings {
    /// Pool capacity, the maximum amount of particles
    #[serde(default = "default_length")]
    pub length: usize,
    /// Particle lifetime in seconds
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Initial particle speed in pixels/sec
    #[serde(default = "default_velocity")]
    pub velocity: f32,
    /// Acceleration as a multiple of the initial velocity
    #[serde(default = "default_effect")]
    pub effect: f32,
    /// Sprite size in pixels
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_length() -> usize { 2000 }
fn default_duration() -> f32 { 2.0 }
fn default_velocity() -> f32 { 100.0 }
fn default_effect() -> f32 { -1.3 }
fn default_size() -> u32 { 13 }

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            length: default_length(),
            duration: default_duration(),
            velocity: default_velocity(),
            effect: default_effect(),
            size: default_size(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HeartSettings {
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_scale() -> f32 { 1.0 }
fn default_color() -> String { "#FF5CA4".to_string() }

impl Default for HeartSettings {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            color: default_color(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct EmissionSettings {
    #[serde(default)]
    pub mode: EmissionMode,
    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub serializer: SerializerType,
    #[serde(default)]
    pub sender: SenderType,
    #[serde(default)]
    pub path: Option<String>,
    /// Publish every N-th frame
    #[serde(default = "default_every")]
    pub every: u32,
}

fn default_every() -> u32 { 1 }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            serializer: SerializerType::default(),
            sender: SenderType::default(),
            path: None,
            every: default_every(),
        }
    }
}

// --- Top-Level Config Struct ---

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_framerate")]
    pub framerate: u32,
    #[serde(default)]
    pub max_frames: Option<u64>,
    #[serde(default)]
    pub surface: SurfaceSettings,
    #[serde(default)]
    pub particles: ParticleSettings,
    #[serde(default)]
    pub heart: HeartSettings,
    #[serde(default)]
    pub emission: EmissionSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_framerate() -> u32 { 60 }

impl Default for Config {
    fn default() -> Self {
        Self {
            framerate: default_framerate(),
            max_frames: None,
            surface: SurfaceSettings::default(),
            particles: ParticleSettings::default(),
            heart: HeartSettings::default(),
            emission: EmissionSettings::default(),
            output: OutputConfig::default(),
        }
    }
}

// --- Helper Methods ---

impl HeartSettings {
    /// Parses `color` as `#RRGGBB`.
    pub fn rgb(&self) -> Option<[u8; 3]> {
        let hex = self.color.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some([channel(0)?, channel(2)?, channel(4)?])
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.framerate == 0 {
            return Err(invalid("Framerate cannot be zero."));
        }
        if self.framerate > MAX_FRAMERATE {
            return Err(ConfigError::Validation(format!(
                "Framerate {} exceeds the maximum of {}.",
                self.framerate, MAX_FRAMERATE
            )));
        }
        let surface = &self.surface;
        if surface.width == 0 || surface.height == 0 {
            return Err(invalid("Surface dimensions must be positive."));
        }
        if surface.width > MAX_SURFACE_SIZE || surface.height > MAX_SURFACE_SIZE {
            return Err(ConfigError::Validation(format!(
                "Surface {}x{} exceeds the maximum of {} pixels per side.",
                surface.width, surface.height, MAX_SURFACE_SIZE
            )));
        }

        let particles = &self.particles;
        if particles.length < 2 {
            return Err(invalid("Particle length must be at least 2."));
        }
        if !particles.duration.is_finite() || particles.duration <= 0.0 {
            return Err(invalid("Particle duration must be a positive number of seconds."));
        }
        if !particles.velocity.is_finite() || !particles.effect.is_finite() {
            return Err(invalid("Particle velocity and effect must be finite."));
        }
        if particles.size == 0 {
            return Err(invalid("Particle size must be at least 1 pixel."));
        }
        if particles.size > MAX_SPRITE_SIZE {
            return Err(ConfigError::Validation(format!(
                "Particle size {} exceeds the maximum of {} pixels.",
                particles.size, MAX_SPRITE_SIZE
            )));
        }

        if !self.heart.scale.is_finite() || self.heart.scale <= 0.0 {
            return Err(invalid("Heart scale must be positive."));
        }
        if self.heart.rgb().is_none() {
            return Err(ConfigError::Validation(format!(
                "Heart color '{}' is not of the form #RRGGBB.",
                self.heart.color
            )));
        }

        if self.output.every == 0 {
            return Err(invalid("Output frequency cannot be zero."));
        }
        if self.output.sender == SenderType::File && self.output.path.is_none() {
            return Err(invalid("The 'file' sender requires an output path."));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Validation(message.to_string())
}

// --- Loading Function ---

/// Loads and validates a configuration file. Files ending in `.toml` are
/// parsed as TOML, everything else as JSON.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));

    let config: Config = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    config.validate()?;
    Ok(config)
}
