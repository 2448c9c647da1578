//! Studio configuration: defaults, environment overrides, and host JSON.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_LAYER_BOX, DEFAULT_LAYER_OFFSET, FALLBACK_LAYER_SIZE,
    GALLERY_BATCH_SIZE, MAX_CANVAS_DIM,
};
use crate::geometry::Size;

pub const DEFAULT_EXPORT_NAME: &str = "meme-gen-ultimate";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where and how large new image layers are made when no rect is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementDefaults {
    /// Top-left offset of non-first layers.
    pub offset: f64,
    /// Longest side of a non-first layer sized from its natural size.
    pub layer_box: f64,
    /// Size used when the natural size cannot be probed.
    pub fallback_size: Size,
    /// Longest canvas side when the canvas adopts an image's size.
    pub max_canvas_dim: f64,
}

impl Default for PlacementDefaults {
    fn default() -> Self {
        Self {
            offset: DEFAULT_LAYER_OFFSET,
            layer_box: DEFAULT_LAYER_BOX,
            fallback_size: Size::new(FALLBACK_LAYER_SIZE, FALLBACK_LAYER_SIZE),
            max_canvas_dim: MAX_CANVAS_DIM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Canvas size of a fresh studio session and after a reset.
    pub canvas: Size,
    pub placement: PlacementDefaults,
    /// Gallery items revealed per scroll batch.
    pub batch_size: usize,
    /// Download file name without extension.
    pub export_name: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            canvas: Size::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            placement: PlacementDefaults::default(),
            batch_size: GALLERY_BATCH_SIZE,
            export_name: DEFAULT_EXPORT_NAME.to_string(),
        }
    }
}

impl StudioConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `MEMESTUDIO_CANVAS_WIDTH` / `MEMESTUDIO_CANVAS_HEIGHT`: default 500
    /// - `MEMESTUDIO_MAX_CANVAS_DIM`: default 800
    /// - `MEMESTUDIO_FALLBACK_SIZE`: default 200 (square)
    /// - `MEMESTUDIO_BATCH_SIZE`: default 20
    /// - `MEMESTUDIO_EXPORT_NAME`: default `meme-gen-ultimate`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(w) = env_positive("MEMESTUDIO_CANVAS_WIDTH")? {
            cfg.canvas.width = w;
        }
        if let Some(h) = env_positive("MEMESTUDIO_CANVAS_HEIGHT")? {
            cfg.canvas.height = h;
        }
        if let Some(max) = env_positive("MEMESTUDIO_MAX_CANVAS_DIM")? {
            cfg.placement.max_canvas_dim = max;
        }
        if let Some(side) = env_positive("MEMESTUDIO_FALLBACK_SIZE")? {
            cfg.placement.fallback_size = Size::new(side, side);
        }
        if let Some(raw) = env_var("MEMESTUDIO_BATCH_SIZE") {
            cfg.batch_size = match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidValue { var: "MEMESTUDIO_BATCH_SIZE".into(), value: raw }),
            };
        }
        if let Some(name) = env_var("MEMESTUDIO_EXPORT_NAME") {
            let name = name.trim();
            if !name.is_empty() {
                cfg.export_name = name.to_string();
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a (possibly partial) JSON object from the host; missing keys keep defaults.
    /// The result is held to the same bounds as [`StudioConfig::from_env`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject sizes that are not positive and finite, a non-finite layer
    /// offset, a zero batch size, and a blank export name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.placement;
        positive("canvas.width", self.canvas.width)?;
        positive("canvas.height", self.canvas.height)?;
        positive("placement.layer_box", p.layer_box)?;
        positive("placement.fallback_size.width", p.fallback_size.width)?;
        positive("placement.fallback_size.height", p.fallback_size.height)?;
        positive("placement.max_canvas_dim", p.max_canvas_dim)?;
        if !p.offset.is_finite() {
            return Err(invalid("placement.offset", p.offset));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size", self.batch_size));
        }
        if self.export_name.trim().is_empty() {
            return Err(invalid("export_name", &self.export_name));
        }
        Ok(())
    }
}

fn positive(var: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 { Ok(()) } else { Err(invalid(var, value)) }
}

fn invalid(var: &str, value: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue { var: var.to_string(), value: value.to_string() }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).into_iter().find(|v| !v.trim().is_empty())
}

fn env_positive(key: &str) -> Result<Option<f64>, ConfigError> {
    let Some(raw) = env_var(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(Some(v)),
        _ => Err(ConfigError::InvalidValue { var: key.to_string(), value: raw }),
    }
}
