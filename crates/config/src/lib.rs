//! Shared configuration for layercake
//!
//! This crate provides the single source of truth for the canvas extent,
//! the frosting and cake palettes, brush-size limits and the history depth
//! used by the painting engine and the headless driver.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 900;

/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 650;

/// Default number of undo levels kept before the oldest is evicted
pub const DEFAULT_HISTORY_DEPTH: usize = 40;

/// An 8-bit RGB triple as it appears in palettes
pub type Rgb8 = [u8; 3];

/// Frosting colors selectable with the number keys, in key order
pub const FROSTING_PALETTE: [Rgb8; 9] = [
    [255, 99, 132],  // strawberry
    [255, 159, 64],  // orange
    [255, 205, 86],  // lemon
    [75, 192, 192],  // mint
    [54, 162, 235],  // blue
    [153, 102, 255], // grape
    [255, 255, 255], // white
    [0, 0, 0],       // chocolate
    [255, 105, 180], // hot pink
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Canvas extent shared by every paint surface and the flattened output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl CanvasConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Shading colors for the undecorated cake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CakePalette {
    /// Icing color; also what the eraser paints with
    pub base: Rgb8,
    pub top_highlight: Rgb8,
    pub top_edge: Rgb8,
    pub side_light: Rgb8,
    pub side_dark: Rgb8,
    pub outline: Rgb8,
}

impl CakePalette {
    /// Batter colors shown before baking
    pub const PREBAKE: Self = Self {
        base: [250, 246, 232],
        top_highlight: [255, 253, 244],
        top_edge: [236, 224, 198],
        side_light: [246, 236, 210],
        side_dark: [228, 206, 172],
        outline: [212, 192, 172],
    };

    /// Crumb colors of a baked cake
    pub const BAKED: Self = Self {
        base: [248, 229, 185],
        top_highlight: [252, 235, 200],
        top_edge: [220, 185, 140],
        side_light: [235, 205, 170],
        side_dark: [205, 170, 125],
        outline: [190, 160, 130],
    };
}

impl Default for CakePalette {
    fn default() -> Self {
        Self::BAKED
    }
}

/// Discrete brush-size range exposed to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushLimits {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl Default for BrushLimits {
    fn default() -> Self {
        Self {
            min: 2,
            max: 64,
            default: 14,
        }
    }
}

impl BrushLimits {
    /// Clamp `size` into range; `max` wins when the limits are inverted
    pub fn clamp(&self, size: u32) -> u32 {
        size.max(self.min).min(self.max)
    }
}

/// Look of the selection highlight drawn over the selected region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlowStyle {
    pub color: Rgb8,
    pub fill_alpha_top: u8,
    pub fill_alpha_side: u8,
    pub outline_alpha: u8,
    pub outline_width: u32,
    /// Total growth of the highlighted bounds (half on each side)
    pub inflate: u32,
    /// Corner rounding of the side highlight
    pub corner_radius: u32,
}

impl Default for GlowStyle {
    fn default() -> Self {
        Self {
            color: [255, 245, 170],
            fill_alpha_top: 80,
            fill_alpha_side: 60,
            outline_alpha: 140,
            outline_width: 3,
            inflate: 12,
            corner_radius: 8,
        }
    }
}

/// Complete decorator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoratorConfig {
    pub canvas: CanvasConfig,
    /// Selectable frosting colors
    pub palette: Vec<Rgb8>,
    /// How many leading palette entries sprinkles draw from
    pub scatter_palette_len: usize,
    pub cake: CakePalette,
    pub brush: BrushLimits,
    pub history_depth: usize,
    pub glow: GlowStyle,
}

impl Default for DecoratorConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            palette: FROSTING_PALETTE.to_vec(),
            scatter_palette_len: 6,
            cake: CakePalette::BAKED,
            brush: BrushLimits::default(),
            history_depth: DEFAULT_HISTORY_DEPTH,
            glow: GlowStyle::default(),
        }
    }
}

impl DecoratorConfig {
    /// Parse a config from JSON; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Reject inconsistent settings and pull the default brush size into range
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.brush.min > self.brush.max {
            return Err(ConfigError::Invalid(format!(
                "brush size min {} exceeds max {}",
                self.brush.min, self.brush.max
            )));
        }
        if self.history_depth == 0 {
            return Err(ConfigError::Invalid("history_depth must be at least 1".into()));
        }
        self.brush.default = self.brush.clamp(self.brush.default);
        Ok(self)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Colors sprinkles are drawn from
    pub fn scatter_palette(&self) -> &[Rgb8] {
        let len = self.scatter_palette_len.min(self.palette.len());
        &self.palette[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DecoratorConfig::default();
        assert_eq!(config.canvas.width, DEFAULT_WIDTH);
        assert_eq!(config.canvas.height, DEFAULT_HEIGHT);
        assert_eq!(config.history_depth, DEFAULT_HISTORY_DEPTH);
        assert_eq!(config.palette.len(), 9);
        assert_eq!(config.cake, CakePalette::BAKED);
    }

    #[test]
    fn test_brush_limits_clamp() {
        let limits = BrushLimits::default();
        assert_eq!(limits.clamp(0), 2);
        assert_eq!(limits.clamp(14), 14);
        assert_eq!(limits.clamp(200), 64);

        let inverted = BrushLimits {
            min: 10,
            max: 5,
            default: 7,
        };
        assert_eq!(inverted.clamp(7), 5);
    }

    #[test]
    fn test_inverted_brush_limits_rejected() {
        let result = DecoratorConfig::from_json_str(r#"{"brush":{"min":10,"max":5,"default":7}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_history_depth_rejected() {
        let result = DecoratorConfig::from_json_str(r#"{ "history_depth": 0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_default_brush_size_pulled_into_range() {
        let config =
            DecoratorConfig::from_json_str(r#"{"brush":{"min":4,"max":20,"default":90}}"#)
                .unwrap();
        assert_eq!(config.brush.default, 20);

        let config =
            DecoratorConfig::from_json_str(r#"{"brush":{"min":4,"max":20,"default":1}}"#)
                .unwrap();
        assert_eq!(config.brush.default, 4);
    }

    #[test]
    fn test_scatter_palette() {
        let mut config = DecoratorConfig::default();
        assert_eq!(config.scatter_palette(), &FROSTING_PALETTE[..6]);

        config.scatter_palette_len = 50;
        assert_eq!(config.scatter_palette().len(), 9);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            DecoratorConfig::from_json_str(r#"{ "canvas": { "width": 320, "height": 240 } }"#)
                .unwrap();
        assert_eq!(config.canvas, CanvasConfig::new(320, 240));
        assert_eq!(config.brush, BrushLimits::default());
        assert_eq!(config.history_depth, DEFAULT_HISTORY_DEPTH);
    }

    #[test]
    fn test_invalid_json() {
        let result = DecoratorConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
