use glam::Vec2;
use layercake_config::Rgb8;
use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color, each channel in 0.0..=1.0
pub type Color = [f32; 4];

/// Fully transparent black
pub const TRANSPARENT: Color = [0.0, 0.0, 0.0, 0.0];

/// Convert an opaque palette entry to a surface color
pub fn color_from_rgb8(rgb: Rgb8) -> Color {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        1.0,
    ]
}

/// Palette entry with an explicit 8-bit alpha
pub fn color_from_rgba8(rgb: Rgb8, alpha: u8) -> Color {
    let [r, g, b, _] = color_from_rgb8(rgb);
    [r, g, b, alpha as f32 / 255.0]
}

/// Quantize a surface color to 8-bit RGBA for export
pub fn color_to_rgba8(color: Color) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Linear interpolation between two colors
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// One of the two paintable areas of a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Region {
    /// Flat elliptical top
    #[default]
    Top = 0,
    /// Curved side, painted as a rectangle
    Side = 1,
}

/// Painting tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Tool {
    #[default]
    Freehand = 0,
    /// Paints with the icing color
    Erase = 1,
    /// Floods the whole selected region on press
    Fill = 2,
    /// Sprinkle burst on press
    Scatter = 3,
}

impl Tool {
    /// Whether strokes made with this tool follow the pointer path
    /// and get replaced by a smoothed replay on release
    pub fn follows_path(self) -> bool {
        matches!(self, Tool::Freehand | Tool::Erase)
    }
}

/// Pointer buttons the decorator reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    /// Erases for the duration of the stroke
    Secondary,
}

/// Keyboard modifiers sampled with a pointer press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Eyedropper instead of painting
    pub alt: bool,
}

/// Pointer input, already translated to canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        pos: Vec2,
        button: PointerButton,
        modifiers: Modifiers,
    },
    Move {
        pos: Vec2,
    },
    Up,
    /// Window lost focus mid-stroke; treated as a release
    FocusLost,
}

/// Channel-wise comparison with a small tolerance for blended pixels
#[cfg(test)]
pub(crate) fn approx_color(a: Color, b: Color) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_round_trip_extremes() {
        assert_eq!(color_to_rgba8(color_from_rgb8([0, 128, 255])), [0, 128, 255, 255]);
        assert_eq!(color_to_rgba8(TRANSPARENT), [0, 0, 0, 0]);
    }

    #[test]
    fn test_color_to_rgba8_clamps() {
        assert_eq!(color_to_rgba8([1.5, -0.2, 0.5, 1.0]), [255, 0, 128, 255]);
    }

    #[test]
    fn test_lerp_color() {
        let mid = lerp_color([0.0, 0.0, 0.0, 1.0], [1.0, 0.5, 0.0, 1.0], 0.5);
        assert!((mid[0] - 0.5).abs() < 1e-6);
        assert!((mid[1] - 0.25).abs() < 1e-6);
        assert_eq!(mid[3], 1.0);
    }

    #[test]
    fn test_tool_follows_path() {
        assert!(Tool::Freehand.follows_path());
        assert!(Tool::Erase.follows_path());
        assert!(!Tool::Fill.follows_path());
        assert!(!Tool::Scatter.follows_path());
    }
}
