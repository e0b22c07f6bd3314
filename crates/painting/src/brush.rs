//! Brush engine for region-clipped stamping
//!
//! Every stamp is clipped against the silhouette of the region being
//! painted: the brush footprint shrinks as it approaches the edge instead of
//! spilling over it. Tools dispatch through [`BrushEngine::press`] (pointer
//! down) and [`BrushEngine::drag`] (pointer moves while held).

use glam::Vec2;
use layercake_config::{CakePalette, FROSTING_PALETTE};
use tracing::debug;

use crate::constants::{
    DEFAULT_SCATTER_SEED, SCATTER_DOT_COUNT, SCATTER_DOT_RADIUS_MAX, SCATTER_DOT_RADIUS_MIN,
    SCATTER_SPREAD_FACTOR, SEGMENT_STEP_FACTOR,
};
use crate::geometry::PaintTarget;
use crate::rng::Pcg32;
use crate::types::{Color, Tool, color_from_rgb8};

/// Current brush selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushState {
    /// Paint color for freehand, fill and as scatter fallback
    pub color: Color,
    /// Brush radius in pixels
    pub size: f32,
    /// Active tool
    pub tool: Tool,
    /// Color the eraser paints with (the icing underneath)
    pub erase_color: Color,
}

impl Default for BrushState {
    fn default() -> Self {
        Self {
            color: color_from_rgb8(FROSTING_PALETTE[0]),
            size: 14.0,
            tool: Tool::Freehand,
            erase_color: color_from_rgb8(CakePalette::BAKED.base),
        }
    }
}

impl BrushState {
    pub fn new(color: Color, size: f32, tool: Tool, erase_color: Color) -> Self {
        Self {
            color,
            size,
            tool,
            erase_color,
        }
    }

    /// Same brush with a different tool
    pub fn with_tool(self, tool: Tool) -> Self {
        Self { tool, ..self }
    }

    /// Color laid down by path-following tools
    pub fn paint_color(&self) -> Color {
        match self.tool {
            Tool::Erase => self.erase_color,
            Tool::Freehand | Tool::Fill | Tool::Scatter => self.color,
        }
    }
}

/// Brush engine that turns pointer input into clipped stamps
///
/// The engine itself is stateless apart from the sprinkle generator; the
/// brush selection is passed in with every call.
#[derive(Debug, Clone)]
pub struct BrushEngine {
    /// Colors sprinkles are drawn from
    scatter_palette: Vec<Color>,
    rng: Pcg32,
}

impl Default for BrushEngine {
    fn default() -> Self {
        let palette = FROSTING_PALETTE[..6].iter().copied().map(color_from_rgb8).collect();
        Self::new(palette, DEFAULT_SCATTER_SEED)
    }
}

impl BrushEngine {
    /// Create a brush engine with the given sprinkle palette and seed
    pub fn new(scatter_palette: Vec<Color>, seed: u64) -> Self {
        Self {
            scatter_palette,
            rng: Pcg32::new(seed),
        }
    }

    /// Apply the brush's tool for a pointer press at `p`
    ///
    /// Returns true if anything was painted. A press whose point clips to a
    /// zero radius paints nothing unless the tool is Fill.
    pub fn press(&mut self, target: &mut PaintTarget<'_>, p: Vec2, brush: &BrushState) -> bool {
        match brush.tool {
            Tool::Fill => self.fill_region(target, brush) > 0,
            _ if target.clip_radius(p, brush.size) <= 0.0 => {
                debug!(
                    "BrushEngine::press: ({:.1}, {:.1}) clips to zero, skipped",
                    p.x, p.y
                );
                false
            }
            Tool::Freehand | Tool::Erase => self.stamp_point(target, p, brush),
            Tool::Scatter => self.scatter(target, p, brush) > 0,
        }
    }

    /// Apply the brush's tool for a pointer drag from `from` to `to`
    ///
    /// Only path-following tools react to drags. Returns the number of stamps.
    pub fn drag(
        &mut self,
        target: &mut PaintTarget<'_>,
        from: Vec2,
        to: Vec2,
        brush: &BrushState,
    ) -> usize {
        match brush.tool {
            Tool::Freehand | Tool::Erase => self.stamp_segment(target, from, to, brush),
            Tool::Fill | Tool::Scatter => 0,
        }
    }

    /// Stamp one clipped disk at `p`
    ///
    /// Returns false if the clipped radius is zero.
    pub fn stamp_point(&self, target: &mut PaintTarget<'_>, p: Vec2, brush: &BrushState) -> bool {
        let radius = target.clip_radius(p, brush.size);
        if radius <= 0.0 {
            return false;
        }
        target.surface.stamp_disk(p, radius, brush.paint_color());
        true
    }

    /// Stamp clipped disks along the segment `p0 -> p1`
    ///
    /// Samples are spaced at `SEGMENT_STEP_FACTOR` of the brush radius (at
    /// least one pixel) and include both endpoints' neighborhood. Each sample
    /// is clipped on its own, so a segment crossing the silhouette tapers off
    /// instead of being dropped.
    pub fn stamp_segment(
        &self,
        target: &mut PaintTarget<'_>,
        p0: Vec2,
        p1: Vec2,
        brush: &BrushState,
    ) -> usize {
        let distance = (p0.distance(p1) as usize).max(1);
        let step = ((brush.size * SEGMENT_STEP_FACTOR) as usize).max(1);

        let mut stamps = 0;
        for i in (0..=distance).step_by(step) {
            let t = i as f32 / distance as f32;
            if self.stamp_point(target, p0.lerp(p1, t), brush) {
                stamps += 1;
            }
        }

        debug!(
            "BrushEngine::stamp_segment: ({:.1}, {:.1}) -> ({:.1}, {:.1}), {} stamps",
            p0.x, p0.y, p1.x, p1.y, stamps
        );
        stamps
    }

    /// Flood the whole region with the brush color
    ///
    /// Returns the number of pixels written.
    pub fn fill_region(&self, target: &mut PaintTarget<'_>, brush: &BrushState) -> usize {
        let geometry = *target.geometry;
        let region = target.region;
        let filled = target
            .surface
            .fill_where(geometry.bounds(region), brush.color, |p| {
                geometry.contains(region, p)
            });
        debug!("BrushEngine::fill_region: {:?}, {} pixels", region, filled);
        filled
    }

    /// Sprinkle a burst of small dots around `p`
    ///
    /// Dots are not radius-clipped, but a dot whose center falls outside the
    /// region is skipped. Returns the number of dots stamped.
    pub fn scatter(&mut self, target: &mut PaintTarget<'_>, p: Vec2, brush: &BrushState) -> usize {
        let spread = brush.size * SCATTER_SPREAD_FACTOR;
        let mut dots = 0;

        for _ in 0..SCATTER_DOT_COUNT {
            let angle = self.rng.next_f32() * std::f32::consts::TAU;
            let offset = self.rng.next_f32() * spread;
            let radius = self
                .rng
                .range_inclusive(SCATTER_DOT_RADIUS_MIN, SCATTER_DOT_RADIUS_MAX)
                as f32;
            let color = if self.scatter_palette.is_empty() {
                brush.color
            } else {
                self.scatter_palette[self.rng.index(self.scatter_palette.len())]
            };

            let center = p + Vec2::from_angle(angle) * offset;
            if target.contains(center) {
                target.surface.stamp_disk(center, radius, color);
                dots += 1;
            }
        }

        debug!(
            "BrushEngine::scatter: {} of {} dots at ({:.1}, {:.1})",
            dots, SCATTER_DOT_COUNT, p.x, p.y
        );
        dots
    }
}
