//! Layer compositing
//!
//! The displayed image is built in a fixed order: the static base render of
//! the undecorated cake, then each tier's side paint followed by its top
//! paint, bottom tier first. Transient overlays (selection glow, brush ghost)
//! are drawn on the output buffer afterwards and never written back to any
//! paint surface.

use glam::Vec2;
use layercake_config::{CakePalette, GlowStyle};
use tracing::debug;

use crate::geometry::{Rect, TierGeometry, TierStack, ellipse_margin};
use crate::surface::PaintSurface;
use crate::types::{Color, Region, color_from_rgb8, color_from_rgba8, lerp_color};

/// Width of the ring drawn around each top ellipse in the base render
const BASE_OUTLINE_WIDTH: f32 = 2.0;

/// Width of the darker band just inside the top ellipse rim
const TOP_EDGE_BAND: f32 = 4.0;

/// Drop shadow alpha under each tier
const SHADOW_ALPHA: u8 = 60;

/// Alpha of the thin ledge line below each top
const LEDGE_ALPHA: u8 = 35;

/// Brush ghost fill alpha
const GHOST_FILL_ALPHA: u8 = 60;

/// Brush ghost rim alpha
const GHOST_RIM_ALPHA: u8 = 140;

/// Signed distance from `p` to a rounded rectangle boundary. Positive inside.
fn rounded_rect_margin(rect: Rect, radius: f32, p: Vec2) -> f32 {
    let half = Vec2::new(rect.width, rect.height) * 0.5;
    let radius = radius.min(half.x).min(half.y).max(0.0);
    let q = (p - rect.center()).abs() - (half - Vec2::splat(radius));
    let outside = q.max(Vec2::ZERO).length();
    let inside = q.x.max(q.y).min(0.0);
    radius - outside - inside
}

/// Signed distance to the ellipse inscribed in `rect`. Positive inside.
fn inscribed_ellipse_margin(rect: Rect, p: Vec2) -> f32 {
    ellipse_margin(rect.center(), rect.width * 0.5, rect.height * 0.5, p)
}

/// Blend a ring of `width` pixels just inside the ellipse inscribed in `rect`
fn ellipse_ring(target: &mut PaintSurface, rect: Rect, width: f32, color: Color) {
    target.blend_where(rect, color, |p| {
        let m = inscribed_ellipse_margin(rect, p);
        m >= 0.0 && m < width
    });
}

/// Draw the undecorated cake: per tier, a drop shadow, a shaded side and
/// a lit top
///
/// Tiers are drawn bottom to top so each upper tier covers the top of the
/// one beneath it.
pub fn render_base(stack: &TierStack, cake: &CakePalette) -> PaintSurface {
    let canvas = stack.canvas();
    let mut base = PaintSurface::new(canvas.width, canvas.height);

    let side_light = color_from_rgb8(cake.side_light);
    let side_dark = color_from_rgb8(cake.side_dark);
    let top_highlight = color_from_rgb8(cake.top_highlight);
    let top_edge = color_from_rgb8(cake.top_edge);
    let outline = color_from_rgb8(cake.outline);

    for tier in stack.tiers() {
        let g = *tier.geometry();
        let (c, r, ry, h) = (g.center(), g.r(), g.ry(), g.h());

        let shadow = Rect::new(c.x - r * 1.1, c.y + h - ry * 0.3, r * 2.2, ry);
        base.blend_where(shadow, color_from_rgba8([0, 0, 0], SHADOW_ALPHA), |p| {
            inscribed_ellipse_margin(shadow, p) >= 0.0
        });

        // Side: one gradient step per pixel row
        let side = g.side_rect();
        let first_row = side.y.floor().max(0.0) as u32;
        let last_row = side.bottom().ceil().max(0.0) as u32;
        for row in first_row..last_row {
            let t = (row as f32 + 0.5 - side.y) / side.height;
            let color = lerp_color(side_light, side_dark, t);
            let band = Rect::new(side.x, row as f32, side.width, 1.0);
            base.fill_where(band, color, |p| g.contains_side(p));
        }

        // Ledge under the top, then the rim where the side meets the plate
        let ledge = Rect::new(c.x - r, c.y + ry * 0.2, r * 2.0, ry * 1.4);
        ellipse_ring(&mut base, ledge, 1.0, color_from_rgba8([0, 0, 0], LEDGE_ALPHA));
        let rim = Rect::new(c.x - r, c.y + h - ry, r * 2.0, ry * 2.0);
        ellipse_ring(&mut base, rim, BASE_OUTLINE_WIDTH, side_dark);

        let top = g.top_rect();
        base.fill_where(top, top_highlight, |p| g.contains_top(p));
        base.fill_where(top, top_edge, |p| {
            let m = g.top_margin(p);
            g.contains_top(p) && m <= TOP_EDGE_BAND && m > BASE_OUTLINE_WIDTH
        });
        ellipse_ring(&mut base, top, BASE_OUTLINE_WIDTH, outline);
    }

    debug!("render_base: {} tiers", stack.len());
    base
}

/// Brush ghost shown under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushPreview {
    pub center: Vec2,
    /// Clipped brush radius at `center`
    pub radius: f32,
    /// Color the stroke would paint (alpha is replaced when drawn)
    pub color: Color,
}

/// Composites the base render, the tier paint and the overlays
#[derive(Debug, Clone)]
pub struct LayerCompositor {
    /// Static render of the undecorated cake
    base: PaintSurface,
    cake: CakePalette,
    glow: GlowStyle,
}

impl LayerCompositor {
    pub fn new(stack: &TierStack, cake: CakePalette, glow: GlowStyle) -> Self {
        Self {
            base: render_base(stack, &cake),
            cake,
            glow,
        }
    }

    /// Redraw the base after a cake palette change
    pub fn rebuild_base(&mut self, stack: &TierStack, cake: CakePalette) {
        self.cake = cake;
        self.base = render_base(stack, &self.cake);
    }

    pub fn base(&self) -> &PaintSurface {
        &self.base
    }

    pub fn cake(&self) -> &CakePalette {
        &self.cake
    }

    /// Composite base and paint layers into `target`
    ///
    /// Returns false (and leaves `target` untouched) if `target` is not
    /// canvas-sized.
    pub fn render(&self, stack: &TierStack, target: &mut PaintSurface) -> bool {
        if !target.copy_from(&self.base) {
            debug!(
                "LayerCompositor::render: target {}x{} does not match base {}x{}",
                target.width, target.height, self.base.width, self.base.height
            );
            return false;
        }
        for tier in stack.tiers() {
            target.blend_surface(tier.surface(Region::Side));
            target.blend_surface(tier.surface(Region::Top));
        }
        true
    }

    /// Offscreen composite of the paint layers, without overlays
    pub fn flatten(&self, stack: &TierStack) -> PaintSurface {
        let mut out = PaintSurface::new(self.base.width, self.base.height);
        self.render(stack, &mut out);
        out
    }

    /// Highlight a region on top of a composited frame
    pub fn draw_selection_glow(
        &self,
        target: &mut PaintSurface,
        geometry: &TierGeometry,
        region: Region,
    ) {
        let style = &self.glow;
        let width = style.outline_width as f32;
        let outline = color_from_rgba8(style.color, style.outline_alpha);
        let bounds = geometry.bounds(region).inflate(style.inflate as f32);

        match region {
            Region::Top => {
                let fill = color_from_rgba8(style.color, style.fill_alpha_top);
                target.blend_where(bounds, fill, |p| inscribed_ellipse_margin(bounds, p) >= 0.0);
                ellipse_ring(target, bounds, width, outline);
            }
            Region::Side => {
                let radius = style.corner_radius as f32;
                let fill = color_from_rgba8(style.color, style.fill_alpha_side);
                target.blend_where(bounds, fill, |p| rounded_rect_margin(bounds, radius, p) >= 0.0);
                target.blend_where(bounds, outline, |p| {
                    let m = rounded_rect_margin(bounds, radius, p);
                    m >= 0.0 && m < width
                });
            }
        }
    }

    /// Draw the brush ghost: a faint disk with a white rim
    pub fn draw_brush_preview(&self, target: &mut PaintSurface, preview: &BrushPreview) {
        if preview.radius <= 0.0 {
            return;
        }
        let [r, g, b, _] = preview.color;
        let fill = [r, g, b, GHOST_FILL_ALPHA as f32 / 255.0];
        let rim = color_from_rgba8([255, 255, 255], GHOST_RIM_ALPHA);
        let bounds = Rect::new(
            preview.center.x - preview.radius - 1.0,
            preview.center.y - preview.radius - 1.0,
            preview.radius * 2.0 + 2.0,
            preview.radius * 2.0 + 2.0,
        );

        target.blend_where(bounds, fill, |p| p.distance(preview.center) <= preview.radius);
        target.blend_where(bounds, rim, |p| {
            (p.distance(preview.center) - preview.radius).abs() < 0.5
        });
    }
}
