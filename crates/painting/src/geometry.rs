//! Tier silhouettes, stack layout and brush clipping
//!
//! A tier is drawn as a flat ellipse (the top) sitting on a rectangle (the
//! side). Both are full-canvas coordinates: the top ellipse is centered on
//! the tier center, the side rectangle hangs down from it.

use glam::Vec2;
use layercake_config::CanvasConfig;
use thiserror::Error;
use tracing::debug;

use crate::constants::{
    MIN_SIDE_HEIGHT, SIDE_HEIGHT_FACTOR, STACK_FLOOR_MARGIN, STACK_OVERLAP, TOP_RY_FACTOR,
};
use crate::surface::PaintSurface;
use crate::types::Region;

/// Signed distance from `p` to an axis-aligned ellipse boundary, along the
/// ray from the center. Positive inside; the smaller semi-axis at the center.
pub(crate) fn ellipse_margin(center: Vec2, rx: f32, ry: f32, p: Vec2) -> f32 {
    let d = p - center;
    if d == Vec2::ZERO {
        return rx.min(ry);
    }
    let normalized = (d.x * d.x) / (rx * rx) + (d.y * d.y) / (ry * ry);
    let dist = d.length();
    // The boundary along this ray sits at dist / sqrt(normalized)
    dist / normalized.sqrt() - dist
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("A tier stack needs at least one radius")]
    EmptyStack,
    #[error("Invalid tier dimensions: r={r}, h={h}, ry={ry} (all must be > 0)")]
    InvalidDimensions { r: f32, h: f32, ry: f32 },
    #[error("Tier {index} radius {radius} is larger than the tier below it ({below})")]
    NotDescending { index: usize, radius: f32, below: f32 },
}

/// Axis-aligned rectangle; containment is half-open (`[left, right) x [top, bottom)`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Grow by `amount` in total along each axis, keeping the center
    pub fn inflate(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount * 0.5,
            self.y - amount * 0.5,
            self.width + amount,
            self.height + amount,
        )
    }

    /// Smallest distance from `p` to any of the four edges
    /// (negative when `p` is outside)
    pub fn edge_margin(&self, p: Vec2) -> f32 {
        let left = p.x - self.x;
        let right = self.right() - p.x;
        let top = p.y - self.y;
        let bottom = self.bottom() - p.y;
        left.min(right).min(top).min(bottom)
    }
}

/// Silhouette of one tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierGeometry {
    center: Vec2,
    /// Horizontal radius
    r: f32,
    /// Side height
    h: f32,
    /// Vertical radius of the top ellipse
    ry: f32,
}

impl TierGeometry {
    pub fn new(center: Vec2, r: f32, h: f32, ry: f32) -> Result<Self, GeometryError> {
        // `!(x > 0.0)` also rejects NaN
        if !(r > 0.0) || !(h > 0.0) || !(ry > 0.0) {
            return Err(GeometryError::InvalidDimensions { r, h, ry });
        }
        Ok(Self { center, r, h, ry })
    }

    /// Geometry for a cake layer of radius `r`, with side height and
    /// top-ellipse radius derived from it
    pub fn for_radius(center: Vec2, r: f32) -> Result<Self, GeometryError> {
        Self::new(center, r, side_height_for(r), top_ry_for(r))
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn r(&self) -> f32 {
        self.r
    }

    #[inline]
    pub fn h(&self) -> f32 {
        self.h
    }

    #[inline]
    pub fn ry(&self) -> f32 {
        self.ry
    }

    /// Bounding box of the top ellipse
    pub fn top_rect(&self) -> Rect {
        Rect::new(
            self.center.x - self.r,
            self.center.y - self.ry,
            self.r * 2.0,
            self.ry * 2.0,
        )
    }

    /// The side rectangle, hanging down from the tier center
    pub fn side_rect(&self) -> Rect {
        Rect::new(self.center.x - self.r, self.center.y, self.r * 2.0, self.h)
    }

    /// Bounding box of a region
    pub fn bounds(&self, region: Region) -> Rect {
        match region {
            Region::Top => self.top_rect(),
            Region::Side => self.side_rect(),
        }
    }

    pub fn contains_top(&self, p: Vec2) -> bool {
        let d = p - self.center;
        (d.x * d.x) / (self.r * self.r) + (d.y * d.y) / (self.ry * self.ry) <= 1.0
    }

    pub fn contains_side(&self, p: Vec2) -> bool {
        self.side_rect().contains(p)
    }

    pub fn contains(&self, region: Region, p: Vec2) -> bool {
        match region {
            Region::Top => self.contains_top(p),
            Region::Side => self.contains_side(p),
        }
    }

    /// Distance from `p` to the top ellipse boundary, measured along the ray
    /// from the center through `p`. Negative outside the ellipse.
    pub fn top_margin(&self, p: Vec2) -> f32 {
        ellipse_margin(self.center, self.r, self.ry, p)
    }

    /// Distance from `p` to the nearest side edge. Negative outside.
    pub fn side_margin(&self, p: Vec2) -> f32 {
        let rect = self.side_rect();
        if !rect.contains(p) {
            return rect.edge_margin(p).min(0.0);
        }
        rect.edge_margin(p)
    }

    /// Largest brush radius usable at `p` without leaving `region`
    ///
    /// The result is `min(requested, margin)`, or 0 when `p` is on or
    /// outside the region boundary.
    pub fn clip_radius(&self, region: Region, p: Vec2, requested: f32) -> f32 {
        let margin = match region {
            Region::Top => self.top_margin(p),
            Region::Side => self.side_margin(p),
        };
        if !(margin > 0.0) || requested <= 0.0 {
            return 0.0;
        }
        requested.min(margin)
    }
}

/// Side height for a tier of radius `r`
pub fn side_height_for(r: f32) -> f32 {
    (r * SIDE_HEIGHT_FACTOR).floor().max(MIN_SIDE_HEIGHT)
}

/// Top-ellipse vertical radius for a tier of radius `r`
pub fn top_ry_for(r: f32) -> f32 {
    (r * TOP_RY_FACTOR).floor()
}

/// One stacked layer: fixed geometry plus its two paint surfaces
#[derive(Debug, Clone)]
pub struct Tier {
    geometry: TierGeometry,
    /// Paint on the top ellipse
    top: PaintSurface,
    /// Paint on the side
    side: PaintSurface,
}

/// A region's surface paired with the silhouette that clips it
pub struct PaintTarget<'a> {
    pub geometry: &'a TierGeometry,
    pub region: Region,
    pub surface: &'a mut PaintSurface,
}

impl<'a> PaintTarget<'a> {
    /// Clipped brush radius at `p` for this target
    pub fn clip_radius(&self, p: Vec2, requested: f32) -> f32 {
        self.geometry.clip_radius(self.region, p, requested)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.geometry.contains(self.region, p)
    }
}

impl Tier {
    pub fn new(geometry: TierGeometry, canvas: CanvasConfig) -> Self {
        Self {
            geometry,
            top: PaintSurface::new(canvas.width, canvas.height),
            side: PaintSurface::new(canvas.width, canvas.height),
        }
    }

    #[inline]
    pub fn geometry(&self) -> &TierGeometry {
        &self.geometry
    }

    pub fn surface(&self, region: Region) -> &PaintSurface {
        match region {
            Region::Top => &self.top,
            Region::Side => &self.side,
        }
    }

    pub fn surface_mut(&mut self, region: Region) -> &mut PaintSurface {
        match region {
            Region::Top => &mut self.top,
            Region::Side => &mut self.side,
        }
    }

    /// Borrow a region's surface together with the geometry that clips it
    pub fn target(&mut self, region: Region) -> PaintTarget<'_> {
        let surface = match region {
            Region::Top => &mut self.top,
            Region::Side => &mut self.side,
        };
        PaintTarget {
            geometry: &self.geometry,
            region,
            surface,
        }
    }
}

/// Tiers ordered bottom (largest) to top (smallest)
#[derive(Debug, Clone)]
pub struct TierStack {
    canvas: CanvasConfig,
    tiers: Vec<Tier>,
}

impl TierStack {
    /// Build a stack from radii given bottom to top
    ///
    /// Tiers are centered horizontally; the bottom tier rests
    /// `STACK_FLOOR_MARGIN` above the canvas bottom and each tier above it
    /// sinks `STACK_OVERLAP` pixels into its neighbor.
    pub fn build(radii: &[f32], canvas: CanvasConfig) -> Result<Self, GeometryError> {
        if radii.is_empty() {
            return Err(GeometryError::EmptyStack);
        }

        let cx = (canvas.width / 2) as f32;
        let mut tiers = Vec::with_capacity(radii.len());
        let mut center_y = 0.0;

        for (index, &r) in radii.iter().enumerate() {
            let h = side_height_for(r);
            if index == 0 {
                center_y = canvas.height as f32 - STACK_FLOOR_MARGIN - h;
            } else {
                let below = radii[index - 1];
                if r > below {
                    return Err(GeometryError::NotDescending {
                        index,
                        radius: r,
                        below,
                    });
                }
                center_y = center_y - h + STACK_OVERLAP;
            }

            let geometry = TierGeometry::for_radius(Vec2::new(cx, center_y), r)?;
            debug!(
                "TierStack::build: tier {} center=({:.1}, {:.1}) r={:.1} h={:.1} ry={:.1}",
                index,
                cx,
                center_y,
                geometry.r(),
                geometry.h(),
                geometry.ry()
            );
            tiers.push(Tier::new(geometry, canvas));
        }

        Ok(Self { canvas, tiers })
    }

    /// Wrap already-positioned geometries, bottom to top
    pub fn from_geometries(geometries: Vec<TierGeometry>, canvas: CanvasConfig) -> Self {
        let tiers = geometries
            .into_iter()
            .map(|geometry| Tier::new(geometry, canvas))
            .collect();
        Self { canvas, tiers }
    }

    /// Find the tier and region under `point`
    ///
    /// Tiers are tested topmost first since upper tiers occlude lower ones;
    /// within a tier the top is tested before the side.
    pub fn region_at(&self, point: Vec2) -> Option<(usize, Region)> {
        self.tiers
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, tier)| {
                let geometry = tier.geometry();
                if geometry.contains_top(point) {
                    Some((index, Region::Top))
                } else if geometry.contains_side(point) {
                    Some((index, Region::Side))
                } else {
                    None
                }
            })
    }

    #[inline]
    pub fn canvas(&self) -> CanvasConfig {
        self.canvas
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn tier(&self, index: usize) -> Option<&Tier> {
        self.tiers.get(index)
    }

    pub fn tier_mut(&mut self, index: usize) -> Option<&mut Tier> {
        self.tiers.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> TierGeometry {
        TierGeometry::new(Vec2::new(200.0, 100.0), 100.0, 40.0, 20.0).unwrap()
    }

    #[test]
    fn test_invalid_dimensions() {
        let center = Vec2::new(10.0, 10.0);
        assert!(TierGeometry::new(center, 0.0, 10.0, 10.0).is_err());
        assert!(TierGeometry::new(center, 10.0, -1.0, 10.0).is_err());
        assert!(TierGeometry::new(center, 10.0, 10.0, f32::NAN).is_err());
        // ry floors to 0 for tiny radii
        assert!(TierGeometry::for_radius(center, 5.0).is_err());
    }

    #[test]
    fn test_derived_dimensions() {
        assert_eq!(side_height_for(220.0), 105.0);
        assert_eq!(side_height_for(50.0), MIN_SIDE_HEIGHT);
        assert_eq!(top_ry_for(220.0), 39.0);
        assert_eq!(top_ry_for(110.0), 19.0);
    }

    #[test]
    fn test_contains_top_and_side() {
        let g = geometry();
        assert!(g.contains_top(Vec2::new(200.0, 100.0)));
        assert!(g.contains_top(Vec2::new(299.0, 100.0)));
        assert!(!g.contains_top(Vec2::new(200.0, 121.0)));

        assert!(g.contains_side(Vec2::new(100.0, 100.0)));
        assert!(g.contains_side(Vec2::new(299.9, 139.9)));
        // Half-open on the right and bottom edges
        assert!(!g.contains_side(Vec2::new(300.0, 120.0)));
        assert!(!g.contains_side(Vec2::new(200.0, 140.0)));
        assert!(!g.contains_side(Vec2::new(200.0, 99.0)));
    }

    #[test]
    fn test_ellipse_margin() {
        let center = Vec2::new(50.0, 50.0);
        assert!((ellipse_margin(center, 40.0, 15.0, Vec2::new(60.0, 50.0)) - 30.0).abs() < 1e-4);
        assert!((ellipse_margin(center, 40.0, 15.0, Vec2::new(50.0, 40.0)) - 5.0).abs() < 1e-4);
        assert_eq!(ellipse_margin(center, 40.0, 15.0, center), 15.0);
        assert!(ellipse_margin(center, 40.0, 15.0, Vec2::new(95.0, 50.0)) < 0.0);

        let g = TierGeometry::new(center, 40.0, 10.0, 15.0).unwrap();
        let p = Vec2::new(60.0, 52.0);
        assert_eq!(g.top_margin(p), ellipse_margin(center, 40.0, 15.0, p));
    }

    #[test]
    fn test_clip_radius_outside_is_zero() {
        let g = geometry();
        let outside = [
            Vec2::new(0.0, 0.0),
            Vec2::new(200.0, 79.0),
            Vec2::new(305.0, 100.0),
            Vec2::new(350.0, 300.0),
        ];
        for p in outside {
            assert_eq!(g.clip_radius(Region::Top, p, 10.0), 0.0, "top at {p:?}");
        }
        for p in [Vec2::new(50.0, 120.0), Vec2::new(200.0, 150.0), Vec2::new(200.0, 90.0)] {
            assert_eq!(g.clip_radius(Region::Side, p, 10.0), 0.0, "side at {p:?}");
        }
    }

    #[test]
    fn test_clip_radius_top_margin() {
        let g = geometry();
        // 90 px right of center: boundary along +x is at 100, margin 10
        let p = Vec2::new(290.0, 100.0);
        assert!((g.clip_radius(Region::Top, p, 50.0) - 10.0).abs() < 1e-4);
        assert!((g.clip_radius(Region::Top, p, 4.0) - 4.0).abs() < 1e-6);

        // 15 px below center: boundary along +y is at 20, margin 5
        let p = Vec2::new(200.0, 115.0);
        assert!((g.clip_radius(Region::Top, p, 50.0) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_clip_radius_top_diagonal() {
        let g = geometry();
        // Along the ray through (3, 4) * k the boundary is where
        // (3k/100)^2 + (4k/20)^2 = 1
        let k_boundary = 1.0 / ((3.0f32 / 100.0).powi(2) + (4.0f32 / 20.0).powi(2)).sqrt();
        let p = g.center() + Vec2::new(3.0, 4.0);
        let expected = 5.0 * k_boundary - 5.0;
        assert!((g.clip_radius(Region::Top, p, 100.0) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_clip_radius_center_uses_smaller_axis() {
        let g = geometry();
        assert_eq!(g.clip_radius(Region::Top, g.center(), 100.0), 20.0);
        assert_eq!(g.clip_radius(Region::Top, g.center(), 8.0), 8.0);
    }

    #[test]
    fn test_clip_radius_side_margin() {
        let g = geometry();
        // Side spans x 100..300, y 100..140
        let p = Vec2::new(200.0, 103.0);
        assert_eq!(g.clip_radius(Region::Side, p, 10.0), 3.0);
        let p = Vec2::new(106.0, 120.0);
        assert_eq!(g.clip_radius(Region::Side, p, 10.0), 6.0);
        let p = Vec2::new(200.0, 120.0);
        assert_eq!(g.clip_radius(Region::Side, p, 10.0), 10.0);
        assert_eq!(g.clip_radius(Region::Side, p, 0.0), 0.0);
    }

    #[test]
    fn test_build_stack_layout() {
        let stack = TierStack::build(&[220.0, 160.0, 110.0], CanvasConfig::new(900, 650)).unwrap();
        assert_eq!(stack.len(), 3);

        let bottom = stack.tier(0).unwrap().geometry();
        let middle = stack.tier(1).unwrap().geometry();
        let top = stack.tier(2).unwrap().geometry();

        assert_eq!(bottom.center(), Vec2::new(450.0, 475.0));
        assert_eq!(bottom.h(), 105.0);
        assert_eq!(middle.center().y, 405.0);
        assert_eq!(top.center().y, 359.0);
        assert_eq!(top.h(), 52.0);
        assert_eq!(top.ry(), 19.0);

        let tier = stack.tier(0).unwrap();
        assert_eq!(tier.surface(Region::Top).width, 900);
        assert_eq!(tier.surface(Region::Side).height, 650);
    }

    #[test]
    fn test_build_stack_rejects_bad_radii() {
        let canvas = CanvasConfig::default();
        assert!(matches!(
            TierStack::build(&[], canvas),
            Err(GeometryError::EmptyStack)
        ));
        assert!(matches!(
            TierStack::build(&[100.0, 150.0], canvas),
            Err(GeometryError::NotDescending { index: 1, .. })
        ));
        assert!(matches!(
            TierStack::build(&[100.0, -3.0], canvas),
            Err(GeometryError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_region_at_prefers_topmost_tier() {
        let stack = TierStack::build(&[220.0, 160.0, 110.0], CanvasConfig::new(900, 650)).unwrap();

        // Top tier's top ellipse center
        assert_eq!(stack.region_at(Vec2::new(450.0, 359.0)), Some((2, Region::Top)));
        // Top tier's side, which overlaps the middle tier's top ellipse
        assert_eq!(stack.region_at(Vec2::new(450.0, 400.0)), Some((2, Region::Side)));
        // Middle tier's side, left of the top tier
        assert_eq!(stack.region_at(Vec2::new(300.0, 450.0)), Some((1, Region::Side)));
        // Bottom tier's side, below everything else
        assert_eq!(stack.region_at(Vec2::new(450.0, 560.0)), Some((0, Region::Side)));
        // Bottom tier's top, outside the middle tier
        assert_eq!(stack.region_at(Vec2::new(250.0, 475.0)), Some((0, Region::Top)));
        // Miss
        assert_eq!(stack.region_at(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_target_borrows_matching_surface() {
        let mut tier = Tier::new(geometry(), CanvasConfig::new(400, 200));
        let mut target = tier.target(Region::Side);
        assert_eq!(target.region, Region::Side);
        assert_eq!(target.clip_radius(Vec2::new(200.0, 120.0), 5.0), 5.0);
        target.surface.set_pixel(1, 1, [1.0; 4]);
        assert_eq!(tier.surface(Region::Side).get_pixel(1, 1), Some([1.0; 4]));
        assert!(tier.surface(Region::Top).is_blank());
    }
}
