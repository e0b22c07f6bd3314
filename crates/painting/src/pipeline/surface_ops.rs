//! Surface operations for the painting pipeline

use glam::Vec2;

use crate::compositor::BrushPreview;
use crate::surface::PaintSurface;
use crate::types::{Color, Region};

use super::PaintSession;

impl PaintSession {
    /// Composite base and paint layers into `target`
    ///
    /// Returns false if `target` is not canvas-sized.
    pub fn render(&self, target: &mut PaintSurface) -> bool {
        self.compositor.render(&self.stack, target)
    }

    /// Composite a display frame with overlays
    ///
    /// Draws the selection glow and, when `pointer` is given and the brush
    /// reaches there, the brush ghost. Overlays only touch the returned
    /// frame buffer.
    pub fn render_frame(&mut self, pointer: Option<Vec2>) -> &PaintSurface {
        self.compositor.render(&self.stack, &mut self.frame);

        if let Some((index, region)) = self.selection {
            if let Some(tier) = self.stack.tier(index) {
                self.compositor
                    .draw_selection_glow(&mut self.frame, tier.geometry(), region);
            }
        }
        let preview = pointer.and_then(|p| self.brush_preview(p));
        if let Some(preview) = preview {
            self.compositor.draw_brush_preview(&mut self.frame, &preview);
        }
        &self.frame
    }

    /// Offscreen composite for export, without overlays
    pub fn flatten(&self) -> PaintSurface {
        self.compositor.flatten(&self.stack)
    }

    /// Ghost brush for the pointer at `point`
    ///
    /// The radius is clipped against the selected region; None when it
    /// clips to zero or nothing is selected.
    pub fn brush_preview(&self, point: Vec2) -> Option<BrushPreview> {
        let (index, region) = self.selection?;
        let geometry = self.stack.tier(index)?.geometry();
        let radius = geometry.clip_radius(region, point, self.brush.size);
        if radius <= 0.0 {
            return None;
        }
        Some(BrushPreview {
            center: point,
            radius,
            color: self.brush.paint_color(),
        })
    }

    /// Get a single pixel of one tier region's paint
    ///
    /// Returns None if the tier or coordinates are out of range.
    pub fn get_pixel(&self, tier: usize, region: Region, x: u32, y: u32) -> Option<Color> {
        self.stack.tier(tier)?.surface(region).get_pixel(x, y)
    }

    /// Get raw paint data of one tier region as bytes
    pub fn surface_as_bytes(&self, tier: usize, region: Region) -> Option<&[u8]> {
        self.stack
            .tier(tier)
            .map(|tier| tier.surface(region).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::session;
    use crate::types::{Modifiers, PointerButton, Tool};

    #[test]
    fn test_render_frame_leaves_paint_and_flatten_alone() {
        let mut session = session();
        let flat = session.flatten();

        let frame = session.render_frame(Some(Vec2::new(450.0, 359.0))).clone();
        assert_ne!(frame, flat);
        assert_eq!(session.flatten(), flat);
        for tier in session.stack().tiers() {
            assert!(tier.surface(Region::Top).is_blank());
        }
    }

    #[test]
    fn test_render_matches_flatten() {
        let session = session();
        let canvas = session.stack().canvas();
        let mut target = PaintSurface::new(canvas.width, canvas.height);
        assert!(session.render(&mut target));
        assert_eq!(target, session.flatten());
    }

    #[test]
    fn test_brush_preview_clips_to_selection() {
        let mut session = session();
        session.set_size(10);

        // Default selection is the top tier's top
        let center = Vec2::new(450.0, 359.0);
        let preview = session.brush_preview(center).unwrap();
        assert_eq!(preview.radius, 10.0);
        assert_eq!(preview.color, session.brush().color);

        // Near the ellipse rim the ghost shrinks
        let near_rim = Vec2::new(450.0, 359.0 - 16.0);
        let clipped = session.brush_preview(near_rim).unwrap();
        assert!(clipped.radius < 10.0 && clipped.radius > 0.0);

        assert!(session.brush_preview(Vec2::new(5.0, 5.0)).is_none());

        session.set_tool(Tool::Erase);
        assert_eq!(
            session.brush_preview(center).unwrap().color,
            session.brush().erase_color
        );
    }

    #[test]
    fn test_get_pixel_reads_region_paint() {
        let mut session = session();
        session.set_tool(Tool::Fill);
        session.set_color([0.0, 0.0, 1.0, 1.0]);
        session.pointer_down(Vec2::new(450.0, 560.0), PointerButton::Primary, Modifiers::default());
        session.pointer_up();

        assert_eq!(session.get_pixel(0, Region::Side, 450, 560), Some([0.0, 0.0, 1.0, 1.0]));
        assert_eq!(session.get_pixel(0, Region::Top, 450, 560), Some([0.0; 4]));
        assert_eq!(session.get_pixel(9, Region::Side, 450, 560), None);
        assert_eq!(
            session.surface_as_bytes(0, Region::Side).map(<[u8]>::len),
            Some(900 * 650 * 16)
        );
    }
}
