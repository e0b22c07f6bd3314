//! Stroke handling for the painting pipeline

use glam::Vec2;
use tracing::{debug, info};

use crate::smoothing::StrokeFinish;
use crate::types::{Modifiers, PointerButton, Region, Tool};

use super::PaintSession;

impl PaintSession {
    /// Handle a pointer press at `pos`
    ///
    /// A press outside every region does nothing. Otherwise the hit region
    /// becomes the selection, and either the eyedropper runs (Alt held) or
    /// a history entry is pushed and a stroke begins with the tool applied
    /// at `pos`. The secondary button erases for the whole stroke.
    ///
    /// Returns true if anything was painted.
    pub fn pointer_down(&mut self, pos: Vec2, button: PointerButton, modifiers: Modifiers) -> bool {
        // A press without a release in between closes the previous stroke
        if self.smoother.is_active() {
            self.finish_stroke();
        }

        let Some((tier_index, region)) = self.stack.region_at(pos) else {
            debug!("pointer_down: ({:.1}, {:.1}) misses every tier", pos.x, pos.y);
            return false;
        };
        self.selection = Some((tier_index, region));

        if modifiers.alt {
            self.pick_color(tier_index, region, pos);
            return false;
        }

        self.history.begin_edit(&self.stack, tier_index);

        let brush = match button {
            PointerButton::Primary => self.brush,
            PointerButton::Secondary => self.brush.with_tool(Tool::Erase),
        };
        let Some(tier) = self.stack.tier_mut(tier_index) else {
            return false;
        };

        let snapshot = tier.surface(region).clone();
        self.smoother.begin(tier_index, region, brush, snapshot, pos);
        let painted = self.engine.press(&mut tier.target(region), pos, &brush);

        debug!(
            "pointer_down: tier {} {:?} with {:?}, painted={}",
            tier_index, region, brush.tool, painted
        );
        painted
    }

    /// Continue the active stroke to `pos`
    ///
    /// Returns the number of stamps applied (0 without an active stroke).
    pub fn pointer_move(&mut self, pos: Vec2) -> usize {
        let Some(stroke) = self.smoother.active() else {
            return 0;
        };
        let (tier_index, region, brush) = (stroke.tier, stroke.region, stroke.brush);
        let Some(from) = stroke.last_point() else {
            return 0;
        };
        let Some(tier) = self.stack.tier_mut(tier_index) else {
            return 0;
        };

        let stamps = self.engine.drag(&mut tier.target(region), from, pos, &brush);
        self.smoother.push(pos);
        stamps
    }

    /// Release the pointer, finishing the active stroke
    pub fn pointer_up(&mut self) -> Option<StrokeFinish> {
        self.finish_stroke()
    }

    /// Focus loss mid-stroke counts as a release
    pub fn focus_lost(&mut self) -> Option<StrokeFinish> {
        if self.smoother.is_active() {
            debug!("focus_lost: closing active stroke");
        }
        self.finish_stroke()
    }

    /// Check if a stroke is in progress
    pub fn is_stroking(&self) -> bool {
        self.smoother.is_active()
    }

    /// Smooth and close the active stroke, if any
    pub(crate) fn finish_stroke(&mut self) -> Option<StrokeFinish> {
        let stroke = self.smoother.take()?;
        let tier = self.stack.tier_mut(stroke.tier)?;

        let result = self
            .smoother
            .finish(&stroke, &mut tier.target(stroke.region), &self.engine);

        info!(
            "Stroke finished: tier {} {:?}, {} points, {:?}",
            stroke.tier,
            stroke.region,
            stroke.points.len(),
            result
        );
        Some(result)
    }

    /// Eyedropper: adopt the paint color under `pos`
    ///
    /// Reads the hit region's own paint; unpainted pixels leave the brush
    /// color unchanged. Returns true if the color changed.
    fn pick_color(&mut self, tier_index: usize, region: Region, pos: Vec2) -> bool {
        let Some(pixel) = self
            .stack
            .tier(tier_index)
            .and_then(|tier| tier.surface(region).sample(pos))
        else {
            return false;
        };
        if pixel[3] <= 0.0 {
            debug!("pick_color: no paint at ({:.1}, {:.1})", pos.x, pos.y);
            return false;
        }
        self.brush.color = [pixel[0], pixel[1], pixel[2], 1.0];
        debug!("pick_color: picked {:?}", self.brush.color);
        true
    }
}
