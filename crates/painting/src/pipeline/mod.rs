//! Complete painting pipeline
//!
//! [`PaintSession`] connects:
//! - Input handling (pointer events in canvas coordinates)
//! - Hit testing against the tier stack
//! - Brush engine (clipped stamps, fill, sprinkles)
//! - Stroke smoothing on release
//! - Undo/redo history
//! - Layer compositing and PNG export
//!
//! The session is single-threaded and frame-synchronous: a front end feeds
//! it the pointer events of one frame, then asks for a rendered frame.

mod export;
mod stroke;
mod surface_ops;
mod undo;

use layercake_config::{BrushLimits, CakePalette, DecoratorConfig};
use tracing::debug;

use crate::brush::{BrushEngine, BrushState};
use crate::compositor::LayerCompositor;
use crate::constants::{DEFAULT_SCATTER_SEED, TOAST_SECONDS};
use crate::geometry::TierStack;
use crate::smoothing::StrokeSmoother;
use crate::surface::PaintSurface;
use crate::types::{Color, PointerEvent, Region, Tool, color_from_rgb8};

pub use export::{ExportError, export_png};
pub use undo::{HistoryEntry, HistoryManager};

/// Short-lived status message
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    /// Seconds left before it disappears
    pub remaining: f32,
}

/// Painting session over one tier stack
///
/// This struct manages the full decorating workflow:
/// 1. Pointer input comes in via `handle_event`
/// 2. Presses hit-test the stack and select a tier region
/// 3. The brush engine paints into the selected region's surface
/// 4. Releases replace the live stroke with its smoothed replay
/// 5. The compositor builds display frames and export images
pub struct PaintSession {
    /// Tiers and their paint surfaces
    pub(crate) stack: TierStack,
    /// Current brush selection
    pub(crate) brush: BrushState,
    /// Brush engine for stamping
    pub(crate) engine: BrushEngine,
    /// Active stroke buffer
    pub(crate) smoother: StrokeSmoother,
    /// Undo/redo stacks
    pub(crate) history: HistoryManager,
    pub(crate) compositor: LayerCompositor,
    /// Selected tier and region (None only for an empty stack)
    pub(crate) selection: Option<(usize, Region)>,
    /// Allowed brush sizes
    pub(crate) limits: BrushLimits,
    /// Selectable frosting colors
    pub(crate) palette: Vec<Color>,
    /// Status message shown over the canvas
    pub(crate) toast: Option<Toast>,
    /// Reused display buffer
    pub(crate) frame: PaintSurface,
}

impl PaintSession {
    /// Create a session over `stack` using the default sprinkle seed
    pub fn new(stack: TierStack, config: &DecoratorConfig) -> Self {
        Self::with_seed(stack, config, DEFAULT_SCATTER_SEED)
    }

    /// Create a session with an explicit sprinkle seed
    pub fn with_seed(stack: TierStack, config: &DecoratorConfig, seed: u64) -> Self {
        let palette: Vec<Color> = config.palette.iter().copied().map(color_from_rgb8).collect();
        let scatter = config
            .scatter_palette()
            .iter()
            .copied()
            .map(color_from_rgb8)
            .collect();

        let brush = BrushState::new(
            palette.first().copied().unwrap_or([1.0, 1.0, 1.0, 1.0]),
            config.brush.clamp(config.brush.default) as f32,
            Tool::Freehand,
            color_from_rgb8(config.cake.base),
        );

        let selection = stack.len().checked_sub(1).map(|top| (top, Region::Top));
        let canvas = stack.canvas();

        debug!(
            "PaintSession::new: {} tiers on {}x{}, history depth {}",
            stack.len(),
            canvas.width,
            canvas.height,
            config.history_depth
        );

        Self {
            compositor: LayerCompositor::new(&stack, config.cake, config.glow),
            stack,
            brush,
            engine: BrushEngine::new(scatter, seed),
            smoother: StrokeSmoother::default(),
            history: HistoryManager::new(config.history_depth),
            selection,
            limits: config.brush,
            palette,
            toast: None,
            frame: PaintSurface::new(canvas.width, canvas.height),
        }
    }

    /// Route one pointer event
    pub fn handle_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                pos,
                button,
                modifiers,
            } => {
                self.pointer_down(pos, button, modifiers);
            }
            PointerEvent::Move { pos } => {
                self.pointer_move(pos);
            }
            PointerEvent::Up => {
                self.pointer_up();
            }
            PointerEvent::FocusLost => {
                self.focus_lost();
            }
        }
    }

    /// Get the tier stack
    pub fn stack(&self) -> &TierStack {
        &self.stack
    }

    /// Get the current brush
    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    /// Get the selected tier and region
    pub fn selection(&self) -> Option<(usize, Region)> {
        self.selection
    }

    /// Hit-test a canvas point
    pub fn region_at(&self, point: glam::Vec2) -> Option<(usize, Region)> {
        self.stack.region_at(point)
    }

    /// Set the active tool
    pub fn set_tool(&mut self, tool: Tool) {
        self.brush.tool = tool;
    }

    /// Set the brush color
    pub fn set_color(&mut self, color: Color) {
        self.brush.color = color;
    }

    /// Set the brush radius, clamped to the configured limits
    pub fn set_size(&mut self, size: u32) {
        self.brush.size = self.limits.clamp(size) as f32;
    }

    /// Pick a palette color by index
    ///
    /// Returns false (brush unchanged) if the index is out of range.
    pub fn select_palette(&mut self, index: usize) -> bool {
        match self.palette.get(index) {
            Some(&color) => {
                self.brush.color = color;
                true
            }
            None => {
                debug!("select_palette: index {} out of range", index);
                false
            }
        }
    }

    /// Selectable frosting colors
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Increase the brush radius by one step
    pub fn grow_size(&mut self) {
        self.set_size(self.brush.size as u32 + 1);
    }

    /// Decrease the brush radius by one step
    pub fn shrink_size(&mut self) {
        self.set_size((self.brush.size as u32).saturating_sub(1));
    }

    /// Swap the cake colors; the eraser follows the new icing color
    pub fn set_cake_palette(&mut self, cake: CakePalette) {
        self.brush.erase_color = color_from_rgb8(cake.base);
        self.compositor.rebuild_base(&self.stack, cake);
    }

    /// Show a status message for the standard duration
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            remaining: TOAST_SECONDS,
        });
    }

    /// Current status message, if still visible
    pub fn toast(&self) -> Option<&str> {
        self.toast.as_ref().map(|t| t.message.as_str())
    }

    /// Advance frame time by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if let Some(toast) = self.toast.as_mut() {
            toast.remaining -= dt;
            if toast.remaining <= 0.0 {
                self.toast = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Modifiers, PointerButton};
    use glam::Vec2;
    use layercake_config::CanvasConfig;

    pub(crate) fn session() -> PaintSession {
        let config = DecoratorConfig::default();
        let stack = TierStack::build(&[220.0, 160.0, 110.0], config.canvas).unwrap();
        PaintSession::new(stack, &config)
    }

    #[test]
    fn test_pipeline_creation() {
        let session = session();
        assert_eq!(session.stack().len(), 3);
        assert_eq!(session.selection(), Some((2, Region::Top)));
        assert_eq!(session.brush().size, 14.0);
        assert_eq!(session.brush().tool, Tool::Freehand);
        assert_eq!(session.palette().len(), 9);
        assert!(!session.can_undo());
        assert!(session.toast().is_none());
    }

    #[test]
    fn test_pipeline_empty_stack_has_no_selection() {
        let stack = TierStack::from_geometries(Vec::new(), CanvasConfig::new(32, 32));
        let session = PaintSession::new(stack, &DecoratorConfig::default());
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_pipeline_size_limits() {
        let mut session = session();
        session.set_size(500);
        assert_eq!(session.brush().size, 64.0);
        session.grow_size();
        assert_eq!(session.brush().size, 64.0);

        session.set_size(0);
        assert_eq!(session.brush().size, 2.0);
        session.shrink_size();
        assert_eq!(session.brush().size, 2.0);
        session.grow_size();
        assert_eq!(session.brush().size, 3.0);
    }

    #[test]
    fn test_pipeline_palette_selection() {
        let mut session = session();
        assert!(session.select_palette(3));
        assert_eq!(session.brush().color, session.palette()[3]);

        let before = session.brush().color;
        assert!(!session.select_palette(42));
        assert_eq!(session.brush().color, before);
    }

    #[test]
    fn test_pipeline_tool_change_keeps_color() {
        let mut session = session();
        session.set_color([0.1, 0.2, 0.3, 1.0]);
        session.set_tool(Tool::Scatter);
        assert_eq!(session.brush().tool, Tool::Scatter);
        assert_eq!(session.brush().color, [0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn test_pipeline_toast_expires() {
        let mut session = session();
        session.show_toast("hello");
        session.tick(1.5);
        assert_eq!(session.toast(), Some("hello"));
        session.tick(0.6);
        assert_eq!(session.toast(), None);
    }

    #[test]
    fn test_pipeline_cake_palette_updates_eraser() {
        let mut session = session();
        session.set_cake_palette(CakePalette::PREBAKE);
        assert_eq!(session.brush().erase_color, color_from_rgb8(CakePalette::PREBAKE.base));
        assert_eq!(session.compositor.cake(), &CakePalette::PREBAKE);
    }

    #[test]
    fn test_pipeline_events_route_to_stroke() {
        let mut session = session();
        session.handle_event(PointerEvent::Down {
            pos: Vec2::new(450.0, 359.0),
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        });
        assert!(session.is_stroking());
        session.handle_event(PointerEvent::Move {
            pos: Vec2::new(470.0, 360.0),
        });
        session.handle_event(PointerEvent::Up);
        assert!(!session.is_stroking());
        assert!(session.can_undo());
        assert!(!session.stack().tier(2).unwrap().surface(Region::Top).is_blank());
    }
}
