//! Decoration scripts
//!
//! A script is a JSON document naming the tier radii and a list of actions
//! replayed, in order, through a [`PaintSession`]. It stands in for the
//! interactive input of a windowed front end:
//!
//! ```json
//! {
//!   "radii": [220, 160, 110],
//!   "actions": [
//!     { "tool": "fill" },
//!     { "palette": 2 },
//!     { "down": { "pos": [450, 359] } },
//!     "up",
//!     { "tool": "freehand" },
//!     { "down": { "pos": [300, 520], "button": "secondary" } },
//!     { "move": [340, 525] },
//!     "up"
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use glam::Vec2;
use layercake_config::Rgb8;
use layercake_painting::{
    Modifiers, PaintSession, PointerButton, PointerEvent, Tool, color_from_rgb8,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Radii of the three-tier cake used when a script names none
const DEFAULT_RADII: [f32; 3] = [220.0, 160.0, 110.0];

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One scripted user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Tool(Tool),
    Color(Rgb8),
    Palette(usize),
    Size(u32),
    Grow,
    Shrink,
    Undo,
    Redo,
    Down {
        pos: [f32; 2],
        #[serde(default)]
        button: PointerButton,
        /// Eyedropper
        #[serde(default)]
        alt: bool,
    },
    Move([f32; 2]),
    Up,
    FocusLost,
    /// Advance the clock by this many seconds
    Tick(f32),
    /// Flatten and save mid-script
    Export(PathBuf),
}

/// A full decoration session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Tier radii, bottom to top
    #[serde(default = "default_radii")]
    pub radii: Vec<f32>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

fn default_radii() -> Vec<f32> {
    DEFAULT_RADII.to_vec()
}

impl Default for Script {
    fn default() -> Self {
        Self {
            radii: default_radii(),
            actions: Vec::new(),
        }
    }
}

impl Script {
    pub fn from_json_str(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Feed every action to `session`, in order
    ///
    /// A failed mid-script export is logged and replay continues.
    pub fn replay(&self, session: &mut PaintSession) {
        for (index, action) in self.actions.iter().enumerate() {
            debug!("Script action {}: {:?}", index, action);
            apply(session, action);
        }
    }
}

fn apply(session: &mut PaintSession, action: &Action) {
    match action {
        Action::Tool(tool) => session.set_tool(*tool),
        Action::Color(rgb) => session.set_color(color_from_rgb8(*rgb)),
        Action::Palette(index) => {
            session.select_palette(*index);
        }
        Action::Size(size) => session.set_size(*size),
        Action::Grow => session.grow_size(),
        Action::Shrink => session.shrink_size(),
        Action::Undo => {
            session.undo();
        }
        Action::Redo => {
            session.redo();
        }
        Action::Down { pos, button, alt } => session.handle_event(PointerEvent::Down {
            pos: Vec2::from(*pos),
            button: *button,
            modifiers: Modifiers { alt: *alt },
        }),
        Action::Move(pos) => session.handle_event(PointerEvent::Move {
            pos: Vec2::from(*pos),
        }),
        Action::Up => session.handle_event(PointerEvent::Up),
        Action::FocusLost => session.handle_event(PointerEvent::FocusLost),
        Action::Tick(dt) => session.tick(*dt),
        Action::Export(path) => {
            if let Err(err) = session.export(path) {
                warn!("Script export to {} failed: {}", path.display(), err);
            }
        }
    }
}
