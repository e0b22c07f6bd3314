//! Layercake - headless cake decorator
//!
//! Builds a tier stack, replays a decoration script through a painting
//! session and writes the flattened cake to a PNG.
//!
//! Usage: `layercake [script.json]`
//! - `LAYERCAKE_CONFIG`: decorator config JSON (optional)
//! - `LAYERCAKE_OUT`: output image path (default `cake.png`)
//! - `RUST_LOG`: log filter (default `info`)

use std::path::Path;

use layercake_painting::{ExportError, PaintSession, TierStack};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod script;

use config::AppConfig;
use script::Script;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = AppConfig::from_env();
    let decorator = app.decorator()?;

    let script = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading decoration script {}", path);
            Script::load(&path)?
        }
        None => {
            info!("No script given, exporting the undecorated cake");
            Script::default()
        }
    };

    let stack = TierStack::build(&script.radii, decorator.canvas)?;
    info!(
        "Starting Layercake with {} tiers on a {}x{} canvas",
        stack.len(),
        decorator.canvas.width,
        decorator.canvas.height
    );

    let mut session = PaintSession::new(stack, &decorator);
    script.replay(&mut session);
    // A stroke left open by the script is closed like a lost focus
    session.focus_lost();

    export_and_report(&mut session, &app.output)?;
    Ok(())
}

/// Export the flattened cake, logging the resulting toast even on failure
fn export_and_report(session: &mut PaintSession, output: &Path) -> Result<(), ExportError> {
    let result = session.export(output);
    if let Some(message) = session.toast() {
        if result.is_ok() {
            info!("{}", message);
        } else {
            warn!("{}", message);
        }
    }
    result
}
