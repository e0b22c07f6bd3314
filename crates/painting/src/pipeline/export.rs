//! Flattened PNG export

use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::surface::PaintSurface;

use super::PaintSession;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("buffer of {len} bytes does not fit a {width}x{height} image")]
    SizeMismatch { width: u32, height: u32, len: usize },
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Encode a surface as an 8-bit RGBA PNG at `path`
pub fn export_png(surface: &PaintSurface, path: &Path) -> Result<(), ExportError> {
    let bytes = surface.to_rgba8();
    let len = bytes.len();
    let img = image::RgbaImage::from_raw(surface.width, surface.height, bytes).ok_or(
        ExportError::SizeMismatch {
            width: surface.width,
            height: surface.height,
            len,
        },
    )?;
    img.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

impl PaintSession {
    /// Flatten the cake and write it to `path` as a PNG
    ///
    /// The outcome is also posted as a toast. Paint state is untouched
    /// either way.
    pub fn export(&mut self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let flat = self.flatten();

        match export_png(&flat, path) {
            Ok(()) => {
                info!("Exported {}x{} image to {}", flat.width, flat.height, path.display());
                self.show_toast(format!("Saved {}", path.display()));
                Ok(())
            }
            Err(err) => {
                warn!("Export to {} failed: {}", path.display(), err);
                self.show_toast(format!("Save failed: {err}"));
                Err(err)
            }
        }
    }
}
