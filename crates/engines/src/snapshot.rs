//! PNG output of a [`Raster`].
//!
//! Feature-gated behind `png` (default on) so hosts that only need the
//! registry and frame loop do not pull in the `image` crate.

use canvas_lab_core::{EngineError, Raster, Surface};
use std::path::Path;

/// Writes a raster as an RGBA PNG.
///
/// Returns `EngineError::InvalidDimensions` if the raster dimensions overflow
/// `u32`, or `EngineError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), EngineError> {
    let w = u32::try_from(raster.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, raster.pixels().to_vec())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))?;
    log::debug!("wrote {}x{} snapshot to {}", w, h, path.display());
    Ok(())
}
