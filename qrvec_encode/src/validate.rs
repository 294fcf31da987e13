//! Checks on user-supplied image files, run when paths enter the builder.

use std::path::Path;

use crate::render::RenderError;

/// Probe an image file: it must exist, be a regular file, carry a supported extension, and (for
/// raster formats) have a readable header. Returns the pixel dimensions, or `None` for SVG,
/// whose dimensions are not probed.
pub fn probe_image(path: &Path) -> Result<Option<(u32, u32)>, RenderError> {
    if !path.exists() {
        return Err(RenderError::ImageNotFound(path.to_owned()));
    }
    if path.is_dir() {
        return Err(RenderError::ImageCorrupt(path.to_owned()));
    }
    match extension(path) {
        Some("svg") => Ok(None),
        Some("png" | "jpg" | "jpeg") => {
            // Reads only the header, not the pixel data.
            let dimensions = image::image_dimensions(path)
                .map_err(|_| RenderError::ImageCorrupt(path.to_owned()))?;
            Ok(Some(dimensions))
        }
        _ => Err(RenderError::UnsupportedFormat(
            path.display().to_string(),
        )),
    }
}

/// Validate an image path without keeping the dimensions.
pub fn validate_image(path: &Path) -> Result<(), RenderError> {
    probe_image(path).map(|_| ())
}

/// Source dimensions used to preserve a logo's aspect ratio. SVG logos count as square.
pub fn logo_dimensions(path: &Path) -> Result<(u32, u32), RenderError> {
    Ok(probe_image(path)?.unwrap_or((1, 1)))
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_file_is_not_found() {
        let path = PathBuf::from("/nonexistent/image.png");
        assert!(matches!(
            validate_image(&path),
            Err(RenderError::ImageNotFound(_))
        ));
    }

    #[test]
    fn directories_are_rejected() {
        let dir = std::env::temp_dir();
        assert!(matches!(
            validate_image(&dir),
            Err(RenderError::ImageCorrupt(_))
        ));
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let path = std::env::temp_dir().join("qrvec-validate-ext.gif");
        std::fs::write(&path, b"GIF89a").unwrap();
        assert!(matches!(
            validate_image(&path),
            Err(RenderError::UnsupportedFormat(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn garbage_png_is_corrupt() {
        let path = std::env::temp_dir().join("qrvec-validate-garbage.png");
        std::fs::write(&path, b"not a png at all").unwrap();
        assert!(matches!(
            validate_image(&path),
            Err(RenderError::ImageCorrupt(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn svg_paths_skip_probing() {
        let path = std::env::temp_dir().join("qrvec-validate-vector.svg");
        std::fs::write(&path, b"<svg xmlns='http://www.w3.org/2000/svg'/>").unwrap();
        assert!(validate_image(&path).is_ok());
        assert_eq!(logo_dimensions(&path).unwrap(), (1, 1));
        std::fs::remove_file(&path).ok();
    }
}
