//! Projection of a painted matrix to SVG markup.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::GenericImageView;

use qrvec_core::qrstandard;
use qrvec_core::{ModuleKind, QrCode};

use crate::encode::EncodeError;
use crate::style::{Logo, QrStyle};
use crate::validate;

/// Failure modes of configuration, validation and rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid hex color {0:?}")]
    InvalidHexColor(String),
    #[error("image not found: {0}")]
    ImageNotFound(PathBuf),
    #[error("cannot read image: {0}")]
    ImageCorrupt(PathBuf),
    #[error("unsupported format: {0} (supported: svg output, png/jpg/jpeg/svg images)")]
    UnsupportedFormat(String),
    #[error("{width}x{height} pixel logo does not fit a {size} pixel symbol")]
    LogoTooLarge { width: u32, height: u32, size: u32 },
    #[error("output size must be positive")]
    InvalidSize,
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fraction bounds of the symbol edge a logo may occupy.
const LOGO_MIN_FRACTION: f64 = 0.15;
const LOGO_MAX_FRACTION: f64 = 0.30;

/// Identifier of the foreground gradient definition, when one exists.
const FOREGROUND_ID: &str = "module-fill";

/// Renders a [QrCode] into SVG text according to a [QrStyle].
pub struct SvgRenderer {
    style: QrStyle,
}

impl SvgRenderer {
    /// Construct a renderer for the given style.
    pub fn new(style: QrStyle) -> Self {
        Self { style }
    }

    /// Render `qr` into a complete SVG document.
    pub fn render(&self, qr: &QrCode) -> Result<String, RenderError> {
        if self.style.size == 0 {
            return Err(RenderError::InvalidSize);
        }
        if self.style.images.is_empty() {
            self.render_with_shapes(qr)
        } else {
            self.render_with_images(qr)
        }
    }

    /// Standard path-based rendering: one `<path>` holding every dark module.
    fn render_with_shapes(&self, qr: &QrCode) -> Result<String, RenderError> {
        let matrix = qr.matrix();
        let size = self.style.size;
        let quiet = self.style.quiet_zone as usize;
        let total_modules = matrix.size() + 2 * quiet;
        let module_size = size as f64 / total_modules as f64;
        let logo_zone = self.logo_zone(total_modules, module_size)?;

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#
        );
        svg.push('\n');
        if let Some(defs) = self.style.foreground.svg_defs(FOREGROUND_ID) {
            let _ = writeln!(svg, "<defs>{defs}</defs>");
        }
        let _ = writeln!(
            svg,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            self.style.background.svg_fill("")
        );

        let _ = write!(
            svg,
            r#"<path fill="{}" d=""#,
            self.style.foreground.svg_fill(FOREGROUND_ID)
        );
        for y in 0..matrix.size() {
            for x in 0..matrix.size() {
                if in_zone(&logo_zone, x, y) || !matrix[(x, y)].dark {
                    continue;
                }
                let px = (quiet + x) as f64 * module_size;
                let py = (quiet + y) as f64 * module_size;
                self.style.shape.write_path(&mut svg, px, py, module_size);
            }
        }
        svg.push_str("\"/>\n");

        if let Some(logo) = &self.style.logo {
            if logo.is_set() {
                svg.push_str(&self.logo_svg(logo)?);
            }
        }
        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Image-based rendering: finder and alignment patterns become whole embedded images, data
    /// modules become per-cell images (or fall back to the configured shape).
    fn render_with_images(&self, qr: &QrCode) -> Result<String, RenderError> {
        let matrix = qr.matrix();
        let size = self.style.size;
        let quiet = self.style.quiet_zone as usize;
        let total_modules = matrix.size() + 2 * quiet;
        let module_size = size as f64 / total_modules as f64;
        let logo_zone = self.logo_zone(total_modules, module_size)?;

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#
        );
        svg.push('\n');
        if let Some(defs) = self.style.foreground.svg_defs(FOREGROUND_ID) {
            let _ = writeln!(svg, "<defs>{defs}</defs>");
        }
        let _ = writeln!(
            svg,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            self.style.background.svg_fill("")
        );

        let module_uri = self.style.images.module.as_deref().map(file_data_uri);
        let module_uri = module_uri.transpose()?;
        let finder_uri = self.style.images.finder.as_deref().map(file_data_uri);
        let finder_uri = finder_uri.transpose()?;
        let alignment_uri = self.style.images.alignment.as_deref().map(file_data_uri);
        let alignment_uri = alignment_uri.transpose()?;

        if let Some(uri) = &finder_uri {
            let span = 7.0 * module_size;
            let corner = |m: usize| (quiet + m) as f64 * module_size;
            let (left, top, far) = (corner(0), corner(0), corner(matrix.size() - 7));
            let _ = writeln!(
                svg,
                r#"<image x="{left:.2}" y="{top:.2}" width="{span:.2}" height="{span:.2}" href="{uri}"/>"#
            );
            // The other corners mirror the image so the asymmetries face inward.
            let _ = writeln!(
                svg,
                r#"<image x="{far:.2}" y="{top:.2}" width="{span:.2}" height="{span:.2}" href="{uri}" transform="scale(-1,1) translate({:.2},0)"/>"#,
                -(2.0 * far + span)
            );
            let _ = writeln!(
                svg,
                r#"<image x="{left:.2}" y="{far:.2}" width="{span:.2}" height="{span:.2}" href="{uri}" transform="scale(1,-1) translate(0,{:.2})"/>"#,
                -(2.0 * far + span)
            );
        }

        if let Some(uri) = &alignment_uri {
            let span = 5.0 * module_size;
            let positions = qrstandard::alignment_positions(qr.meta().version);
            for &cy in &positions {
                for &cx in &positions {
                    // Positions swallowed by a finder were never stamped.
                    if matrix[(cx, cy)].kind != ModuleKind::Alignment {
                        continue;
                    }
                    let px = (quiet + cx - 2) as f64 * module_size;
                    let py = (quiet + cy - 2) as f64 * module_size;
                    let _ = writeln!(
                        svg,
                        r#"<image x="{px:.2}" y="{py:.2}" width="{span:.2}" height="{span:.2}" href="{uri}"/>"#
                    );
                }
            }
        }

        let mut shape_path = String::new();
        for y in 0..matrix.size() {
            for x in 0..matrix.size() {
                let module = matrix[(x, y)];
                if in_zone(&logo_zone, x, y) || !module.dark {
                    continue;
                }
                let covered_by_finder = finder_uri.is_some()
                    && matches!(
                        module.kind,
                        ModuleKind::Finder | ModuleKind::FinderSeparator
                    );
                let covered_by_alignment =
                    alignment_uri.is_some() && module.kind == ModuleKind::Alignment;
                if covered_by_finder || covered_by_alignment {
                    continue;
                }
                let px = (quiet + x) as f64 * module_size;
                let py = (quiet + y) as f64 * module_size;
                match &module_uri {
                    Some(uri) => {
                        let _ = writeln!(
                            svg,
                            r#"<image x="{px:.2}" y="{py:.2}" width="{module_size:.2}" height="{module_size:.2}" href="{uri}"/>"#
                        );
                    }
                    // Modules without a custom image keep the plain geometry.
                    None => self.style.shape.write_path(&mut shape_path, px, py, module_size),
                }
            }
        }
        if !shape_path.is_empty() {
            let _ = writeln!(
                svg,
                r#"<path fill="{}" d="{shape_path}"/>"#,
                self.style.foreground.svg_fill(FOREGROUND_ID)
            );
        }

        if let Some(logo) = &self.style.logo {
            if logo.is_set() {
                svg.push_str(&self.logo_svg(logo)?);
            }
        }
        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Rectangle of matrix cells hidden behind the logo, or `None` without one.
    fn logo_zone(
        &self,
        total_modules: usize,
        module_size: f64,
    ) -> Result<Option<(i64, i64, i64, i64)>, RenderError> {
        let logo = match &self.style.logo {
            Some(logo) if logo.is_set() => logo,
            _ => return Ok(None),
        };
        let (width, height, padding) = self.logo_layout(logo)?;
        let half_x = ((width + 2.0 * padding) / module_size / 2.0) as i64 + 1;
        let half_y = ((height + 2.0 * padding) / module_size / 2.0) as i64 + 1;
        let center = (total_modules / 2) as i64 - self.style.quiet_zone as i64;
        Ok(Some((
            center - half_x,
            center - half_y,
            center + half_x,
            center + half_y,
        )))
    }

    /// Pixel width, height and padding of the logo. Explicit dimensions win; otherwise the
    /// source aspect ratio is preserved, targeting the middle of the allowed size band.
    fn logo_layout(&self, logo: &Logo) -> Result<(f64, f64, f64), RenderError> {
        let qr_size = self.style.size as f64;
        let (width, height) = match (logo.width, logo.height) {
            (Some(w), Some(h)) => (w as f64, h as f64),
            (Some(w), None) => {
                let (sw, sh) = logo_source_dimensions(logo)?;
                (w as f64, w as f64 * sh as f64 / sw as f64)
            }
            (None, Some(h)) => {
                let (sw, sh) = logo_source_dimensions(logo)?;
                (h as f64 * sw as f64 / sh as f64, h as f64)
            }
            (None, None) => {
                let (sw, sh) = logo_source_dimensions(logo)?;
                let target = qr_size * (LOGO_MIN_FRACTION + LOGO_MAX_FRACTION) / 2.0;
                let aspect = sw as f64 / sh as f64;
                if aspect >= 1.0 {
                    (target, target / aspect)
                } else {
                    (target * aspect, target)
                }
            }
        };
        if width.max(height) > qr_size * LOGO_MAX_FRACTION {
            return Err(RenderError::LogoTooLarge {
                width: width as u32,
                height: height as u32,
                size: self.style.size,
            });
        }
        let padding = width.max(height) * 0.1;
        Ok((width, height, padding))
    }

    /// The logo overlay: an optional backdrop rectangle plus the embedded image, centered.
    fn logo_svg(&self, logo: &Logo) -> Result<String, RenderError> {
        let (width, height, padding) = self.logo_layout(logo)?;
        let qr_size = self.style.size as f64;
        let x = (qr_size - width) / 2.0;
        let y = (qr_size - height) / 2.0;
        let uri = match (&logo.image, &logo.path) {
            (Some(img), _) => memory_data_uri(img)?,
            (None, Some(path)) => file_data_uri(path)?,
            (None, None) => unreachable!("logo_svg is only called when a logo is set"),
        };

        let mut svg = String::new();
        let background = logo.background.as_deref().unwrap_or("#FFFFFF");
        if background != "transparent" {
            let _ = writeln!(
                svg,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{background}" rx="{:.2}"/>"#,
                x - padding,
                y - padding,
                width + 2.0 * padding,
                height + 2.0 * padding,
                padding / 2.0
            );
        }
        let _ = writeln!(
            svg,
            r#"<image x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" href="{uri}"/>"#
        );
        Ok(svg)
    }
}

fn in_zone(zone: &Option<(i64, i64, i64, i64)>, x: usize, y: usize) -> bool {
    match zone {
        Some((min_x, min_y, max_x, max_y)) => {
            let (x, y) = (x as i64, y as i64);
            x >= *min_x && x <= *max_x && y >= *min_y && y <= *max_y
        }
        None => false,
    }
}

fn logo_source_dimensions(logo: &Logo) -> Result<(u32, u32), RenderError> {
    if let Some(image) = &logo.image {
        return Ok(image.dimensions());
    }
    let path = logo
        .path
        .as_deref()
        .unwrap_or_else(|| unreachable!("logo source queried without a logo"));
    validate::logo_dimensions(path)
}

/// Embed a file as a base64 data URI, with the MIME type taken from the extension.
fn file_data_uri(path: &Path) -> Result<String, RenderError> {
    let bytes = std::fs::read(path)?;
    let mime = match path.extension().and_then(|ext| ext.to_str()) {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    };
    Ok(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
}

/// Re-encode an in-memory image as PNG and embed it.
fn memory_data_uri(image: &image::DynamicImage) -> Result<String, RenderError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| RenderError::Io(std::io::Error::other(e)))?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
}
