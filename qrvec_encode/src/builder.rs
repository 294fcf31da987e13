//! Fluent, validating configuration surface over the encoder and the renderer.

use std::path::{Path, PathBuf};

use qrvec_core::Ecl;

use crate::encode::Encoder;
use crate::render::{RenderError, SvgRenderer};
use crate::style::{self, ColorSource, Logo, ModuleShape, QrStyle};
use crate::validate;

/// Builds a styled QR code out of chained setters.
///
/// Validation happens as the setters run: a bad color or a missing image file is recorded
/// immediately, and the first recorded problem is reported by the terminal operations [svg] and
/// [save_as]. Setters with invalid arguments leave the previous value in place.
///
/// # Example
/// ```no_run
/// use qrvec_core::Ecl;
/// use qrvec_encode::{ModuleShape, QrBuilder};
///
/// let svg = QrBuilder::new("https://example.com")
///     .error_correction(Ecl::Q)
///     .size(512)
///     .shape(ModuleShape::Rounded)
///     .foreground("#1a237e")
///     .svg()
///     .unwrap();
/// assert!(svg.starts_with("<svg"));
/// ```
///
/// [svg]: QrBuilder::svg
/// [save_as]: QrBuilder::save_as
pub struct QrBuilder {
    data: String,
    ecl: Ecl,
    style: QrStyle,
    errs: Vec<RenderError>,
}

impl QrBuilder {
    /// Start a builder for `data` with the default configuration: level M, 256 pixels, 4 quiet
    /// modules, black squares on white.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ecl: Ecl::M,
            style: QrStyle::default(),
            errs: Vec::new(),
        }
    }

    /// Set the output size in pixels.
    pub fn size(mut self, pixels: u32) -> Self {
        if pixels == 0 {
            self.errs.push(RenderError::InvalidSize);
        } else {
            self.style.size = pixels;
        }
        self
    }

    /// Set the margin around the symbol, in modules.
    pub fn quiet_zone(mut self, modules: u32) -> Self {
        self.style.quiet_zone = modules;
        self
    }

    /// Set the error correction level.
    pub fn error_correction(mut self, ecl: Ecl) -> Self {
        self.ecl = ecl;
        self
    }

    /// Set the module shape.
    pub fn shape(mut self, shape: ModuleShape) -> Self {
        self.style.shape = shape;
        self
    }

    /// Set a solid foreground color (`#RGB`, `#RRGGBB` or `#RRGGBBAA`).
    pub fn foreground(self, hex: impl Into<String>) -> Self {
        self.set_foreground(ColorSource::Solid(hex.into()))
    }

    /// Set a solid background color, or `transparent`.
    pub fn background(mut self, hex: impl Into<String>) -> Self {
        let source = ColorSource::Solid(hex.into());
        match source.validate() {
            Ok(()) => self.style.background = source,
            Err(err) => self.errs.push(err),
        }
        self
    }

    /// Paint the modules with a linear gradient along `angle` degrees.
    pub fn linear_gradient(self, angle: f64, stops: impl IntoIterator<Item = String>) -> Self {
        self.set_foreground(ColorSource::Linear {
            angle,
            stops: stops.into_iter().collect(),
        })
    }

    /// Paint the modules with a radial gradient centered at `(cx, cy)` (fractions in 0.0..=1.0).
    pub fn radial_gradient(
        self,
        cx: f64,
        cy: f64,
        stops: impl IntoIterator<Item = String>,
    ) -> Self {
        self.set_foreground(ColorSource::Radial {
            cx,
            cy,
            stops: stops.into_iter().collect(),
        })
    }

    fn set_foreground(mut self, source: ColorSource) -> Self {
        match source.validate() {
            Ok(()) => self.style.foreground = source,
            Err(err) => self.errs.push(err),
        }
        self
    }

    /// Use a custom image for every dark data module.
    pub fn module_image(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match validate::validate_image(&path) {
            Ok(()) => self.style.images.module = Some(path),
            Err(err) => self.errs.push(err),
        }
        self
    }

    /// Use a custom image for the three 7x7 finder patterns.
    pub fn finder_image(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match validate::validate_image(&path) {
            Ok(()) => self.style.images.finder = Some(path),
            Err(err) => self.errs.push(err),
        }
        self
    }

    /// Use a custom image for the 5x5 alignment patterns.
    pub fn alignment_image(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match validate::validate_image(&path) {
            Ok(()) => self.style.images.alignment = Some(path),
            Err(err) => self.errs.push(err),
        }
        self
    }

    /// Overlay a logo image from a file, centered on the symbol.
    pub fn logo(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match validate::validate_image(&path) {
            Ok(()) => self.logo_mut().path = Some(path),
            Err(err) => self.errs.push(err),
        }
        self
    }

    /// Overlay an in-memory image as the logo. Takes precedence over [logo](QrBuilder::logo).
    pub fn logo_image(mut self, image: image::DynamicImage) -> Self {
        self.logo_mut().image = Some(image);
        self
    }

    /// Set the logo width in pixels; the height follows the source aspect ratio unless set too.
    pub fn logo_width(mut self, pixels: u32) -> Self {
        self.logo_mut().width = Some(pixels);
        self
    }

    /// Set the logo height in pixels; the width follows the source aspect ratio unless set too.
    pub fn logo_height(mut self, pixels: u32) -> Self {
        self.logo_mut().height = Some(pixels);
        self
    }

    /// Set both logo dimensions in pixels.
    pub fn logo_dimensions(self, width: u32, height: u32) -> Self {
        self.logo_width(width).logo_height(height)
    }

    /// Set the backdrop color behind the logo; `transparent` disables the backdrop.
    pub fn logo_background(mut self, color: impl Into<String>) -> Self {
        let color = color.into();
        match style::validate_color(&color) {
            Ok(()) => self.logo_mut().background = Some(color),
            Err(err) => self.errs.push(err),
        }
        self
    }

    fn logo_mut(&mut self) -> &mut Logo {
        self.style.logo.get_or_insert_with(Logo::default)
    }

    /// The problems recorded by the setters so far, in call order.
    pub fn validate(&self) -> &[RenderError] {
        &self.errs
    }

    /// Peek at the assembled style, for advanced configuration.
    pub fn style(&self) -> &QrStyle {
        &self.style
    }

    /// Encode and render, consuming the builder. The first recorded validation problem wins over
    /// any encoding work.
    pub fn svg(mut self) -> Result<String, RenderError> {
        if !self.errs.is_empty() {
            return Err(self.errs.remove(0));
        }
        let qr = Encoder::new().with_ecl(self.ecl).encode(&self.data)?;
        SvgRenderer::new(self.style).render(&qr)
    }

    /// Encode, render and write to `path`. Only `.svg` targets are supported; a `.png` target
    /// fails before any encoding work.
    pub fn save_as(self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            if ext.eq_ignore_ascii_case("png") {
                return Err(RenderError::UnsupportedFormat("png".to_owned()));
            }
        }
        let svg = self.svg()?;
        std::fs::write(path, svg)?;
        Ok(())
    }
}
