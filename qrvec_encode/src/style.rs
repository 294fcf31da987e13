//! Rendering configuration: colors, module shapes, custom images and the logo overlay.

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::render::RenderError;

/// What fills the dark modules (or the background): a solid color or a gradient. The set is
/// closed, so an enum with a match per renderer beats an open trait.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSource {
    /// A single hex color.
    Solid(String),
    /// Linear gradient along `angle` degrees (0 = right, 90 = down).
    Linear { angle: f64, stops: Vec<String> },
    /// Radial gradient centered at `(cx, cy)`, both as fractions in 0.0..=1.0.
    Radial { cx: f64, cy: f64, stops: Vec<String> },
}

impl ColorSource {
    /// The `<defs>` entry this source needs, if any. Gradients refer back to it through `id`.
    pub fn svg_defs(&self, id: &str) -> Option<String> {
        match self {
            ColorSource::Solid(_) => None,
            ColorSource::Linear { angle, stops } => {
                let rad = angle.to_radians();
                let (x1, y1) = (50.0 - 50.0 * rad.cos(), 50.0 - 50.0 * rad.sin());
                let (x2, y2) = (50.0 + 50.0 * rad.cos(), 50.0 + 50.0 * rad.sin());
                let mut defs = format!(
                    r#"<linearGradient id="{id}" x1="{x1:.0}%" y1="{y1:.0}%" x2="{x2:.0}%" y2="{y2:.0}%">"#
                );
                write_stops(&mut defs, stops);
                defs.push_str("</linearGradient>");
                Some(defs)
            }
            ColorSource::Radial { cx, cy, stops } => {
                let mut defs = format!(
                    r#"<radialGradient id="{id}" cx="{:.0}%" cy="{:.0}%" r="70%">"#,
                    cx * 100.0,
                    cy * 100.0,
                );
                write_stops(&mut defs, stops);
                defs.push_str("</radialGradient>");
                Some(defs)
            }
        }
    }

    /// The `fill` attribute value for this source.
    pub fn svg_fill(&self, id: &str) -> String {
        match self {
            ColorSource::Solid(hex) => hex.clone(),
            ColorSource::Linear { .. } | ColorSource::Radial { .. } => format!("url(#{id})"),
        }
    }

    /// Check every color of the source, accumulating nothing: the first bad one errors out.
    pub fn validate(&self) -> Result<(), RenderError> {
        match self {
            ColorSource::Solid(hex) => validate_color(hex),
            ColorSource::Linear { stops, .. } | ColorSource::Radial { stops, .. } => {
                stops.iter().try_for_each(|stop| validate_color(stop))
            }
        }
    }
}

fn write_stops(out: &mut String, stops: &[String]) {
    let last = stops.len().saturating_sub(1).max(1) as f64;
    for (i, stop) in stops.iter().enumerate() {
        let offset = i as f64 / last * 100.0;
        let _ = write!(out, r#"<stop offset="{offset:.0}%" stop-color="{stop}"/>"#);
    }
}

/// Accept `#RGB`, `#RRGGBB`, `#RRGGBBAA` or the keyword `transparent`.
pub fn validate_color(color: &str) -> Result<(), RenderError> {
    if color == "transparent" {
        return Ok(());
    }
    let digits = match color.strip_prefix('#') {
        Some(digits) => digits,
        None => return Err(RenderError::InvalidHexColor(color.to_owned())),
    };
    let valid = matches!(digits.len(), 3 | 6 | 8)
        && digits.bytes().all(|b| b.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(RenderError::InvalidHexColor(color.to_owned()))
    }
}

/// Shape used to draw a single dark module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleShape {
    #[default]
    Square,
    Circle,
    Rounded,
    Diamond,
    Dot,
    Star,
    Heart,
}

impl ModuleShape {
    /// Look a shape up by its name.
    /// # Example
    /// ```
    /// use qrvec_encode::ModuleShape;
    /// assert_eq!(ModuleShape::from_name("circle"), Some(ModuleShape::Circle));
    /// assert_eq!(ModuleShape::from_name("blob"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let shape = match name {
            "square" => Self::Square,
            "circle" => Self::Circle,
            "rounded" => Self::Rounded,
            "diamond" => Self::Diamond,
            "dot" => Self::Dot,
            "star" => Self::Star,
            "heart" => Self::Heart,
            _ => return None,
        };
        Some(shape)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Rounded => "rounded",
            Self::Diamond => "diamond",
            Self::Dot => "dot",
            Self::Star => "star",
            Self::Heart => "heart",
        }
    }

    /// Append one closed subpath drawing this shape inside the cell at `(x, y)` with edge `s`.
    pub fn write_path(self, out: &mut String, x: f64, y: f64, s: f64) {
        let w = |out: &mut String, text: std::fmt::Arguments| {
            let _ = out.write_fmt(text);
        };
        match self {
            Self::Square => w(out, format_args!("M{x:.2} {y:.2}h{s:.2}v{s:.2}h-{s:.2}z")),
            Self::Circle => {
                let r = s / 2.0;
                let cx = x + r;
                w(
                    out,
                    format_args!(
                        "M{cx:.2} {y:.2}A{r:.2} {r:.2} 0 0 1 {cx:.2} {:.2}A{r:.2} {r:.2} 0 0 1 {cx:.2} {y:.2}z",
                        y + s
                    ),
                );
            }
            Self::Rounded => {
                let r = 0.3 * s;
                let edge = s - 2.0 * r;
                w(
                    out,
                    format_args!(
                        "M{:.2} {y:.2}h{edge:.2}q{r:.2} 0 {r:.2} {r:.2}v{edge:.2}q0 {r:.2} -{r:.2} {r:.2}h-{edge:.2}q-{r:.2} 0 -{r:.2} -{r:.2}v-{edge:.2}q0 -{r:.2} {r:.2} -{r:.2}z",
                        x + r
                    ),
                );
            }
            Self::Diamond => w(
                out,
                format_args!(
                    "M{:.2} {y:.2}L{:.2} {:.2}L{:.2} {:.2}L{x:.2} {:.2}z",
                    x + s / 2.0,
                    x + s,
                    y + s / 2.0,
                    x + s / 2.0,
                    y + s,
                    y + s / 2.0
                ),
            ),
            Self::Dot => {
                let r = 0.35 * s;
                let cx = x + s / 2.0;
                let top = y + 0.15 * s;
                w(
                    out,
                    format_args!(
                        "M{cx:.2} {top:.2}A{r:.2} {r:.2} 0 0 1 {cx:.2} {:.2}A{r:.2} {r:.2} 0 0 1 {cx:.2} {top:.2}z",
                        top + 2.0 * r
                    ),
                );
            }
            Self::Star => {
                let p = |fx: f64, fy: f64| (x + fx * s, y + fy * s);
                let points = [
                    p(0.5, 0.0),
                    p(0.6, 0.4),
                    p(1.0, 0.5),
                    p(0.6, 0.6),
                    p(0.5, 1.0),
                    p(0.4, 0.6),
                    p(0.0, 0.5),
                    p(0.4, 0.4),
                ];
                w(out, format_args!("M{:.2} {:.2}", points[0].0, points[0].1));
                for (px, py) in &points[1..] {
                    w(out, format_args!("L{px:.2} {py:.2}"));
                }
                out.push('z');
            }
            Self::Heart => {
                let c = |x1: f64, y1: f64, x2: f64, y2: f64, ex: f64, ey: f64| {
                    format!(
                        "C{:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                        x + x1 * s,
                        y + y1 * s,
                        x + x2 * s,
                        y + y2 * s,
                        x + ex * s,
                        y + ey * s
                    )
                };
                w(out, format_args!("M{:.2} {:.2}", x + 0.5 * s, y + 0.2 * s));
                out.push_str(&c(0.5, 0.1, 0.4, 0.0, 0.25, 0.0));
                out.push_str(&c(0.1, 0.0, 0.0, 0.15, 0.0, 0.3));
                out.push_str(&c(0.0, 0.55, 0.5, 1.0, 0.5, 1.0));
                out.push_str(&c(0.5, 1.0, 1.0, 0.55, 1.0, 0.3));
                out.push_str(&c(1.0, 0.15, 0.9, 0.0, 0.75, 0.0));
                out.push_str(&c(0.6, 0.0, 0.5, 0.1, 0.5, 0.2));
                out.push('z');
            }
        }
    }
}

/// Custom images stamped instead of the built-in geometry.
#[derive(Debug, Clone, Default)]
pub struct CustomImages {
    /// Image drawn over every dark data module.
    pub module: Option<PathBuf>,
    /// Image covering each full 7x7 finder pattern, mirrored per corner.
    pub finder: Option<PathBuf>,
    /// Image covering each full 5x5 alignment pattern.
    pub alignment: Option<PathBuf>,
}

impl CustomImages {
    pub fn is_empty(&self) -> bool {
        self.module.is_none() && self.finder.is_none() && self.alignment.is_none()
    }
}

/// Logo overlaid on the center of the symbol.
#[derive(Debug, Clone, Default)]
pub struct Logo {
    /// Path to the logo image; ignored when `image` is set.
    pub path: Option<PathBuf>,
    /// In-memory logo, re-encoded as PNG for embedding.
    pub image: Option<image::DynamicImage>,
    /// Pixel width; `None` auto-sizes, preserving the aspect ratio.
    pub width: Option<u32>,
    /// Pixel height; `None` auto-sizes, preserving the aspect ratio.
    pub height: Option<u32>,
    /// Backdrop color behind the logo; white when unset, `transparent` to disable.
    pub background: Option<String>,
}

impl Logo {
    pub fn is_set(&self) -> bool {
        self.path.is_some() || self.image.is_some()
    }
}

/// Everything the renderer needs to know besides the matrix itself.
#[derive(Debug, Clone)]
pub struct QrStyle {
    /// Output edge length in pixels.
    pub size: u32,
    /// Margin around the symbol, in modules.
    pub quiet_zone: u32,
    pub background: ColorSource,
    pub foreground: ColorSource,
    pub shape: ModuleShape,
    pub images: CustomImages,
    pub logo: Option<Logo>,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            size: 256,
            quiet_zone: 4,
            background: ColorSource::Solid("#FFFFFF".to_owned()),
            foreground: ColorSource::Solid("#000000".to_owned()),
            shape: ModuleShape::Square,
            images: CustomImages::default(),
            logo: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_validate() {
        for good in ["#000", "#3498db", "#FFFFFF80", "transparent"] {
            assert!(validate_color(good).is_ok(), "{good}");
        }
        for bad in ["000000", "#12345", "#ggg", "", "#"] {
            assert!(
                matches!(validate_color(bad), Err(RenderError::InvalidHexColor(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn solid_fill_is_the_color_itself() {
        let solid = ColorSource::Solid("#123456".to_owned());
        assert_eq!(solid.svg_defs("fg"), None);
        assert_eq!(solid.svg_fill("fg"), "#123456");
    }

    #[test]
    fn gradients_emit_defs_and_reference_them() {
        let gradient = ColorSource::Linear {
            angle: 0.0,
            stops: vec!["#ff0000".to_owned(), "#0000ff".to_owned()],
        };
        let defs = gradient.svg_defs("fg").unwrap();
        assert!(defs.starts_with("<linearGradient id=\"fg\""));
        assert!(defs.contains(r##"<stop offset="0%" stop-color="#ff0000"/>"##));
        assert!(defs.contains(r##"<stop offset="100%" stop-color="#0000ff"/>"##));
        assert_eq!(gradient.svg_fill("fg"), "url(#fg)");

        let radial = ColorSource::Radial {
            cx: 0.5,
            cy: 0.5,
            stops: vec!["#000000".to_owned(), "#ffffff".to_owned()],
        };
        assert!(radial.svg_defs("fg").unwrap().contains("cx=\"50%\""));
    }

    #[test]
    fn shape_names_roundtrip() {
        for shape in [
            ModuleShape::Square,
            ModuleShape::Circle,
            ModuleShape::Rounded,
            ModuleShape::Diamond,
            ModuleShape::Dot,
            ModuleShape::Star,
            ModuleShape::Heart,
        ] {
            assert_eq!(ModuleShape::from_name(shape.name()), Some(shape));
        }
    }

    #[test]
    fn square_path_is_a_unit_cell() {
        let mut path = String::new();
        ModuleShape::Square.write_path(&mut path, 4.0, 8.0, 2.0);
        assert_eq!(path, "M4.00 8.00h2.00v2.00h-2.00z");
    }

    #[test]
    fn every_shape_emits_a_closed_subpath() {
        for shape in [
            ModuleShape::Square,
            ModuleShape::Circle,
            ModuleShape::Rounded,
            ModuleShape::Diamond,
            ModuleShape::Dot,
            ModuleShape::Star,
            ModuleShape::Heart,
        ] {
            let mut path = String::new();
            shape.write_path(&mut path, 0.0, 0.0, 1.0);
            assert!(path.starts_with('M'), "{path}");
            assert!(path.ends_with('z'), "{path}");
        }
    }
}
