//! QR code generation with SVG output.
//!
//! The pipeline is a pure function from input bytes and an error correction level to a painted
//! module matrix: mode analysis, version selection, bit stream assembly, Reed-Solomon error
//! correction, block interleaving, pattern placement, mask selection and the BCH-protected
//! information words. Around it live the collaborators: an SVG renderer with shapes, gradients,
//! custom images and logo overlays, and a fluent [QrBuilder] tying both together.
//!
//! ```
//! use qrvec_core::Ecl;
//! use qrvec_encode::QrBuilder;
//!
//! let svg = QrBuilder::new("https://example.com")
//!     .error_correction(Ecl::Q)
//!     .svg()
//!     .unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```

mod bits;
mod blocks;
mod builder;
mod encode;
pub mod gf256;
mod paint;
mod reed_solomon;
mod render;
mod style;
mod validate;

pub use bits::BitStream;
pub use builder::QrBuilder;
pub use encode::{encode, EncodeError, Encoder};
pub use paint::{apply_mask, penalty_score};
pub use render::{RenderError, SvgRenderer};
pub use style::{ColorSource, CustomImages, Logo, ModuleShape, QrStyle};
