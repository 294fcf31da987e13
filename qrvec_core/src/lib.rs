//! Data model of a QR code symbol: the module [Matrix], the [Meta] parameters that describe it,
//! and the facts the standard fixes for every version and error correction level.
//!
//! This crate holds no pipeline logic; encoding lives in `qrvec_encode`.

mod capacity;
mod data;
mod matrix;
mod meta;
pub mod qrstandard;

pub use capacity::{ecc_info, BlockGroup, EccInfo};
pub use data::{Mode, Segment};
pub use matrix::{Matrix, Module, ModuleKind};
pub use meta::{Ecl, Mask, MaskTable, Meta, Version};

/// QR code.
pub struct QrCode {
    matrix: Matrix,
    meta: Meta,
}

impl QrCode {
    /// Construct a new [QrCode]. Returns `None` if the matrix is incompatible with `meta` (e.g.:
    /// the [Version] and, thus, the matrix size).
    pub fn new(matrix: Matrix, meta: Meta) -> Option<Self> {
        if matrix.size() == meta.symbol_size() {
            Some(Self { matrix, meta })
        } else {
            None
        }
    }

    /// Get the underlying matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Get the metadata.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }
}

impl AsRef<Matrix> for QrCode {
    fn as_ref(&self) -> &Matrix {
        self.matrix()
    }
}

impl From<QrCode> for Matrix {
    fn from(value: QrCode) -> Self {
        value.matrix
    }
}
