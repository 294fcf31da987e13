use std::ops::{Bound, RangeBounds, RangeInclusive};

use qrvec_core::qrstandard;
use qrvec_core::{ecc_info, Ecl, Mask, MaskTable, Meta, Mode, QrCode, Segment, Version};

use crate::bits::BitStream;
use crate::blocks;
use crate::paint::Painter;

/// Failure modes of the encoding pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// No allowed version has capacity for the input at the requested error correction level.
    #[error("data is too long for any allowed version at the requested error correction level")]
    DataTooLong,
    /// The input is empty; an empty symbol carries no information and is rejected.
    #[error("input data is empty")]
    EmptyInput,
    /// A byte outside the 45-character alphabet reached the alphanumeric encoder. Unreachable
    /// when the mode comes from analysis, kept as a guard.
    #[error("byte {0:#04x} cannot be encoded in alphanumeric mode")]
    InvalidAlphanumericChar(u8),
    /// A division by zero inside GF(256); never happens while encoding and indicates a bug.
    #[error("division by zero in GF(256)")]
    DivByZero,
}

/// Encode `data` at the given error correction level, using the smallest version that fits.
///
/// # Example
/// ```
/// use qrvec_core::Ecl;
/// let qr = qrvec_encode::encode("HELLO WORLD", Ecl::M).unwrap();
/// assert_eq!(qr.matrix().size(), 21);
/// ```
pub fn encode<T: AsRef<[u8]>>(data: T, ecl: Ecl) -> Result<QrCode, EncodeError> {
    Encoder::new().with_ecl(ecl).encode(data)
}

/// Encoder for a QR code.
pub struct Encoder {
    constraints: Constraints,
}

impl Encoder {
    /// Construct a new, unconstrained encoder.
    pub fn new() -> Self {
        Self {
            constraints: Default::default(),
        }
    }

    /// Encode `data`.
    ///
    /// The mode is the most compact one able to represent every input byte; the version is the
    /// smallest allowed one whose capacity at the low end of the allowed ECL band admits the
    /// encoded payload. When the band allows it, the level is then raised as far as the chosen
    /// version permits. The mask is the allowed candidate with the lowest penalty score.
    pub fn encode<T: AsRef<[u8]>>(&self, data: T) -> Result<QrCode, EncodeError> {
        let data = data.as_ref();
        if data.is_empty() {
            return Err(EncodeError::EmptyInput);
        }
        let segment = Segment::new(Mode::analyze(data), data.len());
        let (version, ecl) = self.choose_parameters(&segment)?;
        let info = ecc_info(version, ecl);
        let stream = build_stream(data, &segment, version, info.data_capacity())?;
        let codewords = blocks::split_and_interleave(&stream.into_bytes(), info);
        let (matrix, mask) = Painter::new(version, ecl).paint(&codewords, self.allowed_masks());
        let meta = Meta { version, ecl, mask };
        Ok(QrCode::new(matrix, meta).expect("the painter produces a matrix of the meta's size"))
    }

    /// Pick the smallest allowed version fitting `segment`, then the highest allowed ECL still
    /// fitting that version.
    fn choose_parameters(&self, segment: &Segment) -> Result<(Version, Ecl), EncodeError> {
        let base_ecl = *self.constraints.ecl.start();
        let mut version = *self.constraints.version.start();
        let version = loop {
            let needed = qrstandard::segment_encoding_len(segment, version);
            if needed <= ecc_info(version, base_ecl).data_capacity() * 8 {
                break version;
            }
            match version.incr() {
                Some(next) if next <= *self.constraints.version.end() => version = next,
                _ => return Err(EncodeError::DataTooLong),
            }
        };
        let needed = qrstandard::segment_encoding_len(segment, version);
        let mut ecl = base_ecl;
        while let Some(next) = ecl.incr() {
            if next > *self.constraints.ecl.end()
                || needed > ecc_info(version, next).data_capacity() * 8
            {
                break;
            }
            ecl = next;
        }
        Ok((version, ecl))
    }

    /// Transform a range of any type to an inclusive range, given the absolute minimum and
    /// maximum values as well as functions to increment and decrement values.
    fn any_range_to_inclusive<T, R, I, D>(
        range: R,
        abs_min: T,
        abs_max: T,
        incr: I,
        decr: D,
    ) -> RangeInclusive<T>
    where
        T: Clone + Copy,
        R: RangeBounds<T>,
        I: FnOnce(T) -> Option<T>,
        D: FnOnce(T) -> Option<T>,
    {
        let min = match range.start_bound() {
            Bound::Included(&min) => min,
            Bound::Excluded(&min) => incr(min).unwrap_or(abs_max),
            Bound::Unbounded => abs_min,
        };
        let max = match range.end_bound() {
            Bound::Included(&max) => max,
            Bound::Excluded(&max) => decr(max).unwrap_or(abs_min),
            Bound::Unbounded => abs_max,
        };
        min..=max
    }

    /// Get the range of allowed [Version]s.
    pub fn allowed_versions(&self) -> &RangeInclusive<Version> {
        &self.constraints.version
    }

    /// Constrain to the specified `version`.
    pub fn with_version(mut self, version: Version) -> Self {
        self.constraints.version = version..=version;
        self
    }

    /// Constrain [Version] to be inside `range`.
    pub fn with_version_in<T: RangeBounds<Version>>(mut self, range: T) -> Self {
        self.constraints.version = Self::any_range_to_inclusive(
            range,
            Version::V01,
            Version::V40,
            Version::incr,
            Version::decr,
        );
        self
    }

    /// Get the range of allowed [Ecl]s.
    pub fn allowed_ecls(&self) -> &RangeInclusive<Ecl> {
        &self.constraints.ecl
    }

    /// Constrain to the specified `ecl`.
    pub fn with_ecl(mut self, ecl: Ecl) -> Self {
        self.constraints.ecl = ecl..=ecl;
        self
    }

    /// Constrain [Ecl] to be inside `range`. The low end drives version selection; the level is
    /// then boosted towards the high end while the version allows it.
    pub fn with_ecl_in<T: RangeBounds<Ecl>>(mut self, range: T) -> Self {
        self.constraints.ecl =
            Self::any_range_to_inclusive(range, Ecl::L, Ecl::H, Ecl::incr, Ecl::decr);
        self
    }

    /// Get the table of allowed [Mask]s.
    pub fn allowed_masks(&self) -> &MaskTable<bool> {
        &self.constraints.mask
    }

    /// Constrain [Mask] to be `mask`.
    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.constraints.mask.fill(false);
        self.constraints.mask[mask] = true;
        self
    }

    /// Constrain [Mask] to be picked only from the elements yielded by `iter`.
    pub fn with_mask_in<I: Iterator<Item = Mask>>(mut self, iter: I) -> Self {
        self.constraints.mask.fill(false);
        for mask in iter {
            self.constraints.mask[mask] = true;
        }
        self
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Constraints {
    ecl: RangeInclusive<Ecl>,
    version: RangeInclusive<Version>,
    mask: MaskTable<bool>,
}

impl Default for Constraints {
    fn default() -> Self {
        let mut mask = MaskTable::default();
        mask.fill(true);
        Self {
            ecl: Ecl::M..=Ecl::M,
            version: Version::V01..=Version::V40,
            mask,
        }
    }
}

/// Assemble the bit stream for one symbol: segment header, payload, terminator, byte alignment,
/// pad codewords up to `capacity_bytes`.
fn build_stream(
    data: &[u8],
    segment: &Segment,
    version: Version,
    capacity_bytes: usize,
) -> Result<BitStream, EncodeError> {
    let capacity_bits = capacity_bytes * 8;
    let mut stream = BitStream::new();
    stream.append_bits(segment.mode.indicator() as u16, 4);
    stream.append_bits(
        segment.len as u16,
        qrstandard::char_count_len(segment.mode, version),
    );
    match segment.mode {
        Mode::Num => append_numeric(&mut stream, data),
        Mode::Alnum => append_alphanumeric(&mut stream, data)?,
        Mode::Bytes => {
            for &byte in data {
                stream.append_byte(byte);
            }
        }
        Mode::Kanji => unreachable!("kanji segments are never produced by analysis"),
    }
    // Terminator, truncated when the payload already fills the symbol.
    let terminator = 4.min(capacity_bits - stream.len());
    if terminator > 0 {
        stream.append_bits(0, terminator);
    }
    let align = (8 - stream.len() % 8) % 8;
    if align > 0 {
        stream.append_bits(0, align);
    }
    for &pad in qrstandard::PAD_CODEWORDS.iter().cycle() {
        if stream.len() >= capacity_bits {
            break;
        }
        stream.append_byte(pad);
    }
    Ok(stream)
}

/// Digits three at a time into 10 bits; a 2-digit tail takes 7 bits, a single digit 4.
fn append_numeric(stream: &mut BitStream, data: &[u8]) {
    for chunk in data.chunks(3) {
        let mut value: u16 = 0;
        for &digit in chunk {
            value = value * 10 + (digit - b'0') as u16;
        }
        stream.append_bits(value, 1 + 3 * chunk.len());
    }
}

/// Characters two at a time into 11 bits; an odd tail character takes 6.
fn append_alphanumeric(stream: &mut BitStream, data: &[u8]) -> Result<(), EncodeError> {
    let value = |byte| {
        qrstandard::alphanumeric_value(byte).ok_or(EncodeError::InvalidAlphanumericChar(byte))
    };
    for chunk in data.chunks(2) {
        match *chunk {
            [first, second] => stream.append_bits(45 * value(first)? + value(second)?, 11),
            [single] => stream.append_bits(value(single)?, 6),
            _ => unreachable!("chunks of two have one or two elements"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(encode("", Ecl::L).err(), Some(EncodeError::EmptyInput));
    }

    #[test]
    fn numeric_stream_layout() {
        let segment = Segment::new(Mode::Num, 5);
        let stream = build_stream(b"12345", &segment, Version::V01, 19).unwrap();
        let bytes = stream.into_bytes();
        assert_eq!(bytes.len(), 19);
        // 0001 | 0000000101 | 0001111011 | 0101101 | terminator and alignment zeros.
        assert_eq!(bytes[0], 0b0001_0000);
        assert_eq!(bytes[1], 0b0001_0100);
        assert_eq!(bytes[2], 0b0111_1011);
        assert_eq!(bytes[3], 0b0101_1010);
        assert_eq!(bytes[4], 0b0000_0000);
        // Pad codewords alternate from there.
        assert_eq!(bytes[5], 0xEC);
        assert_eq!(bytes[6], 0x11);
    }

    #[test]
    fn byte_stream_layout() {
        let segment = Segment::new(Mode::Bytes, 5);
        let stream = build_stream(b"hello", &segment, Version::V01, 13).unwrap();
        let bytes = stream.into_bytes();
        // 0100 | 00000101 | "hello" shifted by the 4-bit header | terminator.
        assert_eq!(bytes[0], 0b0100_0000);
        assert_eq!(bytes[1], 0b0101_0110);
        assert_eq!(bytes[2], 0b1000_0110);
        assert_eq!(bytes[3], 0b0101_0110);
        assert_eq!(bytes[4], 0b1100_0110);
        assert_eq!(bytes[5], 0b1100_0110);
        assert_eq!(bytes[6], 0b1111_0000);
    }

    #[test]
    fn alphanumeric_known_codewords() {
        // The worked "HELLO WORLD" 1-M example.
        let segment = Segment::new(Mode::Alnum, 11);
        let stream = build_stream(b"HELLO WORLD", &segment, Version::V01, 16).unwrap();
        assert_eq!(
            stream.into_bytes(),
            vec![32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17]
        );
    }

    #[test]
    fn alphanumeric_guard_fires_on_foreign_bytes() {
        let mut stream = BitStream::new();
        assert_eq!(
            append_alphanumeric(&mut stream, b"a"),
            Err(EncodeError::InvalidAlphanumericChar(b'a'))
        );
    }

    #[test]
    fn exact_fit_gets_no_padding() {
        // 17 bytes in byte mode hit version 1-L capacity exactly: 4 + 8 + 136 + 4 = 152 bits.
        let segment = Segment::new(Mode::Bytes, 17);
        let stream = build_stream(&[b'x'; 17], &segment, Version::V01, 19).unwrap();
        let bytes = stream.into_bytes();
        assert_eq!(bytes.len(), 19);
        assert_ne!(bytes[18], 0xEC);
        assert_ne!(bytes[18], 0x11);
    }

    #[test]
    fn version_selection_is_minimal() {
        let segment = Segment::new(Mode::Alnum, 11);
        let encoder = Encoder::new().with_ecl(Ecl::M);
        assert_eq!(
            encoder.choose_parameters(&segment).unwrap(),
            (Version::V01, Ecl::M)
        );
        // 21 alphanumeric characters need 4 + 9 + 116 bits: too much for 1-M (128 bits of
        // capacity), fine for 2-M (224).
        let segment = Segment::new(Mode::Alnum, 21);
        assert_eq!(
            encoder.choose_parameters(&segment).unwrap(),
            (Version::V02, Ecl::M)
        );
    }

    #[test]
    fn ecl_band_boosts_without_growing_the_version() {
        // 11 alphanumeric characters need 74 bits: version 1 holds them at Q (104 bits) but not
        // at H (72).
        let segment = Segment::new(Mode::Alnum, 11);
        let encoder = Encoder::new().with_ecl_in(Ecl::L..);
        assert_eq!(
            encoder.choose_parameters(&segment).unwrap(),
            (Version::V01, Ecl::Q)
        );
        // With the band capped at M, the boost stops there.
        let encoder = Encoder::new().with_ecl_in(Ecl::L..=Ecl::M);
        assert_eq!(
            encoder.choose_parameters(&segment).unwrap(),
            (Version::V01, Ecl::M)
        );
    }

    #[test]
    fn oversized_data_fails() {
        let data = "a".repeat(3000);
        assert_eq!(encode(&data, Ecl::H).err(), Some(EncodeError::DataTooLong));
        // A version cap makes even modest data overflow.
        let encoder = Encoder::new().with_ecl(Ecl::L).with_version(Version::V01);
        assert_eq!(
            encoder.encode("a".repeat(20)).err(),
            Some(EncodeError::DataTooLong)
        );
    }

    #[test]
    fn forced_mask_is_respected() {
        for mask in [Mask::M011, Mask::M110] {
            let qr = Encoder::new()
                .with_ecl(Ecl::M)
                .with_mask(mask)
                .encode("FORCED MASK")
                .unwrap();
            assert_eq!(qr.meta().mask, mask);
        }
    }

    #[test]
    fn constraint_ranges_normalize() {
        let encoder = Encoder::new().with_version_in(..Version::V10);
        assert_eq!(
            encoder.allowed_versions().clone(),
            Version::V01..=Version::V09
        );
        let encoder = Encoder::new().with_ecl_in(..);
        assert_eq!(encoder.allowed_ecls().clone(), Ecl::L..=Ecl::H);
    }
}
