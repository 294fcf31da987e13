/// Encoding mode of a data segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mode {
    /// Encoding for digits 0-9.
    Num,
    /// Encoding for digits 0-9, capital letters A-Z and a few symbols.
    Alnum,
    /// Encoding for arbitrary text or byte string.
    Bytes,
    /// Encoding for Shift JIS double-byte characters. Enumerated for completeness; analysis never
    /// selects it.
    Kanji,
}

impl Mode {
    /// Return the [Mode] that is the most generic between `self` and `other`.
    /// # Example
    /// ```
    /// use qrvec_core::Mode;
    /// assert_eq!(Mode::Alnum.most_generic(Mode::Bytes), Mode::Bytes);
    /// assert_eq!(Mode::Alnum.most_generic(Mode::Num), Mode::Alnum);
    /// ```
    pub fn most_generic(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }

    /// Determine the most compact [Mode] able to represent every byte of `data`.
    /// # Example
    /// ```
    /// use qrvec_core::Mode;
    /// assert_eq!(Mode::analyze(b"12345"), Mode::Num);
    /// assert_eq!(Mode::analyze(b"HELLO WORLD"), Mode::Alnum);
    /// assert_eq!(Mode::analyze(b"hello"), Mode::Bytes);
    /// ```
    pub fn analyze(data: &[u8]) -> Self {
        data.iter()
            .copied()
            .map(Mode::from)
            .fold(Mode::Num, Mode::most_generic)
    }

    /// Get the 4-bit mode indicator that introduces a segment of this mode in the bit stream.
    pub fn indicator(self) -> u8 {
        match self {
            Mode::Num => 0b0001,
            Mode::Alnum => 0b0010,
            Mode::Bytes => 0b0100,
            Mode::Kanji => 0b1000,
        }
    }
}

impl From<u8> for Mode {
    fn from(value: u8) -> Self {
        match value {
            0x30..=0x39 => Mode::Num,
            0x20 | 0x24 | 0x25 | 0x2a | 0x2b | 0x2d..=0x2f | 0x3a | 0x41..=0x5a => Mode::Alnum,
            _ => Mode::Bytes,
        }
    }
}

/// Contiguous segment of data with a [Mode].
#[derive(Debug, Clone)]
pub struct Segment {
    pub mode: Mode,
    pub len: usize,
}

impl Segment {
    /// Construct a new [Segment] with the given `mode` and `len`.
    pub fn new(mode: Mode, len: usize) -> Self {
        Self { mode, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_per_byte() {
        for b in b'0'..=b'9' {
            assert_eq!(Mode::from(b), Mode::Num);
        }
        for b in b'A'..=b'Z' {
            assert_eq!(Mode::from(b), Mode::Alnum);
        }
        for b in *b" $%*+-./:" {
            assert_eq!(Mode::from(b), Mode::Alnum);
        }
        assert_eq!(Mode::from(b'a'), Mode::Bytes);
        assert_eq!(Mode::from(b'#'), Mode::Bytes);
        assert_eq!(Mode::from(0xff), Mode::Bytes);
    }

    #[test]
    fn analysis_picks_the_most_generic_mode() {
        assert_eq!(Mode::analyze(b"0123456789"), Mode::Num);
        assert_eq!(Mode::analyze(b"A1"), Mode::Alnum);
        assert_eq!(Mode::analyze(b"https://example.com"), Mode::Bytes);
        // A single lowercase byte downgrades the whole input.
        assert_eq!(Mode::analyze(b"HELLOx"), Mode::Bytes);
    }

    #[test]
    fn indicators() {
        assert_eq!(Mode::Num.indicator(), 1);
        assert_eq!(Mode::Alnum.indicator(), 2);
        assert_eq!(Mode::Bytes.indicator(), 4);
        assert_eq!(Mode::Kanji.indicator(), 8);
    }
}
