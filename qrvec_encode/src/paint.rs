use bitvec::{order::Msb0, vec::BitVec};

use qrvec_core::qrstandard;
use qrvec_core::{Ecl, Mask, MaskTable, Matrix, Module, ModuleKind, Version};

/// Paints a [Matrix] for one symbol: function patterns first, then the codeword bits, then the
/// winning mask and the information words.
pub struct Painter {
    version: Version,
    ecl: Ecl,
    matrix: Matrix,
}

impl Painter {
    /// Create a new [Painter] for an empty matrix of the given version.
    pub fn new(version: Version, ecl: Ecl) -> Self {
        Self {
            version,
            ecl,
            matrix: Matrix::new(version),
        }
    }

    /// Paint the matrix, filling it with `codewords`, and return it together with the mask that
    /// was selected among `allowed`.
    pub fn paint(mut self, codewords: &[u8], allowed: &MaskTable<bool>) -> (Matrix, Mask) {
        self.place_function_patterns();
        self.place_codewords(codewords);
        let mask = self.choose_mask(allowed);
        apply_mask(&mut self.matrix, mask);
        self.write_format_info(qrstandard::format_info(self.ecl, mask));
        if self.version >= Version::V07 {
            self.write_version_info();
        }
        (self.matrix, mask)
    }

    fn place_function_patterns(&mut self) {
        let size = self.matrix.size();
        for (x, y) in [(0, 0), (size - 7, 0), (0, size - 7)] {
            self.place_finder(x, y);
        }
        self.place_separators();
        self.place_timing();
        self.place_alignment();
        // The module above the bottom-left finder separator corner is always dark.
        self.matrix.set(
            8,
            4 * self.version.number() as usize + 9,
            Module::function(true, ModuleKind::DarkModule),
        );
        self.reserve_format_info();
        if self.version >= Version::V07 {
            self.reserve_version_info();
        }
    }

    /// Stamp a 7x7 finder pattern with its top-left corner at `(x, y)`: dark ring, light ring,
    /// dark 3x3 center.
    fn place_finder(&mut self, x: usize, y: usize) {
        for dy in 0..7 {
            for dx in 0..7 {
                let on_border = dy == 0 || dy == 6 || dx == 0 || dx == 6;
                let in_center = (2..=4).contains(&dy) && (2..=4).contains(&dx);
                let dark = on_border || in_center;
                self.matrix
                    .set(x + dx, y + dy, Module::function(dark, ModuleKind::Finder));
            }
        }
    }

    /// Surround each finder with a one-module light strip on its inward sides.
    fn place_separators(&mut self) {
        let size = self.matrix.size();
        let separator = Module::function(false, ModuleKind::FinderSeparator);
        for i in 0..8 {
            // Top-left finder: right and bottom edges.
            self.matrix.set(7, i, separator);
            self.matrix.set(i, 7, separator);
            // Top-right finder: left and bottom edges.
            self.matrix.set(size - 8, i, separator);
            self.matrix.set(size - 8 + i, 7, separator);
            // Bottom-left finder: right and top edges.
            self.matrix.set(7, size - 8 + i, separator);
            self.matrix.set(i, size - 8, separator);
        }
    }

    /// Alternating strips on row 6 and column 6 between the separators, dark on even coordinates.
    fn place_timing(&mut self) {
        let size = self.matrix.size();
        for i in 8..size - 8 {
            let module = Module::function(i % 2 == 0, ModuleKind::Timing);
            self.matrix.set(i, 6, module);
            self.matrix.set(6, i, module);
        }
    }

    /// Stamp the 5x5 alignment patterns on the version's coordinate grid, skipping any position
    /// whose footprint would touch a finder or its separator.
    fn place_alignment(&mut self) {
        let positions = qrstandard::alignment_positions(self.version);
        for &cy in &positions {
            for &cx in &positions {
                if self.touches_finder(cx, cy) {
                    continue;
                }
                for dy in 0..5 {
                    for dx in 0..5 {
                        let on_border = dy == 0 || dy == 4 || dx == 0 || dx == 4;
                        let in_center = dy == 2 && dx == 2;
                        self.matrix.set(
                            cx + dx - 2,
                            cy + dy - 2,
                            Module::function(on_border || in_center, ModuleKind::Alignment),
                        );
                    }
                }
            }
        }
    }

    /// Whether the 5x5 footprint centered at `(cx, cy)` overlaps a finder or separator cell.
    fn touches_finder(&self, cx: usize, cy: usize) -> bool {
        for dy in 0..5 {
            for dx in 0..5 {
                let kind = self.matrix[(cx + dx - 2, cy + dy - 2)].kind;
                if matches!(kind, ModuleKind::Finder | ModuleKind::FinderSeparator) {
                    return true;
                }
            }
        }
        false
    }

    /// Reserve the cells of both format information copies as light placeholders; the real bits
    /// are written after mask selection.
    fn reserve_format_info(&mut self) {
        let size = self.matrix.size();
        let placeholder = Module::function(false, ModuleKind::FormatInfo);
        for i in 0..9 {
            if !self.matrix[(i, 8)].reserved {
                self.matrix.set(i, 8, placeholder);
            }
            if !self.matrix[(8, i)].reserved {
                self.matrix.set(8, i, placeholder);
            }
        }
        for i in 0..8 {
            self.matrix.set(size - 1 - i, 8, placeholder);
        }
        for i in 0..7 {
            self.matrix.set(8, size - 1 - i, placeholder);
        }
    }

    /// Reserve the two 6x3 version information blocks (light placeholders, written later).
    fn reserve_version_info(&mut self) {
        let size = self.matrix.size();
        let placeholder = Module::function(false, ModuleKind::VersionInfo);
        for i in 0..6 {
            for j in 0..3 {
                self.matrix.set(size - 11 + j, i, placeholder);
                self.matrix.set(i, size - 11 + j, placeholder);
            }
        }
    }

    /// Write the codeword bits into the unreserved cells, walking two-column strips from the
    /// right edge, skipping the timing column, the first strip moving upward. Cells left over
    /// after the bits run out stay light.
    fn place_codewords(&mut self, codewords: &[u8]) {
        let bits: BitVec<u8, Msb0> = BitVec::from_vec(codewords.to_vec());
        let mut bits = bits.into_iter();
        let size = self.matrix.size() as isize;
        let mut col = size - 1;
        let mut upward = true;
        while col > 0 {
            if col == 6 {
                col = 5;
            }
            let mut row = if upward { size - 1 } else { 0 };
            loop {
                for x in [col, col - 1] {
                    let (x, y) = (x as usize, row as usize);
                    if !self.matrix[(x, y)].reserved {
                        let dark = bits.next().unwrap_or(false);
                        self.matrix.set(x, y, Module::data(dark));
                    }
                }
                row += if upward { -1 } else { 1 };
                if row < 0 || row >= size {
                    break;
                }
            }
            upward = !upward;
            col -= 2;
        }
    }

    /// Score every allowed mask on a copy of the matrix and keep the cheapest; ties go to the
    /// smallest code.
    fn choose_mask(&self, allowed: &MaskTable<bool>) -> Mask {
        let candidates: Vec<Mask> = Mask::ALL.into_iter().filter(|&mask| allowed[mask]).collect();
        if let [only] = candidates[..] {
            return only;
        }
        let mut best: Option<(Mask, u32)> = None;
        for mask in candidates {
            let mut trial = self.matrix.clone();
            apply_mask(&mut trial, mask);
            let score = penalty_score(&trial);
            if best.map_or(true, |(_, s)| score < s) {
                best = Some((mask, score));
            }
        }
        best.map_or(Mask::M000, |(mask, _)| mask)
    }

    /// Write the 15 format bits into both of their locations. The cells were reserved up front,
    /// so they are plain overwrites.
    fn write_format_info(&mut self, info: u16) {
        let size = self.matrix.size();
        let bit = |i: usize| Module::function(info >> i & 1 == 1, ModuleKind::FormatInfo);
        // Around the top-left finder, most significant bit first, skipping the timing strip.
        for i in 0..6 {
            self.matrix.set(8, i, bit(14 - i));
        }
        self.matrix.set(8, 7, bit(8));
        self.matrix.set(8, 8, bit(7));
        self.matrix.set(7, 8, bit(6));
        for i in 0..6 {
            self.matrix.set(5 - i, 8, bit(5 - i));
        }
        // Split copy: low bits below the top-right finder, high bits beside the bottom-left one.
        for i in 0..8 {
            self.matrix.set(size - 1 - i, 8, bit(i));
        }
        for i in 0..7 {
            self.matrix.set(8, size - 7 + i, bit(8 + i));
        }
    }

    /// Write the 18 version bits into both 6x3 blocks, one the transpose of the other.
    fn write_version_info(&mut self) {
        let info = qrstandard::version_info(self.version)
            .unwrap_or_else(|| unreachable!("version {} carries no version info", self.version));
        let size = self.matrix.size();
        for i in 0..6 {
            for j in 0..3 {
                let dark = info >> (i * 3 + j) & 1 == 1;
                let module = Module::function(dark, ModuleKind::VersionInfo);
                self.matrix.set(size - 11 + j, i, module);
                self.matrix.set(i, size - 11 + j, module);
            }
        }
    }
}

/// Invert every unreserved module selected by `mask`.
pub fn apply_mask(matrix: &mut Matrix, mask: Mask) {
    let function = mask.function();
    for y in 0..matrix.size() {
        for x in 0..matrix.size() {
            let module = matrix[(x, y)];
            if !module.reserved && function(x, y) {
                matrix.set(
                    x,
                    y,
                    Module {
                        dark: !module.dark,
                        ..module
                    },
                );
            }
        }
    }
}

/// Total penalty of a masked matrix under the four scoring rules. Lower is better.
pub fn penalty_score(matrix: &Matrix) -> u32 {
    penalty_runs(matrix) + penalty_blocks(matrix) + penalty_finder_lookalikes(matrix)
        + penalty_balance(matrix)
}

/// Rule 1: every run of 5 or more equal modules in a row or column costs 3 plus its overlength.
fn penalty_runs(matrix: &Matrix) -> u32 {
    let size = matrix.size();
    let mut penalty = 0;
    let mut tally = |run: u32| {
        if run >= 5 {
            penalty += 3 + (run - 5);
        }
    };
    for y in 0..size {
        let mut run = 1;
        for x in 1..size {
            if matrix[(x, y)].dark == matrix[(x - 1, y)].dark {
                run += 1;
            } else {
                tally(run);
                run = 1;
            }
        }
        tally(run);
    }
    for x in 0..size {
        let mut run = 1;
        for y in 1..size {
            if matrix[(x, y)].dark == matrix[(x, y - 1)].dark {
                run += 1;
            } else {
                tally(run);
                run = 1;
            }
        }
        tally(run);
    }
    penalty
}

/// Rule 2: every 2x2 block of equal modules costs 3.
fn penalty_blocks(matrix: &Matrix) -> u32 {
    let size = matrix.size();
    let mut penalty = 0;
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let dark = matrix[(x, y)].dark;
            if matrix[(x + 1, y)].dark == dark
                && matrix[(x, y + 1)].dark == dark
                && matrix[(x + 1, y + 1)].dark == dark
            {
                penalty += 3;
            }
        }
    }
    penalty
}

/// Rule 3: every horizontal or vertical 1:1:3:1:1 finder lookalike with a 4-module light margin
/// costs 40.
fn penalty_finder_lookalikes(matrix: &Matrix) -> u32 {
    const PATTERNS: [[bool; 11]; 2] = [
        [
            true, false, true, true, true, false, true, false, false, false, false,
        ],
        [
            false, false, false, false, true, false, true, true, true, false, true,
        ],
    ];
    let size = matrix.size();
    let mut penalty = 0;
    for fixed in 0..size {
        for start in 0..size - 10 {
            for pattern in &PATTERNS {
                let horizontal = (0..11).all(|i| matrix[(start + i, fixed)].dark == pattern[i]);
                let vertical = (0..11).all(|i| matrix[(fixed, start + i)].dark == pattern[i]);
                penalty += 40 * (horizontal as u32 + vertical as u32);
            }
        }
    }
    penalty
}

/// Rule 4: deviation of the dark module share from 50%, in steps of 5 percentage points, costs 10
/// each.
fn penalty_balance(matrix: &Matrix) -> u32 {
    let total = matrix.size() * matrix.size();
    let dark = matrix.modules().filter(|module| module.dark).count();
    let percent = (dark * 100 / total) as i32;
    ((percent - 50).unsigned_abs() / 5) * 10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted(version: Version) -> Painter {
        let mut painter = Painter::new(version, Ecl::M);
        painter.place_function_patterns();
        painter
    }

    #[test]
    fn finder_corners_and_centers_are_dark() {
        let matrix = painted(Version::V01).matrix;
        let size = matrix.size();
        for (x, y) in [(0, 0), (size - 7, 0), (0, size - 7)] {
            assert!(matrix[(x, y)].dark);
            assert!(matrix[(x + 3, y + 3)].dark);
            assert_eq!(matrix[(x, y)].kind, ModuleKind::Finder);
        }
        // The light ring one cell in.
        assert!(!matrix[(1, 1)].dark);
    }

    #[test]
    fn separators_are_light_and_reserved() {
        let matrix = painted(Version::V01).matrix;
        for i in 0..8 {
            for (x, y) in [(7, i), (i, 7)] {
                assert!(!matrix[(x, y)].dark);
                assert!(matrix[(x, y)].reserved);
                assert_eq!(matrix[(x, y)].kind, ModuleKind::FinderSeparator);
            }
        }
    }

    #[test]
    fn timing_alternates_starting_dark() {
        let matrix = painted(Version::V01).matrix;
        assert!(matrix[(8, 6)].dark);
        assert!(!matrix[(9, 6)].dark);
        assert!(matrix[(6, 8)].dark);
        assert!(!matrix[(6, 9)].dark);
        assert_eq!(matrix[(8, 6)].kind, ModuleKind::Timing);
    }

    #[test]
    fn dark_module_is_placed() {
        for version in [Version::V01, Version::V07, Version::V40] {
            let matrix = painted(version).matrix;
            let module = matrix[(8, 4 * version.number() as usize + 9)];
            assert!(module.dark);
            assert!(module.reserved);
            assert_eq!(module.kind, ModuleKind::DarkModule);
        }
    }

    #[test]
    fn version_one_has_no_alignment_patterns() {
        let matrix = painted(Version::V01).matrix;
        assert!(!matrix
            .modules()
            .any(|module| module.kind == ModuleKind::Alignment));
    }

    #[test]
    fn version_two_has_one_alignment_pattern() {
        let matrix = painted(Version::V02).matrix;
        let count = matrix
            .modules()
            .filter(|module| module.kind == ModuleKind::Alignment)
            .count();
        assert_eq!(count, 25);
        // Centered at (18, 18), dark center and border.
        assert!(matrix[(18, 18)].dark);
        assert!(matrix[(16, 18)].dark);
        assert!(!matrix[(17, 18)].dark);
    }

    #[test]
    fn version_seven_reserves_version_info() {
        let matrix = painted(Version::V07).matrix;
        let count = matrix
            .modules()
            .filter(|module| module.kind == ModuleKind::VersionInfo)
            .count();
        assert_eq!(count, 36);
        let matrix = painted(Version::V06).matrix;
        assert!(!matrix
            .modules()
            .any(|module| module.kind == ModuleKind::VersionInfo));
    }

    #[test]
    fn masking_twice_restores_the_data() {
        let mut painter = painted(Version::V01);
        let codewords: Vec<u8> = (0..26).map(|i| i as u8 ^ 0x5A).collect();
        painter.place_codewords(&codewords);
        let before = painter.matrix.clone();
        for mask in Mask::ALL {
            apply_mask(&mut painter.matrix, mask);
            apply_mask(&mut painter.matrix, mask);
            assert!(painter.matrix == before);
        }
    }

    #[test]
    fn mask_never_touches_reserved_cells() {
        let mut painter = painted(Version::V02);
        let before = painter.matrix.clone();
        apply_mask(&mut painter.matrix, Mask::M000);
        for y in 0..before.size() {
            for x in 0..before.size() {
                if before[(x, y)].reserved {
                    assert_eq!(before[(x, y)], painter.matrix[(x, y)]);
                }
            }
        }
    }

    #[test]
    fn penalties_on_the_empty_matrix() {
        let matrix = Matrix::new(Version::V01);
        // 21 all-light rows and columns of length 21: (3 + 16) each.
        assert_eq!(penalty_runs(&matrix), 2 * 21 * 19);
        // Every interior 2x2 block matches.
        assert_eq!(penalty_blocks(&matrix), 20 * 20 * 3);
        // No dark cells, so no finder lookalikes, and the balance is as bad as it gets.
        assert_eq!(penalty_finder_lookalikes(&matrix), 0);
        assert_eq!(penalty_balance(&matrix), 100);
    }

    #[test]
    fn finder_lookalike_detection() {
        let mut matrix = Matrix::new(Version::V01);
        let pattern = [
            true, false, true, true, true, false, true, false, false, false, false,
        ];
        for (i, &dark) in pattern.iter().enumerate() {
            matrix.set(i, 3, Module::data(dark));
        }
        assert_eq!(penalty_finder_lookalikes(&matrix), 40);
    }

    #[test]
    fn full_symbol_reserved_partition() {
        let painter = painted(Version::V03);
        let (matrix, _) = {
            let mut painter = painter;
            let codewords =
                vec![0x3C; qrvec_core::ecc_info(Version::V03, Ecl::M).total_codewords];
            painter.place_codewords(&codewords);
            let mut allowed = MaskTable::default();
            allowed.fill(true);
            let mask = painter.choose_mask(&allowed);
            apply_mask(&mut painter.matrix, mask);
            painter.write_format_info(qrstandard::format_info(painter.ecl, mask));
            (painter.matrix, mask)
        };
        for y in 0..matrix.size() {
            for x in 0..matrix.size() {
                let module = matrix[(x, y)];
                assert_eq!(module.reserved, module.kind != ModuleKind::Data);
            }
        }
    }
}
