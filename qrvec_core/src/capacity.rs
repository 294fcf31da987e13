//! Error correction capacity of every version/level combination.

use crate::{Ecl, Version};

/// One group of equally-sized blocks inside a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGroup {
    /// Number of blocks with this configuration.
    pub count: usize,
    /// Total codewords in each block.
    pub total_codewords: usize,
    /// Data codewords per block; the rest are error correction.
    pub data_codewords: usize,
}

impl BlockGroup {
    const fn new(count: usize, total_codewords: usize, data_codewords: usize) -> Self {
        Self {
            count,
            total_codewords,
            data_codewords,
        }
    }

    /// Error correction codewords per block in this group.
    pub fn ecc_codewords(&self) -> usize {
        self.total_codewords - self.data_codewords
    }
}

/// Error correction configuration for one version/level combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EccInfo {
    /// Total codewords in the symbol, data and error correction combined.
    pub total_codewords: usize,
    /// Error correction codewords per block, equal across both groups.
    pub ecc_per_block: usize,
    /// First group of blocks.
    pub group1: BlockGroup,
    /// Second group of blocks; `count` is 0 when the symbol only uses one group.
    pub group2: BlockGroup,
}

impl EccInfo {
    /// Total data codewords in the symbol, excluding error correction.
    pub fn data_capacity(&self) -> usize {
        self.group1.count * self.group1.data_codewords
            + self.group2.count * self.group2.data_codewords
    }

    /// Number of blocks across both groups.
    pub fn block_count(&self) -> usize {
        self.group1.count + self.group2.count
    }
}

/// Get the error correction configuration for `version` at `ecl`.
pub fn ecc_info(version: Version, ecl: Ecl) -> &'static EccInfo {
    &ECC_TABLE[version.number() as usize - 1][ecl as usize]
}

const fn info(
    total: usize,
    ecc_per_block: usize,
    group1: BlockGroup,
    group2: BlockGroup,
) -> EccInfo {
    EccInfo {
        total_codewords: total,
        ecc_per_block,
        group1,
        group2,
    }
}

const fn grp(count: usize, total: usize, data: usize) -> BlockGroup {
    BlockGroup::new(count, total, data)
}

const NONE: BlockGroup = grp(0, 0, 0);

/// Block structure for every version (outer index, version 1 first) and level (inner index, in
/// L, M, Q, H order). Transcribed from ISO/IEC 18004 table 9.
const ECC_TABLE: [[EccInfo; 4]; 40] = [
    [
        info(26, 7, grp(1, 26, 19), NONE),
        info(26, 10, grp(1, 26, 16), NONE),
        info(26, 13, grp(1, 26, 13), NONE),
        info(26, 17, grp(1, 26, 9), NONE),
    ],
    [
        info(44, 10, grp(1, 44, 34), NONE),
        info(44, 16, grp(1, 44, 28), NONE),
        info(44, 22, grp(1, 44, 22), NONE),
        info(44, 28, grp(1, 44, 16), NONE),
    ],
    [
        info(70, 15, grp(1, 70, 55), NONE),
        info(70, 26, grp(1, 70, 44), NONE),
        info(70, 18, grp(2, 35, 17), NONE),
        info(70, 22, grp(2, 35, 13), NONE),
    ],
    [
        info(100, 20, grp(1, 100, 80), NONE),
        info(100, 18, grp(2, 50, 32), NONE),
        info(100, 26, grp(2, 50, 24), NONE),
        info(100, 16, grp(4, 25, 9), NONE),
    ],
    [
        info(134, 26, grp(1, 134, 108), NONE),
        info(134, 24, grp(2, 67, 43), NONE),
        info(134, 18, grp(2, 33, 15), grp(2, 34, 16)),
        info(134, 22, grp(2, 33, 11), grp(2, 34, 12)),
    ],
    [
        info(172, 18, grp(2, 86, 68), NONE),
        info(172, 16, grp(4, 43, 27), NONE),
        info(172, 24, grp(4, 43, 19), NONE),
        info(172, 28, grp(4, 43, 15), NONE),
    ],
    [
        info(196, 20, grp(2, 98, 78), NONE),
        info(196, 18, grp(4, 49, 31), NONE),
        info(196, 18, grp(2, 32, 14), grp(4, 33, 15)),
        info(196, 26, grp(4, 39, 13), grp(1, 40, 14)),
    ],
    [
        info(242, 24, grp(2, 121, 97), NONE),
        info(242, 22, grp(2, 60, 38), grp(2, 61, 39)),
        info(242, 22, grp(4, 40, 18), grp(2, 41, 19)),
        info(242, 26, grp(4, 40, 14), grp(2, 41, 15)),
    ],
    [
        info(292, 30, grp(2, 146, 116), NONE),
        info(292, 22, grp(3, 58, 36), grp(2, 59, 37)),
        info(292, 20, grp(4, 36, 16), grp(4, 37, 17)),
        info(292, 24, grp(4, 36, 12), grp(4, 37, 13)),
    ],
    [
        info(346, 18, grp(2, 86, 68), grp(2, 87, 69)),
        info(346, 26, grp(4, 69, 43), grp(1, 70, 44)),
        info(346, 24, grp(6, 43, 19), grp(2, 44, 20)),
        info(346, 28, grp(6, 43, 15), grp(2, 44, 16)),
    ],
    [
        info(404, 20, grp(4, 101, 81), NONE),
        info(404, 30, grp(1, 80, 50), grp(4, 81, 51)),
        info(404, 28, grp(4, 50, 22), grp(4, 51, 23)),
        info(404, 24, grp(3, 36, 12), grp(8, 37, 13)),
    ],
    [
        info(466, 24, grp(2, 116, 92), grp(2, 117, 93)),
        info(466, 22, grp(6, 58, 36), grp(2, 59, 37)),
        info(466, 26, grp(4, 46, 20), grp(6, 47, 21)),
        info(466, 28, grp(7, 42, 14), grp(4, 43, 15)),
    ],
    [
        info(532, 26, grp(4, 133, 107), NONE),
        info(532, 22, grp(8, 59, 37), grp(1, 60, 38)),
        info(532, 24, grp(8, 44, 20), grp(4, 45, 21)),
        info(532, 22, grp(12, 33, 11), grp(4, 34, 12)),
    ],
    [
        info(581, 30, grp(3, 145, 115), grp(1, 146, 116)),
        info(581, 24, grp(4, 64, 40), grp(5, 65, 41)),
        info(581, 20, grp(11, 36, 16), grp(5, 37, 17)),
        info(581, 24, grp(11, 36, 12), grp(5, 37, 13)),
    ],
    [
        info(655, 22, grp(5, 109, 87), grp(1, 110, 88)),
        info(655, 24, grp(5, 65, 41), grp(5, 66, 42)),
        info(655, 30, grp(5, 54, 24), grp(7, 55, 25)),
        info(655, 24, grp(11, 36, 12), grp(7, 37, 13)),
    ],
    [
        info(733, 24, grp(5, 122, 98), grp(1, 123, 99)),
        info(733, 28, grp(7, 73, 45), grp(3, 74, 46)),
        info(733, 24, grp(15, 43, 19), grp(2, 44, 20)),
        info(733, 30, grp(3, 45, 15), grp(13, 46, 16)),
    ],
    [
        info(815, 28, grp(1, 135, 107), grp(5, 136, 108)),
        info(815, 28, grp(10, 74, 46), grp(1, 75, 47)),
        info(815, 28, grp(1, 50, 22), grp(15, 51, 23)),
        info(815, 28, grp(2, 42, 14), grp(17, 43, 15)),
    ],
    [
        info(901, 30, grp(5, 150, 120), grp(1, 151, 121)),
        info(901, 26, grp(9, 69, 43), grp(4, 70, 44)),
        info(901, 28, grp(17, 50, 22), grp(1, 51, 23)),
        info(901, 28, grp(2, 42, 14), grp(19, 43, 15)),
    ],
    [
        info(991, 28, grp(3, 141, 113), grp(4, 142, 114)),
        info(991, 26, grp(3, 70, 44), grp(11, 71, 45)),
        info(991, 26, grp(17, 47, 21), grp(4, 48, 22)),
        info(991, 26, grp(9, 39, 13), grp(16, 40, 14)),
    ],
    [
        info(1085, 28, grp(3, 135, 107), grp(5, 136, 108)),
        info(1085, 26, grp(3, 67, 41), grp(13, 68, 42)),
        info(1085, 30, grp(15, 54, 24), grp(5, 55, 25)),
        info(1085, 28, grp(15, 43, 15), grp(10, 44, 16)),
    ],
    [
        info(1156, 28, grp(4, 144, 116), grp(4, 145, 117)),
        info(1156, 26, grp(17, 68, 42), NONE),
        info(1156, 28, grp(17, 50, 22), grp(6, 51, 23)),
        info(1156, 30, grp(19, 46, 16), grp(6, 47, 17)),
    ],
    [
        info(1258, 28, grp(2, 139, 111), grp(7, 140, 112)),
        info(1258, 28, grp(17, 74, 46), NONE),
        info(1258, 30, grp(7, 54, 24), grp(16, 55, 25)),
        info(1258, 24, grp(34, 37, 13), NONE),
    ],
    [
        info(1364, 30, grp(4, 151, 121), grp(5, 152, 122)),
        info(1364, 28, grp(4, 75, 47), grp(14, 76, 48)),
        info(1364, 30, grp(11, 54, 24), grp(14, 55, 25)),
        info(1364, 30, grp(16, 45, 15), grp(14, 46, 16)),
    ],
    [
        info(1474, 30, grp(6, 147, 117), grp(4, 148, 118)),
        info(1474, 28, grp(6, 73, 45), grp(14, 74, 46)),
        info(1474, 30, grp(11, 54, 24), grp(16, 55, 25)),
        info(1474, 30, grp(30, 46, 16), grp(2, 47, 17)),
    ],
    [
        info(1588, 26, grp(8, 132, 106), grp(4, 133, 107)),
        info(1588, 28, grp(8, 75, 47), grp(13, 76, 48)),
        info(1588, 30, grp(7, 54, 24), grp(22, 55, 25)),
        info(1588, 30, grp(22, 45, 15), grp(13, 46, 16)),
    ],
    [
        info(1706, 28, grp(10, 142, 114), grp(2, 143, 115)),
        info(1706, 28, grp(19, 74, 46), grp(4, 75, 47)),
        info(1706, 28, grp(28, 50, 22), grp(6, 51, 23)),
        info(1706, 30, grp(33, 46, 16), grp(4, 47, 17)),
    ],
    [
        info(1828, 30, grp(8, 152, 122), grp(4, 153, 123)),
        info(1828, 28, grp(22, 73, 45), grp(3, 74, 46)),
        info(1828, 30, grp(8, 53, 23), grp(26, 54, 24)),
        info(1828, 30, grp(12, 45, 15), grp(28, 46, 16)),
    ],
    [
        info(1921, 30, grp(3, 147, 117), grp(10, 148, 118)),
        info(1921, 28, grp(3, 73, 45), grp(23, 74, 46)),
        info(1921, 30, grp(4, 54, 24), grp(31, 55, 25)),
        info(1921, 30, grp(11, 45, 15), grp(31, 46, 16)),
    ],
    [
        info(2051, 30, grp(7, 146, 116), grp(7, 147, 117)),
        info(2051, 28, grp(21, 73, 45), grp(7, 74, 46)),
        info(2051, 30, grp(1, 53, 23), grp(37, 54, 24)),
        info(2051, 30, grp(19, 45, 15), grp(26, 46, 16)),
    ],
    [
        info(2185, 30, grp(5, 145, 115), grp(10, 146, 116)),
        info(2185, 28, grp(19, 75, 47), grp(10, 76, 48)),
        info(2185, 30, grp(15, 54, 24), grp(25, 55, 25)),
        info(2185, 30, grp(23, 45, 15), grp(25, 46, 16)),
    ],
    [
        info(2323, 30, grp(13, 145, 115), grp(3, 146, 116)),
        info(2323, 28, grp(2, 74, 46), grp(29, 75, 47)),
        info(2323, 30, grp(42, 54, 24), grp(1, 55, 25)),
        info(2323, 30, grp(23, 45, 15), grp(28, 46, 16)),
    ],
    [
        info(2465, 30, grp(17, 145, 115), NONE),
        info(2465, 28, grp(10, 74, 46), grp(23, 75, 47)),
        info(2465, 30, grp(10, 54, 24), grp(35, 55, 25)),
        info(2465, 30, grp(19, 45, 15), grp(35, 46, 16)),
    ],
    [
        info(2611, 30, grp(17, 145, 115), grp(1, 146, 116)),
        info(2611, 28, grp(14, 74, 46), grp(21, 75, 47)),
        info(2611, 30, grp(29, 54, 24), grp(19, 55, 25)),
        info(2611, 30, grp(11, 45, 15), grp(46, 46, 16)),
    ],
    [
        info(2761, 30, grp(13, 145, 115), grp(6, 146, 116)),
        info(2761, 28, grp(14, 74, 46), grp(23, 75, 47)),
        info(2761, 30, grp(44, 54, 24), grp(7, 55, 25)),
        info(2761, 30, grp(59, 46, 16), grp(1, 47, 17)),
    ],
    [
        info(2876, 30, grp(12, 151, 121), grp(7, 152, 122)),
        info(2876, 28, grp(12, 75, 47), grp(26, 76, 48)),
        info(2876, 30, grp(39, 54, 24), grp(14, 55, 25)),
        info(2876, 30, grp(22, 45, 15), grp(41, 46, 16)),
    ],
    [
        info(3034, 30, grp(6, 151, 121), grp(14, 152, 122)),
        info(3034, 28, grp(6, 75, 47), grp(34, 76, 48)),
        info(3034, 30, grp(46, 54, 24), grp(10, 55, 25)),
        info(3034, 30, grp(2, 45, 15), grp(64, 46, 16)),
    ],
    [
        info(3196, 30, grp(17, 152, 122), grp(4, 153, 123)),
        info(3196, 28, grp(29, 74, 46), grp(14, 75, 47)),
        info(3196, 30, grp(49, 54, 24), grp(10, 55, 25)),
        info(3196, 30, grp(24, 45, 15), grp(46, 46, 16)),
    ],
    [
        info(3362, 30, grp(4, 152, 122), grp(18, 153, 123)),
        info(3362, 28, grp(13, 74, 46), grp(32, 75, 47)),
        info(3362, 30, grp(48, 54, 24), grp(14, 55, 25)),
        info(3362, 30, grp(42, 45, 15), grp(32, 46, 16)),
    ],
    [
        info(3532, 30, grp(20, 147, 117), grp(4, 148, 118)),
        info(3532, 28, grp(40, 75, 47), grp(7, 76, 48)),
        info(3532, 30, grp(43, 54, 24), grp(22, 55, 25)),
        info(3532, 30, grp(10, 45, 15), grp(67, 46, 16)),
    ],
    [
        info(3706, 30, grp(19, 148, 118), grp(6, 149, 119)),
        info(3706, 28, grp(18, 75, 47), grp(31, 76, 48)),
        info(3706, 30, grp(34, 54, 24), grp(34, 55, 25)),
        info(3706, 30, grp(20, 45, 15), grp(61, 46, 16)),
    ],
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LEVELS: [Ecl; 4] = [Ecl::L, Ecl::M, Ecl::Q, Ecl::H];

    #[test]
    fn totals_are_consistent_with_the_groups() {
        for number in 1..=40 {
            let version = Version::new(number).unwrap();
            for ecl in LEVELS {
                let info = ecc_info(version, ecl);
                let from_groups = info.group1.count * info.group1.total_codewords
                    + info.group2.count * info.group2.total_codewords;
                assert_eq!(info.total_codewords, from_groups, "{version} {ecl:?}");
            }
        }
    }

    #[test]
    fn ecc_per_block_matches_both_groups() {
        for number in 1..=40 {
            let version = Version::new(number).unwrap();
            for ecl in LEVELS {
                let info = ecc_info(version, ecl);
                assert_eq!(info.group1.ecc_codewords(), info.ecc_per_block);
                if info.group2.count > 0 {
                    assert_eq!(info.group2.ecc_codewords(), info.ecc_per_block);
                    // The second group holds exactly one more data codeword per block.
                    assert_eq!(
                        info.group2.data_codewords,
                        info.group1.data_codewords + 1
                    );
                }
            }
        }
    }

    #[test]
    fn totals_grow_with_the_version() {
        for number in 1..40 {
            let version = Version::new(number).unwrap();
            let next = version.incr().unwrap();
            for ecl in LEVELS {
                assert!(
                    ecc_info(version, ecl).total_codewords < ecc_info(next, ecl).total_codewords
                );
            }
        }
    }

    #[test]
    fn known_data_capacities() {
        assert_eq!(ecc_info(Version::V01, Ecl::L).data_capacity(), 19);
        assert_eq!(ecc_info(Version::V01, Ecl::M).data_capacity(), 16);
        assert_eq!(ecc_info(Version::V01, Ecl::Q).data_capacity(), 13);
        assert_eq!(ecc_info(Version::V01, Ecl::H).data_capacity(), 9);
        assert_eq!(ecc_info(Version::V05, Ecl::Q).data_capacity(), 62);
        assert_eq!(ecc_info(Version::V40, Ecl::L).data_capacity(), 2956);
        assert_eq!(ecc_info(Version::V40, Ecl::H).data_capacity(), 1276);
    }
}
