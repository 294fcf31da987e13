//! Splitting the data codewords into blocks and interleaving them with their error correction.

use qrvec_core::EccInfo;

use crate::reed_solomon;

/// Split `data` into the blocks prescribed by `info`, compute each block's error correction, and
/// interleave everything into the final codeword stream: byte i of every data block in block
/// order, then byte i of every error correction block.
///
/// `data` must be exactly `info.data_capacity()` bytes long.
pub fn split_and_interleave(data: &[u8], info: &EccInfo) -> Vec<u8> {
    debug_assert_eq!(data.len(), info.data_capacity());

    let mut blocks: Vec<&[u8]> = Vec::with_capacity(info.block_count());
    let group1_len = info.group1.count * info.group1.data_codewords;
    if info.group1.count > 0 {
        blocks.extend(data[..group1_len].chunks(info.group1.data_codewords));
    }
    if info.group2.count > 0 {
        blocks.extend(data[group1_len..].chunks(info.group2.data_codewords));
    }

    let ecc: Vec<Vec<u8>> = blocks
        .iter()
        .map(|block| reed_solomon::encode_block(block, info.ecc_per_block))
        .collect();

    let mut out = Vec::with_capacity(info.total_codewords);
    let longest = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    for i in 0..longest {
        for block in &blocks {
            if let Some(&byte) = block.get(i) {
                out.push(byte);
            }
        }
    }
    for i in 0..info.ecc_per_block {
        for block in &ecc {
            out.push(block[i]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrvec_core::{ecc_info, Ecl, Version};

    #[test]
    fn single_block_is_data_followed_by_ecc() {
        // Version 1-M: one block of 16 data and 10 error correction codewords.
        let data = [
            32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17,
        ];
        let info = ecc_info(Version::V01, Ecl::M);
        let out = split_and_interleave(&data, info);
        assert_eq!(out.len(), info.total_codewords);
        assert_eq!(&out[..16], &data);
        assert_eq!(&out[16..], &[196, 35, 39, 119, 235, 215, 231, 226, 93, 23]);
    }

    #[test]
    fn two_groups_interleave_column_wise() {
        // Version 5-Q: two blocks of 15 data codewords, then two of 16.
        let info = ecc_info(Version::V05, Ecl::Q);
        let data: Vec<u8> = (0..info.data_capacity() as u8).collect();
        let out = split_and_interleave(&data, info);
        assert_eq!(out.len(), info.total_codewords);
        // First round robin pass: byte 0 of each of the four blocks.
        assert_eq!(&out[..4], &[0, 15, 30, 46]);
        // Pass 15 only draws from the two longer blocks.
        assert_eq!(out[4 * 15..4 * 15 + 2], [45, 61]);
    }

    #[test]
    fn output_length_matches_the_symbol_for_every_level() {
        for ecl in [Ecl::L, Ecl::M, Ecl::Q, Ecl::H] {
            let info = ecc_info(Version::V10, ecl);
            let data = vec![0xA5; info.data_capacity()];
            assert_eq!(split_and_interleave(&data, info).len(), info.total_codewords);
        }
    }
}
