//! 32 bits MurmurHash3 (x86_32 variant) of a byte sequence.
//!
//! All arithmetic is done on u32 with wrapping operations, so every intermediate value
//! is reduced to 32 bits and the bit 31 test used for the sign of a feature is exact.

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;


#[inline]
fn mix_k1(mut k1: u32) -> u32 {
    k1 = k1.wrapping_mul(C1);
    k1 = k1.rotate_left(15);
    k1.wrapping_mul(C2)
}


#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}


/// hash of data with seed
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h1 = seed;
    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        // little endian load
        let k1 = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h1 ^= mix_k1(k1);
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }
    // tail
    let tail = blocks.remainder();
    let mut k1: u32 = 0;
    if tail.len() == 3 {
        k1 ^= (tail[2] as u32) << 16;
    }
    if tail.len() >= 2 {
        k1 ^= (tail[1] as u32) << 8;
    }
    if !tail.is_empty() {
        k1 ^= tail[0] as u32;
        h1 ^= mix_k1(k1);
    }
    // finalization, length is taken modulo 2^32 as in the reference implementation
    h1 ^= data.len() as u32;
    fmix32(h1)
} // end of murmur3_32


/// hash with seed 0 of the utf8 bytes of a key
pub fn murmur3_str(key: &str) -> u32 {
    murmur3_32(key.as_bytes(), 0)
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn reference_vectors() {
        let cases: Vec<(&[u8], u32, u32)> = vec![
            (b"", 0, 0),
            (b"", 1, 0x514e_28b7),
            (b"", 0xffff_ffff, 0x81f1_6f39),
            (b"\0\0\0\0", 0, 0x2362_f9de),
            (b"\x21\x43\x65\x87", 0, 0xf55b_516b),
            (b"\xff\xff\xff\xff", 0, 0x7629_3b50),
            (b"a", 0x9747_b28c, 0x7fa0_9ea6),
            (b"abc", 0x9747_b28c, 0xc84a_62dd),
            (b"aaaa", 0x9747_b28c, 0x5a97_808a),
            (b"Hello, world!", 0x9747_b28c, 0x2488_4cba),
            (b"The quick brown fox jumps over the lazy dog", 0x9747_b28c, 0x2fa8_26cd),
        ];
        for (data, seed, expected) in cases {
            assert_eq!(murmur3_32(data, seed), expected, "data {:?} seed {:x}", data, seed);
        }
    } // end of reference_vectors

    #[test]
    fn pattern_keys() {
        assert_eq!(murmur3_str(""), 0);
        assert_eq!(murmur3_str("hello"), 0x248b_fa47);
        assert_eq!(murmur3_str("A"), 0x54dc_f7ce);
        assert_eq!(murmur3_str("A-B"), 0xc947_a98c);
        assert_eq!(murmur3_str("B-C"), 0x5115_5293);
        assert_eq!(murmur3_str("C-A"), 0x9b82_fd26);
        assert_eq!(murmur3_str("B-B"), 0xada2_2cc2);
        // keys are hashed as utf8
        assert_eq!(murmur3_str("é"), 0x1011_0787);
    }
} // end of mod tests
