//! SHA-256 (FIPS 180-4)
//!
//! One-shot only. Every call starts from the initial state `H0`; the eight
//! working variables live on the stack of [`compress`] and never outlive a
//! single block, so there is no engine object to reuse or reset.

use super::digest::{Digest, DIGEST_LEN};

/// Size of a message block in bytes (512 bits)
pub const BLOCK_LEN: usize = 64;

/// Bytes reserved at the end of the last block for the message bit length
const LENGTH_LEN: usize = 8;

/// Round constants: first 32 bits of the fractional parts of the cube roots
/// of the first 64 primes
const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// Initial hash state: first 32 bits of the fractional parts of the square
/// roots of the first 8 primes
const H0: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Hash a message (raw bytes or a UTF-8 string)
///
/// ```
/// let d = merkle_commit::hash("abc");
/// assert_eq!(
///     d.to_hex(),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn hash(message: impl AsRef<[u8]>) -> Digest {
    let data = message.as_ref();
    let bit_len = (data.len() as u64).wrapping_mul(8);
    let mut state = H0;

    let mut blocks = data.chunks_exact(BLOCK_LEN);
    for block in &mut blocks {
        compress(&mut state, block);
    }

    // 0x80 marker, zero fill, 64-bit big-endian length. Spills into a
    // second block when the tail leaves no room for marker + length.
    let tail = blocks.remainder();
    let mut last = [0u8; 2 * BLOCK_LEN];
    last[..tail.len()].copy_from_slice(tail);
    last[tail.len()] = 0x80;
    let last_len = padded_len(data.len()) - (data.len() - tail.len());
    last[last_len - LENGTH_LEN..last_len].copy_from_slice(&bit_len.to_be_bytes());
    for block in last[..last_len].chunks_exact(BLOCK_LEN) {
        compress(&mut state, block);
    }

    let mut out = [0u8; DIGEST_LEN];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    Digest::from_bytes(out)
}

/// Total length in bytes of a message of `len` bytes after padding
pub fn padded_len(len: usize) -> usize {
    ((len + LENGTH_LEN) / BLOCK_LEN + 1) * BLOCK_LEN
}

/// Run the 64-round compression function over one block and fold the
/// result into `state`
fn compress(state: &mut [u32; 8], block: &[u8]) {
    debug_assert_eq!(block.len(), BLOCK_LEN);

    let mut w = [0u32; 64];
    for (i, word) in block.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
    }
    for i in 16..64 {
        w[i] = small_sigma1(w[i - 2])
            .wrapping_add(w[i - 7])
            .wrapping_add(small_sigma0(w[i - 15]))
            .wrapping_add(w[i - 16]);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for i in 0..64 {
        let t1 = h
            .wrapping_add(big_sigma1(e))
            .wrapping_add(ch(e, f, g))
            .wrapping_add(K[i])
            .wrapping_add(w[i]);
        let t2 = big_sigma0(a).wrapping_add(maj(a, b, c));

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *s = s.wrapping_add(v);
    }
}

#[inline(always)]
fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

#[inline(always)]
fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

#[inline(always)]
fn big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline(always)]
fn big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline(always)]
fn small_sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
fn small_sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message() {
        assert_eq!(
            hash(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_str_and_bytes_agree() {
        assert_eq!(hash("hello"), hash(b"hello"));
        assert_eq!(hash(String::from("hello")), hash(vec![b'h', b'e', b'l', b'l', b'o']));
    }

    #[test]
    fn test_deterministic() {
        let h1 = hash(b"hello");
        let h2 = hash(b"hello");
        let h3 = hash(b"world");

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 64);
        assert_eq!(padded_len(55), 64);
        assert_eq!(padded_len(56), 128);
        assert_eq!(padded_len(63), 128);
        assert_eq!(padded_len(64), 128);
        assert_eq!(padded_len(119), 128);
        assert_eq!(padded_len(120), 192);
    }

    #[test]
    fn test_tail_fits_one_or_two_blocks() {
        // the padded tail after the full blocks is always 1 or 2 blocks
        for len in 0..300 {
            let tail = len % BLOCK_LEN;
            let last_len = padded_len(len) - (len - tail);
            let expected = if tail + 1 + LENGTH_LEN <= BLOCK_LEN { 1 } else { 2 };
            assert_eq!(last_len, expected * BLOCK_LEN, "len {}", len);
        }
    }

    #[test]
    fn test_compress_single_block_matches_hash() {
        // "abc" padded by hand
        let mut block = [0u8; BLOCK_LEN];
        block[..3].copy_from_slice(b"abc");
        block[3] = 0x80;
        block[63] = 24;

        let mut state = H0;
        compress(&mut state, &block);

        let mut out = [0u8; DIGEST_LEN];
        for (chunk, word) in out.chunks_exact_mut(4).zip(state.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        assert_eq!(Digest::from_bytes(out), hash("abc"));
    }

    #[test]
    fn test_sigma_functions() {
        assert_eq!(small_sigma0(1), 0x0200_4000);
        assert_eq!(small_sigma1(1), 0x0000_a000);
        assert_eq!(ch(0xffff_ffff, 0x1234_5678, 0x9abc_def0), 0x1234_5678);
        assert_eq!(ch(0, 0x1234_5678, 0x9abc_def0), 0x9abc_def0);
        assert_eq!(maj(0xf0f0_f0f0, 0xff00_ff00, 0x0000_0000), 0xf000_f000);
    }
}
