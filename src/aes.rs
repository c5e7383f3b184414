//! Compact 32-bit word-oriented AES.
//!
//! The cipher state is kept as four `u32` words, one column per
//! word with bytes packed least-significant-first. `SubBytes`
//! and `ShiftRows` are fused into a single word-producing pass,
//! and `MixColumns` exploits the circulant structure of the AES
//! diffusion matrix so the whole linear layer reduces to shifts,
//! masks, rotates, and XORs. Only the two 256-byte S-boxes are
//! table lookups.

use crate::{Block, InvalidKeyLength, Zeroizing, BLOCK_SIZE};

#[rustfmt::skip]
static SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

#[rustfmt::skip]
static INV_SBOX: [u8; 256] = [
    0x52, 0x09, 0x6a, 0xd5, 0x30, 0x36, 0xa5, 0x38, 0xbf, 0x40, 0xa3, 0x9e, 0x81, 0xf3, 0xd7, 0xfb,
    0x7c, 0xe3, 0x39, 0x82, 0x9b, 0x2f, 0xff, 0x87, 0x34, 0x8e, 0x43, 0x44, 0xc4, 0xde, 0xe9, 0xcb,
    0x54, 0x7b, 0x94, 0x32, 0xa6, 0xc2, 0x23, 0x3d, 0xee, 0x4c, 0x95, 0x0b, 0x42, 0xfa, 0xc3, 0x4e,
    0x08, 0x2e, 0xa1, 0x66, 0x28, 0xd9, 0x24, 0xb2, 0x76, 0x5b, 0xa2, 0x49, 0x6d, 0x8b, 0xd1, 0x25,
    0x72, 0xf8, 0xf6, 0x64, 0x86, 0x68, 0x98, 0x16, 0xd4, 0xa4, 0x5c, 0xcc, 0x5d, 0x65, 0xb6, 0x92,
    0x6c, 0x70, 0x48, 0x50, 0xfd, 0xed, 0xb9, 0xda, 0x5e, 0x15, 0x46, 0x57, 0xa7, 0x8d, 0x9d, 0x84,
    0x90, 0xd8, 0xab, 0x00, 0x8c, 0xbc, 0xd3, 0x0a, 0xf7, 0xe4, 0x58, 0x05, 0xb8, 0xb3, 0x45, 0x06,
    0xd0, 0x2c, 0x1e, 0x8f, 0xca, 0x3f, 0x0f, 0x02, 0xc1, 0xaf, 0xbd, 0x03, 0x01, 0x13, 0x8a, 0x6b,
    0x3a, 0x91, 0x11, 0x41, 0x4f, 0x67, 0xdc, 0xea, 0x97, 0xf2, 0xcf, 0xce, 0xf0, 0xb4, 0xe6, 0x73,
    0x96, 0xac, 0x74, 0x22, 0xe7, 0xad, 0x35, 0x85, 0xe2, 0xf9, 0x37, 0xe8, 0x1c, 0x75, 0xdf, 0x6e,
    0x47, 0xf1, 0x1a, 0x71, 0x1d, 0x29, 0xc5, 0x89, 0x6f, 0xb7, 0x62, 0x0e, 0xaa, 0x18, 0xbe, 0x1b,
    0xfc, 0x56, 0x3e, 0x4b, 0xc6, 0xd2, 0x79, 0x20, 0x9a, 0xdb, 0xc0, 0xfe, 0x78, 0xcd, 0x5a, 0xf4,
    0x1f, 0xdd, 0xa8, 0x33, 0x88, 0x07, 0xc7, 0x31, 0xb1, 0x12, 0x10, 0x59, 0x27, 0x80, 0xec, 0x5f,
    0x60, 0x51, 0x7f, 0xa9, 0x19, 0xb5, 0x4a, 0x0d, 0x2d, 0xe5, 0x7a, 0x9f, 0x93, 0xc9, 0x9c, 0xef,
    0xa0, 0xe0, 0x3b, 0x4d, 0xae, 0x2a, 0xf5, 0xb0, 0xc8, 0xeb, 0xbb, 0x3c, 0x83, 0x53, 0x99, 0x61,
    0x17, 0x2b, 0x04, 0x7e, 0xba, 0x77, 0xd6, 0x26, 0xe1, 0x69, 0x14, 0x63, 0x55, 0x21, 0x0c, 0x7d,
];

/// Multiplies each of the four bytes packed in `w` by the field
/// element `x` (0x02) in GF(2^8), reducing modulo 0x11b.
///
/// All four lanes are computed in parallel with masked shifts;
/// there are no data-dependent branches.
#[inline(always)]
pub fn mul_by_x(w: u32) -> u32 {
    (((w & 0x8080_8080) >> 7) * 0x1b) ^ ((w & 0x7f7f_7f7f) << 1)
}

/// Multiplies each of the four bytes packed in `w` by `x^2`
/// (0x04) in GF(2^8).
///
/// Equivalent to `mul_by_x(mul_by_x(w))` but computed directly
/// from the top two bits of each lane.
#[inline(always)]
pub fn mul_by_x2(w: u32) -> u32 {
    let y = w & 0xc0c0_c0c0;
    (y >> 2) ^ (y >> 3) ^ (y >> 5) ^ (y >> 6) ^ ((w & 0x3f3f_3f3f) << 2)
}

/// `MixColumns` on a single column.
///
/// Applies the circulant matrix `[2,3,1,1; 1,2,3,1; 1,1,2,3;
/// 3,1,1,2]` over GF(2^8) to the four bytes packed in `x`. The
/// circulant structure collapses the sixteen field
/// multiplications into one `mul_by_x` and two rotates.
#[inline(always)]
pub fn mix_columns(x: u32) -> u32 {
    let y = mul_by_x(x) ^ x.rotate_right(16);
    y ^ (x ^ y).rotate_right(8)
}

/// Inverse of [`mix_columns`].
///
/// The inverse matrix `[e,b,d,9; 9,e,b,d; d,9,e,b; b,d,9,e]`
/// factors as the forward matrix times `[5,0,4,0; 0,5,0,4;
/// 4,0,5,0; 0,4,0,5]`, so the inverse is a pre-transform
/// followed by a call to the forward routine. Keeping it a
/// direct call keeps the two provably consistent.
#[inline(always)]
pub fn inv_mix_columns(x: u32) -> u32 {
    let y = mul_by_x2(x);
    mix_columns(x ^ y ^ y.rotate_right(16))
}

/// Fused `SubBytes` + `ShiftRows`, one output column at a time.
///
/// Builds the word for output column `pos` by substituting byte
/// 0 of column `pos`, byte 1 of column `pos+1`, byte 2 of column
/// `pos+2`, and byte 3 of column `pos+3` (mod 4), which is
/// exactly where `ShiftRows` sources them from.
#[inline(always)]
#[allow(
    clippy::indexing_slicing,
    reason = "Column indices are masked to 0..4 and byte values to 0..256."
)]
pub fn subshift(st: &[u32; 4], pos: usize) -> u32 {
    u32::from(SBOX[(st[pos & 3] & 0xff) as usize])
        ^ (u32::from(SBOX[((st[(pos + 1) & 3] >> 8) & 0xff) as usize]) << 8)
        ^ (u32::from(SBOX[((st[(pos + 2) & 3] >> 16) & 0xff) as usize]) << 16)
        ^ (u32::from(SBOX[(st[(pos + 3) & 3] >> 24) as usize]) << 24)
}

/// Inverse of [`subshift`]: fused inverse `ShiftRows` + inverse
/// `SubBytes`, walking the column indices in the opposite
/// direction.
#[inline(always)]
#[allow(
    clippy::indexing_slicing,
    reason = "Column indices are masked to 0..4 and byte values to 0..256."
)]
pub fn inv_subshift(st: &[u32; 4], pos: usize) -> u32 {
    u32::from(INV_SBOX[(st[pos & 3] & 0xff) as usize])
        ^ (u32::from(INV_SBOX[((st[(pos + 3) & 3] >> 8) & 0xff) as usize]) << 8)
        ^ (u32::from(INV_SBOX[((st[(pos + 2) & 3] >> 16) & 0xff) as usize]) << 16)
        ^ (u32::from(INV_SBOX[(st[(pos + 1) & 3] >> 24) as usize]) << 24)
}

/// Substitutes each byte of `w` through the forward S-box.
#[inline(always)]
#[allow(
    clippy::indexing_slicing,
    reason = "Byte values are masked to 0..256."
)]
fn sub_word(w: u32) -> u32 {
    u32::from(SBOX[(w & 0xff) as usize])
        ^ (u32::from(SBOX[((w >> 8) & 0xff) as usize]) << 8)
        ^ (u32::from(SBOX[((w >> 16) & 0xff) as usize]) << 16)
        ^ (u32::from(SBOX[(w >> 24) as usize]) << 24)
}

/// Performs the AES key schedule, writing the expanded key to
/// `rk` as little-endian words.
///
/// `K` and `W` must be one of:
/// - 16 and 44 for AES-128
/// - 24 and 52 for AES-192
/// - 32 and 60 for AES-256
#[allow(
    clippy::indexing_slicing,
    clippy::unwrap_used,
    reason = "The compiler can prove the indices are in bounds."
)]
#[allow(
    clippy::arithmetic_side_effects,
    reason = "The compiler can prove none of the arithmetic overflows."
)]
pub fn key_schedule<const K: usize, const W: usize>(rk: &mut [u32; W], key: &[u8; K]) {
    const {
        assert!((K == 16 && W == 44) || (K == 24 && W == 52) || (K == 32 && W == 60));
    }

    // The first `K/4` words are the key itself.
    for (w, k) in rk.iter_mut().zip(key.chunks_exact(4)) {
        *w = u32::from_le_bytes(k.try_into().unwrap());
    }

    let kwords = K / 4;
    // The round constant advances by multiplication in the
    // field, so it wraps to 0x1b after 0x80 instead of
    // overflowing the byte.
    let mut rc = 1;
    for i in 0..10 {
        let rki = i * kwords;
        let rko = rki + kwords;

        rk[rko] = sub_word(rk[rki + kwords - 1]).rotate_right(8) ^ rc ^ rk[rki];
        rk[rko + 1] = rk[rko] ^ rk[rki + 1];
        rk[rko + 2] = rk[rko + 1] ^ rk[rki + 2];
        rk[rko + 3] = rk[rko + 2] ^ rk[rki + 3];

        if K == 24 {
            // 52 words total: iteration 7 contributes only the
            // first four words of its group.
            if i >= 7 {
                break;
            }
            rk[rko + 4] = rk[rko + 3] ^ rk[rki + 4];
            rk[rko + 5] = rk[rko + 4] ^ rk[rki + 5];
        } else if K == 32 {
            // 60 words total: iteration 6 contributes only the
            // first four words of its group.
            if i >= 6 {
                break;
            }
            // Extra substitution-only step at offset 4, no
            // rotation and no round constant.
            rk[rko + 4] = sub_word(rk[rko + 3]) ^ rk[rki + 4];
            rk[rko + 5] = rk[rko + 4] ^ rk[rki + 5];
            rk[rko + 6] = rk[rko + 5] ^ rk[rki + 6];
            rk[rko + 7] = rk[rko + 6] ^ rk[rki + 7];
        }

        rc = mul_by_x(rc);
    }
}

/// An expanded AES key.
///
/// The variant fixes the round count and the exact number of
/// round-key words (`4 * (rounds + 1)`), so a round-key sequence
/// of the wrong length for its key size cannot be constructed.
/// Immutable once expanded and reusable across any number of
/// blocks.
#[derive(Clone, Debug)]
pub enum RoundKeys {
    /// 44 words, 10 rounds.
    Aes128([u32; 44]),
    /// 52 words, 12 rounds.
    Aes192([u32; 52]),
    /// 60 words, 14 rounds.
    Aes256([u32; 60]),
}

impl RoundKeys {
    /// Returns the number of rounds for this key size.
    #[inline]
    pub fn rounds(&self) -> usize {
        match self {
            Self::Aes128(_) => 10,
            Self::Aes192(_) => 12,
            Self::Aes256(_) => 14,
        }
    }

    /// Returns the round-key words, 4 per round key.
    #[inline]
    pub fn words(&self) -> &[u32] {
        match self {
            Self::Aes128(rk) => rk,
            Self::Aes192(rk) => rk,
            Self::Aes256(rk) => rk,
        }
    }
}

#[cfg(feature = "zeroize")]
impl zeroize::ZeroizeOnDrop for RoundKeys {}

impl Drop for RoundKeys {
    #[inline]
    fn drop(&mut self) {
        #[cfg(feature = "zeroize")]
        {
            use zeroize::Zeroize;
            match self {
                Self::Aes128(rk) => rk.zeroize(),
                Self::Aes192(rk) => rk.zeroize(),
                Self::Aes256(rk) => rk.zeroize(),
            }
        }
    }
}

/// Expands `key` into the full round-key sequence.
///
/// Accepts exactly 16, 24, or 32 key bytes and fails with
/// [`InvalidKeyLength`] for every other length. This is the only
/// fallible operation in the crate; the returned [`RoundKeys`]
/// is valid for [`encrypt`] and [`decrypt`] by construction.
#[allow(
    clippy::unwrap_used,
    reason = "The conversions follow a match on the slice length."
)]
pub fn expand_key(key: &[u8]) -> Result<RoundKeys, InvalidKeyLength> {
    match key.len() {
        16 => {
            let key: &[u8; 16] = key.try_into().unwrap();
            let mut rk = [0; 44];
            key_schedule(&mut rk, key);
            Ok(RoundKeys::Aes128(rk))
        }
        24 => {
            let key: &[u8; 24] = key.try_into().unwrap();
            let mut rk = [0; 52];
            key_schedule(&mut rk, key);
            Ok(RoundKeys::Aes192(rk))
        }
        32 => {
            let key: &[u8; 32] = key.try_into().unwrap();
            let mut rk = [0; 60];
            key_schedule(&mut rk, key);
            Ok(RoundKeys::Aes256(rk))
        }
        _ => Err(InvalidKeyLength),
    }
}

/// Encrypts one block.
#[inline]
pub fn encrypt(out: &mut Block, input: &Block, rk: &RoundKeys) {
    encrypt_with(out, input, rk.words(), rk.rounds());
}

/// Decrypts one block.
#[inline]
pub fn decrypt(out: &mut Block, input: &Block, rk: &RoundKeys) {
    decrypt_with(out, input, rk.words(), rk.rounds());
}

#[inline(always)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    reason = "Blocks are 16 bytes and `RoundKeys` carries 4*(rounds+1) words."
)]
fn load_words(block: &Block) -> [u32; 4] {
    [
        u32::from_le_bytes(block[0..4].try_into().unwrap()),
        u32::from_le_bytes(block[4..8].try_into().unwrap()),
        u32::from_le_bytes(block[8..12].try_into().unwrap()),
        u32::from_le_bytes(block[12..16].try_into().unwrap()),
    ]
}

#[inline(always)]
#[allow(
    clippy::indexing_slicing,
    reason = "Blocks are 16 bytes."
)]
fn store_word(block: &mut Block, pos: usize, w: u32) {
    block[pos * 4..pos * 4 + 4].copy_from_slice(&w.to_le_bytes());
}

#[allow(
    clippy::indexing_slicing,
    reason = "`rk` holds 4*(rounds+1) words; the round-key cursor never passes 4*rounds."
)]
#[allow(
    clippy::arithmetic_side_effects,
    reason = "The cursor arithmetic is bounded by the round count."
)]
fn encrypt_with(out: &mut Block, input: &Block, rk: &[u32], rounds: usize) {
    let mut st0 = load_words(input);
    st0[0] ^= rk[0];
    st0[1] ^= rk[1];
    st0[2] ^= rk[2];
    st0[3] ^= rk[3];

    let mut st1 = [0u32; 4];
    let mut rkp = 4;
    let mut round = 0;
    loop {
        st1[0] = mix_columns(subshift(&st0, 0)) ^ rk[rkp];
        st1[1] = mix_columns(subshift(&st0, 1)) ^ rk[rkp + 1];
        st1[2] = mix_columns(subshift(&st0, 2)) ^ rk[rkp + 2];
        st1[3] = mix_columns(subshift(&st0, 3)) ^ rk[rkp + 3];

        if round == rounds - 2 {
            break;
        }

        st0[0] = mix_columns(subshift(&st1, 0)) ^ rk[rkp + 4];
        st0[1] = mix_columns(subshift(&st1, 1)) ^ rk[rkp + 5];
        st0[2] = mix_columns(subshift(&st1, 2)) ^ rk[rkp + 6];
        st0[3] = mix_columns(subshift(&st1, 3)) ^ rk[rkp + 7];

        rkp += 8;
        round += 2;
    }

    // The last round has no MixColumns.
    store_word(out, 0, subshift(&st1, 0) ^ rk[rkp + 4]);
    store_word(out, 1, subshift(&st1, 1) ^ rk[rkp + 5]);
    store_word(out, 2, subshift(&st1, 2) ^ rk[rkp + 6]);
    store_word(out, 3, subshift(&st1, 3) ^ rk[rkp + 7]);
}

#[allow(
    clippy::indexing_slicing,
    reason = "`rk` holds 4*(rounds+1) words; the round-key cursor never drops below 0."
)]
#[allow(
    clippy::arithmetic_side_effects,
    reason = "The cursor arithmetic is bounded by the round count."
)]
fn decrypt_with(out: &mut Block, input: &Block, rk: &[u32], rounds: usize) {
    let mut rkp = 4 * rounds;

    let mut st0 = load_words(input);
    st0[0] ^= rk[rkp];
    st0[1] ^= rk[rkp + 1];
    st0[2] ^= rk[rkp + 2];
    st0[3] ^= rk[rkp + 3];

    let mut st1 = [0u32; 4];
    let mut round = 0;
    loop {
        rkp -= 8;

        st1[0] = inv_mix_columns(inv_subshift(&st0, 0) ^ rk[rkp + 4]);
        st1[1] = inv_mix_columns(inv_subshift(&st0, 1) ^ rk[rkp + 5]);
        st1[2] = inv_mix_columns(inv_subshift(&st0, 2) ^ rk[rkp + 6]);
        st1[3] = inv_mix_columns(inv_subshift(&st0, 3) ^ rk[rkp + 7]);

        if round == rounds - 2 {
            break;
        }

        st0[0] = inv_mix_columns(inv_subshift(&st1, 0) ^ rk[rkp]);
        st0[1] = inv_mix_columns(inv_subshift(&st1, 1) ^ rk[rkp + 1]);
        st0[2] = inv_mix_columns(inv_subshift(&st1, 2) ^ rk[rkp + 2]);
        st0[3] = inv_mix_columns(inv_subshift(&st1, 3) ^ rk[rkp + 3]);

        round += 2;
    }

    // The last round has no inverse MixColumns.
    store_word(out, 0, inv_subshift(&st1, 0) ^ rk[0]);
    store_word(out, 1, inv_subshift(&st1, 1) ^ rk[1]);
    store_word(out, 2, inv_subshift(&st1, 2) ^ rk[2]);
    store_word(out, 3, inv_subshift(&st1, 3) ^ rk[3]);
}

macro_rules! impl_aes {
    (
        $name:ident,
        $k:literal,
        $w:literal,
        $doc:expr $(,)?
    ) => {
        #[doc = $doc]
        #[derive(Clone, Debug)]
        pub struct $name {
            rk: [u32; $w],
        }

        impl $name {
            /// The size in octets of an AES key.
            pub const KEY_SIZE: usize = $k;

            /// The size in octets of an AES block.
            pub const BLOCK_SIZE: usize = BLOCK_SIZE;

            /// Initializes the AES block cipher.
            pub fn new(key: &[u8; $k]) -> Self {
                let mut rk = [0; $w];
                key_schedule(&mut rk, key);
                Self { rk }
            }

            /// Encrypts one block in place.
            #[inline]
            pub fn encrypt_block(&self, block: &mut Block) {
                let src = Zeroizing::new(*block);
                encrypt_with(block, &src, &self.rk, $w / 4 - 1);
            }

            /// Encrypts one or more blocks in place.
            #[inline]
            pub fn encrypt_blocks(&self, blocks: &mut [Block]) {
                for block in blocks {
                    self.encrypt_block(block);
                }
            }

            /// Decrypts one block in place.
            #[inline]
            pub fn decrypt_block(&self, block: &mut Block) {
                let src = Zeroizing::new(*block);
                decrypt_with(block, &src, &self.rk, $w / 4 - 1);
            }

            /// Decrypts one or more blocks in place.
            #[inline]
            pub fn decrypt_blocks(&self, blocks: &mut [Block]) {
                for block in blocks {
                    self.decrypt_block(block);
                }
            }
        }

        #[cfg(feature = "zeroize")]
        impl zeroize::ZeroizeOnDrop for $name {}

        impl Drop for $name {
            #[inline]
            fn drop(&mut self) {
                #[cfg(feature = "zeroize")]
                // SAFETY: `self` is a flat type and will not be
                // used after the method returns.
                unsafe {
                    zeroize::zeroize_flat_type(self);
                }
            }
        }
    };
}
impl_aes!(Aes128, 16, 44, "AES-128");
impl_aes!(Aes192, 24, 52, "AES-192");
impl_aes!(Aes256, 32, 60, "AES-256");
