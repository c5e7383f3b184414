#![cfg(test)]

use hex_literal::hex;
use serde::Deserialize;

pub(crate) type TestCase<const N: usize> = ([u8; N], [u8; 16], [u8; 16]);

pub(crate) static AES_128_TESTS: &[TestCase<16>] = &[
    (
        hex!("2b7e151628aed2a6abf7158809cf4f3c"),
        hex!("3243f6a8885a308d313198a2e0370734"),
        hex!("3925841d02dc09fbdc118597196a0b32"),
    ),
    (
        hex!("000102030405060708090a0b0c0d0e0f"),
        hex!("00112233445566778899aabbccddeeff"),
        hex!("69c4e0d86a7b0430d8cdb78070b4c55a"),
    ),
];

pub(crate) static AES_192_TESTS: &[TestCase<24>] = &[(
    hex!("000102030405060708090a0b0c0d0e0f1011121314151617"),
    hex!("00112233445566778899aabbccddeeff"),
    hex!("dda97ca4864cdfe06eaf70a0ec0d7191"),
)];

pub(crate) static AES_256_TESTS: &[TestCase<32>] = &[(
    hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"),
    hex!("00112233445566778899aabbccddeeff"),
    hex!("8ea2b7ca516745bfeafc49904b496089"),
)];

/// Deterministic xorshift64 generator for test data.
pub(crate) struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        assert_ne!(seed, 0);
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    pub fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    pub fn fill(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl TestVectors {
    pub fn load() -> Self {
        static DATA: &str =
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/vectors.json"));
        serde_json::from_str(DATA).unwrap()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TestVectors {
    pub test_groups: Vec<TestGroup>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TestGroup {
    pub description: String,
    pub tests: Vec<KnownAnswer>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KnownAnswer {
    pub tc_id: usize,
    #[serde(with = "hex::serde")]
    pub key: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub pt: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub ct: Vec<u8>,
}

macro_rules! impl_kat {
    ($name:ident, $aes:ty) => {
        #[test]
        fn $name() {
            use $crate::tests::{KnownAnswer, TestVectors};
            use $crate::{Block, BLOCK_SIZE};

            let vectors = TestVectors::load();
            for group in vectors.test_groups {
                let desc = &group.description;
                for KnownAnswer { tc_id, key, pt, ct } in group.tests {
                    let aes = <$aes>::new(&key);

                    let mut blocks: Vec<Block> = pt
                        .chunks_exact(BLOCK_SIZE)
                        .map(|c| c.try_into().unwrap())
                        .collect();
                    assert_eq!(blocks.len() * BLOCK_SIZE, pt.len(), "{desc} #{tc_id}");

                    for block in blocks.iter_mut() {
                        aes.encrypt_block(block);
                    }
                    assert_eq!(blocks.concat(), ct, "{desc} #{tc_id}");

                    for block in blocks.iter_mut() {
                        aes.decrypt_block(block);
                    }
                    assert_eq!(blocks.concat(), pt, "{desc} #{tc_id}");

                    aes.encrypt_blocks(&mut blocks);
                    assert_eq!(blocks.concat(), ct, "{desc} #{tc_id}");

                    aes.decrypt_blocks(&mut blocks);
                    assert_eq!(blocks.concat(), pt, "{desc} #{tc_id}");
                }
            }
        }
    };
}
pub(crate) use impl_kat;

macro_rules! impl_test_aes {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        enum $name {
            Aes128(Aes128),
            Aes192(Aes192),
            Aes256(Aes256),
        }
        impl $name {
            pub fn new(key: &[u8]) -> Self {
                match key.len() {
                    16 => Self::Aes128(Aes128::new(key.try_into().unwrap())),
                    24 => Self::Aes192(Aes192::new(key.try_into().unwrap())),
                    32 => Self::Aes256(Aes256::new(key.try_into().unwrap())),
                    n => panic!("invalid key length: {n}"),
                }
            }

            pub fn encrypt_block(&self, block: &mut Block) {
                match self {
                    Self::Aes128(aes) => aes.encrypt_block(block),
                    Self::Aes192(aes) => aes.encrypt_block(block),
                    Self::Aes256(aes) => aes.encrypt_block(block),
                }
            }

            pub fn encrypt_blocks(&self, blocks: &mut [Block]) {
                match self {
                    Self::Aes128(aes) => aes.encrypt_blocks(blocks),
                    Self::Aes192(aes) => aes.encrypt_blocks(blocks),
                    Self::Aes256(aes) => aes.encrypt_blocks(blocks),
                }
            }

            pub fn decrypt_block(&self, block: &mut Block) {
                match self {
                    Self::Aes128(aes) => aes.decrypt_block(block),
                    Self::Aes192(aes) => aes.decrypt_block(block),
                    Self::Aes256(aes) => aes.decrypt_block(block),
                }
            }

            pub fn decrypt_blocks(&self, blocks: &mut [Block]) {
                match self {
                    Self::Aes128(aes) => aes.decrypt_blocks(blocks),
                    Self::Aes192(aes) => aes.decrypt_blocks(blocks),
                    Self::Aes256(aes) => aes.decrypt_blocks(blocks),
                }
            }
        }
    };
}
pub(crate) use impl_test_aes;
