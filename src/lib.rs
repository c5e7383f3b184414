//! Size-optimized AES.
//!
//! This crate implements the AES (Rijndael) block cipher for
//! 128-, 192-, and 256-bit keys in a compact form: the only
//! lookup tables are the two 256-byte substitution boxes, and
//! the linear layer is computed with word-level bit tricks
//! instead of the usual 4 KiB multiplication tables. It targets
//! environments where code size matters more than throughput.
//!
//! All control flow depends only on the key size, which is
//! public. The S-box lookups remain a cache-timing side channel;
//! this is a deliberate size/speed tradeoff, not an oversight.
//! Use a bitsliced or hardware implementation if that channel
//! matters to you.
//!
//! # Warning
//!
//! This is low-level cryptography. It must only be used for
//! implementing high-level constructions. Do NOT use this code
//! unless you know exactly what you are doing. If in doubt, use
//! [`aes-gcm`] instead.
//!
//! [`aes-gcm`]: https://crates.io/crates/aes-gcm

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(test, doctest, feature = "std")), no_std)]

use core::fmt;

pub mod aes;
mod tests;

pub use aes::{decrypt, encrypt, expand_key, Aes128, Aes192, Aes256, RoundKeys};

/// The size in bytes of an AES block.
pub const BLOCK_SIZE: usize = 16;

/// An AES block.
pub type Block = [u8; BLOCK_SIZE];

/// The key was not 16, 24, or 32 bytes long.
///
/// Returned by [`expand_key`]; the only recoverable error in
/// this crate.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct InvalidKeyLength;

impl fmt::Display for InvalidKeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid AES key length")
    }
}

impl core::error::Error for InvalidKeyLength {}

cfg_if::cfg_if! {
    if #[cfg(feature = "zeroize")] {
        pub(crate) use zeroize::Zeroizing;
    } else {
        pub(crate) struct Zeroizing<T>(core::marker::PhantomData<T>);
        impl<T> Zeroizing<T> {
            #[inline(always)]
            pub fn new(v: T) -> T {
                v
            }
        }
    }
}
