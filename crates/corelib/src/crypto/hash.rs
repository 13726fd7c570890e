//! Byte-oriented hash primitives: a streaming trait with BLAKE3 and
//! Keccak-256 implementations plus labeled helpers.
//!
//! BLAKE3 binds constraint systems and proofs; Keccak-256 derives MiMC
//! round constants.

use tiny_keccak::{Hasher as _, Keccak};

/// A streaming hash with fixed-size 32-byte digests.
pub trait Hash32 {
    fn new() -> Self
    where
        Self: Sized;
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> [u8; 32];
}

pub struct Blake3 {
    inner: blake3::Hasher,
}

impl Hash32 for Blake3 {
    fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize(self) -> [u8; 32] {
        *self.inner.finalize().as_bytes()
    }
}

pub struct Keccak256 {
    inner: Keccak,
}

impl Hash32 for Keccak256 {
    fn new() -> Self {
        Self {
            inner: Keccak::v256(),
        }
    }

    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.inner.finalize(&mut out);
        out
    }
}

pub fn hash_one_shot<H: Hash32>(data: &[u8]) -> [u8; 32] {
    let mut h = H::new();
    h.update(data);
    h.finalize()
}

/// Domain-separated hashing: H(len(label) || label || data)
pub fn hash_labeled<H: Hash32>(label: &str, data: &[u8]) -> [u8; 32] {
    let mut h = H::new();
    h.update(&(label.len() as u64).to_le_bytes());
    h.update(label.as_bytes());
    h.update(data);
    h.finalize()
}

/// Labeled BLAKE3 truncated to the first 8 bytes (little-endian).
pub fn hash64(label: &str, data: &[u8]) -> u64 {
    let digest = hash_labeled::<Blake3>(label, data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
