//! Crypto primitives: the BN254 scalar field, byte hashes, and the MiMC
//! field hash used for selection commitments.

pub mod field;
pub mod hash;
pub mod mimc;
