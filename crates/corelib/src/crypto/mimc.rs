//! MiMC-x^5 field hash in Miyaguchi-Preneel mode (host face).
//!
//! Round constants: c_0 = Keccak256(label), c_{i+1} = Keccak256(c_i), each
//! reduced into the field. The gadget in `gadgets::hash` evaluates the same
//! rounds as constraints.

use once_cell::sync::Lazy;

use crate::crypto::field::{reduce_bytes_be, Fr};
use crate::crypto::hash::{hash_one_shot, Keccak256};

pub const MIMC_ROUNDS: usize = 110;

/// Domain label agreed for selection commitments.
pub const DEFAULT_DOMAIN: &str = "seed";

static DEFAULT_CONSTANTS: Lazy<Vec<Fr>> = Lazy::new(|| derive_constants(DEFAULT_DOMAIN));

fn derive_constants(label: &str) -> Vec<Fr> {
    let mut out = Vec::with_capacity(MIMC_ROUNDS);
    let mut state = hash_one_shot::<Keccak256>(label.as_bytes());
    for _ in 0..MIMC_ROUNDS {
        out.push(reduce_bytes_be(&state));
        state = hash_one_shot::<Keccak256>(&state);
    }
    out
}

/// Round constants for a domain label.
pub fn round_constants(label: &str) -> Vec<Fr> {
    if label == DEFAULT_DOMAIN {
        DEFAULT_CONSTANTS.clone()
    } else {
        derive_constants(label)
    }
}

fn encrypt(constants: &[Fr], message: &Fr, key: &Fr) -> Fr {
    let mut x = message.clone();
    for c in constants {
        let t = &(&x + key) + c;
        x = t.pow(5);
    }
    x + key
}

/// Streaming MiMC hasher over field elements.
#[derive(Clone, Debug)]
pub struct Mimc {
    constants: Vec<Fr>,
    data: Vec<Fr>,
}

impl Mimc {
    pub fn new(label: &str) -> Self {
        Self {
            constants: round_constants(label),
            data: Vec::new(),
        }
    }

    pub fn write(&mut self, elements: &[Fr]) {
        self.data.extend_from_slice(elements);
    }

    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Digest of everything written so far; does not reset.
    pub fn sum(&self) -> Fr {
        let mut h = Fr::zero();
        for m in &self.data {
            let e = encrypt(&self.constants, m, &h);
            h = &(&e + &h) + m;
        }
        h
    }
}

/// One-shot hash of a single element.
pub fn mimc_hash(label: &str, preimage: &Fr) -> Fr {
    let mut h = Mimc::new(label);
    h.write(std::slice::from_ref(preimage));
    h.sum()
}
