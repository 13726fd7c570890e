//! Deterministic proof header + body format and helpers.

use serde::{Deserialize, Serialize};

use crate::crypto::field::Fr;
use crate::crypto::hash::hash64;
use crate::errors::ProofError;

/// Magic/version
pub const MAGIC: [u8; 4] = *b"IRSP";
pub const VERSION: u32 = 1;
pub const HEADER_LEN: usize = 40;
pub const ELEMENT_LEN: usize = 32;

/// Fixed-size header (little endian).
/// Layout (bytes):
/// 0..4   MAGIC "IRSP"
/// 4..8   VERSION (u32)
/// 8..16  engine_id_hash (u64)
///16..24  cs_digest_hash (u64)  -- binds the compiled constraint system
///24..32  pubio_hash (u64)      -- hash of the encoded public inputs
///32..40  body_len (u64)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProofHeader {
    pub engine_id_hash: u64,
    pub cs_digest_hash: u64,
    pub pubio_hash: u64,
    pub body_len: u64,
}

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(buf)
}

impl ProofHeader {
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&MAGIC);
        out[4..8].copy_from_slice(&VERSION.to_le_bytes());
        out[8..16].copy_from_slice(&self.engine_id_hash.to_le_bytes());
        out[16..24].copy_from_slice(&self.cs_digest_hash.to_le_bytes());
        out[24..32].copy_from_slice(&self.pubio_hash.to_le_bytes());
        out[32..40].copy_from_slice(&self.body_len.to_le_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProofError> {
        if bytes.len() < HEADER_LEN {
            return Err(ProofError::Malformed("proof too short for header".into()));
        }
        if bytes[0..4] != MAGIC {
            return Err(ProofError::Malformed("bad magic".into()));
        }
        let ver = bytes[4..8]
            .try_into()
            .map(u32::from_le_bytes)
            .map_err(|_| ProofError::Malformed("truncated version".into()))?;
        if ver != VERSION {
            return Err(ProofError::Malformed(format!("unsupported proof version {ver}")));
        }
        Ok(ProofHeader {
            engine_id_hash: read_u64(bytes, 8),
            cs_digest_hash: read_u64(bytes, 16),
            pubio_hash: read_u64(bytes, 24),
            body_len: read_u64(bytes, 32),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub header: ProofHeader,
    pub body: Vec<u8>,
}

impl Proof {
    /// Encode full proof: header(40) + body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(HEADER_LEN + self.body.len());
        v.extend_from_slice(&self.header.encode());
        v.extend_from_slice(&self.body);
        v
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProofError> {
        let header = ProofHeader::decode(bytes)?;
        let body = &bytes[HEADER_LEN..];
        if body.len() as u64 != header.body_len {
            return Err(ProofError::Malformed(format!(
                "body length {} does not match header {}",
                body.len(),
                header.body_len
            )));
        }
        Ok(Proof {
            header,
            body: body.to_vec(),
        })
    }
}

pub fn engine_id_hash(engine_id: &str) -> u64 {
    hash64("IRISID.ENGINE", engine_id.as_bytes())
}

pub fn cs_digest_hash(digest: &[u8; 32]) -> u64 {
    hash64("IRISID.CS", digest)
}

pub fn pubio_hash(public: &[Fr]) -> u64 {
    hash64("IRISID.PUBIO", &encode_elements(public))
}

/// 32-byte big-endian field elements, concatenated.
pub fn encode_elements(elements: &[Fr]) -> Vec<u8> {
    let mut out = Vec::with_capacity(elements.len() * ELEMENT_LEN);
    for e in elements {
        out.extend_from_slice(&e.to_bytes_be());
    }
    out
}

pub fn decode_elements(bytes: &[u8]) -> Result<Vec<Fr>, ProofError> {
    if bytes.len() % ELEMENT_LEN != 0 {
        return Err(ProofError::Malformed(format!(
            "body length {} is not a multiple of {ELEMENT_LEN}",
            bytes.len()
        )));
    }
    bytes
        .chunks_exact(ELEMENT_LEN)
        .enumerate()
        .map(|(i, chunk)| {
            let mut buf = [0u8; ELEMENT_LEN];
            buf.copy_from_slice(chunk);
            Fr::from_bytes_be_canonical(&buf)
                .ok_or_else(|| ProofError::Malformed(format!("element {i} is not canonical")))
        })
        .collect()
}
