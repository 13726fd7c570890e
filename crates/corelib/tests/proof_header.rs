use irisid_corelib::proof::{
    cs_digest_hash, engine_id_hash, pubio_hash, Proof, ProofHeader, HEADER_LEN,
};
use irisid_corelib::{Fr, ProofError};

#[test]
fn header_roundtrip() {
    let hdr = ProofHeader {
        engine_id_hash: engine_id_hash("native@0.1"),
        cs_digest_hash: cs_digest_hash(&[7u8; 32]),
        pubio_hash: pubio_hash(&[Fr::from_u64(1), Fr::from_u64(2)]),
        body_len: 8,
    };
    let enc = hdr.encode();
    assert_eq!(enc.len(), HEADER_LEN);
    assert_eq!(ProofHeader::decode(&enc).unwrap(), hdr);
}

#[test]
fn header_rejects_bad_magic_or_version() {
    let mut enc = ProofHeader {
        engine_id_hash: 1,
        cs_digest_hash: 2,
        pubio_hash: 3,
        body_len: 0,
    }
    .encode();
    enc[4] = 9;
    assert!(matches!(ProofHeader::decode(&enc), Err(ProofError::Malformed(_))));
    enc[4] = 1;
    enc[0] = b'X';
    assert!(matches!(Proof::from_bytes(&enc), Err(ProofError::Malformed(_))));
}

#[test]
fn public_input_order_matters() {
    let a = [Fr::from_u64(1), Fr::from_u64(2)];
    let b = [Fr::from_u64(2), Fr::from_u64(1)];
    assert_ne!(pubio_hash(&a), pubio_hash(&b));
}
