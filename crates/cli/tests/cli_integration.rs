use std::fs;
use std::process::Command;

use serde_json::Value;
use tempfile::tempdir;

const BIN: &str = env!("CARGO_BIN_EXE_irisd");

fn run(args: &[&str]) -> (i32, String, String) {
    let out = Command::new(BIN).args(args).output().expect("run");
    let code = out.status.code().unwrap_or(-1);
    (
        code,
        String::from_utf8_lossy(&out.stdout).into_owned(),
        String::from_utf8_lossy(&out.stderr).into_owned(),
    )
}

fn json(s: &str) -> Value {
    serde_json::from_str(s).expect("json output")
}

#[test]
fn select_reports_bounded_index() {
    let (code, out, _) = run(&["select", "--preimage", "42"]);
    assert_eq!(code, 0);
    let v = json(&out);
    assert_eq!(v["max"], 72);
    assert!(v["index"].as_u64().unwrap() < 72);
    assert!(v["hash"].is_string());
}

#[test]
fn prove_then_verify_and_reject_tampering() {
    let dir = tempdir().unwrap();
    let proof = dir.path().join("sel.proof");
    let proof_s = proof.to_str().unwrap();

    let (code, out, err) = run(&["prove", "--preimage", "7", "--max", "16", "-o", proof_s]);
    assert_eq!(code, 0, "prove failed: {err}");
    let report = json(&out);
    let hash = report["hash"].as_str().unwrap().to_string();
    let index = report["index"].as_u64().unwrap().to_string();

    let (code, out, _) = run(&[
        "verify", "-p", proof_s, "--hash", &hash, "--index", &index, "--max", "16",
    ]);
    assert_eq!(code, 0);
    assert_eq!(json(&out)["valid"], true);

    let wrong = ((index.parse::<u64>().unwrap() + 1) % 16).to_string();
    let (code, _, _) = run(&[
        "verify", "-p", proof_s, "--hash", &hash, "--index", &wrong, "--max", "16",
    ]);
    assert_eq!(code, 4);

    // Corrupt the body: still parses, no longer verifies.
    let mut bytes = fs::read(&proof).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 1;
    fs::write(&proof, &bytes).unwrap();
    let (code, _, _) = run(&[
        "verify", "-p", proof_s, "--hash", &hash, "--index", &index, "--max", "16",
    ]);
    assert_eq!(code, 4);
}

#[test]
fn fraction_operations() {
    let (code, out, _) = run(&["fraction", "add", "0.1", "0.5"]);
    assert_eq!(code, 0);
    let v = json(&out);
    assert_eq!(v["display"], "3/5");
    assert_eq!(v["decimal"], "0.6");

    let (_, out, _) = run(&["fraction", "mod", "5", "2"]);
    assert_eq!(json(&out)["display"], "1/1");

    let (_, out, _) = run(&["fraction", "floor", "-1.5"]);
    assert_eq!(json(&out)["numerator"], "-2");

    let (code, _, err) = run(&["fraction", "div", "1", "0"]);
    assert_eq!(code, 1);
    assert!(err.contains("division by zero"));
}

#[test]
fn config_file_sets_bound() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("irisd.toml");
    fs::write(&cfg, "[selection]\nmax = 5\n").unwrap();
    let (code, out, _) = run(&["--config", cfg.to_str().unwrap(), "select", "--preimage", "9"]);
    assert_eq!(code, 0);
    assert_eq!(json(&out)["max"], 5);

    fs::write(&cfg, "[selection]\nmax = 0\n").unwrap();
    let (code, _, _) = run(&["--config", cfg.to_str().unwrap(), "info"]);
    assert_eq!(code, 1);
}

#[test]
fn info_lists_native_engine() {
    let (code, out, _) = run(&["info"]);
    assert_eq!(code, 0);
    let v = json(&out);
    assert_eq!(v["engine"], "native@0.1");
    assert_eq!(v["capabilities"]["curves"][0], "bn254");
    assert_eq!(v["capabilities"]["zero_knowledge"], false);
}
