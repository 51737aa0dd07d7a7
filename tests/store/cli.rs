use std::path::Path;
use std::process::{Command, Output};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tempfile::TempDir;

use super::support::{leaf_der, TestCertificate};

fn pfx_store(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pfx-store"))
        .args(args)
        .current_dir(cwd)
        .env_remove("PFX_STORE_PACKAGER")
        .env_remove("PFX_STORE_PASSPHRASE")
        .env_remove("PFX_STORE_PACKAGING_TIMEOUT_SECONDS")
        .env_remove("PFX_STORE_OPENSSL_PATH")
        .env_remove("RUST_LOG")
        .output()
        .expect("run pfx-store")
}

fn tls_manifest(namespace: &str, name: &str, certificate: &TestCertificate) -> String {
    format!(
        concat!(
            "apiVersion: v1\nkind: Secret\n",
            "metadata:\n  name: \"{name}\"\n  namespace: \"{namespace}\"\n",
            "type: kubernetes.io/tls\ndata:\n  tls.crt: {}\n  tls.key: {}\n",
        ),
        STANDARD.encode(&certificate.cert_pem),
        STANDARD.encode(&certificate.key_pem),
        name = name,
        namespace = namespace,
    )
}

#[test]
fn convert_writes_one_file_per_secret_and_inspect_reads_it() {
    let workdir = TempDir::new().unwrap();
    let a = TestCertificate::generate("a.example.com");
    let b = TestCertificate::generate("b.example.com");
    let manifest = format!(
        "{}---\n{}",
        tls_manifest("default", "tls-a", &a),
        tls_manifest("edge", "tls-b", &b)
    );
    std::fs::write(workdir.path().join("secrets.yaml"), manifest).unwrap();

    let output = pfx_store(&["convert", "secrets.yaml", "--out-dir", "out"], workdir.path());
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let written = std::fs::read(workdir.path().join("out/default_tls-a.pfx")).unwrap();
    assert_eq!(leaf_der(&written), a.der);
    let written = std::fs::read(workdir.path().join("out/edge_tls-b.pfx")).unwrap();
    assert_eq!(leaf_der(&written), b.der);

    let output = pfx_store(&["inspect", "out/default_tls-a.pfx", "--json"], workdir.path());
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["alias"], "tls");
    assert_eq!(summary["chain_length"], 1);
}

#[test]
fn convert_fails_when_any_secret_fails() {
    let workdir = TempDir::new().unwrap();
    let good = TestCertificate::generate("good.example.com");
    let manifest = format!(
        "{}---\nkind: Secret\nmetadata:\n  name: plain\nstringData:\n  password: hunter2\n",
        tls_manifest("default", "good", &good)
    );
    std::fs::write(workdir.path().join("secrets.yaml"), manifest).unwrap();

    let output = pfx_store(
        &["convert", "secrets.yaml", "--out-dir", "out", "--output", "json"],
        workdir.path(),
    );

    assert!(!output.status.success());
    assert!(workdir.path().join("out/default_good.pfx").exists());
    assert!(!workdir.path().join("out/default_plain.pfx").exists());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["converted"], true);
    assert_eq!(reports[1]["converted"], false);
    assert!(reports[1]["error"].as_str().unwrap().contains("Opaque"));
}

#[test]
fn inspect_with_wrong_passphrase_fails() {
    let workdir = TempDir::new().unwrap();
    let certificate = TestCertificate::generate("a.example.com");
    let manifest = tls_manifest("default", "tls-a", &certificate);
    std::fs::write(workdir.path().join("s.yaml"), manifest).unwrap();

    let output = pfx_store(&["convert", "s.yaml", "--out-dir", "."], workdir.path());
    assert!(output.status.success());

    let output = Command::new(env!("CARGO_BIN_EXE_pfx-store"))
        .args(["inspect", "default_tls-a.pfx"])
        .current_dir(workdir.path())
        .env("PFX_STORE_PASSPHRASE", "something-else")
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn convert_refuses_names_that_escape_the_output_directory() {
    let workdir = TempDir::new().unwrap();
    let certificate = TestCertificate::generate("escape.example.com");
    let manifest = tls_manifest("default", "../../escaped", &certificate);
    std::fs::write(workdir.path().join("secrets.yaml"), manifest).unwrap();

    let output = pfx_store(&["convert", "secrets.yaml", "--out-dir", "out/nested"], workdir.path());

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("DNS-1123"));
    assert!(!workdir.path().join("default_../../escaped.pfx").exists());
    assert!(!workdir.path().join("escaped.pfx").exists());
    assert!(!workdir.path().join("out").exists());
}
