use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn vulngate(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vulngate"));
    cmd.current_dir(dir)
        .env_remove("HF_TOKEN")
        .env_remove("HF_MODEL")
        .env_remove("HF_API_BASE")
        .env_remove("MAX_DIFF_CHARS")
        .env_remove("RUST_LOG");
    cmd
}

fn run_against(server: &MockServer, dir: &Path, diff: &str) -> Output {
    std::fs::write(dir.join("pr.diff"), diff).unwrap();
    vulngate(dir)
        .arg("pr.diff")
        .env("HF_TOKEN", "hf_test")
        .env("HF_MODEL", "org/model")
        .env("HF_API_BASE", server.uri())
        .output()
        .unwrap()
}

async fn server_answering(body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/org/model"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[test]
fn missing_argument_prints_usage_and_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let output = vulngate(dir.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "stdout: {stdout}");
    assert!(!dir.path().join("result.txt").exists());
}

#[test]
fn extra_argument_prints_usage_and_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let output = vulngate(dir.path()).args(["a.diff", "b.diff"]).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(!dir.path().join("result.txt").exists());
}

#[test]
fn missing_token_aborts_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pr.diff"), "+eval(input)\n").unwrap();

    let output = vulngate(dir.path())
        .arg("pr.diff")
        .env("HF_API_BASE", "http://127.0.0.1:9")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("HF_TOKEN"));
    assert!(!dir.path().join("result.txt").exists());
}

#[test]
fn whitespace_diff_passes_despite_invalid_max_diff_chars() {
    for bad in ["0", "abc"] {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pr.diff"), "  \n").unwrap();

        let output = vulngate(dir.path())
            .arg("pr.diff")
            .env("MAX_DIFF_CHARS", bad)
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(0), "MAX_DIFF_CHARS={bad}");
        assert!(String::from_utf8_lossy(&output.stdout).contains("PASS (empty diff)"));
        let artifact = std::fs::read_to_string(dir.path().join("result.txt")).unwrap();
        assert_eq!(artifact, "PASS\nEmpty diff.\n");
    }
}

#[test]
fn whitespace_diff_passes_despite_malformed_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".vulngate.toml"), "{{not toml").unwrap();
    std::fs::write(dir.path().join("pr.diff"), "\t\n").unwrap();

    let output = vulngate(dir.path()).arg("pr.diff").output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let artifact = std::fs::read_to_string(dir.path().join("result.txt")).unwrap();
    assert_eq!(artifact, "PASS\nEmpty diff.\n");
}

#[test]
fn invalid_max_diff_chars_aborts_non_empty_diff() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pr.diff"), "+x\n").unwrap();

    let output = vulngate(dir.path())
        .arg("pr.diff")
        .env("HF_TOKEN", "hf_test")
        .env("HF_API_BASE", "http://127.0.0.1:9")
        .env("MAX_DIFF_CHARS", "abc")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("MAX_DIFF_CHARS"));
    assert!(!dir.path().join("result.txt").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn whitespace_diff_passes_without_calling_service() {
    let server = server_answering(json!([{ "generated_text": "FAIL" }])).await;
    let dir = tempfile::tempdir().unwrap();

    let output = run_against(&server, dir.path(), "  \n\n\t");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("PASS (empty diff)"));
    let artifact = std::fs::read_to_string(dir.path().join("result.txt")).unwrap();
    assert_eq!(artifact, "PASS\nEmpty diff.\n");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn fail_answer_exits_one() {
    let server = server_answering(json!([{ "generated_text": "FAIL" }])).await;
    let dir = tempfile::tempdir().unwrap();

    let output = run_against(&server, dir.path(), "+os.system(request.args['cmd'])\n");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Raw model output:"));
    assert!(stdout.contains("Decision: FAIL"));
    let artifact = std::fs::read_to_string(dir.path().join("result.txt")).unwrap();
    assert_eq!(artifact, "FAIL\nMODEL: org/model\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn pass_token_suppresses_fail() {
    let server =
        server_answering(json!({ "generated_text": "I think this is safe. PASS." })).await;
    let dir = tempfile::tempdir().unwrap();

    let output = run_against(&server, dir.path(), "+println!(\"hi\");\n");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Decision: PASS"));
    let artifact = std::fs::read_to_string(dir.path().join("result.txt")).unwrap();
    assert_eq!(artifact.lines().next(), Some("PASS"));
}

#[tokio::test(flavor = "multi_thread")]
async fn service_error_aborts_without_artifact() {
    let server = server_answering(json!({ "error": "model loading" })).await;
    let dir = tempfile::tempdir().unwrap();

    let output = run_against(&server, dir.path(), "+x\n");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("model loading"));
    assert!(!dir.path().join("result.txt").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn config_file_sets_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/org/from-file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": "PASS" }])))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".vulngate.toml"),
        format!("[inference]\nmodel = \"org/from-file\"\nbase_url = \"{}\"\n", server.uri()),
    )
    .unwrap();
    std::fs::write(dir.path().join("pr.diff"), "+x\n").unwrap();

    let output = vulngate(dir.path())
        .arg("pr.diff")
        .env("HF_TOKEN", "hf_test")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let artifact = std::fs::read_to_string(dir.path().join("result.txt")).unwrap();
    assert_eq!(artifact, "PASS\nMODEL: org/from-file\n");
}
