use serde_json::{json, Value};
use std::process::{Command, Output};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn document_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/workflows/wf-1/documents/preview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "placeholders": {"nome_impianto": "Cascina Nord"},
            "missing": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/workflows/wf-1/documents/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "doc-1",
            "download_url": "http://files.local/doc-1.pdf",
            "format": "pdf"
        })))
        .mount(&server)
        .await;
    server
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_plantflow(server: &MockServer, args: &[&str]) -> Output {
    let workspace = TempDir::new().unwrap();
    let workspace_path = workspace.path().to_path_buf();
    let base_url = server.uri();
    let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();

    let output = tokio::task::spawn_blocking(move || {
        Command::new(assert_cmd::cargo::cargo_bin!("plantflow"))
            .arg("--workspace")
            .arg(&workspace_path)
            .args(&args)
            .env("PLANTFLOW_API_BASE_URL", base_url)
            .env_remove("PLANTFLOW_CATALOG_FILE")
            .output()
            .expect("should run successfully")
    })
    .await
    .unwrap();
    drop(workspace);
    output
}

#[tokio::test(flavor = "multi_thread")]
async fn test_document_json_output_is_a_single_value() {
    let server = document_server().await;
    let output = run_plantflow(&server, &["--json", "document", "wf-1", "tpl-1", "--format", "pdf"]).await;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = std::str::from_utf8(&output.stdout).unwrap();
    let value: Value = serde_json::from_str(stdout).unwrap();
    assert_eq!(value["preview"]["placeholders"]["nome_impianto"], json!("Cascina Nord"));
    assert_eq!(value["document"]["id"], json!("doc-1"));
    assert_eq!(value["document"]["format"], json!("pdf"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_document_preview_only_json_has_no_document() {
    let server = document_server().await;
    let output = run_plantflow(&server, &["--json", "document", "wf-1", "tpl-1", "--preview-only"]).await;
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value.get("preview").is_some());
    assert!(value.get("document").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_document_text_output_shows_preview_then_result() {
    let server = document_server().await;
    let output = run_plantflow(&server, &["document", "wf-1", "tpl-1", "--format", "pdf"]).await;
    assert!(output.status.success());

    let stdout = std::str::from_utf8(&output.stdout).unwrap();
    let preview_at = stdout.find("nome_impianto = Cascina Nord").unwrap();
    let generated_at = stdout.find("Generated doc-1 (pdf)").unwrap();
    assert!(preview_at < generated_at);
}
