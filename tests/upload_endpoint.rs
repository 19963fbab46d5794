use std::{io::Write, net::TcpListener, path::Path, time::Duration};

use docrag::upload::{
    DocumentType, UploadClient, UploadError, UploadOutcome, render_error, render_outcome,
};
use httpmock::{Method::POST, MockServer};
use serde_json::json;
use tempfile::NamedTempFile;

fn sample_pdf() -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("invoice-")
        .suffix(".pdf")
        .tempfile()
        .expect("temp file");
    file.write_all(b"%PDF-1.4\n%sample\n").expect("write pdf");
    file
}

fn client(endpoint: String, timeout: Duration) -> UploadClient {
    UploadClient::new(endpoint, timeout).expect("client")
}

#[tokio::test]
async fn successful_upload_reports_metadata() {
    let server = MockServer::start_async().await;
    let pdf = sample_pdf();
    let file_name = pdf
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/upload_document")
                .header_exists("content-type")
                .body_contains("name=\"document_type\"")
                .body_contains("invoice")
                .body_contains("application/pdf")
                .body_contains(file_name.as_str());
            then.status(200).json_body(json!({
                "message": "Invoice processed",
                "metadata": {
                    "invoice_id": "INV-100",
                    "seller_name": "Acme",
                    "tax_amount": 19.0
                }
            }));
        })
        .await;

    let outcome = client(server.url("/upload_document"), Duration::from_secs(5))
        .upload(DocumentType::Invoice, pdf.path())
        .await
        .expect("upload");

    mock.assert_async().await;
    let UploadOutcome::Success(response) = &outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(response.message.as_deref(), Some("Invoice processed"));
    let report = render_outcome(&outcome);
    assert!(report.contains("  invoice_id: INV-100\n  seller_name: Acme\n  tax_amount: 19.0"));
}

#[tokio::test]
async fn non_ok_status_is_reported_with_body() {
    let server = MockServer::start_async().await;
    let pdf = sample_pdf();
    server
        .mock_async(|when, then| {
            when.method(POST).path("/upload_document");
            then.status(500).body("extraction backend failed");
        })
        .await;

    let outcome = client(server.url("/upload_document"), Duration::from_secs(5))
        .upload(DocumentType::Contract, pdf.path())
        .await
        .expect("server reached");

    let report = render_outcome(&outcome);
    assert!(report.contains("❌ Error: 500"));
    assert!(report.contains("extraction backend failed"));
}

#[tokio::test]
async fn missing_file_never_reaches_the_network() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "message": "ok", "metadata": {} }));
        })
        .await;

    let missing = Path::new("/definitely/not/here/contract.pdf");
    let error = client(server.url("/upload_document"), Duration::from_secs(5))
        .upload(DocumentType::Contract, missing)
        .await
        .expect_err("missing file");

    assert!(matches!(error, UploadError::FileNotFound(_)));
    assert!(render_error(&error).contains("File not found: /definitely/not/here/contract.pdf"));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn unreachable_server_is_a_connect_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let pdf = sample_pdf();

    let error = client(
        format!("http://127.0.0.1:{port}/upload_document"),
        Duration::from_secs(5),
    )
    .upload(DocumentType::Invoice, pdf.path())
    .await
    .expect_err("nothing is listening");

    assert!(matches!(error, UploadError::Connect { .. }), "got {error:?}");
    let report = render_error(&error);
    assert!(report.contains("Could not connect to API"));
    assert!(!report.contains("timed out"));
}

#[tokio::test]
async fn dropped_connection_is_a_connect_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let acceptor = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.expect("accept");
        drop(socket);
    });
    let pdf = sample_pdf();

    let error = client(
        format!("http://127.0.0.1:{port}/upload_document"),
        Duration::from_secs(5),
    )
    .upload(DocumentType::Contract, pdf.path())
    .await
    .expect_err("connection is closed without a response");
    acceptor.await.expect("acceptor task");

    assert!(matches!(error, UploadError::Connect { .. }), "got {error:?}");
    let report = render_error(&error);
    assert!(report.contains("Could not connect to API"));
    assert!(!report.contains("Upload request failed"));
}

#[tokio::test]
async fn slow_server_is_a_timeout_error() {
    let server = MockServer::start_async().await;
    let pdf = sample_pdf();
    server
        .mock_async(|when, then| {
            when.method(POST).path("/upload_document");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({ "message": "late", "metadata": {} }));
        })
        .await;

    let error = client(server.url("/upload_document"), Duration::from_millis(200))
        .upload(DocumentType::Invoice, pdf.path())
        .await
        .expect_err("request should time out");

    assert!(matches!(error, UploadError::Timeout { .. }), "got {error:?}");
    let report = render_error(&error);
    assert!(report.contains("timed out"));
    assert!(report.contains("Network connectivity issues"));
    assert!(!report.contains("Could not connect"));
}
