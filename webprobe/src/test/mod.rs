//! End-to-end tests: real reqwest client against a wiremock server.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::DefaultPaths;
use crate::form::{FormInputs, OutputTarget, SelectedFile};
use crate::{Action, ActionContext, ActionRegistry, ReqwestHttpClient};

fn registry_for(base_url: &str) -> ActionRegistry<ReqwestHttpClient> {
    ActionRegistry::new(ActionContext::new(
        ReqwestHttpClient::new(),
        Url::parse(base_url).unwrap(),
        DefaultPaths::default(),
    ))
}

#[test_log::test(tokio::test)]
async fn test_upload_file_sends_raw_bytes_with_declared_length() {
    let server = MockServer::start().await;
    let data = vec![0u8, 159, 146, 150, 255];

    Mock::given(method("POST"))
        .and(path("/upload/my.bin"))
        .and(header("content-type", "application/octet-stream"))
        .and(header("content-length", "5"))
        .and(body_bytes(data.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_raw("stored 5 bytes", "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server.uri());
    let inputs = FormInputs {
        upload_file: Some(SelectedFile::new("blob.bin", data)),
        ..Default::default()
    };

    let rendered = registry.invoke(Action::UploadFile, &inputs).await;
    assert_eq!(rendered, "Status: 201 Created\nstored 5 bytes");
}

#[test_log::test(tokio::test)]
async fn test_upload_file_without_selection_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let registry = registry_for(&server.uri());
    let rendered = registry.invoke(Action::UploadFile, &FormInputs::default()).await;

    assert_eq!(rendered, "Choose a file first");
    assert_eq!(
        registry.board().read(OutputTarget::UploadFileResult).as_deref(),
        Some("Choose a file first")
    );
}

#[test_log::test(tokio::test)]
async fn test_upload_text_declares_utf8_byte_length() {
    let server = MockServer::start().await;
    let text = "naïve café ☕";

    Mock::given(method("POST"))
        .and(path("/upload/note.txt"))
        .and(header("content-type", "text/plain; charset=UTF-8"))
        .and(header("content-length", text.len().to_string().as_str()))
        .respond_with(ResponseTemplate::new(201).set_body_raw("ok", "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server.uri());
    let inputs = FormInputs {
        text_body: Some(text.to_string()),
        ..Default::default()
    };

    let rendered = registry.invoke(Action::UploadText, &inputs).await;
    assert_eq!(rendered, "Status: 201 Created\nok");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, text.as_bytes());
    assert!(requests[0].body.len() > text.chars().count());
}

#[test_log::test(tokio::test)]
async fn test_fetch_json_renders_full_body() {
    let server = MockServer::start().await;
    let json = r#"{"name":"webserv","ok":true}"#;

    Mock::given(method("GET"))
        .and(path("/status.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(json, "application/json"))
        .mount(&server)
        .await;

    let registry = registry_for(&server.uri());
    let inputs = FormInputs {
        fetch_path: Some("/status.json".to_string()),
        ..Default::default()
    };

    let rendered = registry.invoke(Action::Fetch, &inputs).await;
    assert_eq!(rendered, format!("Status: 200 OK\nContent-Type: application/json\n\n{json}"));
}

#[test_log::test(tokio::test)]
async fn test_fetch_png_renders_byte_count_only() {
    let server = MockServer::start().await;
    let png: Vec<u8> = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]
        .into_iter()
        .chain(std::iter::repeat_n(0u8, 92))
        .collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png, "image/png"))
        .mount(&server)
        .await;

    let registry = registry_for(&server.uri());
    let rendered = registry.invoke(Action::Fetch, &FormInputs::default()).await;

    assert_eq!(rendered, "Status: 200 OK\nContent-Type: image/png\n\n[binary 100 bytes]");
}

#[test_log::test(tokio::test)]
async fn test_error_status_is_rendered_like_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.html"))
        .respond_with(ResponseTemplate::new(404).set_body_raw("<h1>404</h1>", "text/html"))
        .mount(&server)
        .await;

    let registry = registry_for(&server.uri());
    let inputs = FormInputs {
        fetch_path: Some("/missing.html".to_string()),
        ..Default::default()
    };

    let rendered = registry.invoke(Action::Fetch, &inputs).await;
    assert_eq!(rendered, "Status: 404 Not Found\nContent-Type: text/html\n\n<h1>404</h1>");
}

/// Serve one connection with a fixed raw HTTP/1.1 response, returning the base URL.
async fn serve_raw_once(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}/")
}

#[test_log::test(tokio::test)]
async fn test_status_text_is_the_servers_reason_phrase() {
    let base_url = serve_raw_once(
        "HTTP/1.1 422 Unknown\r\nContent-Type: text/plain\r\nContent-Length: 2\r\nConnection: close\r\n\r\nhi",
    )
    .await;

    let registry = registry_for(&base_url);
    let rendered = registry.invoke(Action::Fetch, &FormInputs::default()).await;

    assert_eq!(rendered, "Status: 422 Unknown\nContent-Type: text/plain\n\nhi");
}

#[test_log::test(tokio::test)]
async fn test_unreachable_server_renders_error() {
    // Nothing listens on port 1
    let registry = registry_for("http://127.0.0.1:1/");
    let inputs = FormInputs {
        upload_file: Some(SelectedFile::new("a.bin", vec![1u8])),
        ..Default::default()
    };

    for action in Action::ALL {
        let rendered = registry.invoke(action, &inputs).await;
        assert!(rendered.starts_with("Error: "), "{action}: {rendered}");
    }
}

#[test_log::test(tokio::test)]
async fn test_page_runs_every_action_concurrently() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/up/file.bin"))
        .respond_with(ResponseTemplate::new(201).set_body_raw("file", "text/plain"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/up/note.txt"))
        .respond_with(ResponseTemplate::new(500).set_body_raw("disk full", "text/plain"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let registry = registry_for(&server.uri());
    let inputs = FormInputs {
        upload_path: Some("/up/file.bin".to_string()),
        upload_file: Some(SelectedFile::new("file.bin", vec![9u8; 4])),
        text_path: Some("/up/note.txt".to_string()),
        text_body: Some("hello".to_string()),
        fetch_path: Some("/index.html".to_string()),
    };

    let panels = registry.invoke_all(&inputs).await;

    let texts: Vec<_> = panels.iter().map(|panel| (panel.target, panel.text.as_str())).collect();
    assert_eq!(
        texts,
        vec![
            (OutputTarget::UploadFileResult, "Status: 201 Created\nfile"),
            (OutputTarget::UploadTextResult, "Status: 500 Internal Server Error\ndisk full"),
            (
                OutputTarget::FetchResult,
                "Status: 200 OK\nContent-Type: text/html\n\n<html></html>"
            ),
        ]
    );
}

#[test_log::test(tokio::test)]
async fn test_repeated_fetch_is_identical() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("same every time", "text/plain"))
        .expect(2)
        .mount(&server)
        .await;

    let registry = registry_for(&server.uri());
    let first = registry.invoke(Action::Fetch, &FormInputs::default()).await;
    let second = registry.invoke(Action::Fetch, &FormInputs::default()).await;

    assert_eq!(first, second);
}
