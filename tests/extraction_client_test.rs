mod common;

use common::{png_source, spawn_silent_stub, spawn_stub};
use palette_extractor::config::{ClientConfig, RequestEncoding};
use palette_extractor::error::PaletteError;
use palette_extractor::extraction::ExtractionClient;
use palette_extractor::params::{ColorLimit, ExtractionParameters, SortKey};

const TWO_COLORS: &str = r##"{"colors":[
    {"hex":"#ff0000","rgb":"rgb(255, 0, 0)","percentage":60.0,"count":600},
    {"hex":"#0000ff","rgb":"rgb(0, 0, 255)","percentage":40.0,"count":400}
],"total_colors":2}"##;

fn config_for(service_url: String) -> ClientConfig {
    ClientConfig {
        service_url,
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn multipart_request_carries_file_field_and_query() {
    let (url, server) = spawn_stub(200, TWO_COLORS).await;
    let client = ExtractionClient::new(&config_for(url)).expect("client");
    let image = png_source("red.png");
    let params = ExtractionParameters {
        sort_by: SortKey::Frequency,
        limit: Some(ColorLimit::clamped(8)),
        auto_limit: false,
    };

    let result = client.extract(&image, &params).await.expect("extraction succeeds");
    let request = server.await.expect("stub finished");

    assert!(
        request
            .request_line
            .starts_with("POST /extract-colors?sort_by=frequency&limit=8 "),
        "unexpected request line: {}",
        request.request_line
    );
    assert!(request.head.to_ascii_lowercase().contains("multipart/form-data"));

    let body = request.body_text();
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="red.png""#));
    assert!(body.contains("Content-Type: image/png"));
    assert!(
        request
            .body
            .windows(image.bytes().len())
            .any(|window| window == image.bytes().as_ref()),
        "image payload missing from multipart body"
    );

    assert_eq!(result.total_colors, 2);
    assert_eq!(result.colors[0].hex, "#ff0000");
    assert_eq!(result.colors[1].hex, "#0000ff");
}

#[tokio::test]
async fn auto_limit_query_omits_limit() {
    let (url, server) = spawn_stub(200, TWO_COLORS).await;
    let client = ExtractionClient::new(&config_for(url)).expect("client");
    let params = ExtractionParameters {
        sort_by: SortKey::Hue,
        limit: Some(ColorLimit::clamped(30)),
        auto_limit: true,
    };

    client
        .extract(&png_source("a.png"), &params)
        .await
        .expect("extraction succeeds");
    let request = server.await.expect("stub finished");

    assert!(
        request
            .request_line
            .starts_with("POST /extract-colors?sort_by=rainbow&auto_limit=true "),
        "unexpected request line: {}",
        request.request_line
    );
    assert!(!request.request_line.contains("limit=30"));
}

#[tokio::test]
async fn service_default_sends_only_sort() {
    let (url, server) = spawn_stub(200, TWO_COLORS).await;
    let client = ExtractionClient::new(&config_for(url)).expect("client");
    let params = ExtractionParameters {
        sort_by: SortKey::Brightness,
        ..ExtractionParameters::default()
    };

    client
        .extract(&png_source("a.png"), &params)
        .await
        .expect("extraction succeeds");
    let request = server.await.expect("stub finished");

    assert!(
        request
            .request_line
            .starts_with("POST /extract-colors?sort_by=luminosity "),
        "unexpected request line: {}",
        request.request_line
    );
}

#[tokio::test]
async fn detail_body_is_malformed_response() {
    let (url, _server) = spawn_stub(400, r#"{"detail":"Invalid image file"}"#).await;
    let client = ExtractionClient::new(&config_for(url)).expect("client");

    let err = client
        .extract(&png_source("a.png"), &ExtractionParameters::default())
        .await
        .expect_err("detail body is not a palette");

    assert!(matches!(err, PaletteError::MalformedResponse(_)));
    assert!(err.to_string().contains("Invalid image file"));
}

#[tokio::test]
async fn non_json_body_is_decode_error() {
    let (url, _server) = spawn_stub(502, "<html>Bad Gateway</html>").await;
    let client = ExtractionClient::new(&config_for(url)).expect("client");

    let err = client
        .extract(&png_source("a.png"), &ExtractionParameters::default())
        .await
        .expect_err("html body cannot be decoded");

    assert!(matches!(err, PaletteError::Decode(_)));
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = ExtractionClient::new(&config_for(format!("http://{}", addr))).expect("client");
    let err = client
        .extract(&png_source("a.png"), &ExtractionParameters::default())
        .await
        .expect_err("nothing is listening");

    assert!(matches!(err, PaletteError::Network(_)));
    assert!(err.is_user_visible());
}

#[tokio::test]
async fn silent_service_times_out() {
    let (url, _server) = spawn_silent_stub().await;
    let config = ClientConfig {
        request_timeout_secs: 1,
        connect_timeout_secs: 1,
        ..config_for(url)
    };
    let client = ExtractionClient::new(&config).expect("client");

    let err = client
        .extract(&png_source("a.png"), &ExtractionParameters::default())
        .await
        .expect_err("service never answers");

    assert!(matches!(err, PaletteError::Timeout(_)));
}

#[tokio::test]
async fn base64_encoding_posts_json_body() {
    let (url, server) = spawn_stub(200, TWO_COLORS).await;
    let config = ClientConfig {
        encoding: RequestEncoding::Base64Json,
        ..config_for(url)
    };
    let client = ExtractionClient::new(&config).expect("client");
    let params = ExtractionParameters {
        sort_by: SortKey::Hue,
        limit: Some(ColorLimit::clamped(5)),
        auto_limit: false,
    };

    let result = client
        .extract(&png_source("a.png"), &params)
        .await
        .expect("extraction succeeds");
    let request = server.await.expect("stub finished");

    assert!(request.request_line.starts_with("POST /extract-colors-base64 "));
    assert!(request.head.to_ascii_lowercase().contains("application/json"));

    let body: serde_json::Value = serde_json::from_slice(&request.body).expect("json body");
    assert_eq!(body["sort_by"], "rainbow");
    assert_eq!(body["limit"], 5);
    assert_eq!(body["auto_limit"], false);
    assert!(
        body["image"]
            .as_str()
            .is_some_and(|image| image.starts_with("data:image/png;base64,"))
    );
    assert_eq!(result.colors.len(), 2);
}
