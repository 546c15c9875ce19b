// Shared fixtures for integration tests: a one-shot HTTP stub plus recording fakes.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use palette_extractor::capture::{ImagePreview, ImageSource};
use palette_extractor::error::PaletteError;
use palette_extractor::extraction::{ColorExtractor, ColorSwatch, ExtractionResult};
use palette_extractor::notify::ClipboardWriter;
use palette_extractor::params::ExtractionParameters;
use palette_extractor::render::SwatchRecord;
use palette_extractor::ui::PaletteUi;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

// ============================================================================
// Images
// ============================================================================

pub fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x % 255) as u8, (y % 255) as u8, 64, 255])
    });
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}

pub fn png_source(name: &str) -> ImageSource {
    ImageSource::new(create_png_bytes(4, 4), "image/png", name)
}

pub fn swatch(hex: &str, rgb: &str, percentage: f64, count: u64) -> ColorSwatch {
    ColorSwatch {
        hex: hex.to_string(),
        rgb: rgb.to_string(),
        percentage,
        count,
    }
}

pub fn red_green_result() -> ExtractionResult {
    ExtractionResult {
        colors: vec![
            swatch("#ff0000", "rgb(255,0,0)", 50.0, 500),
            swatch("#00ff00", "rgb(0,255,0)", 50.0, 500),
        ],
        total_colors: 2,
    }
}

pub fn single_color_result(hex: &str, total: u64) -> ExtractionResult {
    ExtractionResult {
        colors: vec![swatch(hex, "rgb(1,2,3)", 100.0, 1_234_567)],
        total_colors: total,
    }
}

// ============================================================================
// HTTP stub
// ============================================================================

#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Accepts one connection, records the request and answers with `body`.
pub async fn spawn_stub(status: u16, body: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        let request = read_request(&mut stream).await;

        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write stub response");
        let _ = stream.shutdown().await;
        request
    });

    (format!("http://{}", addr), handle)
}

/// Accepts one connection and never answers.
pub async fn spawn_silent_stub() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        let mut sink = Vec::new();
        let _ = stream.read_to_end(&mut sink).await;
    });

    (format!("http://{}", addr), handle)
}

async fn read_more(stream: &mut TcpStream, buf: &mut Vec<u8>) {
    let mut chunk = [0u8; 8192];
    let n = stream.read(&mut chunk).await.expect("read request");
    assert!(n > 0, "connection closed before request was complete");
    buf.extend_from_slice(&chunk[..n]);
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        read_more(stream, &mut buf).await;
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let request_line = head.lines().next().unwrap_or_default().to_string();
    let content_length = head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse::<usize>().ok()
        } else {
            None
        }
    });
    let chunked = head
        .to_ascii_lowercase()
        .contains("transfer-encoding: chunked");

    let mut body = buf[header_end..].to_vec();
    if let Some(len) = content_length {
        while body.len() < len {
            read_more(stream, &mut body).await;
        }
        body.truncate(len);
    } else if chunked {
        while !body.ends_with(b"0\r\n\r\n") {
            read_more(stream, &mut body).await;
        }
        body = decode_chunked(&body);
    }

    CapturedRequest {
        request_line,
        head,
        body,
    }
}

fn decode_chunked(mut raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let Some(line_end) = find(raw, b"\r\n") else {
            break;
        };
        let size_text = String::from_utf8_lossy(&raw[..line_end]);
        let size = usize::from_str_radix(size_text.trim(), 16).expect("chunk size");
        raw = &raw[line_end + 2..];
        if size == 0 {
            break;
        }
        out.extend_from_slice(&raw[..size]);
        raw = &raw[size + 2..];
    }
    out
}

// ============================================================================
// Fakes
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Preview(Option<(u32, u32)>),
    Loading(bool),
    Swatches(Vec<String>),
    Summary(String),
    Notification(String),
    Confirm(u64),
    LimitEditable(bool),
    CopiedNotice(bool),
}

#[derive(Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
    accept_large: bool,
}

impl RecordingUi {
    pub fn new(accept_large: bool) -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            accept_large,
        })
    }

    fn record(&self, event: UiEvent) {
        self.events.lock().expect("ui events lock").push(event);
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().expect("ui events lock").clone()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                UiEvent::Summary(summary) => Some(summary),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                UiEvent::Notification(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn last_copied_notice(&self) -> Option<bool> {
        self.events().into_iter().rev().find_map(|event| match event {
            UiEvent::CopiedNotice(visible) => Some(visible),
            _ => None,
        })
    }
}

impl PaletteUi for RecordingUi {
    fn show_preview(&self, preview: &ImagePreview) {
        self.record(UiEvent::Preview(preview.dimensions));
    }

    fn set_loading(&self, loading: bool) {
        self.record(UiEvent::Loading(loading));
    }

    fn render_swatches(&self, swatches: &[SwatchRecord]) {
        self.record(UiEvent::Swatches(
            swatches.iter().map(|swatch| swatch.hex.clone()).collect(),
        ));
    }

    fn show_summary(&self, summary: &str) {
        self.record(UiEvent::Summary(summary.to_string()));
    }

    fn show_notification(&self, message: &str) {
        self.record(UiEvent::Notification(message.to_string()));
    }

    async fn confirm_large_upload(&self, size_bytes: u64) -> bool {
        self.record(UiEvent::Confirm(size_bytes));
        self.accept_large
    }

    fn set_limit_editable(&self, editable: bool) {
        self.record(UiEvent::LimitEditable(editable));
    }

    fn show_copied_notice(&self, visible: bool) {
        self.record(UiEvent::CopiedNotice(visible));
    }
}

type Reply = Result<ExtractionResult, PaletteError>;

#[derive(Default)]
struct FakeExtractorState {
    replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    calls: Mutex<Vec<(ImageSource, ExtractionParameters)>>,
}

/// Scripted extractor: each call consumes the next queued reply, possibly waiting for it.
#[derive(Clone, Default)]
pub struct FakeExtractor {
    state: Arc<FakeExtractorState>,
}

impl FakeExtractor {
    pub fn push_ready(&self, reply: Reply) {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(reply);
        self.state.replies.lock().expect("replies lock").push_back(rx);
    }

    pub fn push_pending(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.state.replies.lock().expect("replies lock").push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<(ImageSource, ExtractionParameters)> {
        self.state.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.lock().expect("calls lock").len()
    }
}

impl ColorExtractor for FakeExtractor {
    async fn extract(&self, image: ImageSource, params: ExtractionParameters) -> Reply {
        self.state
            .calls
            .lock()
            .expect("calls lock")
            .push((image, params));
        let reply = self.state.replies.lock().expect("replies lock").pop_front();

        match reply {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(PaletteError::Network("reply dropped".to_string()))),
            None => Err(PaletteError::Network("no scripted reply".to_string())),
        }
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    writes: Mutex<Vec<String>>,
    fail: bool,
}

impl FakeClipboard {
    pub fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            writes: Mutex::new(Vec::new()),
            fail,
        })
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("writes lock").clone()
    }
}

impl ClipboardWriter for FakeClipboard {
    async fn write_text(&self, text: String) -> Result<(), PaletteError> {
        self.writes.lock().expect("writes lock").push(text);
        if self.fail {
            Err(PaletteError::Clipboard("write rejected".to_string()))
        } else {
            Ok(())
        }
    }
}
