//! Shared in-memory collaborators for app integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cutprint_api::{ApiError, ApiRequest, ApiResponse, ApiTransport, PhotoApi, RetryPolicy, Sleeper};
use cutprint_app::{Booth, EditingSession};
use cutprint_compose::{CompositionEngine, EngineOptions, MemorySource};
use cutprint_core::CutType;
use cutprint_print::{
    CollaboratorError, PrintDocument, PrintOutcome, PrintService, ShareOutcome, ShareRequest, ShareService,
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

pub const SAVED_URL: &str = "https://cutprint.app/p/42";

/// Print collaborator replaying one scripted result and recording documents.
pub struct RecordingPrinter {
    result: Result<PrintOutcome, CollaboratorError>,
    documents: Mutex<Vec<PrintDocument>>,
}

impl RecordingPrinter {
    pub fn new(result: Result<PrintOutcome, CollaboratorError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            documents: Mutex::new(Vec::new()),
        })
    }

    pub fn documents(&self) -> Vec<PrintDocument> {
        self.documents.lock().expect("lock").clone()
    }
}

impl PrintService for RecordingPrinter {
    fn print(&self, document: &PrintDocument) -> Result<PrintOutcome, CollaboratorError> {
        self.documents.lock().expect("lock").push(document.clone());
        self.result.clone()
    }
}

/// Share collaborator replaying one scripted result and recording requests.
pub struct RecordingSharer {
    result: Result<ShareOutcome, CollaboratorError>,
    requests: Mutex<Vec<ShareRequest>>,
}

impl RecordingSharer {
    pub fn new(result: Result<ShareOutcome, CollaboratorError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ShareRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

impl ShareService for RecordingSharer {
    fn share(&self, request: &ShareRequest) -> Result<ShareOutcome, CollaboratorError> {
        self.requests.lock().expect("lock").push(request.clone());
        self.result.clone()
    }
}

/// Transport replaying scripted responses.
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
}

impl ApiTransport for ScriptedTransport {
    fn send(&self, _request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.outcomes
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("script exhausted".to_string())))
    }
}

struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}

pub fn api(outcomes: Vec<Result<ApiResponse, ApiError>>) -> PhotoApi {
    let transport = Arc::new(ScriptedTransport {
        outcomes: Mutex::new(outcomes.into()),
    });
    let policy = RetryPolicy {
        jitter_ms: 0,
        ..RetryPolicy::default()
    };
    PhotoApi::new("https://api.cutprint.test", policy, transport)
        .expect("https base")
        .with_token("secret-token")
        .with_sleeper(Arc::new(NoSleep))
}

pub fn saved_response() -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse {
        status: 201,
        body: format!(r#"{{"id":42,"url":"{SAVED_URL}"}}"#),
    })
}

pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("png encodes");
    bytes
}

/// Four readable photos at `mem://photo-0..3`.
pub fn photo_source() -> MemorySource {
    (0..4).fold(MemorySource::new(), |source, index| {
        source.with(format!("mem://photo-{index}"), solid_png(40, 40, [200, 40, 40, 255]))
    })
}

pub fn photo_uris() -> Vec<String> {
    (0..4).map(|index| format!("mem://photo-{index}")).collect()
}

pub fn engine(source: MemorySource) -> CompositionEngine {
    let options = EngineOptions {
        slot_width: 100,
        ..EngineOptions::default()
    };
    CompositionEngine::new(options, Arc::new(source))
}

pub fn booth(
    source: MemorySource,
    printer: Arc<RecordingPrinter>,
    sharer: Arc<RecordingSharer>,
) -> Booth {
    Booth::new(engine(source), printer, sharer)
}

pub fn grid4_session() -> EditingSession {
    EditingSession::new(CutType::Grid4, photo_uris(), cutprint_catalog::global()).expect("session builds")
}
