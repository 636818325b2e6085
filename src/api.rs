// API client module: a small blocking HTTP client that talks to the
// flashcard server. It only knows about the two endpoints the client
// needs: file upload (text extraction) and flashcard generation.

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::config::Config;

/// A single question/answer pair as returned by the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Flashcard {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Body of `POST /api/generate`. The server expects `numCards` in camel case.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub text: String,
    pub difficulty: String,
    #[serde(rename = "numCards")]
    pub num_cards: i64,
}

/// Response of `POST /api/upload`. A missing `text` means nothing was extracted.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct UploadResponse {
    #[serde(default)]
    pub text: Option<String>,
}

/// Response of `POST /api/generate`. A missing `cards` is an empty deck.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    pub cards: Option<Vec<Flashcard>>,
}

/// The two remote calls the controller depends on. `ApiClient` is the real
/// implementation; tests substitute an in-memory one.
pub trait FlashcardApi {
    fn upload(&self, file_path: &Path) -> Result<UploadResponse>;
    fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse>;
}

/// Blocking API client holding a reqwest client and the server base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the server at `base_url` (no trailing path).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url)
    }

    /// Check the status and hand back the response, or fail with the
    /// server's body text attached.
    fn check(res: reqwest::blocking::Response, what: &str) -> Result<reqwest::blocking::Response> {
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_default();
            anyhow::bail!("{} failed: {} - {}", what, status, txt);
        }
        Ok(res)
    }
}

impl FlashcardApi for ApiClient {
    /// Upload a file as multipart/form-data under the field name `file`.
    fn upload(&self, file_path: &Path) -> Result<UploadResponse> {
        let url = format!("{}/api/upload", &self.base_url);

        let bytes = std::fs::read(file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;
        let file_name = file_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime = mime_for(file_path);

        debug!(url = %url, file = %file_path.display(), size = bytes.len(), mime, "Uploading file");

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .context("Invalid MIME type for upload")?;
        let form = multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .context("Failed to send upload request")?;
        let res = Self::check(res, "Upload")?;
        let resp: UploadResponse = res.json().context("Parsing upload response json")?;
        Ok(resp)
    }

    fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}/api/generate", &self.base_url);
        debug!(url = %url, difficulty = %req.difficulty, num_cards = req.num_cards, "Requesting flashcards");

        let res = self
            .client
            .post(&url)
            .json(req)
            .send()
            .context("Failed to send generate request")?;
        let res = Self::check(res, "Generation")?;
        let resp: GenerateResponse = res.json().context("Parsing generate response json")?;
        Ok(resp)
    }
}

/// Guess a MIME type from the file extension for the upload part.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("txt") | Some("md") => "text/plain",
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("html") | Some("htm") => "text/html",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
