// The UI controller. Owns the application state (form inputs, the last
// extracted text, the rendered deck and the status line) and implements
// the Extract / Generate / Clear actions against a `FlashcardApi`.

use std::fmt;
use std::path::PathBuf;

use tracing::{error, info};

use crate::api::{FlashcardApi, GenerateRequest};
use crate::render::{render_cards, RenderedDeck};

pub const DEFAULT_NUM_CARDS: i64 = 5;

/// Outcome of the last action, shown as a one-line status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Empty,
    NoFileChosen,
    Extracting,
    Extracted,
    NothingExtracted,
    ExtractFailed,
    NoText,
    Generating,
    Generated,
    GenerateFailed,
}

impl Status {
    pub fn message(self) -> &'static str {
        match self {
            Status::Empty => "",
            Status::NoFileChosen => "Please choose a file first.",
            Status::Extracting => "Uploading and extracting text...",
            Status::Extracted => "Text extracted from file successfully.",
            Status::NothingExtracted => "Could not extract text from this file.",
            Status::ExtractFailed => "Error extracting text from file.",
            Status::NoText => "Please paste text or extract from a file first.",
            Status::Generating => "Generating flashcards on the server...",
            Status::Generated => "Flashcards generated successfully.",
            Status::GenerateFailed => "Error generating flashcards.",
        }
    }

    /// Input errors and request failures. An empty extraction is informational.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Status::NoFileChosen | Status::ExtractFailed | Status::NoText | Status::GenerateFailed
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The form inputs the user edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub text: String,
    pub file: Option<PathBuf>,
    /// Raw card-count input; parsed leniently on Generate.
    pub num_cards: String,
    /// Selector value, sent to the server verbatim.
    pub difficulty: String,
}

/// Client-held state that outlives a single action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub extracted_text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub form: FormState,
    pub session: SessionState,
    pub deck: RenderedDeck,
    pub status: Status,
}

/// Parse the card-count input the way a lenient integer parse does: skip
/// leading whitespace, accept an optional sign, then take leading digits.
/// Anything unparsable, and zero, falls back to the default. A digit run
/// too long for `i64` saturates.
pub fn parse_num_cards(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return DEFAULT_NUM_CARDS;
    }
    // Only digits remain, so the parse can only fail on overflow.
    match digits.parse::<i64>().unwrap_or(i64::MAX) {
        0 => DEFAULT_NUM_CARDS,
        n if negative => -n,
        n => n,
    }
}

pub struct Controller<A> {
    api: A,
    state: AppState,
}

impl<A: FlashcardApi> Controller<A> {
    pub fn new(api: A) -> Self {
        Self::with_form(api, FormState::default())
    }

    /// Start with pre-filled form inputs (e.g. from config or CLI flags).
    pub fn with_form(api: A, form: FormState) -> Self {
        Controller {
            api,
            state: AppState {
                form,
                ..AppState::default()
            },
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.state.form
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn deck(&self) -> &RenderedDeck {
        &self.state.deck
    }

    /// Upload the selected file and store the extracted text.
    ///
    /// `on_status` sees the in-flight status before the request is sent.
    pub fn extract_with<F: FnMut(Status)>(&mut self, mut on_status: F) -> Status {
        let Some(path) = self.state.form.file.clone() else {
            return self.set_status(Status::NoFileChosen);
        };

        on_status(self.set_status(Status::Extracting));

        match self.api.upload(&path) {
            Ok(resp) => {
                let text = resp.text.unwrap_or_default();
                self.state.session.extracted_text = text.clone();
                if text.is_empty() {
                    info!(file = %path.display(), "Server returned no text");
                    self.set_status(Status::NothingExtracted)
                } else {
                    info!(file = %path.display(), chars = text.chars().count(), "Text extracted");
                    self.state.form.text = text;
                    self.set_status(Status::Extracted)
                }
            }
            Err(e) => {
                error!(error = ?e, file = %path.display(), "Extraction request failed");
                self.set_status(Status::ExtractFailed)
            }
        }
    }

    pub fn extract(&mut self) -> Status {
        self.extract_with(|_| {})
    }

    /// Build the generation request from the form, falling back to the last
    /// extracted text. `None` when there is no text to send.
    pub fn build_generate_request(&self) -> Option<GenerateRequest> {
        let form = &self.state.form;
        let text = match form.text.trim() {
            "" => self.state.session.extracted_text.trim(),
            t => t,
        };
        if text.is_empty() {
            return None;
        }
        Some(GenerateRequest {
            text: text.to_string(),
            difficulty: form.difficulty.clone(),
            num_cards: parse_num_cards(&form.num_cards),
        })
    }

    /// Ask the server for flashcards and re-render the deck.
    pub fn generate_with<F: FnMut(Status)>(&mut self, mut on_status: F) -> Status {
        let Some(req) = self.build_generate_request() else {
            return self.set_status(Status::NoText);
        };

        on_status(self.set_status(Status::Generating));

        match self.api.generate(&req) {
            Ok(resp) => {
                let cards = resp.cards.unwrap_or_default();
                info!(count = cards.len(), "Flashcards generated");
                self.state.deck = render_cards(&cards);
                self.set_status(Status::Generated)
            }
            Err(e) => {
                error!(error = ?e, "Generation request failed");
                self.set_status(Status::GenerateFailed)
            }
        }
    }

    pub fn generate(&mut self) -> Status {
        self.generate_with(|_| {})
    }

    /// Reset inputs, session, deck and status. No network call.
    pub fn clear(&mut self) {
        self.state.form.text.clear();
        self.state.form.file = None;
        self.state.session.extracted_text.clear();
        self.state.deck = RenderedDeck::default();
        self.state.status = Status::Empty;
    }

    fn set_status(&mut self, status: Status) -> Status {
        self.state.status = status;
        status
    }
}
