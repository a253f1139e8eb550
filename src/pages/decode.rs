//! # Decode Page
//!
//! Reveals the message hidden in an encoded image, given the key produced
//! when it was encoded. Mirrors the encode page: same lifecycle, same
//! disable-while-pending rule.

use log::{debug, error, info, warn};

use super::{layout, Phase, View};
use crate::client::{ApiError, StegoService};
use crate::common::messages::DecodeResult;
use crate::upload::{FileEvents, SelectedFile, Selection, UploadControl};
use crate::validation::ValidationError;

const INCOMPLETE_PROMPT: &str = "Please select an encoded image and enter the decryption key";

/// What gets sent for one decode submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeRequest {
    pub file: SelectedFile,
    pub key: String,
}

#[derive(Debug, Default)]
struct DecodeForm {
    file: Option<SelectedFile>,
    key: String,
    phase: Phase<DecodeResult>,
}

impl FileEvents for DecodeForm {
    fn on_select(&mut self, file: SelectedFile) {
        self.file = Some(file);
        if let Phase::Failed(_) = self.phase {
            self.phase = Phase::Idle;
        }
    }

    fn on_remove(&mut self) {
        self.file = None;
        if let Phase::Failed(_) = self.phase {
            self.phase = Phase::Idle;
        }
    }
}

/// Controller for the decode page.
#[derive(Debug, Default)]
pub struct DecodePage {
    upload: UploadControl,
    form: DecodeForm,
}

impl DecodePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase<DecodeResult> {
        &self.form.phase
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.form.file.as_ref()
    }

    pub fn key(&self) -> &str {
        &self.form.key
    }

    pub fn upload(&self) -> &UploadControl {
        &self.upload
    }

    pub fn select_file(&mut self, file: SelectedFile) -> Result<Selection, ValidationError> {
        if !self.form.phase.is_editable() {
            return Ok(Selection::Ignored);
        }
        self.upload.select(file, &mut self.form)
    }

    pub fn remove_file(&mut self) -> bool {
        self.upload.remove(&mut self.form)
    }

    /// User edited the key. Ignored unless the form is editable.
    pub fn set_key(&mut self, key: impl Into<String>) {
        if !self.form.phase.is_editable() {
            debug!("Decode form not editable, ignoring key edit");
            return;
        }
        self.form.key = key.into();
    }

    pub fn can_submit(&self) -> bool {
        self.form.phase.is_editable() && self.form.file.is_some() && !self.form.key.trim().is_empty()
    }

    /// Moves into `Submitting` and returns what to send.
    pub fn begin_submit(&mut self) -> Result<DecodeRequest, ValidationError> {
        if !self.form.phase.is_editable() {
            return Err(ValidationError::InFlight);
        }

        let key = self.form.key.trim().to_string();
        let file = match &self.form.file {
            Some(file) if !key.is_empty() => file.clone(),
            _ => {
                self.form.phase = Phase::Failed(INCOMPLETE_PROMPT.to_string());
                return Err(ValidationError::IncompleteForm(INCOMPLETE_PROMPT));
            }
        };

        self.form.phase = Phase::Submitting;
        self.upload.set_disabled(true);
        Ok(DecodeRequest { file, key })
    }

    /// Applies the service outcome of the outstanding submission.
    pub fn finish(&mut self, outcome: Result<DecodeResult, ApiError>) {
        if !self.form.phase.is_submitting() {
            warn!("⚠️  Decode outcome arrived with no submission in flight, dropping it");
            return;
        }

        self.upload.set_disabled(false);
        match outcome {
            Ok(result) => {
                info!("✅ Revealed a {} character message", result.message.chars().count());
                self.form.file = None;
                self.form.key.clear();
                self.upload.clear();
                self.form.phase = Phase::Succeeded(result);
            }
            Err(e) => {
                error!("❌ Decoding failed: {:?}", e);
                self.form.phase = Phase::Failed(e.to_string());
            }
        }
    }

    /// Submits the form and waits for the outcome.
    pub async fn submit<S: StegoService + ?Sized>(
        &mut self,
        service: &S,
    ) -> Result<(), ValidationError> {
        let request = self.begin_submit()?;
        let outcome = service.decode(&request.file, &request.key).await;
        self.finish(outcome);
        Ok(())
    }

    pub fn reset(&mut self) {
        if self.form.phase.is_submitting() {
            debug!("Reset ignored while a request is in flight");
            return;
        }
        self.upload.clear();
        self.form = DecodeForm::default();
    }
}

impl View for DecodePage {
    fn render(&self) -> String {
        let mut body = String::from("Decode Message\nReveal the hidden message from an encoded image\n\n");

        if let Some(result) = self.form.phase.result() {
            body.push_str(&format!(
                "Message Decoded Successfully!\nHere's the hidden message that was extracted from the image:\n\n\
                 Hidden Message\n{}\n\nMessage length: {} characters\n\n[ Decode Another Message ]\n",
                result.message,
                result.message.chars().count()
            ));
            return layout(&body);
        }

        body.push_str("1. Upload Encoded Image\n");
        body.push_str(&self.upload.render());
        body.push('\n');
        if self.form.file.is_some() {
            body.push_str("Image uploaded successfully\n");
        }

        body.push_str("\n2. Enter Decryption Key\n");
        if self.form.key.is_empty() {
            body.push_str("(Paste your decryption key here...)\n");
        } else {
            body.push_str(&self.form.key);
            body.push('\n');
        }

        if let Some(error) = self.form.phase.error() {
            body.push_str(&format!("\nDecoding Failed\n{}\n", error));
        }

        let button = if self.form.phase.is_submitting() {
            "[ Decoding... ]"
        } else if self.can_submit() {
            "[ Decode Message ]"
        } else {
            "[ Decode Message ] (disabled)"
        };
        body.push_str(&format!("\n{}\n", button));

        layout(&body)
    }
}
