//! # Encode Page
//!
//! Hides a message in a cover image. The user picks an image, types a message
//! and submits; on success the page shows the decryption key and offers the
//! encoded image for download.
//!
//! The page can be driven in one call with [`EncodePage::submit`], or in two
//! steps with [`EncodePage::begin_submit`] and [`EncodePage::finish`] when the
//! caller wants to observe the in-flight state.

use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use super::{layout, Phase, View};
use crate::client::{ApiError, StegoService};
use crate::common::messages::EncodeResult;
use crate::upload::{FileEvents, Preview, SelectedFile, Selection, UploadControl};
use crate::validation::{
    calculate_message_capacity, generate_filename, validate_message_length, ValidationError,
    MAX_MESSAGE_CHARS,
};

const INCOMPLETE_PROMPT: &str = "Please select an image and enter a message";

/// Shown when the selected image's dimensions are unknown.
const STATIC_CAPACITY_HINT: &str = "Image can hold approximately 500+ characters";

/// What gets sent for one encode submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRequest {
    pub file: SelectedFile,
    pub message: String,
}

/// Encoded image fetched from the service, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl DownloadedImage {
    /// Writes the image into `dir` under its generated filename.
    pub fn save_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Form state owned by the page; receives the upload control's events.
#[derive(Debug, Default)]
struct EncodeForm {
    file: Option<SelectedFile>,
    message: String,
    phase: Phase<EncodeResult>,
}

impl EncodeForm {
    fn clear_error(&mut self) {
        if let Phase::Failed(_) = self.phase {
            self.phase = Phase::Idle;
        }
    }
}

impl FileEvents for EncodeForm {
    fn on_select(&mut self, file: SelectedFile) {
        self.file = Some(file);
        self.clear_error();
    }

    fn on_remove(&mut self) {
        self.file = None;
        self.clear_error();
    }
}

/// Controller for the encode page.
#[derive(Debug, Default)]
pub struct EncodePage {
    upload: UploadControl,
    form: EncodeForm,
    download_error: Option<String>,
}

impl EncodePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase<EncodeResult> {
        &self.form.phase
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.form.file.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.form.message
    }

    pub fn upload(&self) -> &UploadControl {
        &self.upload
    }

    /// Last download failure, shown on the success view.
    pub fn download_error(&self) -> Option<&str> {
        self.download_error.as_deref()
    }

    /// User picked a cover image.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<Selection, ValidationError> {
        if !self.form.phase.is_editable() {
            return Ok(Selection::Ignored);
        }
        self.upload.select(file, &mut self.form)
    }

    /// User removed the cover image.
    pub fn remove_file(&mut self) -> bool {
        self.upload.remove(&mut self.form)
    }

    /// User edited the message. Ignored unless the form is editable.
    pub fn set_message(&mut self, message: impl Into<String>) -> Result<(), ValidationError> {
        if !self.form.phase.is_editable() {
            debug!("Encode form not editable, ignoring message edit");
            return Ok(());
        }

        let message = message.into();
        validate_message_length(&message)?;
        self.form.message = message;
        Ok(())
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        self.form.phase.is_editable()
            && self.form.file.is_some()
            && !self.form.message.trim().is_empty()
    }

    /// Capacity guidance for the selected image, if any.
    pub fn capacity_hint(&self) -> Option<String> {
        self.form.file.as_ref()?;

        let hint = match self.upload.preview().and_then(Preview::dimensions) {
            Some((width, height)) => format!(
                "Image can hold approximately {} characters",
                calculate_message_capacity(width, height)
            ),
            None => STATIC_CAPACITY_HINT.to_string(),
        };
        Some(hint)
    }

    /// Moves into `Submitting` and returns what to send.
    ///
    /// # Errors
    /// - `InFlight`: a request is already outstanding (or a result is shown)
    /// - `IncompleteForm`: no file or blank message; the prompt becomes the page error
    pub fn begin_submit(&mut self) -> Result<EncodeRequest, ValidationError> {
        if !self.form.phase.is_editable() {
            return Err(ValidationError::InFlight);
        }

        let message = self.form.message.trim().to_string();
        let file = match &self.form.file {
            Some(file) if !message.is_empty() => file.clone(),
            _ => {
                self.form.phase = Phase::Failed(INCOMPLETE_PROMPT.to_string());
                return Err(ValidationError::IncompleteForm(INCOMPLETE_PROMPT));
            }
        };

        self.form.phase = Phase::Submitting;
        self.upload.set_disabled(true);
        Ok(EncodeRequest { file, message })
    }

    /// Applies the service outcome of the outstanding submission.
    pub fn finish(&mut self, outcome: Result<EncodeResult, ApiError>) {
        if !self.form.phase.is_submitting() {
            warn!("⚠️  Encode outcome arrived with no submission in flight, dropping it");
            return;
        }

        self.upload.set_disabled(false);
        match outcome {
            Ok(result) => {
                info!("✅ Message hidden, encoded image is {}", result.file_id);
                self.form.file = None;
                self.form.message.clear();
                self.upload.clear();
                self.download_error = None;
                self.form.phase = Phase::Succeeded(result);
            }
            Err(e) => {
                error!("❌ Encoding failed: {:?}", e);
                self.form.phase = Phase::Failed(e.to_string());
            }
        }
    }

    /// Submits the form and waits for the outcome.
    ///
    /// Service failures end up in [`Phase::Failed`]; only client-side
    /// validation is returned as `Err`.
    pub async fn submit<S: StegoService + ?Sized>(
        &mut self,
        service: &S,
    ) -> Result<(), ValidationError> {
        let request = self.begin_submit()?;
        let outcome = service.encode(&request.file, &request.message).await;
        self.finish(outcome);
        Ok(())
    }

    /// Fetches the encoded image for the current result.
    ///
    /// Returns `None` when there is no result or the download failed; the
    /// failure is kept in [`EncodePage::download_error`].
    pub async fn download<S: StegoService + ?Sized>(
        &mut self,
        service: &S,
    ) -> Option<DownloadedImage> {
        let file_id = self.form.phase.result()?.file_id.clone();

        match service.download(&file_id).await {
            Ok(bytes) => {
                self.download_error = None;
                Some(DownloadedImage {
                    filename: generate_filename("hideout_encoded", "png"),
                    bytes,
                })
            }
            Err(e) => {
                error!("❌ Download of {} failed: {:?}", file_id, e);
                self.download_error = Some(format!("Failed to download image: {}", e));
                None
            }
        }
    }

    /// Back to a blank form, discarding everything held.
    pub fn reset(&mut self) {
        if self.form.phase.is_submitting() {
            debug!("Reset ignored while a request is in flight");
            return;
        }
        self.upload.clear();
        self.form = EncodeForm::default();
        self.download_error = None;
    }

    fn render_form(&self) -> String {
        let mut body = String::from("Encode Message\nHide your secret message inside an image\n\n");

        body.push_str("1. Choose Cover Image\n");
        body.push_str(&self.upload.render());
        body.push('\n');
        if self.form.file.is_some() {
            body.push_str("Image selected successfully\n");
        }

        body.push_str("\n2. Enter Secret Message\n");
        if self.form.message.is_empty() {
            body.push_str("(Type your secret message here...)\n");
        } else {
            body.push_str(&self.form.message);
            body.push('\n');
        }
        body.push_str(&format!(
            "{}/{} characters",
            self.form.message.chars().count(),
            MAX_MESSAGE_CHARS
        ));
        if let Some(hint) = self.capacity_hint() {
            body.push_str(&format!("  |  {}", hint));
        }
        body.push('\n');

        if let Some(error) = self.form.phase.error() {
            body.push_str(&format!("\nError: {}\n", error));
        }

        let button = if self.form.phase.is_submitting() {
            "[ Encoding... ]".to_string()
        } else if self.can_submit() {
            "[ Encode Message ]".to_string()
        } else {
            "[ Encode Message ] (disabled)".to_string()
        };
        body.push_str(&format!("\n{}\n", button));
        body
    }

    fn render_result(&self, result: &EncodeResult) -> String {
        let mut body = format!(
            "Message Encoded Successfully!\nYour secret message has been hidden in the image.\n\n\
             Decryption Key\nSave this key securely. You'll need it to decode the message.\n\n\
             {}\n\nEncoded image: {}\n",
            result.key, result.file_id
        );
        if let Some(error) = &self.download_error {
            body.push_str(&format!("\nError: {}\n", error));
        }
        body.push_str("\n[ Download Encoded Image ]  [ Encode Another Message ]\n");
        body
    }
}

impl View for EncodePage {
    fn render(&self) -> String {
        let body = match self.form.phase.result() {
            Some(result) => self.render_result(result),
            None => self.render_form(),
        };
        layout(&body)
    }
}
