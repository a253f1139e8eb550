//! # Upload Control
//!
//! Accepts a single image, renders a local preview of it and tells the owning
//! page about the chosen or removed file through [`FileEvents`].
//!
//! ## States
//!
//! ```text
//! Empty ──select(valid)──▶ Previewing ──remove──▶ Empty
//!   │                          │
//!   └─select(invalid): rejected, state unchanged
//! ```
//!
//! While the owner has set the control `disabled` (a request is in flight)
//! every user action is ignored.
//!
//! The preview is a memory-only `data:` URL. The control owns it exclusively
//! and drops it whenever it is replaced, removed or cleared, or when the
//! control itself goes away. [`PreviewGauge`] counts the previews a control
//! still holds.

use base64::{engine::general_purpose, Engine as _};
use log::{debug, info, warn};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::validation::{format_file_size, validate_image_file, ValidationError};

/// An image picked by the user: name, declared media type and raw bytes.
///
/// Never mutated in place; a new selection replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, declaring its media type from the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(name, media_type_for_path(path), bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Maps a file extension to the media type a browser would declare for it.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Number of live previews rendered for one control.
///
/// Clones share the count, so a handle taken from the control keeps working
/// after the control is gone.
#[derive(Debug, Clone, Default)]
pub struct PreviewGauge(Arc<AtomicUsize>);

impl PreviewGauge {
    pub fn live(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Locally rendered preview of a selected image.
#[derive(Debug)]
pub struct Preview {
    data_url: String,
    dimensions: Option<(u32, u32)>,
    gauge: PreviewGauge,
}

impl Preview {
    /// Renders the preview: a base64 `data:` URL plus the pixel dimensions
    /// when the image header can be read.
    pub fn render(file: &SelectedFile, gauge: &PreviewGauge) -> Self {
        let encoded = general_purpose::STANDARD.encode(file.bytes());
        let data_url = format!("data:{};base64,{}", file.media_type(), encoded);
        let dimensions = read_dimensions(file.bytes());

        debug!(
            "🖼️  Rendered preview for {} ({:?})",
            file.name(),
            dimensions
        );

        gauge.0.fetch_add(1, Ordering::SeqCst);
        Self {
            data_url,
            dimensions,
            gauge: gauge.clone(),
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// `(width, height)` in pixels, `None` if the header was unreadable.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.gauge.0.fetch_sub(1, Ordering::SeqCst);
        debug!("🗑️  Released preview ({} bytes)", self.data_url.len());
    }
}

fn read_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Receiver of upload events, implemented by the page that owns the control.
pub trait FileEvents {
    /// A valid file was accepted and is now previewed.
    fn on_select(&mut self, file: SelectedFile);

    /// The previewed file was removed by the user.
    fn on_remove(&mut self);
}

/// Result of a user selection that passed (or skipped) validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// File accepted and now previewed
    Accepted,
    /// Control is disabled; nothing happened
    Ignored,
}

#[derive(Debug, Default)]
enum UploadState {
    #[default]
    Empty,
    Previewing {
        name: String,
        size: u64,
        preview: Preview,
    },
}

/// Single-image upload control.
#[derive(Debug, Default)]
pub struct UploadControl {
    state: UploadState,
    disabled: bool,
    gauge: PreviewGauge,
}

impl UploadControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a user picking `file`.
    ///
    /// # Returns
    /// - `Ok(Selection::Accepted)`: File valid, preview rendered, `on_select` called once
    /// - `Ok(Selection::Ignored)`: Control disabled, nothing changed
    /// - `Err(ValidationError)`: File rejected, state unchanged
    pub fn select<E: FileEvents + ?Sized>(
        &mut self,
        file: SelectedFile,
        events: &mut E,
    ) -> Result<Selection, ValidationError> {
        if self.disabled {
            debug!("Upload control disabled, ignoring {}", file.name());
            return Ok(Selection::Ignored);
        }

        if let Err(e) = validate_image_file(&file) {
            warn!("❌ Rejected {}: {}", file.name(), e);
            return Err(e);
        }

        info!(
            "📎 Selected {} ({}, {})",
            file.name(),
            file.media_type(),
            format_file_size(file.size())
        );

        // Assigning drops any previous preview.
        self.state = UploadState::Previewing {
            name: file.name().to_string(),
            size: file.size(),
            preview: Preview::render(&file, &self.gauge),
        };
        events.on_select(file);

        Ok(Selection::Accepted)
    }

    /// Handles the user removing the current file.
    ///
    /// Returns `true` if a file was removed and `on_remove` was called.
    pub fn remove<E: FileEvents + ?Sized>(&mut self, events: &mut E) -> bool {
        if self.disabled || !self.is_previewing() {
            return false;
        }

        self.state = UploadState::Empty;
        events.on_remove();
        true
    }

    /// Drops the preview without notifying the owner. Used when the owner
    /// itself discards the file (reset, successful submission).
    pub fn clear(&mut self) {
        self.state = UploadState::Empty;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self.state, UploadState::Previewing { .. })
    }

    /// Handle on the count of previews this control has not yet released.
    pub fn preview_gauge(&self) -> PreviewGauge {
        self.gauge.clone()
    }

    pub fn preview(&self) -> Option<&Preview> {
        match &self.state {
            UploadState::Previewing { preview, .. } => Some(preview),
            UploadState::Empty => None,
        }
    }

    /// Plain-text rendering of the control.
    pub fn render(&self) -> String {
        match &self.state {
            UploadState::Empty => {
                let mut view = String::from(
                    "Drop an image here, or click to select\nSupports JPEG, PNG, WebP • Max 10MB",
                );
                if self.disabled {
                    view.push_str("\n(disabled)");
                }
                view
            }
            UploadState::Previewing {
                name, size, preview, ..
            } => {
                let mut view = format!("{} ({})", name, format_file_size(*size));
                if let Some((width, height)) = preview.dimensions() {
                    view.push_str(&format!("\n{}x{} px", width, height));
                }
                view
            }
        }
    }
}
