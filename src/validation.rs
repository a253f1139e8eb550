//! # Validation and Display Helpers
//!
//! Pure functions that decide whether a picked file may be sent to the
//! service, plus the small formatting helpers the pages need.
//!
//! Nothing in here touches the network. A [`ValidationError`] is always
//! surfaced to the user directly and never reaches the transport client.

use rand::Rng;
use thiserror::Error;

use crate::upload::SelectedFile;

/// Largest image the service accepts (10MB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Declared media types accepted for cover and encoded images.
///
/// `image/jpg` is not a registered type but some platforms still report it.
pub const ALLOWED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Longest message the encode form accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Client-side failures. The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Declared media type is not JPEG, PNG or WebP
    #[error("Only JPEG, PNG, and WebP images are supported")]
    UnsupportedType { media_type: String },

    /// File is larger than [`MAX_FILE_SIZE`]
    #[error("File size must be less than 10MB")]
    TooLarge { size: u64 },

    /// Message is longer than [`MAX_MESSAGE_CHARS`]
    #[error("Message must be at most {max} characters (got {length})")]
    MessageTooLong { length: usize, max: usize },

    /// Submit pressed without a file or without the required text
    #[error("{0}")]
    IncompleteForm(&'static str),

    /// Submit pressed while a request is still outstanding
    #[error("A request is already in progress")]
    InFlight,
}

/// Checks a candidate file against the media-type allow-list and size ceiling.
///
/// The type is checked first, so an oversized file of the wrong type is
/// reported as a type problem.
pub fn validate_image_file(file: &SelectedFile) -> Result<(), ValidationError> {
    if !ALLOWED_MEDIA_TYPES.contains(&file.media_type()) {
        return Err(ValidationError::UnsupportedType {
            media_type: file.media_type().to_string(),
        });
    }

    if file.size() > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge { size: file.size() });
    }

    Ok(())
}

/// Checks the message length in characters (not bytes).
pub fn validate_message_length(message: &str) -> Result<(), ValidationError> {
    let length = message.chars().count();
    if length > MAX_MESSAGE_CHARS {
        return Err(ValidationError::MessageTooLong {
            length,
            max: MAX_MESSAGE_CHARS,
        });
    }
    Ok(())
}

/// Formats a byte count using base-1024 units.
///
/// At most two decimals are shown and trailing zeros are dropped:
/// `0` → "0 Bytes", `1536` → "1.5 KB", `2097152` → "2 MB".
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Builds a unique download filename: `{prefix}_{unix_millis}_{random}.{extension}`.
///
/// The random part is lowercase base-36.
pub fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let random: String = (0..10)
        .filter_map(|_| std::char::from_digit(rng.gen_range(0..36), 36))
        .collect();
    format!("{}_{}_{}.{}", prefix, timestamp, random, extension)
}

/// Estimated number of message characters an image of the given size can carry.
///
/// One bit per RGB channel, 80% of that usable after the end marker, and a
/// further 25% lost to base64 expansion of the ciphertext.
pub fn calculate_message_capacity(width: u32, height: u32) -> u64 {
    let total_bits = width as f64 * height as f64 * 3.0;
    let usable_bits = total_bits * 0.8;
    let usable_bytes = (usable_bits / 8.0).floor();
    (usable_bytes * 0.75).floor() as u64
}
