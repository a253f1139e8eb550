//! # Client Components
//!
//! Everything needed to reach the external steganography service.
//!
//! ## Transport ([`client`])
//! The [`StegoService`] trait the pages depend on, and [`HttpStegoClient`],
//! its reqwest implementation (multipart uploads, JSON responses, timeout).
//!
//! ## Errors ([`error`])
//! [`ApiError`]: service-reported failures versus network failures.
//!
//! ## Test double ([`mock`])
//! [`MockStegoService`] with scripted responses and recorded calls.

pub mod client;
pub mod error;
pub mod mock;

// Re-export for convenience
pub use client::{HttpStegoClient, StegoService};
pub use error::{ApiError, NETWORK_ERROR_MESSAGE, UNAVAILABLE_MESSAGE};
pub use mock::{MockCall, MockStegoService};
