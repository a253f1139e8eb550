pub mod client;
pub mod common;
pub mod pages;
pub mod upload;
pub mod validation;

pub use client::{ApiError, HttpStegoClient, StegoService};
pub use common::config::ClientConfig;
pub use pages::{DecodePage, EncodePage, Route, View};
pub use upload::{SelectedFile, UploadControl};
