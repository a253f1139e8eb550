//! # Page Controllers
//!
//! Each page collects user input, calls the [`StegoService`](crate::client::StegoService)
//! and renders the outcome.
//!
//! ## Pages
//!
//! - [`EncodePage`]: image + message → key and encoded image
//! - [`DecodePage`]: encoded image + key → hidden message
//! - [`HomePage`], [`ChatPage`]: static informational views
//!
//! ## Submission lifecycle
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Succeeded ──reset──▶ Idle
//!                      │
//!                      └──err──▶ Failed (still editable) ──submit──▶ Submitting
//! ```
//!
//! Only one request per page can be in flight. Pages hold the service
//! outcome as data; errors never escape a page as `Err`.

pub mod chat;
pub mod decode;
pub mod encode;
pub mod home;

pub use chat::ChatPage;
pub use decode::DecodePage;
pub use encode::{DownloadedImage, EncodePage};
pub use home::HomePage;

/// Where a page is in its submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    /// Editable, nothing sent yet
    Idle,
    /// Request in flight; inputs disabled
    Submitting,
    /// Request succeeded; inputs cleared
    Succeeded(T),
    /// Request failed or form incomplete; inputs kept for another try
    Failed(String),
}

impl<T> Default for Phase<T> {
    fn default() -> Self {
        Phase::Idle
    }
}

impl<T> Phase<T> {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Phase::Submitting)
    }

    /// Inputs are shown and accept edits.
    pub fn is_editable(&self) -> bool {
        matches!(self, Phase::Idle | Phase::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Phase::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}

/// Something that renders itself as a plain-text screen.
pub trait View {
    fn render(&self) -> String;
}

/// Navigable locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Encode,
    Decode,
    Chat,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Home, Route::Encode, Route::Decode, Route::Chat];

    /// Resolves a path; anything unknown lands on the home page.
    pub fn from_path(path: &str) -> Self {
        match path.trim().trim_end_matches('/') {
            "/encode" | "encode" => Route::Encode,
            "/decode" | "decode" => Route::Decode,
            "/chat" | "chat" => Route::Chat,
            _ => Route::Home,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Encode => "/encode",
            Route::Decode => "/decode",
            Route::Chat => "/chat",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Encode => "Encode",
            Route::Decode => "Decode",
            Route::Chat => "Chat",
        }
    }

    /// A fresh view of the page behind this route.
    pub fn view(self) -> Box<dyn View> {
        match self {
            Route::Home => Box::new(HomePage),
            Route::Encode => Box::new(EncodePage::new()),
            Route::Decode => Box::new(DecodePage::new()),
            Route::Chat => Box::new(ChatPage),
        }
    }
}

/// Wraps a page body in the shared header and footer.
pub(crate) fn layout(body: &str) -> String {
    let nav: Vec<String> = Route::ALL
        .iter()
        .map(|r| format!("{} ({})", r.label(), r.path()))
        .collect();

    format!(
        "Hideout | Steganography Messaging\n{}\n\n{}\n\nSecure • Encrypted • Anonymous\n",
        nav.join("  "),
        body.trim_end()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_resolution() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path("/encode"), Route::Encode);
        assert_eq!(Route::from_path("/decode/"), Route::Decode);
        assert_eq!(Route::from_path("chat"), Route::Chat);
        assert_eq!(Route::from_path("/settings"), Route::Home);
        assert_eq!(Route::from_path(""), Route::Home);

        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn test_phase_helpers() {
        let idle: Phase<u8> = Phase::default();
        assert!(idle.is_editable());
        assert!(!idle.is_submitting());

        let failed: Phase<u8> = Phase::Failed("nope".to_string());
        assert!(failed.is_editable());
        assert_eq!(failed.error(), Some("nope"));

        assert!(!Phase::<u8>::Submitting.is_editable());
        assert_eq!(Phase::Succeeded(3u8).result(), Some(&3));
        assert!(!Phase::Succeeded(3u8).is_editable());
    }

    #[test]
    fn test_every_route_renders_inside_layout() {
        for route in Route::ALL {
            let screen = route.view().render();
            assert!(screen.starts_with("Hideout | Steganography Messaging"));
            assert!(screen.contains("Secure • Encrypted • Anonymous"));
        }
    }
}
