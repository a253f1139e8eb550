use super::{layout, Route, View};

/// Landing page: what the product does and where to go next.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomePage;

const FEATURES: [(&str, &str); 3] = [
    (
        "Military-Grade Encryption",
        "Every message is encrypted with its own key before it is hidden.",
    ),
    (
        "Invisible Steganography",
        "The encoded image looks identical to the original.",
    ),
    (
        "Easy to Use",
        "Pick an image, type a message, share the result.",
    ),
];

const STEPS: [(&str, &str); 3] = [
    (
        "Upload & Encrypt",
        "Choose an image and type your secret message. We encrypt it with a unique key.",
    ),
    (
        "Hide in Pixels",
        "The encrypted message is embedded into the image pixels invisibly using steganography.",
    ),
    (
        "Share Securely",
        "Send the image anywhere. Only someone with the decryption key can reveal the message.",
    ),
];

impl View for HomePage {
    fn render(&self) -> String {
        let mut body = String::from(
            "Hideout\nHide secret messages in images using encryption and steganography.\n\n",
        );

        for (title, text) in FEATURES {
            body.push_str(&format!("* {}: {}\n", title, text));
        }

        body.push_str("\nHow It Works\n");
        for (n, (title, text)) in STEPS.iter().enumerate() {
            body.push_str(&format!("{}. {}: {}\n", n + 1, title, text));
        }

        body.push_str(&format!(
            "\nReady to Try?\nStart sending secret messages hidden in plain sight: {} or {}\n",
            Route::Encode.path(),
            Route::Decode.path()
        ));
        body.push_str(
            "\nSecurity Notice\nKeep your decryption keys private. Anyone holding the image and its key can read the message.\n",
        );

        layout(&body)
    }
}
