use super::{layout, Route, View};

/// Placeholder for the messaging platform. Informational only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatPage;

const ROADMAP: [(&str, &str, bool); 4] = [
    (
        "Phase 1: Core Steganography",
        "Encode and decode messages in images",
        true,
    ),
    (
        "Phase 2: Real-time Chat",
        "WebSocket integration, user sessions, message history",
        false,
    ),
    (
        "Phase 3: Advanced Features",
        "Auto-generated cover images, group chats, file sharing",
        false,
    ),
    (
        "Phase 4: Mobile App",
        "Native app with camera integration",
        false,
    ),
];

impl View for ChatPage {
    fn render(&self) -> String {
        let mut body = String::from(
            "Chat Platform\nComing Soon!\nImage messages, group chats and real-time delivery are not available yet.\n",
        );

        body.push_str(&format!(
            "Until then, use {} and {} to exchange hidden messages.\n\nDevelopment Roadmap\n",
            Route::Encode.path(),
            Route::Decode.path()
        ));
        for (phase, text, done) in ROADMAP {
            let mark = if done { "[x]" } else { "[ ]" };
            body.push_str(&format!("{} {}: {}\n", mark, phase, text));
        }

        layout(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_is_a_notice() {
        let screen = ChatPage.render();
        assert!(screen.contains("Coming Soon!"));
        assert!(screen.contains("[x] Phase 1: Core Steganography"));
        assert!(screen.contains("[ ] Phase 2: Real-time Chat"));
    }
}
