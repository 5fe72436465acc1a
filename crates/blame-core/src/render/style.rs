/// ANSI escape codes.
mod codes {
    pub const ACCENT: &str = "\x1b[32m"; // Green
    pub const HIGHLIGHT: &str = "\x1b[41m\x1b[37m"; // White on red
    pub const RESET: &str = "\x1b[0m";
}

/// Decoration applied to a whole output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    /// Location lines.
    Accent,
    /// The call-site row of a source window.
    Highlight,
}

impl Style {
    /// Decorate `text`. With `enabled == false` this is the identity.
    pub fn paint(self, text: &str, enabled: bool) -> String {
        let code = match self {
            Style::Plain => None,
            Style::Accent => Some(codes::ACCENT),
            Style::Highlight => Some(codes::HIGHLIGHT),
        };
        match code {
            Some(code) if enabled => format!("{code}{text}{}", codes::RESET),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_identity() {
        for style in [Style::Plain, Style::Accent, Style::Highlight] {
            assert_eq!(style.paint("a.rs:1:1", false), "a.rs:1:1");
        }
    }

    #[test]
    fn test_enabled_wraps_text() {
        assert_eq!(Style::Accent.paint("x", true), "\x1b[32mx\x1b[0m");
        assert_eq!(Style::Highlight.paint("x", true), "\x1b[41m\x1b[37mx\x1b[0m");
        assert_eq!(Style::Plain.paint("x", true), "x");
    }
}
