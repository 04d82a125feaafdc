//! Helper utility functions for CLI commands

/// Interpret a `[y/N]` answer; anything but an explicit yes declines
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Environment lookup handed to config resolution
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Horizontal rule for framing terminal output
pub fn rule(width: usize) -> String {
    "-".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes_accepts_y_and_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES "));
        assert!(is_yes("Y"));
    }

    #[test]
    fn test_is_yes_defaults_to_no() {
        assert!(!is_yes(""));
        assert!(!is_yes("\n"));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_rule() {
        assert_eq!(rule(3), "---");
    }
}
