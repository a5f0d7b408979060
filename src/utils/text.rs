/// Normalize user-entered ticker text into the canonical uppercase symbol.
pub fn normalize_ticker(input: &str) -> Option<String> {
    let symbol: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if symbol.is_empty() {
        None
    } else {
        Some(symbol)
    }
}

/// Render `first8...last4` for a secret, or a fully masked value when it is too short.
pub fn key_preview(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Cut `text` to at most `max_chars` characters, appending `...` when shortened.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_ticker_input() {
        assert_eq!(normalize_ticker(" aapl "), Some("AAPL".to_string()));
        assert_eq!(normalize_ticker("brk.b"), Some("BRKB".to_string()));
        assert_eq!(normalize_ticker("../"), None);
    }

    #[test]
    fn short_keys_are_fully_masked() {
        assert_eq!(key_preview("secret"), "******");
        assert_eq!(key_preview(""), "");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo world", 5), "héllo...");
        assert_eq!(truncate_chars("short", 10), "short");
    }
}
