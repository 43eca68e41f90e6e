/// Shorten `text` to at most `max_chars` characters, ending in `…` when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(truncate("Drums", 12), "Drums");
        assert_eq!(truncate("", 12), "");
        assert_eq!(truncate("exactly-twelve", 14), "exactly-twelve");
    }

    #[test]
    fn test_long_text_gets_ellipsis() {
        assert_eq!(truncate("Background Vocals", 12), "Background …");
        assert_eq!(truncate("Background Vocals", 12).chars().count(), 12);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(truncate("Canción número uno", 8), "Canción…");
    }
}
