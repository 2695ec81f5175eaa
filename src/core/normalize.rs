//! Cleanup of raw backend replies into single-line translations

/// Code-fence markers stripped from replies, longest first so the bare
/// fence does not shadow the language-tagged variants.
const FENCE_MARKERS: &[&str] = &["```japanese", "```ja", "```"];

/// Reduce a raw model reply to a single-line translation.
///
/// Strips the known fence markers by literal substring removal and returns
/// the first non-blank line. This is not a markdown parser: fences with
/// other language tags leave their tag behind, and that tag then wins as
/// the first line. `None` means the reply had no usable content.
pub fn clean_reply(raw: &str) -> Option<String> {
    let mut text = raw.trim().to_string();
    for marker in FENCE_MARKERS {
        text = text.replace(marker, "");
    }

    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_ja_fence() {
        assert_eq!(
            clean_reply("```ja\nこんにちは\n```"),
            Some("こんにちは".to_string())
        );
    }

    #[test]
    fn test_strips_japanese_fence() {
        assert_eq!(
            clean_reply("```japanese\nお薬を飲んでください\n```"),
            Some("お薬を飲んでください".to_string())
        );
    }

    #[test]
    fn test_strips_bare_fence() {
        assert_eq!(
            clean_reply("```\n診断結果\n```"),
            Some("診断結果".to_string())
        );
    }

    #[test]
    fn test_keeps_first_non_blank_line() {
        assert_eq!(
            clean_reply("こんにちは\n\n(explanation omitted)"),
            Some("こんにちは".to_string())
        );
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(clean_reply("  こんにちは  "), Some("こんにちは".to_string()));
    }

    #[test]
    fn test_plain_reply_passes_through() {
        assert_eq!(clean_reply("こんにちは"), Some("こんにちは".to_string()));
    }

    #[test]
    fn test_empty_reply_is_unusable() {
        assert_eq!(clean_reply(""), None);
        assert_eq!(clean_reply("   \n\t\n"), None);
    }

    #[test]
    fn test_fence_only_reply_is_unusable() {
        assert_eq!(clean_reply("```ja\n```"), None);
        assert_eq!(clean_reply("``````"), None);
    }
}
