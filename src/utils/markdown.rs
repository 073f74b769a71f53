//! Telegram MarkdownV2 helpers.

/// Characters MarkdownV2 treats as markup outside of code spans.
const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

/// Escapes user-provided text so it renders literally under MarkdownV2.
///
/// ```
/// use eslatma_bot::utils::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("dars (3-xona)!"), "dars \\(3\\-xona\\)\\!");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_uzbek_text_is_untouched() {
        assert_eq!(escape_markdown("darsim bor"), "darsim bor");
        assert_eq!(escape_markdown("uyg‘onish 07:00"), "uyg‘onish 07:00");
        assert_eq!(escape_markdown(""), "");
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        assert_eq!(escape_markdown("*muhim*"), "\\*muhim\\*");
        assert_eq!(escape_markdown("a_b.c"), "a\\_b\\.c");
        assert_eq!(escape_markdown("/ochir_12"), "/ochir\\_12");
        assert_eq!(escape_markdown("1+1=2"), "1\\+1\\=2");
    }

    #[test]
    fn test_backslash_is_escaped() {
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
    }
}
