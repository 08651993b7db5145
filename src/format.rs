//! Formatting helpers for the post preview
//!
//! Small, dependency-free string utilities shared by the preview renderer,
//! the export tiers and the print document.

/// Maximum number of characters allowed in a post body.
pub const MAX_POST_CHARS: usize = 280;

// ─────────────────────────────────────────────────────────────────────────────
// Counters
// ─────────────────────────────────────────────────────────────────────────────

/// Abbreviate an engagement counter the way social feeds display it.
///
/// - `n >= 1_000_000` renders as millions with one decimal (`2.5M`)
/// - `n >= 1_000` renders as thousands with one decimal (`15.4K`)
/// - anything smaller is the plain integer
///
/// A trailing `.0` is dropped, so `1_000_000` becomes `1M`.
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        abbreviate(n as f64 / 1_000_000.0, 'M')
    } else if n >= 1_000 {
        abbreviate(n as f64 / 1_000.0, 'K')
    } else {
        n.to_string()
    }
}

fn abbreviate(value: f64, suffix: char) -> String {
    let fixed = format!("{:.1}", value);
    let trimmed = fixed.strip_suffix(".0").unwrap_or(&fixed);
    format!("{}{}", trimmed, suffix)
}

// ─────────────────────────────────────────────────────────────────────────────
// Avatar Initials
// ─────────────────────────────────────────────────────────────────────────────

/// Compute the avatar initials for a display name.
///
/// With two or more space-separated words the first letter of each of the
/// first two words is used; otherwise the first two characters of the name.
/// The result is upper-cased. An empty name yields an empty string.
pub fn avatar_initials(name: &str) -> String {
    let trimmed = name.trim();
    let words: Vec<&str> = trimmed.split(' ').collect();

    let initials: String = if words.len() >= 2 {
        words
            .iter()
            .take(2)
            .filter_map(|word| word.chars().next())
            .collect()
    } else {
        trimmed.chars().take(2).collect()
    };

    initials.to_uppercase()
}

// ─────────────────────────────────────────────────────────────────────────────
// Escaping
// ─────────────────────────────────────────────────────────────────────────────

/// Escape the five XML metacharacters (`& < > " '`).
///
/// Used for every piece of user text embedded in SVG or HTML output.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Body Length
// ─────────────────────────────────────────────────────────────────────────────

/// Truncate `text` in place to at most [`MAX_POST_CHARS`] characters.
///
/// Returns `true` if anything was removed.
pub fn clamp_body(text: &mut String) -> bool {
    match text.char_indices().nth(MAX_POST_CHARS) {
        Some((byte_index, _)) => {
            text.truncate(byte_index);
            true
        }
        None => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count_small_values_are_plain() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn test_format_count_thousands() {
        assert_eq!(format_count(1000), "1K");
        assert_eq!(format_count(1500), "1.5K");
        assert_eq!(format_count(15400), "15.4K");
        assert_eq!(format_count(890_000), "890K");
    }

    #[test]
    fn test_format_count_millions() {
        assert_eq!(format_count(1_000_000), "1M");
        assert_eq!(format_count(2_500_000), "2.5M");
        assert_eq!(format_count(12_340_000), "12.3M");
    }

    #[test]
    fn test_format_count_rounds_up_to_next_unit_label() {
        // 999_999 / 1000 rounds to 1000.0, which stays in the K bucket
        assert_eq!(format_count(999_999), "1000K");
    }

    #[test]
    fn test_avatar_initials_two_words() {
        assert_eq!(avatar_initials("Tech Guru"), "TG");
        assert_eq!(avatar_initials("success mindset coach"), "SM");
    }

    #[test]
    fn test_avatar_initials_single_word() {
        assert_eq!(avatar_initials("Madonna"), "MA");
        assert_eq!(avatar_initials("x"), "X");
    }

    #[test]
    fn test_avatar_initials_trims_and_handles_empty() {
        assert_eq!(avatar_initials("  Meme Lord  "), "ML");
        assert_eq!(avatar_initials(""), "");
        assert_eq!(avatar_initials("   "), "");
    }

    #[test]
    fn test_avatar_initials_non_ascii() {
        assert_eq!(avatar_initials("élodie"), "ÉL");
    }

    #[test]
    fn test_escape_xml_all_metacharacters() {
        assert_eq!(escape_xml("<a>&\"'"), "&lt;a&gt;&amp;&quot;&apos;");
    }

    #[test]
    fn test_escape_xml_plain_text_unchanged() {
        assert_eq!(escape_xml("Thread 👇 (1/7)"), "Thread 👇 (1/7)");
    }

    #[test]
    fn test_escape_xml_ampersand_not_double_escaped_in_one_pass() {
        assert_eq!(escape_xml("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_clamp_body_truncates_to_limit() {
        let mut text = "a".repeat(300);
        assert!(clamp_body(&mut text));
        assert_eq!(text.chars().count(), MAX_POST_CHARS);
    }

    #[test]
    fn test_clamp_body_leaves_short_text() {
        let mut text = String::from("hello");
        assert!(!clamp_body(&mut text));
        assert_eq!(text, "hello");

        let mut exact = "b".repeat(MAX_POST_CHARS);
        assert!(!clamp_body(&mut exact));
        assert_eq!(exact.chars().count(), MAX_POST_CHARS);
    }

    #[test]
    fn test_clamp_body_counts_characters_not_bytes() {
        let mut text = "🚀".repeat(281);
        assert!(clamp_body(&mut text));
        assert_eq!(text.chars().count(), MAX_POST_CHARS);
        assert!(text.chars().all(|c| c == '🚀'));
    }
}
