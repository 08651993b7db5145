//! Post draft data model
//!
//! `PostForm` holds the raw values exactly as the user typed them into the
//! form panel. `PostDraft` is the parsed view of that state, built on demand
//! whenever the preview is refreshed.

use crate::format::{clamp_body, MAX_POST_CHARS};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Post Theme
// ─────────────────────────────────────────────────────────────────────────────

/// Visual theme of the post card (independent of the application theme).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostTheme {
    #[default]
    Light,
    Dark,
}

impl PostTheme {
    /// CSS class applied to the post card for this theme.
    pub fn class_name(&self) -> &'static str {
        match self {
            PostTheme::Light => "light-theme",
            PostTheme::Dark => "dark-theme",
        }
    }

    /// Get a display label for the theme.
    pub fn label(&self) -> &'static str {
        match self {
            PostTheme::Light => "Light",
            PostTheme::Dark => "Dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, PostTheme::Dark)
    }

    /// Get all available post themes.
    pub fn all() -> &'static [PostTheme] {
        &[PostTheme::Light, PostTheme::Dark]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Form State
// ─────────────────────────────────────────────────────────────────────────────

/// Raw form values, one field per input control.
///
/// Counters are kept as text so that whatever the user typed survives
/// round-trips through the text boxes; they are parsed in [`PostForm::to_draft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    pub display_name: String,
    pub username: String,
    pub post_text: String,
    pub likes: String,
    pub retweets: String,
    pub replies: String,
    pub time_stamp: String,
    pub avatar_url: String,
    pub verified: bool,
    pub theme: PostTheme,
}

impl Default for PostForm {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            username: String::new(),
            post_text: String::new(),
            likes: String::from("0"),
            retweets: String::from("0"),
            replies: String::from("0"),
            time_stamp: String::new(),
            avatar_url: String::new(),
            verified: false,
            theme: PostTheme::default(),
        }
    }
}

impl PostForm {
    /// Create an empty form using the given card theme.
    pub fn with_theme(theme: PostTheme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    /// Replace the post body, truncating it to the character limit.
    pub fn set_post_text(&mut self, text: impl Into<String>) {
        self.post_text = text.into();
        self.enforce_char_limit();
    }

    /// Truncate the body to the character limit.
    ///
    /// Returns `true` if the body was too long.
    pub fn enforce_char_limit(&mut self) -> bool {
        clamp_body(&mut self.post_text)
    }

    /// Number of characters currently in the body.
    pub fn char_count(&self) -> usize {
        self.post_text.chars().count()
    }

    /// Parse the form into a draft.
    ///
    /// Counters that fail to parse become 0 and the body is clamped to
    /// [`MAX_POST_CHARS`]. Text fields are kept as typed; placeholders are
    /// the preview's concern.
    pub fn to_draft(&self) -> PostDraft {
        let mut body = self.post_text.clone();
        clamp_body(&mut body);

        let avatar = self.avatar_url.trim();

        PostDraft {
            display_name: self.display_name.clone(),
            handle: self.username.clone(),
            body,
            likes: parse_count(&self.likes),
            retweets: parse_count(&self.retweets),
            replies: parse_count(&self.replies),
            timestamp: self.time_stamp.clone(),
            avatar_source: (!avatar.is_empty()).then(|| avatar.to_string()),
            verified: self.verified,
            theme: self.theme,
        }
    }

    /// Fill the form from a preset. Avatar and theme are left untouched.
    pub fn apply_preset(&mut self, preset: Preset) {
        let content = preset.content();
        self.display_name = content.display_name.to_string();
        self.username = content.username.to_string();
        self.set_post_text(content.post_text);
        self.likes = content.likes.to_string();
        self.retweets = content.retweets.to_string();
        self.replies = content.replies.to_string();
        self.time_stamp = content.time_stamp.to_string();
        self.verified = content.verified;
    }
}

/// Parse a counter field.
///
/// Leading whitespace and an optional `+` are skipped, then the leading run
/// of ASCII digits is used (`"12abc"` is 12). Anything else, including
/// negative numbers, parses as 0. Values too large for `u64` saturate.
pub fn parse_count(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_len = unsigned
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();

    if digits_len == 0 {
        return 0;
    }

    unsigned[..digits_len].parse().unwrap_or(u64::MAX)
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsed Draft
// ─────────────────────────────────────────────────────────────────────────────

/// The post as currently described by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub display_name: String,
    pub handle: String,
    pub body: String,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub timestamp: String,
    /// Local path or `file://` URL of the avatar image
    pub avatar_source: Option<String>,
    pub verified: bool,
    pub theme: PostTheme,
}

impl Default for PostDraft {
    fn default() -> Self {
        PostForm::default().to_draft()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presets
// ─────────────────────────────────────────────────────────────────────────────

/// Built-in sample posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Viral,
    Motivational,
    Funny,
}

/// Field values a preset writes into the form.
#[derive(Debug, Clone, Copy)]
pub struct PresetContent {
    pub display_name: &'static str,
    pub username: &'static str,
    pub post_text: &'static str,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub time_stamp: &'static str,
    pub verified: bool,
}

impl Preset {
    pub fn label(&self) -> &'static str {
        match self {
            Preset::Viral => "🔥 Viral",
            Preset::Motivational => "💪 Motivational",
            Preset::Funny => "😂 Funny",
        }
    }

    pub fn all() -> &'static [Preset] {
        &[Preset::Viral, Preset::Motivational, Preset::Funny]
    }

    pub fn content(&self) -> PresetContent {
        match self {
            Preset::Viral => PresetContent {
                display_name: "Tech Guru",
                username: "techguru",
                post_text: "🚨 BREAKING: Just discovered this AI trick that will change everything!\n\nIt's so simple yet powerful...\n\nThread 👇 (1/7)",
                likes: 15400,
                retweets: 3200,
                replies: 890,
                time_stamp: "3h",
                verified: true,
            },
            Preset::Motivational => PresetContent {
                display_name: "Success Mindset",
                username: "successmindset",
                post_text: "Your biggest competitor is who you were yesterday.\n\nStop comparing yourself to others.\nStart comparing yourself to who you were.\n\n💪 #GrowthMindset",
                likes: 8700,
                retweets: 1500,
                replies: 340,
                time_stamp: "5h",
                verified: true,
            },
            Preset::Funny => PresetContent {
                display_name: "Meme Lord",
                username: "memelord420",
                post_text: "Me: I'll just check Twitter for 5 minutes\n\n*3 hours later*\n\nAlso me: Wait, what year is it? 😅",
                likes: 24600,
                retweets: 6800,
                replies: 1200,
                time_stamp: "1h",
                verified: false,
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_plain_and_prefixed() {
        assert_eq!(parse_count("15400"), 15400);
        assert_eq!(parse_count("  42"), 42);
        assert_eq!(parse_count("+7"), 7);
        assert_eq!(parse_count("12abc"), 12);
    }

    #[test]
    fn test_parse_count_defaults_to_zero() {
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count("-5"), 0);
        assert_eq!(parse_count("1.5e3"), 1);
    }

    #[test]
    fn test_parse_count_saturates() {
        assert_eq!(parse_count("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn test_set_post_text_truncates() {
        let mut form = PostForm::default();
        form.set_post_text("x".repeat(400));
        assert_eq!(form.char_count(), MAX_POST_CHARS);
    }

    #[test]
    fn test_to_draft_clamps_body_typed_directly() {
        let form = PostForm {
            post_text: "y".repeat(290),
            ..PostForm::default()
        };
        let draft = form.to_draft();
        assert_eq!(draft.body.chars().count(), MAX_POST_CHARS);
    }

    #[test]
    fn test_to_draft_avatar_source() {
        let mut form = PostForm::default();
        assert_eq!(form.to_draft().avatar_source, None);

        form.avatar_url = "   ".to_string();
        assert_eq!(form.to_draft().avatar_source, None);

        form.avatar_url = " /tmp/me.png ".to_string();
        assert_eq!(form.to_draft().avatar_source.as_deref(), Some("/tmp/me.png"));
    }

    #[test]
    fn test_apply_preset_viral() {
        let mut form = PostForm::with_theme(PostTheme::Dark);
        form.avatar_url = "/tmp/a.png".to_string();
        form.apply_preset(Preset::Viral);

        let draft = form.to_draft();
        assert_eq!(draft.display_name, "Tech Guru");
        assert_eq!(draft.handle, "techguru");
        assert_eq!(draft.likes, 15400);
        assert_eq!(draft.retweets, 3200);
        assert_eq!(draft.replies, 890);
        assert_eq!(draft.timestamp, "3h");
        assert!(draft.verified);
        // Untouched by presets
        assert_eq!(draft.theme, PostTheme::Dark);
        assert_eq!(draft.avatar_source.as_deref(), Some("/tmp/a.png"));
    }

    #[test]
    fn test_presets_fit_char_limit() {
        for preset in Preset::all() {
            assert!(preset.content().post_text.chars().count() <= MAX_POST_CHARS);
        }
    }

    #[test]
    fn test_post_theme_class_names() {
        assert_eq!(PostTheme::Light.class_name(), "light-theme");
        assert_eq!(PostTheme::Dark.class_name(), "dark-theme");
        assert!(PostTheme::Dark.is_dark());
        assert!(!PostTheme::Light.is_dark());
    }

    #[test]
    fn test_post_theme_serialization() {
        assert_eq!(serde_json::to_string(&PostTheme::Dark).unwrap(), "\"dark\"");
        assert_eq!(
            serde_json::from_str::<PostTheme>("\"light\"").unwrap(),
            PostTheme::Light
        );
    }
}
