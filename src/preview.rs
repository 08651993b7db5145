//! Preview renderer
//!
//! Projects a [`PostDraft`] into the exact strings and flags the post card
//! displays. The result is a plain value: the card widget, the export tiers
//! and the print document all read from the same `RenderedPreview`.

use crate::draft::{PostDraft, PostTheme};
use crate::format::{avatar_initials, format_count, MAX_POST_CHARS};

/// Shown when the display name is empty.
pub const PLACEHOLDER_NAME: &str = "Anonymous";
/// Shown when the handle is empty.
pub const PLACEHOLDER_HANDLE: &str = "anonymous";
/// Shown when the body is empty.
pub const PLACEHOLDER_BODY: &str = "Your post will appear here...";
/// Shown when the timestamp is empty.
pub const PLACEHOLDER_TIME: &str = "1m";

/// Character counter colour while within the limit.
pub const COUNTER_COLOR_OK: &str = "#657786";
/// Character counter colour once over the limit.
pub const COUNTER_COLOR_OVER: &str = "#ff6b6b";

/// What the avatar slot shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarView {
    /// Initials on the gradient circle
    Initials(String),
    /// An image, with initials to show if it cannot be loaded
    Image {
        source: String,
        fallback_initials: String,
    },
}

impl AvatarView {
    /// Initials to draw whenever the image is absent or unusable.
    pub fn initials(&self) -> &str {
        match self {
            AvatarView::Initials(initials) => initials,
            AvatarView::Image {
                fallback_initials, ..
            } => fallback_initials,
        }
    }

    pub fn image_source(&self) -> Option<&str> {
        match self {
            AvatarView::Initials(_) => None,
            AvatarView::Image { source, .. } => Some(source),
        }
    }
}

/// The visible state of the post card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPreview {
    pub display_name: String,
    pub handle: String,
    pub timestamp: String,
    pub body: String,
    pub likes: String,
    pub retweets: String,
    pub replies: String,
    pub verified_badge_visible: bool,
    pub avatar: AvatarView,
    pub theme: PostTheme,
    /// Characters in the body as typed
    pub char_count: usize,
}

impl RenderedPreview {
    /// Render a draft. Pure and deterministic.
    pub fn render(draft: &PostDraft) -> Self {
        let initials = avatar_initials(&draft.display_name);
        let avatar = match &draft.avatar_source {
            Some(source) => AvatarView::Image {
                source: source.clone(),
                fallback_initials: initials,
            },
            None => AvatarView::Initials(initials),
        };

        Self {
            display_name: or_placeholder(&draft.display_name, PLACEHOLDER_NAME),
            handle: or_placeholder(&draft.handle, PLACEHOLDER_HANDLE),
            timestamp: or_placeholder(&draft.timestamp, PLACEHOLDER_TIME),
            body: or_placeholder(&draft.body, PLACEHOLDER_BODY),
            likes: format_count(draft.likes),
            retweets: format_count(draft.retweets),
            replies: format_count(draft.replies),
            verified_badge_visible: draft.verified,
            avatar,
            theme: draft.theme,
            char_count: draft.body.chars().count(),
        }
    }

    /// Full class attribute of the card, e.g. `twitter-post dark-theme`.
    pub fn card_class(&self) -> String {
        format!("twitter-post {}", self.theme.class_name())
    }

    /// `@handle`
    pub fn at_handle(&self) -> String {
        format!("@{}", self.handle)
    }

    /// `@handle · 3h`, as shown under the display name.
    pub fn handle_line(&self) -> String {
        format!("@{} · {}", self.handle, self.timestamp)
    }

    /// Body split into display lines on embedded newlines.
    pub fn body_lines(&self) -> impl Iterator<Item = &str> {
        self.body.split('\n').map(|line| line.trim_end_matches('\r'))
    }

    pub fn body_line_count(&self) -> usize {
        self.body_lines().count()
    }

    pub fn char_counter_label(&self) -> String {
        format!("{}/{}", self.char_count, MAX_POST_CHARS)
    }

    pub fn char_counter_color(&self) -> &'static str {
        if self.char_count > MAX_POST_CHARS {
            COUNTER_COLOR_OVER
        } else {
            COUNTER_COLOR_OK
        }
    }
}

impl Default for RenderedPreview {
    fn default() -> Self {
        Self::render(&PostDraft::default())
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::PostForm;

    #[test]
    fn test_placeholders_for_empty_form() {
        let preview = RenderedPreview::render(&PostForm::default().to_draft());
        assert_eq!(preview.display_name, "Anonymous");
        assert_eq!(preview.handle, "anonymous");
        assert_eq!(preview.body, "Your post will appear here...");
        assert_eq!(preview.timestamp, "1m");
        assert_eq!(preview.likes, "0");
        assert_eq!(preview.retweets, "0");
        assert_eq!(preview.replies, "0");
        assert!(!preview.verified_badge_visible);
        assert_eq!(preview.avatar, AvatarView::Initials(String::new()));
    }

    #[test]
    fn test_end_to_end_tech_guru() {
        let form = PostForm {
            display_name: "Tech Guru".to_string(),
            username: "techguru".to_string(),
            likes: "15400".to_string(),
            ..PostForm::default()
        };
        let preview = RenderedPreview::render(&form.to_draft());

        assert_eq!(preview.avatar.initials(), "TG");
        assert_eq!(preview.likes, "15.4K");
        assert_eq!(preview.handle_line(), "@techguru · 1m");
    }

    #[test]
    fn test_unparsable_counts_render_zero() {
        let form = PostForm {
            likes: "lots".to_string(),
            retweets: String::new(),
            replies: "2500000".to_string(),
            ..PostForm::default()
        };
        let preview = RenderedPreview::render(&form.to_draft());
        assert_eq!(preview.likes, "0");
        assert_eq!(preview.retweets, "0");
        assert_eq!(preview.replies, "2.5M");
    }

    #[test]
    fn test_verified_toggle_reflected_in_same_render() {
        let mut form = PostForm::default();
        form.verified = true;
        assert!(RenderedPreview::render(&form.to_draft()).verified_badge_visible);
        form.verified = false;
        assert!(!RenderedPreview::render(&form.to_draft()).verified_badge_visible);
    }

    #[test]
    fn test_avatar_image_keeps_fallback_initials() {
        let form = PostForm {
            display_name: "Madonna".to_string(),
            avatar_url: "file:///tmp/madonna.png".to_string(),
            ..PostForm::default()
        };
        let preview = RenderedPreview::render(&form.to_draft());
        assert_eq!(
            preview.avatar,
            AvatarView::Image {
                source: "file:///tmp/madonna.png".to_string(),
                fallback_initials: "MA".to_string(),
            }
        );
        assert_eq!(preview.avatar.image_source(), Some("file:///tmp/madonna.png"));
    }

    #[test]
    fn test_theme_class_replaces_previous() {
        let mut form = PostForm::with_theme(PostTheme::Dark);
        assert_eq!(
            RenderedPreview::render(&form.to_draft()).card_class(),
            "twitter-post dark-theme"
        );
        form.theme = PostTheme::Light;
        assert_eq!(
            RenderedPreview::render(&form.to_draft()).card_class(),
            "twitter-post light-theme"
        );
    }

    #[test]
    fn test_body_lines_split_on_newlines() {
        let form = PostForm {
            post_text: "one\r\ntwo\n\nfour".to_string(),
            ..PostForm::default()
        };
        let preview = RenderedPreview::render(&form.to_draft());
        let lines: Vec<&str> = preview.body_lines().collect();
        assert_eq!(lines, vec!["one", "two", "", "four"]);
        assert_eq!(preview.body_line_count(), 4);
    }

    #[test]
    fn test_char_counter_reflects_truncated_length() {
        let mut form = PostForm::default();
        form.set_post_text("z".repeat(300));
        let preview = RenderedPreview::render(&form.to_draft());
        assert_eq!(preview.char_count, 280);
        assert_eq!(preview.char_counter_label(), "280/280");
        assert_eq!(preview.char_counter_color(), COUNTER_COLOR_OK);
    }
}
