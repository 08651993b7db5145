//! Print sink
//!
//! Generates a standalone HTML page holding just the post card, styled with
//! inlined CSS for both card themes, and a script that opens the browser's
//! print dialog shortly after load. Independent of the export pipeline.

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use log::info;

use super::artifact::{unix_millis, write_atomically, SinkError};
use super::download::open_saved;
use super::svg::{LIKE_ICON, REPLY_ICON, RETWEET_ICON, SHARE_ICON};
use crate::format::escape_xml;
use crate::preview::{AvatarView, RenderedPreview};
use crate::theme::PostPalette;

/// Title of the print document.
pub const PRINT_TITLE: &str = "Viral Post Screenshot";

/// Default wait between page load and the print dialog.
pub const DEFAULT_PRINT_DELAY_MS: u32 = 500;

// ─────────────────────────────────────────────────────────────────────────────
// Document Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Build the complete print document for a preview.
pub fn generate_print_document(preview: &RenderedPreview, delay_ms: u32) -> String {
    let page = PostPalette::for_theme(preview.theme).page.to_hex();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        @media print {{
            body {{ margin: 0; padding: 20px; }}
            .twitter-post {{ box-shadow: none !important; }}
        }}
        body {{
            margin: 0;
            padding: 20px;
            background: {page};
            font-family: "TwitterChirp", -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;
            display: flex;
            justify-content: center;
            align-items: center;
            min-height: 100vh;
        }}
{card_css}
    </style>
</head>
<body>
{card}
    <script>
        window.onload = function() {{
            setTimeout(function() {{
                window.print();
            }}, {delay});
        }};
    </script>
</body>
</html>
"#,
        title = PRINT_TITLE,
        page = page,
        card_css = card_css(),
        card = post_markup(preview),
        delay = delay_ms,
    )
}

/// The card markup, with every user string escaped.
pub fn post_markup(preview: &RenderedPreview) -> String {
    let mut html = String::with_capacity(2048);

    let _ = writeln!(html, r#"<div class="{}">"#, preview.card_class());
    html.push_str("  <div class=\"post-header\">\n    <div class=\"avatar-container\">\n      <div class=\"avatar\">");
    match &preview.avatar {
        AvatarView::Image {
            source,
            fallback_initials,
        } => {
            let _ = write!(
                html,
                r#"<img src="{}" alt="" onerror="this.style.display='none';this.nextElementSibling.style.display='inline'"><span class="avatar-text" style="display:none">{}</span>"#,
                escape_xml(&file_url(source)),
                escape_xml(fallback_initials)
            );
        }
        AvatarView::Initials(initials) => {
            let _ = write!(
                html,
                r#"<span class="avatar-text">{}</span>"#,
                escape_xml(initials)
            );
        }
    }
    html.push_str("</div>\n    </div>\n    <div class=\"user-info\">\n");

    let _ = write!(
        html,
        r#"      <div class="display-name"><span>{}</span>"#,
        escape_xml(&preview.display_name)
    );
    if preview.verified_badge_visible {
        html.push_str(r#"<span class="verified-badge">✓</span>"#);
    }
    html.push_str("</div>\n");

    let _ = writeln!(
        html,
        r#"      <div class="username-time"><span class="username">{}</span><span class="separator">·</span><span class="time">{}</span></div>"#,
        escape_xml(&preview.at_handle()),
        escape_xml(&preview.timestamp)
    );
    html.push_str("    </div>\n  </div>\n");

    let _ = writeln!(
        html,
        r#"  <div class="post-content"><div class="post-text">{}</div></div>"#,
        escape_xml(&preview.body)
    );

    html.push_str("  <div class=\"post-stats\">\n");
    let stats: [(&[&str], Option<&str>); 4] = [
        (REPLY_ICON, Some(preview.replies.as_str())),
        (RETWEET_ICON, Some(preview.retweets.as_str())),
        (LIKE_ICON, Some(preview.likes.as_str())),
        (SHARE_ICON, None),
    ];
    for (icon, value) in stats {
        html.push_str(r#"    <div class="stat-item"><svg class="stat-icon" viewBox="0 0 24 24" width="18" height="18" fill="currentColor">"#);
        for d in icon {
            let _ = write!(html, r#"<path d="{}"/>"#, d);
        }
        html.push_str("</svg>");
        if let Some(value) = value {
            let _ = write!(html, "<span>{}</span>", escape_xml(value));
        }
        html.push_str("</div>\n");
    }
    html.push_str("  </div>\n</div>");

    html
}

/// Local avatar path as a URL the browser can load.
fn file_url(source: &str) -> String {
    if source.contains("://") {
        return source.to_string();
    }

    let mut segments = Vec::new();
    for component in Path::new(source).components() {
        match component {
            Component::Prefix(prefix) => {
                segments.push(prefix.as_os_str().to_string_lossy().into_owned())
            }
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => segments.push("..".to_string()),
            Component::RootDir | Component::CurDir => {}
        }
    }

    // Windows separators survive on other hosts as part of a single segment
    let joined = segments.join("/").replace('\\', "/").replace(' ', "%20");
    format!("file:///{}", joined.trim_start_matches('/'))
}

fn card_css() -> String {
    let light = PostPalette::light();
    let dark = PostPalette::dark();

    format!(
        r#"        .twitter-post {{
            max-width: 500px;
            border-radius: 16px;
            padding: 20px;
            box-shadow: 0 4px 20px rgba(0,0,0,0.1);
        }}
        .dark-theme {{ background: {dark_bg}; color: {dark_text}; }}
        .light-theme {{ background: {light_bg}; color: {light_text}; border: 1px solid {light_divider}; }}
        .post-header {{ display: flex; align-items: flex-start; margin-bottom: 12px; }}
        .avatar-container {{ margin-right: 12px; }}
        .avatar {{
            width: 48px;
            height: 48px;
            border-radius: 50%;
            background: linear-gradient(45deg, #1da1f2, #1991db);
            display: flex;
            align-items: center;
            justify-content: center;
            overflow: hidden;
        }}
        .avatar img {{ width: 100%; height: 100%; object-fit: cover; border-radius: 50%; }}
        .avatar-text {{ color: white; font-weight: bold; font-size: 18px; }}
        .user-info {{ flex: 1; }}
        .display-name {{ display: flex; align-items: center; gap: 4px; font-weight: 700; font-size: 15px; line-height: 20px; }}
        .verified-badge {{
            background: #1d9bf0;
            color: white;
            border-radius: 50%;
            width: 16px;
            height: 16px;
            display: flex;
            align-items: center;
            justify-content: center;
            font-size: 10px;
        }}
        .username-time {{ display: flex; align-items: center; gap: 4px; margin-top: 2px; }}
        .username, .time, .separator {{ color: {dark_secondary}; font-size: 15px; }}
        .light-theme .username, .light-theme .time, .light-theme .separator {{ color: {light_secondary}; }}
        .post-content {{ margin-bottom: 16px; }}
        .post-text {{ font-size: 15px; line-height: 20px; white-space: pre-wrap; word-wrap: break-word; }}
        .post-stats {{
            display: flex;
            justify-content: space-between;
            align-items: center;
            padding-top: 12px;
            border-top: 1px solid {dark_divider};
            max-width: 425px;
        }}
        .light-theme .post-stats {{ border-top-color: {light_divider}; }}
        .stat-item {{ display: flex; align-items: center; gap: 8px; color: {dark_secondary}; font-size: 13px; }}
        .light-theme .stat-item {{ color: {light_secondary}; }}"#,
        dark_bg = dark.background.to_hex(),
        dark_text = dark.text.to_hex(),
        dark_secondary = dark.secondary.to_hex(),
        dark_divider = dark.divider.to_hex(),
        light_bg = light.background.to_hex(),
        light_text = light.text.to_hex(),
        light_secondary = light.secondary.to_hex(),
        light_divider = light.divider.to_hex(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Opening
// ─────────────────────────────────────────────────────────────────────────────

/// Write the print document to the temp directory and open it in the
/// default browser. Returns the written path.
pub fn open_print_document(preview: &RenderedPreview, delay_ms: u32) -> Result<PathBuf, SinkError> {
    let html = generate_print_document(preview, delay_ms);
    let file_name = format!("viral-post-print-{}.html", unix_millis());
    let path = write_atomically(&std::env::temp_dir(), &file_name, html.as_bytes())?;

    open_saved(&path)?;
    info!("Opened print document {}", path.display());
    Ok(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
