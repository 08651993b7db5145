//! Live post card
//!
//! Paints the rendered preview with the egui painter using the same card
//! geometry as the SVG reconstruction, so a cropped screenshot and a rebuilt
//! card line up.

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Stroke, TextureHandle, Ui, Vec2,
};

use crate::draft::PostTheme;
use crate::export::capture::CARD_CORNER_RADIUS;
use crate::export::pipeline::{card_height, BODY_TOP, CARD_WIDTH};
use crate::preview::RenderedPreview;
use crate::theme::{PostPalette, AVATAR_GRADIENT_START, BADGE_BLUE};

const AVATAR_CENTER: Vec2 = Vec2::new(44.0, 44.0);
const AVATAR_RADIUS: f32 = 24.0;
const TEXT_LEFT: f32 = 80.0;
const BODY_LEFT: f32 = 20.0;
const BODY_FONT_SIZE: f32 = 15.0;
const BADGE_RADIUS: f32 = 8.0;

/// Stats row: x offset, icon, value.
fn stat_items(preview: &RenderedPreview) -> [(f32, &'static str, Option<&str>); 4] {
    [
        (20.0, "💬", Some(preview.replies.as_str())),
        (120.0, "🔁", Some(preview.retweets.as_str())),
        (220.0, "❤", Some(preview.likes.as_str())),
        (320.0, "📤", None),
    ]
}

/// Width available to the body text.
pub fn body_wrap_width() -> f32 {
    CARD_WIDTH - 2.0 * BODY_LEFT
}

/// Paint the card and return its screen rectangle.
pub fn show(ui: &mut Ui, preview: &RenderedPreview, avatar: Option<&TextureHandle>) -> Rect {
    let palette = PostPalette::for_theme(preview.theme);
    let text_color = palette.text.to_color32();
    let secondary = palette.secondary.to_color32();

    let body = ui.fonts(|fonts| {
        fonts.layout(
            preview.body.clone(),
            FontId::proportional(BODY_FONT_SIZE),
            text_color,
            body_wrap_width(),
        )
    });
    let height = card_height(body.rows.len());

    let (rect, _) = ui.allocate_exact_size(Vec2::new(CARD_WIDTH, height), Sense::hover());
    if !ui.is_rect_visible(rect) {
        return rect;
    }

    let painter = ui.painter_at(rect);
    let origin = rect.min;
    let at = |x: f32, y: f32| origin + Vec2::new(x, y);

    let border = match preview.theme {
        PostTheme::Light => Stroke::new(1.0, palette.divider.to_color32()),
        PostTheme::Dark => Stroke::NONE,
    };
    painter.rect(
        rect,
        Rounding::same(CARD_CORNER_RADIUS),
        palette.background.to_color32(),
        border,
    );

    // Avatar
    let avatar_center = origin + AVATAR_CENTER;
    match avatar {
        Some(texture) => {
            let avatar_rect = Rect::from_center_size(avatar_center, Vec2::splat(AVATAR_RADIUS * 2.0));
            egui::Image::new(texture)
                .rounding(Rounding::same(AVATAR_RADIUS))
                .paint_at(ui, avatar_rect);
        }
        None => {
            painter.circle_filled(avatar_center, AVATAR_RADIUS, AVATAR_GRADIENT_START.to_color32());
            painter.text(
                avatar_center,
                Align2::CENTER_CENTER,
                preview.avatar.initials(),
                FontId::proportional(16.0),
                Color32::WHITE,
            );
        }
    }

    // Name, badge, handle
    let name_rect = painter.text(
        at(TEXT_LEFT, 35.0),
        Align2::LEFT_BOTTOM,
        &preview.display_name,
        FontId::proportional(15.0),
        text_color,
    );
    if preview.verified_badge_visible {
        paint_badge(&painter, Pos2::new(name_rect.right() + 12.0, name_rect.center().y));
    }
    painter.text(
        at(TEXT_LEFT, 56.0),
        Align2::LEFT_BOTTOM,
        preview.handle_line(),
        FontId::proportional(15.0),
        secondary,
    );

    // Body: first baseline at BODY_TOP
    painter.galley(at(BODY_LEFT, BODY_TOP - BODY_FONT_SIZE), body, text_color);

    // Divider and stats
    let divider_y = origin.y + height - 50.0;
    painter.hline(
        (origin.x + 20.0)..=(rect.right() - 20.0),
        divider_y,
        Stroke::new(1.0, palette.divider.to_color32()),
    );

    let stats_top = height - 35.0;
    for (x, icon, value) in stat_items(preview) {
        painter.text(
            at(x, stats_top),
            Align2::LEFT_TOP,
            icon,
            FontId::proportional(16.0),
            secondary,
        );
        if let Some(value) = value {
            painter.text(
                at(x + 25.0, stats_top + 2.0),
                Align2::LEFT_TOP,
                value,
                FontId::proportional(13.0),
                secondary,
            );
        }
    }

    rect
}

fn paint_badge(painter: &egui::Painter, center: Pos2) {
    painter.circle_filled(center, BADGE_RADIUS, BADGE_BLUE.to_color32());
    let stroke = Stroke::new(1.8, Color32::WHITE);
    let start = center + Vec2::new(-3.5, 0.0);
    let mid = start + Vec2::new(2.5, 2.5);
    let end = mid + Vec2::new(4.5, -5.0);
    painter.line_segment([start, mid], stroke);
    painter.line_segment([mid, end], stroke);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::PostForm;
    use crate::export::pipeline::MIN_CARD_HEIGHT;

    fn card_rect(preview: &RenderedPreview) -> Rect {
        let ctx = egui::Context::default();
        let mut card = Rect::NOTHING;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                card = show(ui, preview, None);
            });
        });
        card
    }

    fn preview_with_body(body: &str) -> RenderedPreview {
        let mut form = PostForm::default();
        form.set_post_text(body);
        RenderedPreview::render(&form.to_draft())
    }

    #[test]
    fn test_short_post_uses_minimum_height() {
        let rect = card_rect(&preview_with_body("gm"));
        assert_eq!(rect.width(), CARD_WIDTH);
        assert_eq!(rect.height(), MIN_CARD_HEIGHT);
    }

    #[test]
    fn test_long_post_grows_card() {
        let body = (1..=8).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let rect = card_rect(&preview_with_body(&body));
        assert_eq!(rect.height(), card_height(8));
        assert!(rect.height() > MIN_CARD_HEIGHT);
    }

    #[test]
    fn test_body_wrap_width() {
        assert_eq!(body_wrap_width(), 460.0);
    }
}
