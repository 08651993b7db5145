//! Font data shared by the rendering tiers

use std::borrow::Cow;

use egui::{FontDefinitions, FontFamily};

/// Bytes of the first proportional font bundled with egui.
///
/// Both rendering tiers add this to their font databases so text still
/// renders on systems without any installed fonts.
pub fn bundled_font() -> Option<Cow<'static, [u8]>> {
    let mut definitions = FontDefinitions::default();
    let name = definitions
        .families
        .get(&FontFamily::Proportional)?
        .first()?
        .clone();
    definitions.font_data.remove(&name).map(|data| data.font)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_font_is_available() {
        let font = bundled_font().unwrap();
        assert!(font.len() > 1024);
    }
}
