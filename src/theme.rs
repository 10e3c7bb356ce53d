//! Theme management for the egui-based UI.

use eframe::egui::{self, Color32, Rounding, Stroke};

/// Fixed colors for one theme.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub window: Color32,
    pub window_text: Color32,
    pub base: Color32,
    pub alternate_base: Color32,
    pub tooltip_base: Color32,
    pub button: Color32,
    pub active_button: Color32,
    pub button_fill: Color32,
    pub button_border: Color32,
    pub bright_text: Color32,
    pub link: Color32,
    pub highlight: Color32,
    pub highlighted_text: Color32,
    pub focus: Color32,
}

const LIGHT: Palette = Palette {
    window: Color32::from_rgb(240, 240, 240),
    window_text: Color32::BLACK,
    base: Color32::WHITE,
    alternate_base: Color32::from_rgb(240, 240, 240),
    tooltip_base: Color32::from_rgb(255, 255, 225),
    button: Color32::from_rgb(240, 240, 240),
    active_button: Color32::from_rgb(240, 240, 240),
    button_fill: Color32::from_rgb(0xfe, 0xfe, 0xfe),
    button_border: Color32::from_rgb(0xdd, 0xdd, 0xdd),
    bright_text: Color32::RED,
    link: Color32::from_rgb(0, 0, 255),
    highlight: Color32::from_rgb(51, 153, 255),
    highlighted_text: Color32::WHITE,
    focus: Color32::from_rgb(0x2a, 0x82, 0xda),
};

const DARK: Palette = Palette {
    window: Color32::from_rgb(53, 53, 53),
    window_text: Color32::WHITE,
    base: Color32::from_rgb(25, 25, 25),
    alternate_base: Color32::from_rgb(53, 53, 53),
    tooltip_base: Color32::WHITE,
    button: Color32::from_rgb(53, 53, 53),
    active_button: Color32::from_rgb(64, 64, 64),
    button_fill: Color32::from_rgb(0x55, 0x55, 0x55),
    button_border: Color32::from_rgb(0x66, 0x66, 0x66),
    bright_text: Color32::RED,
    link: Color32::from_rgb(42, 130, 218),
    highlight: Color32::from_rgb(42, 130, 218),
    highlighted_text: Color32::BLACK,
    focus: Color32::from_rgb(0x2a, 0x82, 0xda),
};

/// Palette for the dark or light theme.
pub fn palette(dark: bool) -> Palette {
    if dark { DARK } else { LIGHT }
}

/// Build egui visuals from the fixed palette.
pub fn visuals(dark: bool) -> egui::Visuals {
    let p = palette(dark);
    let mut visuals = if dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };

    visuals.override_text_color = Some(p.window_text);
    visuals.window_fill = p.window;
    visuals.panel_fill = p.window;
    visuals.extreme_bg_color = p.base;
    visuals.faint_bg_color = p.alternate_base;
    visuals.code_bg_color = p.tooltip_base;
    visuals.hyperlink_color = p.link;
    visuals.error_fg_color = p.bright_text;
    visuals.selection.bg_fill = p.highlight;
    visuals.selection.stroke = Stroke::new(1.0, p.highlighted_text);

    let rounding = Rounding::same(10.0);
    let border = Stroke::new(2.0, p.button_border);
    let widgets = &mut visuals.widgets;

    widgets.inactive.bg_fill = p.button_fill;
    widgets.inactive.weak_bg_fill = p.button;
    widgets.inactive.bg_stroke = border;
    widgets.inactive.rounding = rounding;

    widgets.hovered.bg_fill = p.active_button;
    widgets.hovered.weak_bg_fill = p.active_button;
    widgets.hovered.bg_stroke = Stroke::new(2.0, p.focus);
    widgets.hovered.rounding = rounding;

    // Pressed and keyboard-focused buttons share the focus color.
    widgets.active.bg_fill = p.focus;
    widgets.active.weak_bg_fill = p.focus;
    widgets.active.bg_stroke = Stroke::new(2.0, p.focus);
    widgets.active.rounding = rounding;

    widgets.open.rounding = rounding;
    widgets.noninteractive.rounding = rounding;

    visuals
}

/// Apply the selected theme to the egui context.
pub fn apply_theme(ctx: &egui::Context, dark: bool) {
    ctx.set_visuals(visuals(dark));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_use_fixed_colors() {
        assert_eq!(palette(true).window, Color32::from_rgb(53, 53, 53));
        assert_eq!(palette(true).base, Color32::from_rgb(25, 25, 25));
        assert_eq!(palette(false).window, Color32::from_rgb(240, 240, 240));
        assert_eq!(palette(false).highlight, Color32::from_rgb(51, 153, 255));
    }

    #[test]
    fn palettes_do_not_overlap() {
        let (light, dark) = (palette(false), palette(true));
        assert_ne!(light.window, dark.window);
        assert_ne!(light.window_text, dark.window_text);
        assert_ne!(light.base, dark.base);
        assert_ne!(light.highlighted_text, dark.highlighted_text);
    }

    #[test]
    fn visuals_follow_flag() {
        let dark = visuals(true);
        assert!(dark.dark_mode);
        assert_eq!(dark.window_fill, Color32::from_rgb(53, 53, 53));
        assert_eq!(dark.widgets.inactive.rounding, Rounding::same(10.0));

        let light = visuals(false);
        assert!(!light.dark_mode);
        assert_eq!(light.override_text_color, Some(Color32::BLACK));
    }
}
