//! Preferences dialog.
//!
//! The dialog never mutates preferences itself. Every widget change is sent
//! as a [`PreferenceChange`] to the backdrop window, which applies and
//! persists it.

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use eframe::egui::{self, Key, Modifiers, RichText};
use tracing::{debug, warn};

use crate::image_ops::{IMAGE_EXTENSIONS, browse_start_dir, is_supported_image};
use crate::placement::{AnchorPoint, CUSTOM_SCALE_LIMIT, ScalingMode};
use crate::settings::{DialogPosition, PreferenceChange, Preferences};

const TITLE: &str = "Focus Backdrop Preferences";
const DIALOG_WIDTH: f32 = 660.0;
/// Track length of the vertical custom-scale slider.
const CUSTOM_SLIDER_LENGTH: f32 = 320.0;

/// Scaling radio buttons grouped under their headings.
const SCALING_GROUPS: [(&str, &[ScalingMode]); 3] = [
    ("No Scaling:", &[ScalingMode::NoScale, ScalingMode::Custom]),
    ("Fill:", &[ScalingMode::FillDistort, ScalingMode::FillCrop]),
    (
        "Fit:",
        &[
            ScalingMode::FitNoCrop,
            ScalingMode::FitWidth,
            ScalingMode::FitHeight,
        ],
    ),
];

pub struct PreferencesDialog {
    open: bool,
    changes: Sender<PreferenceChange>,
    /// Last position reported to the window, to avoid resending on every frame.
    reported_position: DialogPosition,
}

impl PreferencesDialog {
    pub fn new(changes: Sender<PreferenceChange>, position: DialogPosition) -> Self {
        Self {
            open: false,
            changes,
            reported_position: position,
        }
    }

    pub fn open(&mut self) {
        debug!("opening preferences dialog");
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn send(&self, change: PreferenceChange) {
        debug!(?change, "preference changed");
        let _ = self.changes.send(change);
    }

    /// Draw the dialog when open. Consumes Ctrl+W while open.
    ///
    /// Closing reports the final position, even mid-drag.
    pub fn ui(&mut self, ctx: &egui::Context, prefs: &Preferences) {
        if !self.open {
            return;
        }
        let close_requested = ctx.input_mut(|i| i.consume_key(Modifiers::COMMAND, Key::W));

        let start = prefs.dialog_position;
        let mut open = self.open;
        let shown = egui::Window::new(TITLE)
            .id(egui::Id::new("preferences_dialog"))
            .default_pos(egui::pos2(start.x as f32, start.y as f32))
            .default_width(DIALOG_WIDTH)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| self.contents(ui, prefs));
        self.open = open && !close_requested;

        if let Some(shown) = shown {
            let min = shown.response.rect.min;
            let position = DialogPosition {
                x: min.x.round() as i32,
                y: min.y.round() as i32,
            };
            let dragging = ctx.input(|i| i.pointer.any_down());
            if position != self.reported_position && (!dragging || !self.open) {
                self.reported_position = position;
                self.send(PreferenceChange::DialogMoved(position));
            }
        }
    }

    fn contents(&self, ui: &mut egui::Ui, prefs: &Preferences) {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            let mut dark = prefs.dark_theme;
            if ui
                .checkbox(&mut dark, RichText::new("Dark Theme").strong())
                .changed()
            {
                self.send(PreferenceChange::DarkTheme(dark));
            }
        });

        ui.add_space(20.0);
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                self.anchor_grid(ui, prefs);
                ui.add_space(20.0);
                self.scaling_options(ui, prefs);
            });
            ui.add_space(30.0);

            let mut custom = prefs
                .custom_scale_value
                .clamp(-CUSTOM_SCALE_LIMIT, CUSTOM_SCALE_LIMIT);
            ui.spacing_mut().slider_width = CUSTOM_SLIDER_LENGTH;
            let slider = egui::Slider::new(&mut custom, -CUSTOM_SCALE_LIMIT..=CUSTOM_SCALE_LIMIT)
                .vertical()
                .show_value(false);
            if ui
                .add(slider)
                .on_hover_text("Custom scale")
                .changed()
            {
                self.send(PreferenceChange::CustomScale(custom));
            }
        });

        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Image to Display").strong().size(16.0));
        });
        ui.label(RichText::new(&prefs.image_path).size(16.0));

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let mut rgb = [
                prefs.background_color.r,
                prefs.background_color.g,
                prefs.background_color.b,
            ];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                self.send(PreferenceChange::BackgroundRgb(rgb));
            }
            ui.label(RichText::new("Background Color").strong());

            ui.add_space(40.0);
            if ui.button(RichText::new("Clear Image").strong()).clicked() {
                self.send(PreferenceChange::ImageCleared);
            }
            ui.add_space(40.0);
            if ui.button(RichText::new("Change Image").strong()).clicked() {
                if let Some(path) = pick_image(prefs) {
                    self.send(PreferenceChange::ImageSelected(path));
                }
            }
        });

        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("<< Clear      Background Color Transparency      Opaque >>").strong(),
            );
        });
        let mut alpha = prefs.background_color.a;
        ui.spacing_mut().slider_width = DIALOG_WIDTH - 40.0;
        if ui
            .add(egui::Slider::new(&mut alpha, 0..=255).show_value(false))
            .changed()
        {
            self.send(PreferenceChange::Alpha(alpha));
        }
    }

    fn anchor_grid(&self, ui: &mut egui::Ui, prefs: &Preferences) {
        ui.label(RichText::new("Anchor Point").strong().size(17.0));
        egui::Grid::new("anchor_grid")
            .spacing([24.0, 12.0])
            .show(ui, |ui| {
                for (idx, anchor) in AnchorPoint::ALL.into_iter().enumerate() {
                    let selected = prefs.anchor_point == anchor;
                    let label = RichText::new(anchor.grid_label()).monospace().strong();
                    if ui.radio(selected, label).clicked() && !selected {
                        self.send(PreferenceChange::Anchor(anchor));
                    }
                    if idx % 3 == 2 {
                        ui.end_row();
                    }
                }
            });
    }

    fn scaling_options(&self, ui: &mut egui::Ui, prefs: &Preferences) {
        ui.label(RichText::new("Scaling Option").strong().size(17.0));
        for (heading, modes) in SCALING_GROUPS {
            ui.label(RichText::new(heading).strong());
            for &mode in modes {
                let selected = prefs.scaling_mode == mode;
                if ui.radio(selected, mode.label()).clicked() && !selected {
                    self.send(PreferenceChange::Scaling(mode));
                }
            }
        }
    }
}

/// Show the native file picker; returns a supported image path.
fn pick_image(prefs: &Preferences) -> Option<PathBuf> {
    let path = rfd::FileDialog::new()
        .set_title("Open Image")
        .set_directory(browse_start_dir(prefs))
        .add_filter("Image Files", &IMAGE_EXTENSIONS)
        .pick_file()?;
    if is_supported_image(&path) {
        Some(path)
    } else {
        warn!(path = %path.display(), "ignoring unsupported image file");
        None
    }
}
