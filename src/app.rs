//! The borderless backdrop window.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use anyhow::Result;
use eframe::CreationContext;
use eframe::egui::{self, Color32, Key, Modifiers, Rect, RichText, Rounding, Sense};
use tracing::{debug, info, warn};

use crate::dialog::PreferencesDialog;
use crate::image_ops::load_image;
use crate::placement::{Placement, Size, compute_placement};
use crate::settings::{BackgroundColor, ChangeEffect, PreferenceChange, SettingsStore};
use crate::theme::apply_theme;

pub const APP_NAME: &str = "Focus Backdrop";

/// Uploaded image plus the size of the file it came from.
struct BackdropTexture {
    handle: egui::TextureHandle,
    natural: Size,
}

pub struct BackdropApp {
    store: SettingsStore,
    dialog: PreferencesDialog,
    changes: Receiver<PreferenceChange>,
    texture: Option<BackdropTexture>,
    placement: Option<Placement>,
    /// Display area in physical pixels as of the last frame.
    area: Size,
    reload_image: bool,
    relayout: bool,
}

impl BackdropApp {
    pub fn new(cc: &CreationContext<'_>, open_preferences: bool) -> Self {
        let store = SettingsStore::load();
        apply_theme(&cc.egui_ctx, store.prefs().dark_theme);

        let (tx, rx) = mpsc::channel();
        let mut dialog = PreferencesDialog::new(tx, store.prefs().dialog_position);
        if open_preferences {
            dialog.open();
        }
        if let Some(path) = store.path() {
            info!(settings = %path.display(), "backdrop started");
        }

        Self {
            store,
            dialog,
            changes: rx,
            texture: None,
            placement: None,
            area: Size::default(),
            reload_image: true,
            relayout: true,
        }
    }

    /// Route every pending dialog change through the store.
    fn drain_changes(&mut self, ctx: &egui::Context) {
        while let Ok(change) = self.changes.try_recv() {
            match self.store.apply(change) {
                ChangeEffect::Theme => apply_theme(ctx, self.store.prefs().dark_theme),
                ChangeEffect::Image => self.reload_image = true,
                ChangeEffect::Layout => self.relayout = true,
                ChangeEffect::Background | ChangeEffect::Nothing => {}
            }
            ctx.request_repaint();
        }
    }

    fn refresh_image(&mut self, ctx: &egui::Context) {
        if !self.reload_image {
            return;
        }
        self.reload_image = false;
        self.relayout = true;
        self.texture = None;

        let Some(path) = self.store.prefs().image() else {
            debug!("no image selected");
            return;
        };
        let max_side = u32::try_from(ctx.input(|i| i.max_texture_side)).unwrap_or(u32::MAX);
        match load_image(path, max_side) {
            Ok(loaded) => {
                let size = [
                    loaded.pixels.width() as usize,
                    loaded.pixels.height() as usize,
                ];
                let handle = ctx.load_texture(
                    "backdrop_image",
                    egui::ColorImage::from_rgba_unmultiplied(size, loaded.pixels.as_raw()),
                    egui::TextureOptions::LINEAR,
                );
                info!(
                    path = %path.display(),
                    width = loaded.natural.width,
                    height = loaded.natural.height,
                    "image loaded"
                );
                self.texture = Some(BackdropTexture {
                    handle,
                    natural: loaded.natural,
                });
            }
            Err(err) => warn!("showing background color only: {err}"),
        }
    }

    fn update_placement(&mut self, area: Size) {
        if area != self.area {
            debug!(width = area.width, height = area.height, "display area changed");
            self.area = area;
            self.relayout = true;
        }
        if !self.relayout {
            return;
        }
        self.relayout = false;

        let prefs = self.store.prefs();
        self.placement = self.texture.as_ref().and_then(|texture| {
            compute_placement(
                texture.natural,
                area,
                prefs.scaling_mode,
                prefs.custom_scale_value,
                prefs.anchor_point,
            )
            .map_err(|err| debug!("image not placed: {err}"))
            .ok()
        });
    }

    fn show_backdrop(&mut self, ctx: &egui::Context) {
        let fill = background_fill(self.store.prefs().background_color);
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let ppp = ctx.pixels_per_point();
                let area = Size::new(
                    (rect.width() * ppp).round() as u32,
                    (rect.height() * ppp).round() as u32,
                );
                self.update_placement(area);

                let painter = ui.painter();
                painter.rect_filled(rect, Rounding::ZERO, fill);
                if let (Some(texture), Some(placement)) = (&self.texture, self.placement) {
                    let image_rect = Rect::from_min_size(
                        rect.min + egui::vec2(placement.x as f32, placement.y as f32) / ppp,
                        egui::vec2(
                            placement.size.width as f32,
                            placement.size.height as f32,
                        ) / ppp,
                    );
                    // The panel clips anything outside the display area.
                    painter.image(
                        texture.handle.id(),
                        image_rect,
                        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }

                let response = ui.interact(rect, ui.id().with("backdrop"), Sense::click());
                response.context_menu(|ui| {
                    ui.add_enabled(
                        false,
                        egui::Label::new(RichText::new("~ Focus Backdrop ~").strong()),
                    );
                    ui.separator();
                    if ui.button("      Preferences      ").clicked() {
                        self.dialog.open();
                        ui.close_menu();
                    }
                });
            });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let open_requested = ctx.input_mut(|i| i.consume_key(Modifiers::COMMAND, Key::Comma));
        if open_requested && !self.dialog.is_open() {
            self.dialog.open();
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::COMMAND, Key::W)) {
            info!("closing backdrop");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

impl eframe::App for BackdropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The dialog sees Ctrl+W first so it closes before the backdrop does.
        self.dialog.ui(ctx, self.store.prefs());
        self.drain_changes(ctx);
        self.handle_shortcuts(ctx);
        self.refresh_image(ctx);
        self.show_backdrop(ctx);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }
}

/// Background fill for the configured color.
pub fn background_fill(color: BackgroundColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Build the viewport and run the backdrop until it is closed.
pub fn run(open_preferences: bool) -> Result<()> {
    let viewport = egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_app_id("focus_backdrop")
        .with_decorations(false)
        .with_transparent(true)
        .with_maximized(true)
        .with_window_level(egui::viewport::WindowLevel::AlwaysOnBottom)
        .with_icon(Arc::new(app_icon()));
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Box::new(BackdropApp::new(cc, open_preferences))),
    )?;
    Ok(())
}

/// Window icon drawn in code so no asset files are needed.
pub fn app_icon() -> egui::IconData {
    let size = 32u32;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let border = x < 2 || y < 2 || x >= size - 2 || y >= size - 2;
            // Inner square marks the "focused" window on the backdrop.
            let inner = (10..22).contains(&x) && (10..22).contains(&y);
            let (r, g, b) = if border {
                (0x33, 0x33, 0x33)
            } else if inner {
                (0x2a, 0x82, 0xda)
            } else {
                (0x55, 0x55, 0x55)
            };
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }
    egui::IconData {
        rgba,
        width: size,
        height: size,
    }
}
