//! Persistence model and configuration IO.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::placement::{AnchorPoint, ScalingMode};

/// File name used under the per-user config directory.
const SETTINGS_FILE: &str = "settings.json";

/// Background color with an embedded alpha channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BackgroundColor {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BackgroundColor {
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Parse `#AARRGGBB`.
    pub fn parse(text: &str) -> Option<Self> {
        let [a, r, g, b] = parse_hex_bytes::<4>(text)?;
        Some(Self { a, r, g, b })
    }

    /// Parse `#RRGGBB` and attach the given alpha.
    pub fn parse_rgb(text: &str, a: u8) -> Option<Self> {
        let [r, g, b] = parse_hex_bytes::<3>(text)?;
        Some(Self { a, r, g, b })
    }

    /// Format as `#AARRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }

    /// Two hex digits for the alpha channel, as stored under `alpha_level`.
    pub fn alpha_hex(&self) -> String {
        format!("{:02X}", self.a)
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn with_rgb(self, [r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b, ..self }
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::new(0x80, 0x33, 0x33, 0x33)
    }
}

fn parse_hex_bytes<const N: usize>(text: &str) -> Option<[u8; N]> {
    let digits = text.trim().strip_prefix('#')?;
    if digits.len() != N * 2 || !digits.is_ascii() {
        return None;
    }
    let mut out = [0u8; N];
    for (idx, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&digits[idx * 2..idx * 2 + 2], 16).ok()?;
    }
    Some(out)
}

fn parse_alpha(text: &str) -> Option<u8> {
    let text = text.trim();
    if text.len() != 2 {
        return None;
    }
    u8::from_str_radix(text, 16).ok()
}

/// Last on-screen position of the preferences dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogPosition {
    pub x: i32,
    pub y: i32,
}

impl Default for DialogPosition {
    fn default() -> Self {
        Self { x: 100, y: 100 }
    }
}

/// User preferences shared by the dialog and the backdrop window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preferences {
    pub dark_theme: bool,
    pub background_color: BackgroundColor,
    pub scaling_mode: ScalingMode,
    /// Slider value in `-999..=999`; only used by [`ScalingMode::Custom`].
    pub custom_scale_value: i32,
    pub anchor_point: AnchorPoint,
    /// Displayed image; empty means no image.
    pub image_path: String,
    /// Directory last browsed for an image.
    pub recent_image_dir: String,
    pub dialog_position: DialogPosition,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_theme: true,
            background_color: BackgroundColor::default(),
            scaling_mode: ScalingMode::FitNoCrop,
            custom_scale_value: 0,
            anchor_point: AnchorPoint::MiddleCenter,
            image_path: String::new(),
            recent_image_dir: String::new(),
            dialog_position: DialogPosition::default(),
        }
    }
}

impl Preferences {
    /// Alpha channel of the background color as two hex digits.
    pub fn alpha_level(&self) -> String {
        self.background_color.alpha_hex()
    }

    /// The image to display, if one is set.
    pub fn image(&self) -> Option<&Path> {
        match self.image_path.as_str() {
            "" | "." => None,
            path => Some(Path::new(path)),
        }
    }

    /// Build preferences from a parsed settings document.
    ///
    /// Every key is read on its own; a missing or malformed key falls back to
    /// its default without affecting the others.
    pub fn from_json(doc: &Value) -> Self {
        let defaults = Self::default();
        let Some(map) = doc.as_object() else {
            warn!("settings document is not an object, using defaults");
            return defaults;
        };

        let alpha = field(
            map,
            "alpha_level",
            |v| v.as_str().and_then(parse_alpha),
            defaults.background_color.a,
        );
        let background_color = field(
            map,
            "bg_color",
            |v| {
                let text = v.as_str()?;
                BackgroundColor::parse(text).or_else(|| BackgroundColor::parse_rgb(text, alpha))
            },
            defaults.background_color.with_alpha(alpha),
        );

        Self {
            dark_theme: field(map, "dark_theme", coerce_bool, defaults.dark_theme),
            background_color,
            scaling_mode: field(map, "scaling_option", coerce_enum, defaults.scaling_mode),
            custom_scale_value: field(map, "custom_scaling", coerce_int, defaults.custom_scale_value),
            anchor_point: field(map, "anchor_point", coerce_enum, defaults.anchor_point),
            image_path: field(map, "pixmap_path", coerce_string, defaults.image_path),
            recent_image_dir: field(
                map,
                "recent_image_path",
                coerce_string,
                defaults.recent_image_dir,
            ),
            dialog_position: field(map, "dialog_position", coerce_enum, defaults.dialog_position),
        }
    }

    /// On-disk representation. `alpha_level` is always derived from the color.
    pub fn to_file(&self) -> SettingsFile {
        SettingsFile {
            dark_theme: self.dark_theme,
            bg_color: self.background_color.to_hex(),
            alpha_level: self.alpha_level(),
            scaling_option: self.scaling_mode,
            custom_scaling: self.custom_scale_value,
            anchor_point: self.anchor_point,
            pixmap_path: self.image_path.clone(),
            recent_image_path: self.recent_image_dir.clone(),
            dialog_position: self.dialog_position,
        }
    }
}

/// Settings persisted to `settings.json`, one field per key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsFile {
    pub dark_theme: bool,
    pub bg_color: String,
    pub alpha_level: String,
    pub scaling_option: ScalingMode,
    pub custom_scaling: i32,
    pub anchor_point: AnchorPoint,
    pub pixmap_path: String,
    pub recent_image_path: String,
    pub dialog_position: DialogPosition,
}

fn field<T>(
    map: &Map<String, Value>,
    key: &str,
    parse: impl FnOnce(&Value) -> Option<T>,
    default: T,
) -> T {
    match map.get(key) {
        None => default,
        Some(value) => parse(value).unwrap_or_else(|| {
            warn!(key, %value, "invalid setting, using default");
            default
        }),
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(num) => num.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn coerce_enum<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
    T::deserialize(value).ok()
}

/// Single mutation coming from the preferences dialog.
#[derive(Clone, Debug, PartialEq)]
pub enum PreferenceChange {
    DarkTheme(bool),
    Anchor(AnchorPoint),
    Scaling(ScalingMode),
    CustomScale(i32),
    /// New RGB for the background; alpha is kept.
    BackgroundRgb([u8; 3]),
    /// New alpha for the background; RGB is kept.
    Alpha(u8),
    ImageSelected(PathBuf),
    ImageCleared,
    DialogMoved(DialogPosition),
}

/// What the backdrop window must redo after a change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChangeEffect {
    Theme,
    Background,
    Layout,
    Image,
    Nothing,
}

/// Owns the process-wide preferences and writes them through on every change.
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    prefs: Preferences,
}

impl SettingsStore {
    /// Load from the per-user config directory, falling back to defaults.
    pub fn load() -> Self {
        match settings_path() {
            Ok(path) => Self::open(path),
            Err(err) => {
                warn!("settings will not persist: {err:#}");
                Self {
                    path: None,
                    prefs: Preferences::default(),
                }
            }
        }
    }

    /// Load from an explicit file path.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = read_preferences(&path);
        Self {
            path: Some(path),
            prefs,
        }
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Persist the current preferences as pretty JSON.
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| anyhow!("no settings file location"))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(&self.prefs.to_file())?;
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn set_dialog_position(&mut self, position: DialogPosition) -> Result<()> {
        self.prefs.dialog_position = position;
        self.save()
    }

    /// Apply one change, persist it, and report what must be refreshed.
    ///
    /// A failed write is logged; the in-memory change is kept.
    pub fn apply(&mut self, change: PreferenceChange) -> ChangeEffect {
        let (effect, saved) = match change {
            PreferenceChange::DialogMoved(position) => {
                (ChangeEffect::Nothing, self.set_dialog_position(position))
            }
            change => (apply_change(&mut self.prefs, change), self.save()),
        };
        if let Err(err) = saved {
            warn!("failed to save settings: {err:#}");
        }
        effect
    }
}

fn apply_change(prefs: &mut Preferences, change: PreferenceChange) -> ChangeEffect {
    match change {
        PreferenceChange::DarkTheme(dark) => {
            prefs.dark_theme = dark;
            ChangeEffect::Theme
        }
        PreferenceChange::Anchor(anchor) => {
            prefs.anchor_point = anchor;
            ChangeEffect::Layout
        }
        PreferenceChange::Scaling(mode) => {
            prefs.scaling_mode = mode;
            if mode != ScalingMode::Custom {
                prefs.custom_scale_value = 0;
            }
            ChangeEffect::Layout
        }
        PreferenceChange::CustomScale(value) => {
            prefs.custom_scale_value = value;
            prefs.scaling_mode = ScalingMode::Custom;
            ChangeEffect::Layout
        }
        PreferenceChange::BackgroundRgb(rgb) => {
            prefs.background_color = prefs.background_color.with_rgb(rgb);
            ChangeEffect::Background
        }
        PreferenceChange::Alpha(alpha) => {
            prefs.background_color = prefs.background_color.with_alpha(alpha);
            ChangeEffect::Background
        }
        PreferenceChange::ImageSelected(path) => {
            if let Some(parent) = path.parent() {
                prefs.recent_image_dir = parent.to_string_lossy().to_string();
            }
            prefs.image_path = path.to_string_lossy().to_string();
            ChangeEffect::Image
        }
        PreferenceChange::ImageCleared => {
            prefs.image_path.clear();
            ChangeEffect::Image
        }
        PreferenceChange::DialogMoved(position) => {
            prefs.dialog_position = position;
            ChangeEffect::Nothing
        }
    }
}

/// Read preferences from disk, returning defaults when missing or unreadable.
fn read_preferences(path: &Path) -> Preferences {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file yet, using defaults");
            return Preferences::default();
        }
        Err(err) => {
            warn!(path = %path.display(), "failed to read settings: {err}");
            return Preferences::default();
        }
    };
    match serde_json::from_str::<Value>(&contents) {
        Ok(doc) => Preferences::from_json(&doc),
        Err(err) => {
            warn!(path = %path.display(), "settings file is not valid JSON: {err}");
            Preferences::default()
        }
    }
}

/// Build the per-user settings file path.
fn settings_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("dev", "focus_backdrop", "focus_backdrop")
        .ok_or_else(|| anyhow!("cannot determine config directory"))?;
    Ok(proj_dirs.config_dir().join(SETTINGS_FILE))
}
