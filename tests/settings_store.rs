use std::fs;
use std::path::PathBuf;

use focus_backdrop::placement::{AnchorPoint, ScalingMode};
use focus_backdrop::settings::{
    BackgroundColor, ChangeEffect, DialogPosition, PreferenceChange, Preferences, SettingsStore,
};
use serde_json::Value;
use tempfile::tempdir;

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let store = SettingsStore::open(dir.path().join("settings.json"));
    assert_eq!(store.prefs(), &Preferences::default());
}

#[test]
fn full_preferences_survive_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut store = SettingsStore::open(&path);
    store.apply(PreferenceChange::DarkTheme(false));
    store.apply(PreferenceChange::BackgroundRgb([0x12, 0xAB, 0xEF]));
    store.apply(PreferenceChange::Alpha(0x3C));
    store.apply(PreferenceChange::CustomScale(-500));
    store.apply(PreferenceChange::Anchor(AnchorPoint::TopRight));
    store.apply(PreferenceChange::ImageSelected(PathBuf::from("/walls/dunes.jpg")));
    store
        .set_dialog_position(DialogPosition { x: -40, y: 720 })
        .unwrap();
    let first = fs::read(&path).unwrap();

    let reloaded = SettingsStore::open(&path);
    assert_eq!(reloaded.prefs(), store.prefs());
    assert_eq!(
        reloaded.prefs().background_color,
        BackgroundColor::new(0x3C, 0x12, 0xAB, 0xEF)
    );
    assert_eq!(reloaded.prefs().scaling_mode, ScalingMode::Custom);
    assert_eq!(reloaded.prefs().custom_scale_value, -500);
    assert_eq!(reloaded.prefs().recent_image_dir, "/walls");

    reloaded.save().unwrap();
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[test]
fn every_change_is_written_immediately() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut store = SettingsStore::open(&path);

    let effect = store.apply(PreferenceChange::Scaling(ScalingMode::FillCrop));
    assert_eq!(effect, ChangeEffect::Layout);
    assert_eq!(read_json(&path)["scaling_option"], "fill_crop");

    let effect = store.apply(PreferenceChange::Alpha(0xFF));
    assert_eq!(effect, ChangeEffect::Background);
    let doc = read_json(&path);
    assert_eq!(doc["bg_color"], "#FF333333");
    assert_eq!(doc["alpha_level"], "FF");

    let effect = store.apply(PreferenceChange::DialogMoved(DialogPosition { x: 5, y: 6 }));
    assert_eq!(effect, ChangeEffect::Nothing);
    assert_eq!(read_json(&path)["dialog_position"]["x"], 5);
}

#[test]
fn written_file_uses_documented_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    SettingsStore::open(&path).save().unwrap();

    let doc = read_json(&path);
    let mut keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        [
            "alpha_level",
            "anchor_point",
            "bg_color",
            "custom_scaling",
            "dark_theme",
            "dialog_position",
            "pixmap_path",
            "recent_image_path",
            "scaling_option",
        ]
    );
    assert_eq!(doc["anchor_point"], "middle-center");
    assert_eq!(doc["scaling_option"], "fit_nocrop");
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();

    let store = SettingsStore::open(&path);
    assert_eq!(store.prefs(), &Preferences::default());
}

#[test]
fn save_failure_keeps_in_memory_change() {
    let dir = tempdir().unwrap();
    // A directory where the file should be makes every write fail.
    let path = dir.path().join("settings.json");
    fs::create_dir(&path).unwrap();

    let mut store = SettingsStore::open(&path);
    store.apply(PreferenceChange::DarkTheme(false));
    assert!(!store.prefs().dark_theme);
    assert!(store.save().is_err());
}
