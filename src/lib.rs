pub mod app;
pub mod cli;
pub mod dialog;
pub mod image_ops;
pub mod logging;
pub mod placement;
pub mod platform;
pub mod settings;
pub mod theme;
