//! Render settings for termviz.
//!
//! This crate owns the on-disk settings schema so callers resolve palette,
//! transparency and magnification choices once at startup and pass the
//! result down explicitly.

pub mod settings;

pub use settings::{
    settings_path, DisplaySettings, PaletteKind, PaletteSettings, RenderSettings,
};
