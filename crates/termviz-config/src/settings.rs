use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use termviz_core::{gray, hot, jet, ColourMap, Dimensions, Magnify, Rgb};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "TERMVIZ_CONFIG";

/// Environment variable requesting a light-background palette when set.
pub const WHITE_BACKGROUND_ENV: &str = "WHITEBG";

/// Render settings loaded from `config.toml`.
///
/// Resolved once at startup and handed to whatever draws; nothing in the
/// core reads the environment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderSettings {
    #[serde(default)]
    pub palette: PaletteSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Which colour map to build and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaletteSettings {
    #[serde(default)]
    pub kind: PaletteKind,
    /// Entry count for generated palettes.
    #[serde(default = "default_palette_size")]
    pub size: usize,
    /// Literal entries for [`PaletteKind::Custom`].
    #[serde(default)]
    pub entries: Vec<Rgb>,
    /// Invert every channel for terminals with a light background.
    #[serde(default)]
    pub white_background: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteKind {
    #[default]
    Gray,
    Hot,
    Jet,
    /// The eight-colour line plot palette.
    Plot,
    Custom,
}

/// Output behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplaySettings {
    /// Leave palette index 0 unpainted so the terminal background shows.
    #[serde(default = "default_true")]
    pub transparent: bool,
    /// Integer magnification applied before encoding.
    #[serde(default = "default_magnify")]
    pub magnify: usize,
    /// Also write logs to a rolling file. Consumed by
    /// [`RenderSettings::init_logging`].
    #[serde(default)]
    pub file_logging: bool,
}

fn default_palette_size() -> usize {
    101
}

fn default_true() -> bool {
    true
}

fn default_magnify() -> usize {
    1
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            kind: PaletteKind::default(),
            size: default_palette_size(),
            entries: Vec::new(),
            white_background: false,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            transparent: default_true(),
            magnify: default_magnify(),
            file_logging: false,
        }
    }
}

impl DisplaySettings {
    /// Wrap `canvas` in the configured magnification.
    pub fn magnified<C: Dimensions>(&self, canvas: C) -> Result<Magnify<C>> {
        Magnify::new(canvas, self.magnify).context("invalid display.magnify")
    }
}

impl RenderSettings {
    /// Parse and validate settings TOML.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let settings: Self = toml::from_str(input).context("failed to parse settings TOML")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;

        Self::from_toml_str(&raw).with_context(|| format!("invalid settings at {}", path.display()))
    }

    /// Load settings, then apply environment overrides.
    ///
    /// A file named by `TERMVIZ_CONFIG` must exist. The platform default
    /// file is optional and its absence yields the defaults.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let settings = Self::resolve(explicit.as_deref(), default_settings_path().as_deref())?;
        Ok(settings.apply_env())
    }

    fn resolve(explicit: Option<&Path>, fallback: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading render settings");
            return Self::from_path(path);
        }
        match fallback {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading render settings");
                Self::from_path(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Install the global tracing subscriber, honouring
    /// `display.file_logging`.
    pub fn init_logging(&self) -> Result<()> {
        termviz_core::logging::init(self.display.file_logging)
    }

    /// Apply environment overrides: `WHITEBG` (any value) selects the
    /// light-background palette.
    pub fn apply_env(mut self) -> Self {
        if std::env::var_os(WHITE_BACKGROUND_ENV).is_some() {
            self.palette.white_background = true;
        }
        self
    }

    /// Validate semantic constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let palette = &self.palette;
        match palette.kind {
            PaletteKind::Gray | PaletteKind::Hot | PaletteKind::Jet => {
                if palette.size < 2 {
                    bail!("palette.size must be at least 2 (got {})", palette.size);
                }
            }
            PaletteKind::Plot => {}
            PaletteKind::Custom => {
                if palette.entries.is_empty() {
                    bail!("palette.entries must not be empty for a custom palette");
                }
                ColourMap::new(palette.entries.clone()).context("invalid palette.entries")?;
            }
        }

        if palette.kind != PaletteKind::Custom && !palette.entries.is_empty() {
            bail!("palette.entries is only allowed with kind = \"custom\"");
        }

        if self.display.magnify == 0 {
            bail!("display.magnify must be at least 1");
        }

        Ok(())
    }

    /// Build the configured colour map.
    pub fn colourmap(&self) -> Result<ColourMap> {
        let palette = &self.palette;
        let cmap = match palette.kind {
            PaletteKind::Gray => gray(palette.size),
            PaletteKind::Hot => hot(palette.size),
            PaletteKind::Jet => jet(palette.size),
            PaletteKind::Plot => ColourMap::plot_default(),
            PaletteKind::Custom => {
                ColourMap::new(palette.entries.clone()).context("invalid palette.entries")?
            }
        };
        Ok(if palette.white_background {
            cmap.inverted()
        } else {
            cmap
        })
    }
}

/// Return the settings file path.
///
/// Precedence: `TERMVIZ_CONFIG` env var > `<config dir>/termviz/config.toml`.
pub fn settings_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    default_settings_path()
}

fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("termviz").join("config.toml"))
}
