use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::weight::WeightMode;

/// How row heights respond to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Enlarge rows near the pointer, shrink the rest.
    #[default]
    Fisheye,
    /// Shrink every row uniformly to fit.
    Fit,
}

/// Everything a render pass needs besides the surface and the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub root: PathBuf,
    /// Draw the pointer marker, row boxes and the focus curve.
    pub debug: bool,
    pub mode: LayoutMode,
    pub weights: WeightMode,
    pub base_font_size: f64,
    /// Focus spread, in multiples of `base_font_size`.
    pub deviation_scale: f64,
    pub indent_width: f64,
    /// Rows shorter than this are laid out but not drawn.
    pub min_visible_height: f64,
    /// Show the built-in sample tree instead of the filesystem.
    pub demo: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            debug: false,
            mode: LayoutMode::Fisheye,
            weights: WeightMode::Tiered,
            base_font_size: 14.0,
            deviation_scale: 3.0,
            indent_width: 16.0,
            min_visible_height: 1.0,
            demo: false,
        }
    }
}

impl ViewConfig {
    /// Read a JSON config; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn deviation(&self) -> f64 {
        self.base_font_size * self.deviation_scale
    }
}

/// Command line shared by the window and terminal viewers.
#[derive(Parser, Debug)]
#[command(name = "treelens")]
#[command(about = "Directory tree with pointer-focused row scaling", long_about = None)]
#[command(version)]
pub struct Args {
    /// Directory to display (default: current directory)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Draw the debug overlay
    #[arg(long, env = "TREELENS_DEBUG", value_parser = clap::builder::FalseyValueParser::new())]
    pub debug: bool,

    /// Row scaling mode
    #[arg(long, value_enum)]
    pub mode: Option<LayoutMode>,

    /// Row weights by depth
    #[arg(long, value_enum)]
    pub weights: Option<WeightMode>,

    /// Base font size in pixels
    #[arg(long, value_name = "PX")]
    pub font_size: Option<f64>,

    /// Path to a JSON configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show a built-in sample tree
    #[arg(long)]
    pub demo: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub dump_config: bool,
}

impl Args {
    /// Defaults, then the config file, then flags.
    pub fn resolve(&self) -> Result<ViewConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ViewConfig::load(path)?,
            None => ViewConfig::default(),
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if self.debug {
            config.debug = true;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(weights) = self.weights {
            config.weights = weights;
        }
        if let Some(size) = self.font_size {
            config.base_font_size = size;
        }
        if self.demo {
            config.demo = true;
        }

        Ok(config)
    }
}
