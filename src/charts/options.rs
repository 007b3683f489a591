//! Plot Options Module
//! Caller-facing switches for rendering the presentation figure.

use std::path::PathBuf;

/// Default directory for saved figures.
pub const DEFAULT_SAVE_PATH: &str = "img";

/// Display and output options for a single render call.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Open the rendered figure with the system image viewer.
    pub show: bool,
    /// Optional figure-level title.
    pub title: Option<String>,
    /// Write the figure as a PNG under `save_path`.
    pub save: bool,
    /// File name of the saved figure. Required when `save` is set.
    pub save_name: Option<String>,
    /// Directory the figure is saved into; created if missing.
    pub save_path: PathBuf,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            show: false,
            title: None,
            save: false,
            save_name: None,
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
        }
    }
}
