use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub node_padding_x: f32,
    pub node_padding_y: f32,
    pub label_line_height: f32,
    pub max_label_width_chars: usize,
    /// Fixed horizontal scale for gantt bars and drag conversion.
    pub pixels_per_day: f32,
    pub row_height: f32,
    pub event_spacing: f32,
    /// Timeline spacing proportional to elapsed days instead of event count.
    pub proportional_timeline: bool,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 40.0,
            rank_spacing: 60.0,
            node_padding_x: 24.0,
            node_padding_y: 12.0,
            label_line_height: 1.4,
            max_label_width_chars: 26,
            pixels_per_day: 4.0,
            row_height: 28.0,
            event_spacing: 64.0,
            proportional_timeline: false,
            min_zoom: 0.5,
            max_zoom: 3.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.pixels_per_day.is_finite() || self.pixels_per_day <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "pixels_per_day {} is not positive",
                self.pixels_per_day
            )));
        }
        if !self.min_zoom.is_finite() || self.min_zoom <= 0.0 || self.max_zoom < self.min_zoom {
            return Err(Error::InvalidConfig(format!(
                "zoom bounds {}..{} are not ordered positives",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.row_height <= 0.0 || self.event_spacing <= 0.0 {
            return Err(Error::InvalidConfig(
                "row_height and event_spacing must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    theme: Option<Theme>,
    layout: Option<LayoutConfig>,
}

/// Loads a JSON config file with optional `theme` and `layout` sections.
/// Absent path or absent sections fall back to defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw = std::fs::read_to_string(path)?;
    let file: ConfigFile = serde_json::from_str(&raw)?;
    Ok(Config {
        theme: file.theme.unwrap_or_default(),
        layout: file.layout.unwrap_or_default(),
    })
}
