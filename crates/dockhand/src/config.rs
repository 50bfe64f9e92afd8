//! Docking engine configuration.
//!
//! Every field has a default, so a partial JSON document only needs to name
//! the values it overrides:
//!
//! ```
//! use dockhand::DockingConfig;
//!
//! let config = DockingConfig::from_json_str(r#"{ "drag_threshold": 8.0 }"#).unwrap();
//! assert_eq!(config.drag_threshold, 8.0);
//! assert_eq!(config.title_bar_height, 22.0);
//! ```

use std::path::Path;
use std::time::Duration;

use dockhand_core::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Drag threshold in pixels before a press turns into a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Default title bar (tab strip) height in pixels.
pub const DEFAULT_TITLE_BAR_HEIGHT: f32 = 22.0;

/// Default tab padding in pixels.
pub const DEFAULT_TAB_PADDING: f32 = 8.0;

/// Default tab close button size in pixels.
pub const DEFAULT_CLOSE_BUTTON_SIZE: f32 = 12.0;

/// Margin between tab text and close button in pixels.
pub const CLOSE_BUTTON_MARGIN: f32 = 4.0;

/// Character width factor for estimating tab text width.
pub const CHAR_WIDTH_FACTOR: f32 = 0.6;

/// Edge fraction used for drop previews (25% of width/height).
pub const DEFAULT_EDGE_THRESHOLD: f32 = 0.25;

/// Auto-hide overlay behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoHideConfig {
    /// Expand a collapsed overlay when the cursor rests on its side tab.
    pub show_on_hover: bool,
    /// How long the cursor must rest on a side tab before it expands.
    pub hover_delay_ms: u64,
    /// Clicks elsewhere within this window after expansion do not collapse.
    pub collapse_guard_ms: u64,
    /// Extent of a freshly pinned overlay along its edge.
    pub default_extent: f32,
    /// Smallest extent an overlay can be resized to.
    pub min_extent: f32,
    /// Thickness of a side bar that shows at least one tab.
    pub side_bar_thickness: f32,
}

impl Default for AutoHideConfig {
    fn default() -> Self {
        Self {
            show_on_hover: false,
            hover_delay_ms: 500,
            collapse_guard_ms: 200,
            default_extent: 250.0,
            min_extent: 50.0,
            side_bar_thickness: 24.0,
        }
    }
}

impl AutoHideConfig {
    pub fn hover_delay(&self) -> Duration {
        Duration::from_millis(self.hover_delay_ms)
    }

    pub fn collapse_guard(&self) -> Duration {
        Duration::from_millis(self.collapse_guard_ms)
    }
}

/// Configuration for a [`DockingSystem`](crate::DockingSystem).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockingConfig {
    /// Pointer travel (pixels) before a press becomes a drag.
    pub drag_threshold: f32,
    /// Height of an area's title bar / tab strip.
    pub title_bar_height: f32,
    /// Horizontal padding on each side of a tab label.
    pub tab_padding: f32,
    /// Tab label font size, used to estimate label width.
    pub tab_font_size: f32,
    /// Whether tabs reserve space for a close button.
    pub tabs_closable: bool,
    /// Side length of one drop overlay icon.
    pub overlay_icon_size: f32,
    /// Gap between neighbouring icons of the drop overlay cross.
    pub overlay_icon_spacing: f32,
    /// Distance of container-level drop icons from the container edge.
    pub container_icon_margin: f32,
    /// Fraction of the target used by edge drop previews.
    pub preview_edge_fraction: f32,
    /// Distance from a splitter handle that still grabs it.
    pub splitter_handle_tolerance: f32,
    /// Height of a floating window's own title bar.
    pub floating_title_bar_height: f32,
    /// Size of a floating window created without explicit geometry.
    pub floating_default_size: Size,
    /// Initial geometry of the main container.
    pub main_geometry: Rect,
    /// Auto-hide behaviour.
    pub auto_hide: AutoHideConfig,
}

impl Default for DockingConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DRAG_THRESHOLD,
            title_bar_height: DEFAULT_TITLE_BAR_HEIGHT,
            tab_padding: DEFAULT_TAB_PADDING,
            tab_font_size: 11.0,
            tabs_closable: false,
            overlay_icon_size: 32.0,
            overlay_icon_spacing: 4.0,
            container_icon_margin: 8.0,
            preview_edge_fraction: DEFAULT_EDGE_THRESHOLD,
            splitter_handle_tolerance: 3.0,
            floating_title_bar_height: DEFAULT_TITLE_BAR_HEIGHT,
            floating_default_size: Size::new(400.0, 300.0),
            main_geometry: Rect::new(0.0, 0.0, 1280.0, 720.0),
            auto_hide: AutoHideConfig::default(),
        }
    }
}

impl DockingConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a configuration file, or return defaults if it does not exist or
    /// cannot be parsed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Docking config not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_json_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded docking config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse docking config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read docking config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Set the drag threshold.
    pub fn drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    /// Set the title bar height.
    pub fn title_bar_height(mut self, height: f32) -> Self {
        self.title_bar_height = height;
        self
    }

    /// Set the main container geometry.
    pub fn main_geometry(mut self, rect: Rect) -> Self {
        self.main_geometry = rect;
        self
    }

    /// Set the default floating window size.
    pub fn floating_default_size(mut self, size: Size) -> Self {
        self.floating_default_size = size;
        self
    }

    /// Set the drop overlay icon size.
    pub fn overlay_icon_size(mut self, size: f32) -> Self {
        self.overlay_icon_size = size;
        self
    }

    /// Set whether tabs reserve space for a close button.
    pub fn tabs_closable(mut self, closable: bool) -> Self {
        self.tabs_closable = closable;
        self
    }

    /// Replace the auto-hide configuration.
    pub fn auto_hide(mut self, auto_hide: AutoHideConfig) -> Self {
        self.auto_hide = auto_hide;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DockingConfig::from_json_str(
            r#"{ "title_bar_height": 30.0, "auto_hide": { "show_on_hover": true } }"#,
        )
        .unwrap();
        assert_eq!(config.title_bar_height, 30.0);
        assert_eq!(config.drag_threshold, DRAG_THRESHOLD);
        assert!(config.auto_hide.show_on_hover);
        assert_eq!(config.auto_hide.hover_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DockingConfig::load(&dir.path().join("missing.json"));
        assert_eq!(config, DockingConfig::default());
    }

    #[test]
    fn test_load_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docking.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(DockingConfig::load(&path), DockingConfig::default());
    }
}
