//! Tab strip geometry and tab reordering.
//!
//! There is no text shaping here; label widths are estimated from character
//! count and font size, which is enough for hit testing and drop positions.

use dockhand_core::{Rect, Vec2};

use crate::config::{CHAR_WIDTH_FACTOR, CLOSE_BUTTON_MARGIN, DEFAULT_CLOSE_BUTTON_SIZE, DockingConfig};
use crate::error::DockResult;
use crate::system::DockingSystem;
use crate::types::{AreaId, WidgetId};
use crate::widget::DockWidgetFeatures;

/// Estimated width of a tab showing `label`.
pub fn estimate_tab_width(label: &str, config: &DockingConfig, closable: bool) -> f32 {
    let char_width = config.tab_font_size * CHAR_WIDTH_FACTOR;
    let text_width = label.chars().count() as f32 * char_width;
    let close_width = if closable {
        DEFAULT_CLOSE_BUTTON_SIZE + CLOSE_BUTTON_MARGIN
    } else {
        0.0
    };
    text_width + config.tab_padding * 2.0 + close_width
}

impl DockingSystem {
    /// Tabs drawn in an area's title bar, left to right.
    pub fn tab_rects(&self, area: AreaId) -> Vec<(WidgetId, Rect)> {
        let Some(a) = self.areas.get(&area) else {
            return Vec::new();
        };
        let strip = a.rect().top_strip(self.config.title_bar_height);

        let mut x = strip.x;
        a.tab_widgets(&self.widgets)
            .into_iter()
            .filter_map(|id| {
                let widget = self.widgets.get(id)?;
                let closable = self.config.tabs_closable
                    && self
                        .effective_features(id)
                        .contains(DockWidgetFeatures::CLOSABLE);
                let width = estimate_tab_width(&widget.title, &self.config, closable);
                let rect = Rect::new(x, strip.y, width, strip.height);
                x += width;
                Some((id, rect))
            })
            .collect()
    }

    /// Tab under `point`, as `(tab index, widget)`.
    pub fn tab_at(&self, area: AreaId, point: Vec2) -> Option<(usize, WidgetId)> {
        self.tab_rects(area)
            .into_iter()
            .enumerate()
            .find(|(_, (_, rect))| rect.contains(point))
            .map(|(index, (widget, _))| (index, widget))
    }

    /// Insertion point (0..=tab count) closest to `point` horizontally.
    pub fn tab_insert_index(&self, area: AreaId, point: Vec2) -> usize {
        let rects = self.tab_rects(area);
        let Some(start) = self.areas.get(&area).map(|a| a.rect().x) else {
            return 0;
        };

        let mut closest_index = 0;
        let mut closest_dist = f32::MAX;
        for i in 0..=rects.len() {
            let insertion_x = if i == 0 { start } else { rects[i - 1].1.right() };
            let dist = (point.x - insertion_x).abs();
            if dist < closest_dist {
                closest_dist = dist;
                closest_index = i;
            }
        }
        closest_index
    }

    /// Reorder tabs: the tab at `from` moves to insertion point `to`.
    ///
    /// Returns false when the move leaves the order unchanged.
    pub fn move_tab(&mut self, area: AreaId, from: usize, to: usize) -> DockResult<bool> {
        self.try_area(area)?;
        let moved = match self.areas.get_mut(&area) {
            Some(a) => a.move_tab(from, to, &self.widgets),
            None => false,
        };
        if moved {
            tracing::debug!("Moved tab {} -> {} in {}", from, to, area);
        }
        Ok(moved)
    }
}
