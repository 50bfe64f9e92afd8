//! Drop target resolution for floating drags.
//!
//! While something is dragged, two overlays are offered: a cross of five
//! icons centred on the area under the cursor (plus its title bar, which
//! means "add as tab"), and one icon near each edge of the container under
//! the cursor. Area-level zones win whenever both apply.

use dockhand_core::profiling::profile_function;
use dockhand_core::{Rect, Size, Vec2};

use crate::config::{DEFAULT_EDGE_THRESHOLD, DockingConfig};
use crate::drag::DragSource;
use crate::system::DockingSystem;
use crate::types::{AreaId, ContainerId, DockZone, DockZones};

/// Computes where a drop in a zone would land, for the preview rectangle.
#[derive(Debug, Clone)]
pub struct DropZoneDetector {
    /// Fraction of the target taken by an edge zone (0.1-0.5).
    pub edge_threshold: f32,
}

impl Default for DropZoneDetector {
    fn default() -> Self {
        Self {
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
        }
    }
}

impl DropZoneDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edge_threshold(mut self, threshold: f32) -> Self {
        self.edge_threshold = threshold.clamp(0.1, 0.5);
        self
    }

    /// Rectangle the dropped content would occupy.
    pub fn preview_bounds(&self, zone: DockZone, target: Rect) -> Rect {
        match zone {
            DockZone::Left => Rect::new(
                target.x,
                target.y,
                target.width * self.edge_threshold * 2.0,
                target.height,
            ),
            DockZone::Right => {
                let width = target.width * self.edge_threshold * 2.0;
                Rect::new(target.right() - width, target.y, width, target.height)
            }
            DockZone::Top => Rect::new(
                target.x,
                target.y,
                target.width,
                target.height * self.edge_threshold * 2.0,
            ),
            DockZone::Bottom => {
                let height = target.height * self.edge_threshold * 2.0;
                Rect::new(target.x, target.bottom() - height, target.width, height)
            }
            DockZone::Center => target,
        }
    }
}

/// Where a drag would land if released now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    pub container: ContainerId,
    /// Target area for area-level zones, `None` for container edges.
    pub area: Option<AreaId>,
    pub zone: DockZone,
    /// Tab insertion point for title bar drops.
    pub insert_index: Option<usize>,
}

impl DropTarget {
    pub fn new(container: ContainerId, zone: DockZone) -> Self {
        Self {
            container,
            area: None,
            zone,
            insert_index: None,
        }
    }

    pub fn with_area(mut self, area: AreaId) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_insert_index(mut self, index: usize) -> Self {
        self.insert_index = Some(index);
        self
    }

    /// Check if this drop splits (edge zone).
    pub fn is_edge_drop(&self) -> bool {
        !matches!(self.zone, DockZone::Center)
    }

    /// Check if this drop adds tabs.
    pub fn is_center_drop(&self) -> bool {
        matches!(self.zone, DockZone::Center)
    }
}

/// Icon geometry of the drop overlays.
#[derive(Debug, Clone, Copy)]
pub struct DropOverlay {
    icon_size: f32,
    spacing: f32,
    margin: f32,
}

impl DropOverlay {
    pub fn new(config: &DockingConfig) -> Self {
        Self {
            icon_size: config.overlay_icon_size,
            spacing: config.overlay_icon_spacing,
            margin: config.container_icon_margin,
        }
    }

    fn icon(&self, center: Vec2) -> Rect {
        Rect::from_origin_size(Vec2::ZERO, Size::new(self.icon_size, self.icon_size))
            .centered_at(center)
    }

    /// Cross of icons centred on an area.
    pub fn area_icons(&self, area: Rect) -> [(DockZone, Rect); 5] {
        let c = area.center();
        let step = self.icon_size + self.spacing;
        [
            (DockZone::Top, self.icon(c - Vec2::new(0.0, step))),
            (DockZone::Left, self.icon(c - Vec2::new(step, 0.0))),
            (DockZone::Right, self.icon(c + Vec2::new(step, 0.0))),
            (DockZone::Bottom, self.icon(c + Vec2::new(0.0, step))),
            (DockZone::Center, self.icon(c)),
        ]
    }

    /// One icon near each container edge, plus the centre when requested.
    pub fn container_icons(&self, container: Rect, with_center: bool) -> Vec<(DockZone, Rect)> {
        let c = container.center();
        let inset = self.margin + self.icon_size / 2.0;
        let mut icons = vec![
            (DockZone::Top, self.icon(Vec2::new(c.x, container.y + inset))),
            (DockZone::Left, self.icon(Vec2::new(container.x + inset, c.y))),
            (DockZone::Right, self.icon(Vec2::new(container.right() - inset, c.y))),
            (DockZone::Bottom, self.icon(Vec2::new(c.x, container.bottom() - inset))),
        ];
        if with_center {
            icons.push((DockZone::Center, self.icon(c)));
        }
        icons
    }
}

impl DockingSystem {
    /// Resolve the drop target under `point` for a drag of `source`.
    ///
    /// Picks the highest top-level container under the cursor (ignoring the
    /// dragged floating window), then prefers the area overlay over the
    /// container overlay. Zones the target area does not allow and drops of
    /// something onto itself resolve to `None`.
    pub fn resolve_drop_target(&self, point: Vec2, source: DragSource) -> Option<DropTarget> {
        profile_function!();
        let exclude = match source {
            DragSource::Floating(floating) => self.floating.get(&floating).map(|f| f.container()),
            _ => None,
        };
        let container = self.top_level_at(point, exclude)?;
        let content = self.content_rect(container);
        let visible = self.open_areas(container);
        let overlay = DropOverlay::new(&self.config);

        let target = self
            .area_drop_target(container, &visible, point, &overlay)
            .or_else(|| {
                let with_center = visible.len() <= 1;
                let (zone, _) = overlay
                    .container_icons(content, with_center)
                    .into_iter()
                    .find(|(_, icon)| icon.contains(point))?;
                let target = DropTarget::new(container, zone);
                Some(match (zone, visible.as_slice()) {
                    (DockZone::Center, [only]) => target.with_area(*only),
                    _ => target,
                })
            })?;

        if self.is_self_drop(source, &target) {
            return None;
        }
        Some(target)
    }

    fn area_drop_target(
        &self,
        container: ContainerId,
        visible: &[AreaId],
        point: Vec2,
        overlay: &DropOverlay,
    ) -> Option<DropTarget> {
        let area_id = self.dock_area_at(container, point)?;
        let area = self.areas.get(&area_id)?;
        let allowed: DockZones = area.allowed_areas;

        // The title bar always means "add as tab".
        if area
            .rect()
            .top_strip(self.config.title_bar_height)
            .contains(point)
        {
            return allowed.allows(DockZone::Center).then(|| {
                DropTarget::new(container, DockZone::Center)
                    .with_area(area_id)
                    .with_insert_index(self.tab_insert_index(area_id, point))
            });
        }

        // A lone area defers to the container overlay.
        if visible.len() <= 1 {
            return None;
        }

        overlay
            .area_icons(area.rect())
            .into_iter()
            .find(|(zone, icon)| icon.contains(point) && allowed.allows(*zone))
            .map(|(zone, _)| DropTarget::new(container, zone).with_area(area_id))
    }

    fn is_self_drop(&self, source: DragSource, target: &DropTarget) -> bool {
        match source {
            DragSource::Area(area) => target.area == Some(area),
            DragSource::Widget(widget) => {
                let Some(own) = self.widget_area(widget) else {
                    return false;
                };
                // Splitting off or re-tabbing into its own area needs company.
                target.area == Some(own)
                    && self
                        .areas
                        .get(&own)
                        .is_some_and(|a| a.open_count(&self.widgets) < 2)
            }
            DragSource::Floating(floating) => self
                .floating
                .get(&floating)
                .is_some_and(|f| f.container() == target.container),
        }
    }

    /// Preview rectangle for a resolved target.
    pub fn drop_preview_rect(&self, target: &DropTarget) -> Option<Rect> {
        let bounds = match target.area {
            Some(area) => self.areas.get(&area)?.rect(),
            None => self.content_rect(target.container),
        };
        let detector = DropZoneDetector::new().with_edge_threshold(self.config.preview_edge_fraction);
        Some(detector.preview_bounds(target.zone, bounds))
    }
}
