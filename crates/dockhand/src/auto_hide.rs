//! Pinned (auto-hide) areas and the side bars that host their tabs.
//!
//! A pinned area leaves the layout tree and is parked in an
//! [`AutoHideContainer`] attached to one side bar of the main container.
//! Collapsed, only its side tab shows. Expanded, its content overlays the
//! container along the pinned edge.
//!
//! Time never comes from a clock here: hover and collapse timing take the
//! caller's [`Instant`] so the host event loop stays in control.

use std::time::Instant;

use dockhand_core::{Rect, Vec2};

use crate::error::{DockError, DockResult};
use crate::events::DockEvent;
use crate::layout::DetachedNode;
use crate::system::DockingSystem;
use crate::tabs::estimate_tab_width;
use crate::types::{AreaId, AutoHideId, ContainerId, SideBarLocation, WidgetId};
use crate::widget::DockWidgetFeatures;

/// Ordered side tabs along one container edge.
#[derive(Debug, Clone)]
pub struct SideBar {
    location: SideBarLocation,
    items: Vec<AutoHideId>,
}

impl SideBar {
    pub(crate) fn new(location: SideBarLocation) -> Self {
        Self {
            location,
            items: Vec::new(),
        }
    }

    pub fn location(&self) -> SideBarLocation {
        self.location
    }

    /// Auto-hide containers in tab order.
    pub fn items(&self) -> &[AutoHideId] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn insert(&mut self, index: Option<usize>, id: AutoHideId) {
        let index = index.unwrap_or(self.items.len()).min(self.items.len());
        self.items.insert(index, id);
    }

    pub(crate) fn remove(&mut self, id: AutoHideId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| *item != id);
        self.items.len() != before
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoHideState {
    Collapsed,
    Expanded,
}

/// One pinned area.
#[derive(Debug, Clone)]
pub struct AutoHideContainer {
    id: AutoHideId,
    container: ContainerId,
    location: SideBarLocation,
    area: AreaId,
    extent: f32,
    state: AutoHideState,
    expanded_at: Option<Instant>,
    hover_since: Option<Instant>,
}

impl AutoHideContainer {
    pub fn id(&self) -> AutoHideId {
        self.id
    }

    /// Host container (always the main container).
    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn location(&self) -> SideBarLocation {
        self.location
    }

    pub fn area(&self) -> AreaId {
        self.area
    }

    /// Size of the overlay across the pinned edge.
    pub fn extent(&self) -> f32 {
        self.extent
    }

    pub fn state(&self) -> AutoHideState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == AutoHideState::Expanded
    }

    /// Pending hover start, if the show-on-hover timer is armed.
    pub fn hover_since(&self) -> Option<Instant> {
        self.hover_since
    }

    pub(crate) fn set_extent(&mut self, extent: f32) {
        self.extent = extent;
    }
}

impl DockingSystem {
    /// Pin a widget to a side bar of the main container.
    ///
    /// The widget leaves its area (which is removed when emptied) and gets a
    /// new area of its own. Without an explicit location the side bar is
    /// chosen from where the widget's area sits.
    pub fn pin_widget(
        &mut self,
        widget: WidgetId,
        location: Option<SideBarLocation>,
    ) -> DockResult<AutoHideId> {
        self.require_widget_feature(widget, DockWidgetFeatures::PINNABLE)?;

        let area = self.widget_area(widget);
        if let Some(container) = self.widget_container(widget)
            && self.containers.get(&container).is_some_and(|c| c.is_floating())
        {
            return Err(DockError::AutoHideInFloating(container));
        }

        // Already alone in an overlay: at most a side bar change.
        if let Some(area_id) = area
            && let Some(a) = self.areas.get(&area_id)
            && let Some(auto_hide) = a.auto_hide()
            && a.len() == 1
        {
            if let Some(location) = location {
                self.move_to_side_bar(auto_hide, location, None)?;
            }
            return Ok(auto_hide);
        }

        let location = location.unwrap_or_else(|| match area {
            Some(area) => self.preferred_side_bar(area),
            None => SideBarLocation::Left,
        });

        self.take_widget(widget);
        if let Some(w) = self.widgets.get_mut(widget) {
            w.set_closed(false);
        }
        let main = self.main;
        let new_area = self.new_area_with(main, &[widget]);
        let id = self.create_auto_hide(new_area, location);
        tracing::debug!("Pinned {} to {:?} side bar as {}", widget, location, id);
        self.finish_mutation();
        Ok(id)
    }

    /// Pin a whole area, keeping its tabs together.
    pub fn pin_area(
        &mut self,
        area: AreaId,
        location: Option<SideBarLocation>,
    ) -> DockResult<AutoHideId> {
        self.require_area_feature(area, DockWidgetFeatures::PINNABLE)?;
        let a = self.try_area(area)?;
        if let Some(auto_hide) = a.auto_hide() {
            if let Some(location) = location {
                self.move_to_side_bar(auto_hide, location, None)?;
            }
            return Ok(auto_hide);
        }
        let container = a.container();
        if self.containers.get(&container).is_some_and(|c| c.is_floating()) {
            return Err(DockError::AutoHideInFloating(container));
        }

        let location = location.unwrap_or_else(|| self.preferred_side_bar(area));
        self.detach_area(area);
        let id = self.create_auto_hide(area, location);
        tracing::debug!("Pinned {} to {:?} side bar as {}", area, location, id);
        self.finish_mutation();
        Ok(id)
    }

    /// Put a pinned area back into the main layout at the side bar's edge.
    pub fn unpin(&mut self, id: AutoHideId) -> DockResult<AreaId> {
        let ah = self
            .auto_hide
            .get(&id)
            .ok_or(DockError::AutoHideNotFound(id))?;
        let (area, container, zone) = (ah.area(), ah.container(), ah.location().dock_zone());

        self.return_to_layout(id);
        if let Some(c) = self.containers.get_mut(&container) {
            c.set_last_added_area(Some(area));
        }
        tracing::debug!("Unpinned {} back to {:?}", area, zone);
        self.finish_mutation();
        Ok(area)
    }

    /// Unpin the overlay hosting `widget`.
    pub fn unpin_widget(&mut self, widget: WidgetId) -> DockResult<AreaId> {
        let auto_hide = self
            .widget_area(widget)
            .and_then(|area| self.areas.get(&area))
            .and_then(|area| area.auto_hide())
            .ok_or(DockError::InvalidDropTarget)?;
        self.unpin(auto_hide)
    }

    /// Move an overlay's tab to another side bar, at `index` (default: last).
    pub fn move_to_side_bar(
        &mut self,
        id: AutoHideId,
        location: SideBarLocation,
        index: Option<usize>,
    ) -> DockResult<()> {
        let ah = self
            .auto_hide
            .get_mut(&id)
            .ok_or(DockError::AutoHideNotFound(id))?;
        let old = ah.location;
        let container = ah.container;
        ah.location = location;

        if let Some(c) = self.containers.get_mut(&container) {
            c.side_bar_mut(old).remove(id);
            c.side_bar_mut(location).insert(index, id);
        }
        tracing::debug!("Moved {} from {:?} to {:?} side bar", id, old, location);
        self.finish_mutation();
        Ok(())
    }

    /// Resize an overlay across its edge. Clamped to the configured minimum
    /// and to the host container.
    pub fn set_auto_hide_extent(&mut self, id: AutoHideId, extent: f32) -> DockResult<()> {
        let min = self.config.auto_hide.min_extent;
        let ah = self
            .auto_hide
            .get_mut(&id)
            .ok_or(DockError::AutoHideNotFound(id))?;
        ah.set_extent(extent.max(min));
        self.relayout();
        Ok(())
    }

    pub fn expand_auto_hide(&mut self, id: AutoHideId) -> DockResult<()> {
        self.expand_auto_hide_at(id, Instant::now())
    }

    /// Expand an overlay, collapsing any other expanded one.
    ///
    /// An overlay whose widgets are all closed stays collapsed.
    pub fn expand_auto_hide_at(&mut self, id: AutoHideId, now: Instant) -> DockResult<()> {
        let area = self
            .auto_hide
            .get(&id)
            .ok_or(DockError::AutoHideNotFound(id))?
            .area();
        if !self.is_area_visible(area) {
            return Ok(());
        }

        let others: Vec<AutoHideId> = self
            .auto_hide
            .values()
            .filter(|ah| ah.id() != id && ah.is_expanded())
            .map(|ah| ah.id())
            .collect();
        for other in others {
            self.set_auto_hide_state(other, AutoHideState::Collapsed, now);
        }

        self.set_auto_hide_state(id, AutoHideState::Expanded, now);
        self.finish_mutation();
        Ok(())
    }

    pub fn collapse_auto_hide(&mut self, id: AutoHideId) -> DockResult<()> {
        if !self.auto_hide.contains_key(&id) {
            return Err(DockError::AutoHideNotFound(id));
        }
        self.set_auto_hide_state(id, AutoHideState::Collapsed, Instant::now());
        self.finish_mutation();
        Ok(())
    }

    pub fn toggle_auto_hide(&mut self, id: AutoHideId) -> DockResult<()> {
        self.toggle_auto_hide_at(id, Instant::now())
    }

    /// Side tab activation: expand a collapsed overlay, collapse an expanded
    /// one unless it only just expanded.
    pub fn toggle_auto_hide_at(&mut self, id: AutoHideId, now: Instant) -> DockResult<()> {
        let ah = self
            .auto_hide
            .get(&id)
            .ok_or(DockError::AutoHideNotFound(id))?;
        if !ah.is_expanded() {
            return self.expand_auto_hide_at(id, now);
        }
        if self.within_collapse_guard(ah, now) {
            return Ok(());
        }
        self.set_auto_hide_state(id, AutoHideState::Collapsed, now);
        self.finish_mutation();
        Ok(())
    }

    /// The cursor entered a side tab. Arms the show-on-hover timer.
    pub fn side_tab_hover_started(&mut self, id: AutoHideId, now: Instant) {
        if !self.config.auto_hide.show_on_hover {
            return;
        }
        if let Some(ah) = self.auto_hide.get_mut(&id)
            && !ah.is_expanded()
        {
            ah.hover_since = Some(now);
        }
    }

    /// The cursor left a side tab. Cancels a pending hover expansion.
    pub fn side_tab_hover_ended(&mut self, id: AutoHideId) {
        if let Some(ah) = self.auto_hide.get_mut(&id) {
            ah.hover_since = None;
        }
    }

    /// Fire due hover timers. Returns the overlay that expanded, if any.
    pub fn tick(&mut self, now: Instant) -> Option<AutoHideId> {
        let delay = self.config.auto_hide.hover_delay();
        let due = self
            .auto_hide
            .values()
            .filter(|ah| !ah.is_expanded())
            .find(|ah| {
                ah.hover_since
                    .is_some_and(|since| now.saturating_duration_since(since) >= delay)
            })
            .map(|ah| ah.id())?;

        if let Some(ah) = self.auto_hide.get_mut(&due) {
            ah.hover_since = None;
        }
        tracing::trace!("Hover timer expanding {}", due);
        self.expand_auto_hide_at(due, now).ok()?;
        self.auto_hide
            .get(&due)
            .is_some_and(|ah| ah.is_expanded())
            .then_some(due)
    }

    /// Primary button pressed at `point` in the main window.
    ///
    /// A side tab toggles its overlay. A press outside every expanded
    /// overlay collapses it, except within the collapse guard after it
    /// expanded. Returns true when the press was consumed by a side tab.
    pub fn pointer_pressed(&mut self, point: Vec2, now: Instant) -> bool {
        if let Some(id) = self.side_tab_at(point) {
            if let Err(e) = self.toggle_auto_hide_at(id, now) {
                tracing::debug!("Side tab press on {} ignored: {}", id, e);
            }
            return true;
        }

        let to_collapse: Vec<AutoHideId> = self
            .auto_hide
            .values()
            .filter(|ah| ah.is_expanded() && !self.within_collapse_guard(ah, now))
            .filter(|ah| {
                !self
                    .auto_hide_rect(ah.id())
                    .is_some_and(|rect| rect.contains(point))
            })
            .map(|ah| ah.id())
            .collect();

        if !to_collapse.is_empty() {
            for id in to_collapse {
                self.set_auto_hide_state(id, AutoHideState::Collapsed, now);
            }
            self.finish_mutation();
        }
        false
    }

    /// The application window lost focus: collapse overlays and abort any drag.
    pub fn window_focus_lost(&mut self) {
        self.cancel_drag();
        let expanded: Vec<AutoHideId> = self
            .auto_hide
            .values()
            .filter(|ah| ah.is_expanded() || ah.hover_since.is_some())
            .map(|ah| ah.id())
            .collect();
        if expanded.is_empty() {
            return;
        }
        let now = Instant::now();
        for id in expanded {
            if let Some(ah) = self.auto_hide.get_mut(&id) {
                ah.hover_since = None;
            }
            self.set_auto_hide_state(id, AutoHideState::Collapsed, now);
        }
        self.finish_mutation();
    }

    /// Overlay rectangle of a pinned area, along its edge of the host
    /// container's content rectangle.
    pub fn auto_hide_rect(&self, id: AutoHideId) -> Option<Rect> {
        let ah = self.auto_hide.get(&id)?;
        let content = self.content_rect(ah.container());
        let rect = match ah.location() {
            SideBarLocation::Left => {
                let w = ah.extent().min(content.width);
                Rect::new(content.x, content.y, w, content.height)
            }
            SideBarLocation::Right => {
                let w = ah.extent().min(content.width);
                Rect::new(content.right() - w, content.y, w, content.height)
            }
            SideBarLocation::Top => {
                let h = ah.extent().min(content.height);
                Rect::new(content.x, content.y, content.width, h)
            }
            SideBarLocation::Bottom => {
                let h = ah.extent().min(content.height);
                Rect::new(content.x, content.bottom() - h, content.width, h)
            }
        };
        Some(rect)
    }

    /// Strip occupied by a side bar, `None` while it shows no tab.
    pub fn side_bar_rect(&self, container: ContainerId, location: SideBarLocation) -> Option<Rect> {
        if !self.side_bar_has_tabs(container, location) {
            return None;
        }
        let geometry = self.containers.get(&container)?.geometry();
        let content = self.content_rect(container);
        let thickness = self.config.auto_hide.side_bar_thickness;
        Some(match location {
            SideBarLocation::Left => Rect::new(geometry.x, content.y, thickness, content.height),
            SideBarLocation::Right => Rect::new(content.right(), content.y, thickness, content.height),
            SideBarLocation::Top => Rect::new(content.x, geometry.y, content.width, thickness),
            SideBarLocation::Bottom => Rect::new(content.x, content.bottom(), content.width, thickness),
        })
    }

    /// Side tabs of one bar with their rectangles. Overlays whose widgets are
    /// all closed have no tab.
    pub fn side_tab_rects(
        &self,
        container: ContainerId,
        location: SideBarLocation,
    ) -> Vec<(AutoHideId, Rect)> {
        let Some(bar) = self.side_bar_rect(container, location) else {
            return Vec::new();
        };
        let Some(c) = self.containers.get(&container) else {
            return Vec::new();
        };

        let mut offset = 0.0;
        c.side_bar(location)
            .items()
            .iter()
            .filter_map(|id| {
                let area = self.areas.get(&self.auto_hide.get(id)?.area())?;
                let title = area
                    .current()
                    .filter(|w| self.widgets.is_open(*w))
                    .and_then(|w| self.widgets.get(w))?
                    .title
                    .as_str();
                let length = estimate_tab_width(title, &self.config, false);
                let rect = if location.is_vertical() {
                    Rect::new(bar.x, bar.y + offset, bar.width, length)
                } else {
                    Rect::new(bar.x + offset, bar.y, length, bar.height)
                };
                offset += length;
                Some((*id, rect))
            })
            .collect()
    }

    /// Side tab of the main container under `point`.
    pub fn side_tab_at(&self, point: Vec2) -> Option<AutoHideId> {
        SideBarLocation::ALL.iter().find_map(|location| {
            self.side_tab_rects(self.main, *location)
                .into_iter()
                .find(|(_, rect)| rect.contains(point))
                .map(|(id, _)| id)
        })
    }

    /// Whether a side bar shows at least one tab.
    pub(crate) fn side_bar_has_tabs(&self, container: ContainerId, location: SideBarLocation) -> bool {
        self.containers.get(&container).is_some_and(|c| {
            c.side_bar(location).items().iter().any(|id| {
                self.auto_hide
                    .get(id)
                    .is_some_and(|ah| self.is_area_visible(ah.area()))
            })
        })
    }

    pub(crate) fn create_auto_hide(&mut self, area: AreaId, location: SideBarLocation) -> AutoHideId {
        let id = AutoHideId(self.alloc_handle());
        let container = self.main;
        self.auto_hide.insert(
            id,
            AutoHideContainer {
                id,
                container,
                location,
                area,
                extent: self.config.auto_hide.default_extent,
                state: AutoHideState::Collapsed,
                expanded_at: None,
                hover_since: None,
            },
        );
        if let Some(c) = self.containers.get_mut(&container) {
            c.side_bar_mut(location).insert(None, id);
        }
        if let Some(a) = self.areas.get_mut(&area) {
            a.set_auto_hide(Some(id));
            a.set_container(container);
        }
        self.emit(DockEvent::AutoHideCreated(id));
        id
    }

    /// Drop the overlay record. The area is left to the caller.
    pub(crate) fn remove_auto_hide_container(&mut self, id: AutoHideId) {
        let Some(ah) = self.auto_hide.shift_remove(&id) else {
            return;
        };
        if let Some(c) = self.containers.get_mut(&ah.container()) {
            c.side_bar_mut(ah.location()).remove(id);
        }
        tracing::debug!("Removed {}", id);
        self.emit(DockEvent::AutoHideRemoved(id));
    }

    /// Drop the overlay and dock its area at the side bar's edge.
    fn return_to_layout(&mut self, id: AutoHideId) {
        let Some(ah) = self.auto_hide.get(&id) else {
            return;
        };
        let (area, container, zone) = (ah.area(), ah.container(), ah.location().dock_zone());
        self.remove_auto_hide_container(id);

        let Some(a) = self.areas.get_mut(&area) else {
            return;
        };
        a.set_auto_hide(None);
        self.place_node(container, zone, None, DetachedNode::Area(area));
    }

    /// Unpin overlays whose widgets are all closed. The area keeps its
    /// closed tabs at the side bar's edge, so reopening one shows it docked.
    pub(crate) fn retire_closed_auto_hide(&mut self) {
        let closed: Vec<AutoHideId> = self
            .auto_hide
            .values()
            .filter(|ah| !self.is_area_visible(ah.area()))
            .map(|ah| ah.id())
            .collect();
        for id in closed {
            tracing::debug!("Last widget of {} closed, unpinning", id);
            self.return_to_layout(id);
        }
    }

    /// Collapse overlays that no longer have anything to show.
    pub(crate) fn sync_auto_hide(&mut self) {
        let stale: Vec<AutoHideId> = self
            .auto_hide
            .values()
            .filter(|ah| ah.is_expanded() && !self.is_area_visible(ah.area()))
            .map(|ah| ah.id())
            .collect();
        for id in stale {
            self.set_auto_hide_state(id, AutoHideState::Collapsed, Instant::now());
        }
    }

    fn set_auto_hide_state(&mut self, id: AutoHideId, state: AutoHideState, now: Instant) {
        let Some(ah) = self.auto_hide.get_mut(&id) else {
            return;
        };
        if ah.state == state {
            return;
        }
        ah.state = state;
        ah.expanded_at = (state == AutoHideState::Expanded).then_some(now);
        ah.hover_since = None;

        let expanded = state == AutoHideState::Expanded;
        tracing::debug!("{} {}", if expanded { "Expanded" } else { "Collapsed" }, id);
        self.emit(DockEvent::AutoHideStateChanged { id, expanded });
    }

    fn within_collapse_guard(&self, ah: &AutoHideContainer, now: Instant) -> bool {
        ah.expanded_at.is_some_and(|at| {
            now.saturating_duration_since(at) < self.config.auto_hide.collapse_guard()
        })
    }

    /// Side bar nearest to where the area sits in its container.
    fn preferred_side_bar(&self, area: AreaId) -> SideBarLocation {
        let Some(a) = self.areas.get(&area) else {
            return SideBarLocation::Left;
        };
        let rect = a.rect();
        if rect.is_empty() {
            return SideBarLocation::Left;
        }
        let content = self.content_rect(a.container());

        let distance = |location: &SideBarLocation| match location {
            SideBarLocation::Left => rect.x - content.x,
            SideBarLocation::Right => content.right() - rect.right(),
            SideBarLocation::Top => rect.y - content.y,
            SideBarLocation::Bottom => content.bottom() - rect.bottom(),
        };
        [
            SideBarLocation::Left,
            SideBarLocation::Right,
            SideBarLocation::Bottom,
            SideBarLocation::Top,
        ]
        .into_iter()
        .min_by(|a, b| distance(a).total_cmp(&distance(b)))
        .unwrap_or(SideBarLocation::Left)
    }
}
