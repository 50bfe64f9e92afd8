//! The docking context object.
//!
//! [`DockingSystem`] owns every widget, area, container, floating window and
//! auto-hide overlay. All other types refer to each other through handles
//! into its maps. Operations live in `impl DockingSystem` blocks next to the
//! component they mostly touch (`container.rs`, `floating.rs`, ...); this
//! file holds construction, queries, widget lifecycle and the fix-up pass
//! that runs after every mutation.

use dockhand_core::Rect;
use dockhand_core::alloc::HashMap;
use dockhand_core::profiling::profile_function;
use indexmap::IndexMap;

use crate::area::DockArea;
use crate::auto_hide::AutoHideContainer;
use crate::config::DockingConfig;
use crate::container::DockContainer;
use crate::drag::DragController;
use crate::error::{DockError, DockResult};
use crate::events::{DockEvent, DockListener, EventQueue};
use crate::floating::FloatingContainer;
use crate::focus::FocusTracker;
use crate::types::{AreaId, AutoHideId, ContainerId, FloatingId, SideBarLocation, WidgetId};
use crate::widget::{DockWidget, DockWidgetFeatures, WidgetRegistry};

/// Docking engine state for one application window.
#[derive(Debug)]
pub struct DockingSystem {
    pub(crate) config: DockingConfig,
    pub(crate) widgets: WidgetRegistry,
    pub(crate) areas: IndexMap<AreaId, DockArea>,
    pub(crate) containers: IndexMap<ContainerId, DockContainer>,
    pub(crate) floating: IndexMap<FloatingId, FloatingContainer>,
    pub(crate) auto_hide: IndexMap<AutoHideId, AutoHideContainer>,
    pub(crate) main: ContainerId,
    pub(crate) drag: DragController,
    pub(crate) focus: FocusTracker,
    pub(crate) events: EventQueue,
    locked: DockWidgetFeatures,
    visibility: HashMap<WidgetId, bool>,
    top_level: HashMap<WidgetId, bool>,
    next_handle: u64,
    next_z: u64,
}

impl Default for DockingSystem {
    fn default() -> Self {
        Self::new(DockingConfig::default())
    }
}

impl DockingSystem {
    /// Create a docking system with an empty main container.
    pub fn new(config: DockingConfig) -> Self {
        let geometry = config.main_geometry;
        let mut system = Self {
            config,
            widgets: WidgetRegistry::new(),
            areas: IndexMap::new(),
            containers: IndexMap::new(),
            floating: IndexMap::new(),
            auto_hide: IndexMap::new(),
            main: ContainerId(0),
            drag: DragController::default(),
            focus: FocusTracker::default(),
            events: EventQueue::default(),
            locked: DockWidgetFeatures::empty(),
            visibility: HashMap::default(),
            top_level: HashMap::default(),
            next_handle: 0,
            next_z: 0,
        };
        system.main = system.alloc_container(None, geometry);
        system.relayout();
        system
    }

    pub fn config(&self) -> &DockingConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The main window's container.
    pub fn main_container(&self) -> ContainerId {
        self.main
    }

    pub fn widget(&self, id: WidgetId) -> Option<&DockWidget> {
        self.widgets.get(id)
    }

    pub fn find_widget(&self, name: &str) -> Option<WidgetId> {
        self.widgets.find(name)
    }

    /// Registered widgets in registration order.
    pub fn widgets(&self) -> impl Iterator<Item = &DockWidget> {
        self.widgets.iter()
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.widgets
    }

    pub fn area(&self, id: AreaId) -> Option<&DockArea> {
        self.areas.get(&id)
    }

    pub fn areas(&self) -> impl Iterator<Item = &DockArea> {
        self.areas.values()
    }

    pub fn container(&self, id: ContainerId) -> Option<&DockContainer> {
        self.containers.get(&id)
    }

    pub fn containers(&self) -> impl Iterator<Item = &DockContainer> {
        self.containers.values()
    }

    pub fn floating(&self, id: FloatingId) -> Option<&FloatingContainer> {
        self.floating.get(&id)
    }

    pub fn floating_containers(&self) -> impl Iterator<Item = &FloatingContainer> {
        self.floating.values()
    }

    pub fn auto_hide_container(&self, id: AutoHideId) -> Option<&AutoHideContainer> {
        self.auto_hide.get(&id)
    }

    pub fn auto_hide_containers(&self) -> impl Iterator<Item = &AutoHideContainer> {
        self.auto_hide.values()
    }

    /// Area currently hosting `widget`.
    pub fn widget_area(&self, widget: WidgetId) -> Option<AreaId> {
        self.widgets.get(widget).and_then(|w| w.area())
    }

    /// Container hosting `widget`, through its area.
    pub fn widget_container(&self, widget: WidgetId) -> Option<ContainerId> {
        self.widget_area(widget)
            .and_then(|area| self.areas.get(&area))
            .map(|area| area.container())
    }

    /// True while the area has at least one open widget.
    pub fn is_area_visible(&self, area: AreaId) -> bool {
        self.areas
            .get(&area)
            .is_some_and(|a| a.has_open_widgets(&self.widgets))
    }

    /// Visible areas of a container's layout, in reading order.
    pub fn open_areas(&self, container: ContainerId) -> Vec<AreaId> {
        self.containers
            .get(&container)
            .map(|c| {
                c.layout
                    .areas()
                    .into_iter()
                    .filter(|area| self.is_area_visible(*area))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the widget's content is currently shown.
    ///
    /// True when the widget is open, current in its area, and the area is on
    /// screen (visible floating window or expanded auto-hide overlay).
    pub fn is_widget_visible(&self, widget: WidgetId) -> bool {
        let Some(w) = self.widgets.get(widget) else {
            return false;
        };
        if w.is_closed() {
            return false;
        }
        let Some(area) = w.area().and_then(|area| self.areas.get(&area)) else {
            return false;
        };
        if area.current() != Some(widget) {
            return false;
        }
        if let Some(auto_hide) = area.auto_hide() {
            return self
                .auto_hide
                .get(&auto_hide)
                .is_some_and(|ah| ah.is_expanded());
        }
        match self.containers.get(&area.container()).and_then(|c| c.floating()) {
            Some(floating) => self.floating.get(&floating).is_some_and(|f| f.is_visible()),
            None => true,
        }
    }

    /// Whether the widget lives in a floating window.
    pub fn is_widget_floating(&self, widget: WidgetId) -> bool {
        self.widget_container(widget)
            .and_then(|container| self.containers.get(&container))
            .is_some_and(|c| c.is_floating())
    }

    // ------------------------------------------------------------------
    // Features
    // ------------------------------------------------------------------

    /// Disable `features` for every widget, for example to freeze the layout.
    pub fn set_locked_features(&mut self, features: DockWidgetFeatures) {
        self.locked = features;
    }

    pub fn locked_features(&self) -> DockWidgetFeatures {
        self.locked
    }

    /// Widget features with the global lock applied.
    pub fn effective_features(&self, widget: WidgetId) -> DockWidgetFeatures {
        self.widgets
            .get(widget)
            .map(|w| w.features() - self.locked)
            .unwrap_or_else(DockWidgetFeatures::empty)
    }

    /// Features shared by every widget of the area, with the global lock applied.
    pub fn area_features(&self, area: AreaId) -> DockWidgetFeatures {
        self.areas
            .get(&area)
            .map(|a| a.features(&self.widgets) - self.locked)
            .unwrap_or_else(DockWidgetFeatures::empty)
    }

    pub(crate) fn require_widget_feature(
        &self,
        widget: WidgetId,
        feature: DockWidgetFeatures,
    ) -> DockResult<()> {
        self.widgets.try_get(widget)?;
        if self.effective_features(widget).contains(feature) {
            Ok(())
        } else {
            Err(DockError::FeatureMissing {
                widget: Some(widget),
                area: None,
                feature,
            })
        }
    }

    pub(crate) fn require_area_feature(
        &self,
        area: AreaId,
        feature: DockWidgetFeatures,
    ) -> DockResult<()> {
        self.try_area(area)?;
        if self.area_features(area).contains(feature) {
            Ok(())
        } else {
            Err(DockError::FeatureMissing {
                widget: None,
                area: Some(area),
                feature,
            })
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register an observer that receives every event as it happens.
    pub fn add_listener(&mut self, listener: impl DockListener + 'static) {
        self.events.add_listener(Box::new(listener));
    }

    /// Take all events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<DockEvent> {
        self.events.drain()
    }

    pub(crate) fn emit(&mut self, event: DockEvent) {
        self.events.emit(event);
    }

    // ------------------------------------------------------------------
    // Widget lifecycle
    // ------------------------------------------------------------------

    /// Register a widget under a unique name. It starts unassigned.
    pub fn register_widget(
        &mut self,
        name: impl Into<String>,
        features: DockWidgetFeatures,
    ) -> DockResult<WidgetId> {
        let id = self.widgets.register(name, features)?;
        tracing::debug!("Registered dock widget {}", id);
        Ok(id)
    }

    pub fn set_widget_title(&mut self, widget: WidgetId, title: impl Into<String>) -> DockResult<()> {
        let w = self
            .widgets
            .get_mut(widget)
            .ok_or(DockError::WidgetNotFound(widget))?;
        w.title = title.into();
        Ok(())
    }

    pub fn set_widget_min_size(&mut self, widget: WidgetId, size: dockhand_core::Size) -> DockResult<()> {
        let w = self
            .widgets
            .get_mut(widget)
            .ok_or(DockError::WidgetNotFound(widget))?;
        w.min_size = size;
        Ok(())
    }

    pub fn set_widget_features(
        &mut self,
        widget: WidgetId,
        features: DockWidgetFeatures,
    ) -> DockResult<()> {
        let w = self
            .widgets
            .get_mut(widget)
            .ok_or(DockError::WidgetNotFound(widget))?;
        w.set_features(features);
        self.finish_mutation();
        Ok(())
    }

    /// Remove a widget from the layout and the registry.
    pub fn unregister_widget(&mut self, widget: WidgetId) -> DockResult<()> {
        self.widgets.try_get(widget)?;

        self.take_widget(widget);
        if let Some(w) = self.widgets.get_mut(widget) {
            w.set_closed(true);
        }
        self.finish_mutation();

        let Some(removed) = self.widgets.remove(widget) else {
            return Ok(());
        };
        self.visibility.remove(&widget);
        self.top_level.remove(&widget);
        if self.focus.focused_widget() == Some(widget) {
            self.apply_focus(None);
        }
        tracing::debug!("Unregistered dock widget {} ({})", widget, removed.name());
        self.emit(DockEvent::WidgetRemoved {
            widget,
            name: removed.name().to_string(),
        });
        Ok(())
    }

    /// Show or hide a widget without checking its features.
    ///
    /// Showing a widget makes it current in its area. An unassigned widget is
    /// shown in a new floating window. Hiding keeps the widget in its area so
    /// it comes back at the same tab position.
    pub fn set_widget_open(&mut self, widget: WidgetId, open: bool) -> DockResult<()> {
        let w = self.widgets.try_get(widget)?;
        let area = w.area();
        let closed = w.is_closed();

        if open {
            match area {
                Some(area_id) => {
                    if let Some(area) = self.areas.get_mut(&area_id)
                        && let Some(index) = area.index_of(widget)
                    {
                        area.set_current_index(index, &mut self.widgets);
                    }
                }
                None => {
                    if let Some(w) = self.widgets.get_mut(widget) {
                        w.set_closed(false);
                    }
                    let floating = self.float_new_area(&[widget], None);
                    tracing::debug!("Showing unassigned widget {} in {}", widget, floating);
                }
            }
        } else {
            if closed {
                return Ok(());
            }
            if let Some(w) = self.widgets.get_mut(widget) {
                w.set_closed(true);
            }
            if let Some(area) = area.and_then(|area| self.areas.get_mut(&area)) {
                area.widget_closed(widget, &self.widgets);
            }
        }

        self.finish_mutation();
        Ok(())
    }

    /// User close: requires CLOSABLE, deletes DELETE_ON_CLOSE widgets.
    pub fn close_widget(&mut self, widget: WidgetId) -> DockResult<()> {
        self.require_widget_feature(widget, DockWidgetFeatures::CLOSABLE)?;
        self.close_unchecked(widget)
    }

    pub(crate) fn close_unchecked(&mut self, widget: WidgetId) -> DockResult<()> {
        if self.effective_features(widget)
            .contains(DockWidgetFeatures::DELETE_ON_CLOSE)
        {
            tracing::debug!("Deleting {} on close", widget);
            return self.unregister_widget(widget);
        }
        self.set_widget_open(widget, false)
    }

    /// Close every open widget of the area that is closable or forced to
    /// close with it.
    pub fn close_area(&mut self, area: AreaId) -> DockResult<()> {
        let targets: Vec<WidgetId> = self
            .try_area(area)?
            .open_widgets(&self.widgets)
            .into_iter()
            .filter(|w| {
                let features = self.effective_features(*w);
                features.contains(DockWidgetFeatures::CLOSABLE)
                    || features.contains(DockWidgetFeatures::FORCE_CLOSE_WITH_AREA)
            })
            .collect();

        if targets.is_empty() {
            return Err(DockError::FeatureMissing {
                widget: None,
                area: Some(area),
                feature: DockWidgetFeatures::CLOSABLE,
            });
        }

        for widget in targets {
            self.close_unchecked(widget)?;
        }
        Ok(())
    }

    /// Close every other visible area of the same container.
    pub fn close_other_areas(&mut self, keep: AreaId) -> DockResult<()> {
        let container = self.try_area(keep)?.container();
        for area in self.open_areas(container) {
            if area != keep && self.areas.contains_key(&area) {
                if let Err(e) = self.close_area(area) {
                    tracing::debug!("Keeping {} open: {}", area, e);
                }
            }
        }
        Ok(())
    }

    /// Make `widget` the current tab of its area, reopening it if needed.
    pub fn activate_widget(&mut self, widget: WidgetId) -> DockResult<()> {
        let area_id = self
            .widgets
            .try_get(widget)?
            .area()
            .ok_or(DockError::WidgetUnassigned(widget))?;
        if let Some(area) = self.areas.get_mut(&area_id)
            && let Some(index) = area.index_of(widget)
        {
            area.set_current_index(index, &mut self.widgets);
        }
        self.finish_mutation();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internal bookkeeping
    // ------------------------------------------------------------------

    pub(crate) fn try_area(&self, area: AreaId) -> DockResult<&DockArea> {
        self.areas.get(&area).ok_or(DockError::AreaNotFound(area))
    }

    pub(crate) fn try_container(&self, container: ContainerId) -> DockResult<&DockContainer> {
        self.containers
            .get(&container)
            .ok_or(DockError::ContainerNotFound(container))
    }

    pub(crate) fn alloc_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    pub(crate) fn next_z(&mut self) -> u64 {
        self.next_z += 1;
        self.next_z
    }

    pub(crate) fn alloc_container(&mut self, floating: Option<FloatingId>, geometry: Rect) -> ContainerId {
        let id = ContainerId(self.alloc_handle());
        let z = self.next_z();
        self.containers
            .insert(id, DockContainer::new(id, floating, geometry, z));
        id
    }

    /// Create an empty area owned by `container`. The caller places it.
    pub(crate) fn create_area(&mut self, container: ContainerId) -> AreaId {
        let id = AreaId(self.alloc_handle());
        self.areas.insert(id, DockArea::new(id, container));
        tracing::debug!("Created {} in {}", id, container);
        self.emit(DockEvent::AreaCreated(id));
        id
    }

    /// Remove an area from wherever it lives and drop it.
    ///
    /// Widgets still in it become unassigned. A pinned area takes its
    /// auto-hide overlay with it.
    pub(crate) fn destroy_area(&mut self, area_id: AreaId) {
        let Some(mut area) = self.areas.shift_remove(&area_id) else {
            return;
        };

        for widget in area.take_widgets(&mut self.widgets) {
            self.emit(DockEvent::WidgetUnassigned(widget));
        }

        match area.auto_hide() {
            Some(auto_hide) => self.remove_auto_hide_container(auto_hide),
            None => {
                if let Some(container) = self.containers.get_mut(&area.container()) {
                    container.layout.remove_area(area_id);
                    container.forget_area(area_id);
                }
            }
        }

        tracing::debug!("Removed {}", area_id);
        self.emit(DockEvent::AreaRemoved(area_id));
    }

    /// Take `widget` out of its area. An area left without widgets is destroyed.
    ///
    /// Returns the former area if it still exists.
    pub(crate) fn take_widget(&mut self, widget: WidgetId) -> Option<AreaId> {
        let area_id = self.widgets.get(widget)?.area()?;
        let Some(area) = self.areas.get_mut(&area_id) else {
            if let Some(w) = self.widgets.get_mut(widget) {
                w.set_area(None);
            }
            return None;
        };

        area.remove_widget(widget, &mut self.widgets);
        if area.is_empty() {
            self.destroy_area(area_id);
            None
        } else {
            Some(area_id)
        }
    }

    /// Restore every invariant after a structural change and report what
    /// became visible, hidden, floating or docked.
    pub(crate) fn finish_mutation(&mut self) {
        profile_function!();
        self.cleanup_floating();
        self.retire_closed_auto_hide();
        self.relayout();
        self.sync_auto_hide();
        self.sync_focus();
        self.emit_state_changes();
    }

    fn cleanup_floating(&mut self) {
        let ids: Vec<FloatingId> = self.floating.keys().copied().collect();
        for id in ids {
            let Some(container_id) = self.floating.get(&id).map(|f| f.container()) else {
                continue;
            };
            let Some(container) = self.containers.get(&container_id) else {
                continue;
            };

            if container.layout.is_empty() {
                self.destroy_floating(id);
                continue;
            }

            let has_content = container
                .layout
                .has_visible_content(&|area| self.is_area_visible(area));
            if let Some(floating) = self.floating.get_mut(&id)
                && floating.is_visible() != has_content
            {
                tracing::debug!(
                    "{} {}",
                    if has_content { "Showing" } else { "Hiding" },
                    id
                );
                floating.set_visible(has_content);
            }
        }
    }

    /// Recompute every rectangle from container geometry.
    pub(crate) fn relayout(&mut self) {
        profile_function!();
        let title_bar = self.config.floating_title_bar_height;

        // Floating containers follow their window frame.
        for floating in self.floating.values() {
            if let Some(container) = self.containers.get_mut(&floating.container()) {
                container.set_geometry(floating.geometry().inset(title_bar, 0.0, 0.0, 0.0));
            }
        }

        let ids: Vec<ContainerId> = self.containers.keys().copied().collect();
        for id in ids {
            let content = self.content_rect(id);
            let areas = &self.areas;
            let widgets = &self.widgets;
            if let Some(container) = self.containers.get_mut(&id) {
                container.layout.relayout(content, &|area| {
                    areas.get(&area).is_some_and(|a| a.has_open_widgets(widgets))
                });
            }
        }

        for container in self.containers.values() {
            for area_id in container.layout.areas() {
                let rect = container.layout.area_rect(area_id).unwrap_or(Rect::ZERO);
                if let Some(area) = self.areas.get_mut(&area_id) {
                    area.set_rect(rect);
                }
            }
        }

        let overlays: Vec<(AreaId, Rect)> = self
            .auto_hide
            .values()
            .map(|ah| (ah.area(), self.auto_hide_rect(ah.id()).unwrap_or(Rect::ZERO)))
            .collect();
        for (area_id, rect) in overlays {
            if let Some(area) = self.areas.get_mut(&area_id) {
                area.set_rect(rect);
            }
        }
    }

    /// Container rectangle left for the layout tree once visible side bars
    /// have taken their strips.
    pub(crate) fn content_rect(&self, container: ContainerId) -> Rect {
        let Some(c) = self.containers.get(&container) else {
            return Rect::ZERO;
        };
        if c.is_floating() {
            return c.geometry();
        }

        let thickness = self.config.auto_hide.side_bar_thickness;
        let strip = |location: SideBarLocation| {
            if self.side_bar_has_tabs(container, location) {
                thickness
            } else {
                0.0
            }
        };
        c.geometry().inset(
            strip(SideBarLocation::Top),
            strip(SideBarLocation::Right),
            strip(SideBarLocation::Bottom),
            strip(SideBarLocation::Left),
        )
    }

    fn emit_state_changes(&mut self) {
        let ids: Vec<WidgetId> = self.widgets.ids().collect();
        for widget in ids {
            let visible = self.is_widget_visible(widget);
            if self.visibility.insert(widget, visible).unwrap_or(false) != visible {
                self.emit(DockEvent::VisibilityChanged { widget, visible });
            }

            let floating = self.is_widget_floating(widget);
            if self.top_level.insert(widget, floating).unwrap_or(false) != floating {
                self.emit(DockEvent::TopLevelChanged { widget, floating });
            }
        }
    }

    /// Check cross-references between widgets, areas, containers and
    /// overlays, plus the layout invariants of every container.
    pub fn check_invariants(&self) -> Result<(), String> {
        for container in self.containers.values() {
            container
                .layout
                .check_invariants()
                .map_err(|e| format!("{}: {}", container.id(), e))?;

            if container.is_floating() && container.layout.is_empty() {
                return Err(format!("floating {} has no content", container.id()));
            }

            for area_id in container.layout.areas() {
                let area = self
                    .areas
                    .get(&area_id)
                    .ok_or_else(|| format!("{} references missing {}", container.id(), area_id))?;
                if area.container() != container.id() {
                    return Err(format!("{} is owned by the wrong container", area_id));
                }
                if area.is_auto_hide() {
                    return Err(format!("pinned {} is also in a layout", area_id));
                }
            }
        }

        let main_count = self.containers.values().filter(|c| !c.is_floating()).count();
        if main_count != 1 {
            return Err(format!("{} main containers", main_count));
        }

        for area in self.areas.values() {
            if area.is_empty() {
                return Err(format!("{} has no widgets", area.id()));
            }
            if area.is_auto_hide() && !area.has_open_widgets(&self.widgets) {
                return Err(format!("pinned {} has no open widgets", area.id()));
            }
            let placed = match area.auto_hide() {
                Some(id) => self.auto_hide.get(&id).is_some_and(|ah| ah.area() == area.id()),
                None => self
                    .containers
                    .get(&area.container())
                    .is_some_and(|c| c.layout.contains_area(area.id())),
            };
            if !placed {
                return Err(format!("{} is not placed anywhere", area.id()));
            }
            for widget in area.widgets() {
                if self.widget_area(*widget) != Some(area.id()) {
                    return Err(format!("{} does not point back at {}", widget, area.id()));
                }
            }
            if let Some(current) = area.current()
                && !area.contains(current)
            {
                return Err(format!("{} has a foreign current widget", area.id()));
            }
        }

        for widget in self.widgets.iter() {
            if let Some(area) = widget.area()
                && !self.areas.get(&area).is_some_and(|a| a.contains(widget.id()))
            {
                return Err(format!("{} points at {} which lacks it", widget.id(), area));
            }
        }

        for ah in self.auto_hide.values() {
            let container = self
                .containers
                .get(&ah.container())
                .ok_or_else(|| format!("{} has no container", ah.id()))?;
            if container.is_floating() {
                return Err(format!("{} lives in a floating container", ah.id()));
            }
            if !container.side_bar(ah.location()).items().contains(&ah.id()) {
                return Err(format!("{} is missing from its side bar", ah.id()));
            }
        }

        for floating in self.floating.values() {
            if self
                .containers
                .get(&floating.container())
                .and_then(|c| c.floating())
                != Some(floating.id())
            {
                return Err(format!("{} and its container disagree", floating.id()));
            }
        }

        Ok(())
    }
}
