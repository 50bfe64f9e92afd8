//! Floating top-level windows, each wrapping one dock container.

use dockhand_core::{Rect, Vec2};

use crate::error::{DockError, DockResult};
use crate::events::DockEvent;
use crate::layout::DetachedNode;
use crate::system::DockingSystem;
use crate::types::{AreaId, ContainerId, DockZone, FloatingId, WidgetId};
use crate::widget::DockWidgetFeatures;

/// A floating window. Its geometry is the whole frame, title bar included.
#[derive(Debug, Clone)]
pub struct FloatingContainer {
    id: FloatingId,
    container: ContainerId,
    geometry: Rect,
    visible: bool,
}

impl FloatingContainer {
    pub fn id(&self) -> FloatingId {
        self.id
    }

    /// The embedded dock container.
    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// False while none of its areas has an open widget.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_geometry(&mut self, geometry: Rect) {
        self.geometry = geometry;
    }
}

impl DockingSystem {
    /// Move a widget into a new floating window.
    ///
    /// Fails with [`DockError::SoleFloatingContent`] when the widget is the
    /// only visible content of its floating window already.
    pub fn float_widget(&mut self, widget: WidgetId, geometry: Option<Rect>) -> DockResult<FloatingId> {
        self.require_widget_feature(widget, DockWidgetFeatures::FLOATABLE)?;

        let area = self.widget_area(widget);
        if let Some(area_id) = area
            && let Some(floating) = self.sole_floating_area(area_id)
            && self
                .areas
                .get(&area_id)
                .is_some_and(|a| a.open_widgets(&self.widgets) == [widget])
        {
            return Err(DockError::SoleFloatingContent(floating));
        }

        let near = area.and_then(|area| self.areas.get(&area)).map(|a| a.rect());
        let geometry = geometry.unwrap_or_else(|| self.default_floating_geometry(near));

        self.take_widget(widget);
        if let Some(w) = self.widgets.get_mut(widget) {
            w.set_closed(false);
        }
        let floating = self.float_new_area(&[widget], Some(geometry));
        tracing::debug!("Floated {} into {}", widget, floating);
        self.finish_mutation();
        Ok(floating)
    }

    /// Move a whole area into a new floating window.
    pub fn float_area(&mut self, area: AreaId, geometry: Option<Rect>) -> DockResult<FloatingId> {
        self.require_area_feature(area, DockWidgetFeatures::FLOATABLE)?;
        if let Some(floating) = self.sole_floating_area(area) {
            return Err(DockError::SoleFloatingContent(floating));
        }

        let near = self.areas.get(&area).map(|a| a.rect());
        let geometry = geometry.unwrap_or_else(|| self.default_floating_geometry(near));

        let node = self.detach_area(area);
        let (floating, container) = self.create_floating(geometry);
        self.place_node(container, DockZone::Center, None, node);
        tracing::debug!("Floated {} into {}", area, floating);
        self.finish_mutation();
        Ok(floating)
    }

    /// Dock the whole content of a floating window into `container`.
    ///
    /// - `Center` on a target area tabs every widget into it, preserving order.
    /// - `Center` without a target is accepted by an empty container (the
    ///   tree becomes its root) or one with a single visible area (tabbed).
    /// - Edge zones insert the floating tree beside the target or along the
    ///   container edge.
    ///
    /// The emptied floating window is destroyed.
    pub fn drop_floating(
        &mut self,
        floating: FloatingId,
        container: ContainerId,
        zone: DockZone,
        target: Option<AreaId>,
    ) -> DockResult<()> {
        let source = self
            .floating
            .get(&floating)
            .ok_or(DockError::FloatingNotFound(floating))?
            .container();
        self.try_container(container)?;
        if source == container {
            return Err(DockError::InvalidDropTarget);
        }
        if let Some(target) = target {
            let t = self.try_area(target)?;
            if t.container() != container || t.is_auto_hide() {
                return Err(DockError::InvalidDropTarget);
            }
        }

        let source_areas = self
            .containers
            .get(&source)
            .map(|c| c.layout.areas())
            .unwrap_or_default();

        match (zone, target) {
            (DockZone::Center, Some(target)) => self.merge_areas_into(&source_areas, target),
            (DockZone::Center, None) => {
                let host_empty = self
                    .containers
                    .get(&container)
                    .is_some_and(|c| c.layout.is_empty());
                let visible = self.open_areas(container);

                if host_empty {
                    if let Some(node) = self.take_floating_tree(source) {
                        self.place_node(container, DockZone::Center, None, node);
                    }
                } else if let [only] = visible.as_slice() {
                    self.merge_areas_into(&source_areas, *only);
                } else {
                    return Err(DockError::ZoneNotAllowed(DockZone::Center));
                }
            }
            (zone, target) => {
                if let Some(node) = self.take_floating_tree(source) {
                    self.place_node(container, zone, target, node);
                }
            }
        }

        if let Some(c) = self.containers.get_mut(&container)
            && let Some(first) = source_areas.first()
            && c.layout.contains_area(*first)
        {
            c.set_last_added_area(Some(*first));
        }
        tracing::debug!("Dropped {} into {} ({:?})", floating, container, zone);
        self.finish_mutation();
        Ok(())
    }

    fn take_floating_tree(&mut self, container: ContainerId) -> Option<DetachedNode> {
        let c = self.containers.get_mut(&container)?;
        c.set_last_added_area(None);
        c.layout.take_root()
    }

    /// Bring a floating window in front of every other top-level container.
    pub fn raise_floating(&mut self, floating: FloatingId) -> DockResult<()> {
        let container = self
            .floating
            .get(&floating)
            .ok_or(DockError::FloatingNotFound(floating))?
            .container();
        let z = self.next_z();
        if let Some(c) = self.containers.get_mut(&container) {
            c.set_z_order(z);
        }
        Ok(())
    }

    pub fn set_floating_geometry(&mut self, floating: FloatingId, geometry: Rect) -> DockResult<()> {
        self.floating
            .get_mut(&floating)
            .ok_or(DockError::FloatingNotFound(floating))?
            .set_geometry(geometry);
        self.relayout();
        Ok(())
    }

    /// Translate a floating window by `delta`.
    pub fn move_floating(&mut self, floating: FloatingId, delta: Vec2) -> DockResult<()> {
        let geometry = self
            .floating
            .get(&floating)
            .ok_or(DockError::FloatingNotFound(floating))?
            .geometry();
        self.set_floating_geometry(floating, geometry.translate(delta))
    }

    /// Close every open widget of a floating window.
    ///
    /// Refused unless all of them are closable.
    pub fn close_floating(&mut self, floating: FloatingId) -> DockResult<()> {
        let container = self
            .floating
            .get(&floating)
            .ok_or(DockError::FloatingNotFound(floating))?
            .container();

        let open: Vec<WidgetId> = self
            .open_areas(container)
            .into_iter()
            .filter_map(|area| self.areas.get(&area))
            .flat_map(|area| area.open_widgets(&self.widgets))
            .collect();

        if let Some(blocked) = open.iter().find(|w| {
            !self
                .effective_features(**w)
                .contains(DockWidgetFeatures::CLOSABLE)
        }) {
            return Err(DockError::FeatureMissing {
                widget: Some(*blocked),
                area: None,
                feature: DockWidgetFeatures::CLOSABLE,
            });
        }

        for widget in open {
            self.close_unchecked(widget)?;
        }
        Ok(())
    }

    /// The floating window's own title bar strip.
    pub fn floating_title_bar_rect(&self, floating: FloatingId) -> Option<Rect> {
        self.floating
            .get(&floating)
            .map(|f| f.geometry().top_strip(self.config.floating_title_bar_height))
    }

    /// Topmost visible floating window under `point`.
    pub fn floating_at(&self, point: Vec2) -> Option<FloatingId> {
        self.floating
            .values()
            .filter(|f| f.is_visible() && f.geometry().contains(point))
            .max_by_key(|f| {
                self.containers
                    .get(&f.container())
                    .map(|c| c.z_order())
                    .unwrap_or(0)
            })
            .map(|f| f.id())
    }

    /// Topmost visible top-level container under `point`, skipping `exclude`.
    pub fn top_level_at(&self, point: Vec2, exclude: Option<ContainerId>) -> Option<ContainerId> {
        self.containers
            .values()
            .filter(|c| Some(c.id()) != exclude)
            .filter(|c| match c.floating() {
                Some(floating) => self
                    .floating
                    .get(&floating)
                    .is_some_and(|f| f.is_visible() && f.geometry().contains(point)),
                None => c.geometry().contains(point),
            })
            .max_by_key(|c| c.z_order())
            .map(|c| c.id())
    }

    /// The floating window whose only visible area is `area`.
    pub(crate) fn sole_floating_area(&self, area: AreaId) -> Option<FloatingId> {
        let container = self.containers.get(&self.areas.get(&area)?.container())?;
        let floating = container.floating()?;
        let visible = self.open_areas(container.id());
        (visible == [area]).then_some(floating)
    }

    pub(crate) fn create_floating(&mut self, geometry: Rect) -> (FloatingId, ContainerId) {
        let id = FloatingId(self.alloc_handle());
        let title_bar = self.config.floating_title_bar_height;
        let container = self.alloc_container(Some(id), geometry.inset(title_bar, 0.0, 0.0, 0.0));
        self.floating.insert(
            id,
            FloatingContainer {
                id,
                container,
                geometry,
                visible: true,
            },
        );
        tracing::debug!("Created {} at {:?}", id, geometry);
        self.emit(DockEvent::FloatingCreated(id));
        (id, container)
    }

    pub(crate) fn destroy_floating(&mut self, floating: FloatingId) {
        let Some(f) = self.floating.shift_remove(&floating) else {
            return;
        };
        if let Some(container) = self.containers.shift_remove(&f.container()) {
            for area in container.layout.areas() {
                self.destroy_area(area);
            }
        }
        tracing::debug!("Destroyed {}", floating);
        self.emit(DockEvent::FloatingDestroyed(floating));
    }

    /// New floating window with one area holding `widgets`.
    pub(crate) fn float_new_area(&mut self, widgets: &[WidgetId], geometry: Option<Rect>) -> FloatingId {
        let geometry = geometry.unwrap_or_else(|| self.default_floating_geometry(None));
        let (floating, container) = self.create_floating(geometry);
        let area = self.new_area_with(container, widgets);
        self.place_node(container, DockZone::Center, None, DetachedNode::Area(area));
        if let Some(c) = self.containers.get_mut(&container) {
            c.set_last_added_area(Some(area));
        }
        floating
    }

    pub(crate) fn default_floating_geometry(&self, near: Option<Rect>) -> Rect {
        let size = self.config.floating_default_size;
        match near.filter(|rect| !rect.is_empty()) {
            Some(rect) => Rect::from_origin_size(rect.origin(), size),
            None => {
                let main = self
                    .containers
                    .get(&self.main)
                    .map(|c| c.geometry())
                    .unwrap_or_default();
                Rect::from_origin_size(Vec2::ZERO, size).centered_at(main.center())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DockEvent;

    fn docked(names: &[&str]) -> (DockingSystem, Vec<WidgetId>) {
        let mut system = DockingSystem::default();
        let mut ids = Vec::new();
        for name in names {
            let id = system.register_widget(*name, DockWidgetFeatures::DEFAULT).unwrap();
            system.add_widget(id, DockZone::Right, None, None).unwrap();
            ids.push(id);
        }
        (system, ids)
    }

    #[test]
    fn test_float_widget_creates_window() {
        let (mut system, ids) = docked(&["a", "b"]);
        system.drain_events();

        let floating = system.float_widget(ids[1], None).unwrap();
        assert!(system.is_widget_floating(ids[1]));
        assert_eq!(system.visible_area_count(system.main_container()), 1);

        let events = system.drain_events();
        assert!(events.contains(&DockEvent::FloatingCreated(floating)));
        assert!(events.contains(&DockEvent::TopLevelChanged {
            widget: ids[1],
            floating: true
        }));
        system.check_invariants().unwrap();
    }

    #[test]
    fn test_sole_floating_content_rejected() {
        let (mut system, ids) = docked(&["a"]);
        let floating = system.float_widget(ids[0], None).unwrap();
        assert_eq!(
            system.float_widget(ids[0], None),
            Err(DockError::SoleFloatingContent(floating))
        );
        let area = system.widget_area(ids[0]).unwrap();
        assert_eq!(
            system.float_area(area, None),
            Err(DockError::SoleFloatingContent(floating))
        );
    }

    #[test]
    fn test_float_requires_floatable() {
        let mut system = DockingSystem::default();
        let w = system
            .register_widget("pinned", DockWidgetFeatures::MOVABLE)
            .unwrap();
        system.add_widget(w, DockZone::Left, None, None).unwrap();
        assert!(matches!(
            system.float_widget(w, None),
            Err(DockError::FeatureMissing { .. })
        ));
    }

    #[test]
    fn test_floating_destroyed_when_emptied() {
        let (mut system, ids) = docked(&["a", "b"]);
        let floating = system.float_widget(ids[1], None).unwrap();
        system.drain_events();

        let main_area = system.widget_area(ids[0]).unwrap();
        system.add_widget(ids[1], DockZone::Center, Some(main_area), None).unwrap();

        assert!(system.floating(floating).is_none());
        assert!(system.drain_events().contains(&DockEvent::FloatingDestroyed(floating)));
        system.check_invariants().unwrap();
    }

    #[test]
    fn test_floating_hidden_when_all_closed() {
        let (mut system, ids) = docked(&["a", "b"]);
        let floating = system.float_widget(ids[1], None).unwrap();

        system.close_widget(ids[1]).unwrap();
        assert!(!system.floating(floating).unwrap().is_visible());

        system.set_widget_open(ids[1], true).unwrap();
        assert!(system.floating(floating).unwrap().is_visible());
    }

    #[test]
    fn test_drop_floating_into_own_container_rejected() {
        let (mut system, ids) = docked(&["a", "b"]);
        let floating = system.float_widget(ids[1], None).unwrap();
        let own = system.floating(floating).unwrap().container();
        assert_eq!(
            system.drop_floating(floating, own, DockZone::Left, None),
            Err(DockError::InvalidDropTarget)
        );
    }

    #[test]
    fn test_drop_floating_edge_keeps_tree() {
        let (mut system, ids) = docked(&["a", "b", "c"]);
        let floating = system.float_widget(ids[1], None).unwrap();
        let area_b = system.widget_area(ids[1]).unwrap();
        system
            .add_widget(ids[2], DockZone::Bottom, Some(area_b), None)
            .unwrap();
        let area_c = system.widget_area(ids[2]).unwrap();

        let main = system.main_container();
        system
            .drop_floating(floating, main, DockZone::Left, None)
            .unwrap();

        let layout = system.container(main).unwrap().layout();
        assert_eq!(layout.areas()[..2], [area_b, area_c]);
        assert!(system.floating(floating).is_none());
        assert!(!system.is_widget_floating(ids[2]));
        system.check_invariants().unwrap();
    }

    #[test]
    fn test_raise_floating_orders_hit_testing() {
        let (mut system, ids) = docked(&["a", "b", "c"]);
        let rect = Rect::new(100.0, 100.0, 300.0, 200.0);
        let first = system.float_widget(ids[1], Some(rect)).unwrap();
        let second = system.float_widget(ids[2], Some(rect)).unwrap();

        let point = Vec2::new(200.0, 200.0);
        assert_eq!(system.floating_at(point), Some(second));
        system.raise_floating(first).unwrap();
        assert_eq!(system.floating_at(point), Some(first));
    }
}
