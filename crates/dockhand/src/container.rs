//! Dock containers and the operations that place content in them.

use dockhand_core::{Rect, Size, Vec2};

use crate::auto_hide::SideBar;
use crate::error::{DockError, DockResult};
use crate::layout::{DetachedNode, LayoutTree};
use crate::system::DockingSystem;
use crate::types::{AreaId, ContainerId, DockZone, FloatingId, NodeId, SideBarLocation, WidgetId};

/// A layout tree plus its side bars: the main window, or the content of
/// one floating window.
#[derive(Debug, Clone)]
pub struct DockContainer {
    id: ContainerId,
    pub(crate) layout: LayoutTree,
    floating: Option<FloatingId>,
    geometry: Rect,
    z_order: u64,
    pub(crate) side_bars: [SideBar; 4],
    last_added_area: Option<AreaId>,
}

impl DockContainer {
    pub(crate) fn new(id: ContainerId, floating: Option<FloatingId>, geometry: Rect, z_order: u64) -> Self {
        Self {
            id,
            layout: LayoutTree::new(),
            floating,
            geometry,
            z_order,
            side_bars: SideBarLocation::ALL.map(SideBar::new),
            last_added_area: None,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn layout(&self) -> &LayoutTree {
        &self.layout
    }

    /// Floating window embedding this container, `None` for the main container.
    pub fn floating(&self) -> Option<FloatingId> {
        self.floating
    }

    pub fn is_floating(&self) -> bool {
        self.floating.is_some()
    }

    /// Outer rectangle, side bars included.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Rectangle given to the layout tree.
    pub fn content_rect(&self) -> Rect {
        self.layout.rect()
    }

    /// Stacking order among top-level containers; higher is in front.
    pub fn z_order(&self) -> u64 {
        self.z_order
    }

    pub fn side_bar(&self, location: SideBarLocation) -> &SideBar {
        &self.side_bars[location.index()]
    }

    pub(crate) fn side_bar_mut(&mut self, location: SideBarLocation) -> &mut SideBar {
        &mut self.side_bars[location.index()]
    }

    /// Area that last received a widget, the default for untargeted center drops.
    pub fn last_added_area(&self) -> Option<AreaId> {
        self.last_added_area
    }

    pub(crate) fn set_geometry(&mut self, geometry: Rect) {
        self.geometry = geometry;
    }

    pub(crate) fn set_z_order(&mut self, z_order: u64) {
        self.z_order = z_order;
    }

    pub(crate) fn set_last_added_area(&mut self, area: Option<AreaId>) {
        self.last_added_area = area;
    }

    pub(crate) fn forget_area(&mut self, area: AreaId) {
        if self.last_added_area == Some(area) {
            self.last_added_area = None;
        }
    }
}

impl DockingSystem {
    /// Dock `widget` relative to `target`, or at the main container's edge.
    ///
    /// - `Center` with a target adds a tab at `index` (default: last).
    /// - `Center` without a target tabs into the container's last added area,
    ///   or makes a new root area in an empty container.
    /// - Edge zones create a new area beside the target, or along the
    ///   container edge when there is no target.
    ///
    /// A widget that is already docked is moved. Returns the area that now
    /// holds the widget.
    pub fn add_widget(
        &mut self,
        widget: WidgetId,
        zone: DockZone,
        target: Option<AreaId>,
        index: Option<usize>,
    ) -> DockResult<AreaId> {
        let container = match target {
            Some(area) => self.try_area(area)?.container(),
            None => self.main,
        };
        self.place_widget(container, widget, zone, target, index)
    }

    /// Dock `widget` along the edge (or center) of a specific container.
    pub fn add_widget_to_container(
        &mut self,
        container: ContainerId,
        widget: WidgetId,
        zone: DockZone,
    ) -> DockResult<AreaId> {
        self.try_container(container)?;
        self.place_widget(container, widget, zone, None, None)
    }

    fn place_widget(
        &mut self,
        container: ContainerId,
        widget: WidgetId,
        zone: DockZone,
        target: Option<AreaId>,
        index: Option<usize>,
    ) -> DockResult<AreaId> {
        let current_area = self.widgets.try_get(widget)?.area();

        if let Some(target) = target {
            let area = self.try_area(target)?;
            if area.is_auto_hide() && zone != DockZone::Center {
                return Err(DockError::InvalidDropTarget);
            }
            if current_area == Some(target) {
                return self.reposition_in_area(widget, target, zone, index);
            }
        }

        self.take_widget(widget);

        let area = match (zone, target) {
            (DockZone::Center, Some(target)) => {
                self.insert_tab(target, widget, index);
                target
            }
            (DockZone::Center, None) => match self.center_fallback(container) {
                Some(target) => {
                    self.insert_tab(target, widget, index);
                    target
                }
                None => {
                    let area = self.new_area_with(container, &[widget]);
                    self.place_node(container, DockZone::Center, None, DetachedNode::Area(area));
                    area
                }
            },
            (zone, target) => {
                let area = self.new_area_with(container, &[widget]);
                self.place_node(container, zone, target, DetachedNode::Area(area));
                area
            }
        };

        if let Some(c) = self.containers.get_mut(&container) {
            c.set_last_added_area(Some(area));
        }
        tracing::debug!("Docked {} into {} ({:?})", widget, area, zone);
        self.finish_mutation();
        Ok(area)
    }

    /// A drop of a widget onto its own area.
    fn reposition_in_area(
        &mut self,
        widget: WidgetId,
        area_id: AreaId,
        zone: DockZone,
        index: Option<usize>,
    ) -> DockResult<AreaId> {
        let area = self.try_area(area_id)?;
        if zone != DockZone::Center {
            // Splitting a widget off its own area needs a sibling to stay behind.
            if area.len() < 2 {
                return Err(DockError::InvalidDropTarget);
            }
            let container = area.container();
            self.take_widget(widget);
            let new_area = self.new_area_with(container, &[widget]);
            self.place_node(container, zone, Some(area_id), DetachedNode::Area(new_area));
            self.finish_mutation();
            return Ok(new_area);
        }

        if let Some(area) = self.areas.get_mut(&area_id) {
            area.remove_widget(widget, &mut self.widgets);
            let index = index.unwrap_or(area.len()).min(area.len());
            area.insert_widget(index, widget, true, &mut self.widgets);
        }
        self.finish_mutation();
        Ok(area_id)
    }

    /// Area that untargeted center drops tab into.
    fn center_fallback(&self, container: ContainerId) -> Option<AreaId> {
        let c = self.containers.get(&container)?;
        c.last_added_area()
            .filter(|area| c.layout.contains_area(*area))
            .or_else(|| c.layout.areas().first().copied())
    }

    pub(crate) fn insert_tab(&mut self, area_id: AreaId, widget: WidgetId, index: Option<usize>) {
        if let Some(area) = self.areas.get_mut(&area_id) {
            let index = index.unwrap_or(area.len()).min(area.len());
            area.insert_widget(index, widget, true, &mut self.widgets);
        }
    }

    /// New area in `container` holding `widgets`, not yet in any layout.
    pub(crate) fn new_area_with(&mut self, container: ContainerId, widgets: &[WidgetId]) -> AreaId {
        let area_id = self.create_area(container);
        if let Some(area) = self.areas.get_mut(&area_id) {
            for (index, widget) in widgets.iter().enumerate() {
                area.insert_widget(index, *widget, index == 0, &mut self.widgets);
            }
        }
        area_id
    }

    /// Insert a detached subtree into a container's layout.
    ///
    /// `Center` is only meaningful for an empty layout, where the node
    /// becomes the root.
    pub(crate) fn place_node(
        &mut self,
        container: ContainerId,
        zone: DockZone,
        target: Option<AreaId>,
        node: DetachedNode,
    ) {
        let areas = node.areas();
        let Some(c) = self.containers.get_mut(&container) else {
            return;
        };

        let target_node = target.and_then(|area| c.layout.area_node(area));
        match (zone, target_node) {
            (DockZone::Center, _) => {
                if c.layout.is_empty() {
                    c.layout.set_root(node);
                } else {
                    c.layout.insert_at_edge(DockZone::Right, node);
                }
            }
            (zone, Some(target_node)) => c.layout.insert_relative(target_node, zone, node),
            (zone, None) => c.layout.insert_at_edge(zone, node),
        }

        for area_id in areas {
            if let Some(area) = self.areas.get_mut(&area_id) {
                area.set_container(container);
            }
        }
    }

    /// Move a whole area next to `target` or along a container edge.
    ///
    /// `Center` with a target tabs all of the area's widgets into the target
    /// and removes the source area.
    pub fn move_area(
        &mut self,
        area: AreaId,
        container: ContainerId,
        zone: DockZone,
        target: Option<AreaId>,
    ) -> DockResult<()> {
        self.try_area(area)?;
        self.try_container(container)?;
        if target == Some(area) {
            return Err(DockError::InvalidDropTarget);
        }
        if let Some(target) = target {
            let t = self.try_area(target)?;
            if t.container() != container || t.is_auto_hide() {
                return Err(DockError::InvalidDropTarget);
            }
        }

        if zone == DockZone::Center {
            let target = match target {
                Some(target) => Some(target),
                None => self.center_fallback(container),
            };
            if let Some(target) = target {
                self.merge_areas_into(&[area], target);
                self.finish_mutation();
                return Ok(());
            }
        }

        let node = self.detach_area(area);
        self.place_node(container, zone, target, node);
        if let Some(c) = self.containers.get_mut(&container) {
            c.set_last_added_area(Some(area));
        }
        tracing::debug!("Moved {} to {} ({:?})", area, container, zone);
        self.finish_mutation();
        Ok(())
    }

    /// Take an area out of its layout (or auto-hide overlay) without destroying it.
    pub(crate) fn detach_area(&mut self, area_id: AreaId) -> DetachedNode {
        let Some(area) = self.areas.get(&area_id) else {
            return DetachedNode::Area(area_id);
        };
        let container = area.container();

        match area.auto_hide() {
            Some(auto_hide) => {
                if let Some(area) = self.areas.get_mut(&area_id) {
                    area.set_auto_hide(None);
                }
                self.remove_auto_hide_container(auto_hide);
            }
            None => {
                if let Some(c) = self.containers.get_mut(&container) {
                    c.layout.remove_area(area_id);
                    c.forget_area(area_id);
                }
            }
        }
        DetachedNode::Area(area_id)
    }

    /// Tab every widget of `sources` into `target`, in order, and drop the
    /// emptied source areas. The first source's current widget ends up current.
    pub(crate) fn merge_areas_into(&mut self, sources: &[AreaId], target: AreaId) {
        let first_current = sources
            .first()
            .and_then(|area| self.areas.get(area))
            .and_then(|area| area.current());

        for source in sources {
            if *source == target {
                continue;
            }
            let widgets = match self.areas.get_mut(source) {
                Some(area) => area.take_widgets(&mut self.widgets),
                None => continue,
            };
            if let Some(t) = self.areas.get_mut(&target) {
                for widget in widgets {
                    let index = t.len();
                    t.insert_widget(index, widget, false, &mut self.widgets);
                }
            }
            self.destroy_area(*source);
        }

        if let Some(current) = first_current
            && let Some(t) = self.areas.get_mut(&target)
            && let Some(index) = t.index_of(current)
            && self.widgets.is_open(current)
        {
            t.set_current_index(index, &mut self.widgets);
        }
        tracing::debug!("Merged {:?} into {}", sources, target);
    }

    /// Remove an area and its layout node; its widgets become unassigned.
    ///
    /// A floating container left empty is torn down.
    pub fn remove_area(&mut self, area: AreaId) -> DockResult<()> {
        self.try_area(area)?;
        self.destroy_area(area);
        self.finish_mutation();
        Ok(())
    }

    /// Deepest visible area of `container` under `point`.
    pub fn dock_area_at(&self, container: ContainerId, point: Vec2) -> Option<AreaId> {
        let c = self.containers.get(&container)?;
        c.layout.area_at(point, &|area| self.is_area_visible(area))
    }

    /// Number of areas of `container` that show content.
    pub fn visible_area_count(&self, container: ContainerId) -> usize {
        self.open_areas(container).len()
    }

    /// Resize the main window.
    pub fn set_main_geometry(&mut self, geometry: Rect) {
        if let Some(main) = self.containers.get_mut(&self.main) {
            main.set_geometry(geometry);
        }
        self.relayout();
    }

    /// Minimum size of an area: the largest hint among its open widgets
    /// plus the title bar.
    pub fn area_min_size(&self, area: AreaId) -> Size {
        let Some(a) = self.areas.get(&area) else {
            return Size::ZERO;
        };
        let content = a
            .open_widgets(&self.widgets)
            .into_iter()
            .filter_map(|w| self.widgets.get(w))
            .fold(Size::ZERO, |acc, w| acc.max(w.min_size));
        Size::new(content.width, content.height + self.config.title_bar_height)
    }

    /// Drag the handle `handle` of `splitter` by `delta` pixels.
    ///
    /// Returns the delta that was applied after minimum-size clamping.
    pub fn resize_splitter(
        &mut self,
        container: ContainerId,
        splitter: NodeId,
        handle: usize,
        delta: f32,
    ) -> DockResult<f32> {
        let c = self.try_container(container)?;
        if c.layout.node(splitter).and_then(|n| n.as_splitter()).is_none() {
            return Err(DockError::InvalidDropTarget);
        }

        let mins: Vec<(AreaId, Size)> = c
            .layout
            .areas()
            .into_iter()
            .map(|area| (area, self.area_min_size(area)))
            .collect();
        let visible: Vec<AreaId> = c
            .layout
            .areas()
            .into_iter()
            .filter(|area| self.is_area_visible(*area))
            .collect();

        let applied = match self.containers.get_mut(&container) {
            Some(c) => c.layout.resize_splitter(
                splitter,
                handle,
                delta,
                &|area| {
                    mins.iter()
                        .find(|(a, _)| *a == area)
                        .map(|(_, size)| *size)
                        .unwrap_or(Size::ZERO)
                },
                &|area| visible.contains(&area),
            ),
            None => 0.0,
        };
        self.relayout();
        Ok(applied)
    }

    /// Splitter handle of `container` under `point`.
    pub fn splitter_handle_at(&self, container: ContainerId, point: Vec2) -> Option<(NodeId, usize)> {
        self.containers
            .get(&container)?
            .layout
            .handle_at(point, self.config.splitter_handle_tolerance)
    }

    /// Title bar (tab strip) of an area.
    pub fn area_title_bar_rect(&self, area: AreaId) -> Option<Rect> {
        self.areas
            .get(&area)
            .map(|a| a.rect().top_strip(self.config.title_bar_height))
    }

    /// Content rectangle of an area below its title bar.
    pub fn area_content_rect(&self, area: AreaId) -> Option<Rect> {
        self.areas
            .get(&area)
            .map(|a| a.rect().inset(self.config.title_bar_height, 0.0, 0.0, 0.0))
    }
}
