//! Saving and restoring the docking layout.
//!
//! A [`LayoutDocument`] mirrors the live state by widget *name*: the main
//! container first, then every floating container, each with its splitter
//! tree, and the main container's side bars. It serializes to JSON through
//! serde.
//!
//! Restoring runs in two passes. The first only validates the document and
//! never touches live state, so a rejected document leaves everything as it
//! was. The second tears the layout down and rebuilds it.

use std::path::Path;

use dockhand_core::Rect;
use dockhand_core::alloc::HashSet;
use dockhand_core::profiling::{profile_function, profile_scope};
use serde::{Deserialize, Serialize};

use crate::error::RestoreError;
use crate::events::DockEvent;
use crate::layout::{DetachedNode, LayoutTree, NodeKind};
use crate::system::DockingSystem;
use crate::types::{AreaId, AutoHideId, ContainerId, FloatingId, NodeId, Orientation, SideBarLocation, WidgetId};

/// Version of the document structure written by [`DockingSystem::save_state`].
pub const LAYOUT_FORMAT_VERSION: u32 = 1;

/// A saved docking layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub format_version: u32,
    /// Application-defined layout version, checked on restore.
    #[serde(default)]
    pub user_version: u32,
    pub containers: Vec<ContainerState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerState {
    pub floating: bool,
    /// Window frame of a floating container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Rect>,
    #[serde(default)]
    pub root: Option<NodeState>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub side_bars: Vec<SideBarState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeState {
    Splitter {
        orientation: Orientation,
        count: usize,
        /// Whitespace-separated child extents.
        sizes: String,
        children: Vec<NodeState>,
    },
    Area(AreaState),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaState {
    pub tab_count: usize,
    #[serde(default)]
    pub current: Option<String>,
    pub tabs: Vec<TabState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabState {
    pub name: String,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideBarState {
    pub location: SideBarLocation,
    pub items: Vec<PinnedState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedState {
    pub extent: f32,
    pub area: AreaState,
}

impl LayoutDocument {
    pub fn to_json(&self) -> Result<String, RestoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RestoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Structural check of the whole document. Unknown widget names are not
    /// an error here; they are skipped when the layout is applied.
    pub fn validate(&self) -> Result<(), RestoreError> {
        let mains = self.containers.iter().filter(|c| !c.floating).count();
        match mains {
            0 => return Err(RestoreError::MissingMainContainer),
            1 => {}
            _ => return Err(RestoreError::MultipleMainContainers),
        }

        let mut names = HashSet::default();
        for container in &self.containers {
            if let Some(root) = &container.root {
                validate_node(root, &mut names)?;
            }
            for side_bar in &container.side_bars {
                for item in &side_bar.items {
                    validate_area(&item.area, &mut names)?;
                }
            }
        }
        Ok(())
    }
}

fn validate_node(node: &NodeState, names: &mut HashSet<String>) -> Result<(), RestoreError> {
    match node {
        NodeState::Splitter {
            count,
            sizes,
            children,
            ..
        } => {
            if children.is_empty() {
                return Err(RestoreError::EmptySplitter);
            }
            if *count != children.len() {
                return Err(RestoreError::ChildCountMismatch {
                    declared: *count,
                    actual: children.len(),
                });
            }
            let sizes = parse_sizes(sizes)?;
            if sizes.len() != children.len() {
                return Err(RestoreError::SizeCountMismatch {
                    sizes: sizes.len(),
                    children: children.len(),
                });
            }
            for child in children {
                validate_node(child, names)?;
            }
            Ok(())
        }
        NodeState::Area(area) => validate_area(area, names),
    }
}

fn validate_area(area: &AreaState, names: &mut HashSet<String>) -> Result<(), RestoreError> {
    if area.tab_count != area.tabs.len() {
        return Err(RestoreError::TabCountMismatch {
            declared: area.tab_count,
            actual: area.tabs.len(),
        });
    }
    for tab in &area.tabs {
        if !names.insert(tab.name.clone()) {
            return Err(RestoreError::DuplicateWidget(tab.name.clone()));
        }
    }
    Ok(())
}

fn parse_sizes(sizes: &str) -> Result<Vec<f32>, RestoreError> {
    sizes
        .split_whitespace()
        .map(|value| match value.parse::<f32>() {
            Ok(size) if size.is_finite() && size >= 0.0 => Ok(size),
            _ => Err(RestoreError::InvalidSize(value.to_string())),
        })
        .collect()
}

fn format_sizes(sizes: &[f32]) -> String {
    sizes
        .iter()
        .map(|size| size.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl DockingSystem {
    /// Capture the current layout.
    pub fn save_state(&self, user_version: u32) -> LayoutDocument {
        profile_function!();
        let mut containers = Vec::with_capacity(1 + self.floating.len());
        containers.push(self.save_container(self.main, None));
        for floating in self.floating.values() {
            containers.push(self.save_container(floating.container(), Some(floating.geometry())));
        }
        LayoutDocument {
            format_version: LAYOUT_FORMAT_VERSION,
            user_version,
            containers,
        }
    }

    /// Replace the current layout with `document`.
    ///
    /// On error nothing has changed. Registered widgets the document does not
    /// mention end up unassigned and closed.
    pub fn restore_state(&mut self, document: &LayoutDocument, user_version: u32) -> Result<(), RestoreError> {
        profile_function!();
        let checked = {
            profile_scope!("validate_layout");
            self.check_document(document, user_version)
        };
        if let Err(e) = checked {
            tracing::warn!("Rejected layout document: {}", e);
            return Err(e);
        }

        let assigned: Vec<WidgetId> = self
            .widgets
            .iter()
            .filter(|w| w.area().is_some())
            .map(|w| w.id())
            .collect();

        self.cancel_drag();
        self.clear_layout();

        for state in &document.containers {
            if state.floating {
                let geometry = state
                    .geometry
                    .unwrap_or_else(|| self.default_floating_geometry(None));
                let (_, container) = self.create_floating(geometry);
                self.restore_tree(container, state.root.as_ref());
            } else {
                let main = self.main;
                self.restore_tree(main, state.root.as_ref());
                for side_bar in &state.side_bars {
                    for item in &side_bar.items {
                        if let Some(area) = self.restore_area(main, &item.area) {
                            let id = self.create_auto_hide(area, side_bar.location);
                            let min = self.config.auto_hide.min_extent;
                            if let Some(ah) = self.auto_hide.get_mut(&id) {
                                ah.set_extent(item.extent.max(min));
                            }
                        }
                    }
                }
            }
        }

        // Widgets the document left out stay registered but hidden.
        let ids: Vec<WidgetId> = self.widgets.ids().collect();
        for id in ids {
            let Some(widget) = self.widgets.get_mut(id) else {
                continue;
            };
            if widget.area().is_none() {
                widget.set_closed(true);
                if assigned.contains(&id) {
                    self.emit(DockEvent::WidgetUnassigned(id));
                }
            }
        }

        self.finish_mutation();
        self.emit(DockEvent::LayoutRestored);
        tracing::info!(
            "Restored layout with {} areas in {} containers",
            self.areas.len(),
            self.containers.len()
        );
        Ok(())
    }

    /// Serialize the current layout to JSON.
    pub fn save_json(&self, user_version: u32) -> Result<String, RestoreError> {
        self.save_state(user_version).to_json()
    }

    pub fn restore_json(&mut self, json: &str, user_version: u32) -> Result<(), RestoreError> {
        let document = LayoutDocument::from_json(json)?;
        self.restore_state(&document, user_version)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>, user_version: u32) -> Result<(), RestoreError> {
        let path = path.as_ref();
        std::fs::write(path, self.save_json(user_version)?)?;
        tracing::info!("Saved layout to {}", path.display());
        Ok(())
    }

    pub fn restore_from_file(&mut self, path: impl AsRef<Path>, user_version: u32) -> Result<(), RestoreError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        self.restore_json(&json, user_version)
    }

    fn check_document(&self, document: &LayoutDocument, user_version: u32) -> Result<(), RestoreError> {
        if document.format_version != LAYOUT_FORMAT_VERSION {
            return Err(RestoreError::VersionMismatch {
                found: document.format_version,
                expected: LAYOUT_FORMAT_VERSION,
            });
        }
        if document.user_version != user_version {
            return Err(RestoreError::UserVersionMismatch {
                found: document.user_version,
                expected: user_version,
            });
        }
        document.validate()
    }

    fn save_container(&self, container: ContainerId, geometry: Option<Rect>) -> ContainerState {
        let Some(c) = self.containers.get(&container) else {
            return ContainerState {
                floating: geometry.is_some(),
                geometry,
                root: None,
                side_bars: Vec::new(),
            };
        };

        let root = c.layout.root().and_then(|root| self.save_node(&c.layout, root));
        let side_bars = if c.is_floating() {
            Vec::new()
        } else {
            SideBarLocation::ALL
                .iter()
                .filter_map(|location| {
                    let items: Vec<PinnedState> = c
                        .side_bar(*location)
                        .items()
                        .iter()
                        .filter_map(|id| self.save_pinned(*id))
                        .collect();
                    (!items.is_empty()).then_some(SideBarState {
                        location: *location,
                        items,
                    })
                })
                .collect()
        };

        ContainerState {
            floating: c.is_floating(),
            geometry,
            root,
            side_bars,
        }
    }

    fn save_node(&self, layout: &LayoutTree, id: NodeId) -> Option<NodeState> {
        match layout.node(id)?.kind() {
            NodeKind::Splitter(splitter) => {
                let (children, sizes): (Vec<NodeState>, Vec<f32>) = splitter
                    .children
                    .iter()
                    .zip(&splitter.sizes)
                    .filter_map(|(child, size)| Some((self.save_node(layout, *child)?, *size)))
                    .unzip();
                if children.is_empty() {
                    return None;
                }
                Some(NodeState::Splitter {
                    orientation: splitter.orientation,
                    count: children.len(),
                    sizes: format_sizes(&sizes),
                    children,
                })
            }
            NodeKind::Area(area) => self.save_area(*area).map(NodeState::Area),
        }
    }

    fn save_area(&self, area: AreaId) -> Option<AreaState> {
        let a = self.areas.get(&area)?;
        let tabs: Vec<TabState> = a
            .widgets()
            .iter()
            .filter_map(|id| self.widgets.get(*id))
            .map(|w| TabState {
                name: w.name().to_string(),
                closed: w.is_closed(),
            })
            .collect();
        let current = a
            .current()
            .and_then(|id| self.widgets.get(id))
            .map(|w| w.name().to_string());
        Some(AreaState {
            tab_count: tabs.len(),
            current,
            tabs,
        })
    }

    fn save_pinned(&self, id: AutoHideId) -> Option<PinnedState> {
        let ah = self.auto_hide.get(&id)?;
        Some(PinnedState {
            extent: ah.extent(),
            area: self.save_area(ah.area())?,
        })
    }

    /// Drop every area, overlay and floating window without reporting the
    /// widgets as unassigned; most of them come straight back.
    fn clear_layout(&mut self) {
        let areas: Vec<AreaId> = self.areas.keys().copied().collect();
        for id in areas {
            if let Some(mut area) = self.areas.shift_remove(&id) {
                area.take_widgets(&mut self.widgets);
                self.emit(DockEvent::AreaRemoved(id));
            }
        }

        let overlays: Vec<AutoHideId> = self.auto_hide.keys().copied().collect();
        for id in overlays {
            self.remove_auto_hide_container(id);
        }

        let floating: Vec<FloatingId> = self.floating.keys().copied().collect();
        for id in floating {
            self.destroy_floating(id);
        }

        if let Some(main) = self.containers.get_mut(&self.main) {
            main.layout = LayoutTree::new();
            main.set_last_added_area(None);
        }
    }

    fn restore_tree(&mut self, container: ContainerId, root: Option<&NodeState>) {
        let Some(node) = root.and_then(|root| self.restore_node(container, root)) else {
            return;
        };
        let last = node.areas().last().copied();
        if let Some(c) = self.containers.get_mut(&container) {
            c.layout.set_root(node);
            c.set_last_added_area(last);
        }
    }

    fn restore_node(&mut self, container: ContainerId, state: &NodeState) -> Option<DetachedNode> {
        match state {
            NodeState::Splitter {
                orientation,
                sizes,
                children,
                ..
            } => {
                let sizes = parse_sizes(sizes).unwrap_or_default();
                let mut kept_children = Vec::with_capacity(children.len());
                let mut kept_sizes = Vec::with_capacity(children.len());
                for (child, size) in children.iter().zip(sizes) {
                    if let Some(node) = self.restore_node(container, child) {
                        kept_children.push(node);
                        kept_sizes.push(size);
                    }
                }
                DetachedNode::Splitter {
                    orientation: *orientation,
                    sizes: kept_sizes,
                    children: kept_children,
                }
                .normalized()
            }
            NodeState::Area(area) => self.restore_area(container, area).map(DetachedNode::Area),
        }
    }

    /// Build an area from its saved tabs. Returns `None` when none of the
    /// names is registered.
    fn restore_area(&mut self, container: ContainerId, state: &AreaState) -> Option<AreaId> {
        let mut tabs = Vec::with_capacity(state.tabs.len());
        for tab in &state.tabs {
            match self.widgets.find(&tab.name) {
                Some(id) => tabs.push((id, tab.closed)),
                None => {
                    tracing::warn!("Layout names unknown widget '{}'", tab.name);
                    self.emit(DockEvent::UnknownWidgetInLayout(tab.name.clone()));
                }
            }
        }
        if tabs.is_empty() {
            return None;
        }

        let area_id = self.create_area(container);
        let current = state.current.as_deref().and_then(|name| self.widgets.find(name));
        let area = self.areas.get_mut(&area_id)?;
        for (index, (widget, closed)) in tabs.into_iter().enumerate() {
            if let Some(w) = self.widgets.get_mut(widget) {
                w.set_closed(closed);
            }
            area.insert_widget(index, widget, false, &mut self.widgets);
        }
        if let Some(current) = current.filter(|id| area.contains(*id)) {
            area.set_current_widget(Some(current));
        }
        Some(area_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DockZone;
    use crate::widget::DockWidgetFeatures;

    const NAMES: [&str; 5] = ["editor", "console", "outline", "files", "search"];

    fn register_all(system: &mut DockingSystem) -> Vec<WidgetId> {
        NAMES
            .iter()
            .map(|name| system.register_widget(*name, DockWidgetFeatures::DEFAULT).unwrap())
            .collect()
    }

    /// editor+console tabbed, outline on the right, files below outline,
    /// console closed, search pinned to the bottom.
    fn sample() -> (DockingSystem, Vec<WidgetId>) {
        let mut system = DockingSystem::default();
        let ids = register_all(&mut system);
        let main_area = system.add_widget(ids[0], DockZone::Center, None, None).unwrap();
        system.add_widget(ids[1], DockZone::Center, Some(main_area), None).unwrap();
        let outline = system.add_widget(ids[2], DockZone::Right, Some(main_area), None).unwrap();
        system.add_widget(ids[3], DockZone::Bottom, Some(outline), None).unwrap();
        system.close_widget(ids[1]).unwrap();
        system.add_widget(ids[4], DockZone::Left, None, None).unwrap();
        system.pin_widget(ids[4], Some(SideBarLocation::Bottom)).unwrap();
        (system, ids)
    }

    fn without_sizes(node: &NodeState) -> NodeState {
        match node {
            NodeState::Splitter {
                orientation,
                count,
                children,
                ..
            } => NodeState::Splitter {
                orientation: *orientation,
                count: *count,
                sizes: String::new(),
                children: children.iter().map(without_sizes).collect(),
            },
            NodeState::Area(area) => NodeState::Area(area.clone()),
        }
    }

    fn shape(document: &LayoutDocument) -> Vec<(bool, Option<NodeState>, Vec<SideBarState>)> {
        document
            .containers
            .iter()
            .map(|c| (c.floating, c.root.as_ref().map(without_sizes), c.side_bars.clone()))
            .collect()
    }

    #[test]
    fn test_save_captures_tree() {
        let (system, _) = sample();
        let document = system.save_state(0);
        assert_eq!(document.containers.len(), 1);
        let main = &document.containers[0];
        assert!(!main.floating);

        let Some(NodeState::Splitter {
            orientation,
            count,
            sizes,
            children,
        }) = &main.root
        else {
            panic!("expected a splitter root");
        };
        assert_eq!(*orientation, Orientation::Horizontal);
        assert_eq!(*count, 2);
        assert_eq!(parse_sizes(sizes).unwrap().len(), 2);

        let NodeState::Area(first) = &children[0] else {
            panic!("expected an area");
        };
        assert_eq!(first.tab_count, 2);
        assert_eq!(first.current.as_deref(), Some("editor"));
        assert!(first.tabs[1].closed);

        assert_eq!(main.side_bars.len(), 1);
        assert_eq!(main.side_bars[0].location, SideBarLocation::Bottom);
        assert_eq!(main.side_bars[0].items[0].area.tabs[0].name, "search");
    }

    #[test]
    fn test_round_trip_into_fresh_system() {
        let (system, _) = sample();
        let document = system.save_state(3);

        let mut restored = DockingSystem::default();
        register_all(&mut restored);
        restored.restore_state(&document, 3).unwrap();
        restored.check_invariants().unwrap();

        assert_eq!(shape(&restored.save_state(3)), shape(&document));
    }

    #[test]
    fn test_round_trip_through_json() {
        let (mut system, ids) = sample();
        let json = system.save_json(0).unwrap();
        let before = shape(&system.save_state(0));

        system.add_widget(ids[0], DockZone::Top, None, None).unwrap();
        system.restore_json(&json, 0).unwrap();
        assert_eq!(shape(&system.save_state(0)), before);
    }

    #[test]
    fn test_version_mismatch_changes_nothing() {
        let (mut system, _) = sample();
        let mut document = system.save_state(0);
        document.format_version = LAYOUT_FORMAT_VERSION + 1;
        system.drain_events();
        let before = system.save_state(0);

        let result = system.restore_state(&document, 0);
        assert!(matches!(result, Err(RestoreError::VersionMismatch { .. })));
        assert_eq!(system.save_state(0), before);
        assert!(system.drain_events().is_empty());
    }

    #[test]
    fn test_user_version_mismatch() {
        let (mut system, _) = sample();
        let document = system.save_state(1);
        assert!(matches!(
            system.restore_state(&document, 2),
            Err(RestoreError::UserVersionMismatch { found: 1, expected: 2 })
        ));
    }

    #[test]
    fn test_size_count_mismatch_is_rejected() {
        let (mut system, _) = sample();
        let mut document = system.save_state(0);
        if let Some(NodeState::Splitter { sizes, .. }) = &mut document.containers[0].root {
            *sizes = "100".to_string();
        }
        let before = system.save_state(0);
        assert!(matches!(
            system.restore_state(&document, 0),
            Err(RestoreError::SizeCountMismatch { sizes: 1, children: 2 })
        ));
        assert_eq!(system.save_state(0), before);
    }

    #[test]
    fn test_invalid_documents() {
        let area = |names: &[&str]| AreaState {
            tab_count: names.len(),
            current: None,
            tabs: names
                .iter()
                .map(|n| TabState {
                    name: n.to_string(),
                    closed: false,
                })
                .collect(),
        };
        let main = |root| ContainerState {
            floating: false,
            geometry: None,
            root: Some(root),
            side_bars: Vec::new(),
        };
        let document = |containers| LayoutDocument {
            format_version: LAYOUT_FORMAT_VERSION,
            user_version: 0,
            containers,
        };

        let duplicate = document(vec![main(NodeState::Splitter {
            orientation: Orientation::Vertical,
            count: 2,
            sizes: "1 1".into(),
            children: vec![NodeState::Area(area(&["a"])), NodeState::Area(area(&["a"]))],
        })]);
        assert!(matches!(duplicate.validate(), Err(RestoreError::DuplicateWidget(_))));

        let bad_count = document(vec![main(NodeState::Splitter {
            orientation: Orientation::Vertical,
            count: 3,
            sizes: "1 1".into(),
            children: vec![NodeState::Area(area(&["a"])), NodeState::Area(area(&["b"]))],
        })]);
        assert!(matches!(
            bad_count.validate(),
            Err(RestoreError::ChildCountMismatch { declared: 3, actual: 2 })
        ));

        let bad_size = document(vec![main(NodeState::Splitter {
            orientation: Orientation::Vertical,
            count: 2,
            sizes: "1 wide".into(),
            children: vec![NodeState::Area(area(&["a"])), NodeState::Area(area(&["b"]))],
        })]);
        assert!(matches!(bad_size.validate(), Err(RestoreError::InvalidSize(_))));

        let mut bad_tabs = area(&["a"]);
        bad_tabs.tab_count = 2;
        assert!(matches!(
            document(vec![main(NodeState::Area(bad_tabs))]).validate(),
            Err(RestoreError::TabCountMismatch { declared: 2, actual: 1 })
        ));

        assert!(matches!(
            document(Vec::new()).validate(),
            Err(RestoreError::MissingMainContainer)
        ));
        assert!(matches!(
            document(vec![main(NodeState::Area(area(&["a"]))), main(NodeState::Area(area(&["b"])))]).validate(),
            Err(RestoreError::MultipleMainContainers)
        ));
    }

    #[test]
    fn test_missing_closed_attribute_fails_to_parse() {
        let json = r#"{
            "format_version": 1,
            "containers": [{
                "floating": false,
                "root": { "type": "area", "tab_count": 1, "tabs": [{ "name": "editor" }] }
            }]
        }"#;
        assert!(matches!(LayoutDocument::from_json(json), Err(RestoreError::Parse(_))));
    }

    #[test]
    fn test_unknown_names_are_skipped() {
        let mut system = DockingSystem::default();
        let editor = system.register_widget("editor", DockWidgetFeatures::DEFAULT).unwrap();
        let json = r#"{
            "format_version": 1,
            "containers": [{
                "floating": false,
                "root": {
                    "type": "splitter", "orientation": "horizontal", "count": 2, "sizes": "300 300",
                    "children": [
                        { "type": "area", "tab_count": 1, "tabs": [{ "name": "editor", "closed": false }] },
                        { "type": "area", "tab_count": 1, "tabs": [{ "name": "ghost", "closed": false }] }
                    ]
                }
            }]
        }"#;
        system.restore_json(json, 0).unwrap();

        let area = system.widget_area(editor).unwrap();
        assert_eq!(system.container(system.main_container()).unwrap().layout().area_count(), 1);
        assert_eq!(system.area(area).unwrap().current(), Some(editor));
        assert!(
            system
                .drain_events()
                .contains(&DockEvent::UnknownWidgetInLayout("ghost".to_string()))
        );
    }

    #[test]
    fn test_absent_widgets_become_unassigned() {
        let (mut system, ids) = sample();
        let mut other = DockingSystem::default();
        let only = other.register_widget("outline", DockWidgetFeatures::DEFAULT).unwrap();
        other.add_widget(only, DockZone::Center, None, None).unwrap();
        let document = other.save_state(0);

        system.drain_events();
        system.restore_state(&document, 0).unwrap();

        let editor = system.widget(ids[0]).unwrap();
        assert!(editor.is_unassigned());
        assert!(editor.is_closed());
        assert!(system.widget_area(ids[2]).is_some());
        assert!(system.auto_hide_containers().next().is_none());

        let events = system.drain_events();
        assert!(events.contains(&DockEvent::WidgetUnassigned(ids[0])));
        assert!(!events.contains(&DockEvent::WidgetUnassigned(ids[2])));
        assert!(events.contains(&DockEvent::VisibilityChanged {
            widget: ids[0],
            visible: false
        }));
        assert_eq!(events.last(), Some(&DockEvent::LayoutRestored));
    }

    #[test]
    fn test_floating_geometry_and_pinned_extent_survive() {
        let (mut system, ids) = sample();
        let frame = Rect::new(50.0, 60.0, 320.0, 240.0);
        system.float_widget(ids[3], Some(frame)).unwrap();
        let pinned = system.auto_hide_containers().next().unwrap().id();
        system.set_auto_hide_extent(pinned, 180.0).unwrap();
        let document = system.save_state(0);

        let mut restored = DockingSystem::default();
        register_all(&mut restored);
        restored.restore_state(&document, 0).unwrap();

        let floating = restored.floating_containers().next().unwrap();
        assert_eq!(floating.geometry(), frame);
        assert!(restored.is_widget_floating(ids[3]));

        let ah = restored.auto_hide_containers().next().unwrap();
        assert_eq!(ah.location(), SideBarLocation::Bottom);
        assert_eq!(ah.extent(), 180.0);
        assert_eq!(restored.area(ah.area()).unwrap().widgets(), &[ids[4]]);
    }

    #[test]
    fn test_file_round_trip() {
        let (system, _) = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        system.save_to_file(&path, 0).unwrap();

        let mut restored = DockingSystem::default();
        register_all(&mut restored);
        restored.restore_from_file(&path, 0).unwrap();
        assert_eq!(shape(&restored.save_state(0)), shape(&system.save_state(0)));

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            restored.restore_from_file(&missing, 0),
            Err(RestoreError::Io(_))
        ));
    }
}
