//! Dock areas: ordered tab groups of dock widgets.

use dockhand_core::Rect;

use crate::types::{AreaId, AutoHideId, ContainerId, DockZones, WidgetId};
use crate::widget::{DockWidgetFeatures, WidgetRegistry};

/// A tab group inside a container's layout tree or an auto-hide overlay.
///
/// The backing list keeps closed widgets in place so they return to their
/// old tab position when reopened. The tab bar shows [`open_widgets`].
///
/// [`open_widgets`]: DockArea::open_widgets
#[derive(Debug, Clone)]
pub struct DockArea {
    id: AreaId,
    container: ContainerId,
    widgets: Vec<WidgetId>,
    current: Option<WidgetId>,
    /// Zones this area accepts as a drop target.
    pub allowed_areas: DockZones,
    auto_hide: Option<AutoHideId>,
    focused: bool,
    rect: Rect,
}

impl DockArea {
    pub(crate) fn new(id: AreaId, container: ContainerId) -> Self {
        Self {
            id,
            container,
            widgets: Vec::new(),
            current: None,
            allowed_areas: DockZones::ALL,
            auto_hide: None,
            focused: false,
            rect: Rect::ZERO,
        }
    }

    pub fn id(&self) -> AreaId {
        self.id
    }

    /// Container whose layout (or side bar) hosts this area.
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// Every widget of the area in tab order, including closed ones.
    pub fn widgets(&self) -> &[WidgetId] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn contains(&self, widget: WidgetId) -> bool {
        self.widgets.contains(&widget)
    }

    pub fn index_of(&self, widget: WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| *w == widget)
    }

    pub fn current(&self) -> Option<WidgetId> {
        self.current
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current.and_then(|current| self.index_of(current))
    }

    /// Auto-hide overlay wrapping this area, if it is pinned.
    pub fn auto_hide(&self) -> Option<AutoHideId> {
        self.auto_hide
    }

    pub fn is_auto_hide(&self) -> bool {
        self.auto_hide.is_some()
    }

    /// Whether this area holds the focused widget.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Rectangle assigned by the last relayout.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Open widgets in tab order.
    pub fn open_widgets(&self, registry: &WidgetRegistry) -> Vec<WidgetId> {
        self.widgets
            .iter()
            .copied()
            .filter(|w| registry.is_open(*w))
            .collect()
    }

    /// Open widgets that draw a tab.
    pub fn tab_widgets(&self, registry: &WidgetRegistry) -> Vec<WidgetId> {
        self.widgets
            .iter()
            .copied()
            .filter(|w| {
                registry
                    .get(*w)
                    .is_some_and(|widget| !widget.is_closed() && widget.shows_tab())
            })
            .collect()
    }

    pub fn open_count(&self, registry: &WidgetRegistry) -> usize {
        self.widgets.iter().filter(|w| registry.is_open(**w)).count()
    }

    /// True while at least one widget is open.
    pub fn has_open_widgets(&self, registry: &WidgetRegistry) -> bool {
        self.widgets.iter().any(|w| registry.is_open(*w))
    }

    /// Features shared by every widget of the area.
    pub fn features(&self, registry: &WidgetRegistry) -> DockWidgetFeatures {
        self.widgets
            .iter()
            .filter_map(|w| registry.get(*w))
            .fold(DockWidgetFeatures::all(), |acc, widget| acc & widget.features())
    }

    /// Insert `widget` into the backing list at `index`.
    ///
    /// With `activate` the widget becomes current and is reopened. Without
    /// it, the widget only becomes current when nothing else is.
    ///
    /// # Panics
    ///
    /// If `index > len()`.
    pub(crate) fn insert_widget(
        &mut self,
        index: usize,
        widget: WidgetId,
        activate: bool,
        registry: &mut WidgetRegistry,
    ) {
        assert!(
            index <= self.widgets.len(),
            "tab index {} out of range for {} with {} widgets",
            index,
            self.id,
            self.widgets.len()
        );
        debug_assert!(!self.widgets.contains(&widget));

        self.widgets.insert(index, widget);
        if let Some(w) = registry.get_mut(widget) {
            w.set_area(Some(self.id));
        }

        let current_open = self.current.is_some_and(|c| registry.is_open(c));
        if activate {
            self.make_current(widget, registry);
        } else if !current_open && registry.is_open(widget) {
            self.current = Some(widget);
        }
    }

    /// Remove `widget` from the backing list.
    ///
    /// Returns true while the area still has visible content.
    pub(crate) fn remove_widget(&mut self, widget: WidgetId, registry: &mut WidgetRegistry) -> bool {
        let Some(index) = self.index_of(widget) else {
            return self.has_open_widgets(registry);
        };

        self.widgets.remove(index);
        if let Some(w) = registry.get_mut(widget)
            && w.area() == Some(self.id)
        {
            w.set_area(None);
        }

        if self.current == Some(widget) {
            // The widget after the removed one now sits at `index`.
            self.current = self.next_current(index, None, registry);
        }
        self.has_open_widgets(registry)
    }

    /// Select the widget at backing index `index` and reopen it.
    ///
    /// Does nothing when that widget is already current and open.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    pub(crate) fn set_current_index(&mut self, index: usize, registry: &mut WidgetRegistry) {
        assert!(
            index < self.widgets.len(),
            "tab index {} out of range for {} with {} widgets",
            index,
            self.id,
            self.widgets.len()
        );
        let widget = self.widgets[index];
        if self.current == Some(widget) && registry.is_open(widget) {
            return;
        }
        self.make_current(widget, registry);
    }

    fn make_current(&mut self, widget: WidgetId, registry: &mut WidgetRegistry) {
        if let Some(w) = registry.get_mut(widget) {
            w.set_closed(false);
        }
        self.current = Some(widget);
    }

    /// Re-pick the current widget after `widget` was closed in place.
    pub(crate) fn widget_closed(&mut self, widget: WidgetId, registry: &WidgetRegistry) {
        if self.current != Some(widget) {
            return;
        }
        if let Some(index) = self.index_of(widget) {
            self.current = self.next_current(index + 1, Some(widget), registry);
        }
    }

    /// Choose the widget to show once the one at `start - 1` is gone.
    ///
    /// Searches forward from `start`, then backward, for an open widget with a
    /// tab. Falls back to any open widget, so a NO_TAB widget is only chosen
    /// when nothing else is open.
    fn next_current(
        &self,
        start: usize,
        skip: Option<WidgetId>,
        registry: &WidgetRegistry,
    ) -> Option<WidgetId> {
        let candidate = |w: &WidgetId| {
            Some(*w) != skip
                && registry
                    .get(*w)
                    .is_some_and(|widget| !widget.is_closed() && widget.shows_tab())
        };

        let start = start.min(self.widgets.len());
        self.widgets[start..]
            .iter()
            .find(|w| candidate(w))
            .or_else(|| self.widgets[..start].iter().rev().find(|w| candidate(w)))
            .or_else(|| {
                self.widgets
                    .iter()
                    .find(|w| Some(**w) != skip && registry.is_open(**w))
            })
            .copied()
    }

    /// Move the tab at `from` so it lands before tab `to`.
    ///
    /// Indices count drawn tabs only (see [`tab_widgets`](Self::tab_widgets));
    /// `to == tab count` moves the tab to the end. Other widgets keep their
    /// backing positions.
    pub(crate) fn move_tab(&mut self, from: usize, to: usize, registry: &WidgetRegistry) -> bool {
        let open = self.tab_widgets(registry);
        if from >= open.len() || to > open.len() || from == to || from + 1 == to {
            return false;
        }

        let widget = open[from];
        let anchor = open.get(to).copied();
        self.widgets.retain(|w| *w != widget);
        let index = match anchor {
            Some(anchor) => self.index_of(anchor).unwrap_or(self.widgets.len()),
            None => self.widgets.len(),
        };
        self.widgets.insert(index, widget);
        true
    }

    pub(crate) fn set_container(&mut self, container: ContainerId) {
        self.container = container;
    }

    pub(crate) fn set_auto_hide(&mut self, auto_hide: Option<AutoHideId>) {
        self.auto_hide = auto_hide;
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub(crate) fn set_current_widget(&mut self, widget: Option<WidgetId>) {
        self.current = widget;
    }

    /// Take every widget out of the area, leaving it empty.
    pub(crate) fn take_widgets(&mut self, registry: &mut WidgetRegistry) -> Vec<WidgetId> {
        self.current = None;
        let widgets = std::mem::take(&mut self.widgets);
        for widget in &widgets {
            if let Some(w) = registry.get_mut(*widget) {
                w.set_area(None);
            }
        }
        widgets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(names: &[&str]) -> (WidgetRegistry, DockArea, Vec<WidgetId>) {
        let mut registry = WidgetRegistry::new();
        let mut area = DockArea::new(AreaId(1), ContainerId(1));
        let mut ids = Vec::new();
        for name in names {
            let id = registry.register(*name, DockWidgetFeatures::DEFAULT).unwrap();
            area.insert_widget(area.len(), id, false, &mut registry);
            ids.push(id);
        }
        (registry, area, ids)
    }

    #[test]
    fn test_first_widget_becomes_current() {
        let (registry, area, ids) = setup(&["a", "b"]);
        assert_eq!(area.current(), Some(ids[0]));
        assert_eq!(registry.get(ids[1]).unwrap().area(), Some(AreaId(1)));
    }

    #[test]
    fn test_activate_reopens_widget() {
        let (mut registry, mut area, ids) = setup(&["a", "b"]);
        registry.get_mut(ids[1]).unwrap().set_closed(true);
        area.set_current_index(1, &mut registry);
        assert_eq!(area.current(), Some(ids[1]));
        assert!(registry.is_open(ids[1]));
    }

    #[test]
    fn test_remove_current_searches_forward_then_backward() {
        let (mut registry, mut area, ids) = setup(&["a", "b", "c"]);
        area.set_current_index(1, &mut registry);

        assert!(area.remove_widget(ids[1], &mut registry));
        assert_eq!(area.current(), Some(ids[2]));

        assert!(area.remove_widget(ids[2], &mut registry));
        assert_eq!(area.current(), Some(ids[0]));

        assert!(!area.remove_widget(ids[0], &mut registry));
        assert_eq!(area.current(), None);
        assert!(registry.get(ids[0]).unwrap().is_unassigned());
    }

    #[test]
    fn test_next_current_skips_no_tab() {
        let mut registry = WidgetRegistry::new();
        let mut area = DockArea::new(AreaId(1), ContainerId(1));
        let a = registry.register("a", DockWidgetFeatures::DEFAULT).unwrap();
        let hidden = registry
            .register("b", DockWidgetFeatures::DEFAULT | DockWidgetFeatures::NO_TAB)
            .unwrap();
        let c = registry.register("c", DockWidgetFeatures::DEFAULT).unwrap();
        for w in [a, hidden, c] {
            area.insert_widget(area.len(), w, false, &mut registry);
        }

        area.remove_widget(a, &mut registry);
        assert_eq!(area.current(), Some(c));

        area.remove_widget(c, &mut registry);
        assert_eq!(area.current(), Some(hidden));
    }

    #[test]
    fn test_close_keeps_backing_list() {
        let (mut registry, mut area, ids) = setup(&["w1", "w2"]);
        registry.get_mut(ids[0]).unwrap().set_closed(true);
        area.widget_closed(ids[0], &registry);

        assert_eq!(area.current(), Some(ids[1]));
        assert_eq!(area.open_widgets(&registry), vec![ids[1]]);
        assert_eq!(area.widgets(), &ids[..]);
    }

    #[test]
    fn test_move_tab_insertion_point() {
        let (registry, mut area, ids) = setup(&["a", "b", "c"]);

        // Moving to the slot right after itself changes nothing.
        assert!(!area.move_tab(0, 1, &registry));
        assert!(area.move_tab(0, 3, &registry));
        assert_eq!(area.widgets(), &[ids[1], ids[2], ids[0]]);
        assert!(area.move_tab(2, 0, &registry));
        assert_eq!(area.widgets(), &[ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn test_features_intersection() {
        let mut registry = WidgetRegistry::new();
        let mut area = DockArea::new(AreaId(1), ContainerId(1));
        let a = registry.register("a", DockWidgetFeatures::DEFAULT).unwrap();
        let b = registry
            .register("b", DockWidgetFeatures::MOVABLE | DockWidgetFeatures::CLOSABLE)
            .unwrap();
        area.insert_widget(0, a, false, &mut registry);
        area.insert_widget(1, b, false, &mut registry);

        assert_eq!(
            area.features(&registry),
            DockWidgetFeatures::MOVABLE | DockWidgetFeatures::CLOSABLE
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_insert_out_of_range_panics() {
        let (mut registry, mut area, _) = setup(&["a"]);
        let b = registry.register("b", DockWidgetFeatures::DEFAULT).unwrap();
        area.insert_widget(5, b, false, &mut registry);
    }
}
