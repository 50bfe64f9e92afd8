//! Focused dock widget bookkeeping.
//!
//! Focus is not persisted; the host feeds it from toolkit focus events via
//! [`DockingSystem::set_focused_widget`].

use crate::error::{DockError, DockResult};
use crate::events::DockEvent;
use crate::system::DockingSystem;
use crate::types::{AreaId, WidgetId};

/// Result of a focus update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FocusChange {
    pub old_widget: Option<WidgetId>,
    pub new_widget: Option<WidgetId>,
    pub old_area: Option<AreaId>,
    pub new_area: Option<AreaId>,
}

/// The focused widget and the area that carries the focus highlight.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusTracker {
    widget: Option<WidgetId>,
    area: Option<AreaId>,
}

impl FocusTracker {
    pub fn focused_widget(&self) -> Option<WidgetId> {
        self.widget
    }

    pub fn focused_area(&self) -> Option<AreaId> {
        self.area
    }

    /// Record a new focus target. `None` when nothing changed.
    pub(crate) fn update(&mut self, widget: Option<WidgetId>, area: Option<AreaId>) -> Option<FocusChange> {
        if self.widget == widget && self.area == area {
            return None;
        }
        let change = FocusChange {
            old_widget: self.widget,
            new_widget: widget,
            old_area: self.area,
            new_area: area,
        };
        self.widget = widget;
        self.area = area;
        Some(change)
    }
}

impl DockingSystem {
    pub fn focused_widget(&self) -> Option<WidgetId> {
        self.focus.focused_widget()
    }

    pub fn focused_area(&self) -> Option<AreaId> {
        self.focus.focused_area()
    }

    /// Focus a widget, making it current in its area. `None` clears focus.
    pub fn set_focused_widget(&mut self, widget: Option<WidgetId>) -> DockResult<()> {
        if let Some(widget) = widget {
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
        }
        self.apply_focus(widget);
        self.finish_mutation();
        Ok(())
    }

    /// Focus the current widget of an area.
    pub fn focus_area(&mut self, area: AreaId) -> DockResult<()> {
        let current = self.try_area(area)?.current();
        match current {
            Some(widget) => self.set_focused_widget(Some(widget)),
            None => Ok(()),
        }
    }

    /// Move focus to `widget` and its area, updating area highlight flags.
    pub(crate) fn apply_focus(&mut self, widget: Option<WidgetId>) {
        let area = widget.and_then(|w| self.widget_area(w));
        let Some(change) = self.focus.update(widget, area) else {
            return;
        };

        if change.old_area != change.new_area {
            if let Some(old) = change.old_area.and_then(|a| self.areas.get_mut(&a)) {
                old.set_focused(false);
            }
            if let Some(new) = change.new_area.and_then(|a| self.areas.get_mut(&a)) {
                new.set_focused(true);
            }
        }

        if change.old_widget != change.new_widget {
            tracing::debug!("Focus {:?} -> {:?}", change.old_widget, change.new_widget);
            self.emit(DockEvent::FocusChanged {
                old: change.old_widget,
                new: change.new_widget,
            });
        }
    }

    /// Drop focus from a widget that closed or left the layout, and follow a
    /// focused widget into its new area.
    pub(crate) fn sync_focus(&mut self) {
        let Some(widget) = self.focus.focused_widget() else {
            return;
        };
        let still_shown = self
            .widgets
            .get(widget)
            .is_some_and(|w| !w.is_closed() && w.area().is_some());
        if still_shown {
            self.apply_focus(Some(widget));
        } else {
            self.apply_focus(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DockZone;
    use crate::widget::DockWidgetFeatures;

    fn split(names: &[&str]) -> (DockingSystem, Vec<WidgetId>) {
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
    fn test_tracker_reports_changes_once() {
        let mut tracker = FocusTracker::default();
        let change = tracker.update(Some(WidgetId(1)), Some(AreaId(2))).unwrap();
        assert_eq!(change.old_widget, None);
        assert!(tracker.update(Some(WidgetId(1)), Some(AreaId(2))).is_none());
    }

    #[test]
    fn test_focus_moves_area_flag() {
        let (mut system, ids) = split(&["a", "b"]);
        let area_a = system.widget_area(ids[0]).unwrap();
        let area_b = system.widget_area(ids[1]).unwrap();
        system.drain_events();

        system.set_focused_widget(Some(ids[0])).unwrap();
        assert!(system.area(area_a).unwrap().is_focused());

        system.set_focused_widget(Some(ids[1])).unwrap();
        assert!(!system.area(area_a).unwrap().is_focused());
        assert!(system.area(area_b).unwrap().is_focused());
        assert_eq!(system.focused_area(), Some(area_b));

        let focus_events: Vec<_> = system
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, DockEvent::FocusChanged { .. }))
            .collect();
        assert_eq!(
            focus_events,
            vec![
                DockEvent::FocusChanged {
                    old: None,
                    new: Some(ids[0])
                },
                DockEvent::FocusChanged {
                    old: Some(ids[0]),
                    new: Some(ids[1])
                },
            ]
        );
    }

    #[test]
    fn test_focus_activates_tab() {
        let mut system = DockingSystem::default();
        let a = system.register_widget("a", DockWidgetFeatures::DEFAULT).unwrap();
        let b = system.register_widget("b", DockWidgetFeatures::DEFAULT).unwrap();
        let area = system.add_widget(a, DockZone::Center, None, None).unwrap();
        system.add_widget(b, DockZone::Center, Some(area), None).unwrap();

        system.set_focused_widget(Some(a)).unwrap();
        assert_eq!(system.area(area).unwrap().current(), Some(a));
    }

    #[test]
    fn test_closing_focused_widget_clears_focus() {
        let (mut system, ids) = split(&["a", "b"]);
        let area = system.widget_area(ids[0]).unwrap();
        system.set_focused_widget(Some(ids[0])).unwrap();
        system.close_widget(ids[0]).unwrap();
        assert_eq!(system.focused_widget(), None);
        assert!(!system.area(area).unwrap().is_focused());
    }

    #[test]
    fn test_focus_follows_widget_across_areas() {
        let (mut system, ids) = split(&["a", "b"]);
        let area_a = system.widget_area(ids[0]).unwrap();
        let area_b = system.widget_area(ids[1]).unwrap();
        system.set_focused_widget(Some(ids[0])).unwrap();

        system.add_widget(ids[0], DockZone::Center, Some(area_b), None).unwrap();
        assert!(system.area(area_a).is_none());
        assert_eq!(system.focused_area(), Some(area_b));
        assert!(system.area(area_b).unwrap().is_focused());
    }

    #[test]
    fn test_unassigned_widget_cannot_take_focus() {
        let mut system = DockingSystem::default();
        let w = system.register_widget("w", DockWidgetFeatures::DEFAULT).unwrap();
        assert_eq!(
            system.set_focused_widget(Some(w)),
            Err(DockError::WidgetUnassigned(w))
        );
    }
}
