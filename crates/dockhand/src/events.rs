//! Notifications emitted by the docking system.
//!
//! Every event is queued (see [`DockingSystem::drain_events`]) and also
//! delivered synchronously to registered [`DockListener`]s.
//!
//! [`DockingSystem::drain_events`]: crate::DockingSystem::drain_events

use crate::types::{AreaId, AutoHideId, FloatingId, WidgetId};

/// Something observable changed in the docking layout.
#[derive(Debug, Clone, PartialEq)]
pub enum DockEvent {
    /// A widget's content became visible or hidden.
    VisibilityChanged { widget: WidgetId, visible: bool },
    /// Keyboard focus moved between widgets.
    FocusChanged {
        old: Option<WidgetId>,
        new: Option<WidgetId>,
    },
    /// A widget moved into or out of a floating window.
    TopLevelChanged { widget: WidgetId, floating: bool },
    AreaCreated(AreaId),
    AreaRemoved(AreaId),
    FloatingCreated(FloatingId),
    FloatingDestroyed(FloatingId),
    AutoHideCreated(AutoHideId),
    AutoHideRemoved(AutoHideId),
    /// An auto-hide overlay expanded or collapsed.
    AutoHideStateChanged { id: AutoHideId, expanded: bool },
    /// A widget lost its area and is now hidden and detached.
    WidgetUnassigned(WidgetId),
    /// A widget was unregistered, or deleted on close.
    WidgetRemoved { widget: WidgetId, name: String },
    /// A restored layout named a widget that is not registered.
    UnknownWidgetInLayout(String),
    /// A saved layout was applied.
    LayoutRestored,
}

/// Observer of docking changes.
///
/// All methods have empty defaults; implement the ones you need. Override
/// [`on_event`](DockListener::on_event) to see every event.
pub trait DockListener {
    fn on_event(&mut self, event: &DockEvent) {
        match event {
            DockEvent::VisibilityChanged { widget, visible } => {
                self.on_visibility_changed(*widget, *visible)
            }
            DockEvent::FocusChanged { old, new } => self.on_focus_changed(*old, *new),
            DockEvent::TopLevelChanged { widget, floating } => {
                self.on_top_level_changed(*widget, *floating)
            }
            DockEvent::AreaCreated(area) => self.on_area_created(*area),
            _ => {}
        }
    }

    fn on_visibility_changed(&mut self, _widget: WidgetId, _visible: bool) {}

    fn on_focus_changed(&mut self, _old: Option<WidgetId>, _new: Option<WidgetId>) {}

    fn on_top_level_changed(&mut self, _widget: WidgetId, _floating: bool) {}

    fn on_area_created(&mut self, _area: AreaId) {}
}

/// Pending events plus the listeners they are fanned out to.
#[derive(Default)]
pub(crate) struct EventQueue {
    pending: Vec<DockEvent>,
    listeners: Vec<Box<dyn DockListener>>,
}

impl EventQueue {
    pub(crate) fn emit(&mut self, event: DockEvent) {
        tracing::trace!("Dock event: {:?}", event);
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
        self.pending.push(event);
    }

    pub(crate) fn add_listener(&mut self, listener: Box<dyn DockListener>) {
        self.listeners.push(listener);
    }

    pub(crate) fn drain(&mut self) -> Vec<DockEvent> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn pending(&self) -> &[DockEvent] {
        &self.pending
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.pending)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct VisibilityLog(Rc<RefCell<Vec<(WidgetId, bool)>>>);

    impl DockListener for VisibilityLog {
        fn on_visibility_changed(&mut self, widget: WidgetId, visible: bool) {
            self.0.borrow_mut().push((widget, visible));
        }
    }

    #[test]
    fn test_default_dispatch_reaches_specific_handler() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = EventQueue::default();
        queue.add_listener(Box::new(VisibilityLog(log.clone())));

        queue.emit(DockEvent::AreaCreated(AreaId(1)));
        queue.emit(DockEvent::VisibilityChanged {
            widget: WidgetId(4),
            visible: true,
        });

        assert_eq!(*log.borrow(), vec![(WidgetId(4), true)]);
        assert_eq!(queue.drain().len(), 2);
        assert!(queue.pending().is_empty());
    }
}
