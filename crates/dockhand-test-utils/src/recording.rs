//! Event recording for assertions.

use std::sync::Arc;

use dockhand::{DockEvent, DockListener, WidgetId};
use parking_lot::Mutex;

/// Records every [`DockEvent`] delivered to it.
///
/// Clones share one log, so keep a clone in the test and hand the other to
/// [`DockingSystem::add_listener`](dockhand::DockingSystem::add_listener).
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<DockEvent>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<DockEvent> {
        self.events.lock().clone()
    }

    /// Return and forget everything recorded so far.
    pub fn take(&self) -> Vec<DockEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn contains(&self, event: &DockEvent) -> bool {
        self.events.lock().contains(event)
    }

    pub fn count_visibility_changes(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, DockEvent::VisibilityChanged { .. }))
            .count()
    }

    /// Last visibility reported for `widget`, if any.
    pub fn last_visibility(&self, widget: WidgetId) -> Option<bool> {
        self.events.lock().iter().rev().find_map(|e| match e {
            DockEvent::VisibilityChanged { widget: w, visible } if *w == widget => Some(*visible),
            _ => None,
        })
    }

    /// `(old, new)` pairs of every focus change, in order.
    pub fn focus_changes(&self) -> Vec<(Option<WidgetId>, Option<WidgetId>)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                DockEvent::FocusChanged { old, new } => Some((*old, *new)),
                _ => None,
            })
            .collect()
    }
}

impl DockListener for RecordingListener {
    fn on_event(&mut self, event: &DockEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_log() {
        let recorder = RecordingListener::new();
        let mut handle = recorder.clone();
        handle.on_event(&DockEvent::LayoutRestored);
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.take(), vec![DockEvent::LayoutRestored]);
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_last_visibility() {
        let mut recorder = RecordingListener::new();
        let widget = WidgetId(7);
        recorder.on_event(&DockEvent::VisibilityChanged { widget, visible: true });
        recorder.on_event(&DockEvent::VisibilityChanged { widget, visible: false });
        assert_eq!(recorder.last_visibility(widget), Some(false));
        assert_eq!(recorder.last_visibility(WidgetId(8)), None);
        assert_eq!(recorder.count_visibility_changes(), 2);
    }
}
