//! Dock widgets and the name-keyed widget registry.

use bitflags::bitflags;
use dockhand_core::Size;
use dockhand_core::alloc::HashMap;
use indexmap::IndexMap;

use crate::error::{DockError, DockResult};
use crate::types::{AreaId, WidgetId};

bitflags! {
    /// Capabilities of a dock widget.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DockWidgetFeatures: u16 {
        /// The user may close the widget.
        const CLOSABLE = 1 << 0;
        /// The widget may be dragged to another position.
        const MOVABLE = 1 << 1;
        /// The widget may live in a floating window.
        const FLOATABLE = 1 << 2;
        /// The widget may be pinned to a side bar.
        const PINNABLE = 1 << 3;
        /// Closing the widget unregisters and drops it.
        const DELETE_ON_CLOSE = 1 << 4;
        /// The widget never shows a tab.
        const NO_TAB = 1 << 5;
        /// Closing the hosting area closes this widget even if it is not closable.
        const FORCE_CLOSE_WITH_AREA = 1 << 6;

        const DEFAULT = Self::CLOSABLE.bits()
            | Self::MOVABLE.bits()
            | Self::FLOATABLE.bits()
            | Self::PINNABLE.bits();
    }
}

impl Default for DockWidgetFeatures {
    fn default() -> Self {
        DockWidgetFeatures::DEFAULT
    }
}

/// A named panel managed by the docking engine.
///
/// The engine never owns the panel's content; the application maps the
/// widget name to whatever it renders.
#[derive(Debug, Clone)]
pub struct DockWidget {
    id: WidgetId,
    name: String,
    /// Human readable tab label.
    pub title: String,
    features: DockWidgetFeatures,
    closed: bool,
    area: Option<AreaId>,
    /// Minimum size hint supplied by the application.
    pub min_size: Size,
}

impl DockWidget {
    fn new(id: WidgetId, name: String, features: DockWidgetFeatures) -> Self {
        Self {
            id,
            title: name.clone(),
            name,
            features,
            closed: false,
            area: None,
            min_size: Size::new(50.0, 50.0),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Unique registry key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Features as registered, before any global lock is applied.
    pub fn features(&self) -> DockWidgetFeatures {
        self.features
    }

    pub fn has_feature(&self, feature: DockWidgetFeatures) -> bool {
        self.features.contains(feature)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Area hosting this widget, `None` while unassigned.
    pub fn area(&self) -> Option<AreaId> {
        self.area
    }

    pub fn is_unassigned(&self) -> bool {
        self.area.is_none()
    }

    /// True when the widget takes part in tab bars.
    pub fn shows_tab(&self) -> bool {
        !self.features.contains(DockWidgetFeatures::NO_TAB)
    }

    pub(crate) fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub(crate) fn set_area(&mut self, area: Option<AreaId>) {
        self.area = area;
    }

    pub(crate) fn set_features(&mut self, features: DockWidgetFeatures) {
        self.features = features;
    }
}

/// All registered widgets, in registration order, addressable by name.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    widgets: IndexMap<WidgetId, DockWidget>,
    names: HashMap<String, WidgetId>,
    next_id: u64,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new widget under a unique name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        features: DockWidgetFeatures,
    ) -> DockResult<WidgetId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(DockError::DuplicateWidgetName(name));
        }

        self.next_id += 1;
        let id = WidgetId(self.next_id);
        self.names.insert(name.clone(), id);
        self.widgets.insert(id, DockWidget::new(id, name, features));
        Ok(id)
    }

    /// Remove a widget from the registry.
    pub fn remove(&mut self, id: WidgetId) -> Option<DockWidget> {
        let widget = self.widgets.shift_remove(&id)?;
        self.names.remove(&widget.name);
        Some(widget)
    }

    pub fn get(&self, id: WidgetId) -> Option<&DockWidget> {
        self.widgets.get(&id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut DockWidget> {
        self.widgets.get_mut(&id)
    }

    /// Look up a widget, failing with [`DockError::WidgetNotFound`].
    pub fn try_get(&self, id: WidgetId) -> DockResult<&DockWidget> {
        self.widgets.get(&id).ok_or(DockError::WidgetNotFound(id))
    }

    pub fn find(&self, name: &str) -> Option<WidgetId> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(&id)
    }

    /// True when the widget exists and is not closed.
    pub fn is_open(&self, id: WidgetId) -> bool {
        self.widgets.get(&id).is_some_and(|w| !w.closed)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Widgets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &DockWidget> {
        self.widgets.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.widgets.keys().copied()
    }
}
