//! Dockhand - a docking layout engine
//!
//! Arranges named dock widgets into tab groups, split regions, floating
//! windows and collapsible side-bar overlays:
//! - Layout trees of splitters and dock areas, normalized after every change
//! - Drag and drop re-docking with geometric drop-zone hit testing
//! - Floating containers with z-order
//! - Auto-hide side bars with hover and collapse timing
//! - Versioned save and restore, plus named perspectives
//!
//! The engine draws nothing. The host feeds it pointer input and geometry,
//! reads back rectangles, and listens for [`DockEvent`]s.
//!
//! ## Quick Start
//!
//! ```rust
//! use dockhand::{DockWidgetFeatures, DockZone, DockingSystem};
//!
//! let mut docking = DockingSystem::default();
//! let editor = docking.register_widget("editor", DockWidgetFeatures::DEFAULT).unwrap();
//! let console = docking.register_widget("console", DockWidgetFeatures::DEFAULT).unwrap();
//!
//! let area = docking.add_widget(editor, DockZone::Center, None, None).unwrap();
//! docking.add_widget(console, DockZone::Bottom, Some(area), None).unwrap();
//!
//! let saved = docking.save_state(0);
//! docking.restore_state(&saved, 0).unwrap();
//! ```

pub mod area;
pub mod auto_hide;
pub mod config;
pub mod container;
pub mod drag;
pub mod drop_zone;
pub mod error;
pub mod events;
pub mod floating;
pub mod focus;
pub mod layout;
pub mod persistence;
pub mod perspectives;
pub mod system;
pub mod tabs;
pub mod types;
pub mod widget;

pub use dockhand_core::{Rect, Size, Vec2};

pub use area::DockArea;
pub use auto_hide::{AutoHideContainer, AutoHideState, SideBar};
pub use config::{AutoHideConfig, DockingConfig};
pub use container::DockContainer;
pub use drag::{DragController, DragPhase, DragSource, DropOutcome, PressTarget};
pub use drop_zone::{DropOverlay, DropTarget, DropZoneDetector};
pub use error::{DockError, DockResult, RestoreError};
pub use events::{DockEvent, DockListener};
pub use floating::FloatingContainer;
pub use focus::FocusTracker;
pub use layout::{DetachedNode, LayoutNode, LayoutTree, NodeKind, Splitter};
pub use persistence::{LAYOUT_FORMAT_VERSION, LayoutDocument};
pub use perspectives::PerspectiveStore;
pub use system::DockingSystem;
pub use tabs::estimate_tab_width;
pub use types::{
    AreaId, AutoHideId, ContainerId, DockZone, DockZones, FloatingId, NodeId, Orientation,
    SideBarLocation, WidgetId,
};
pub use widget::{DockWidget, DockWidgetFeatures, WidgetRegistry};
