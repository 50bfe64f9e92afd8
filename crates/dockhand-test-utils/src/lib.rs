//! Test utilities for the dockhand docking engine.
//!
//! - [`RecordingListener`] - a [`DockListener`](dockhand::DockListener) that
//!   keeps every event it sees, shareable between the system and the test
//! - [`fixtures`] - canned layouts built through the public API
//! - [`assertions`] - structural checks on layout trees
//!
//! # Example
//!
//! ```rust
//! use dockhand_test_utils::{RecordingListener, fixtures};
//!
//! let recorder = RecordingListener::new();
//! let mut layout = fixtures::tabbed(&["editor", "console"]);
//! layout.system.add_listener(recorder.clone());
//!
//! layout.system.close_widget(layout.widgets[0]).unwrap();
//! assert!(recorder.count_visibility_changes() > 0);
//! ```

pub mod assertions;
pub mod fixtures;
pub mod recording;

pub use assertions::{assert_layout_invariants, assert_normalized, layout_shape};
pub use fixtures::Fixture;
pub use recording::RecordingListener;
