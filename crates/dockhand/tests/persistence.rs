//! Save/restore laws.

use dockhand::{DockEvent, DockZone, LAYOUT_FORMAT_VERSION, RestoreError, SideBarLocation};
use dockhand_test_utils::{RecordingListener, assert_layout_invariants, fixtures, layout_shape};

#[test]
fn restore_reproduces_saved_tree() {
    let _ = dockhand_core::logging::try_init_for_tests();
    let mut fixture = fixtures::ide();
    let main = fixture.system.main_container();
    let console = fixture.widget("console");
    fixture.system.close_widget(console).unwrap();
    let shape = layout_shape(&fixture.system, main);
    let json = fixture.system.save_json(0).unwrap();

    let mut fresh = fixtures::registered(&["editor", "console", "outline", "files"]);
    fresh.system.restore_json(&json, 0).unwrap();
    let fresh_main = fresh.system.main_container();
    assert_eq!(layout_shape(&fresh.system, fresh_main), shape);
    assert!(fresh.system.widget(fresh.widget("console")).unwrap().is_closed());
    assert_layout_invariants(&fresh.system);
}

#[test]
fn restore_over_changed_layout() {
    let mut fixture = fixtures::ide();
    let main = fixture.system.main_container();
    let saved = fixture.system.save_state(5);
    let shape = layout_shape(&fixture.system, main);

    let outline = fixture.widget("outline");
    let files = fixture.widget("files");
    fixture.system.float_widget(outline, None).unwrap();
    fixture.system.pin_widget(files, Some(SideBarLocation::Left)).unwrap();

    fixture.system.restore_state(&saved, 5).unwrap();
    assert_eq!(layout_shape(&fixture.system, main), shape);
    assert_eq!(fixture.system.floating_containers().count(), 0);
    assert_eq!(fixture.system.auto_hide_containers().count(), 0);
    assert_layout_invariants(&fixture.system);
}

#[test]
fn version_mismatch_is_idempotent() {
    let mut fixture = fixtures::ide();
    let recorder = RecordingListener::new();
    fixture.system.add_listener(recorder.clone());

    let mut document = fixture.system.save_state(0);
    document.format_version = LAYOUT_FORMAT_VERSION + 1;
    let before = fixture.system.save_json(0).unwrap();

    let result = fixture.system.restore_state(&document, 0);
    assert!(matches!(result, Err(RestoreError::VersionMismatch { .. })));
    assert_eq!(fixture.system.save_json(0).unwrap(), before);
    assert!(recorder.is_empty());
}

#[test]
fn widgets_missing_from_document_are_unassigned() {
    let saved = fixtures::tabbed(&["editor"]).system.save_state(0);

    let mut fixture = fixtures::side_by_side(&["editor", "console"]);
    let recorder = RecordingListener::new();
    fixture.system.add_listener(recorder.clone());
    fixture.system.restore_state(&saved, 0).unwrap();

    let console = fixture.widget("console");
    assert!(fixture.system.widget(console).unwrap().is_unassigned());
    assert!(recorder.contains(&DockEvent::WidgetUnassigned(console)));
    assert_eq!(recorder.last_visibility(console), Some(false));
    assert!(recorder.contains(&DockEvent::LayoutRestored));
}

#[test]
fn floating_windows_round_trip() {
    let mut fixture = fixtures::side_by_side(&["a", "b", "c"]);
    let b = fixture.widget("b");
    let c = fixture.widget("c");
    let floating = fixture.system.float_widget(b, None).unwrap();
    let b_area = fixture.area_of("b");
    fixture.system.add_widget(c, DockZone::Bottom, Some(b_area), None).unwrap();
    let geometry = fixture.system.floating(floating).unwrap().geometry();
    let saved = fixture.system.save_state(0);

    let mut fresh = fixtures::registered(&["a", "b", "c"]);
    fresh.system.restore_state(&saved, 0).unwrap();
    let restored = fresh.system.floating_containers().next().unwrap();
    assert_eq!(restored.geometry(), geometry);
    assert_eq!(
        layout_shape(&fresh.system, restored.container()),
        "V([*b] [*c])"
    );
    assert!(fresh.system.is_widget_floating(fresh.widget("c")));
}
