//! End-to-end behaviour of the docking engine.

use dockhand::{
    DockEvent, DockZone, DragPhase, DragSource, PressTarget, SideBarLocation, Vec2,
};
use dockhand_test_utils::{RecordingListener, assert_layout_invariants, fixtures, layout_shape};

#[test]
fn closing_current_tab_selects_next() {
    let _ = dockhand_core::logging::try_init_for_tests();
    let mut fixture = fixtures::tabbed(&["w1", "w2"]);
    let area = fixture.area_of("w1");
    let (w1, w2) = (fixture.widget("w1"), fixture.widget("w2"));

    fixture.system.close_widget(w1).unwrap();

    let a = fixture.system.area(area).unwrap();
    assert_eq!(a.current(), Some(w2));
    assert_eq!(a.open_widgets(fixture.system.registry()), vec![w2]);
    let widget = fixture.system.widget(w1).unwrap();
    assert!(widget.is_closed());
    assert!(fixture.system.registry().contains(w1));
    assert!(!fixture.system.is_widget_visible(w1));
}

#[test]
fn pin_to_right_side_bar() {
    let mut fixture = fixtures::side_by_side(&["main", "tool"]);
    let main = fixture.system.main_container();
    let tool = fixture.widget("tool");
    let old_area = fixture.area_of("tool");

    let id = fixture.system.pin_widget(tool, Some(SideBarLocation::Right)).unwrap();

    let container = fixture.system.container(main).unwrap();
    assert_eq!(container.side_bar(SideBarLocation::Right).items(), &[id]);
    assert!(fixture.system.area(old_area).is_none());
    assert_eq!(layout_shape(&fixture.system, main), "[*main]");
    let ah = fixture.system.auto_hide_container(id).unwrap();
    assert_eq!(fixture.system.area(ah.area()).unwrap().widgets(), &[tool]);
    assert_layout_invariants(&fixture.system);
}

#[test]
fn floating_center_drop_tabifies_in_order() {
    let _ = dockhand_core::logging::try_init_for_tests();
    let mut fixture = fixtures::side_by_side(&["a", "b", "c"]);
    let (a, b, c) = (fixture.widget("a"), fixture.widget("b"), fixture.widget("c"));
    let floating = fixture.system.float_widget(b, None).unwrap();
    let b_area = fixture.area_of("b");
    fixture.system.add_widget(c, DockZone::Center, Some(b_area), None).unwrap();
    let target = fixture.area_of("a");

    let recorder = RecordingListener::new();
    fixture.system.add_listener(recorder.clone());
    let main = fixture.system.main_container();
    fixture
        .system
        .drop_floating(floating, main, DockZone::Center, Some(target))
        .unwrap();

    assert_eq!(fixture.system.area(target).unwrap().widgets(), &[a, b, c]);
    assert!(fixture.system.floating(floating).is_none());
    assert!(recorder.contains(&DockEvent::FloatingDestroyed(floating)));
    assert!(recorder.contains(&DockEvent::TopLevelChanged { widget: b, floating: false }));
    assert_layout_invariants(&fixture.system);
}

#[test]
fn single_tab_drag_goes_straight_to_floating() {
    let mut fixture = fixtures::side_by_side(&["a", "b"]);
    let a = fixture.widget("a");
    let area = fixture.area_of("a");
    let start = fixture.system.tab_rects(area)[0].1.center();

    fixture.system.press(PressTarget::Tab(a), start).unwrap();
    assert_eq!(fixture.system.drag_phase(), DragPhase::Pressed);
    fixture.system.pointer_moved(start + Vec2::new(1.0, 0.0));
    assert_eq!(fixture.system.drag_phase(), DragPhase::Pressed);

    fixture.system.pointer_moved(start + Vec2::new(20.0, 0.0));
    assert_eq!(fixture.system.drag_phase(), DragPhase::DraggingFloating);
    assert_eq!(fixture.system.drag().source(), Some(DragSource::Area(area)));
}

#[test]
fn press_at_finds_tabs() {
    let mut fixture = fixtures::tabbed(&["a", "b"]);
    let area = fixture.area_of("a");
    let b = fixture.widget("b");
    let point = fixture.system.tab_rects(area)[1].1.center();
    assert_eq!(fixture.system.press_at(point), Some(PressTarget::Tab(b)));
    assert!(fixture.system.cancel_drag());
}

#[test]
fn escape_restores_layout() {
    let mut fixture = fixtures::ide();
    let main = fixture.system.main_container();
    let shape = layout_shape(&fixture.system, main);
    let outline_area = fixture.area_of("outline");
    let start = fixture.system.area_title_bar_rect(outline_area).unwrap();
    let point = Vec2::new(start.right() - 2.0, start.center().y);

    fixture.system.press(PressTarget::TitleBar(outline_area), point).unwrap();
    fixture.system.pointer_moved(Vec2::new(100.0, 100.0));
    assert!(fixture.system.drag().is_dragging());
    fixture.system.window_focus_lost();

    assert_eq!(fixture.system.drag_phase(), DragPhase::Inactive);
    assert_eq!(layout_shape(&fixture.system, main), shape);
}
