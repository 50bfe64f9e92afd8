//! Layout trees stay normalized across long mutation sequences.

use dockhand::{DockZone, DockingSystem, WidgetId};
use dockhand_test_utils::{assert_layout_invariants, fixtures, layout_shape};

/// xorshift, so failures reproduce without a rand dependency.
struct Steps(u64);

impl Steps {
    fn next(&mut self, bound: usize) -> usize {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % bound as u64) as usize
    }
}

const ZONES: [DockZone; 5] = [
    DockZone::Top,
    DockZone::Left,
    DockZone::Right,
    DockZone::Bottom,
    DockZone::Center,
];

fn random_step(system: &mut DockingSystem, widgets: &[WidgetId], steps: &mut Steps) {
    let widget = widgets[steps.next(widgets.len())];
    match steps.next(4) {
        0 | 1 => {
            let zone = ZONES[steps.next(ZONES.len())];
            let areas: Vec<_> = system
                .container(system.main_container())
                .map(|c| c.layout().areas())
                .unwrap_or_default();
            let target = (!areas.is_empty() && steps.next(3) > 0).then(|| areas[steps.next(areas.len())]);
            // Docking a widget beside its own single-widget area is refused.
            let _ = system.add_widget(widget, zone, target, None);
        }
        2 => {
            let _ = system.close_widget(widget);
        }
        _ => {
            if let Some(area) = system.widget_area(widget) {
                let _ = system.remove_area(area);
            }
        }
    }
}

#[test]
fn random_mutations_keep_tree_normalized() {
    for seed in [1_u64, 7, 42, 1234, 98765] {
        let mut fixture = fixtures::registered(&["a", "b", "c", "d", "e", "f"]);
        let widgets = fixture.widgets.clone();
        let mut steps = Steps(seed);
        for _ in 0..200 {
            random_step(&mut fixture.system, &widgets, &mut steps);
            assert_layout_invariants(&fixture.system);
        }
    }
}

#[test]
fn removing_an_area_shrinks_its_splitter() {
    let mut fixture = fixtures::side_by_side(&["a", "b", "c"]);
    let main = fixture.system.main_container();
    let b = fixture.area_of("b");
    fixture.system.remove_area(b).unwrap();
    assert_eq!(layout_shape(&fixture.system, main), "H([*a] [*c])");

    let c = fixture.area_of("c");
    fixture.system.remove_area(c).unwrap();
    assert_eq!(layout_shape(&fixture.system, main), "[*a]");
    assert_layout_invariants(&fixture.system);
}

#[test]
fn moving_last_widget_collapses_nested_splitter() {
    let mut fixture = fixtures::ide();
    let main = fixture.system.main_container();
    let files = fixture.widget("files");
    let editor_area = fixture.area_of("editor");

    fixture
        .system
        .add_widget(files, DockZone::Center, Some(editor_area), None)
        .unwrap();
    assert_eq!(
        layout_shape(&fixture.system, main),
        "H([editor console *files] [*outline])"
    );
    assert_layout_invariants(&fixture.system);
}

#[test]
fn same_orientation_edges_flatten() {
    let mut fixture = fixtures::side_by_side(&["a", "b"]);
    let main = fixture.system.main_container();
    let c = fixture.system.register_widget("c", Default::default()).unwrap();
    let b_area = fixture.area_of("b");
    fixture.system.add_widget(c, DockZone::Left, Some(b_area), None).unwrap();
    assert_eq!(layout_shape(&fixture.system, main), "H([*a] [*c] [*b])");
}
