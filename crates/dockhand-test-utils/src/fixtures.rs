//! Canned layouts for tests and benches.

use dockhand::{AreaId, DockWidgetFeatures, DockZone, DockingConfig, DockingSystem, WidgetId};

/// A docking system plus the widgets registered for it, in creation order.
#[derive(Debug)]
pub struct Fixture {
    pub system: DockingSystem,
    pub widgets: Vec<WidgetId>,
}

impl Fixture {
    /// Widget registered under `name`.
    ///
    /// # Panics
    ///
    /// If no widget has that name.
    pub fn widget(&self, name: &str) -> WidgetId {
        self.system
            .find_widget(name)
            .unwrap_or_else(|| panic!("fixture has no widget named '{}'", name))
    }

    /// Area currently holding `name`.
    ///
    /// # Panics
    ///
    /// If the widget is unassigned.
    pub fn area_of(&self, name: &str) -> AreaId {
        let widget = self.widget(name);
        self.system
            .widget_area(widget)
            .unwrap_or_else(|| panic!("widget '{}' has no area", name))
    }
}

/// Register `names` with default features without docking them.
pub fn registered(names: &[&str]) -> Fixture {
    registered_with(DockingConfig::default(), names)
}

pub fn registered_with(config: DockingConfig, names: &[&str]) -> Fixture {
    let mut system = DockingSystem::new(config);
    let widgets = names
        .iter()
        .map(|name| {
            system
                .register_widget(*name, DockWidgetFeatures::DEFAULT)
                .expect("fixture widget names are unique")
        })
        .collect();
    Fixture { system, widgets }
}

/// Every widget as a tab of a single area, first one current.
pub fn tabbed(names: &[&str]) -> Fixture {
    let mut fixture = registered(names);
    let mut area = None;
    for widget in fixture.widgets.clone() {
        let placed = fixture
            .system
            .add_widget(widget, DockZone::Center, area, None)
            .expect("fixture docking succeeds");
        area = Some(placed);
    }
    if let Some(first) = fixture.widgets.first() {
        fixture
            .system
            .activate_widget(*first)
            .expect("fixture widget is docked");
    }
    fixture
}

/// One area per widget, left to right.
pub fn side_by_side(names: &[&str]) -> Fixture {
    let mut fixture = registered(names);
    for widget in fixture.widgets.clone() {
        fixture
            .system
            .add_widget(widget, DockZone::Right, None, None)
            .expect("fixture docking succeeds");
    }
    fixture
}

/// A typical editor layout:
///
/// ```text
/// +----------------+---------+
/// | editor|console | outline |
/// |                +---------+
/// |                | files   |
/// +----------------+---------+
/// ```
pub fn ide() -> Fixture {
    let mut fixture = registered(&["editor", "console", "outline", "files"]);
    let [editor, console, outline, files] = [0, 1, 2, 3].map(|i| fixture.widgets[i]);
    let system = &mut fixture.system;

    let main = system
        .add_widget(editor, DockZone::Center, None, None)
        .expect("fixture docking succeeds");
    system
        .add_widget(console, DockZone::Center, Some(main), None)
        .expect("fixture docking succeeds");
    let side = system
        .add_widget(outline, DockZone::Right, Some(main), None)
        .expect("fixture docking succeeds");
    system
        .add_widget(files, DockZone::Bottom, Some(side), None)
        .expect("fixture docking succeeds");
    system.activate_widget(editor).expect("fixture widget is docked");
    fixture
}
