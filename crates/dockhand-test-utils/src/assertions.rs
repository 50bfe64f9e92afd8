//! Structural assertions on layout trees.

use dockhand::{ContainerId, DockingSystem, LayoutTree, NodeId, NodeKind, Orientation};

/// Panic unless `tree` is normalized: every splitter has at least two
/// children, one size per child, and no child splitter of its own
/// orientation.
pub fn assert_normalized(tree: &LayoutTree) {
    if let Some(root) = tree.root() {
        check_node(tree, root, None);
    }
}

fn check_node(tree: &LayoutTree, id: NodeId, parent: Option<Orientation>) {
    let node = tree
        .node(id)
        .unwrap_or_else(|| panic!("dangling node {:?}", id));
    let NodeKind::Splitter(splitter) = node.kind() else {
        return;
    };
    assert!(
        splitter.children.len() >= 2,
        "splitter {:?} has {} children",
        id,
        splitter.children.len()
    );
    assert_eq!(
        splitter.sizes.len(),
        splitter.children.len(),
        "splitter {:?} sizes do not match its children",
        id
    );
    assert_ne!(
        Some(splitter.orientation),
        parent,
        "splitter {:?} nests inside a splitter of the same orientation",
        id
    );
    for child in &splitter.children {
        check_node(tree, *child, Some(splitter.orientation));
    }
}

/// Cross-reference checks of the whole system plus normalization of every
/// container's tree.
pub fn assert_layout_invariants(system: &DockingSystem) {
    if let Err(e) = system.check_invariants() {
        panic!("docking invariants violated: {}", e);
    }
    for container in system.containers() {
        assert_normalized(container.layout());
    }
}

/// Compact text form of a container's tree, for readable assertions.
///
/// Splitters print as `H(..)` or `V(..)`, areas as `[..]` listing widget
/// names; the current widget is prefixed with `*`, closed ones with `~`.
///
/// ```text
/// H([*editor ~console] V([*outline] [*files]))
/// ```
pub fn layout_shape(system: &DockingSystem, container: ContainerId) -> String {
    let Some(c) = system.container(container) else {
        return String::new();
    };
    let tree = c.layout();
    match tree.root() {
        Some(root) => node_shape(system, tree, root),
        None => String::new(),
    }
}

fn node_shape(system: &DockingSystem, tree: &LayoutTree, id: NodeId) -> String {
    let Some(node) = tree.node(id) else {
        return String::new();
    };
    match node.kind() {
        NodeKind::Splitter(splitter) => {
            let tag = match splitter.orientation {
                Orientation::Horizontal => "H",
                Orientation::Vertical => "V",
            };
            let children: Vec<String> = splitter
                .children
                .iter()
                .map(|child| node_shape(system, tree, *child))
                .collect();
            format!("{}({})", tag, children.join(" "))
        }
        NodeKind::Area(area_id) => {
            let Some(area) = system.area(*area_id) else {
                return "[?]".to_string();
            };
            let tabs: Vec<String> = area
                .widgets()
                .iter()
                .filter_map(|id| system.widget(*id))
                .map(|w| {
                    let marker = if w.is_closed() {
                        "~"
                    } else if area.current() == Some(w.id()) {
                        "*"
                    } else {
                        ""
                    };
                    format!("{}{}", marker, w.name())
                })
                .collect();
            format!("[{}]", tabs.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_ide_shape() {
        let fixture = fixtures::ide();
        let main = fixture.system.main_container();
        assert_eq!(
            layout_shape(&fixture.system, main),
            "H([*editor console] V([*outline] [*files]))"
        );
        assert_layout_invariants(&fixture.system);
    }

    #[test]
    fn test_side_by_side_is_flat() {
        let fixture = fixtures::side_by_side(&["a", "b", "c"]);
        let main = fixture.system.main_container();
        assert_eq!(layout_shape(&fixture.system, main), "H([*a] [*b] [*c])");
    }
}
