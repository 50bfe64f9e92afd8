//! Splitter/area layout tree of a single dock container.
//!
//! The tree is an arena of [`LayoutNode`]s addressed by [`NodeId`]. Interior
//! nodes are [`Splitter`]s, leaves reference a dock area. Every structural
//! operation leaves the tree normalized:
//!
//! - an attached splitter has at least two children,
//! - a splitter never has a direct child splitter of the same orientation,
//! - `sizes.len() == children.len()` for every splitter.
//!
//! Subtrees move between trees as [`DetachedNode`] values.

use dockhand_core::alloc::HashMap;
use dockhand_core::profiling::profile_function;
use dockhand_core::{Rect, Size, Vec2};
use indexmap::IndexMap;

use crate::types::{AreaId, DockZone, NodeId, Orientation};

/// Interior node dividing space among children along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Splitter {
    pub orientation: Orientation,
    pub children: Vec<NodeId>,
    /// Extent of each child along `orientation`, in pixels.
    pub sizes: Vec<f32>,
}

/// Payload of a layout node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Splitter(Splitter),
    Area(AreaId),
}

/// A node of the layout tree.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    parent: Option<NodeId>,
    kind: NodeKind,
    rect: Rect,
}

impl LayoutNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Rectangle assigned by the last relayout. Hidden nodes get [`Rect::ZERO`].
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn as_splitter(&self) -> Option<&Splitter> {
        match &self.kind {
            NodeKind::Splitter(splitter) => Some(splitter),
            NodeKind::Area(_) => None,
        }
    }

    pub fn as_area(&self) -> Option<AreaId> {
        match self.kind {
            NodeKind::Area(area) => Some(area),
            NodeKind::Splitter(_) => None,
        }
    }
}

/// An owned subtree that is not attached to any layout tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DetachedNode {
    Splitter {
        orientation: Orientation,
        sizes: Vec<f32>,
        children: Vec<DetachedNode>,
    },
    Area(AreaId),
}

impl DetachedNode {
    /// Areas of the subtree in depth-first order.
    pub fn areas(&self) -> Vec<AreaId> {
        let mut out = Vec::new();
        self.collect_areas(&mut out);
        out
    }

    fn collect_areas(&self, out: &mut Vec<AreaId>) {
        match self {
            DetachedNode::Area(area) => out.push(*area),
            DetachedNode::Splitter { children, .. } => {
                for child in children {
                    child.collect_areas(out);
                }
            }
        }
    }

    /// Normalize the subtree.
    ///
    /// Empty splitters disappear, single-child splitters are replaced by their
    /// child and same-orientation children are flattened into their parent.
    /// Returns `None` when nothing is left.
    pub fn normalized(self) -> Option<DetachedNode> {
        match self {
            DetachedNode::Area(area) => Some(DetachedNode::Area(area)),
            DetachedNode::Splitter {
                orientation,
                sizes,
                children,
            } => {
                let mut out_children = Vec::with_capacity(children.len());
                let mut out_sizes = Vec::with_capacity(children.len());

                for (index, child) in children.into_iter().enumerate() {
                    let size = sizes.get(index).copied().unwrap_or(0.0);
                    match child.normalized() {
                        None => {}
                        Some(DetachedNode::Splitter {
                            orientation: inner,
                            sizes: inner_sizes,
                            children: inner_children,
                        }) if inner == orientation => {
                            out_sizes.extend(scale_sizes(&inner_sizes, size));
                            out_children.extend(inner_children);
                        }
                        Some(node) => {
                            out_children.push(node);
                            out_sizes.push(size);
                        }
                    }
                }

                match out_children.len() {
                    0 => None,
                    1 => out_children.pop(),
                    _ => Some(DetachedNode::Splitter {
                        orientation,
                        sizes: out_sizes,
                        children: out_children,
                    }),
                }
            }
        }
    }
}

/// Distribute `total` over `sizes` proportionally.
fn scale_sizes(sizes: &[f32], total: f32) -> Vec<f32> {
    let sum: f32 = sizes.iter().sum();
    if sum > 0.0 {
        sizes.iter().map(|size| size / sum * total).collect()
    } else if sizes.is_empty() {
        Vec::new()
    } else {
        vec![total / sizes.len() as f32; sizes.len()]
    }
}

fn extent_along(rect: Rect, orientation: Orientation) -> f32 {
    match orientation {
        Orientation::Horizontal => rect.width,
        Orientation::Vertical => rect.height,
    }
}

/// Splitter/area tree of one container.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    nodes: IndexMap<NodeId, LayoutNode>,
    root: Option<NodeId>,
    area_nodes: HashMap<AreaId, NodeId>,
    next_id: usize,
    rect: Rect,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(&id)
    }

    /// Rectangle passed to the last [`relayout`](Self::relayout).
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn area_node(&self, area: AreaId) -> Option<NodeId> {
        self.area_nodes.get(&area).copied()
    }

    pub fn contains_area(&self, area: AreaId) -> bool {
        self.area_nodes.contains_key(&area)
    }

    pub fn area_rect(&self, area: AreaId) -> Option<Rect> {
        self.area_node(area)
            .and_then(|id| self.nodes.get(&id))
            .map(|node| node.rect)
    }

    pub fn area_count(&self) -> usize {
        self.area_nodes.len()
    }

    /// Areas in depth-first (visual reading) order.
    pub fn areas(&self) -> Vec<AreaId> {
        let mut out = Vec::with_capacity(self.area_nodes.len());
        if let Some(root) = self.root {
            self.collect_areas(root, &mut out);
        }
        out
    }

    fn collect_areas(&self, id: NodeId, out: &mut Vec<AreaId>) {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(NodeKind::Area(area)) => out.push(*area),
            Some(NodeKind::Splitter(splitter)) => {
                for child in &splitter.children {
                    self.collect_areas(*child, out);
                }
            }
            None => {}
        }
    }

    /// Splitter node ids in depth-first order.
    pub fn splitters(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.as_splitter().is_some())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Copy of the whole tree as a detached value.
    pub fn snapshot(&self) -> Option<DetachedNode> {
        self.root.map(|root| self.snapshot_node(root))
    }

    fn snapshot_node(&self, id: NodeId) -> DetachedNode {
        match &self.nodes[&id].kind {
            NodeKind::Area(area) => DetachedNode::Area(*area),
            NodeKind::Splitter(splitter) => DetachedNode::Splitter {
                orientation: splitter.orientation,
                sizes: splitter.sizes.clone(),
                children: splitter
                    .children
                    .iter()
                    .map(|child| self.snapshot_node(*child))
                    .collect(),
            },
        }
    }

    fn alloc(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            LayoutNode {
                parent,
                kind,
                rect: Rect::ZERO,
            },
        );
        id
    }

    fn attach(&mut self, node: DetachedNode, parent: Option<NodeId>) -> NodeId {
        match node {
            DetachedNode::Area(area) => {
                debug_assert!(
                    !self.area_nodes.contains_key(&area),
                    "{} is already part of this layout",
                    area
                );
                let id = self.alloc(parent, NodeKind::Area(area));
                self.area_nodes.insert(area, id);
                id
            }
            DetachedNode::Splitter {
                orientation,
                mut sizes,
                children,
            } => {
                let id = self.alloc(
                    parent,
                    NodeKind::Splitter(Splitter {
                        orientation,
                        children: Vec::new(),
                        sizes: Vec::new(),
                    }),
                );
                let ids: Vec<NodeId> = children
                    .into_iter()
                    .map(|child| self.attach(child, Some(id)))
                    .collect();
                sizes.resize(ids.len(), 0.0);

                let splitter = self.splitter_mut(id);
                splitter.children = ids;
                splitter.sizes = sizes;
                id
            }
        }
    }

    /// Remove a subtree from the arena without touching its parent's child list.
    fn detach_subtree(&mut self, id: NodeId) -> DetachedNode {
        let Some(node) = self.nodes.shift_remove(&id) else {
            panic!("layout node {:?} does not exist", id);
        };

        match node.kind {
            NodeKind::Area(area) => {
                self.area_nodes.remove(&area);
                DetachedNode::Area(area)
            }
            NodeKind::Splitter(splitter) => DetachedNode::Splitter {
                orientation: splitter.orientation,
                sizes: splitter.sizes,
                children: splitter
                    .children
                    .into_iter()
                    .map(|child| self.detach_subtree(child))
                    .collect(),
            },
        }
    }

    fn splitter(&self, id: NodeId) -> &Splitter {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(NodeKind::Splitter(splitter)) => splitter,
            _ => panic!("layout node {:?} is not a splitter", id),
        }
    }

    fn splitter_mut(&mut self, id: NodeId) -> &mut Splitter {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(NodeKind::Splitter(splitter)) => splitter,
            _ => panic!("layout node {:?} is not a splitter", id),
        }
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
        }
    }

    fn position_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes.get(&id)?.parent?;
        let index = self.splitter(parent).children.iter().position(|c| *c == id)?;
        Some((parent, index))
    }

    /// Attach `node` as the root of an empty tree.
    pub fn set_root(&mut self, node: DetachedNode) -> Option<NodeId> {
        assert!(self.root.is_none(), "layout tree already has a root");
        let node = node.normalized()?;
        let id = self.attach(node, None);
        self.root = Some(id);
        Some(id)
    }

    /// Detach the whole tree, leaving it empty.
    pub fn take_root(&mut self) -> Option<DetachedNode> {
        let root = self.root.take()?;
        Some(self.detach_subtree(root))
    }

    /// Insert `node` into splitter `parent` at child position `index`.
    ///
    /// The new child receives `1 / (n + 1)` of the splitter's extent and the
    /// existing children shrink proportionally, so the total is unchanged.
    pub fn insert(&mut self, parent: NodeId, index: usize, node: DetachedNode) {
        let Some(node) = node.normalized() else {
            return;
        };

        let splitter = self.splitter_mut(parent);
        assert!(
            index <= splitter.children.len(),
            "insert index {} out of range for splitter with {} children",
            index,
            splitter.children.len()
        );

        let count = splitter.children.len() as f32;
        let total: f32 = splitter.sizes.iter().sum();
        let share = total / (count + 1.0);
        for size in &mut splitter.sizes {
            *size *= count / (count + 1.0);
        }

        self.splice_into(parent, index, node, share);
    }

    /// Place `node` at `index` in `parent`, flattening a same-orientation splitter.
    fn splice_into(&mut self, parent: NodeId, index: usize, node: DetachedNode, size: f32) {
        let orientation = self.splitter(parent).orientation;
        match node {
            DetachedNode::Splitter {
                orientation: inner,
                sizes,
                children,
            } if inner == orientation => {
                let scaled = scale_sizes(&sizes, size);
                for (offset, (child, child_size)) in children.into_iter().zip(scaled).enumerate() {
                    let id = self.attach(child, Some(parent));
                    let splitter = self.splitter_mut(parent);
                    splitter.children.insert(index + offset, id);
                    splitter.sizes.insert(index + offset, child_size);
                }
            }
            node => {
                let id = self.attach(node, Some(parent));
                let splitter = self.splitter_mut(parent);
                splitter.children.insert(index, id);
                splitter.sizes.insert(index, size);
            }
        }
    }

    /// Insert `node` next to `target` on the side named by `zone`.
    ///
    /// - `target` is a splitter of the zone's orientation: prepend or append.
    /// - `target`'s parent has the zone's orientation: insert as a sibling,
    ///   splitting the target's share in half.
    /// - otherwise: wrap `target` in a new splitter, 50/50.
    pub fn insert_relative(&mut self, target: NodeId, zone: DockZone, node: DetachedNode) {
        let Some(orientation) = zone.orientation() else {
            panic!("a center zone adds a tab and never splits the layout");
        };
        let Some(node) = node.normalized() else {
            return;
        };

        let target_node = &self.nodes[&target];
        if let NodeKind::Splitter(splitter) = &target_node.kind
            && splitter.orientation == orientation
        {
            let index = if zone.is_before() {
                0
            } else {
                splitter.children.len()
            };
            self.insert(target, index, node);
            return;
        }

        if let Some((parent, index)) = self.position_in_parent(target)
            && self.splitter(parent).orientation == orientation
        {
            let splitter = self.splitter_mut(parent);
            let half = splitter.sizes[index] / 2.0;
            splitter.sizes[index] = half;
            let at = if zone.is_before() { index } else { index + 1 };
            self.splice_into(parent, at, node, half);
            return;
        }

        self.wrap(target, orientation, node, zone.is_before());
    }

    fn wrap(&mut self, target: NodeId, orientation: Orientation, node: DetachedNode, before: bool) {
        let position = self.position_in_parent(target);
        let rect = self.nodes[&target].rect;
        let extent = extent_along(rect, orientation);
        let half = if extent > 0.0 { extent / 2.0 } else { 1.0 };

        let parent = position.map(|(parent, _)| parent);
        let wrapper = self.alloc(
            parent,
            NodeKind::Splitter(Splitter {
                orientation,
                children: vec![target],
                sizes: vec![half],
            }),
        );
        if let Some(wrapper_node) = self.nodes.get_mut(&wrapper) {
            wrapper_node.rect = rect;
        }

        match position {
            Some((parent, index)) => self.splitter_mut(parent).children[index] = wrapper,
            None => self.root = Some(wrapper),
        }
        self.set_parent(target, Some(wrapper));

        tracing::debug!("Wrapped {:?} in new {:?} splitter {:?}", target, orientation, wrapper);
        self.splice_into(wrapper, if before { 0 } else { 1 }, node, half);
    }

    /// Insert `node` along an outer edge of the whole container.
    pub fn insert_at_edge(&mut self, zone: DockZone, node: DetachedNode) {
        match self.root {
            None => {
                self.set_root(node);
            }
            Some(root) => self.insert_relative(root, zone, node),
        }
    }

    /// Remove a node and its subtree, then normalize upward.
    pub fn remove(&mut self, id: NodeId) -> DetachedNode {
        let position = self.position_in_parent(id);
        let detached = self.detach_subtree(id);

        match position {
            None => self.root = None,
            Some((parent, index)) => {
                let splitter = self.splitter_mut(parent);
                splitter.children.remove(index);
                splitter.sizes.remove(index);
                self.normalize_upward(parent);
            }
        }
        detached
    }

    /// Remove the leaf of `area`. Returns false if the area is not in this tree.
    pub fn remove_area(&mut self, area: AreaId) -> bool {
        match self.area_node(area) {
            Some(id) => {
                self.remove(id);
                true
            }
            None => false,
        }
    }

    /// Put `node` in the place of `old`, returning the replaced subtree.
    pub fn replace(&mut self, old: NodeId, node: DetachedNode) -> DetachedNode {
        let Some(node) = node.normalized() else {
            return self.remove(old);
        };

        let position = self.position_in_parent(old);
        let detached = self.detach_subtree(old);
        let id = self.attach(node, position.map(|(parent, _)| parent));

        match position {
            None => self.root = Some(id),
            Some((parent, index)) => {
                self.splitter_mut(parent).children[index] = id;
                self.flatten_child(parent, index);
            }
        }
        detached
    }

    fn normalize_upward(&mut self, id: NodeId) {
        let position = self.position_in_parent(id);
        let children = self.splitter(id).children.clone();

        match children.as_slice() {
            [] => {
                self.nodes.shift_remove(&id);
                tracing::debug!("Removed empty splitter {:?}", id);
                match position {
                    None => self.root = None,
                    Some((parent, index)) => {
                        let splitter = self.splitter_mut(parent);
                        splitter.children.remove(index);
                        splitter.sizes.remove(index);
                        self.normalize_upward(parent);
                    }
                }
            }
            [only] => {
                let only = *only;
                self.nodes.shift_remove(&id);
                self.set_parent(only, position.map(|(parent, _)| parent));
                tracing::debug!("Collapsed single-child splitter {:?} into {:?}", id, only);
                match position {
                    None => self.root = Some(only),
                    Some((parent, index)) => {
                        self.splitter_mut(parent).children[index] = only;
                        self.flatten_child(parent, index);
                    }
                }
            }
            _ => {}
        }
    }

    /// Merge the child at `index` into `parent` if both split along the same axis.
    fn flatten_child(&mut self, parent: NodeId, index: usize) {
        let orientation = self.splitter(parent).orientation;
        let child = self.splitter(parent).children[index];
        let size = self.splitter(parent).sizes[index];

        let inner = match self.nodes.get(&child).map(|node| &node.kind) {
            Some(NodeKind::Splitter(inner)) if inner.orientation == orientation => inner.clone(),
            _ => return,
        };

        self.nodes.shift_remove(&child);
        for grandchild in &inner.children {
            self.set_parent(*grandchild, Some(parent));
        }

        let scaled = scale_sizes(&inner.sizes, size);
        let splitter = self.splitter_mut(parent);
        splitter.children.splice(index..=index, inner.children);
        splitter.sizes.splice(index..=index, scaled);
        tracing::debug!("Flattened splitter {:?} into {:?}", child, parent);
    }

    fn node_visible(&self, id: NodeId, is_visible: &impl Fn(AreaId) -> bool) -> bool {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(NodeKind::Area(area)) => is_visible(*area),
            Some(NodeKind::Splitter(splitter)) => splitter
                .children
                .iter()
                .any(|child| self.node_visible(*child, is_visible)),
            None => false,
        }
    }

    /// True when at least one area of the tree is visible.
    pub fn has_visible_content(&self, is_visible: &impl Fn(AreaId) -> bool) -> bool {
        self.root
            .is_some_and(|root| self.node_visible(root, is_visible))
    }

    /// Assign rectangles to every node.
    ///
    /// Visible children share their splitter's extent in proportion to their
    /// sizes. When every child is visible the sizes are rescaled to sum to
    /// that extent. Hidden children get a zero rectangle and the splitter's
    /// sizes are left alone until they reappear.
    pub fn relayout(&mut self, rect: Rect, is_visible: &impl Fn(AreaId) -> bool) {
        profile_function!();
        self.rect = rect;
        if let Some(root) = self.root {
            if self.node_visible(root, is_visible) {
                self.layout_node(root, rect, is_visible);
            } else {
                self.clear_rects(root);
            }
        }
    }

    fn layout_node(&mut self, id: NodeId, rect: Rect, is_visible: &impl Fn(AreaId) -> bool) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.rect = rect;

        let (orientation, children, sizes) = match &node.kind {
            NodeKind::Area(_) => return,
            NodeKind::Splitter(splitter) => (
                splitter.orientation,
                splitter.children.clone(),
                splitter.sizes.clone(),
            ),
        };

        let visible: Vec<bool> = children
            .iter()
            .map(|child| self.node_visible(*child, is_visible))
            .collect();

        let positive: Vec<f32> = sizes
            .iter()
            .zip(&visible)
            .filter(|(size, visible)| **visible && **size > 0.0)
            .map(|(size, _)| *size)
            .collect();
        let fallback = if positive.is_empty() {
            1.0
        } else {
            positive.iter().sum::<f32>() / positive.len() as f32
        };

        let weights: Vec<f32> = sizes
            .iter()
            .zip(&visible)
            .map(|(size, visible)| match (*visible, *size > 0.0) {
                (false, _) => 0.0,
                (true, true) => *size,
                (true, false) => fallback,
            })
            .collect();
        let total_weight: f32 = weights.iter().sum();
        let extent = extent_along(rect, orientation);

        let mut new_sizes = sizes.clone();
        let mut offset = 0.0;
        for (index, child) in children.iter().enumerate() {
            if !visible[index] {
                self.clear_rects(*child);
                continue;
            }

            let share = if total_weight > 0.0 {
                extent * weights[index] / total_weight
            } else {
                0.0
            };
            let child_rect = match orientation {
                Orientation::Horizontal => Rect::new(rect.x + offset, rect.y, share, rect.height),
                Orientation::Vertical => Rect::new(rect.x, rect.y + offset, rect.width, share),
            };
            offset += share;
            new_sizes[index] = share;
            self.layout_node(*child, child_rect, is_visible);
        }

        if extent > 0.0 && visible.iter().all(|visible| *visible) {
            self.splitter_mut(id).sizes = new_sizes;
        }
    }

    fn clear_rects(&mut self, id: NodeId) {
        let children = match self.nodes.get_mut(&id) {
            Some(node) => {
                node.rect = Rect::ZERO;
                match &node.kind {
                    NodeKind::Splitter(splitter) => splitter.children.clone(),
                    NodeKind::Area(_) => return,
                }
            }
            None => return,
        };
        for child in children {
            self.clear_rects(child);
        }
    }

    /// Deepest visible area whose rectangle contains `point`.
    pub fn area_at(&self, point: Vec2, is_visible: &impl Fn(AreaId) -> bool) -> Option<AreaId> {
        let mut current = self.root?;
        loop {
            let node = self.nodes.get(&current)?;
            if !node.rect.contains(point) {
                return None;
            }
            match &node.kind {
                NodeKind::Area(area) => return is_visible(*area).then_some(*area),
                NodeKind::Splitter(splitter) => {
                    current = *splitter.children.iter().find(|child| {
                        self.nodes
                            .get(*child)
                            .is_some_and(|n| n.rect.contains(point))
                            && self.node_visible(**child, is_visible)
                    })?;
                }
            }
        }
    }

    /// Minimum size of a subtree given per-area minimums.
    pub fn min_size(
        &self,
        id: NodeId,
        area_min: &impl Fn(AreaId) -> Size,
        is_visible: &impl Fn(AreaId) -> bool,
    ) -> Size {
        if !self.node_visible(id, is_visible) {
            return Size::ZERO;
        }
        match &self.nodes[&id].kind {
            NodeKind::Area(area) => area_min(*area),
            NodeKind::Splitter(splitter) => {
                splitter
                    .children
                    .iter()
                    .map(|child| self.min_size(*child, area_min, is_visible))
                    .fold(Size::ZERO, |acc, child| match splitter.orientation {
                        Orientation::Horizontal => Size::new(
                            acc.width + child.width,
                            acc.height.max(child.height),
                        ),
                        Orientation::Vertical => Size::new(
                            acc.width.max(child.width),
                            acc.height + child.height,
                        ),
                    })
            }
        }
    }

    /// Move the handle between the `handle`-th and next visible child of
    /// `splitter` by `delta` pixels, clamped by both sides' minimum sizes.
    ///
    /// Returns the delta actually applied. Call [`relayout`](Self::relayout)
    /// afterwards to update rectangles.
    pub fn resize_splitter(
        &mut self,
        splitter: NodeId,
        handle: usize,
        delta: f32,
        area_min: &impl Fn(AreaId) -> Size,
        is_visible: &impl Fn(AreaId) -> bool,
    ) -> f32 {
        let node = self.splitter(splitter);
        let orientation = node.orientation;
        let visible: Vec<usize> = node
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| self.node_visible(**child, is_visible))
            .map(|(index, _)| index)
            .collect();

        let (Some(&first), Some(&second)) = (visible.get(handle), visible.get(handle + 1)) else {
            return 0.0;
        };

        let min_along = |id: NodeId| {
            let min = self.min_size(id, area_min, is_visible);
            match orientation {
                Orientation::Horizontal => min.width,
                Orientation::Vertical => min.height,
            }
        };
        let min_first = min_along(node.children[first]);
        let min_second = min_along(node.children[second]);

        let size_first = node.sizes[first];
        let size_second = node.sizes[second];
        let lo = min_first;
        let hi = size_first + size_second - min_second;
        if lo > hi {
            return 0.0;
        }

        let new_first = (size_first + delta).clamp(lo, hi);
        let applied = new_first - size_first;

        let node = self.splitter_mut(splitter);
        node.sizes[first] = new_first;
        node.sizes[second] = size_second - applied;
        applied
    }

    /// Splitter handle within `tolerance` pixels of `point`.
    ///
    /// Returns the splitter and the handle index as used by
    /// [`resize_splitter`](Self::resize_splitter).
    pub fn handle_at(&self, point: Vec2, tolerance: f32) -> Option<(NodeId, usize)> {
        for (id, node) in &self.nodes {
            let Some(splitter) = node.as_splitter() else {
                continue;
            };
            if node.rect.is_empty() {
                continue;
            }

            let visible: Vec<Rect> = splitter
                .children
                .iter()
                .filter_map(|child| self.nodes.get(child))
                .map(|child| child.rect)
                .filter(|rect| !rect.is_empty())
                .collect();

            for (handle, rect) in visible.iter().take(visible.len().saturating_sub(1)).enumerate() {
                let hit = match splitter.orientation {
                    Orientation::Horizontal => {
                        (point.x - rect.right()).abs() <= tolerance
                            && point.y >= node.rect.y
                            && point.y < node.rect.bottom()
                    }
                    Orientation::Vertical => {
                        (point.y - rect.bottom()).abs() <= tolerance
                            && point.x >= node.rect.x
                            && point.x < node.rect.right()
                    }
                };
                if hit {
                    return Some((*id, handle));
                }
            }
        }
        None
    }

    /// Verify the structural invariants of the tree.
    pub fn check_invariants(&self) -> Result<(), String> {
        let Some(root) = self.root else {
            if self.nodes.is_empty() && self.area_nodes.is_empty() {
                return Ok(());
            }
            return Err(format!("empty tree still holds {} nodes", self.nodes.len()));
        };

        if self.nodes[&root].parent.is_some() {
            return Err(format!("root {:?} has a parent", root));
        }

        let mut reached = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            reached += 1;
            let Some(node) = self.nodes.get(&id) else {
                return Err(format!("dangling node {:?}", id));
            };

            match &node.kind {
                NodeKind::Area(area) => {
                    if self.area_nodes.get(area) != Some(&id) {
                        return Err(format!("{} is not indexed at {:?}", area, id));
                    }
                }
                NodeKind::Splitter(splitter) => {
                    if splitter.children.len() < 2 {
                        return Err(format!(
                            "splitter {:?} has {} children",
                            id,
                            splitter.children.len()
                        ));
                    }
                    if splitter.sizes.len() != splitter.children.len() {
                        return Err(format!(
                            "splitter {:?} has {} sizes for {} children",
                            id,
                            splitter.sizes.len(),
                            splitter.children.len()
                        ));
                    }
                    for child in &splitter.children {
                        let Some(child_node) = self.nodes.get(child) else {
                            return Err(format!("splitter {:?} has dangling child {:?}", id, child));
                        };
                        if child_node.parent != Some(id) {
                            return Err(format!("{:?} has the wrong parent", child));
                        }
                        if let NodeKind::Splitter(inner) = &child_node.kind
                            && inner.orientation == splitter.orientation
                        {
                            return Err(format!(
                                "splitters {:?} and {:?} are nested with the same orientation",
                                id, child
                            ));
                        }
                        stack.push(*child);
                    }
                }
            }
        }

        if reached != self.nodes.len() {
            return Err(format!(
                "{} nodes reachable from the root, {} allocated",
                reached,
                self.nodes.len()
            ));
        }
        if self.area_nodes.len() != self.areas().len() {
            return Err("area index is out of sync".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_visible(_: AreaId) -> bool {
        true
    }

    fn area(n: u64) -> DetachedNode {
        DetachedNode::Area(AreaId(n))
    }

    fn laid_out(tree: &mut LayoutTree) {
        tree.relayout(Rect::new(0.0, 0.0, 400.0, 200.0), &all_visible);
    }

    #[test]
    fn test_first_insert_becomes_root() {
        let mut tree = LayoutTree::new();
        tree.insert_at_edge(DockZone::Left, area(1));
        assert_eq!(tree.areas(), vec![AreaId(1)]);
        assert_eq!(tree.node(tree.root().unwrap()).unwrap().as_area(), Some(AreaId(1)));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_split_creates_splitter_with_orientation() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        laid_out(&mut tree);

        let target = tree.area_node(AreaId(1)).unwrap();
        tree.insert_relative(target, DockZone::Bottom, area(2));

        let root = tree.node(tree.root().unwrap()).unwrap();
        let splitter = root.as_splitter().unwrap();
        assert_eq!(splitter.orientation, Orientation::Vertical);
        assert_eq!(tree.areas(), vec![AreaId(1), AreaId(2)]);
        assert_eq!(splitter.sizes, vec![100.0, 100.0]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_left_prepends_to_matching_root() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Right, area(2));
        tree.insert_at_edge(DockZone::Left, area(3));

        assert_eq!(tree.areas(), vec![AreaId(3), AreaId(1), AreaId(2)]);
        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.as_splitter().unwrap().children.len(), 3);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_sibling_insert_halves_target() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Right, area(2));
        laid_out(&mut tree);

        let target = tree.area_node(AreaId(1)).unwrap();
        tree.insert_relative(target, DockZone::Right, area(3));

        assert_eq!(tree.areas(), vec![AreaId(1), AreaId(3), AreaId(2)]);
        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.as_splitter().unwrap().sizes, vec![100.0, 100.0, 200.0]);
    }

    #[test]
    fn test_insert_preserves_total_extent() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Right, area(2));
        laid_out(&mut tree);

        let root = tree.root().unwrap();
        tree.insert(root, 1, area(3));
        let sizes = &tree.node(root).unwrap().as_splitter().unwrap().sizes;
        let total: f32 = sizes.iter().sum();
        assert!((total - 400.0).abs() < 1e-3);
        assert!((sizes[1] - 400.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_remove_collapses_single_child_splitter() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Right, area(2));
        assert!(tree.remove_area(AreaId(2)));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(tree.root().unwrap()).unwrap().as_area(), Some(AreaId(1)));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_from_three_keeps_splitter() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Right, area(2));
        tree.insert_at_edge(DockZone::Right, area(3));
        tree.remove_area(AreaId(2));

        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.as_splitter().unwrap().children.len(), 2);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_collapse_flattens_same_orientation() {
        // H[1, V[2, 3]] + Right of 3 → H[1, V[2, H[3, 4]]]
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Right, area(2));
        let two = tree.area_node(AreaId(2)).unwrap();
        tree.insert_relative(two, DockZone::Bottom, area(3));
        let three = tree.area_node(AreaId(3)).unwrap();
        tree.insert_relative(three, DockZone::Right, area(4));
        tree.check_invariants().unwrap();

        // Removing 2 collapses the vertical splitter, whose remaining child is
        // a horizontal splitter that must merge into the horizontal root.
        tree.remove_area(AreaId(2));
        tree.check_invariants().unwrap();
        let root = tree.node(tree.root().unwrap()).unwrap();
        let splitter = root.as_splitter().unwrap();
        assert_eq!(splitter.orientation, Orientation::Horizontal);
        assert_eq!(splitter.children.len(), 3);
        assert_eq!(tree.areas(), vec![AreaId(1), AreaId(3), AreaId(4)]);
    }

    #[test]
    fn test_insert_detached_same_orientation_flattens() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(
            DockZone::Right,
            DetachedNode::Splitter {
                orientation: Orientation::Horizontal,
                sizes: vec![1.0, 1.0],
                children: vec![area(2), area(3)],
            },
        );
        tree.check_invariants().unwrap();
        assert_eq!(tree.areas(), vec![AreaId(1), AreaId(2), AreaId(3)]);
        assert_eq!(tree.splitters().len(), 1);
    }

    #[test]
    fn test_normalized_detached() {
        let node = DetachedNode::Splitter {
            orientation: Orientation::Vertical,
            sizes: vec![10.0, 10.0],
            children: vec![
                DetachedNode::Splitter {
                    orientation: Orientation::Horizontal,
                    sizes: vec![],
                    children: vec![],
                },
                area(7),
            ],
        };
        assert_eq!(node.normalized(), Some(area(7)));
    }

    #[test]
    fn test_replace_subtree() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Right, area(2));
        let one = tree.area_node(AreaId(1)).unwrap();

        let old = tree.replace(one, area(5));
        assert_eq!(old, area(1));
        assert_eq!(tree.areas(), vec![AreaId(5), AreaId(2)]);
        assert!(!tree.contains_area(AreaId(1)));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_take_root_empties_tree() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Top, area(2));
        let detached = tree.take_root().unwrap();
        assert_eq!(detached.areas(), vec![AreaId(2), AreaId(1)]);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_relayout_and_hit_testing() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Right, area(2));
        laid_out(&mut tree);

        assert_eq!(tree.area_rect(AreaId(1)), Some(Rect::new(0.0, 0.0, 200.0, 200.0)));
        assert_eq!(tree.area_rect(AreaId(2)), Some(Rect::new(200.0, 0.0, 200.0, 200.0)));
        assert_eq!(tree.area_at(Vec2::new(50.0, 50.0), &all_visible), Some(AreaId(1)));
        assert_eq!(tree.area_at(Vec2::new(250.0, 50.0), &all_visible), Some(AreaId(2)));
        assert_eq!(tree.area_at(Vec2::new(450.0, 50.0), &all_visible), None);
    }

    #[test]
    fn test_hidden_area_yields_space() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Right, area(2));
        laid_out(&mut tree);

        let hide_two = |area: AreaId| area != AreaId(2);
        tree.relayout(Rect::new(0.0, 0.0, 400.0, 200.0), &hide_two);
        assert_eq!(tree.area_rect(AreaId(1)), Some(Rect::new(0.0, 0.0, 400.0, 200.0)));
        assert_eq!(tree.area_rect(AreaId(2)), Some(Rect::ZERO));

        // The hidden child keeps its share for when it comes back.
        laid_out(&mut tree);
        assert_eq!(tree.area_rect(AreaId(2)), Some(Rect::new(200.0, 0.0, 200.0, 200.0)));
    }

    #[test]
    fn test_resize_splitter_clamps_to_minimum() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Right, area(2));
        laid_out(&mut tree);

        let root = tree.root().unwrap();
        let min = |_: AreaId| Size::new(50.0, 50.0);
        let applied = tree.resize_splitter(root, 0, 500.0, &min, &all_visible);
        assert_eq!(applied, 150.0);
        assert_eq!(tree.node(root).unwrap().as_splitter().unwrap().sizes, vec![350.0, 50.0]);

        assert_eq!(tree.resize_splitter(root, 1, 10.0, &min, &all_visible), 0.0);
    }

    #[test]
    fn test_handle_hit_testing() {
        let mut tree = LayoutTree::new();
        tree.set_root(area(1));
        tree.insert_at_edge(DockZone::Right, area(2));
        laid_out(&mut tree);

        let root = tree.root().unwrap();
        assert_eq!(tree.handle_at(Vec2::new(201.0, 100.0), 3.0), Some((root, 0)));
        assert_eq!(tree.handle_at(Vec2::new(100.0, 100.0), 3.0), None);
    }
}
