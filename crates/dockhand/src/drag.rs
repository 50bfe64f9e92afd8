//! Drag gestures: tab reordering, re-docking and splitter resizing.
//!
//! The host feeds primary-button press/move/release at window coordinates.
//! A press only arms a gesture; it turns into a drag once the pointer has
//! travelled [`DockingConfig::drag_threshold`](crate::DockingConfig) pixels.
//!
//! ```text
//! Inactive -> Pressed -> DraggingTab      -> Inactive
//!                     -> DraggingFloating -> Inactive
//!                     -> ResizingSplitter -> Inactive
//! ```
//!
//! Re-docking drags move a ghost rectangle and leave the layout alone until
//! release, so cancelling needs no undo. Dragging a floating window moves
//! the real window, which is put back on cancel.

use dockhand_core::profiling::profile_function;
use dockhand_core::{Rect, Size, Vec2};

use crate::drop_zone::DropTarget;
use crate::error::{DockError, DockResult};
use crate::system::DockingSystem;
use crate::types::{AreaId, ContainerId, FloatingId, NodeId, WidgetId};
use crate::widget::DockWidgetFeatures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Inactive,
    /// Button down, threshold not reached yet.
    Pressed,
    /// Reordering tabs inside one tab strip.
    DraggingTab,
    /// Moving content (or a floating window) towards a drop target.
    DraggingFloating,
    ResizingSplitter,
}

/// What the press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    Tab(WidgetId),
    /// Empty part of an area's title bar.
    TitleBar(AreaId),
    /// A floating window's own title bar.
    FloatingTitleBar(FloatingId),
    SplitterHandle {
        container: ContainerId,
        splitter: NodeId,
        handle: usize,
    },
}

/// What a floating drag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    Widget(WidgetId),
    Area(AreaId),
    Floating(FloatingId),
}

/// Result of releasing the button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    /// No gesture was active.
    Ignored,
    /// Released before the drag threshold.
    Clicked,
    Reordered { area: AreaId, from: usize, to: usize },
    Docked(DropTarget),
    /// Released away from any target: the content floats (or the floating
    /// window stays where it was moved).
    Floated(FloatingId),
    Resized,
    /// The drop was not allowed; nothing changed.
    Rejected,
}

/// Transient state of the current gesture.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    phase: DragPhase,
    press: Option<PressTarget>,
    origin: Vec2,
    last: Vec2,
    source: Option<DragSource>,
    target: Option<DropTarget>,
    ghost: Option<Rect>,
    grab_offset: Vec2,
    floating_origin: Option<Rect>,
    tab_area: Option<AreaId>,
    tab_from: Option<usize>,
    tab_to: Option<usize>,
    resized_by: f32,
}

impl DragController {
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn press_target(&self) -> Option<PressTarget> {
        self.press
    }

    pub fn source(&self) -> Option<DragSource> {
        self.source
    }

    pub fn target(&self) -> Option<DropTarget> {
        self.target
    }

    /// Pointer position of the press.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn is_dragging(&self) -> bool {
        matches!(
            self.phase,
            DragPhase::DraggingTab | DragPhase::DraggingFloating | DragPhase::ResizingSplitter
        )
    }

    /// Check if a position exceeds the drag threshold from the start position.
    pub fn exceeds_threshold(start: Vec2, current: Vec2, threshold: f32) -> bool {
        (current - start).length() >= threshold
    }
}

impl DockingSystem {
    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Drop target under the pointer during a floating drag.
    pub fn drop_target(&self) -> Option<DropTarget> {
        self.drag.target()
    }

    /// Where the dragged content is drawn: the ghost rectangle, or the
    /// floating window being moved.
    pub fn drag_preview(&self) -> Option<Rect> {
        match self.drag.source()? {
            DragSource::Floating(floating) => self.floating.get(&floating).map(|f| f.geometry()),
            _ => self.drag.ghost,
        }
    }

    /// Rectangle the content would occupy if dropped now.
    pub fn drop_preview(&self) -> Option<Rect> {
        self.drag.target().and_then(|t| self.drop_preview_rect(&t))
    }

    /// Insertion point shown while reordering tabs.
    pub fn tab_drop_index(&self) -> Option<usize> {
        self.drag.tab_to
    }

    /// Arm a gesture on `target`. An active gesture is cancelled first.
    pub fn press(&mut self, target: PressTarget, point: Vec2) -> DockResult<()> {
        if self.drag.phase() != DragPhase::Inactive {
            self.cancel_drag();
        }

        // Validate the press target
        match target {
            PressTarget::Tab(widget) => {
                self.widgets
                    .try_get(widget)?
                    .area()
                    .ok_or(DockError::WidgetUnassigned(widget))?;
            }
            PressTarget::TitleBar(area) => {
                self.try_area(area)?;
            }
            PressTarget::FloatingTitleBar(floating) => {
                self.raise_floating(floating)?;
            }
            PressTarget::SplitterHandle {
                container,
                splitter,
                handle,
            } => {
                let valid = self
                    .try_container(container)?
                    .layout
                    .node(splitter)
                    .and_then(|n| n.as_splitter())
                    .is_some_and(|s| handle + 1 < s.children.len());
                if !valid {
                    return Err(DockError::InvalidDropTarget);
                }
            }
        }

        self.drag = DragController {
            phase: DragPhase::Pressed,
            press: Some(target),
            origin: point,
            last: point,
            ..Default::default()
        };
        tracing::trace!("Pressed {:?} at {:?}", target, point);
        Ok(())
    }

    /// Hit-test `point` and arm a gesture on whatever is there.
    ///
    /// Checks, top-down: floating title bars, splitter handles, tabs, then
    /// empty title bar space. Expanded auto-hide overlays sit above the
    /// main layout.
    pub fn press_at(&mut self, point: Vec2) -> Option<PressTarget> {
        let container = self.top_level_at(point, None)?;
        let c = self.containers.get(&container)?;

        let target = if let Some(floating) = c.floating()
            && self
                .floating_title_bar_rect(floating)
                .is_some_and(|r| r.contains(point))
        {
            PressTarget::FloatingTitleBar(floating)
        } else {
            let overlay_area = self
                .auto_hide
                .values()
                .filter(|ah| ah.container() == container && ah.is_expanded())
                .find(|ah| self.auto_hide_rect(ah.id()).is_some_and(|r| r.contains(point)))
                .map(|ah| ah.area());

            match overlay_area {
                Some(area) => self.area_press_target(area, point)?,
                None => match self.splitter_handle_at(container, point) {
                    Some((splitter, handle)) => PressTarget::SplitterHandle {
                        container,
                        splitter,
                        handle,
                    },
                    None => {
                        let area = self.dock_area_at(container, point)?;
                        self.area_press_target(area, point)?
                    }
                },
            }
        };

        self.press(target, point).ok()?;
        Some(target)
    }

    fn area_press_target(&self, area: AreaId, point: Vec2) -> Option<PressTarget> {
        if let Some((_, widget)) = self.tab_at(area, point) {
            return Some(PressTarget::Tab(widget));
        }
        self.area_title_bar_rect(area)
            .filter(|r| r.contains(point))
            .map(|_| PressTarget::TitleBar(area))
    }

    /// Feed a pointer move.
    pub fn pointer_moved(&mut self, point: Vec2) {
        profile_function!();
        match self.drag.phase() {
            DragPhase::Inactive => return,
            DragPhase::Pressed => {
                if !DragController::exceeds_threshold(self.drag.origin, point, self.config.drag_threshold) {
                    return;
                }
                self.begin_drag(point);
            }
            DragPhase::DraggingTab => self.update_tab_drag(point),
            DragPhase::DraggingFloating => self.update_floating_drag(point),
            DragPhase::ResizingSplitter => self.update_splitter_drag(point),
        }
        self.drag.last = point;
    }

    fn begin_drag(&mut self, point: Vec2) {
        let Some(press) = self.drag.press else {
            self.drag = DragController::default();
            return;
        };

        match press {
            PressTarget::SplitterHandle { .. } => {
                self.drag.phase = DragPhase::ResizingSplitter;
                self.update_splitter_drag(point);
            }
            PressTarget::FloatingTitleBar(floating) => {
                self.start_floating_drag(DragSource::Floating(floating), point);
            }
            PressTarget::TitleBar(area) => {
                if !self.area_features(area).contains(DockWidgetFeatures::MOVABLE) {
                    tracing::trace!("{} is not movable", area);
                    self.drag = DragController::default();
                    return;
                }
                let source = self.area_drag_source(area);
                self.start_floating_drag(source, point);
            }
            PressTarget::Tab(widget) => {
                if !self
                    .effective_features(widget)
                    .contains(DockWidgetFeatures::MOVABLE)
                {
                    tracing::trace!("{} is not movable", widget);
                    self.drag = DragController::default();
                    return;
                }
                let Some(area_id) = self.widget_area(widget) else {
                    self.drag = DragController::default();
                    return;
                };
                let open = self
                    .areas
                    .get(&area_id)
                    .map(|a| a.open_count(&self.widgets))
                    .unwrap_or(0);
                let in_strip = self
                    .area_title_bar_rect(area_id)
                    .is_some_and(|r| r.contains(point));

                if open <= 1 {
                    // Moving the only tab moves the whole area.
                    let source = self.area_drag_source(area_id);
                    self.start_floating_drag(source, point);
                } else if in_strip {
                    let from = self
                        .areas
                        .get(&area_id)
                        .and_then(|a| a.tab_widgets(&self.widgets).iter().position(|w| *w == widget));
                    self.drag.phase = DragPhase::DraggingTab;
                    self.drag.tab_area = Some(area_id);
                    self.drag.tab_from = from;
                    self.update_tab_drag(point);
                } else {
                    self.start_floating_drag(DragSource::Widget(widget), point);
                }
            }
        }
    }

    /// An area alone in a floating window drags the window itself.
    fn area_drag_source(&self, area: AreaId) -> DragSource {
        match self.sole_floating_area(area) {
            Some(floating) => DragSource::Floating(floating),
            None => DragSource::Area(area),
        }
    }

    fn start_floating_drag(&mut self, source: DragSource, point: Vec2) {
        self.drag.phase = DragPhase::DraggingFloating;
        self.drag.source = Some(source);
        self.drag.tab_area = None;
        self.drag.tab_from = None;
        self.drag.tab_to = None;

        match source {
            DragSource::Floating(floating) => {
                self.drag.floating_origin = self.floating.get(&floating).map(|f| f.geometry());
                if let Err(e) = self.raise_floating(floating) {
                    tracing::debug!("Could not raise {} for drag: {}", floating, e);
                }
            }
            DragSource::Widget(_) | DragSource::Area(_) => {
                let area = match source {
                    DragSource::Widget(widget) => self.widget_area(widget),
                    DragSource::Area(area) => Some(area),
                    DragSource::Floating(_) => None,
                };
                let size = area
                    .and_then(|a| self.areas.get(&a))
                    .map(|a| a.rect().size())
                    .filter(|s| s.width > 0.0 && s.height > 0.0)
                    .unwrap_or(self.config.floating_default_size);
                let size = Size::new(
                    size.width.min(self.config.floating_default_size.width),
                    size.height.min(self.config.floating_default_size.height),
                );
                self.drag.grab_offset =
                    Vec2::new(size.width / 2.0, self.config.floating_title_bar_height / 2.0);
                self.drag.ghost = Some(Rect::from_origin_size(self.drag.origin - self.drag.grab_offset, size));
            }
        }
        tracing::debug!("Started floating drag of {:?}", source);
        self.update_floating_drag(point);
    }

    fn update_floating_drag(&mut self, point: Vec2) {
        let Some(source) = self.drag.source else {
            return;
        };

        match source {
            DragSource::Floating(floating) => {
                let delta = point - self.drag.last;
                if delta != Vec2::ZERO {
                    if let Err(e) = self.move_floating(floating, delta) {
                        tracing::trace!("Skipped moving {}: {}", floating, e);
                    }
                }
            }
            DragSource::Widget(_) | DragSource::Area(_) => {
                if let Some(ghost) = self.drag.ghost {
                    self.drag.ghost = Some(Rect::from_origin_size(point - self.drag.grab_offset, ghost.size()));
                }
            }
        }

        let target = self.resolve_drop_target(point, source);
        if target != self.drag.target {
            tracing::trace!("Drop target {:?}", target);
            self.drag.target = target;
        }
    }

    fn update_tab_drag(&mut self, point: Vec2) {
        let Some(area) = self.drag.tab_area else {
            return;
        };
        let in_strip = self
            .area_title_bar_rect(area)
            .is_some_and(|r| r.contains(point));

        if in_strip {
            self.drag.tab_to = Some(self.tab_insert_index(area, point));
        } else if let Some(PressTarget::Tab(widget)) = self.drag.press {
            // Leaving the strip tears the tab off.
            tracing::trace!("Tab of {} left the strip", widget);
            self.start_floating_drag(DragSource::Widget(widget), point);
        }
    }

    fn update_splitter_drag(&mut self, point: Vec2) {
        let Some(PressTarget::SplitterHandle {
            container,
            splitter,
            handle,
        }) = self.drag.press
        else {
            return;
        };
        let Some(orientation) = self
            .containers
            .get(&container)
            .and_then(|c| c.layout.node(splitter))
            .and_then(|n| n.as_splitter())
            .map(|s| s.orientation)
        else {
            return;
        };

        let delta = if orientation.is_horizontal() {
            point.x - self.drag.last.x
        } else {
            point.y - self.drag.last.y
        };
        if delta != 0.0
            && let Ok(applied) = self.resize_splitter(container, splitter, handle, delta)
        {
            self.drag.resized_by += applied;
        }
    }

    /// Release the button at `point`, committing the gesture.
    pub fn release(&mut self, point: Vec2) -> DropOutcome {
        profile_function!();
        if self.drag.is_dragging() {
            self.pointer_moved(point);
        }

        let outcome = match self.drag.phase() {
            DragPhase::Inactive => DropOutcome::Ignored,
            DragPhase::Pressed => {
                if let Some(PressTarget::Tab(widget)) = self.drag.press {
                    if let Err(e) = self.activate_widget(widget) {
                        tracing::debug!("Tab click on {} not activated: {}", widget, e);
                    }
                }
                DropOutcome::Clicked
            }
            DragPhase::DraggingTab => self.commit_tab_drag(),
            DragPhase::DraggingFloating => self.commit_floating_drag(),
            DragPhase::ResizingSplitter => DropOutcome::Resized,
        };

        self.drag = DragController::default();
        outcome
    }

    fn commit_tab_drag(&mut self) -> DropOutcome {
        let (Some(area), Some(from), Some(to)) = (self.drag.tab_area, self.drag.tab_from, self.drag.tab_to) else {
            return DropOutcome::Ignored;
        };
        match self.move_tab(area, from, to) {
            Ok(true) => DropOutcome::Reordered { area, from, to },
            _ => DropOutcome::Ignored,
        }
    }

    fn commit_floating_drag(&mut self) -> DropOutcome {
        let Some(source) = self.drag.source else {
            return DropOutcome::Rejected;
        };

        let Some(target) = self.drag.target else {
            // Released in empty space: the content becomes (or stays) floating.
            let ghost = self.drag.ghost;
            let result = match source {
                DragSource::Floating(floating) => Ok(floating),
                DragSource::Widget(widget) => self.float_widget(widget, ghost),
                DragSource::Area(area) => self.float_area(area, ghost),
            };
            return match result {
                Ok(floating) => DropOutcome::Floated(floating),
                Err(e) => {
                    tracing::warn!("Floating {:?} rejected: {}", source, e);
                    DropOutcome::Rejected
                }
            };
        };

        let result = match source {
            DragSource::Widget(widget) => match target.area {
                Some(area) => self
                    .add_widget(widget, target.zone, Some(area), target.insert_index)
                    .map(|_| ()),
                None => self
                    .add_widget_to_container(target.container, widget, target.zone)
                    .map(|_| ()),
            },
            DragSource::Area(area) => self.move_area(area, target.container, target.zone, target.area),
            DragSource::Floating(floating) => {
                self.drop_floating(floating, target.container, target.zone, target.area)
            }
        };

        match result {
            Ok(()) => {
                tracing::debug!("Dropped {:?} on {:?}", source, target);
                DropOutcome::Docked(target)
            }
            Err(e) => {
                tracing::warn!("Drop of {:?} rejected: {}", source, e);
                DropOutcome::Rejected
            }
        }
    }

    /// Abort the current gesture (Escape). Returns false when none was active.
    ///
    /// A dragged floating window returns to where it started, a resized
    /// splitter to its previous sizes.
    pub fn cancel_drag(&mut self) -> bool {
        let drag = std::mem::take(&mut self.drag);
        if drag.phase() == DragPhase::Inactive {
            return false;
        }

        if let (Some(DragSource::Floating(floating)), Some(origin)) = (drag.source, drag.floating_origin) {
            if let Err(e) = self.set_floating_geometry(floating, origin) {
                tracing::debug!("Could not restore {} geometry: {}", floating, e);
            }
        }
        if let Some(PressTarget::SplitterHandle {
            container,
            splitter,
            handle,
        }) = drag.press
            && drag.resized_by != 0.0
        {
            if let Err(e) = self.resize_splitter(container, splitter, handle, -drag.resized_by) {
                tracing::debug!("Could not restore splitter {:?} sizes: {}", splitter, e);
            }
        }
        tracing::debug!("Drag cancelled in {:?}", drag.phase());
        true
    }
}
