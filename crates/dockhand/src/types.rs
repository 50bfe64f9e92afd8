//! Shared types for the docking engine.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Handle of a registered dock widget.
    WidgetId,
    "widget"
);
define_id!(
    /// Handle of a dock area (tab group).
    AreaId,
    "area"
);
define_id!(
    /// Handle of a dock container (main window or floating window content).
    ContainerId,
    "container"
);
define_id!(
    /// Handle of a floating top-level window.
    FloatingId,
    "floating"
);
define_id!(
    /// Handle of an auto-hide overlay attached to a side bar.
    AutoHideId,
    "auto-hide"
);

/// Node identifier inside one container's layout tree.
///
/// Node ids are only meaningful together with the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Axis along which a splitter lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Children arranged left-to-right.
    #[default]
    Horizontal,
    /// Children arranged top-to-bottom.
    Vertical,
}

impl Orientation {
    pub fn perpendicular(&self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Orientation::Horizontal)
    }
}

/// Drop zone relative to a target area or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockZone {
    Top,
    Left,
    Right,
    Bottom,
    /// Tabbed into the target.
    Center,
}

impl DockZone {
    pub const ALL: [DockZone; 5] = [
        DockZone::Top,
        DockZone::Left,
        DockZone::Right,
        DockZone::Bottom,
        DockZone::Center,
    ];

    /// Splitter orientation needed to place content in this zone.
    ///
    /// `None` for [`DockZone::Center`], which adds a tab instead of splitting.
    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            DockZone::Left | DockZone::Right => Some(Orientation::Horizontal),
            DockZone::Top | DockZone::Bottom => Some(Orientation::Vertical),
            DockZone::Center => None,
        }
    }

    /// True when new content lands before the existing content.
    pub fn is_before(&self) -> bool {
        matches!(self, DockZone::Left | DockZone::Top)
    }

    pub fn flag(&self) -> DockZones {
        match self {
            DockZone::Top => DockZones::TOP,
            DockZone::Left => DockZones::LEFT,
            DockZone::Right => DockZones::RIGHT,
            DockZone::Bottom => DockZones::BOTTOM,
            DockZone::Center => DockZones::CENTER,
        }
    }
}

bitflags! {
    /// Set of drop zones a target accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DockZones: u8 {
        const TOP = 1 << 0;
        const LEFT = 1 << 1;
        const RIGHT = 1 << 2;
        const BOTTOM = 1 << 3;
        const CENTER = 1 << 4;

        const OUTER = Self::TOP.bits() | Self::LEFT.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits();
        const ALL = Self::OUTER.bits() | Self::CENTER.bits();
    }
}

impl DockZones {
    pub fn allows(&self, zone: DockZone) -> bool {
        self.contains(zone.flag())
    }
}

impl Default for DockZones {
    fn default() -> Self {
        DockZones::ALL
    }
}

/// Edge of a container that hosts a side bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideBarLocation {
    Top,
    Left,
    Right,
    Bottom,
}

impl SideBarLocation {
    pub const ALL: [SideBarLocation; 4] = [
        SideBarLocation::Top,
        SideBarLocation::Left,
        SideBarLocation::Right,
        SideBarLocation::Bottom,
    ];

    /// Container edge zone used when content leaves the side bar.
    pub fn dock_zone(&self) -> DockZone {
        match self {
            SideBarLocation::Top => DockZone::Top,
            SideBarLocation::Left => DockZone::Left,
            SideBarLocation::Right => DockZone::Right,
            SideBarLocation::Bottom => DockZone::Bottom,
        }
    }

    /// Side bars on the left and right edges stack their tabs vertically.
    pub fn is_vertical(&self) -> bool {
        matches!(self, SideBarLocation::Left | SideBarLocation::Right)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            SideBarLocation::Top => 0,
            SideBarLocation::Left => 1,
            SideBarLocation::Right => 2,
            SideBarLocation::Bottom => 3,
        }
    }
}
