//! Error types for dock operations.

use std::fmt;

use crate::types::{AreaId, AutoHideId, ContainerId, DockZone, FloatingId, WidgetId};
use crate::widget::DockWidgetFeatures;

/// Errors returned by docking operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockError {
    /// Widget handle is not registered.
    WidgetNotFound(WidgetId),
    /// Area handle does not exist.
    AreaNotFound(AreaId),
    /// Container handle does not exist.
    ContainerNotFound(ContainerId),
    /// Floating window handle does not exist.
    FloatingNotFound(FloatingId),
    /// Auto-hide handle does not exist.
    AutoHideNotFound(AutoHideId),
    /// A widget with this name is already registered.
    DuplicateWidgetName(String),
    /// The widget (or every widget of an area) lacks a required feature.
    FeatureMissing {
        widget: Option<WidgetId>,
        area: Option<AreaId>,
        feature: DockWidgetFeatures,
    },
    /// The target does not accept the requested zone.
    ZoneNotAllowed(DockZone),
    /// The only visible content of a floating window cannot be floated again.
    SoleFloatingContent(FloatingId),
    /// Auto-hide side bars only exist on the main container.
    AutoHideInFloating(ContainerId),
    /// The widget is not part of any area.
    WidgetUnassigned(WidgetId),
    /// The requested drop would leave the layout unchanged or target the source itself.
    InvalidDropTarget,
}

impl fmt::Display for DockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockError::WidgetNotFound(id) => write!(f, "Widget {} not found", id),
            DockError::AreaNotFound(id) => write!(f, "Area {} not found", id),
            DockError::ContainerNotFound(id) => write!(f, "Container {} not found", id),
            DockError::FloatingNotFound(id) => write!(f, "Floating window {} not found", id),
            DockError::AutoHideNotFound(id) => write!(f, "Auto-hide container {} not found", id),
            DockError::DuplicateWidgetName(name) => {
                write!(f, "A dock widget named '{}' is already registered", name)
            }
            DockError::FeatureMissing {
                widget,
                area,
                feature,
            } => match (widget, area) {
                (Some(widget), _) => write!(f, "Widget {} lacks feature {:?}", widget, feature),
                (None, Some(area)) => write!(f, "Area {} lacks feature {:?}", area, feature),
                (None, None) => write!(f, "Missing feature {:?}", feature),
            },
            DockError::ZoneNotAllowed(zone) => write!(f, "Drop zone {:?} is not allowed", zone),
            DockError::SoleFloatingContent(id) => write!(
                f,
                "The only visible area of floating window {} cannot be floated",
                id
            ),
            DockError::AutoHideInFloating(id) => write!(
                f,
                "Container {} is floating and has no auto-hide side bars",
                id
            ),
            DockError::WidgetUnassigned(id) => write!(f, "Widget {} is not docked", id),
            DockError::InvalidDropTarget => write!(f, "Invalid drop target"),
        }
    }
}

impl std::error::Error for DockError {}

/// Result type for dock operations.
pub type DockResult<T> = Result<T, DockError>;

/// Why a saved layout was not applied. The live layout is untouched in
/// every case.
#[derive(Debug)]
pub enum RestoreError {
    /// The document was written by an incompatible codec.
    VersionMismatch { found: u32, expected: u32 },
    /// The application's own layout version differs.
    UserVersionMismatch { found: u32, expected: u32 },
    /// The text is not a layout document (includes missing attributes).
    Parse(String),
    /// No container is marked as the main container.
    MissingMainContainer,
    /// More than one container claims to be the main container.
    MultipleMainContainers,
    /// A splitter's declared child count disagrees with its children.
    ChildCountMismatch { declared: usize, actual: usize },
    /// A splitter's size list length disagrees with its child count.
    SizeCountMismatch { sizes: usize, children: usize },
    /// A size entry is not a non-negative number.
    InvalidSize(String),
    /// A splitter without children.
    EmptySplitter,
    /// An area's declared tab count disagrees with its tabs.
    TabCountMismatch { declared: usize, actual: usize },
    /// The same widget appears twice.
    DuplicateWidget(String),
    /// No perspective with this name is stored.
    UnknownPerspective(String),
    Io(std::io::Error),
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreError::VersionMismatch { found, expected } => write!(
                f,
                "Layout format version {} is not supported (expected {})",
                found, expected
            ),
            RestoreError::UserVersionMismatch { found, expected } => write!(
                f,
                "Layout version {} does not match application version {}",
                found, expected
            ),
            RestoreError::Parse(msg) => write!(f, "Malformed layout document: {}", msg),
            RestoreError::MissingMainContainer => write!(f, "Layout has no main container"),
            RestoreError::MultipleMainContainers => {
                write!(f, "Layout has more than one main container")
            }
            RestoreError::ChildCountMismatch { declared, actual } => write!(
                f,
                "Splitter declares {} children but has {}",
                declared, actual
            ),
            RestoreError::SizeCountMismatch { sizes, children } => write!(
                f,
                "Splitter has {} sizes for {} children",
                sizes, children
            ),
            RestoreError::InvalidSize(value) => write!(f, "Invalid splitter size '{}'", value),
            RestoreError::EmptySplitter => write!(f, "Splitter without children"),
            RestoreError::TabCountMismatch { declared, actual } => {
                write!(f, "Area declares {} tabs but has {}", declared, actual)
            }
            RestoreError::DuplicateWidget(name) => {
                write!(f, "Widget '{}' appears more than once", name)
            }
            RestoreError::UnknownPerspective(name) => write!(f, "No perspective named '{}'", name),
            RestoreError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for RestoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RestoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RestoreError {
    fn from(e: std::io::Error) -> Self {
        RestoreError::Io(e)
    }
}

impl From<serde_json::Error> for RestoreError {
    fn from(e: serde_json::Error) -> Self {
        RestoreError::Parse(e.to_string())
    }
}
