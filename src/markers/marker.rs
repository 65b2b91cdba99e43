//! Marker primitives.
//!
//! A line owns two *physical* markers, `M1` and `M2`. Which of the two is the
//! left boundary changes as they are dragged past each other; the rendering
//! style and feet migrate between the physical markers instead of the markers
//! swapping places, so handles held by an in-progress drag stay valid.

use serde::{Deserialize, Serialize};

/// Which sides of a marker carry the triangular foot ornament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryFeet {
    None,
    Left,
    Right,
    Both,
}

impl BoundaryFeet {
    #[must_use]
    pub fn has_left(self) -> bool {
        matches!(self, BoundaryFeet::Left | BoundaryFeet::Both)
    }

    #[must_use]
    pub fn has_right(self) -> bool {
        matches!(self, BoundaryFeet::Right | BoundaryFeet::Both)
    }
}

/// Rendering style reference resolved to concrete colours by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerStyle {
    BoundaryStart,
    BoundaryEnd,
    BoundaryInactive,
    Keyframe,
    VideoPosition,
}

/// One physical boundary marker of a timeable line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryMarker {
    pub position: i64,
    pub style: MarkerStyle,
    pub feet: BoundaryFeet,
}

/// Snapshot of a marker handed to views for painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerView {
    pub time_ms: i64,
    pub style: MarkerStyle,
    pub feet: BoundaryFeet,
}

/// Identifies one of the two physical markers of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkerSlot {
    M1,
    M2,
}

impl MarkerSlot {
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            MarkerSlot::M1 => 0,
            MarkerSlot::M2 => 1,
        }
    }

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            MarkerSlot::M1 => MarkerSlot::M2,
            MarkerSlot::M2 => MarkerSlot::M1,
        }
    }
}

/// Identifies a timeable line tracked by the controller.
///
/// Companion slots are positions in the companion collection; the collection
/// and the marker index are always rebuilt together, so slots in the index
/// never dangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineSlot {
    Active,
    Companion(usize),
}

/// Stable physical identity of a marker, used by drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerHandle {
    pub line: LineSlot,
    pub slot: MarkerSlot,
}

impl MarkerHandle {
    #[must_use]
    pub fn new(line: LineSlot, slot: MarkerSlot) -> Self {
        Self { line, slot }
    }
}
