//! Parametric boundary sides of a patch.

use std::fmt;

/// One side of a patch's parametric domain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BoundarySide {
    /// `u = u_min`
    Left,
    /// `u = u_max`
    Right,
    /// `v = v_min`
    Bottom,
    /// `v = v_max`
    Top,
    /// `w = w_min`
    Front,
    /// `w = w_max`
    Back,
}

impl BoundarySide {
    /// All sides, in direction order.
    pub const ALL: [BoundarySide; 6] = [
        BoundarySide::Left,
        BoundarySide::Right,
        BoundarySide::Bottom,
        BoundarySide::Top,
        BoundarySide::Front,
        BoundarySide::Back,
    ];

    /// Parametric direction normal to the side.
    pub fn direction(self) -> usize {
        match self {
            BoundarySide::Left | BoundarySide::Right => 0,
            BoundarySide::Bottom | BoundarySide::Top => 1,
            BoundarySide::Front | BoundarySide::Back => 2,
        }
    }

    /// Whether the side sits at the maximum parameter value.
    pub fn is_max(self) -> bool {
        matches!(
            self,
            BoundarySide::Right | BoundarySide::Top | BoundarySide::Back
        )
    }
}

impl fmt::Display for BoundarySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
