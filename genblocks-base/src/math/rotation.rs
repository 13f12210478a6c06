//! Rotations about the vertical axis.
//! This module is private but reexported by its parent.

use core::fmt;

use crate::math::DirectionMask;

/// A rotation about the vertical (Y) axis by a whole number of quarter turns.
///
/// Positive values are clockwise as seen from above, so a rotation of one quarter turn
/// takes [`Direction::Forward`](crate::math::Direction::Forward) to
/// [`Direction::Right`](crate::math::Direction::Right).
///
/// The number of turns is kept as given rather than reduced modulo 4, so that a
/// rotation computed as a difference of two pattern slots keeps its sign.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Rotation {
    quarter_turns: i32,
}

impl Rotation {
    /// The rotation that leaves everything unchanged.
    pub const IDENTITY: Self = Self { quarter_turns: 0 };

    /// Constructs a rotation by the given number of clockwise quarter turns.
    #[inline]
    pub const fn from_quarter_turns(quarter_turns: i32) -> Self {
        Self { quarter_turns }
    }

    /// Returns the rotation angle in degrees; for example, −1 quarter turn is −90.
    #[inline]
    pub const fn degrees(self) -> i32 {
        self.quarter_turns.saturating_mul(90)
    }

    /// Rotates a mask, leaving its vertical directions unchanged.
    ///
    /// ```
    /// # extern crate genblocks_base as genblocks;
    /// use genblocks::math::{DirectionMask, Rotation};
    ///
    /// let r = Rotation::from_quarter_turns(-1);
    /// assert_eq!(r.degrees(), -90);
    /// assert_eq!(r.apply(DirectionMask::RIGHT), DirectionMask::FORWARD);
    /// ```
    #[inline]
    pub fn apply(self, mask: DirectionMask) -> DirectionMask {
        mask.rotated_clockwise(self.quarter_turns)
    }
}

impl fmt::Display for Rotation {
    /// Formats the rotation as degrees, like `-90°`.
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}
