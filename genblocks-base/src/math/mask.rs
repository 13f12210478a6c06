//! Sets of directions: the [`DirectionMask`] type.
//! This module is private but reexported by its parent.

use core::fmt;

use crate::math::Direction;

bitflags::bitflags! {
    /// A set of [`Direction`]s, used to describe which sides of a cell are open,
    /// carved, or supported by a room template.
    ///
    /// It is a [`bitflags`] generated bit-flag type. The bit values are fixed, since they
    /// are shared with layouts authored for other tools: `LEFT` is bit 0 and each following
    /// constant is the next bit, in the same order as [`Direction::ALL`].
    ///
    /// The [empty](Self::empty) set describes an isolated cell.
    #[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct DirectionMask: u8 {
        /// Open toward −X.
        const LEFT = 1 << 0;
        /// Open toward +X.
        const RIGHT = 1 << 1;
        /// Open toward +Z.
        const FORWARD = 1 << 2;
        /// Open toward −Z.
        const BACK = 1 << 3;
        /// Open toward the floor above.
        const UP = 1 << 4;
        /// Open toward the floor below.
        const DOWN = 1 << 5;
    }
}

impl DirectionMask {
    /// The four directions within a floor.
    pub const HORIZONTAL: Self = Self::LEFT
        .union(Self::RIGHT)
        .union(Self::FORWARD)
        .union(Self::BACK);

    /// The two directions leading to other floors.
    pub const VERTICAL: Self = Self::UP.union(Self::DOWN);

    /// Returns whether no direction is open.
    #[inline]
    pub const fn is_isolated(self) -> bool {
        self.is_empty()
    }

    /// Returns only the horizontal directions in this mask.
    #[inline]
    #[must_use]
    pub const fn horizontal(self) -> Self {
        self.intersection(Self::HORIZONTAL)
    }

    /// Returns only the vertical directions in this mask.
    #[inline]
    #[must_use]
    pub const fn vertical(self) -> Self {
        self.intersection(Self::VERTICAL)
    }

    /// Returns the number of directions in this mask.
    #[inline]
    pub const fn opening_count(self) -> u32 {
        self.bits().count_ones()
    }

    /// Returns whether `direction` is in this mask.
    #[inline]
    pub const fn has(self, direction: Direction) -> bool {
        self.contains(direction.mask())
    }

    /// Iterates over the directions in this mask, in the order of [`Direction::ALL`].
    #[inline]
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.has(d))
    }

    /// Rotates the horizontal part of this mask by `quarter_turns` clockwise quarter turns
    /// (seen from above); negative values turn counterclockwise.
    /// Vertical directions are unchanged.
    ///
    /// ```
    /// # extern crate genblocks_base as genblocks;
    /// use genblocks::math::DirectionMask;
    ///
    /// let corner = DirectionMask::FORWARD | DirectionMask::RIGHT;
    /// assert_eq!(corner.rotated_clockwise(1), DirectionMask::RIGHT | DirectionMask::BACK);
    /// assert_eq!(corner.rotated_clockwise(-1), DirectionMask::LEFT | DirectionMask::FORWARD);
    /// ```
    #[inline]
    #[must_use]
    pub fn rotated_clockwise(self, quarter_turns: i32) -> Self {
        let turns = quarter_turns.rem_euclid(4);
        self.directions()
            .map(|d| {
                let mut d = d;
                for _ in 0..turns {
                    d = d.clockwise();
                }
                d.mask()
            })
            .collect()
    }
}

impl From<Direction> for DirectionMask {
    #[inline]
    fn from(direction: Direction) -> Self {
        direction.mask()
    }
}

impl FromIterator<Direction> for DirectionMask {
    #[inline]
    fn from_iter<T: IntoIterator<Item = Direction>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |mask, d| mask.union(d.mask()))
    }
}

impl fmt::Display for DirectionMask {
    /// Displays the flags as text like “`FORWARD | RIGHT`”, the same syntax that
    /// [`str::parse`] accepts.
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for DirectionMask {
    type Err = bitflags::parser::ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        bitflags::parser::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exhaust::Exhaust as _;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::string::ToString;
    use std::vec::Vec;

    #[test]
    fn horizontal_and_vertical_partition() {
        assert_eq!(DirectionMask::HORIZONTAL | DirectionMask::VERTICAL, DirectionMask::all());
        assert!((DirectionMask::HORIZONTAL & DirectionMask::VERTICAL).is_empty());
        let m = DirectionMask::LEFT | DirectionMask::UP;
        assert_eq!(m.horizontal(), DirectionMask::LEFT);
        assert_eq!(m.vertical(), DirectionMask::UP);
    }

    #[test]
    fn isolated_iff_empty() {
        assert!(DirectionMask::empty().is_isolated());
        for d in Direction::exhaust() {
            assert!(!DirectionMask::from(d).is_isolated());
        }
    }

    #[test]
    fn directions_round_trip() {
        let m = DirectionMask::RIGHT | DirectionMask::BACK | DirectionMask::DOWN;
        let dirs: Vec<Direction> = m.directions().collect();
        assert_eq!(dirs, vec![Direction::Right, Direction::Back, Direction::Down]);
        assert_eq!(dirs.into_iter().collect::<DirectionMask>(), m);
        assert_eq!(m.opening_count(), 3);
    }

    #[rstest]
    #[case(DirectionMask::FORWARD, 1, DirectionMask::RIGHT)]
    #[case(DirectionMask::FORWARD, 2, DirectionMask::BACK)]
    #[case(DirectionMask::FORWARD, 3, DirectionMask::LEFT)]
    #[case(DirectionMask::FORWARD, 4, DirectionMask::FORWARD)]
    #[case(DirectionMask::FORWARD, -1, DirectionMask::LEFT)]
    #[case(DirectionMask::LEFT | DirectionMask::RIGHT, 1, DirectionMask::FORWARD | DirectionMask::BACK)]
    #[case(DirectionMask::FORWARD | DirectionMask::UP, 2, DirectionMask::BACK | DirectionMask::UP)]
    fn rotation_cases(
        #[case] mask: DirectionMask,
        #[case] turns: i32,
        #[case] expected: DirectionMask,
    ) {
        assert_eq!(mask.rotated_clockwise(turns), expected);
    }

    #[test]
    fn text_form() {
        let m = DirectionMask::FORWARD | DirectionMask::RIGHT;
        assert_eq!(m.to_string(), "RIGHT | FORWARD");
        assert_eq!("FORWARD | RIGHT".parse::<DirectionMask>().ok(), Some(m));
        assert_eq!("".parse::<DirectionMask>().ok(), Some(DirectionMask::empty()));
        assert!("SIDEWAYS".parse::<DirectionMask>().is_err());
    }
}
