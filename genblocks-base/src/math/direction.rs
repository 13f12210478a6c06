//! Axis-aligned directions out of a cell: the [`Direction`] and [`DirectionMap`] types.
//! This module is private but reexported by its parent.

use core::ops;

use crate::math::{DirectionMask, GridCoordinate, GridVector};

/// One of the six axis-aligned directions in which a cell may connect to a neighbor.
///
/// The axis convention is that of the host editors this library is driven from:
/// [`Left`](Self::Left) is −X, [`Right`](Self::Right) is +X,
/// [`Forward`](Self::Forward) is +Z, [`Back`](Self::Back) is −Z,
/// [`Up`](Self::Up) is +Y, and [`Down`](Self::Down) is −Y.
///
/// Seen from above, the horizontal directions in clockwise order are
/// Forward, Right, Back, Left; see [`Direction::HORIZONTAL_CLOCKWISE`].
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd, exhaust::Exhaust)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Direction {
    /// Negative X.
    Left = 0,
    /// Positive X.
    Right = 1,
    /// Positive Z.
    Forward = 2,
    /// Negative Z.
    Back = 3,
    /// Positive Y; toward the floor above.
    Up = 4,
    /// Negative Y; toward the floor below.
    Down = 5,
}

impl Direction {
    /// All the values of [`Direction`], in the order of their mask bits.
    pub const ALL: [Direction; 6] = [
        Direction::Left,
        Direction::Right,
        Direction::Forward,
        Direction::Back,
        Direction::Up,
        Direction::Down,
    ];

    /// The four horizontal directions, in clockwise order starting from
    /// [`Forward`](Self::Forward).
    ///
    /// This ordering defines the slots of the canonical connection patterns, so that
    /// moving one slot later is one clockwise quarter turn.
    pub const HORIZONTAL_CLOCKWISE: [Direction; 4] = [
        Direction::Forward,
        Direction::Right,
        Direction::Back,
        Direction::Left,
    ];

    /// Returns the opposite direction (maps [`Forward`](Self::Forward) to
    /// [`Back`](Self::Back) and so on).
    ///
    /// ```
    /// # extern crate genblocks_base as genblocks;
    /// use genblocks::math::Direction;
    ///
    /// for d in Direction::ALL {
    ///     assert_eq!(d.opposite().opposite(), d);
    /// }
    /// ```
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Forward => Direction::Back,
            Direction::Back => Direction::Forward,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Returns whether this direction lies in the horizontal plane of a floor.
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }

    /// Returns whether this direction leads to another floor.
    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Returns the direction a quarter turn clockwise from this one, seen from above.
    /// [`Up`](Self::Up) and [`Down`](Self::Down) are unchanged.
    #[inline]
    #[must_use]
    pub const fn clockwise(self) -> Direction {
        match self {
            Direction::Forward => Direction::Right,
            Direction::Right => Direction::Back,
            Direction::Back => Direction::Left,
            Direction::Left => Direction::Forward,
            Direction::Up => Direction::Up,
            Direction::Down => Direction::Down,
        }
    }

    /// Returns the single-bit [`DirectionMask`] for this direction.
    #[inline]
    pub const fn mask(self) -> DirectionMask {
        DirectionMask::from_bits_retain(1 << (self as u8))
    }

    /// Returns the axis-aligned unit vector pointing in this direction.
    #[inline]
    pub const fn offset(self) -> GridVector {
        let (x, y, z): (GridCoordinate, GridCoordinate, GridCoordinate) = match self {
            Direction::Left => (-1, 0, 0),
            Direction::Right => (1, 0, 0),
            Direction::Forward => (0, 0, 1),
            Direction::Back => (0, 0, -1),
            Direction::Up => (0, 1, 0),
            Direction::Down => (0, -1, 0),
        };
        GridVector::new(x, y, z)
    }
}

/// Container for values keyed by [`Direction`]s. Always holds exactly six elements.
///
/// The grid uses this to hold each cell's neighbor references.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct DirectionMap<V> {
    /// The value whose key is [`Direction::Left`].
    pub left: V,
    /// The value whose key is [`Direction::Right`].
    pub right: V,
    /// The value whose key is [`Direction::Forward`].
    pub forward: V,
    /// The value whose key is [`Direction::Back`].
    pub back: V,
    /// The value whose key is [`Direction::Up`].
    pub up: V,
    /// The value whose key is [`Direction::Down`].
    pub down: V,
}

#[allow(
    clippy::missing_inline_in_public_items,
    reason = "all methods are generic code"
)]
impl<V> DirectionMap<V> {
    /// Constructs a [`DirectionMap`] by using the provided function to compute
    /// a value for each [`Direction`].
    pub fn from_fn(mut f: impl FnMut(Direction) -> V) -> Self {
        Self {
            left: f(Direction::Left),
            right: f(Direction::Right),
            forward: f(Direction::Forward),
            back: f(Direction::Back),
            up: f(Direction::Up),
            down: f(Direction::Down),
        }
    }

    /// Iterate over the map's key-value pairs by reference, in the same order as
    /// [`Direction::ALL`].
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &V)> {
        Direction::ALL.iter().copied().map(move |d| (d, &self[d]))
    }
}

impl<V> DirectionMap<Option<V>> {
    /// Returns the mask of directions whose value is [`Some`].
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn present(&self) -> DirectionMask {
        self.iter()
            .filter(|(_, value)| value.is_some())
            .map(|(d, _)| d.mask())
            .collect()
    }
}

impl<V> ops::Index<Direction> for DirectionMap<V> {
    type Output = V;
    #[inline]
    fn index(&self, direction: Direction) -> &V {
        match direction {
            Direction::Left => &self.left,
            Direction::Right => &self.right,
            Direction::Forward => &self.forward,
            Direction::Back => &self.back,
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }
}

impl<V> ops::IndexMut<Direction> for DirectionMap<V> {
    #[inline]
    fn index_mut(&mut self, direction: Direction) -> &mut V {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::Forward => &mut self.forward,
            Direction::Back => &mut self.back,
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        }
    }
}
