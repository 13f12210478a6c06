//! Canonical connection patterns, and finding the rotation that maps one connection mask
//! onto another.
//!
//! A room template is authored with one orientation, but can be rotated about the
//! vertical axis to fit any cell whose connections are a rotation of the template's.
//! The horizontal masks with one to three openings fall into four rotation classes,
//! listed in [`ConnectionClass`]. Within a class, each slot is the previous slot turned
//! a quarter turn clockwise, so the difference between two slots is the rotation
//! between them.

use crate::math::{DirectionMask, Rotation};

const F: DirectionMask = DirectionMask::FORWARD;
const R: DirectionMask = DirectionMask::RIGHT;
const B: DirectionMask = DirectionMask::BACK;
const L: DirectionMask = DirectionMask::LEFT;

/// A rotation-equivalence class of horizontal connection masks.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, exhaust::Exhaust, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConnectionClass {
    /// One opening: a dead end.
    One,
    /// Two opposite openings: a straight passage.
    Line,
    /// Two adjacent openings: a corner.
    Corner,
    /// Three openings: a T-junction.
    Three,
}

impl ConnectionClass {
    /// All classes, in the order they are searched.
    pub const ALL: [Self; 4] = [Self::One, Self::Line, Self::Corner, Self::Three];

    /// Returns the members of this class, each a clockwise quarter turn from the one
    /// before it.
    pub const fn members(self) -> &'static [DirectionMask] {
        match self {
            Self::One => &ONE,
            Self::Line => &LINE,
            Self::Corner => &CORNER,
            Self::Three => &THREE,
        }
    }
}

const ONE: [DirectionMask; 4] = [F, R, B, L];
// Only two distinct members, since a half turn maps each onto itself.
const LINE: [DirectionMask; 2] = [F.union(B), L.union(R)];
const CORNER: [DirectionMask; 4] = [F.union(R), R.union(B), B.union(L), L.union(F)];
const THREE: [DirectionMask; 4] = [
    F.union(R).union(B),
    R.union(B).union(L),
    B.union(L).union(F),
    L.union(F).union(R),
];

/// The position of a mask within the canonical patterns.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PatternSlot {
    /// The class the mask belongs to.
    pub class: ConnectionClass,
    /// The index of the mask within [`ConnectionClass::members()`].
    pub slot: usize,
}

/// Returns the class and slot that `mask` occupies among the canonical patterns.
///
/// Only masks with one to three horizontal openings and no vertical openings are found.
/// Any other mask, including the empty mask and the four-way crossing, returns [`None`].
pub fn classify(mask: DirectionMask) -> Option<PatternSlot> {
    ConnectionClass::ALL.into_iter().find_map(|class| {
        class
            .members()
            .iter()
            .position(|&member| member == mask)
            .map(|slot| PatternSlot { class, slot })
    })
}

/// Returns the rotation which, applied to `target`, produces `source`, if both masks
/// are in the same class of canonical patterns.
///
/// The rotation is the difference between the slots of `source` and `target`, and is
/// not normalized: it may be negative, and it is −1 rather than +1 quarter turns when
/// `source` is [`ConnectionClass::Line`] slot 0 and `target` is slot 1.
///
/// ```
/// use genblocks::math::{DirectionMask, Rotation};
/// use genblocks::pattern::find_rotation;
///
/// let rotation = find_rotation(DirectionMask::RIGHT, DirectionMask::FORWARD);
/// assert_eq!(rotation, Some(Rotation::from_quarter_turns(1)));
/// assert_eq!(find_rotation(DirectionMask::RIGHT, DirectionMask::RIGHT | DirectionMask::LEFT), None);
/// ```
pub fn find_rotation(source: DirectionMask, target: DirectionMask) -> Option<Rotation> {
    let PatternSlot { class, slot } = classify(source)?;
    let target_slot = class.members().iter().position(|&member| member == target)?;
    #[allow(clippy::cast_possible_wrap, reason = "slots are at most 3")]
    let turns = slot as i32 - target_slot as i32;
    Some(Rotation::from_quarter_turns(turns))
}

/// Removes [`DirectionMask::UP`] and [`DirectionMask::DOWN`] from both masks, but only
/// the ones that both masks have.
///
/// A vertical opening present on only one side is kept, so that the masks cannot be
/// matched by [`find_rotation()`]: a cell needing stairs never gets a template without
/// them, and vice versa.
pub fn strip_shared_vertical(
    a: DirectionMask,
    b: DirectionMask,
) -> (DirectionMask, DirectionMask) {
    let shared = a.vertical() & b.vertical();
    (a - shared, b - shared)
}
