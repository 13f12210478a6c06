//! Choosing a room template, and its rotation, for a cell's connections.

use alloc::vec::Vec;

use rand::Rng;
use rand::seq::IndexedRandom as _;

use crate::content::{ContentLibrary, ElevationRole, RoomTemplate, TemplateId};
use crate::math::{DirectionMask, GridCoordinate, Rotation};
use crate::pattern::{find_rotation, strip_shared_vertical};

/// A template that fits a cell, and how to turn it so that it does.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomChoice {
    /// The chosen template.
    pub template: TemplateId,
    /// The rotation which, applied to the template's connections, produces the cell's.
    pub rotation: Rotation,
}

/// Returns the rotation that makes `template` fit a cell with connections `mask`.
///
/// An exact match needs no rotation. Otherwise, vertical openings shared by both are
/// set aside and the remaining horizontal patterns are compared with
/// [`find_rotation()`].
pub fn fit(mask: DirectionMask, template: &RoomTemplate) -> Option<Rotation> {
    if template.connections == mask {
        return Some(Rotation::IDENTITY);
    }
    let (cell, candidate) = strip_shared_vertical(mask, template.connections);
    find_rotation(cell, candidate)
}

/// Finds the templates in a [`ContentLibrary`] that fit a cell.
#[derive(Clone, Copy, Debug)]
pub struct RoomResolver<'a> {
    library: &'a ContentLibrary,
}

impl<'a> RoomResolver<'a> {
    /// Constructs a resolver drawing from `library`.
    pub fn new(library: &'a ContentLibrary) -> Self {
        Self { library }
    }

    /// Returns every template in the `role` pool that is allowed on `floor` and fits
    /// `mask`, in pool order.
    pub fn resolve(
        &self,
        mask: DirectionMask,
        role: ElevationRole,
        floor: GridCoordinate,
    ) -> Vec<RoomChoice> {
        self.library
            .pool_entries(role)
            .filter(|(_, template)| template.allowed_on_floor(floor))
            .filter_map(|(id, template)| {
                fit(mask, template).map(|rotation| RoomChoice {
                    template: id,
                    rotation,
                })
            })
            .collect()
    }

    /// Chooses uniformly at random among the results of [`RoomResolver::resolve()`].
    pub fn pick_random<R: Rng + ?Sized>(
        &self,
        mask: DirectionMask,
        role: ElevationRole,
        floor: GridCoordinate,
        rng: &mut R,
    ) -> Option<RoomChoice> {
        self.resolve(mask, role, floor).choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng as _;
    use rand_xoshiro::Xoshiro256PlusPlus;

    const F: DirectionMask = DirectionMask::FORWARD;
    const R: DirectionMask = DirectionMask::RIGHT;
    const B: DirectionMask = DirectionMask::BACK;
    const L: DirectionMask = DirectionMask::LEFT;
    const UP: DirectionMask = DirectionMask::UP;

    fn id(role: ElevationRole, index: usize) -> TemplateId {
        TemplateId { role, index }
    }

    fn quarter(turns: i32) -> Rotation {
        Rotation::from_quarter_turns(turns)
    }

    #[test]
    fn dead_end_template_fits_both_ends_of_a_line() {
        let library: ContentLibrary = [RoomTemplate::new("dead end", F)].into_iter().collect();
        let resolver = RoomResolver::new(&library);
        let none = ElevationRole::None;
        assert_eq!(
            resolver.resolve(R, none, 0),
            vec![RoomChoice {
                template: id(none, 0),
                rotation: quarter(1)
            }]
        );
        assert_eq!(
            resolver.resolve(L, none, 0),
            vec![RoomChoice {
                template: id(none, 0),
                rotation: quarter(3)
            }]
        );
    }

    #[test]
    fn collects_every_fit_in_pool_order() {
        let library: ContentLibrary = [
            RoomTemplate::new("corner", F | R),
            RoomTemplate::new("line", F | B),
            RoomTemplate::new("other corner", B | L),
            RoomTemplate::new("exact", L | F),
        ]
        .into_iter()
        .collect();
        let resolver = RoomResolver::new(&library);
        let none = ElevationRole::None;
        assert_eq!(
            resolver.resolve(L | F, none, 0),
            vec![
                RoomChoice {
                    template: id(none, 0),
                    rotation: quarter(3)
                },
                RoomChoice {
                    template: id(none, 2),
                    rotation: quarter(1)
                },
                RoomChoice {
                    template: id(none, 3),
                    rotation: Rotation::IDENTITY
                },
            ]
        );
    }

    #[test]
    fn four_way_needs_exact_match() {
        let all = DirectionMask::HORIZONTAL;
        assert_eq!(fit(all, &RoomTemplate::new("cross", all)), Some(Rotation::IDENTITY));
        assert_eq!(fit(all, &RoomTemplate::new("t", F | R | B)), None);
    }

    #[test]
    fn vertical_openings_must_agree() {
        let stairs = RoomTemplate::new("stairs", F | UP).with_elevation(ElevationRole::Up);
        assert_eq!(fit(R | UP, &stairs), Some(quarter(1)));
        assert_eq!(fit(R, &stairs), None);
        assert_eq!(fit(R | UP, &RoomTemplate::new("plain", F)), None);
    }

    #[test]
    fn floor_restrictions_filter_candidates() {
        let library: ContentLibrary = [
            RoomTemplate::new("ground only", F).only_on_floor(0),
            RoomTemplate::new("never ground", F).except_on_floor(0),
        ]
        .into_iter()
        .collect();
        let resolver = RoomResolver::new(&library);
        let names = |floor| {
            resolver
                .resolve(F, ElevationRole::None, floor)
                .into_iter()
                .map(|choice| library.get(choice.template).unwrap().name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(0), vec!["ground only"]);
        assert_eq!(names(1), vec!["never ground"]);
    }

    #[test]
    fn pick_random_is_none_when_nothing_fits() {
        let library: ContentLibrary = [RoomTemplate::new("line", F | B)].into_iter().collect();
        let resolver = RoomResolver::new(&library);
        let rng = &mut Xoshiro256PlusPlus::seed_from_u64(0);
        assert_eq!(resolver.pick_random(F, ElevationRole::None, 0, rng), None);
        assert_eq!(
            resolver.pick_random(L | R, ElevationRole::None, 0, rng),
            Some(RoomChoice {
                template: id(ElevationRole::None, 0),
                rotation: quarter(1)
            })
        );
        assert_eq!(resolver.pick_random(F | B, ElevationRole::Up, 0, rng), None);
    }
}
