//! Room templates and the library they are chosen from.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::math::{DirectionMask, GridCoordinate};

/// Which kind of vertical access a cell needs, and therefore which pool of a
/// [`ContentLibrary`] its template is drawn from.
#[expect(clippy::exhaustive_enums)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, exhaust::Exhaust,
    strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ElevationRole {
    /// No vertical access.
    #[default]
    None,
    /// Leads to the floor above.
    Up,
    /// Leads to the floor below.
    Down,
}

impl ElevationRole {
    const fn pool_index(self) -> usize {
        match self {
            Self::None => 0,
            Self::Up => 1,
            Self::Down => 2,
        }
    }
}

/// What a [`RoomTemplate`] is used as. This is descriptive only; generation does not
/// treat the kinds differently.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[non_exhaustive]
pub enum RoomKind {
    /// A room.
    #[default]
    Room,
    /// A passage between rooms.
    Corridor,
    /// A room containing stairs.
    Staircase,
}

/// An immutable description of a piece of content that can fill a cell.
///
/// The host decides what a template actually contains; generation only looks at which
/// sides it is open on and where it may be used.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct RoomTemplate {
    /// Name by which the host identifies this template.
    pub name: String,
    /// The sides this template is open on, in its authored orientation.
    pub connections: DirectionMask,
    /// Which pool of a [`ContentLibrary`] this template belongs to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: ElevationRole,
    /// What this template is used as.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: RoomKind,
    /// If set, the template may only be used on this floor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub floor_limiter: Option<GridCoordinate>,
    /// If set, the template may be used on any floor except this one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub floor_excluder: Option<GridCoordinate>,
}

impl RoomTemplate {
    /// Constructs a template with no elevation role and no floor restrictions.
    pub fn new(name: impl Into<String>, connections: DirectionMask) -> Self {
        Self {
            name: name.into(),
            connections,
            elevation: ElevationRole::None,
            kind: RoomKind::Room,
            floor_limiter: None,
            floor_excluder: None,
        }
    }

    /// Sets the elevation role.
    #[must_use]
    pub fn with_elevation(mut self, elevation: ElevationRole) -> Self {
        self.elevation = elevation;
        self
    }

    /// Sets the kind.
    #[must_use]
    pub fn with_kind(mut self, kind: RoomKind) -> Self {
        self.kind = kind;
        self
    }

    /// Restricts the template to one floor.
    #[must_use]
    pub fn only_on_floor(mut self, floor: GridCoordinate) -> Self {
        self.floor_limiter = Some(floor);
        self
    }

    /// Forbids the template on one floor.
    #[must_use]
    pub fn except_on_floor(mut self, floor: GridCoordinate) -> Self {
        self.floor_excluder = Some(floor);
        self
    }

    /// Returns whether the floor restrictions allow this template on `floor`.
    pub fn allowed_on_floor(&self, floor: GridCoordinate) -> bool {
        self.floor_limiter.is_none_or(|only| only == floor)
            && self.floor_excluder != Some(floor)
    }
}

/// Identifies a [`RoomTemplate`] within a [`ContentLibrary`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[expect(clippy::exhaustive_structs)]
pub struct TemplateId {
    /// The pool the template is in.
    pub role: ElevationRole,
    /// The position of the template within its pool.
    pub index: usize,
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.role, self.index)
    }
}

/// Read-only collection of [`RoomTemplate`]s, partitioned into one pool per
/// [`ElevationRole`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContentLibrary {
    pools: [Vec<RoomTemplate>; 3],
}

impl ContentLibrary {
    /// Constructs an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template to the pool named by its [`RoomTemplate::elevation`].
    pub fn add(&mut self, template: RoomTemplate) -> TemplateId {
        let role = template.elevation;
        let pool = &mut self.pools[role.pool_index()];
        pool.push(template);
        TemplateId {
            role,
            index: pool.len() - 1,
        }
    }

    /// Returns the templates with the given role, in the order they were added.
    pub fn pool(&self, role: ElevationRole) -> &[RoomTemplate] {
        &self.pools[role.pool_index()]
    }

    /// Iterates over the templates with the given role, with their identifiers.
    pub fn pool_entries(
        &self,
        role: ElevationRole,
    ) -> impl Iterator<Item = (TemplateId, &RoomTemplate)> + '_ {
        self.pool(role)
            .iter()
            .enumerate()
            .map(move |(index, template)| (TemplateId { role, index }, template))
    }

    /// Returns the template with the given identifier.
    pub fn get(&self, id: TemplateId) -> Option<&RoomTemplate> {
        self.pool(id.role).get(id.index)
    }

    /// Returns the total number of templates in all pools.
    pub fn len(&self) -> usize {
        self.pools.iter().map(Vec::len).sum()
    }

    /// Returns whether every pool is empty.
    pub fn is_empty(&self) -> bool {
        self.pools.iter().all(Vec::is_empty)
    }
}

impl FromIterator<RoomTemplate> for ContentLibrary {
    fn from_iter<T: IntoIterator<Item = RoomTemplate>>(iter: T) -> Self {
        let mut library = Self::new();
        for template in iter {
            library.add(template);
        }
        library
    }
}

impl Extend<RoomTemplate> for ContentLibrary {
    fn extend<T: IntoIterator<Item = RoomTemplate>>(&mut self, iter: T) {
        for template in iter {
            self.add(template);
        }
    }
}
