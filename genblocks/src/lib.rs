//! `genblocks` procedurally fills a grid of placeable blocks (“cells”) with room
//! templates, producing multi-floor, dungeon-like environments.
//!
//! ## Overview
//!
//! Generation is a one-shot batch run over a [`Grid`](grid::Grid):
//!
//! 1. Cells sharing a coordinate are deduplicated, and each cell asks a
//!    [`GeometryProbe`](grid::GeometryProbe) which of its six sides touch a neighbor.
//!    Cells with no neighbors at all are *isolated* and take no further part.
//! 2. Cells are grouped into floors by height. On each floor, a recursive-backtracking
//!    [`MazeCarver`](carve::MazeCarver) chooses a spanning tree of the horizontal
//!    connections, or in open-plan mode every physical connection is kept.
//! 3. For each cell, a [`RoomResolver`](resolve::RoomResolver) finds the
//!    [`RoomTemplate`](content::RoomTemplate)s whose connections match the cell's carved
//!    connections up to a rotation about the vertical axis, using the canonical
//!    connection patterns in [`pattern`].
//! 4. The [`FloorOrchestrator`](generate::FloorOrchestrator) sequences all of this and
//!    emits [`Placement`](generate::Placement)s to a
//!    [`PlacementSink`](generate::PlacementSink) supplied by the host.
//!
//! Rendering, scene mutation, and editor integration belong to the host; this crate
//! only decides what goes where.
//!
//! ## Randomness
//!
//! All random choices are drawn from a caller-supplied [`rand::Rng`], or from a
//! [`rand_xoshiro::Xoshiro256PlusPlus`] seeded from the configuration. A run with the
//! same seed, grid and content library always produces the same placements.
//!
//! ## Crate features
//!
//! * `serde`: Adds [`serde`] implementations for configuration, templates, and
//!   placements, as used by layout files.
//!
//! ## Dependencies and global state
//!
//! `genblocks` has no global state. It writes log messages using the [`log`] crate and is
//! therefore subject to that global configuration; it never installs a logger itself.
#![cfg_attr(not(feature = "serde"), doc = "[`serde`]: https://docs.rs/serde/")]
#![no_std]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    warn(clippy::std_instead_of_core, clippy::std_instead_of_alloc)
)]

extern crate alloc;
#[cfg_attr(test, macro_use)]
extern crate std;

/// Re-export of the direction, mask, rotation and coordinate types.
pub mod math {
    pub use genblocks_base::math::*;
}

pub mod carve;
pub mod content;
pub mod generate;
pub mod grid;
pub mod pattern;
pub mod resolve;

/// Re-export the version of the `euclid` vector math library we're using.
pub use genblocks_base::euclid;
