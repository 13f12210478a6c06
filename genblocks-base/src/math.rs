//! Directions, connection masks, quarter-turn rotations, and grid coordinates.

mod coord;
pub use coord::*;
mod direction;
pub use direction::*;
mod mask;
pub use mask::*;
mod rotation;
pub use rotation::*;
