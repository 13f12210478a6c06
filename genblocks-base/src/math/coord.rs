//! Numeric types used for coordinates and related quantities.

use euclid::{Point3D, Vector3D};

/// Unit-of-measure type for points and vectors in the generation grid.
///
/// Grid coordinates are world units, not cell indices: two cells one grid step apart
/// differ by the configured grid size.
#[allow(clippy::exhaustive_enums)]
#[derive(Debug)]
pub enum GridSpace {}

/// Coordinates that are locked to the generation grid.
pub type GridCoordinate = i32;

/// Positions that are locked to the generation grid.
pub type GridPoint = Point3D<GridCoordinate, GridSpace>;

/// Vectors that are locked to the generation grid.
pub type GridVector = Vector3D<GridCoordinate, GridSpace>;

/// Coordinates that are not locked to the generation grid, such as positions reported by
/// a host editor before snapping.
pub type FreeCoordinate = f64;

/// Positions that are not locked to the generation grid but may be snapped to it.
pub type FreePoint = Point3D<FreeCoordinate, GridSpace>;

/// Snaps a free position onto the generation grid.
///
/// Each coordinate is rounded to the nearest multiple of `grid_size`. The Y coordinate
/// is additionally pinned to be non-negative, since floor 0 is the lowest floor.
///
/// Returns [`None`] if `grid_size` is not positive or the position is not finite.
///
/// ```
/// # extern crate genblocks_base as genblocks;
/// use genblocks::math::{FreePoint, GridPoint, snap_to_grid};
///
/// assert_eq!(
///     snap_to_grid(FreePoint::new(11.0, -3.0, -6.5), 4),
///     Some(GridPoint::new(12, 0, -8)),
/// );
/// ```
#[inline]
pub fn snap_to_grid(position: FreePoint, grid_size: GridCoordinate) -> Option<GridPoint> {
    if grid_size <= 0 {
        return None;
    }
    let size = FreeCoordinate::from(grid_size);
    let snap = |c: FreeCoordinate| -> Option<GridCoordinate> {
        let steps = libm::round(c / size);
        // Reject NaN, infinities and anything that would overflow the integer grid.
        if !steps.is_finite()
            || steps * size > FreeCoordinate::from(GridCoordinate::MAX)
            || steps * size < FreeCoordinate::from(GridCoordinate::MIN)
        {
            return None;
        }
        Some(steps as GridCoordinate * grid_size)
    };

    Some(GridPoint::new(
        snap(position.x)?,
        snap(position.y)?.max(0),
        snap(position.z)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn snap_rounds_to_nearest_multiple() {
        assert_eq!(
            snap_to_grid(FreePoint::new(4.9, 5.1, -5.1), 10),
            Some(GridPoint::new(0, 10, -10))
        );
        assert_eq!(
            snap_to_grid(FreePoint::new(15.0, 25.0, 35.0), 10),
            Some(GridPoint::new(20, 30, 40)),
            "halfway cases round away from zero"
        );
    }

    #[test]
    fn snap_pins_y_to_ground() {
        assert_eq!(
            snap_to_grid(FreePoint::new(0.0, -100.0, 0.0), 10),
            Some(GridPoint::new(0, 0, 0))
        );
    }

    #[test]
    fn snap_rejects_bad_input() {
        assert_eq!(snap_to_grid(FreePoint::new(0.0, 0.0, 0.0), 0), None);
        assert_eq!(snap_to_grid(FreePoint::new(0.0, 0.0, 0.0), -4), None);
        assert_eq!(snap_to_grid(FreePoint::new(f64::NAN, 0.0, 0.0), 4), None);
        assert_eq!(snap_to_grid(FreePoint::new(0.0, 0.0, 1e300), 4), None);
    }
}
