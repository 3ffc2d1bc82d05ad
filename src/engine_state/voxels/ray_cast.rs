//! # Ray Casting
//!
//! Finds the first present voxel along a ray with a Digital Differential
//! Analyzer. A voxel at integer position `p` occupies the unit cube
//! `[p, p + 1)`; the walk starts in the cube containing the origin and moves one
//! cube at a time across whichever axis-aligned boundary the ray reaches next.
//!
//! Ties between x and y go to x; z is taken only when its boundary is strictly
//! nearer than the chosen one. The starting cube is never tested, so a ray cast
//! from inside solid ground reports the next present voxel it enters.

use cgmath::{Point3, Vector3};
use log::trace;

use super::world::World;

/// How a ray walk ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RayCastOutcome {
    /// The ray entered a present voxel at this world position.
    Hit(Point3<i32>),
    /// The ray stepped into a position outside the world.
    LeftWorld,
    /// The step budget ran out first.
    StepBudgetExhausted,
    /// The direction was zero or not finite; the ray cannot move.
    Degenerate,
}

impl RayCastOutcome {
    /// The hit position, if any.
    pub fn hit(&self) -> Option<Point3<i32>> {
        match self {
            RayCastOutcome::Hit(pos) => Some(*pos),
            _ => None,
        }
    }
}

/// Per-axis DDA state.
struct AxisWalk {
    /// +1 or -1 in the direction of travel, 0 if the ray is parallel.
    step: i32,
    /// Ray parameter at the next boundary on this axis.
    t_max: f32,
    /// Ray parameter between two boundaries on this axis.
    t_delta: f32,
}

impl AxisWalk {
    fn new(origin: f32, cell: i32, direction: f32) -> Self {
        if direction > 0.0 {
            AxisWalk {
                step: 1,
                t_max: ((cell + 1) as f32 - origin) / direction,
                t_delta: 1.0 / direction,
            }
        } else if direction < 0.0 {
            AxisWalk {
                step: -1,
                t_max: (origin - cell as f32) / -direction,
                t_delta: 1.0 / -direction,
            }
        } else {
            AxisWalk {
                step: 0,
                t_max: f32::INFINITY,
                t_delta: f32::INFINITY,
            }
        }
    }
}

/// The integer cube containing `coordinate`, or `None` when it lies beyond
/// the `i32` grid.
fn origin_cell(coordinate: f32) -> Option<i32> {
    let floor = coordinate.floor();
    (floor >= i32::MIN as f32 && floor < i32::MAX as f32).then_some(floor as i32)
}

/// Walks a ray through the world until it hits a present voxel.
///
/// # Arguments
/// * `world` - The world to test against
/// * `origin` - World-space start of the ray
/// * `direction` - World-space direction; it does not need to be normalized
/// * `max_steps` - Upper bound on the number of cubes entered
///
/// # Returns
/// The [`RayCastOutcome`]. A ray starting outside the world ends with
/// [`RayCastOutcome::LeftWorld`] on its first step that is still outside, or
/// immediately when its origin lies beyond the integer grid. A non-finite
/// origin is [`RayCastOutcome::Degenerate`].
pub fn cast_ray(
    world: &World,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_steps: u32,
) -> RayCastOutcome {
    let finite = [direction.x, direction.y, direction.z]
        .iter()
        .all(|axis| axis.is_finite());
    let finite_origin = [origin.x, origin.y, origin.z]
        .iter()
        .all(|axis| axis.is_finite());
    if !finite || !finite_origin || direction == Vector3::new(0.0, 0.0, 0.0) {
        return RayCastOutcome::Degenerate;
    }

    let (Some(x), Some(y), Some(z)) = (
        origin_cell(origin.x),
        origin_cell(origin.y),
        origin_cell(origin.z),
    ) else {
        return RayCastOutcome::LeftWorld;
    };
    let mut cell = Point3::new(x, y, z);
    let mut axes = [
        AxisWalk::new(origin.x, cell.x, direction.x),
        AxisWalk::new(origin.y, cell.y, direction.y),
        AxisWalk::new(origin.z, cell.z, direction.z),
    ];
    let layout = world.layout();

    for step in 0..max_steps {
        let mut axis = if axes[0].t_max <= axes[1].t_max { 0 } else { 1 };
        if axes[2].t_max < axes[axis].t_max {
            axis = 2;
        }

        let Some(next) = cell[axis].checked_add(axes[axis].step) else {
            return RayCastOutcome::LeftWorld;
        };
        cell[axis] = next;
        axes[axis].t_max += axes[axis].t_delta;
        trace!("Ray step {} entered {:?}", step, cell);

        if layout.world_pos_to_chunk_index(cell).is_none() {
            return RayCastOutcome::LeftWorld;
        }
        if world.is_present(cell) {
            return RayCastOutcome::Hit(cell);
        }
    }

    RayCastOutcome::StepBudgetExhausted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::voxel_grid::PRESENT_BIT;
    use crate::engine_state::voxels::layout::WorldLayout;

    fn world_with(voxels: &[Point3<i32>]) -> World {
        let mut world = World::new(WorldLayout::new(2, 8));
        for &voxel in voxels {
            assert!(world.set_voxel(voxel, PRESENT_BIT));
        }
        world
    }

    #[test]
    fn hits_voxel_along_an_axis() {
        let target = Point3::new(-5, -3, -3);
        let world = world_with(&[target]);
        let outcome = cast_ray(
            &world,
            Point3::new(-0.5, -2.5, -2.5),
            Vector3::new(-1.0, 0.0, 0.0),
            200,
        );
        assert_eq!(outcome, RayCastOutcome::Hit(target));
        assert_eq!(outcome.hit(), Some(target));
    }

    #[test]
    fn hits_voxel_along_a_diagonal() {
        let target = Point3::new(-5, -3, -3);
        let world = world_with(&[target]);
        let origin = Point3::new(-0.5, -0.5, -0.5);
        let center = Point3::new(-4.5, -2.5, -2.5);
        let outcome = cast_ray(&world, origin, center - origin, 200);
        assert_eq!(outcome, RayCastOutcome::Hit(target));
    }

    #[test]
    fn ray_aimed_away_leaves_the_world() {
        let world = world_with(&[Point3::new(-5, -3, -3)]);
        let outcome = cast_ray(
            &world,
            Point3::new(-0.5, -2.5, -2.5),
            Vector3::new(1.0, 0.0, 0.0),
            200,
        );
        assert_eq!(outcome, RayCastOutcome::LeftWorld);
        assert_eq!(outcome.hit(), None);
    }

    #[test]
    fn step_budget_bounds_the_walk() {
        let world = world_with(&[Point3::new(-5, -3, -3)]);
        let origin = Point3::new(-0.5, -2.5, -2.5);
        let direction = Vector3::new(-1.0, 0.0, 0.0);
        assert_eq!(
            cast_ray(&world, origin, direction, 3),
            RayCastOutcome::StepBudgetExhausted
        );
        assert_eq!(
            cast_ray(&world, origin, direction, 4),
            RayCastOutcome::Hit(Point3::new(-5, -3, -3))
        );
    }

    #[test]
    fn starting_voxel_is_not_tested() {
        let world = world_with(&[Point3::new(-1, -1, -1), Point3::new(-3, -1, -1)]);
        let outcome = cast_ray(
            &world,
            Point3::new(-0.5, -0.5, -0.5),
            Vector3::new(-1.0, 0.0, 0.0),
            200,
        );
        assert_eq!(outcome, RayCastOutcome::Hit(Point3::new(-3, -1, -1)));
    }

    #[test]
    fn ties_prefer_x_then_y_before_z() {
        let world = world_with(&[
            Point3::new(-2, -1, -1),
            Point3::new(-1, -2, -1),
            Point3::new(-1, -1, -2),
        ]);
        let origin = Point3::new(-0.5, -0.5, -0.5);
        assert_eq!(
            cast_ray(&world, origin, Vector3::new(-1.0, -1.0, -1.0), 200),
            RayCastOutcome::Hit(Point3::new(-2, -1, -1))
        );
        assert_eq!(
            cast_ray(&world, origin, Vector3::new(0.0, -1.0, -1.0), 200),
            RayCastOutcome::Hit(Point3::new(-1, -2, -1))
        );
    }

    #[test]
    fn zero_direction_is_degenerate() {
        let world = world_with(&[]);
        assert_eq!(
            cast_ray(
                &world,
                Point3::new(-0.5, -0.5, -0.5),
                Vector3::new(0.0, 0.0, 0.0),
                200
            ),
            RayCastOutcome::Degenerate
        );
        assert_eq!(
            cast_ray(
                &world,
                Point3::new(-0.5, -0.5, -0.5),
                Vector3::new(f32::NAN, 0.0, 0.0),
                200
            ),
            RayCastOutcome::Degenerate
        );
    }

    #[test]
    fn empty_world_ray_exits_before_budget() {
        let world = world_with(&[]);
        let outcome = cast_ray(
            &world,
            Point3::new(-8.5, -8.5, -8.5),
            Vector3::new(-0.3, -1.0, -0.7),
            200,
        );
        assert_eq!(outcome, RayCastOutcome::LeftWorld);
    }

    #[test]
    fn origins_beyond_the_grid_leave_the_world() {
        let world = world_with(&[Point3::new(-5, -3, -3)]);
        let toward_world = Vector3::new(-1.0, 0.0, 0.0);
        assert_eq!(
            cast_ray(&world, Point3::new(3.0e9, -2.5, -2.5), toward_world, 200),
            RayCastOutcome::LeftWorld
        );
        let far_behind = Point3::new(-2.5, -2.5, -1.0e12);
        assert_eq!(
            cast_ray(&world, far_behind, Vector3::new(0.0, 0.0, 1.0), 200),
            RayCastOutcome::LeftWorld
        );
        assert_eq!(
            cast_ray(&world, Point3::new(-2_147_483_648.0, -2.5, -2.5), toward_world, 200),
            RayCastOutcome::LeftWorld
        );
        assert_eq!(
            cast_ray(&world, Point3::new(f32::INFINITY, -2.5, -2.5), toward_world, 200),
            RayCastOutcome::Degenerate
        );
    }
}
