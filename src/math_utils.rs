// Ground-plane geometry: grid cells, zone rectangles, ray/ground intersection
use bevy::prelude::*;

use crate::constants::{CELL_SIZE, GROUND_PARALLEL_EPSILON};
use crate::types::{GridCell, Zone};

/// Axis-aligned world rectangle covered by a range of grid cells
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WorldZoneRect {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl WorldZoneRect {
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn depth(&self) -> f32 {
        self.z_max - self.z_min
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.x_min + self.x_max) * 0.5, (self.z_min + self.z_max) * 0.5)
    }

    /// Corners at height `y`, wound around the rectangle
    pub fn corners(&self, y: f32) -> [Vec3; 4] {
        [
            Vec3::new(self.x_min, y, self.z_min),
            Vec3::new(self.x_max, y, self.z_min),
            Vec3::new(self.x_max, y, self.z_max),
            Vec3::new(self.x_min, y, self.z_max),
        ]
    }

    /// Strictly separated on at least one axis. Shared edges are not separation.
    pub fn is_separated_from(&self, other: &WorldZoneRect) -> bool {
        self.x_max < other.x_min
            || other.x_max < self.x_min
            || self.z_max < other.z_min
            || other.z_max < self.z_min
    }
}

#[inline]
pub fn world_to_grid_cell(world_pos: Vec3) -> GridCell {
    GridCell::new(
        (world_pos.x / CELL_SIZE).floor() as i32,
        (world_pos.z / CELL_SIZE).floor() as i32,
    )
}

/// Center of a cell on the ground plane
#[inline]
pub fn grid_cell_center(cell: GridCell) -> Vec3 {
    Vec3::new(
        cell.x as f32 * CELL_SIZE + CELL_SIZE * 0.5,
        0.0,
        cell.z as f32 * CELL_SIZE + CELL_SIZE * 0.5,
    )
}

/// Returns (min corner, max corner) per axis
pub fn normalize_cells(a: GridCell, b: GridCell) -> (GridCell, GridCell) {
    (
        GridCell::new(a.x.min(b.x), a.z.min(b.z)),
        GridCell::new(a.x.max(b.x), a.z.max(b.z)),
    )
}

pub fn grid_cells_to_world_rect(start: GridCell, end: GridCell) -> WorldZoneRect {
    let (min_cell, max_cell) = normalize_cells(start, end);
    WorldZoneRect {
        x_min: min_cell.x as f32 * CELL_SIZE,
        x_max: (max_cell.x + 1) as f32 * CELL_SIZE,
        z_min: min_cell.z as f32 * CELL_SIZE,
        z_max: (max_cell.z + 1) as f32 * CELL_SIZE,
    }
}

/// Adjacency counts: two cell ranges sharing an edge or a corner conflict
pub fn zones_touch_or_overlap(
    a_start: GridCell,
    a_end: GridCell,
    b_start: GridCell,
    b_end: GridCell,
) -> bool {
    let a = grid_cells_to_world_rect(a_start, a_end);
    let b = grid_cells_to_world_rect(b_start, b_end);
    !a.is_separated_from(&b)
}

pub fn touches_or_overlaps_any_zone<'a>(
    start: GridCell,
    end: GridCell,
    zones: impl IntoIterator<Item = &'a Zone>,
) -> bool {
    zones
        .into_iter()
        .any(|zone| zones_touch_or_overlap(start, end, zone.start_cell, zone.end_cell))
}

/// Intersect a ray with the ground plane (normal +Y through the origin)
pub fn ray_ground_intersection(origin: Vec3, direction: Vec3) -> Option<Vec3> {
    // Ray equation: P = origin + t * direction, solve P.y = 0
    if direction.y.abs() < GROUND_PARALLEL_EPSILON {
        // Ray is parallel to ground, no intersection
        return None;
    }

    let t = -origin.y / direction.y;

    if t >= 0.0 {
        Some(origin + direction * t)
    } else {
        // Intersection is behind the ray origin
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone_at(start: GridCell, end: GridCell) -> Zone {
        Zone {
            id: crate::types::ZoneId::random(),
            name: "Project 1".to_string(),
            start_cell: start,
            end_cell: end,
            color: crate::types::palette_color(0),
        }
    }

    #[test]
    fn world_to_grid_cell_floors_negative_coordinates() {
        assert_eq!(world_to_grid_cell(Vec3::new(0.5, 0.0, 0.99)), GridCell::new(0, 0));
        assert_eq!(world_to_grid_cell(Vec3::new(-0.01, 0.0, -1.0)), GridCell::new(-1, -1));
        assert_eq!(world_to_grid_cell(Vec3::new(3.0, 7.0, -2.5)), GridCell::new(3, -3));
    }

    #[test]
    fn normalize_cells_orders_each_axis_independently() {
        let (min, max) = normalize_cells(GridCell::new(4, -1), GridCell::new(2, 3));
        assert_eq!(min, GridCell::new(2, -1));
        assert_eq!(max, GridCell::new(4, 3));
    }

    #[test]
    fn world_rect_covers_whole_cells() {
        let rect = grid_cells_to_world_rect(GridCell::new(2, 1), GridCell::new(-1, 0));
        assert_eq!(rect.x_min, -1.0);
        assert_eq!(rect.x_max, 3.0);
        assert_eq!(rect.z_min, 0.0);
        assert_eq!(rect.z_max, 2.0);
        assert_eq!(rect.width(), 4.0);
        assert_eq!(rect.depth(), 2.0);
        assert_eq!(rect.center(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn exact_overlap_conflicts() {
        let origin = GridCell::new(0, 0);
        assert!(zones_touch_or_overlap(origin, origin, origin, origin));
    }

    #[test]
    fn shared_edge_conflicts() {
        let origin = GridCell::new(0, 0);
        let right = GridCell::new(1, 0);
        assert!(zones_touch_or_overlap(origin, origin, right, right));
        assert!(zones_touch_or_overlap(right, right, origin, origin));
    }

    #[test]
    fn shared_corner_conflicts() {
        let origin = GridCell::new(0, 0);
        let diagonal = GridCell::new(1, 1);
        assert!(zones_touch_or_overlap(origin, origin, diagonal, diagonal));
    }

    #[test]
    fn one_cell_gap_is_separated() {
        let origin = GridCell::new(0, 0);
        let gap = GridCell::new(2, 0);
        assert!(!zones_touch_or_overlap(origin, origin, gap, gap));
        assert!(!zones_touch_or_overlap(origin, origin, GridCell::new(0, -2), GridCell::new(5, -2)));
    }

    #[test]
    fn any_zone_check_uses_unnormalized_stored_cells() {
        let zones = vec![zone_at(GridCell::new(5, 5), GridCell::new(3, 3))];
        assert!(touches_or_overlaps_any_zone(GridCell::new(4, 4), GridCell::new(4, 4), &zones));
        assert!(!touches_or_overlaps_any_zone(GridCell::new(0, 0), GridCell::new(1, 1), &zones));
        assert!(!touches_or_overlaps_any_zone(GridCell::new(0, 0), GridCell::new(0, 0), &Vec::<Zone>::new()));
    }

    #[test]
    fn ray_hits_ground_in_front() {
        let hit = ray_ground_intersection(Vec3::new(1.0, 10.0, 2.0), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(hit, Some(Vec3::new(1.0, 0.0, 2.0)));
    }

    #[test]
    fn ray_parallel_or_pointing_away_misses() {
        assert_eq!(ray_ground_intersection(Vec3::new(0.0, 5.0, 0.0), Vec3::X), None);
        assert_eq!(ray_ground_intersection(Vec3::new(0.0, 5.0, 0.0), Vec3::Y), None);
    }

    #[test]
    fn cell_center_is_offset_by_half_a_cell() {
        assert_eq!(grid_cell_center(GridCell::new(-1, 2)), Vec3::new(-0.5, 0.0, 2.5));
    }
}
