//! Direction and axis types for face and rotation handling.

use serde::{Deserialize, Serialize};

/// The six cube face directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Face order used when building a cube's per-face material list.
    /// Backends index materials by position in this array.
    pub const MATERIAL_ORDER: [Direction; 6] = [
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
        Direction::South,
        Direction::North,
    ];

    /// Get the normal vector for this direction.
    pub fn normal(&self) -> [f32; 3] {
        match self {
            Direction::Down => [0.0, -1.0, 0.0],
            Direction::Up => [0.0, 1.0, 0.0],
            Direction::North => [0.0, 0.0, -1.0],
            Direction::South => [0.0, 0.0, 1.0],
            Direction::West => [-1.0, 0.0, 0.0],
            Direction::East => [1.0, 0.0, 0.0],
        }
    }

    /// Get the axis this direction is on.
    pub fn axis(&self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    /// The two element axes a face's texture spans, as (u, v) component indices.
    /// `up`/`down` span X,Z; `north`/`south` span X,Y; `east`/`west` span Z,Y.
    pub fn uv_axes(&self) -> (usize, usize) {
        match self.axis() {
            Axis::Y => (0, 2),
            Axis::Z => (0, 1),
            Axis::X => (2, 1),
        }
    }

    /// Quad corners for this face of the box `from..to`.
    /// Order: top-left, top-right, bottom-right, bottom-left as seen from outside.
    pub fn face_corners(&self, from: [f32; 3], to: [f32; 3]) -> [[f32; 3]; 4] {
        match self {
            Direction::Down => [
                [from[0], from[1], to[2]],
                [to[0], from[1], to[2]],
                [to[0], from[1], from[2]],
                [from[0], from[1], from[2]],
            ],
            Direction::Up => [
                [from[0], to[1], from[2]],
                [to[0], to[1], from[2]],
                [to[0], to[1], to[2]],
                [from[0], to[1], to[2]],
            ],
            Direction::North => [
                [to[0], to[1], from[2]],
                [from[0], to[1], from[2]],
                [from[0], from[1], from[2]],
                [to[0], from[1], from[2]],
            ],
            Direction::South => [
                [from[0], to[1], to[2]],
                [to[0], to[1], to[2]],
                [to[0], from[1], to[2]],
                [from[0], from[1], to[2]],
            ],
            Direction::West => [
                [from[0], to[1], from[2]],
                [from[0], to[1], to[2]],
                [from[0], from[1], to[2]],
                [from[0], from[1], from[2]],
            ],
            Direction::East => [
                [to[0], to[1], to[2]],
                [to[0], to[1], from[2]],
                [to[0], from[1], from[2]],
                [to[0], from[1], to[2]],
            ],
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Down => write!(f, "down"),
            Direction::Up => write!(f, "up"),
            Direction::North => write!(f, "north"),
            Direction::South => write!(f, "south"),
            Direction::West => write!(f, "west"),
            Direction::East => write!(f, "east"),
        }
    }
}

/// The three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_order_covers_all_faces() {
        let mut seen = Direction::MATERIAL_ORDER.to_vec();
        seen.sort_by_key(|d| *d as u8);
        seen.dedup();
        assert_eq!(seen.len(), 6);
        assert_eq!(Direction::MATERIAL_ORDER[0], Direction::East);
        assert_eq!(Direction::MATERIAL_ORDER[5], Direction::North);
    }

    #[test]
    fn test_uv_axes() {
        assert_eq!(Direction::Up.uv_axes(), (0, 2));
        assert_eq!(Direction::Down.uv_axes(), (0, 2));
        assert_eq!(Direction::North.uv_axes(), (0, 1));
        assert_eq!(Direction::South.uv_axes(), (0, 1));
        assert_eq!(Direction::East.uv_axes(), (2, 1));
        assert_eq!(Direction::West.uv_axes(), (2, 1));
    }

    #[test]
    fn test_face_corners_lie_on_face_plane() {
        let from = [2.0, 3.0, 4.0];
        let to = [10.0, 11.0, 12.0];
        for dir in Direction::MATERIAL_ORDER {
            let corners = dir.face_corners(from, to);
            let normal = dir.normal();
            let axis = match dir.axis() {
                Axis::X => 0,
                Axis::Y => 1,
                Axis::Z => 2,
            };
            let expected = if normal[axis] > 0.0 { to[axis] } else { from[axis] };
            for c in corners {
                assert_eq!(c[axis], expected, "{} corner off plane", dir);
            }
        }
    }

    #[test]
    fn test_deserialize_direction() {
        let dir: Direction = serde_json::from_str("\"north\"").unwrap();
        assert_eq!(dir, Direction::North);
        assert_eq!(dir.to_string(), "north");
    }
}
