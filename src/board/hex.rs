//! Hex grid geometry.
//!
//! Cells use odd-q offset coordinates: columns are flat-topped and every odd
//! column sits half a cell lower than its even neighbors. `(-1, -1)` is the
//! off-board sentinel and is never a grid cell.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate: column `x`, row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Where destroyed and evacuated units live.
    pub const OFF_BOARD: Coord = Coord { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Converts to cube coordinates (x, y, z) with x + y + z == 0.
    fn to_cube(self) -> (i32, i32, i32) {
        let x = self.x;
        let z = self.y - (self.x - (self.x & 1)) / 2;
        (x, -x - z, z)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The six hex directions, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

/// All directions in clockwise order. Circle patrols index this by turn.
pub const DIRECTIONS: [Direction; 6] = [
    Direction::North,
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::NorthWest,
];

impl Direction {
    /// Column/row delta from a cell in `column`.
    ///
    /// Diagonal steps depend on column parity because odd columns are
    /// shifted half a cell down.
    pub const fn offset(self, column: i32) -> (i32, i32) {
        let odd = column & 1 == 1;
        match (self, odd) {
            (Direction::North, _) => (0, -1),
            (Direction::South, _) => (0, 1),
            (Direction::NorthEast, false) => (1, -1),
            (Direction::NorthEast, true) => (1, 0),
            (Direction::SouthEast, false) => (1, 0),
            (Direction::SouthEast, true) => (1, 1),
            (Direction::SouthWest, false) => (-1, 0),
            (Direction::SouthWest, true) => (-1, 1),
            (Direction::NorthWest, false) => (-1, -1),
            (Direction::NorthWest, true) => (-1, 0),
        }
    }
}

/// Bounds of a rectangular hex map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexGrid {
    pub width: i32,
    pub height: i32,
}

impl HexGrid {
    pub const fn new(width: i32, height: i32) -> Self {
        HexGrid { width, height }
    }

    /// Returns true if `cell` lies inside `[0, width) x [0, height)`.
    pub fn contains(&self, cell: Coord) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// The neighbor of `cell` in `direction`, or `None` if it falls off the grid.
    ///
    /// The sentinel and other off-grid cells have no neighbors.
    pub fn neighbor(&self, cell: Coord, direction: Direction) -> Option<Coord> {
        if !self.contains(cell) {
            return None;
        }
        let (dx, dy) = direction.offset(cell.x);
        let next = Coord::new(cell.x + dx, cell.y + dy);
        self.contains(next).then_some(next)
    }

    /// On-grid neighbors of `cell` in direction order.
    pub fn neighbors(&self, cell: Coord) -> impl Iterator<Item = Coord> + '_ {
        DIRECTIONS
            .iter()
            .filter_map(move |&d| self.neighbor(cell, d))
    }

    /// Number of cells on the grid.
    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Row-major index of an on-grid cell.
    pub fn index(&self, cell: Coord) -> Option<usize> {
        self.contains(cell)
            .then(|| (cell.y as usize) * (self.width as usize) + cell.x as usize)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }

    /// Hex-step distance between two cells, ignoring grid bounds.
    pub fn distance(a: Coord, b: Coord) -> u32 {
        let (ax, ay, az) = a.to_cube();
        let (bx, by, bz) = b.to_cube();
        (ax - bx).abs().max((ay - by).abs()).max((az - bz).abs()) as u32
    }
}
