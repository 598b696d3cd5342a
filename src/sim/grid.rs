//! Cubic grid of cells, bomb placement and risk counts
//!
//! Cells live in a flat array indexed by integer coordinates. The string
//! identifiers the renderer uses for its blocks (`object_x_y_z`, in world
//! units) are derived from coordinates and parsed back on input.

use glam::{IVec3, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::CellIdError;

/// Prefix of every block name in the scene graph
pub const CELL_ID_PREFIX: &str = "object_";

/// A single block of the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Bombs among the up-to-26 neighbours (never counts itself)
    pub risk: u8,
    pub is_bomb: bool,
    pub flagged: bool,
    /// Risk number is on display
    pub revealed: bool,
    /// Taken out of play; terminal
    pub removed: bool,
}

impl Cell {
    /// Still part of the grid
    #[inline]
    pub fn in_play(&self) -> bool {
        !self.removed
    }
}

/// The 26 king-move offsets around a cell (3x3x3 minus the centre)
pub fn neighbor_offsets() -> [IVec3; 26] {
    let mut offsets = [IVec3::ZERO; 26];
    let mut i = 0;
    for dz in -1..=1 {
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 && dz == 0 {
                    continue;
                }
                offsets[i] = IVec3::new(dx, dy, dz);
                i += 1;
            }
        }
    }
    offsets
}

/// Texture label for a risk value: nothing for 0, "9+" past nine
pub fn risk_label(risk: u8) -> Option<String> {
    match risk {
        0 => None,
        r if r > MAX_RISK_LABEL => Some(format!("{MAX_RISK_LABEL}+")),
        r => Some(r.to_string()),
    }
}

/// Fixed-size cubic lattice of cells
#[derive(Debug, Clone)]
pub struct Grid {
    size: u32,
    cells: Vec<Cell>,
    bomb_count: u32,
}

impl Grid {
    /// Empty grid (no bombs) with side length `size`
    pub fn new(size: u32) -> Self {
        let len = (size * size * size) as usize;
        Self {
            size,
            cells: vec![Cell::default(); len],
            bomb_count: 0,
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of bombs placed so far
    #[inline]
    pub fn bomb_count(&self) -> u32 {
        self.bomb_count
    }

    /// Total cells, removed ones included
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, coord: IVec3) -> bool {
        let s = self.size as i32;
        coord.cmpge(IVec3::ZERO).all() && coord.cmplt(IVec3::splat(s)).all()
    }

    /// Flat index for a coordinate: (z * size + y) * size + x
    #[inline]
    pub fn index_of(&self, coord: IVec3) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let s = self.size as usize;
        Some((coord.z as usize * s + coord.y as usize) * s + coord.x as usize)
    }

    /// Coordinate of a flat index
    #[inline]
    pub fn coord_of(&self, index: usize) -> IVec3 {
        let s = self.size as usize;
        IVec3::new((index % s) as i32, ((index / s) % s) as i32, (index / (s * s)) as i32)
    }

    pub fn get(&self, coord: IVec3) -> Option<&Cell> {
        self.index_of(coord).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, coord: IVec3) -> Option<&mut Cell> {
        self.index_of(coord).map(|i| &mut self.cells[i])
    }

    /// All coordinates in index order
    pub fn coords(&self) -> impl Iterator<Item = IVec3> + '_ {
        (0..self.cells.len()).map(move |i| self.coord_of(i))
    }

    /// All cells with their coordinates, in index order
    pub fn iter(&self) -> impl Iterator<Item = (IVec3, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.coord_of(i), cell))
    }

    /// In-bounds neighbours of `coord` (up to 26)
    pub fn neighbors(&self, coord: IVec3) -> impl Iterator<Item = IVec3> + '_ {
        neighbor_offsets()
            .into_iter()
            .map(move |offset| coord + offset)
            .filter(move |c| self.contains(*c))
    }

    /// Coordinates of every bomb
    pub fn bombs(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.iter().filter(|(_, c)| c.is_bomb).map(|(coord, _)| coord)
    }

    /// Mark one cell as a bomb and raise its neighbours' risk.
    ///
    /// Returns false if the coordinate is off the grid or already a bomb.
    pub fn place_bomb_at(&mut self, coord: IVec3) -> bool {
        match self.get_mut(coord) {
            Some(cell) if !cell.is_bomb => cell.is_bomb = true,
            _ => return false,
        }
        let neighbors: Vec<IVec3> = self.neighbors(coord).collect();
        for n in neighbors {
            if let Some(cell) = self.get_mut(n) {
                cell.risk += 1;
            }
        }
        self.bomb_count += 1;
        true
    }

    /// Scatter `count` bombs over uniformly random free cells.
    ///
    /// Never fills the whole grid; the count is capped at the number of free
    /// cells minus one.
    pub fn place_bombs<R: Rng + ?Sized>(&mut self, count: u32, rng: &mut R) {
        let free = self.cells.len() as u32 - self.bomb_count;
        let count = if count >= free {
            let capped = free.saturating_sub(1);
            log::warn!("Requested {count} bombs but only {free} free cells, placing {capped}");
            capped
        } else {
            count
        };

        let s = self.size as i32;
        for _ in 0..count {
            loop {
                let coord = IVec3::new(
                    rng.random_range(0..s),
                    rng.random_range(0..s),
                    rng.random_range(0..s),
                );
                if self.place_bomb_at(coord) {
                    break;
                }
            }
        }
        log::debug!("Placed {} bombs on a {}³ grid", self.bomb_count, self.size);
    }

    /// Half the grid's world-space extent
    #[inline]
    fn radius(&self) -> i32 {
        BLOCK_SPACING * self.size as i32 / 2
    }

    /// Scene-graph name of the block at `coord` (`object_x_y_z` in world units)
    pub fn cell_id(&self, coord: IVec3) -> String {
        let w = coord * BLOCK_SPACING - IVec3::splat(self.radius());
        format!("{CELL_ID_PREFIX}{}_{}_{}", w.x, w.y, w.z)
    }

    /// World-space centre of the block at `coord`
    pub fn world_position(&self, coord: IVec3) -> Vec3 {
        (coord * BLOCK_SPACING - IVec3::splat(self.radius())).as_vec3()
    }

    /// Map a scene-graph block name back to grid coordinates
    pub fn parse_cell_id(&self, id: &str) -> Result<IVec3, CellIdError> {
        let rest = id
            .strip_prefix(CELL_ID_PREFIX)
            .ok_or_else(|| CellIdError::Malformed(id.to_string()))?;
        let parts: Vec<&str> = rest.split('_').collect();
        if parts.len() != 3 {
            return Err(CellIdError::Malformed(id.to_string()));
        }

        let mut world = [0i32; 3];
        for (slot, part) in world.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| CellIdError::InvalidCoordinate {
                id: id.to_string(),
                part: part.to_string(),
            })?;
        }

        let out_of_grid = || CellIdError::OutOfGrid {
            id: id.to_string(),
            size: self.size,
        };
        let radius = self.radius();
        let mut coord = [0i32; 3];
        for (slot, w) in coord.iter_mut().zip(world) {
            let offset = w
                .checked_add(radius)
                .filter(|v| v.rem_euclid(BLOCK_SPACING) == 0)
                .ok_or_else(out_of_grid)?;
            *slot = offset.div_euclid(BLOCK_SPACING);
        }

        let coord = IVec3::from_array(coord);
        if !self.contains(coord) {
            return Err(out_of_grid());
        }
        Ok(coord)
    }
}
