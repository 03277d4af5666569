use rand::Rng;

use crate::error::{Error, Result};

pub const DEAD: i32 = 0;
pub const ALIVE: i32 = 1;

/// How neighbors are looked up past the border of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edges {
    /// Cells outside the grid count as dead.
    #[default]
    Bounded,
    /// The grid is a torus.
    Wrapping,
}

/// Fixed-size 2D field of integer cell states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<Vec<i32>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid { rows, cols });
        }
        Ok(Grid {
            rows,
            cols,
            data: vec![vec![DEAD; cols]; rows],
        })
    }

    /// Builds a grid from text rows. `' '`, `'.'` and `'0'` are dead, anything
    /// else is alive. Blank lines are skipped.
    pub fn from_pattern(s: &str) -> Result<Self> {
        let data: Vec<Vec<i32>> = s
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| {
                l.chars()
                    .map(|c| match c {
                        ' ' | '.' | '0' => DEAD,
                        _ => ALIVE,
                    })
                    .collect()
            })
            .collect();

        let cols = data.first().map_or(0, Vec::len);
        if let Some((row, r)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(Error::RaggedRows {
                row,
                expected: cols,
                found: r.len(),
            });
        }
        if data.is_empty() || cols == 0 {
            return Err(Error::EmptyGrid {
                rows: data.len(),
                cols,
            });
        }

        Ok(Grid {
            rows: data.len(),
            cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn as_rows(&self) -> &[Vec<i32>] {
        &self.data
    }

    #[inline]
    pub fn rows_iter(&self) -> impl Iterator<Item = &[i32]> {
        self.data.iter().map(Vec::as_slice)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    #[inline]
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(ALIVE)
    }

    /// Out of bounds writes are ignored. Any non-zero state is stored as alive.
    pub fn set(&mut self, row: usize, col: usize, state: i32) {
        if let Some(cell) = self.data.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = if state == DEAD { DEAD } else { ALIVE };
        }
    }

    pub fn toggle(&mut self, row: usize, col: usize) {
        if let Some(cell) = self.data.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = ALIVE - *cell;
        }
    }

    pub fn clear(&mut self) {
        for r in &mut self.data {
            r.fill(DEAD);
        }
    }

    pub fn population(&self) -> usize {
        self.data
            .iter()
            .map(|r| r.iter().filter(|&&c| c == ALIVE).count())
            .sum()
    }

    /// Each cell becomes alive with probability `density`, clamped to
    /// `[0, 1]`. Non-finite densities leave every cell dead.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) {
        let p = if density.is_finite() {
            density.clamp(0.0, 1.0)
        } else {
            0.0
        };
        for r in &mut self.data {
            for cell in r.iter_mut() {
                *cell = if rng.gen_bool(p) { ALIVE } else { DEAD };
            }
        }
    }

    /// Live cells among the 8 Moore neighbors of `(row, col)`.
    pub fn live_neighbors(&self, row: usize, col: usize, edges: Edges) -> u8 {
        let mut n = 0;
        for dr in [-1i64, 0, 1] {
            for dc in [-1i64, 0, 1] {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if let Some((r, c)) = self.neighbor(row, col, dr, dc, edges) {
                    if self.data[r][c] == ALIVE {
                        n += 1;
                    }
                }
            }
        }
        n
    }

    fn neighbor(&self, row: usize, col: usize, dr: i64, dc: i64, edges: Edges) -> Option<(usize, usize)> {
        let (h, w) = (self.rows as i64, self.cols as i64);
        let (r, c) = (row as i64 + dr, col as i64 + dc);
        match edges {
            Edges::Bounded => {
                if r < 0 || c < 0 || r >= h || c >= w {
                    None
                } else {
                    Some((r as usize, c as usize))
                }
            }
            Edges::Wrapping => Some((r.rem_euclid(h) as usize, c.rem_euclid(w) as usize)),
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut Vec<Vec<i32>> {
        &mut self.data
    }
}
