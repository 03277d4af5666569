//! Named seed patterns loaded from a JSON shape library.
//!
//! ```json
//! { "shapes": { "glider": { "size": { "w": 3, "h": 3 },
//!                           "cells": [ { "x": 1, "y": 0 }, ... ] } } }
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{Error, Result},
    grid::{Grid, ALIVE},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ShapeEntry {
    size: Size,
    #[serde(default)]
    cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub cells: Vec<Cell>,
}

/// Bounding box of a shape's live cells, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    #[inline]
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }
}

impl Shape {
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.cells.first()?;
        let init = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(self.cells.iter().fold(init, |b, c| Bounds {
            min_x: b.min_x.min(c.x),
            max_x: b.max_x.max(c.x),
            min_y: b.min_y.min(c.y),
            max_y: b.max_y.max(c.y),
        }))
    }

    /// Offset `(dx, dy)` that centers the shape's bounding box on `grid`.
    pub fn center_offset(&self, grid: &Grid) -> Result<(i32, i32)> {
        let b = self
            .bounds()
            .ok_or_else(|| Error::EmptyShape(self.name.clone()))?;
        let dx = (grid.cols() as i32 - b.width()) / 2 - b.min_x;
        let dy = (grid.rows() as i32 - b.height()) / 2 - b.min_y;
        Ok((dx, dy))
    }

    /// Stamps the shape onto the middle of `grid`, returning how many cells
    /// landed inside it.
    pub fn place_centered(&self, grid: &mut Grid) -> Result<usize> {
        let (dx, dy) = self.center_offset(grid)?;
        let mut placed = 0;
        for c in &self.cells {
            let (x, y) = (c.x + dx, c.y + dy);
            if x < 0 || y < 0 || x as usize >= grid.cols() || y as usize >= grid.rows() {
                debug!(shape = %self.name, x, y, "cell outside the grid, dropped");
                continue;
            }
            grid.set(y as usize, x as usize, ALIVE);
            placed += 1;
        }
        Ok(placed)
    }
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    shapes: BTreeMap<String, ShapeEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct ShapeLibrary {
    shapes: BTreeMap<String, ShapeEntry>,
}

impl ShapeLibrary {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lib = Self::from_json_str(&text)?;
        debug!(path = %path.display(), shapes = lib.len(), "loaded shape library");
        Ok(lib)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let file: LibraryFile = serde_json::from_str(s)?;
        Ok(ShapeLibrary {
            shapes: file.shapes,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Result<Shape> {
        let entry = self
            .shapes
            .get(name)
            .ok_or_else(|| Error::UnknownShape(name.to_string()))?;
        Ok(Shape {
            name: name.to_string(),
            width: entry.size.w,
            height: entry.size.h,
            cells: entry.cells.clone(),
        })
    }
}
