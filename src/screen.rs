//! Rendering backends. The run loop only sees the [`Screen`] trait.

use std::time::Duration;

use crate::{
    config::Params,
    error::{Error, Result},
    grid::{Grid, ALIVE},
};

pub mod text;
#[cfg(feature = "sdl")]
pub mod sdl;

pub use text::{Rect, TextScreen};
#[cfg(feature = "sdl")]
pub use sdl::SdlScreen;

/// What the run loop should do after a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub trait Screen {
    fn render(&mut self, grid: &Grid) -> Result<()>;

    /// Waits for `delay` while servicing input. Returns [`Flow::Quit`] when
    /// the user asked to stop.
    fn pause(&mut self, delay: Duration) -> Result<Flow>;
}

impl<S: Screen + ?Sized> Screen for Box<S> {
    fn render(&mut self, grid: &Grid) -> Result<()> {
        (**self).render(grid)
    }

    fn pause(&mut self, delay: Duration) -> Result<Flow> {
        (**self).pause(delay)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    #[default]
    Text,
    Sdl,
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Backend::Text => "text",
            Backend::Sdl => "sdl",
        }
    }
}

pub fn open(backend: Backend, params: &Params) -> Result<Box<dyn Screen>> {
    match backend {
        Backend::Text => Ok(Box::new(TextScreen::new()?)),
        #[cfg(feature = "sdl")]
        Backend::Sdl => Ok(Box::new(SdlScreen::new(
            params.width,
            params.height,
            params.cell_size,
            params.grid_lines,
        )?)),
        #[cfg(not(feature = "sdl"))]
        Backend::Sdl => {
            let _ = params;
            Err(Error::BackendUnavailable(backend.name()))
        }
    }
}

/// Pixel squares `(x, y, side)` for every live cell, row-major. Fails when a
/// coordinate does not fit in `i32`.
pub fn live_cell_rects(grid: &Grid, cell_size: u32) -> Result<Vec<(i32, i32, u32)>> {
    let pixel = |cell: usize| {
        i32::try_from(cell)
            .ok()
            .zip(i32::try_from(cell_size).ok())
            .and_then(|(c, side)| c.checked_mul(side))
            .ok_or_else(|| Error::InvalidArgument(format!("cellSize={cell_size}")))
    };
    let mut out = Vec::with_capacity(grid.population());
    for (row, cells) in grid.rows_iter().enumerate() {
        for (col, _) in cells.iter().enumerate().filter(|(_, c)| **c == ALIVE) {
            out.push((pixel(col)?, pixel(row)?, cell_size));
        }
    }
    Ok(out)
}

/// Offsets of grid lines along one axis of `extent` pixels, both borders included.
pub fn grid_lines(extent: u32, cell_size: u32) -> Vec<i32> {
    if cell_size == 0 {
        return Vec::new();
    }
    (0..=extent)
        .step_by(cell_size as usize)
        .map_while(|p| i32::try_from(p).ok())
        .collect()
}
