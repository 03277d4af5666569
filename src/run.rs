use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, trace};

use crate::{
    automaton::{CellularAutomaton, LifeLike},
    config::Params,
    error::{Error, Result},
    grid::Grid,
    screen::{Backend, Flow, Rect, Screen},
    shapes::Shape,
};

/// Grid `(rows, cols)` for a backend. Explicit `rows`/`cols` parameters win.
pub fn grid_dimensions(params: &Params, backend: Backend, terminal: Option<Rect>) -> Result<(usize, usize)> {
    if let (Some(rows), Some(cols)) = (params.rows, params.cols) {
        return Ok((rows, cols));
    }
    let (rows, cols) = match backend {
        Backend::Text => terminal.ok_or(Error::TerminalSize)?.grid_fit(),
        Backend::Sdl => (
            (params.height / params.cell_size) as usize,
            (params.width / params.cell_size) as usize,
        ),
    };
    Ok((params.rows.unwrap_or(rows), params.cols.unwrap_or(cols)))
}

/// Builds the automaton and seeds it, either with `shape` in the middle or
/// randomly at `params.density`.
pub fn seed_automaton(params: &Params, rows: usize, cols: usize, shape: Option<&Shape>) -> Result<LifeLike> {
    let mut grid = Grid::new(rows, cols)?;
    match shape {
        Some(shape) => {
            let placed = shape.place_centered(&mut grid)?;
            info!(shape = %shape.name, placed, "seeded from shape");
        }
        None => {
            let mut rng = match params.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            grid.randomize(&mut rng, params.density);
            info!(density = params.density, seed = ?params.seed, "seeded randomly");
        }
    }
    Ok(LifeLike::new(grid, params.rule()?, params.edges()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Finished,
    Quit,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub generations: u64,
    pub population: usize,
    pub reason: StopReason,
}

/// Render, step, pause, until the generation budget runs out or the screen
/// asks to quit.
pub fn simulate<S, A>(screen: &mut S, automaton: &mut A, params: &Params) -> Result<RunSummary>
where
    S: Screen + ?Sized,
    A: CellularAutomaton + ?Sized,
{
    let delay = Duration::from_millis(params.frame_delay_ms);
    let mut reason = StopReason::Finished;

    for _ in 0..params.generations {
        screen.render(automaton.grid())?;

        let changed = automaton.step_changed();
        trace!(
            generation = automaton.generation(),
            population = automaton.grid().population(),
            "step"
        );
        if params.stop_when_stable && !changed {
            screen.render(automaton.grid())?;
            reason = StopReason::Stable;
            break;
        }

        if screen.pause(delay)? == Flow::Quit {
            reason = StopReason::Quit;
            break;
        }
    }

    let summary = RunSummary {
        generations: automaton.generation(),
        population: automaton.grid().population(),
        reason,
    };
    info!(?summary, "simulation ended");
    Ok(summary)
}
