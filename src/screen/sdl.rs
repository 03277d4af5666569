use std::{
    thread,
    time::{Duration, Instant},
};

use sdl2::{
    event::Event,
    keyboard::Keycode,
    mouse::MouseButton,
    pixels::Color,
    rect::Rect,
    render::Canvas,
    video::Window,
    EventPump, Sdl,
};
use tracing::info;

use super::{grid_lines, live_cell_rects, Flow, Screen};
use crate::{
    error::{Error, Result},
    grid::Grid,
};

const BACKGROUND: Color = Color::RGB(0, 0, 0);
const LINES: Color = Color::RGB(80, 80, 100);
const LIVE: Color = Color::RGB(255, 255, 255);

/// Longest sleep between two event queue polls.
const POLL_SLICE: Duration = Duration::from_millis(10);

fn sdl_err(e: impl ToString) -> Error {
    Error::Sdl(e.to_string())
}

/// Window backend. Window, renderer and SDL itself are released on drop.
pub struct SdlScreen {
    canvas: Canvas<Window>,
    events: EventPump,
    width: u32,
    height: u32,
    cell_size: u32,
    grid_lines: bool,
    _sdl: Sdl,
}

impl SdlScreen {
    pub fn new(width: u32, height: u32, cell_size: u32, grid_lines: bool) -> Result<Self> {
        let sdl = sdl2::init().map_err(sdl_err)?;
        let video = sdl.video().map_err(sdl_err)?;
        let window = video
            .window("Conway's Game of Life", width, height)
            .position_centered()
            .build()
            .map_err(sdl_err)?;
        let canvas = window.into_canvas().accelerated().build().map_err(sdl_err)?;
        let events = sdl.event_pump().map_err(sdl_err)?;
        info!(width, height, cell_size, "opened SDL window");

        Ok(SdlScreen {
            canvas,
            events,
            width,
            height,
            cell_size,
            grid_lines,
            _sdl: sdl,
        })
    }
}

impl Screen for SdlScreen {
    fn render(&mut self, grid: &Grid) -> Result<()> {
        self.canvas.set_draw_color(BACKGROUND);
        self.canvas.clear();

        if self.grid_lines {
            let (w, h) = (self.width as i32, self.height as i32);
            self.canvas.set_draw_color(LINES);
            for x in grid_lines(self.width, self.cell_size) {
                self.canvas.draw_line((x, 0), (x, h)).map_err(sdl_err)?;
            }
            for y in grid_lines(self.height, self.cell_size) {
                self.canvas.draw_line((0, y), (w, y)).map_err(sdl_err)?;
            }
        }

        self.canvas.set_draw_color(LIVE);
        for (x, y, side) in live_cell_rects(grid, self.cell_size)? {
            self.canvas
                .fill_rect(Rect::new(x, y, side, side))
                .map_err(sdl_err)?;
        }

        self.canvas.present();
        Ok(())
    }

    fn pause(&mut self, delay: Duration) -> Result<Flow> {
        let deadline = Instant::now() + delay;
        loop {
            for event in self.events.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => return Ok(Flow::Quit),
                    Event::MouseButtonDown {
                        mouse_btn: MouseButton::Left,
                        x,
                        y,
                        ..
                    } => {
                        let cs = self.cell_size as i32;
                        info!(x, y, row = y / cs, col = x / cs, "clicked");
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(Flow::Continue);
            }
            thread::sleep((deadline - now).min(POLL_SLICE));
        }
    }
}
