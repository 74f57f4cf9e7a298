use std::io::Write;

use anyhow::{Context, Result};
use thurs_core::{Frame, HitKind};
use thurs_rendering::{
    compose, ColumnStrip, Palette, Renderer, SurfaceStrip, Viewport, SPRITE_SIZE_RANGE,
};

/// Virtual pixel surface the text view samples from.
const SURFACE_WIDTH: u32 = 800;
const SURFACE_HEIGHT: u32 = 600;

const WALL_RAMP: &[u8] = b" .:-=+*#%@";
const DOOR_RAMP: &[u8] = b" ,;!|";
const FLOOR: u8 = b'_';
const SPRITE: u8 = b'&';

/// Prints every Nth frame as rows of ASCII shading.
pub(crate) struct TerminalRenderer<W: Write> {
    out: W,
    rows: u32,
    every: u32,
    palette: Palette,
    presented: u64,
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a renderer writing `rows` text rows to `out` every `every` frames.
    pub(crate) fn new(out: W, rows: u32, every: u32) -> Self {
        Self {
            out,
            rows,
            every,
            palette: Palette::default(),
            presented: 0,
        }
    }

    fn draw(&mut self, frame: &Frame) -> Result<()> {
        let viewport =
            Viewport::new(SURFACE_WIDTH, SURFACE_HEIGHT).context("invalid drawing surface")?;
        let composition = compose(viewport, &self.palette, frame);
        let columns = composition.strips.len();
        let rows = self.rows as usize;
        let row_height = SURFACE_HEIGHT as f32 / self.rows.max(1) as f32;

        let mut canvas = vec![vec![b' '; columns]; rows];
        for (row, line) in canvas.iter_mut().enumerate() {
            let y = (row as f32 + 0.5) * row_height;
            for (cell, strip) in line.iter_mut().zip(&composition.strips) {
                *cell = match strip {
                    ColumnStrip::Surface(surface)
                        if y >= surface.top && y < surface.top + surface.height =>
                    {
                        glyph(surface)
                    }
                    _ if y > SURFACE_HEIGHT as f32 / 2.0 => FLOOR,
                    _ => b' ',
                };
            }
        }

        for sprite in &composition.sprites {
            let column = (sprite.center_x / SURFACE_WIDTH as f32 * columns as f32).floor();
            if column < 0.0 || column >= columns as f32 {
                continue;
            }
            let half_rows = (sprite.size / SPRITE_SIZE_RANGE.1 * rows as f32 / 4.0).ceil() as usize;
            let middle = rows / 2;
            for line in canvas
                .iter_mut()
                .skip(middle.saturating_sub(half_rows))
                .take(half_rows * 2)
            {
                line[column as usize] = SPRITE;
            }
        }

        let player = &frame.player;
        writeln!(
            self.out,
            "frame {} at ({:.2}, {:.2}) facing {:.0} deg, {} visible",
            self.presented,
            player.position.x,
            player.position.y,
            player.angle.to_degrees(),
            composition.sprites.len()
        )?;
        for line in &canvas {
            self.out.write_all(line)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush().context("failed to flush terminal output")
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.presented += 1;
        if self.every == 0 || self.presented % u64::from(self.every) != 0 {
            return Ok(());
        }
        self.draw(frame)
    }
}

fn glyph(surface: &SurfaceStrip) -> u8 {
    let ramp = match surface.kind {
        HitKind::Door => DOOR_RAMP,
        HitKind::Wall | HitKind::Miss => WALL_RAMP,
    };
    let level = (surface.color.luminance() * (ramp.len() - 1) as f32).round() as usize;
    ramp[level.min(ramp.len() - 1)]
}
