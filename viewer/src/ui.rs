use std::io::{self, Stdout, Write, stdout};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use glam::IVec2;

use engine::grid::Grid;

const LEGEND: &str = "r regenerate | c cancel | arrows resize | -/+ delay | q quit";

// What to put on screen this frame: the grid (if a run exists), the
// current and previous cursor cells, and the status line.
pub struct Scene<'a> {
    pub grid: Option<&'a Grid>,
    pub markers: Option<(IVec2, IVec2)>,
    pub status: String,
}

// Renders the maze into a terminal. Generic over the writer so tests can
// draw into a buffer instead of a live terminal.
pub struct MazeView<W: Write> {
    out: W,
    owns_terminal: bool, // True except in tests.
}

impl MazeView<Stdout> {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, Hide, Clear(ClearType::All))?;

        Ok(Self {
            out,
            owns_terminal: true,
        })
    }
}

impl<W: Write> MazeView<W> {
    pub fn draw(&mut self, scene: &Scene) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;

        let mut row = 0u16;

        match scene.grid {
            Some(grid) => {
                for line in maze_lines(grid, scene.markers) {
                    queue!(self.out, MoveTo(0, row), Print(line))?;
                    row += 1;
                }
            }
            None => {
                queue!(self.out, MoveTo(0, 0), Print("no maze yet - press r"))?;
                row = 1;
            }
        }

        queue!(
            self.out,
            MoveTo(0, row + 1),
            Print(&scene.status),
            MoveTo(0, row + 2),
            Print(LEGEND)
        )?;

        self.out.flush()
    }
}

impl<W: Write> Drop for MazeView<W> {
    fn drop(&mut self) {
        if self.owns_terminal {
            let _ = execute!(self.out, Show);
            let _ = terminal::disable_raw_mode();
            let _ = write!(self.out, "\r\n");
        }
    }
}

// Lays the grid out as text, top row first. Cells are two characters
// wide; every cell draws its own left and bottom walls, and the top and
// right perimeter segments are drawn unconditionally since no cell owns
// them.
fn maze_lines(grid: &Grid, markers: Option<(IVec2, IVec2)>) -> Vec<String> {
    let width = grid.width();
    let mut lines = Vec::with_capacity(grid.height() as usize * 2 + 1);

    let mut top = String::new();
    for _ in 0..width {
        top.push_str("+--");
    }
    top.push('+');
    lines.push(top);

    for y in (0..grid.height()).rev() {
        let mut interior = String::new();
        let mut below = String::new();

        for x in 0..width {
            let coord = IVec2::new(x, y);
            let cell = grid.cell(coord);

            interior.push(if cell.left_wall { '|' } else { ' ' });
            interior.push_str(marker_glyph(coord, markers));

            below.push('+');
            below.push_str(if cell.bottom_wall { "--" } else { "  " });
        }

        interior.push('|');
        below.push('+');
        lines.push(interior);
        lines.push(below);
    }

    lines
}

fn marker_glyph(coord: IVec2, markers: Option<(IVec2, IVec2)>) -> &'static str {
    match markers {
        Some((current, _)) if current == coord => "██",
        Some((_, previous)) if previous == coord => "▒▒",
        _ => "  ",
    }
}
