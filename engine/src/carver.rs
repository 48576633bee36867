use glam::IVec2;
use rand::rngs::ThreadRng;

use crate::{
    direction::{Direction, random_order},
    grid::Grid,
};

// One carved passage: the wall on the `direction` side of `from` was
// broken and the walk advanced to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub from: IVec2,
    pub to: IVec2,
    pub direction: Direction,
}

// One unresolved level of the depth-first walk. The direction order is
// drawn once when the frame is created and is fixed for its life.
struct Frame {
    coord: IVec2,
    came_from: IVec2,
    directions: [Direction; 4],
    tried: usize,
}

impl Frame {
    fn new(coord: IVec2, came_from: IVec2, rng: &mut ThreadRng) -> Self {
        Self {
            coord,
            came_from,
            directions: random_order(rng),
            tried: 0,
        }
    }
}

// The recursive backtracker, unrolled onto an explicit frame stack so the
// walk can be pulled one wall-break at a time. Each `step` call carves
// exactly one passage; dead ends unwind silently within the same call.
pub struct Carver {
    stack: Vec<Frame>,
    rng: ThreadRng,
}

impl Carver {
    // Marks `start` visited and primes the walk there. The root frame's
    // `came_from` is `start` itself, matching a walk that arrived from
    // nowhere.
    pub fn new(grid: &mut Grid, start: IVec2) -> Self {
        assert!(
            grid.is_in_bounds(start),
            "start cell ({}, {}) is outside the {}x{} grid",
            start.x,
            start.y,
            grid.width(),
            grid.height()
        );

        let mut rng = rand::rng();
        grid.mark_visited(start);
        let root = Frame::new(start, start, &mut rng);

        Self {
            stack: vec![root],
            rng,
        }
    }

    pub fn is_done(&self) -> bool {
        self.stack.is_empty()
    }

    // Advances the walk to its next wall-break, or returns `None` once
    // every cell has been reached and the walk has fully unwound.
    //
    // A neighbour is skipped if it is out of bounds, if it is the cell the
    // walk just arrived from (that wall must never be re-broken), or if it
    // was already visited (carving into it would close a loop).
    pub fn step(&mut self, grid: &mut Grid) -> Option<Step> {
        loop {
            let frame = self.stack.last_mut()?;
            let mut carved = None;

            while frame.tried < frame.directions.len() {
                let direction = frame.directions[frame.tried];
                frame.tried += 1;

                let next = frame.coord + direction.offset();
                if !grid.is_in_bounds(next) {
                    continue;
                }
                if next == frame.came_from {
                    continue;
                }
                if grid.is_visited(next) {
                    continue;
                }

                carved = Some((frame.coord, next, direction));
                break;
            }

            let Some((from, to, direction)) = carved else {
                // Dead end: backtrack to the caller's frame.
                self.stack.pop();
                continue;
            };

            grid.break_wall(from, direction);
            grid.mark_visited(to);
            let next_frame = Frame::new(to, from, &mut self.rng);
            self.stack.push(next_frame);

            return Some(Step {
                from,
                to,
                direction,
            });
        }
    }
}
