use std::{
    fmt,
    time::{Duration, Instant},
};

use glam::IVec2;

use crate::{
    carver::Carver,
    direction::Direction,
    grid::{Grid, GridError},
};

// Everything a renderer needs to show one step of the carve: which wall
// broke, and where the cursor moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    pub broken_wall: (IVec2, Direction),
    pub cursor_from: IVec2,
    pub cursor_to: IVec2,
}

// Configuration for one generation run. Callers are responsible for
// clamping `start` into bounds; an out-of-bounds start is reported by
// `start`, never silently corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub width: i32,
    pub height: i32,
    pub start: IVec2,
    pub step_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    InvalidDimension { width: i32, height: i32 },
    StartOutOfBounds { start: IVec2, width: i32, height: i32 },
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::InvalidDimension { width, height } => {
                write!(f, "grid dimensions must be positive, got {}x{}", width, height)
            }
            StartError::StartOutOfBounds {
                start,
                width,
                height,
            } => {
                write!(
                    f,
                    "start cell ({}, {}) is outside the {}x{} grid",
                    start.x, start.y, width, height
                )
            }
        }
    }
}

impl std::error::Error for StartError {}

// One in-flight (or finished) generation, stamped with the epoch that
// created it. The scheduler owns the grid for the run's whole life;
// renderers only ever see `&Grid` and events.
struct Run {
    epoch: u64,
    grid: Grid,
    carver: Carver,
    step_delay: Duration,
    next_step_at: Instant,
    complete: bool,
}

// Paces a carver at a fixed per-step delay and supports cancellation.
//
// Cooperative and single-threaded: the owner polls `tick` from its loop,
// and at most one wall breaks per poll. Cancellation retires the current
// epoch and drops the run in the same call, so a superseded run can never
// touch a grid again.
pub struct StepScheduler {
    epoch: u64,
    run: Option<Run>,
}

impl StepScheduler {
    pub fn new() -> Self {
        Self { epoch: 0, run: None }
    }

    // Cancels whatever run is active, builds a fresh grid and begins a new
    // walk from `config.start`. The first step is due immediately; each
    // later one becomes due `config.step_delay` after the previous fired.
    //
    // On a configuration error the scheduler is left idle.
    pub fn start(&mut self, config: &RunConfig, now: Instant) -> Result<(), StartError> {
        self.cancel();

        let mut grid = Grid::new(config.width, config.height).map_err(|e| match e {
            GridError::InvalidDimension { width, height } => {
                StartError::InvalidDimension { width, height }
            }
        })?;

        if !grid.is_in_bounds(config.start) {
            return Err(StartError::StartOutOfBounds {
                start: config.start,
                width: config.width,
                height: config.height,
            });
        }

        let carver = Carver::new(&mut grid, config.start);

        self.run = Some(Run {
            epoch: self.epoch,
            grid,
            carver,
            step_delay: config.step_delay,
            next_step_at: now,
            complete: false,
        });

        Ok(())
    }

    // Discards the active run and any step it had pending. The run's grid
    // is dropped before this returns, so its steps can never surface
    // afterwards. No-op when idle.
    pub fn cancel(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.run = None;
    }

    // Polls the active run: emits at most one event per call, and none
    // before the pending step is due. With a zero delay every poll yields
    // a step, back to back, each still surfaced to the renderer.
    pub fn tick(&mut self, now: Instant) -> Option<StepEvent> {
        let run = self.run.as_mut()?;

        // `cancel` drops a superseded run in the same call that retires its
        // epoch, so a live run always carries the current stamp.
        debug_assert_eq!(run.epoch, self.epoch, "stale run outlived its epoch");

        if run.complete || now < run.next_step_at {
            return None;
        }

        match run.carver.step(&mut run.grid) {
            Some(step) => {
                run.next_step_at = now + run.step_delay;
                Some(StepEvent {
                    broken_wall: (step.from, step.direction),
                    cursor_from: step.from,
                    cursor_to: step.to,
                })
            }
            None => {
                run.complete = true;
                None
            }
        }
    }

    // Read-only view of the active run's grid, finished or not.
    pub fn grid(&self) -> Option<&Grid> {
        self.run.as_ref().map(|run| &run.grid)
    }

    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.complete)
    }

    pub fn is_complete(&self) -> bool {
        self.run.as_ref().is_some_and(|run| run.complete)
    }
}
